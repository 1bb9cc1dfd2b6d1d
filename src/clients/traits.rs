use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("generation credentials are not configured")]
    MissingCredentials,
    #[error("generation timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("upstream returned {status}: {body}")]
    Upstream { status: u16, body: String },
    #[error("invalid upstream response: {0}")]
    InvalidResponse(String),
}

impl GenerationError {
    /// Whether another attempt could plausibly succeed.
    ///
    /// Timeouts, transport failures, 5xx and 429 are transient. Missing
    /// credentials, other 4xx and malformed envelopes are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            GenerationError::Timeout { .. } | GenerationError::Transport(_) => true,
            GenerationError::Upstream { status, .. } => *status >= 500 || *status == 429,
            GenerationError::MissingCredentials | GenerationError::InvalidResponse(_) => false,
        }
    }
}

/// A text-generation backend. Implementations are constructed once and
/// shared behind an `Arc`.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;

    /// Model identifier reported by `/info`
    fn model(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(GenerationError::Timeout { timeout_ms: 30_000 }.is_retryable());
        assert!(GenerationError::Transport("reset".into()).is_retryable());
        assert!(
            GenerationError::Upstream {
                status: 503,
                body: String::new()
            }
            .is_retryable()
        );
        assert!(
            GenerationError::Upstream {
                status: 429,
                body: String::new()
            }
            .is_retryable()
        );
        assert!(
            !GenerationError::Upstream {
                status: 400,
                body: String::new()
            }
            .is_retryable()
        );
        assert!(!GenerationError::MissingCredentials.is_retryable());
    }
}
