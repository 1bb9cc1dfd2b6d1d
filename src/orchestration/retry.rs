//! Exponential backoff around a fallible async call.

use std::future::Future;
use std::time::Duration;

use crate::clients::GenerationError;
use crate::config::GenerationConfig;

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts, including the first call
    pub max_attempts: u32,
    pub base_delay: Duration,
    /// Bound on each individual attempt
    pub call_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&GenerationConfig::default())
    }
}

impl RetryPolicy {
    pub fn from_config(config: &GenerationConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            base_delay: Duration::from_millis(config.base_delay_ms),
            call_timeout: Duration::from_millis(config.call_timeout_ms),
        }
    }

    /// Delay after the given (1-based) failed attempt: base, 2×base, 4×base, ...
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let shift = attempt.saturating_sub(1).min(16);
        self.base_delay.saturating_mul(1u32 << shift)
    }
}

/// Final result of a retried call and how many attempts it took
#[derive(Debug)]
pub struct RetryOutcome<T> {
    pub result: Result<T, GenerationError>,
    pub attempts: u32,
}

/// Run `op` until it succeeds, fails with a non-retryable error, or the
/// attempt budget is spent. Each attempt is bounded by `call_timeout`; an
/// elapsed timeout counts as a retryable failure.
pub async fn retry_with_backoff<T, F, Fut>(
    policy: &RetryPolicy,
    operation: &str,
    mut op: F,
) -> RetryOutcome<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, GenerationError>>,
{
    let mut attempt = 0u32;
    loop {
        attempt += 1;
        tracing::debug!("{}: attempt {}/{}", operation, attempt, policy.max_attempts);

        let result = match tokio::time::timeout(policy.call_timeout, op(attempt)).await {
            Ok(r) => r,
            Err(_) => Err(GenerationError::Timeout {
                timeout_ms: policy.call_timeout.as_millis() as u64,
            }),
        };

        match result {
            Ok(value) => {
                return RetryOutcome {
                    result: Ok(value),
                    attempts: attempt,
                };
            }
            Err(e) if e.is_retryable() && attempt < policy.max_attempts => {
                let delay = policy.delay_after(attempt);
                tracing::warn!(
                    "{}: attempt {} failed ({}), retrying in {}ms",
                    operation,
                    attempt,
                    e,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => {
                if e.is_retryable() {
                    tracing::warn!("{}: giving up after {} attempts: {}", operation, attempt, e);
                } else {
                    tracing::warn!("{}: non-retryable failure: {}", operation, e);
                }
                return RetryOutcome {
                    result: Err(e),
                    attempts: attempt,
                };
            }
        }
    }
}
