//! Domain-specific error types for wellness-core

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Main error type for the wellness service
#[derive(Error, Debug)]
pub enum WellnessError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Unknown assessment tool: {tool}")]
    UnknownTool { tool: String },

    #[error("Generation error: {message}")]
    Generation { message: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("Timeout error: {operation} timed out after {timeout_ms}ms")]
    Timeout { operation: String, timeout_ms: u64 },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl WellnessError {
    pub fn validation(message: impl Into<String>) -> Self {
        WellnessError::Validation {
            message: message.into(),
        }
    }

    /// HTTP status used when this error crosses the API boundary
    pub fn status_code(&self) -> StatusCode {
        match self {
            WellnessError::Config { .. } => StatusCode::SERVICE_UNAVAILABLE,
            WellnessError::Validation { .. } | WellnessError::UnknownTool { .. } => {
                StatusCode::BAD_REQUEST
            }
            WellnessError::Generation { .. } => StatusCode::BAD_GATEWAY,
            WellnessError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            WellnessError::Serialization { .. } | WellnessError::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<anyhow::Error> for WellnessError {
    fn from(err: anyhow::Error) -> Self {
        WellnessError::Internal {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for WellnessError {
    fn from(err: serde_json::Error) -> Self {
        WellnessError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for WellnessError {
    fn from(err: reqwest::Error) -> Self {
        WellnessError::Generation {
            message: format!("HTTP request failed: {}", err),
        }
    }
}

impl From<crate::clients::GenerationError> for WellnessError {
    fn from(err: crate::clients::GenerationError) -> Self {
        match err {
            crate::clients::GenerationError::MissingCredentials => WellnessError::Config {
                message: err.to_string(),
            },
            crate::clients::GenerationError::Timeout { timeout_ms } => WellnessError::Timeout {
                operation: "generation".to_string(),
                timeout_ms,
            },
            other => WellnessError::Generation {
                message: other.to_string(),
            },
        }
    }
}

/// Convert WellnessError to an HTTP response
impl IntoResponse for WellnessError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("request failed: {}", self);
        } else {
            tracing::debug!("request rejected: {}", self);
        }
        let body = json!({
            "success": false,
            "error": self.to_string(),
            "fallbackUsed": false,
        });
        (status, Json(body)).into_response()
    }
}

/// Result type alias for wellness operations
pub type Result<T> = std::result::Result<T, WellnessError>;
