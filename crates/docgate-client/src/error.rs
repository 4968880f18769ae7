//! Gateway error types.

use reqwest::StatusCode;
use thiserror::Error;

/// Result type for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Errors that can occur during gateway operations.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The backend answered with a non-2xx status.
    #[error("Transport error (HTTP {status}): {message}")]
    Transport { status: u16, message: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GatewayError {
    pub fn transport(status: u16, message: impl Into<String>) -> Self {
        Self::Transport {
            status,
            message: message.into(),
        }
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Normalize a non-success HTTP status into a transport error.
    pub fn from_http_status(status: u16, message: impl Into<String>) -> Self {
        Self::transport(status, message)
    }

    /// HTTP status carried by the error, if the backend produced one.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            GatewayError::Transport { status, .. } => Some(*status),
            GatewayError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// True if the backend answered 404. Drives the save fallback.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            GatewayError::Transport { status, .. } if *status == StatusCode::NOT_FOUND.as_u16()
        )
    }
}
