//! Error types for remote API access.

use satdsl_model::{EntityKind, ModelError};
use thiserror::Error;

/// Result type for remote API operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors that can occur talking to the remote service.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{method} {url} failed with status {status}: {body}")]
    Status {
        method: String,
        url: String,
        status: u16,
        body: String,
    },

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("{0} is abstract and has no collection")]
    AbstractKind(EntityKind),

    #[error("{0} entity has no id")]
    MissingId(EntityKind),

    #[error("model error: {0}")]
    Model(#[from] ModelError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    /// HTTP status of the failed request, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns true if the server answered 404.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}
