//! Core Error Types

use thiserror::Error;

/// Core layer errors
#[derive(Debug, Error)]
pub enum CoreError {
    /// Unknown product/user/order identifier
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed caller-supplied value
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Storage backend error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Anything else
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Core result type
pub type CoreResult<T> = Result<T, CoreError>;

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Serialization(err.to_string())
    }
}
