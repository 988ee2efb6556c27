//! Variable store error types.

use thiserror::Error;

/// Result type for variable store operations.
pub type NomadResult<T> = Result<T, NomadError>;

/// Errors that can occur talking to a variable store.
#[derive(Debug, Error)]
pub enum NomadError {
    #[error("API request failed: {0}")]
    Api(String),

    #[error("variable not found: {0}")]
    NotFound(String),

    #[error("variable already exists: {0}")]
    Conflict(String),

    #[error("authentication failed: {0}")]
    AuthFailed(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}
