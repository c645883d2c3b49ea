//! Custom error types for the client library

use thiserror::Error;

/// Custom error type for client operations
#[derive(Error, Debug)]
pub enum ClientError {
    /// Transport-level failure
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success envelope
    #[error("{message}")]
    Api { status: u16, message: String },

    /// Session storage failure
    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// Persisted session could not be encoded or decoded
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A success envelope arrived without the expected data payload
    #[error("response did not include the expected data")]
    MissingData,
}

/// Type alias for client results
pub type ClientResult<T> = Result<T, ClientError>;
