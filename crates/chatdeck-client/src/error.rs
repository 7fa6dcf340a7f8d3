//! Error types for the client.

use thiserror::Error;

/// Errors that can occur when talking to the server.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport-level HTTP error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The base URL cannot carry a request path.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// The server answered with an error status.
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}
