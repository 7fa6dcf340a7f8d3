//! Core domain errors.

use thiserror::Error;

/// Core domain errors for chatdeck.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// Chat not found.
    #[error("Chat not found: {0}")]
    ChatNotFound(String),

    /// User not found.
    #[error("User not found: {0}")]
    UserNotFound(String),

    /// Model is not part of the catalog.
    #[error("Unknown model: {0}")]
    UnknownModel(String),

    /// Invalid input.
    #[error("{0}")]
    InvalidInput(String),
}
