//! Error types for the record store.

use thiserror::Error;

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in store operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Name escapes the store root or is otherwise unusable
    #[error("Invalid name: {0}")]
    InvalidName(String),

    /// Stored bytes are not valid UTF-8
    #[error("Not UTF-8: {0}")]
    NotUtf8(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
