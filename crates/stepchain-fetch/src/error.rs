//! Error types for page transport.

use std::time::Duration;
use thiserror::Error;

/// Result type for fetch operations.
pub type Result<T> = std::result::Result<T, FetchError>;

/// Why a location produced no page.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP client failure (connect, TLS, malformed stream)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with something other than 200
    #[error("unexpected status {0}")]
    Status(u16),

    /// No complete response within the budget
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// The page was empty
    #[error("blank page")]
    Blank,

    /// IO error reading a local location
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
