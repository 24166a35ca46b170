//! Error types for chain setup.

use thiserror::Error;

/// Result type for chain operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while describing a series.
#[derive(Debug, Error)]
pub enum Error {
    /// Step size must be positive
    #[error("step size must be positive")]
    ZeroStep,

    /// Series name is unusable as a file name
    #[error("invalid series name: {0:?}")]
    InvalidSeries(String),
}
