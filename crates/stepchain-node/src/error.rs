//! Error types for the node.

use thiserror::Error;

/// Result type for node operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while setting up or driving a node.
#[derive(Debug, Error)]
pub enum Error {
    /// Bad environment configuration
    #[error("Config error: {0}")]
    Config(String),

    /// Bad command line
    #[error("Usage error: {0}")]
    Usage(String),

    /// Transport setup failed
    #[error("Fetch error: {0}")]
    Fetch(#[from] stepchain_fetch::FetchError),

    /// Series description rejected
    #[error("Chain error: {0}")]
    Chain(#[from] stepchain_chain::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
