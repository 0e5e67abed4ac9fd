//! Common error types for citelink

use thiserror::Error;

/// Common result type for citelink operations
pub type Result<T> = std::result::Result<T, Error>;

/// Failures surfaced by the document loader and configuration layer.
///
/// The citation resolver itself never fails; unresolved markers are
/// reported inside the rewritten content instead.
#[derive(Error, Debug)]
pub enum Error {
    /// Backing document is missing
    #[error("Not found: {0}")]
    NotFound(String),

    /// Backing document cannot be parsed into content records
    #[error("Malformed input: {0}")]
    Malformed(#[from] serde_json::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),
}
