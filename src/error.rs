//! Error types for membuff
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using BuffError
pub type Result<T> = std::result::Result<T, BuffError>;

/// Unified error type for membuff operations
#[derive(Debug, Error)]
pub enum BuffError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    /// Failure surfaced by an external stream, passed through unchanged
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown compression type {0}")]
    UnknownCompression(i8),

    // -------------------------------------------------------------------------
    // Growth Errors
    // -------------------------------------------------------------------------
    /// The store cannot be extended to hold a write
    #[error("Cannot grow buffer to hold {len} bytes at offset {offset}")]
    Capacity { offset: u64, len: usize },

    // -------------------------------------------------------------------------
    // Range Errors
    // -------------------------------------------------------------------------
    /// The view's cursor has moved past its limit
    #[error("End of range: position {pointer} is past limit {limit}")]
    EndOfRange { pointer: u64, limit: u64 },

    // -------------------------------------------------------------------------
    // Sharing Errors
    // -------------------------------------------------------------------------
    #[error("Shared buffer is already borrowed")]
    Borrowed,
}

impl From<BuffError> for std::io::Error {
    fn from(err: BuffError) -> Self {
        match err {
            BuffError::Io(e) => e,
            BuffError::EndOfRange { .. } => {
                std::io::Error::new(std::io::ErrorKind::UnexpectedEof, err)
            }
            BuffError::Capacity { .. } => {
                std::io::Error::new(std::io::ErrorKind::OutOfMemory, err)
            }
            BuffError::Borrowed => std::io::Error::new(std::io::ErrorKind::WouldBlock, err),
            other => std::io::Error::new(std::io::ErrorKind::InvalidInput, other),
        }
    }
}
