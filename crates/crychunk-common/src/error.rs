//! Error types for crychunk-common.

use thiserror::Error;

/// Error returned by a [`ByteSource`](crate::ByteSource).
#[derive(Debug, Error)]
pub enum Error {
    /// Fewer bytes remain than were requested.
    #[error("unexpected end of data: needed {needed} bytes but only {available} available")]
    UnexpectedEof { needed: usize, available: usize },

    /// Seek target lies outside the source.
    #[error("seek to {position} is out of range (size: {size})")]
    SeekOutOfRange { position: u64, size: u64 },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
