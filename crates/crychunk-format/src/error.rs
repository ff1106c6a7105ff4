//! Error types for chunk-file parsing.

use thiserror::Error;

/// Errors that can occur when reading a chunk file.
///
/// Each variant's message starts with the diagnostic the engine reports for
/// the same condition.
#[derive(Debug, Error)]
pub enum Error {
    /// Byte source error outside of a specific parsing step.
    #[error("{0}")]
    Common(#[from] crychunk_common::Error),

    /// The chunk file could not be opened.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The fixed-size file header could not be read.
    #[error("Cannot read header of chunk file")]
    HeaderReadFailed(#[source] crychunk_common::Error),

    /// The file does not start with the chunk-file signature.
    #[error("Unknown signature in chunk file: {actual:?}")]
    BadSignature { actual: [u8; 8] },

    /// The header version is not one this reader understands.
    #[error("Unsupported version of chunk file: {0:#x}")]
    UnsupportedVersion(u32),

    /// The legacy header's file type is neither geometry nor animation.
    #[error("Type of chunk file is neither FileType_Geom nor FileType_Anim: {0:#010x}")]
    UnsupportedFileType(u32),

    /// The chunk count preceding a legacy chunk table could not be read.
    #[error("Failed to read # of chunks")]
    ChunkCountReadFailed(#[source] crychunk_common::Error),

    /// The chunk count exceeds the format limit.
    #[error("Invalid # of chunks in file: {count} (maximum {max})")]
    InvalidChunkCount { count: u32, max: u32 },

    /// The chunk table entries could not be read.
    #[error("Failed to read chunk entries from file")]
    ChunkTableReadFailed(#[source] crychunk_common::Error),

    /// A legacy chunk type code has no canonical equivalent.
    #[error("Unknown chunk type {chunk_type:#010x} in chunk {chunk_id}")]
    UnknownChunkType { chunk_type: u32, chunk_id: u32 },

    /// A chunk extends past the end of the file.
    #[error("Data in chunk file are corrupted: chunk {chunk_id} at {offset} with size {size} exceeds file size {file_size}")]
    CorruptChunkData {
        chunk_id: u32,
        offset: u64,
        size: u64,
        file_size: u64,
    },

    /// A chunk is smaller than the legacy header it is supposed to start with.
    #[error("Damaged data: reported size of chunk data is less than size of the chunk header (chunk {chunk_id}, {size} bytes)")]
    ChunkTooSmallForHeader { chunk_id: u32, size: u32 },

    /// A legacy chunk header could not be read.
    #[error("Failed to read chunk header from file (chunk {chunk_id})")]
    ChunkHeaderReadFailed {
        chunk_id: u32,
        source: crychunk_common::Error,
    },

    /// A legacy chunk header disagrees with its chunk table entry.
    #[error("Data in a chunk header don't match data in the chunk table (chunk {chunk_id})")]
    HeaderTableMismatch { chunk_id: u32 },

    /// Removing the legacy header would leave a negative size.
    #[error("Damaged data: negative chunk size after header stripping (chunk {chunk_id})")]
    NegativeLengthChunk { chunk_id: u32 },

    /// A chunk payload could not be read.
    #[error("Failed to read data of chunk {chunk_id}")]
    ChunkDataReadFailed {
        chunk_id: u32,
        source: crychunk_common::Error,
    },
}

/// Alias naming the error by its role in the parser API.
pub type FormatError = Error;

/// Result type for chunk-file operations.
pub type Result<T> = std::result::Result<T, Error>;
