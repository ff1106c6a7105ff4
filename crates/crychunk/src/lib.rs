//! crychunk - CryEngine chunk-file reading library.
//!
//! This crate provides a unified interface to the crychunk crates.
//!
//! # Crates
//!
//! - [`crychunk_common`] - Byte sources and endianness helpers
//! - [`crychunk_format`] - Chunk-file headers, chunk tables and header stripping
//!
//! # Example
//!
//! ```no_run
//! use crychunk::prelude::*;
//!
//! let file = ChunkFile::open("objects/box.cgf")?;
//! for chunk in file.chunks() {
//!     println!("{} #{}: {} bytes", chunk.chunk_type, chunk.chunk_id, chunk.size);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub use crychunk_common as common;
pub use crychunk_format as format;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crychunk_common::{ByteSource, FileReader, MappedFile, MemoryReader, StreamReader};
    pub use crychunk_format::{
        load_chunk_data, parse_chunk_table, strip_chunk_headers, ChunkDescriptor, ChunkFile,
        ChunkList, ChunkTableInfo, ChunkType, FileType, FormatError, FormatVersion, ReadOptions,
    };
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
