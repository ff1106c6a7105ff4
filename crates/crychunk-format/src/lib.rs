//! CryEngine chunk-file reader.
//!
//! Geometry (`.cgf`, `.chr`, `.skin`) and animation (`.caf`) assets are chunk
//! files: a fixed header, a table describing every chunk, and the chunk
//! payloads. This crate locates, sizes and validates the chunks; it does not
//! interpret their payloads.
//!
//! # Supported Versions
//!
//! - `0x744`, `0x745` - legacy table without sizes; sizes are inferred from
//!   offsets and some chunk types repeat a small header inside their payload
//! - `0x746` - current table with explicit sizes, behind either a `CryTek`
//!   or a compact `CrCh` header
//!
//! # Example
//!
//! ```no_run
//! use crychunk_common::MemoryReader;
//! use crychunk_format::{parse_chunk_table, ChunkDescriptor};
//!
//! let bytes = std::fs::read("objects/box.cgf")?;
//! let mut chunks: Vec<ChunkDescriptor> = Vec::new();
//! let info = parse_chunk_table(&mut MemoryReader::new(&bytes), &mut chunks)?;
//!
//! println!("{:?}: {} chunks", info.version, chunks.len());
//! for chunk in &chunks {
//!     println!("{} #{} @ {} ({} bytes)", chunk.chunk_type, chunk.chunk_id, chunk.file_offset, chunk.size);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod chunk_type;
mod descriptor;
mod error;
mod file;
mod list;
mod parser;
mod strip;

pub mod entry;
pub mod header;

pub use chunk_type::ChunkType;
pub use descriptor::ChunkDescriptor;
pub use error::{Error, FormatError, Result};
pub use file::{ChunkFile, ReadOptions};
pub use header::{FileType, FormatVersion, HeaderSignature, CRCH_SIGNATURE, FILE_SIGNATURE};
pub use list::ChunkList;
pub use parser::{
    detect_version, parse_chunk_table, parse_current_table, parse_legacy_table, ChunkTableInfo,
    MAX_CURRENT_CHUNK_COUNT, MAX_LEGACY_CHUNK_COUNT,
};
pub use strip::{load_chunk_data, strip_chunk_headers};
