//! Common utilities for crychunk.
//!
//! This crate provides foundational types used by the chunk-file crates:
//!
//! - [`ByteSource`] - Seekable byte stream contract, with [`MemoryReader`],
//!   [`StreamReader`]/[`FileReader`] and [`MappedFile`] backends
//! - [`endian`] - Host byte-order detection and in-place swapping

mod error;
mod reader;

pub mod endian;

pub use endian::{SwapEndian, HOST_IS_BIG_ENDIAN};
pub use error::{Error, Result};
pub use reader::{ByteSource, FileReader, MappedFile, MemoryReader, StreamReader};

/// Re-export zerocopy traits for convenience
pub use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};
