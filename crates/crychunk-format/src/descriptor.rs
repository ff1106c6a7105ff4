//! Canonical, version-independent chunk descriptor.

use crate::ChunkType;

/// One chunk as located by the chunk table.
///
/// `data` stays `None` after parsing; it is filled by
/// [`load_chunk_data`](crate::load_chunk_data) or [`ChunkFile`](crate::ChunkFile).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ChunkDescriptor {
    pub chunk_type: ChunkType,
    /// Chunk version with the big-endian flag removed.
    pub chunk_version: u32,
    pub chunk_id: u32,
    pub file_offset: u32,
    pub size: u32,
    /// Payload byte order differs from the running host's.
    pub needs_byte_swap: bool,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub data: Option<Vec<u8>>,
}

impl ChunkDescriptor {
    /// One past the last byte of the chunk.
    #[inline]
    pub fn end_offset(&self) -> u64 {
        u64::from(self.file_offset) + u64::from(self.size)
    }

    /// The loaded payload, if any.
    #[inline]
    pub fn data(&self) -> Option<&[u8]> {
        self.data.as_deref()
    }

    /// Take the loaded payload, leaving `None`.
    #[inline]
    pub fn take_data(&mut self) -> Option<Vec<u8>> {
        self.data.take()
    }
}
