//! Raw chunk-table entries and the legacy embedded chunk header.

use crychunk_common::{SwapEndian, HOST_IS_BIG_ENDIAN};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::{ChunkDescriptor, ChunkType, Error, Result};

/// Bit of an entry's `version` field marking a big-endian payload.
pub const BIG_ENDIAN_VERSION_FLAG: u32 = 0x8000_0000;

/// Whether a chunk's payload byte order differs from the running host's.
#[inline]
pub fn payload_needs_swap(raw_version: u32) -> bool {
    let payload_is_big_endian = raw_version & BIG_ENDIAN_VERSION_FLAG != 0;
    payload_is_big_endian != HOST_IS_BIG_ENDIAN
}

/// Chunk-table entry of 0x744 and 0x745 files. Carries no size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct ChunkTableEntryLegacy {
    /// Legacy type code, see [`ChunkType::from_legacy`].
    pub chunk_type: u32,
    pub version: u32,
    pub id: u32,
    pub offset_in_file: u32,
}

impl ChunkTableEntryLegacy {
    pub const SIZE: usize = std::mem::size_of::<Self>();
}

impl SwapEndian for ChunkTableEntryLegacy {
    fn swap_endianness(&mut self) {
        self.chunk_type.swap_endianness();
        self.version.swap_endianness();
        self.id.swap_endianness();
        self.offset_in_file.swap_endianness();
    }
}

/// Chunk-table entry of 0x746 files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct ChunkTableEntryCurrent {
    /// Canonical type code.
    pub chunk_type: u32,
    pub version: u32,
    pub id: u32,
    pub size: u32,
    pub offset_in_file: u32,
}

impl ChunkTableEntryCurrent {
    pub const SIZE: usize = std::mem::size_of::<Self>();
}

impl SwapEndian for ChunkTableEntryCurrent {
    fn swap_endianness(&mut self) {
        self.chunk_type.swap_endianness();
        self.version.swap_endianness();
        self.id.swap_endianness();
        self.size.swap_endianness();
        self.offset_in_file.swap_endianness();
    }
}

/// Header that some legacy chunk types repeat at the start of their payload.
///
/// `offset_in_file` is self-reported and unreliable in shipped content, so it
/// is never compared against the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct LegacyChunkHeader {
    /// Legacy type code.
    pub chunk_type: u32,
    pub version: u32,
    pub id: u32,
    pub offset_in_file: u32,
}

impl LegacyChunkHeader {
    pub const SIZE: usize = std::mem::size_of::<Self>();
}

impl SwapEndian for LegacyChunkHeader {
    fn swap_endianness(&mut self) {
        self.chunk_type.swap_endianness();
        self.version.swap_endianness();
        self.id.swap_endianness();
        self.offset_in_file.swap_endianness();
    }
}

/// A raw table entry tagged with the format version it was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawChunkEntry {
    V0744(ChunkTableEntryLegacy),
    V0745(ChunkTableEntryLegacy),
    V0746(ChunkTableEntryCurrent),
}

impl RawChunkEntry {
    /// Convert into a canonical descriptor.
    ///
    /// Legacy entries have their type remapped and are returned with `size == 0`;
    /// sizes are inferred once the whole table is sorted.
    pub fn into_descriptor(self) -> Result<ChunkDescriptor> {
        match self {
            Self::V0744(entry) | Self::V0745(entry) => {
                let chunk_type = ChunkType::from_legacy(entry.chunk_type).ok_or(
                    Error::UnknownChunkType {
                        chunk_type: entry.chunk_type,
                        chunk_id: entry.id,
                    },
                )?;
                Ok(ChunkDescriptor {
                    chunk_type,
                    chunk_version: entry.version & !BIG_ENDIAN_VERSION_FLAG,
                    chunk_id: entry.id,
                    file_offset: entry.offset_in_file,
                    size: 0,
                    needs_byte_swap: payload_needs_swap(entry.version),
                    data: None,
                })
            }
            Self::V0746(entry) => Ok(ChunkDescriptor {
                chunk_type: ChunkType(entry.chunk_type),
                chunk_version: entry.version & !BIG_ENDIAN_VERSION_FLAG,
                chunk_id: entry.id,
                file_offset: entry.offset_in_file,
                size: entry.size,
                needs_byte_swap: payload_needs_swap(entry.version),
                data: None,
            }),
        }
    }
}

/// Whether a legacy chunk of this (canonical type, version) starts with a
/// [`LegacyChunkHeader`].
pub fn chunk_contains_embedded_header(chunk_type: ChunkType, chunk_version: u32) -> bool {
    match chunk_type {
        ChunkType::SOURCE_INFO => false,
        ChunkType::CONTROLLER => !matches!(
            chunk_version,
            0x827 | 0x828 | 0x829 | 0x830 | 0x831 | 0x832 | 0x833
        ),
        ChunkType::BONE_NAME_LIST => chunk_version != 0x745,
        ChunkType::MESH_MORPH_TARGET | ChunkType::BONE_INITIAL_POS => chunk_version != 0x001,
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_sizes() {
        assert_eq!(ChunkTableEntryLegacy::SIZE, 16);
        assert_eq!(ChunkTableEntryCurrent::SIZE, 20);
        assert_eq!(LegacyChunkHeader::SIZE, 16);
    }

    #[test]
    fn test_legacy_conversion_remaps_and_masks() {
        let entry = ChunkTableEntryLegacy {
            chunk_type: 0xCCCC_000B,
            version: 0x824 | BIG_ENDIAN_VERSION_FLAG,
            id: 7,
            offset_in_file: 128,
        };
        let desc = RawChunkEntry::V0745(entry).into_descriptor().unwrap();

        assert_eq!(desc.chunk_type, ChunkType::NODE);
        assert_eq!(desc.chunk_version, 0x824);
        assert_eq!(desc.chunk_id, 7);
        assert_eq!(desc.file_offset, 128);
        assert_eq!(desc.size, 0);
        assert_eq!(desc.needs_byte_swap, !HOST_IS_BIG_ENDIAN);
        assert!(desc.data.is_none());
    }

    #[test]
    fn test_unknown_legacy_type_is_rejected() {
        let entry = ChunkTableEntryLegacy {
            chunk_type: 0x1234,
            id: 3,
            ..Default::default()
        };
        assert!(matches!(
            RawChunkEntry::V0744(entry).into_descriptor(),
            Err(Error::UnknownChunkType { chunk_type: 0x1234, chunk_id: 3 })
        ));
    }

    #[test]
    fn test_current_conversion_keeps_type() {
        let entry = ChunkTableEntryCurrent {
            chunk_type: 0xCCCC_0000,
            version: 0x800,
            id: 1,
            size: 10,
            offset_in_file: 64,
        };
        let desc = RawChunkEntry::V0746(entry).into_descriptor().unwrap();

        assert_eq!(desc.chunk_type, ChunkType(0xCCCC_0000));
        assert_eq!(desc.size, 10);
        assert_eq!(desc.needs_byte_swap, HOST_IS_BIG_ENDIAN);
    }

    #[test]
    fn test_embedded_header_predicate() {
        assert!(!chunk_contains_embedded_header(ChunkType::SOURCE_INFO, 0));
        assert!(!chunk_contains_embedded_header(ChunkType::CONTROLLER, 0x827));
        assert!(!chunk_contains_embedded_header(ChunkType::CONTROLLER, 0x833));
        assert!(chunk_contains_embedded_header(ChunkType::CONTROLLER, 0x826));
        assert!(!chunk_contains_embedded_header(ChunkType::BONE_NAME_LIST, 0x745));
        assert!(chunk_contains_embedded_header(ChunkType::BONE_NAME_LIST, 0x744));
        assert!(!chunk_contains_embedded_header(ChunkType::MESH_MORPH_TARGET, 0x001));
        assert!(!chunk_contains_embedded_header(ChunkType::BONE_INITIAL_POS, 0x001));
        assert!(chunk_contains_embedded_header(ChunkType::MESH, 0x800));
    }
}
