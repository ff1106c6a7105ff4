//! Chunk-file header records.
//!
//! `CryTek` headers are 20 bytes and share their first 12: the 8-byte
//! signature followed by the `u32` format version. 0x746 files may instead use
//! the compact 16-byte `CrCh` header.
//!
//! ```text
//! offset  legacy (0x744/0x745)     current (0x746)          CrCh (0x746)
//!  0      signature[8]             signature[8]             signature[4]
//!  4                                                        version
//!  8      version                  version                  chunk_count
//! 12      file_type                chunk_count              chunk_table_offset
//! 16      chunk_table_offset       chunk_table_offset
//! ```

use crychunk_common::SwapEndian;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

/// Signature at the start of `CryTek` chunk files.
pub const FILE_SIGNATURE: &[u8; 8] = b"CryTek\0\0";

/// Signature of the compact 0x746 header.
pub const CRCH_SIGNATURE: &[u8; 4] = b"CrCh";

/// Which header family a file starts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeaderSignature {
    /// `CryTek\0\0`, version at byte 8.
    CryTek,
    /// `CrCh`, version at byte 4.
    CrCh,
}

impl HeaderSignature {
    /// Identify the header family from the first 8 bytes of a file.
    pub fn detect(bytes: &[u8; 8]) -> Option<Self> {
        if bytes == FILE_SIGNATURE {
            Some(Self::CryTek)
        } else if bytes.starts_with(CRCH_SIGNATURE) {
            Some(Self::CrCh)
        } else {
            None
        }
    }
}

/// On-disk format version of a chunk file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum FormatVersion {
    /// 0x744: legacy table, no per-chunk sizes.
    V0744,
    /// 0x745: legacy table, no per-chunk sizes.
    V0745,
    /// 0x746: current table with explicit sizes.
    V0746,
}

impl FormatVersion {
    /// Map a raw header version to a known format version.
    pub fn from_u32(value: u32) -> Option<Self> {
        match value {
            0x744 => Some(Self::V0744),
            0x745 => Some(Self::V0745),
            0x746 => Some(Self::V0746),
            _ => None,
        }
    }

    /// The raw header value.
    pub fn as_u32(self) -> u32 {
        match self {
            Self::V0744 => 0x744,
            Self::V0745 => 0x745,
            Self::V0746 => 0x746,
        }
    }

    /// Whether this version uses the legacy table layout.
    pub fn is_legacy(self) -> bool {
        matches!(self, Self::V0744 | Self::V0745)
    }
}

/// Content type declared by a legacy header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum FileType {
    Geometry,
    Animation,
}

impl FileType {
    /// Raw value of [`FileType::Geometry`].
    pub const GEOMETRY_RAW: u32 = 0xFFFF_0000;
    /// Raw value of [`FileType::Animation`].
    pub const ANIMATION_RAW: u32 = 0xFFFF_0001;

    pub fn from_u32(value: u32) -> Option<Self> {
        match value {
            Self::GEOMETRY_RAW => Some(Self::Geometry),
            Self::ANIMATION_RAW => Some(Self::Animation),
            _ => None,
        }
    }

    pub fn as_u32(self) -> u32 {
        match self {
            Self::Geometry => Self::GEOMETRY_RAW,
            Self::Animation => Self::ANIMATION_RAW,
        }
    }
}

/// Signature and version, common to both header families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct FileHeaderPrefix {
    pub signature: [u8; 8],
    pub version: u32,
}

impl FileHeaderPrefix {
    pub fn has_valid_signature(&self) -> bool {
        &self.signature == FILE_SIGNATURE
    }
}

impl SwapEndian for FileHeaderPrefix {
    fn swap_endianness(&mut self) {
        self.version.swap_endianness();
    }
}

/// Header of 0x744 and 0x745 files.
///
/// The chunk count is not part of the header: it is the first `u32` at
/// `chunk_table_offset`, immediately followed by the entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct FileHeaderLegacy {
    pub signature: [u8; 8],
    pub version: u32,
    /// Raw [`FileType`] value.
    pub file_type: u32,
    pub chunk_table_offset: u32,
}

impl FileHeaderLegacy {
    pub const SIZE: usize = std::mem::size_of::<Self>();

    pub fn has_valid_signature(&self) -> bool {
        &self.signature == FILE_SIGNATURE
    }
}

impl SwapEndian for FileHeaderLegacy {
    fn swap_endianness(&mut self) {
        self.version.swap_endianness();
        self.file_type.swap_endianness();
        self.chunk_table_offset.swap_endianness();
    }
}

/// Header of 0x746 files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct FileHeaderCurrent {
    pub signature: [u8; 8],
    pub version: u32,
    pub chunk_count: u32,
    pub chunk_table_offset: u32,
}

impl FileHeaderCurrent {
    pub const SIZE: usize = std::mem::size_of::<Self>();

    pub fn has_valid_signature(&self) -> bool {
        &self.signature == FILE_SIGNATURE
    }
}

impl SwapEndian for FileHeaderCurrent {
    fn swap_endianness(&mut self) {
        self.version.swap_endianness();
        self.chunk_count.swap_endianness();
        self.chunk_table_offset.swap_endianness();
    }
}

/// Compact header of 0x746 files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct FileHeaderCrCh {
    pub signature: [u8; 4],
    pub version: u32,
    pub chunk_count: u32,
    pub chunk_table_offset: u32,
}

impl FileHeaderCrCh {
    pub const SIZE: usize = std::mem::size_of::<Self>();

    pub fn has_valid_signature(&self) -> bool {
        &self.signature == CRCH_SIGNATURE
    }
}

impl SwapEndian for FileHeaderCrCh {
    fn swap_endianness(&mut self) {
        self.version.swap_endianness();
        self.chunk_count.swap_endianness();
        self.chunk_table_offset.swap_endianness();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_sizes() {
        assert_eq!(std::mem::size_of::<FileHeaderPrefix>(), 12);
        assert_eq!(FileHeaderLegacy::SIZE, 20);
        assert_eq!(FileHeaderCurrent::SIZE, 20);
        assert_eq!(FileHeaderCrCh::SIZE, 16);
    }

    #[test]
    fn test_detect_signature() {
        assert_eq!(HeaderSignature::detect(FILE_SIGNATURE), Some(HeaderSignature::CryTek));
        assert_eq!(HeaderSignature::detect(b"CrCh\x46\x07\0\0"), Some(HeaderSignature::CrCh));
        assert_eq!(HeaderSignature::detect(b"CryTek\0X"), None);
        assert_eq!(HeaderSignature::detect(b"#ivo\0\0\0\0"), None);
    }

    #[test]
    fn test_signature_is_case_sensitive() {
        let mut header = FileHeaderLegacy {
            signature: *FILE_SIGNATURE,
            version: 0x744,
            file_type: FileType::GEOMETRY_RAW,
            chunk_table_offset: 20,
        };
        assert!(header.has_valid_signature());

        header.signature = *b"CRYTEK\0\0";
        assert!(!header.has_valid_signature());

        header.signature = *b"CryTek\0X";
        assert!(!header.has_valid_signature());
    }

    #[test]
    fn test_swap_leaves_signature_alone() {
        let mut header = FileHeaderCurrent {
            signature: *FILE_SIGNATURE,
            version: 0x746,
            chunk_count: 2,
            chunk_table_offset: 94,
        };
        header.swap_endianness();
        assert_eq!(&header.signature, FILE_SIGNATURE);
        assert_eq!(header.version, 0x4607_0000);
        assert_eq!(header.chunk_count, 0x0200_0000);
    }

    #[test]
    fn test_crch_header() {
        let mut header = FileHeaderCrCh {
            signature: *CRCH_SIGNATURE,
            version: 0x746,
            chunk_count: 1,
            chunk_table_offset: 60,
        };
        assert!(header.has_valid_signature());

        header.swap_endianness();
        assert_eq!(&header.signature, CRCH_SIGNATURE);
        assert_eq!(header.chunk_table_offset, 0x3C00_0000);

        header.signature = *b"CRCH";
        assert!(!header.has_valid_signature());
    }

    #[test]
    fn test_version_mapping() {
        assert_eq!(FormatVersion::from_u32(0x745), Some(FormatVersion::V0745));
        assert_eq!(FormatVersion::from_u32(0x747), None);
        assert!(FormatVersion::V0744.is_legacy());
        assert!(!FormatVersion::V0746.is_legacy());
        assert_eq!(FormatVersion::V0746.as_u32(), 0x746);
    }

    #[test]
    fn test_file_type_mapping() {
        assert_eq!(FileType::from_u32(0xFFFF_0001), Some(FileType::Animation));
        assert_eq!(FileType::from_u32(0), None);
        assert_eq!(FileType::Geometry.as_u32(), 0xFFFF_0000);
    }
}
