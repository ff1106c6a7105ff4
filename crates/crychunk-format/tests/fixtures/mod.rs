//! Synthetic chunk-file builder shared by the integration tests.

#![allow(dead_code)]

use std::io::{Cursor, Write};

use byteorder::{LittleEndian, WriteBytesExt};
use crychunk_format::{FileType, CRCH_SIGNATURE, FILE_SIGNATURE};

pub const GEOMETRY: u32 = FileType::GEOMETRY_RAW;
pub const ANIMATION: u32 = FileType::ANIMATION_RAW;

pub const LEGACY_MESH: u32 = 0xCCCC_0000;
pub const LEGACY_NODE: u32 = 0xCCCC_000B;
pub const LEGACY_CONTROLLER: u32 = 0xCCCC_000D;
pub const LEGACY_SOURCE_INFO: u32 = 0xCCCC_0013;

/// A legacy table entry.
#[derive(Debug, Clone, Copy)]
pub struct Legacy {
    pub chunk_type: u32,
    pub version: u32,
    pub id: u32,
    pub offset: u32,
}

/// A 0x746 table entry.
#[derive(Debug, Clone, Copy)]
pub struct Current {
    pub chunk_type: u32,
    pub version: u32,
    pub id: u32,
    pub size: u32,
    pub offset: u32,
}

/// Little-endian chunk-file writer with random access.
pub struct FileBuilder {
    cursor: Cursor<Vec<u8>>,
}

impl FileBuilder {
    /// Start a zero-filled file of `len` bytes.
    pub fn new(len: usize) -> Self {
        Self {
            cursor: Cursor::new(vec![0u8; len]),
        }
    }

    pub fn u32s(&mut self, at: u32, values: &[u32]) -> &mut Self {
        self.cursor.set_position(u64::from(at));
        for &value in values {
            self.cursor.write_u32::<LittleEndian>(value).unwrap();
        }
        self
    }

    pub fn bytes(&mut self, at: u32, bytes: &[u8]) -> &mut Self {
        self.cursor.set_position(u64::from(at));
        self.cursor.write_all(bytes).unwrap();
        self
    }

    pub fn signature(&mut self) -> &mut Self {
        self.bytes(0, FILE_SIGNATURE)
    }

    pub fn legacy_header(&mut self, version: u32, file_type: u32, table_offset: u32) -> &mut Self {
        self.signature().u32s(8, &[version, file_type, table_offset])
    }

    pub fn current_header(&mut self, chunk_count: u32, table_offset: u32) -> &mut Self {
        self.signature().u32s(8, &[0x746, chunk_count, table_offset])
    }

    /// Write the compact 16-byte 0x746 header.
    pub fn crch_header(&mut self, chunk_count: u32, table_offset: u32) -> &mut Self {
        self.bytes(0, CRCH_SIGNATURE).u32s(4, &[0x746, chunk_count, table_offset])
    }

    /// Write a legacy table: the chunk count followed by the entries.
    pub fn legacy_table(&mut self, at: u32, entries: &[Legacy]) -> &mut Self {
        self.u32s(at, &[entries.len() as u32]);
        for (i, e) in entries.iter().enumerate() {
            let pos = at + 4 + (i as u32) * 16;
            self.u32s(pos, &[e.chunk_type, e.version, e.id, e.offset]);
        }
        self
    }

    pub fn current_table(&mut self, at: u32, entries: &[Current]) -> &mut Self {
        for (i, e) in entries.iter().enumerate() {
            let pos = at + (i as u32) * 20;
            self.u32s(pos, &[e.chunk_type, e.version, e.id, e.size, e.offset]);
        }
        self
    }

    /// Write the 16-byte header some legacy chunks start with.
    pub fn embedded_header(&mut self, at: u32, chunk_type: u32, version: u32, id: u32) -> &mut Self {
        self.u32s(at, &[chunk_type, version, id, at])
    }

    pub fn build(&mut self) -> Vec<u8> {
        self.cursor.get_ref().clone()
    }
}

pub fn legacy(chunk_type: u32, version: u32, id: u32, offset: u32) -> Legacy {
    Legacy {
        chunk_type,
        version,
        id,
        offset,
    }
}

pub fn current(chunk_type: u32, version: u32, id: u32, size: u32, offset: u32) -> Current {
    Current {
        chunk_type,
        version,
        id,
        size,
        offset,
    }
}
