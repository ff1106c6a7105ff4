//! High-level chunk-file reading.

use std::fs::File;
use std::path::Path;

use crychunk_common::{ByteSource, MappedFile, MemoryReader};
use tracing::debug;

use crate::{
    load_chunk_data, parse_chunk_table, strip_chunk_headers, ChunkDescriptor, ChunkTableInfo,
    ChunkType, FormatVersion, Result,
};

/// Options controlling [`ChunkFile::read_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadOptions {
    /// Remove the embedded per-chunk header of 0x744/0x745 chunks.
    pub strip_legacy_headers: bool,
    /// Read every chunk's payload into memory.
    pub load_data: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            strip_legacy_headers: true,
            load_data: true,
        }
    }
}

/// A parsed chunk file: its table summary and chunk descriptors.
///
/// # Example
///
/// ```no_run
/// use crychunk_format::{ChunkFile, ChunkType};
///
/// let file = ChunkFile::open("objects/box.cgf")?;
/// println!("version {:?}, {} chunks", file.version(), file.len());
///
/// for mesh in file.iter_by_type(ChunkType::MESH) {
///     println!("mesh {} is {} bytes", mesh.chunk_id, mesh.size);
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct ChunkFile {
    info: ChunkTableInfo,
    chunks: Vec<ChunkDescriptor>,
}

impl ChunkFile {
    /// Open and read a chunk file with default options.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with(path, ReadOptions::default())
    }

    /// Open and read a chunk file.
    pub fn open_with<P: AsRef<Path>>(path: P, options: ReadOptions) -> Result<Self> {
        let file = File::open(path)?;
        let mapped = MappedFile::map(&file)?;
        Self::read_with(&mut mapped.reader(), options)
    }

    /// Read a chunk file held in memory with default options.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::read_with(&mut MemoryReader::new(data), ReadOptions::default())
    }

    /// Read a chunk file from any byte source.
    ///
    /// Payloads are loaded before legacy headers are stripped, so loaded data
    /// always matches the final `file_offset`/`size` of each chunk.
    pub fn read_with<R: ByteSource>(reader: &mut R, options: ReadOptions) -> Result<Self> {
        let mut chunks: Vec<ChunkDescriptor> = Vec::new();
        let info = parse_chunk_table(reader, &mut chunks)?;

        if options.load_data {
            for chunk in chunks.iter_mut() {
                load_chunk_data(reader, chunk)?;
            }
        }

        if options.strip_legacy_headers && info.version.is_legacy() {
            strip_chunk_headers(reader, &mut chunks)?;
        }

        debug!(version = ?info.version, chunks = chunks.len(), "read chunk file");
        Ok(Self { info, chunks })
    }

    pub fn info(&self) -> &ChunkTableInfo {
        &self.info
    }

    pub fn version(&self) -> FormatVersion {
        self.info.version
    }

    pub fn chunks(&self) -> &[ChunkDescriptor] {
        &self.chunks
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Find a chunk by its id.
    pub fn find_by_id(&self, chunk_id: u32) -> Option<&ChunkDescriptor> {
        self.chunks.iter().find(|chunk| chunk.chunk_id == chunk_id)
    }

    /// Iterate over all chunks of one type, in table order.
    pub fn iter_by_type(&self, chunk_type: ChunkType) -> impl Iterator<Item = &ChunkDescriptor> + '_ {
        self.chunks
            .iter()
            .filter(move |chunk| chunk.chunk_type == chunk_type)
    }

    /// Count the chunks of one type.
    pub fn count_of_type(&self, chunk_type: ChunkType) -> usize {
        self.iter_by_type(chunk_type).count()
    }

    /// Take ownership of the descriptors.
    pub fn into_chunks(self) -> Vec<ChunkDescriptor> {
        self.chunks
    }
}
