//! Removal of the legacy per-chunk header and payload loading.

use crychunk_common::endian::from_disk;
use crychunk_common::ByteSource;
use tracing::{debug, trace, warn};

use crate::entry::{chunk_contains_embedded_header, LegacyChunkHeader, BIG_ENDIAN_VERSION_FLAG};
use crate::{ChunkDescriptor, ChunkList, ChunkType, Error, Result};

/// Strip the embedded legacy header from every chunk that carries one.
///
/// Only meaningful for tables read from 0x744/0x745 files. Each affected chunk
/// has its header read and checked against its table entry (type, version and
/// id). Every chunk is validated before any is modified, so on error the table
/// is left exactly as it was. Returns the number of chunks stripped.
pub fn strip_chunk_headers<R, L>(reader: &mut R, chunks: &mut L) -> Result<usize>
where
    R: ByteSource,
    L: ChunkList + ?Sized,
{
    let mut stripped = Vec::new();

    for index in 0..chunks.len() {
        let chunk = chunks.chunk(index);
        if !chunk_contains_embedded_header(chunk.chunk_type, chunk.chunk_version) {
            continue;
        }
        let new_size = check_embedded_header(reader, chunk)?;
        stripped.push((index, new_size));
    }

    for &(index, new_size) in &stripped {
        let chunk = chunks.chunk_mut(index);
        chunk.file_offset += LegacyChunkHeader::SIZE as u32;
        chunk.size = new_size;
        if let Some(data) = chunk.data.as_mut() {
            data.drain(..LegacyChunkHeader::SIZE);
        }
        trace!(chunk_id = chunk.chunk_id, offset = chunk.file_offset, size = chunk.size, "stripped chunk header");
    }

    debug!(stripped = stripped.len(), total = chunks.len(), "stripped legacy chunk headers");
    Ok(stripped.len())
}

/// Validate one chunk's embedded header and return its size without it.
fn check_embedded_header<R: ByteSource>(reader: &mut R, chunk: &ChunkDescriptor) -> Result<u32> {
    let header_size = LegacyChunkHeader::SIZE as u32;
    let new_size = chunk
        .size
        .checked_sub(header_size)
        .ok_or(Error::ChunkTooSmallForHeader {
            chunk_id: chunk.chunk_id,
            size: chunk.size,
        })?;
    // A loaded payload must also hold the header it is about to lose.
    if let Some(data) = &chunk.data {
        if data.len().checked_sub(LegacyChunkHeader::SIZE).is_none() {
            return Err(Error::NegativeLengthChunk {
                chunk_id: chunk.chunk_id,
            });
        }
    }
    if chunk.file_offset.checked_add(header_size).is_none() {
        return Err(Error::CorruptChunkData {
            chunk_id: chunk.chunk_id,
            offset: u64::from(chunk.file_offset),
            size: u64::from(chunk.size),
            file_size: reader.size(),
        });
    }

    let read_failed = |source| Error::ChunkHeaderReadFailed {
        chunk_id: chunk.chunk_id,
        source,
    };
    reader.seek(u64::from(chunk.file_offset)).map_err(read_failed)?;
    let mut header: LegacyChunkHeader = reader.read_struct().map_err(read_failed)?;
    from_disk(&mut header);
    header.version &= !BIG_ENDIAN_VERSION_FLAG;

    let header_type = ChunkType::from_legacy(header.chunk_type);
    if header_type != Some(chunk.chunk_type)
        || header.version != chunk.chunk_version
        || header.id != chunk.chunk_id
    {
        warn!(
            chunk_id = chunk.chunk_id,
            header_type = header.chunk_type,
            header_version = header.version,
            header_id = header.id,
            "chunk header does not match chunk table"
        );
        return Err(Error::HeaderTableMismatch {
            chunk_id: chunk.chunk_id,
        });
    }
    // header.offset_in_file is not compared: shipped content disagrees with the table.

    Ok(new_size)
}

/// Read a chunk's `[file_offset, file_offset + size)` bytes into its `data`.
pub fn load_chunk_data<R: ByteSource>(reader: &mut R, chunk: &mut ChunkDescriptor) -> Result<()> {
    let chunk_id = chunk.chunk_id;
    let read_failed = |source| Error::ChunkDataReadFailed { chunk_id, source };

    let mut data = vec![0u8; chunk.size as usize];
    reader.seek(u64::from(chunk.file_offset)).map_err(read_failed)?;
    reader.read_exact(&mut data).map_err(read_failed)?;
    chunk.data = Some(data);
    Ok(())
}
