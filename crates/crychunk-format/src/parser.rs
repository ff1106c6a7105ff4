//! Chunk-table parser.
//!
//! Reads the file header, decodes the version-specific table into canonical
//! [`ChunkDescriptor`]s, infers legacy sizes and validates every chunk against
//! the length of the byte source. On failure the output list is cleared.

use crychunk_common::endian::from_disk;
use crychunk_common::ByteSource;
use tracing::{debug, trace, warn};
use zerocopy::FromBytes;

use crate::entry::{ChunkTableEntryCurrent, ChunkTableEntryLegacy, RawChunkEntry};
use crate::header::{
    FileHeaderCrCh, FileHeaderCurrent, FileHeaderLegacy, FileHeaderPrefix, HeaderSignature,
};
use crate::{ChunkList, Error, FileType, FormatVersion, Result};

/// Largest chunk count accepted in a 0x744/0x745 file.
pub const MAX_LEGACY_CHUNK_COUNT: u32 = 1_000_000;

/// Largest chunk count accepted in a 0x746 file.
pub const MAX_CURRENT_CHUNK_COUNT: u32 = 10_000_000;

/// Summary of a successfully parsed chunk table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ChunkTableInfo {
    pub version: FormatVersion,
    /// Only present in legacy headers.
    pub file_type: Option<FileType>,
    pub chunk_table_offset: u32,
    pub chunk_count: u32,
}

/// Parse the chunk table of any supported format version.
///
/// The header version selects [`parse_legacy_table`] or [`parse_current_table`].
pub fn parse_chunk_table<R, L>(reader: &mut R, out: &mut L) -> Result<ChunkTableInfo>
where
    R: ByteSource,
    L: ChunkList + ?Sized,
{
    out.clear();
    let version = detect_version(reader)?;
    debug!(?version, "detected chunk file version");

    if version.is_legacy() {
        parse_legacy_table(reader, out)
    } else {
        parse_current_table(reader, out)
    }
}

/// Read the header signature and version.
///
/// `CryTek` files may carry any supported version; `CrCh` files are always 0x746.
pub fn detect_version<R: ByteSource>(reader: &mut R) -> Result<FormatVersion> {
    let signature = read_signature(reader)?;
    let version = match signature {
        HeaderSignature::CryTek => {
            reader.seek(0).map_err(Error::HeaderReadFailed)?;
            let mut prefix: FileHeaderPrefix =
                reader.read_struct().map_err(Error::HeaderReadFailed)?;
            from_disk(&mut prefix);
            prefix.version
        }
        HeaderSignature::CrCh => read_current_header(reader, signature)?.version,
    };

    match (signature, FormatVersion::from_u32(version)) {
        (HeaderSignature::CryTek, Some(version)) => Ok(version),
        (HeaderSignature::CrCh, Some(FormatVersion::V0746)) => Ok(FormatVersion::V0746),
        _ => Err(Error::UnsupportedVersion(version)),
    }
}

/// Identify the header family from the first 8 bytes of the source.
fn read_signature<R: ByteSource>(reader: &mut R) -> Result<HeaderSignature> {
    reader.seek(0).map_err(Error::HeaderReadFailed)?;
    let magic: [u8; 8] = reader.read_struct().map_err(Error::HeaderReadFailed)?;
    HeaderSignature::detect(&magic).ok_or(Error::BadSignature { actual: magic })
}

/// Version and table location of a 0x746 header in either form.
struct CurrentHeader {
    version: u32,
    chunk_count: u32,
    chunk_table_offset: u32,
}

fn read_current_header<R: ByteSource>(
    reader: &mut R,
    signature: HeaderSignature,
) -> Result<CurrentHeader> {
    reader.seek(0).map_err(Error::HeaderReadFailed)?;
    let header = match signature {
        HeaderSignature::CryTek => {
            let mut header: FileHeaderCurrent =
                reader.read_struct().map_err(Error::HeaderReadFailed)?;
            from_disk(&mut header);
            CurrentHeader {
                version: header.version,
                chunk_count: header.chunk_count,
                chunk_table_offset: header.chunk_table_offset,
            }
        }
        HeaderSignature::CrCh => {
            let mut header: FileHeaderCrCh =
                reader.read_struct().map_err(Error::HeaderReadFailed)?;
            from_disk(&mut header);
            CurrentHeader {
                version: header.version,
                chunk_count: header.chunk_count,
                chunk_table_offset: header.chunk_table_offset,
            }
        }
    };
    Ok(header)
}

/// Parse a 0x744 or 0x745 chunk table.
///
/// Entries are remapped into the canonical type space, sorted by offset and
/// sized by the distance to the next chunk.
pub fn parse_legacy_table<R, L>(reader: &mut R, out: &mut L) -> Result<ChunkTableInfo>
where
    R: ByteSource,
    L: ChunkList + ?Sized,
{
    out.clear();
    let result = read_legacy_table(reader, out);
    if result.is_err() {
        out.clear();
    }
    result
}

/// Parse a 0x746 chunk table.
pub fn parse_current_table<R, L>(reader: &mut R, out: &mut L) -> Result<ChunkTableInfo>
where
    R: ByteSource,
    L: ChunkList + ?Sized,
{
    out.clear();
    let result = read_current_table(reader, out);
    if result.is_err() {
        out.clear();
    }
    result
}

fn read_legacy_table<R, L>(reader: &mut R, out: &mut L) -> Result<ChunkTableInfo>
where
    R: ByteSource,
    L: ChunkList + ?Sized,
{
    let signature = read_signature(reader)?;
    if signature == HeaderSignature::CrCh {
        let header = read_current_header(reader, signature)?;
        return Err(Error::UnsupportedVersion(header.version));
    }

    reader.seek(0).map_err(Error::HeaderReadFailed)?;
    let mut header: FileHeaderLegacy = reader.read_struct().map_err(Error::HeaderReadFailed)?;
    from_disk(&mut header);

    let version = match FormatVersion::from_u32(header.version) {
        Some(version) if version.is_legacy() => version,
        _ => return Err(Error::UnsupportedVersion(header.version)),
    };
    let file_type =
        FileType::from_u32(header.file_type).ok_or(Error::UnsupportedFileType(header.file_type))?;

    let table_offset = u64::from(header.chunk_table_offset);
    reader.seek(table_offset).map_err(Error::ChunkCountReadFailed)?;
    let mut chunk_count: u32 = reader.read_struct().map_err(Error::ChunkCountReadFailed)?;
    from_disk(&mut chunk_count);

    if chunk_count > MAX_LEGACY_CHUNK_COUNT {
        return Err(Error::InvalidChunkCount {
            count: chunk_count,
            max: MAX_LEGACY_CHUNK_COUNT,
        });
    }

    let info = ChunkTableInfo {
        version,
        file_type: Some(file_type),
        chunk_table_offset: header.chunk_table_offset,
        chunk_count,
    };
    debug!(?file_type, chunk_count, table_offset, "read legacy chunk file header");

    if chunk_count == 0 {
        return Ok(info);
    }

    let count = chunk_count as usize;
    let file_size = reader.size();

    let entries_offset = table_offset + std::mem::size_of::<u32>() as u64;
    let entries: Vec<ChunkTableEntryLegacy> = read_entries(reader, entries_offset, count)?;

    out.create(count);
    for (index, mut entry) in entries.into_iter().enumerate() {
        from_disk(&mut entry);
        let raw = match version {
            FormatVersion::V0744 => RawChunkEntry::V0744(entry),
            _ => RawChunkEntry::V0745(entry),
        };
        *out.chunk_mut(index) = raw.into_descriptor()?;
    }

    out.sort_by_offset();
    infer_legacy_sizes(out, header.chunk_table_offset, file_size)?;
    validate_chunk_bounds(out, file_size)?;

    Ok(info)
}

fn read_current_table<R, L>(reader: &mut R, out: &mut L) -> Result<ChunkTableInfo>
where
    R: ByteSource,
    L: ChunkList + ?Sized,
{
    let signature = read_signature(reader)?;
    let header = read_current_header(reader, signature)?;

    if FormatVersion::from_u32(header.version) != Some(FormatVersion::V0746) {
        return Err(Error::UnsupportedVersion(header.version));
    }

    if header.chunk_count > MAX_CURRENT_CHUNK_COUNT {
        return Err(Error::InvalidChunkCount {
            count: header.chunk_count,
            max: MAX_CURRENT_CHUNK_COUNT,
        });
    }

    let info = ChunkTableInfo {
        version: FormatVersion::V0746,
        file_type: None,
        chunk_table_offset: header.chunk_table_offset,
        chunk_count: header.chunk_count,
    };
    debug!(
        chunk_count = header.chunk_count,
        table_offset = header.chunk_table_offset,
        ?signature,
        "read chunk file header"
    );

    if header.chunk_count == 0 {
        return Ok(info);
    }

    let count = header.chunk_count as usize;
    let file_size = reader.size();

    let entries: Vec<ChunkTableEntryCurrent> =
        read_entries(reader, u64::from(header.chunk_table_offset), count)?;

    out.create(count);
    for (index, mut entry) in entries.into_iter().enumerate() {
        from_disk(&mut entry);
        *out.chunk_mut(index) = RawChunkEntry::V0746(entry).into_descriptor()?;
    }

    validate_chunk_bounds(out, file_size)?;

    Ok(info)
}

/// Bulk-read `count` raw entries starting at `offset`.
///
/// The table extent is checked against the source length before allocating.
fn read_entries<R: ByteSource, T: FromBytes>(
    reader: &mut R,
    offset: u64,
    count: usize,
) -> Result<Vec<T>> {
    let table_len = (count as u64) * std::mem::size_of::<T>() as u64;
    let file_size = reader.size();
    if offset.saturating_add(table_len) > file_size {
        return Err(Error::ChunkTableReadFailed(
            crychunk_common::Error::UnexpectedEof {
                needed: table_len as usize,
                available: file_size.saturating_sub(offset) as usize,
            },
        ));
    }

    reader.seek(offset).map_err(Error::ChunkTableReadFailed)?;
    reader.read_array(count).map_err(Error::ChunkTableReadFailed)
}

/// Size each chunk of an offset-sorted legacy table.
///
/// A chunk ends where the next one starts. The last chunk ends at the end of
/// the file when the table precedes the first chunk, and at the table otherwise.
fn infer_legacy_sizes<L>(chunks: &mut L, chunk_table_offset: u32, file_size: u64) -> Result<()>
where
    L: ChunkList + ?Sized,
{
    let count = chunks.len();
    if count == 0 {
        return Ok(());
    }

    let end_of_chunk_data = if chunk_table_offset < chunks.chunk(0).file_offset {
        file_size
    } else {
        u64::from(chunk_table_offset)
    };

    for index in 0..count {
        let next_offset = if index + 1 < count {
            u64::from(chunks.chunk(index + 1).file_offset)
        } else {
            end_of_chunk_data
        };

        let chunk = chunks.chunk_mut(index);
        let offset = u64::from(chunk.file_offset);
        let size = next_offset
            .checked_sub(offset)
            .and_then(|size| u32::try_from(size).ok());

        match size {
            Some(size) => {
                chunk.size = size;
                trace!(chunk_id = chunk.chunk_id, offset, size, "inferred chunk size");
            }
            None => {
                warn!(chunk_id = chunk.chunk_id, offset, next_offset, "chunk lies beyond end of chunk data");
                return Err(Error::CorruptChunkData {
                    chunk_id: chunk.chunk_id,
                    offset,
                    size: 0,
                    file_size,
                });
            }
        }
    }

    Ok(())
}

/// Check that every chunk lies inside the byte source.
fn validate_chunk_bounds<L>(chunks: &L, file_size: u64) -> Result<()>
where
    L: ChunkList + ?Sized,
{
    for index in 0..chunks.len() {
        let chunk = chunks.chunk(index);
        if chunk.end_offset() > file_size {
            warn!(
                chunk_id = chunk.chunk_id,
                offset = chunk.file_offset,
                size = chunk.size,
                file_size,
                "chunk exceeds file size"
            );
            return Err(Error::CorruptChunkData {
                chunk_id: chunk.chunk_id,
                offset: u64::from(chunk.file_offset),
                size: u64::from(chunk.size),
                file_size,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crychunk_common::MemoryReader;

    use super::*;
    use crate::header::{CRCH_SIGNATURE, FILE_SIGNATURE};
    use crate::ChunkDescriptor;

    fn prefix(version: u32) -> Vec<u8> {
        let mut data = FILE_SIGNATURE.to_vec();
        data.extend_from_slice(&version.to_le_bytes());
        data
    }

    #[test]
    fn test_detect_version() {
        let mut data = prefix(0x746);
        data.extend_from_slice(&[0u8; 8]);
        let mut reader = MemoryReader::new(&data);
        assert_eq!(detect_version(&mut reader).unwrap(), FormatVersion::V0746);
    }

    fn crch_header(version: u32) -> Vec<u8> {
        let mut data = CRCH_SIGNATURE.to_vec();
        for value in [version, 0, 16] {
            data.extend_from_slice(&value.to_le_bytes());
        }
        data
    }

    #[test]
    fn test_detect_crch_version() {
        let data = crch_header(0x746);
        let mut reader = MemoryReader::new(&data);
        assert_eq!(detect_version(&mut reader).unwrap(), FormatVersion::V0746);
    }

    #[test]
    fn test_crch_header_only_carries_current_version() {
        let data = crch_header(0x744);
        let mut reader = MemoryReader::new(&data);
        assert!(matches!(
            detect_version(&mut reader),
            Err(Error::UnsupportedVersion(0x744))
        ));
    }

    #[test]
    fn test_legacy_entry_point_rejects_crch() {
        let data = crch_header(0x746);
        let mut reader = MemoryReader::new(&data);
        let mut chunks: Vec<ChunkDescriptor> = Vec::new();
        assert!(matches!(
            parse_legacy_table(&mut reader, &mut chunks),
            Err(Error::UnsupportedVersion(0x746))
        ));
    }

    #[test]
    fn test_truncated_crch_header() {
        let data = crch_header(0x746);
        let mut reader = MemoryReader::new(&data[..12]);
        assert!(matches!(
            detect_version(&mut reader),
            Err(Error::HeaderReadFailed(_))
        ));
    }

    #[test]
    fn test_truncated_header() {
        let data = FILE_SIGNATURE.to_vec();
        let mut reader = MemoryReader::new(&data);
        let mut chunks: Vec<ChunkDescriptor> = Vec::new();
        assert!(matches!(
            parse_chunk_table(&mut reader, &mut chunks),
            Err(Error::HeaderReadFailed(_))
        ));
    }

    #[test]
    fn test_unknown_version() {
        let mut data = prefix(0x747);
        data.extend_from_slice(&[0u8; 8]);
        let mut reader = MemoryReader::new(&data);
        let mut chunks: Vec<ChunkDescriptor> = vec![ChunkDescriptor::default()];
        assert!(matches!(
            parse_chunk_table(&mut reader, &mut chunks),
            Err(Error::UnsupportedVersion(0x747))
        ));
        assert!(chunks.is_empty());
    }

    #[test]
    fn test_legacy_entry_point_rejects_current_version() {
        let mut data = prefix(0x746);
        data.extend_from_slice(&[0u8; 8]);
        let mut reader = MemoryReader::new(&data);
        let mut chunks: Vec<ChunkDescriptor> = Vec::new();
        assert!(matches!(
            parse_legacy_table(&mut reader, &mut chunks),
            Err(Error::UnsupportedVersion(0x746))
        ));
    }

    #[test]
    fn test_infer_sizes_rejects_chunk_past_table() {
        let mut chunks = vec![
            ChunkDescriptor {
                file_offset: 20,
                ..Default::default()
            },
            ChunkDescriptor {
                chunk_id: 2,
                file_offset: 80,
                ..Default::default()
            },
        ];
        // Table at 50 sits between the chunks, so the last one has no room.
        assert!(matches!(
            infer_legacy_sizes(&mut chunks, 50, 200),
            Err(Error::CorruptChunkData { chunk_id: 2, .. })
        ));
    }
}
