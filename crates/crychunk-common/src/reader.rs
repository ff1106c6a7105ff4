//! Seekable byte sources.
//!
//! [`ByteSource`] is the contract the chunk-file parser reads through. Two
//! backends are provided: [`MemoryReader`] over a byte slice (including a
//! memory-mapped file, see [`MappedFile`]) and [`StreamReader`] over any
//! `Read + Seek` stream such as an open [`File`].

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

use memmap2::Mmap;
use zerocopy::FromBytes;

use crate::{Error, Result};

/// A seekable, readable byte stream.
///
/// # Example
///
/// ```
/// use crychunk_common::{ByteSource, MemoryReader};
///
/// let data = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08];
/// let mut reader = MemoryReader::new(&data);
///
/// reader.seek(4).unwrap();
/// let mut buf = [0u8; 4];
/// reader.read_exact(&mut buf).unwrap();
/// assert_eq!(buf, [0x05, 0x06, 0x07, 0x08]);
/// ```
pub trait ByteSource {
    /// Total length of the source in bytes.
    fn size(&self) -> u64;

    /// Move the read position to the absolute offset `pos`.
    fn seek(&mut self, pos: u64) -> Result<()>;

    /// Fill `buf` completely from the current position.
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<()>;

    /// Read a fixed-size record with its native bit pattern.
    ///
    /// No byte-order conversion is applied; see [`crate::endian::from_disk`].
    fn read_struct<T: FromBytes>(&mut self) -> Result<T>
    where
        Self: Sized,
    {
        let size = std::mem::size_of::<T>();
        let mut bytes = vec![0u8; size];
        self.read_exact(&mut bytes)?;
        T::read_from_bytes(&bytes).map_err(|_| Error::UnexpectedEof {
            needed: size,
            available: bytes.len(),
        })
    }

    /// Read `count` consecutive fixed-size records in one bulk read.
    fn read_array<T: FromBytes>(&mut self, count: usize) -> Result<Vec<T>>
    where
        Self: Sized,
    {
        let elem_size = std::mem::size_of::<T>();
        let total_size = count.checked_mul(elem_size).ok_or(Error::UnexpectedEof {
            needed: usize::MAX,
            available: 0,
        })?;
        let mut bytes = vec![0u8; total_size];
        self.read_exact(&mut bytes)?;

        let mut result = Vec::with_capacity(count);
        for chunk in bytes.chunks_exact(elem_size) {
            let item = T::read_from_bytes(chunk).map_err(|_| Error::UnexpectedEof {
                needed: elem_size,
                available: chunk.len(),
            })?;
            result.push(item);
        }
        Ok(result)
    }
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    #[inline]
    fn size(&self) -> u64 {
        (**self).size()
    }

    #[inline]
    fn seek(&mut self, pos: u64) -> Result<()> {
        (**self).seek(pos)
    }

    #[inline]
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        (**self).read_exact(buf)
    }
}

/// A byte source over an in-memory buffer.
///
/// Seeking past the end of the buffer fails; reading zero bytes always succeeds.
#[derive(Debug, Clone)]
pub struct MemoryReader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> MemoryReader<'a> {
    /// Create a new reader from a byte slice.
    #[inline]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Get the current position in the buffer.
    #[inline]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Get the number of bytes remaining to read.
    #[inline]
    pub const fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    /// Get the underlying buffer.
    #[inline]
    pub const fn data(&self) -> &'a [u8] {
        self.data
    }
}

impl ByteSource for MemoryReader<'_> {
    #[inline]
    fn size(&self) -> u64 {
        self.data.len() as u64
    }

    fn seek(&mut self, pos: u64) -> Result<()> {
        if pos > self.size() {
            return Err(Error::SeekOutOfRange {
                position: pos,
                size: self.size(),
            });
        }
        self.position = pos as usize;
        Ok(())
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        if buf.is_empty() {
            return Ok(());
        }
        if self.remaining() < buf.len() {
            return Err(Error::UnexpectedEof {
                needed: buf.len(),
                available: self.remaining(),
            });
        }
        let end = self.position + buf.len();
        buf.copy_from_slice(&self.data[self.position..end]);
        self.position = end;
        Ok(())
    }
}

/// A byte source over a seekable stream.
///
/// The stream length is captured once at construction.
#[derive(Debug)]
pub struct StreamReader<R> {
    inner: R,
    size: u64,
}

/// A byte source backed by an open file.
pub type FileReader = StreamReader<File>;

impl StreamReader<File> {
    /// Open a file for reading.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let size = file.metadata()?.len();
        Ok(Self { inner: file, size })
    }
}

impl<R: Read + Seek> StreamReader<R> {
    /// Wrap a stream, measuring its length by seeking to the end.
    pub fn new(mut inner: R) -> Result<Self> {
        let size = inner.seek(SeekFrom::End(0))?;
        inner.seek(SeekFrom::Start(0))?;
        Ok(Self { inner, size })
    }

    /// Unwrap the underlying stream.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read + Seek> ByteSource for StreamReader<R> {
    #[inline]
    fn size(&self) -> u64 {
        self.size
    }

    fn seek(&mut self, pos: u64) -> Result<()> {
        self.inner.seek(SeekFrom::Start(pos))?;
        Ok(())
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        let needed = buf.len();
        self.inner.read_exact(buf).map_err(|e| match e.kind() {
            io::ErrorKind::UnexpectedEof => Error::UnexpectedEof {
                needed,
                available: 0,
            },
            _ => Error::Io(e),
        })
    }
}

/// A read-only memory-mapped file.
pub struct MappedFile {
    mmap: Mmap,
}

impl MappedFile {
    /// Map a file into memory.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::map(&file)
    }

    /// Map an already open file into memory.
    pub fn map(file: &File) -> Result<Self> {
        // SAFETY: the mapping is read-only and lives as long as `self`.
        let mmap = unsafe { Mmap::map(file)? };
        Ok(Self { mmap })
    }

    /// Get the mapped bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.mmap
    }

    /// Create a reader over the mapped bytes.
    #[inline]
    pub fn reader(&self) -> MemoryReader<'_> {
        MemoryReader::new(&self.mmap)
    }
}
