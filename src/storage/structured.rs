//! Structured binary I/O for the index files.
//!
//! All integers are little-endian. Strings are stored as a `u16` byte length
//! followed by UTF-8 bytes; longer strings are clamped to 65535 bytes on a
//! character boundary.

use std::io::{Read, Seek, SeekFrom, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::error::Result;
use crate::storage::traits::{StorageError, StorageInput, StorageOutput};

/// Largest byte length a short string can carry.
pub const MAX_SHORT_STR_LEN: usize = u16::MAX as usize;

/// Clamp `s` to at most `max_len` bytes without splitting a character.
pub fn clamp_str(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        return s;
    }
    let mut end = max_len;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// A structured file writer for binary data.
pub struct StructWriter<W: StorageOutput> {
    writer: W,
    position: u64,
}

impl<W: StorageOutput> StructWriter<W> {
    /// Create a new structured file writer.
    pub fn new(writer: W) -> Self {
        StructWriter {
            writer,
            position: 0,
        }
    }

    /// Write a u16 value (little-endian).
    pub fn write_u16(&mut self, value: u16) -> Result<()> {
        self.writer.write_u16::<LittleEndian>(value)?;
        self.position += 2;
        Ok(())
    }

    /// Write a u32 value (little-endian).
    pub fn write_u32(&mut self, value: u32) -> Result<()> {
        self.writer.write_u32::<LittleEndian>(value)?;
        self.position += 4;
        Ok(())
    }

    /// Write a u64 value (little-endian).
    pub fn write_u64(&mut self, value: u64) -> Result<()> {
        self.writer.write_u64::<LittleEndian>(value)?;
        self.position += 8;
        Ok(())
    }

    /// Write raw bytes without a length prefix.
    pub fn write_raw(&mut self, value: &[u8]) -> Result<()> {
        self.writer.write_all(value)?;
        self.position += value.len() as u64;
        Ok(())
    }

    /// Write a u16-length-prefixed string, clamped to [`MAX_SHORT_STR_LEN`] bytes.
    pub fn write_short_str(&mut self, value: &str) -> Result<()> {
        let value = clamp_str(value, MAX_SHORT_STR_LEN);
        self.write_u16(value.len() as u16)?;
        self.write_raw(value.as_bytes())
    }

    /// Write a sequence of u32 values with no length prefix.
    pub fn write_u32_slice(&mut self, values: &[u32]) -> Result<()> {
        for &value in values {
            self.writer.write_u32::<LittleEndian>(value)?;
        }
        self.position += values.len() as u64 * 4;
        Ok(())
    }

    /// Bytes written so far.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Flush and close the underlying output.
    pub fn close(mut self) -> Result<()> {
        self.writer.flush()?;
        self.writer.close()
    }
}

/// A structured file reader for binary data.
pub struct StructReader<R: StorageInput> {
    reader: R,
    position: u64,
    file_size: u64,
}

impl<R: StorageInput> StructReader<R> {
    /// Create a new structured file reader.
    pub fn new(reader: R) -> Result<Self> {
        let file_size = reader.size()?;
        Ok(StructReader {
            reader,
            position: 0,
            file_size,
        })
    }

    /// Read and check a 4-byte magic tag followed by a u32 version.
    pub fn read_header(&mut self, magic: &[u8; 4], version: u32) -> Result<()> {
        let found = self.read_raw(4)?;
        if found.as_slice() != magic {
            return Err(StorageError::Corrupt(format!(
                "expected magic {:?}, found {:?}",
                String::from_utf8_lossy(magic),
                String::from_utf8_lossy(&found)
            ))
            .into());
        }
        let found_version = self.read_u32()?;
        if found_version != version {
            return Err(StorageError::Corrupt(format!(
                "unsupported version {found_version} (expected {version})"
            ))
            .into());
        }
        Ok(())
    }

    /// Read a u16 value (little-endian).
    pub fn read_u16(&mut self) -> Result<u16> {
        let value = self.reader.read_u16::<LittleEndian>()?;
        self.position += 2;
        Ok(value)
    }

    /// Read a u32 value (little-endian).
    pub fn read_u32(&mut self) -> Result<u32> {
        let value = self.reader.read_u32::<LittleEndian>()?;
        self.position += 4;
        Ok(value)
    }

    /// Read a u64 value (little-endian).
    pub fn read_u64(&mut self) -> Result<u64> {
        let value = self.reader.read_u64::<LittleEndian>()?;
        self.position += 8;
        Ok(value)
    }

    /// Read exact number of raw bytes.
    pub fn read_raw(&mut self, length: usize) -> Result<Vec<u8>> {
        let mut bytes = vec![0u8; length];
        self.reader.read_exact(&mut bytes)?;
        self.position += length as u64;
        Ok(bytes)
    }

    /// Read a u16-length-prefixed UTF-8 string.
    pub fn read_short_str(&mut self) -> Result<String> {
        let length = self.read_u16()? as usize;
        let bytes = self.read_raw(length)?;
        String::from_utf8(bytes)
            .map_err(|e| StorageError::Corrupt(format!("invalid UTF-8: {e}")).into())
    }

    /// Read `count` consecutive u32 values.
    pub fn read_u32_vec(&mut self, count: usize) -> Result<Vec<u32>> {
        let mut values = vec![0u32; count];
        self.reader.read_u32_into::<LittleEndian>(&mut values)?;
        self.position += count as u64 * 4;
        Ok(values)
    }

    /// Move to an absolute byte offset.
    pub fn seek(&mut self, offset: u64) -> Result<()> {
        self.position = self.reader.seek(SeekFrom::Start(offset))?;
        Ok(())
    }

    /// Get current file position.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Get file size.
    pub fn size(&self) -> u64 {
        self.file_size
    }

    /// Check if we're at end of file.
    pub fn is_eof(&self) -> bool {
        self.position >= self.file_size
    }
}
