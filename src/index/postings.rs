//! The postings store: flat little-endian u32 document ids.

use crate::error::{BidxError, Result};
use crate::index::DocId;
use crate::index::lexicon::LexiconEntry;
use crate::sort::is_strictly_increasing;
use crate::storage::{
    Storage, StorageError, StorageInput, StorageOutput, StructReader, StructWriter,
};

/// Appends postings lists and tracks the byte offset of the next one.
pub struct PostingsWriter {
    writer: StructWriter<Box<dyn StorageOutput>>,
}

impl PostingsWriter {
    pub fn create(storage: &dyn Storage, name: &str) -> Result<Self> {
        let output = storage.create_output(name)?;
        Ok(PostingsWriter {
            writer: StructWriter::new(output),
        })
    }

    /// Byte offset where the next list will start.
    pub fn offset(&self) -> u64 {
        self.writer.position()
    }

    /// Write one list and return its starting offset.
    ///
    /// `docs` must be strictly increasing.
    pub fn write_list(&mut self, docs: &[DocId]) -> Result<u64> {
        if !is_strictly_increasing(docs) {
            return Err(BidxError::index("postings list is not strictly increasing"));
        }
        let offset = self.writer.position();
        self.writer.write_u32_slice(docs)?;
        Ok(offset)
    }

    pub fn close(self) -> Result<()> {
        self.writer.close()
    }
}

/// Reads postings lists by seeking to the offsets stored in the lexicon.
pub struct PostingsReader {
    reader: StructReader<Box<dyn StorageInput>>,
}

impl std::fmt::Debug for PostingsReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostingsReader")
            .field("size", &self.reader.size())
            .finish()
    }
}

impl PostingsReader {
    pub fn open(storage: &dyn Storage, name: &str) -> Result<Self> {
        let input = storage.open_input(name)?;
        Ok(PostingsReader {
            reader: StructReader::new(input)?,
        })
    }

    /// Size of the postings store in bytes.
    pub fn size(&self) -> u64 {
        self.reader.size()
    }

    /// Read the postings of one lexicon entry.
    pub fn read(&mut self, entry: &LexiconEntry) -> Result<Vec<DocId>> {
        self.read_at(entry.postings_offset, entry.doc_freq)
    }

    /// Read `count` ids starting at byte `offset`.
    pub fn read_at(&mut self, offset: u64, count: u32) -> Result<Vec<DocId>> {
        let end = offset.saturating_add(u64::from(count) * 4);
        if end > self.reader.size() {
            return Err(StorageError::Corrupt(format!(
                "postings range {offset}..{end} exceeds store size {}",
                self.reader.size()
            ))
            .into());
        }
        self.reader.seek(offset)?;
        self.reader.read_u32_vec(count as usize)
    }
}
