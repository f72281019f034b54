//! Spill runs: sorted, duplicate-free `(term, doc)` pairs on disk.
//!
//! A run has no header. Each record is a u16-length-prefixed term followed by
//! a u32 document id, little-endian.

use crate::error::{BidxError, Result};
use crate::index::TermDoc;
use crate::storage::{Storage, StorageInput, StorageOutput, StructReader, StructWriter};

/// Name of the run file with the given id.
pub fn run_file_name(id: usize) -> String {
    format!("run_{id}.bin")
}

/// Writes one run.
pub struct RunWriter {
    writer: StructWriter<Box<dyn StorageOutput>>,
    pairs: u64,
}

impl RunWriter {
    pub fn create(storage: &dyn Storage, name: &str) -> Result<Self> {
        let output = storage.create_output(name)?;
        Ok(RunWriter {
            writer: StructWriter::new(output),
            pairs: 0,
        })
    }

    /// Append a pair. Callers supply pairs in ascending order.
    pub fn write_pair(&mut self, pair: &TermDoc) -> Result<()> {
        self.writer.write_short_str(&pair.term)?;
        self.writer.write_u32(pair.doc)?;
        self.pairs += 1;
        Ok(())
    }

    /// Close the run and return the number of pairs written.
    pub fn finish(self) -> Result<u64> {
        let pairs = self.pairs;
        self.writer.close()?;
        Ok(pairs)
    }
}

/// Write a sorted, deduplicated chunk as a complete run.
pub fn write_run(storage: &dyn Storage, name: &str, pairs: &[TermDoc]) -> Result<u64> {
    let mut writer = RunWriter::create(storage, name)?;
    for pair in pairs {
        writer.write_pair(pair)?;
    }
    writer.finish()
}

/// Streams the pairs of one run.
///
/// A record cut short by the end of the file is reported as an error.
pub struct RunReader {
    name: String,
    reader: StructReader<Box<dyn StorageInput>>,
    done: bool,
}

impl RunReader {
    pub fn open(storage: &dyn Storage, name: &str) -> Result<Self> {
        let input = storage.open_input(name)?;
        Ok(RunReader {
            name: name.to_string(),
            reader: StructReader::new(input)?,
            done: false,
        })
    }

    /// Name of the underlying run file.
    pub fn name(&self) -> &str {
        &self.name
    }

    fn read_pair(&mut self) -> Result<TermDoc> {
        let term = self.reader.read_short_str()?;
        let doc = self.reader.read_u32()?;
        Ok(TermDoc { term, doc })
    }
}

impl Iterator for RunReader {
    type Item = Result<TermDoc>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.reader.is_eof() {
            return None;
        }
        match self.read_pair() {
            Ok(pair) => Some(Ok(pair)),
            Err(e) => {
                self.done = true;
                Some(Err(BidxError::storage(format!(
                    "corrupt run {}: {e}",
                    self.name
                ))))
            }
        }
    }
}
