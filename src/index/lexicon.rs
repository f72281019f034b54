//! The lexicon: every distinct term with the location of its postings.

use log::debug;

use crate::error::{BidxError, Result};
use crate::index::{FORMAT_VERSION, LEXICON_MAGIC};
use crate::storage::{Storage, StorageError, StorageOutput, StructReader, StructWriter};

/// One lexicon entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexiconEntry {
    /// The indexed term.
    pub term: String,
    /// Byte offset of the first posting in `postings.bin`.
    pub postings_offset: u64,
    /// Number of documents containing the term.
    pub doc_freq: u32,
}

impl LexiconEntry {
    pub fn new<S: Into<String>>(term: S, postings_offset: u64, doc_freq: u32) -> Self {
        LexiconEntry {
            term: term.into(),
            postings_offset,
            doc_freq,
        }
    }
}

/// A sorted, immutable term dictionary searched by binary search.
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    entries: Vec<LexiconEntry>,
}

impl Lexicon {
    /// Build a lexicon from entries that must be strictly increasing by term.
    pub fn from_entries(entries: Vec<LexiconEntry>) -> Result<Self> {
        if let Some(pair) = entries.windows(2).find(|pair| pair[0].term >= pair[1].term) {
            return Err(BidxError::index(format!(
                "lexicon terms out of order: {:?} followed by {:?}",
                pair[0].term, pair[1].term
            )));
        }
        Ok(Lexicon { entries })
    }

    /// Look up a term by exact match.
    pub fn get(&self, term: &str) -> Option<&LexiconEntry> {
        self.entries
            .binary_search_by(|entry| entry.term.as_str().cmp(term))
            .ok()
            .map(|idx| &self.entries[idx])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[LexiconEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &LexiconEntry> {
        self.entries.iter()
    }

    /// Load `name` from storage.
    pub fn read(storage: &dyn Storage, name: &str) -> Result<Self> {
        let input = storage.open_input(name)?;
        let mut reader = StructReader::new(input)?;
        reader.read_header(LEXICON_MAGIC, FORMAT_VERSION)?;

        let count = reader.read_u32()? as usize;
        // Each entry takes at least 14 bytes; reject counts the file cannot hold.
        if count as u64 * 14 > reader.size().saturating_sub(reader.position()) {
            return Err(StorageError::Corrupt(format!(
                "{name} declares {count} terms but is only {} bytes",
                reader.size()
            ))
            .into());
        }

        let mut entries = Vec::with_capacity(count);
        for _ in 0..count {
            let term = reader.read_short_str()?;
            let postings_offset = reader.read_u64()?;
            let doc_freq = reader.read_u32()?;
            entries.push(LexiconEntry {
                term,
                postings_offset,
                doc_freq,
            });
        }
        debug!("loaded {count} lexicon entries from {name}");

        Lexicon::from_entries(entries)
    }

    /// Write the lexicon to `name`.
    pub fn write(&self, storage: &dyn Storage, name: &str) -> Result<()> {
        let output = storage.create_output(name)?;
        let mut writer = StructWriter::new(output);
        write_header(&mut writer, self.entries.len())?;
        for entry in &self.entries {
            write_entry(&mut writer, entry)?;
        }
        writer.close()
    }
}

/// Write the lexicon header for `count` entries.
pub fn write_header<W: StorageOutput>(
    writer: &mut StructWriter<W>,
    count: usize,
) -> Result<()> {
    let count = u32::try_from(count)
        .map_err(|_| BidxError::index(format!("too many terms for lexicon: {count}")))?;
    writer.write_raw(LEXICON_MAGIC)?;
    writer.write_u32(FORMAT_VERSION)?;
    writer.write_u32(count)
}

/// Write a single lexicon entry.
pub fn write_entry<W: StorageOutput>(
    writer: &mut StructWriter<W>,
    entry: &LexiconEntry,
) -> Result<()> {
    writer.write_short_str(&entry.term)?;
    writer.write_u64(entry.postings_offset)?;
    writer.write_u32(entry.doc_freq)
}
