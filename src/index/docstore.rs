//! The document store: `(url, title)` per document id.
//!
//! Layout of `docs.bin`:
//!
//! ```text
//! "DOCS" | version: u32 = 1 | doc_count: u32 | (url: short str, title: short str) * doc_count
//! ```

use log::debug;

use crate::error::Result;
use crate::index::{DOCS_MAGIC, DocId, FORMAT_VERSION};
use crate::storage::{Storage, StorageError, StructReader, StructWriter};

/// Display metadata of one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocRecord {
    pub url: String,
    pub title: String,
}

impl DocRecord {
    /// Create a record, replacing tabs and line breaks with spaces.
    pub fn new(url: &str, title: &str) -> Self {
        DocRecord {
            url: sanitize_field(url),
            title: sanitize_field(title),
        }
    }

    /// The title, or the url when the title is empty.
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            &self.url
        } else {
            &self.title
        }
    }
}

/// Replace `\t`, `\r` and `\n` with a space.
pub fn sanitize_field(field: &str) -> String {
    field.replace(['\t', '\r', '\n'], " ")
}

/// Dense array of [`DocRecord`]s indexed by [`DocId`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentStore {
    records: Vec<DocRecord>,
}

impl DocumentStore {
    /// A store of `doc_count` empty records.
    pub fn with_doc_count(doc_count: u32) -> Self {
        DocumentStore {
            records: vec![DocRecord::default(); doc_count as usize],
        }
    }

    /// A store holding `records` in id order.
    pub fn from_records(records: Vec<DocRecord>) -> Self {
        DocumentStore { records }
    }

    /// Number of documents, which is also the size of the id space.
    pub fn doc_count(&self) -> u32 {
        self.records.len() as u32
    }

    pub fn get(&self, doc_id: DocId) -> Option<&DocRecord> {
        self.records.get(doc_id as usize)
    }

    /// Replace the record of `doc_id`. Returns false when the id is out of range.
    pub fn set(&mut self, doc_id: DocId, record: DocRecord) -> bool {
        match self.records.get_mut(doc_id as usize) {
            Some(slot) => {
                *slot = record;
                true
            }
            None => false,
        }
    }

    /// Write the store to `name`. Fields longer than 65535 bytes are clamped.
    pub fn write(&self, storage: &dyn Storage, name: &str) -> Result<()> {
        let output = storage.create_output(name)?;
        let mut writer = StructWriter::new(output);

        writer.write_raw(DOCS_MAGIC)?;
        writer.write_u32(FORMAT_VERSION)?;
        writer.write_u32(self.doc_count())?;
        for record in &self.records {
            writer.write_short_str(&record.url)?;
            writer.write_short_str(&record.title)?;
        }

        writer.close()
    }

    /// Load the store from `name`.
    pub fn read(storage: &dyn Storage, name: &str) -> Result<Self> {
        let input = storage.open_input(name)?;
        let mut reader = StructReader::new(input)?;
        reader.read_header(DOCS_MAGIC, FORMAT_VERSION)?;

        let doc_count = reader.read_u32()?;
        // Each record takes at least four bytes of length prefixes.
        if u64::from(doc_count) * 4 > reader.size().saturating_sub(reader.position()) {
            return Err(StorageError::Corrupt(format!(
                "{name} declares {doc_count} documents but is only {} bytes",
                reader.size()
            ))
            .into());
        }

        let mut records = Vec::with_capacity(doc_count as usize);
        for _ in 0..doc_count {
            let url = reader.read_short_str()?;
            let title = reader.read_short_str()?;
            records.push(DocRecord { url, title });
        }
        debug!("loaded {doc_count} document records from {name}");

        Ok(DocumentStore::from_records(records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn test_sanitize_field() {
        assert_eq!(sanitize_field("a\tb\r\nc"), "a b  c");
        assert_eq!(sanitize_field("plain"), "plain");
    }

    #[test]
    fn test_display_title_falls_back_to_url() {
        let record = DocRecord::new("https://example.org/a", "");
        assert_eq!(record.display_title(), "https://example.org/a");

        let record = DocRecord::new("https://example.org/a", "Title\there");
        assert_eq!(record.display_title(), "Title here");
    }

    #[test]
    fn test_set_and_get() {
        let mut store = DocumentStore::with_doc_count(3);
        assert_eq!(store.doc_count(), 3);
        assert!(store.set(1, DocRecord::new("u1", "t1")));
        assert!(!store.set(3, DocRecord::new("u3", "t3")));

        assert_eq!(store.get(0).unwrap(), &DocRecord::default());
        assert_eq!(store.get(1).unwrap().title, "t1");
        assert!(store.get(3).is_none());
    }

    #[test]
    fn test_write_and_read() {
        let storage = MemoryStorage::new();
        let mut store = DocumentStore::with_doc_count(2);
        store.set(0, DocRecord::new("https://ru.example/кот", "Кот"));
        store.write(&storage, "docs.bin").unwrap();

        let bytes = storage.read_all("docs.bin").unwrap();
        assert_eq!(&bytes[..4], b"DOCS");
        assert_eq!(&bytes[4..12], &[1, 0, 0, 0, 2, 0, 0, 0]);
        // Second record: two empty strings.
        assert_eq!(&bytes[bytes.len() - 4..], &[0, 0, 0, 0]);

        let loaded = DocumentStore::read(&storage, "docs.bin").unwrap();
        assert_eq!(loaded, store);
    }

    #[test]
    fn test_read_truncated() {
        let storage = MemoryStorage::new();
        storage
            .put("docs.bin", b"DOCS\x01\x00\x00\x00\x02\x00\x00\x00\x00\x00")
            .unwrap();
        assert!(DocumentStore::read(&storage, "docs.bin").is_err());
    }
}
