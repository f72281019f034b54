//! Document sources for index construction.

use std::fs;
use std::path::{Path, PathBuf};

use log::warn;

use crate::error::{BidxError, Result};
use crate::index::DocId;

/// Read a newline-delimited list of document paths.
///
/// Lines are trimmed and empty lines dropped; the position of a path in the
/// returned list is its document id.
pub fn read_document_list<P: AsRef<Path>>(path: P) -> Result<Vec<PathBuf>> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|e| {
        BidxError::index(format!("cannot read document list {}: {e}", path.display()))
    })?;
    let text = String::from_utf8_lossy(&bytes);
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(PathBuf::from)
        .collect())
}

/// A sequence of documents in ascending id order.
pub trait DocumentSource {
    /// Number of documents; ids are `0..doc_count`.
    fn doc_count(&self) -> u32;

    /// Text of document `doc_id`.
    fn text(&self, doc_id: DocId) -> Result<String>;
}

/// Documents stored as files, one path per document.
#[derive(Debug, Clone)]
pub struct FileListSource {
    paths: Vec<PathBuf>,
}

impl FileListSource {
    /// Fails when there are more paths than document ids.
    pub fn new(paths: Vec<PathBuf>) -> Result<Self> {
        if u32::try_from(paths.len()).is_err() {
            return Err(BidxError::index(format!(
                "too many documents: {}",
                paths.len()
            )));
        }
        Ok(FileListSource { paths })
    }
}

impl DocumentSource for FileListSource {
    fn doc_count(&self) -> u32 {
        self.paths.len() as u32
    }

    /// An unreadable file yields empty text; its id stays allocated.
    fn text(&self, doc_id: DocId) -> Result<String> {
        let path = self
            .paths
            .get(doc_id as usize)
            .ok_or_else(|| BidxError::invalid_argument(format!("no document {doc_id}")))?;
        match fs::read(path) {
            Ok(bytes) => Ok(String::from_utf8_lossy(&bytes).into_owned()),
            Err(e) => {
                warn!("skipping document {doc_id} ({}): {e}", path.display());
                Ok(String::new())
            }
        }
    }
}

/// Documents held in memory.
impl DocumentSource for Vec<String> {
    fn doc_count(&self) -> u32 {
        self.len() as u32
    }

    fn text(&self, doc_id: DocId) -> Result<String> {
        self.get(doc_id as usize)
            .cloned()
            .ok_or_else(|| BidxError::invalid_argument(format!("no document {doc_id}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_document_list() {
        let dir = TempDir::new().unwrap();
        let list = dir.path().join("docs.txt");
        fs::write(&list, "  /data/a.txt \n\n/data/b.txt\r\n   \n/data/c.txt").unwrap();

        let paths = read_document_list(&list).unwrap();
        assert_eq!(
            paths,
            vec![
                PathBuf::from("/data/a.txt"),
                PathBuf::from("/data/b.txt"),
                PathBuf::from("/data/c.txt"),
            ]
        );
    }

    #[test]
    fn test_missing_document_list() {
        let dir = TempDir::new().unwrap();
        assert!(read_document_list(dir.path().join("missing.txt")).is_err());
    }

    #[test]
    fn test_file_list_source() {
        let dir = TempDir::new().unwrap();
        let doc = dir.path().join("0.txt");
        fs::write(&doc, "кот и пёс").unwrap();

        let source =
            FileListSource::new(vec![doc, dir.path().join("does-not-exist.txt")]).unwrap();
        assert_eq!(source.doc_count(), 2);
        assert_eq!(source.text(0).unwrap(), "кот и пёс");
        assert_eq!(source.text(1).unwrap(), "");
        assert!(source.text(2).is_err());
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let dir = TempDir::new().unwrap();
        let doc = dir.path().join("0.txt");
        fs::write(&doc, b"ok \xff done").unwrap();

        let source = FileListSource::new(vec![doc]).unwrap();
        assert_eq!(source.text(0).unwrap(), "ok \u{FFFD} done");
    }

    #[test]
    fn test_in_memory_source() {
        let docs = vec!["a".to_string(), "b".to_string()];
        assert_eq!(docs.doc_count(), 2);
        assert_eq!(docs.text(1).unwrap(), "b");
        assert!(docs.text(2).is_err());
    }
}
