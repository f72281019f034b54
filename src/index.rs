//! Boolean inverted index.
//!
//! An index directory holds three write-once stores:
//!
//! - `docs.bin`: the document store, one `(url, title)` record per document id
//! - `terms.bin`: the lexicon, every distinct term in ascending order with the
//!   byte offset and length of its postings
//! - `postings.bin`: ascending document ids for each term, concatenated in
//!   lexicon order
//!
//! [`builder::build_index`] produces all three from a document list and a
//! metadata table. Construction is an external merge sort over
//! [`TermDoc`] pairs: bounded in-memory chunks are sorted and spilled as runs,
//! then merged into the final lexicon and postings.

pub mod builder;
pub mod config;
pub mod docstore;
pub mod lexicon;
pub mod merge;
pub mod metadata;
pub mod postings;
pub mod run;
pub mod source;

pub use builder::{BuildOptions, BuildReport, IndexBuilder, build_index};
pub use config::{IndexBuilderConfig, SearchConfig};
pub use docstore::{DocRecord, DocumentStore};
pub use lexicon::{Lexicon, LexiconEntry};
pub use metadata::MetadataStats;
pub use postings::{PostingsReader, PostingsWriter};
pub use source::{DocumentSource, FileListSource};

/// Dense document identifier, assigned by position in the document list.
pub type DocId = u32;

/// Document store file name.
pub const DOCS_FILE: &str = "docs.bin";
/// Lexicon file name.
pub const TERMS_FILE: &str = "terms.bin";
/// Postings file name.
pub const POSTINGS_FILE: &str = "postings.bin";

/// Magic tag of the document store.
pub const DOCS_MAGIC: &[u8; 4] = b"DOCS";
/// Magic tag of the lexicon.
pub const LEXICON_MAGIC: &[u8; 4] = b"BIDX";
/// Format version shared by the document store and the lexicon.
pub const FORMAT_VERSION: u32 = 1;

/// A term occurring in a document.
///
/// Pairs order by term bytes first and document id second, which is the
/// order of runs and of the final lexicon.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TermDoc {
    pub term: String,
    pub doc: DocId,
}

impl TermDoc {
    pub fn new<S: Into<String>>(term: S, doc: DocId) -> Self {
        TermDoc {
            term: term.into(),
            doc,
        }
    }
}
