//! # bidx
//!
//! A boolean full-text search engine for Rust.
//!
//! ## Features
//!
//! - Offline index construction by external merge sort
//! - Compact on-disk lexicon, postings and document stores
//! - Boolean queries with `&`, `|`, `!`, parentheses and implicit AND
//! - Unicode-aware tokenization with optional Russian stemming
//! - Corpus statistics: term frequencies and token statistics

pub mod analysis;
pub mod cli;
pub mod error;
pub mod index;
pub mod query;
pub mod sort;
pub mod stats;
pub mod storage;

pub mod prelude {
    pub use crate::analysis::{AnalysisConfig, Analyzer};
    pub use crate::error::{BidxError, Result, Stage};
    pub use crate::index::{
        BuildOptions, BuildReport, DocId, DocRecord, DocumentStore, IndexBuilder,
        IndexBuilderConfig, Lexicon, SearchConfig, build_index,
    };
    pub use crate::query::{Hit, SearchEngine, SearchResults};
    pub use crate::storage::{FileStorage, MemoryStorage, Storage, StorageConfig};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
