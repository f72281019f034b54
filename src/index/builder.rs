//! Index construction by external merge sort.
//!
//! Documents are analyzed one at a time in ascending id order. Each distinct
//! term of a document contributes one `(term, doc)` pair to an in-memory
//! chunk. When the chunk reaches `chunk_pairs` it is sorted, deduplicated and
//! spilled as a run; [`IndexBuilder::finish`] spills the remainder, merges all
//! runs into `terms.bin` and `postings.bin` and deletes the runs.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//!
//! use bidx::index::{IndexBuilder, IndexBuilderConfig, Lexicon, TERMS_FILE};
//! use bidx::storage::{MemoryStorage, Storage};
//!
//! let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
//! let mut builder = IndexBuilder::new(storage.clone(), IndexBuilderConfig::default()).unwrap();
//! builder.add_document("Hello world").unwrap();
//! builder.add_document("hello again").unwrap();
//! let report = builder.finish().unwrap();
//! assert_eq!(report.terms, 3);
//!
//! let lexicon = Lexicon::read(storage.as_ref(), TERMS_FILE).unwrap();
//! assert_eq!(lexicon.get("hello").unwrap().doc_freq, 2);
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use log::{debug, info, warn};
use serde::Serialize;

use crate::analysis::Analyzer;
use crate::error::{BidxError, Result, Stage};
use crate::index::config::IndexBuilderConfig;
use crate::index::merge::merge_runs;
use crate::index::metadata::{MetadataStats, read_metadata_file};
use crate::index::run::{run_file_name, write_run};
use crate::index::source::{DocumentSource, FileListSource, read_document_list};
use crate::index::{DOCS_FILE, DocId, TermDoc};
use crate::sort::sort_dedup;
use crate::storage::{FileStorage, MAX_SHORT_STR_LEN, Storage, StorageConfig, clamp_str};

/// Totals of a completed build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    /// Documents indexed, including empty or unreadable ones.
    pub documents: u32,
    /// Runs spilled during accumulation.
    pub runs: usize,
    /// Distinct `(term, doc)` pairs in the index.
    pub pairs: u64,
    /// Distinct terms in the lexicon.
    pub terms: u64,
    /// Size of `postings.bin` in bytes.
    pub postings_bytes: u64,
    /// Metadata projection counts, when a metadata table was read.
    pub metadata: Option<MetadataStats>,
}

/// Accumulates `(term, doc)` pairs and spills them as sorted runs.
pub struct IndexBuilder {
    storage: Arc<dyn Storage>,
    config: IndexBuilderConfig,
    analyzer: Analyzer,
    chunk: Vec<TermDoc>,
    runs: Vec<String>,
    documents: u32,
}

impl std::fmt::Debug for IndexBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexBuilder")
            .field("config", &self.config)
            .field("chunk", &self.chunk.len())
            .field("runs", &self.runs.len())
            .field("documents", &self.documents)
            .finish()
    }
}

impl IndexBuilder {
    /// Create a builder writing runs and the final stores into `storage`.
    pub fn new(storage: Arc<dyn Storage>, config: IndexBuilderConfig) -> Result<Self> {
        config.validate()?;
        let analyzer = Analyzer::from_config(&config.analysis)?;
        Ok(IndexBuilder {
            storage,
            chunk: Vec::with_capacity(config.chunk_pairs.min(1 << 20)),
            config,
            analyzer,
            runs: Vec::new(),
            documents: 0,
        })
    }

    /// Number of documents added so far.
    pub fn doc_count(&self) -> u32 {
        self.documents
    }

    /// Number of runs spilled so far.
    pub fn run_count(&self) -> usize {
        self.runs.len()
    }

    /// Analyze `text` as the next document and return its id.
    pub fn add_document(&mut self, text: &str) -> Result<DocId> {
        let doc = self.documents;
        let next = doc
            .checked_add(1)
            .ok_or_else(|| BidxError::index("document id space exhausted"))?;

        let mut terms: Vec<String> = self
            .analyzer
            .analyze(text)
            .into_iter()
            .map(clamp_term)
            .collect();
        sort_dedup(&mut terms);

        for term in terms {
            self.chunk.push(TermDoc { term, doc });
            if self.chunk.len() >= self.config.chunk_pairs {
                self.spill()?;
            }
        }

        self.documents = next;
        Ok(doc)
    }

    /// Add every document of `source`, in id order.
    pub fn add_source<S: DocumentSource + ?Sized>(&mut self, source: &S) -> Result<()> {
        for doc_id in 0..source.doc_count() {
            let text = source.text(doc_id)?;
            self.add_document(&text)?;
        }
        Ok(())
    }

    /// Sort, deduplicate and write the current chunk as a new run.
    fn spill(&mut self) -> Result<()> {
        if self.chunk.is_empty() {
            return Ok(());
        }
        sort_dedup(&mut self.chunk);

        let name = run_file_name(self.runs.len());
        let written = write_run(self.storage.as_ref(), &name, &self.chunk)
            .map_err(|e| e.at(Stage::RunWrite))?;
        debug!("spilled {name}: {written} pairs");

        self.runs.push(name);
        self.chunk.clear();
        Ok(())
    }

    /// Spill the remaining pairs, merge all runs and delete them.
    pub fn finish(mut self) -> Result<BuildReport> {
        self.spill()?;

        info!("merging {} runs", self.runs.len());
        let merged =
            merge_runs(self.storage.as_ref(), &self.runs).map_err(|e| e.at(Stage::Merge))?;

        for name in &self.runs {
            if let Err(e) = self.storage.delete_file(name) {
                warn!("failed to delete run {name}: {e}");
            }
        }

        Ok(BuildReport {
            documents: self.documents,
            runs: self.runs.len(),
            pairs: merged.pairs,
            terms: merged.terms,
            postings_bytes: merged.postings_bytes,
            metadata: None,
        })
    }
}

/// Clamp a term to the longest length a run or lexicon record can hold.
fn clamp_term(mut term: String) -> String {
    if term.len() > MAX_SHORT_STR_LEN {
        let len = clamp_str(&term, MAX_SHORT_STR_LEN).len();
        term.truncate(len);
    }
    term
}

/// Inputs of the offline build pipeline.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Newline-delimited list of document paths.
    pub docs_list: PathBuf,
    /// Tab-separated metadata table with a header row.
    pub metadata: PathBuf,
    /// Directory receiving `docs.bin`, `terms.bin` and `postings.bin`.
    pub out_dir: PathBuf,
    pub config: IndexBuilderConfig,
}

/// Run the whole build: document list, document store, runs, merge.
///
/// Failures are tagged with the [`Stage`] they occurred in. An empty document
/// list fails before anything is written.
pub fn build_index(options: &BuildOptions) -> Result<BuildReport> {
    options.config.validate()?;

    let paths =
        read_document_list(&options.docs_list).map_err(|e| e.at(Stage::DocumentList))?;
    if paths.is_empty() {
        return Err(BidxError::index(format!(
            "document list {} is empty",
            options.docs_list.display()
        ))
        .at(Stage::EmptyCorpus));
    }
    let source = FileListSource::new(paths).map_err(|e| e.at(Stage::DocumentList))?;
    let doc_count = source.doc_count();
    info!("indexing {doc_count} documents into {}", options.out_dir.display());

    let storage: Arc<dyn Storage> = Arc::new(
        FileStorage::new(&options.out_dir, StorageConfig::default())
            .map_err(|e| e.at(Stage::Metadata))?,
    );

    let (docs, stats) =
        read_metadata_file(&options.metadata, doc_count).map_err(|e| e.at(Stage::Metadata))?;
    docs.write(storage.as_ref(), DOCS_FILE)
        .map_err(|e| e.at(Stage::Metadata))?;

    let mut builder = IndexBuilder::new(storage, options.config.clone())?;
    builder.add_source(&source)?;
    let mut report = builder.finish()?;
    report.metadata = Some(stats);

    info!(
        "indexed {} documents: {} terms, {} pairs, {} runs",
        report.documents, report.terms, report.pairs, report.runs
    );
    Ok(report)
}
