//! Search over an index directory.

use std::path::Path;

use log::{debug, info};
use serde::Serialize;

use crate::analysis::Analyzer;
use crate::error::{Result, Stage};
use crate::index::config::SearchConfig;
use crate::index::docstore::DocumentStore;
use crate::index::lexicon::Lexicon;
use crate::index::postings::PostingsReader;
use crate::index::{DOCS_FILE, DocId, POSTINGS_FILE, TERMS_FILE};
use crate::query::eval::{PostingSource, evaluate};
use crate::query::lexer::QueryLexer;
use crate::query::postfix::{PostfixOp, format_postfix, to_postfix};
use crate::storage::{FileStorage, Storage, StorageConfig};

/// One rendered search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hit {
    pub doc_id: DocId,
    pub url: String,
    /// The document title, or its url when the title is empty.
    pub title: String,
}

/// Hits of one query in ascending document id order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchResults {
    /// Number of ids the query matched before the limit was applied.
    pub total_hits: usize,
    pub hits: Vec<Hit>,
}

/// A loaded index: lexicon and document store in memory, postings on demand.
#[derive(Debug)]
pub struct SearchEngine {
    lexicon: Lexicon,
    documents: DocumentStore,
    postings: PostingsReader,
    analyzer: Analyzer,
    config: SearchConfig,
}

impl SearchEngine {
    /// Load the index stored in `storage`.
    pub fn open(storage: &dyn Storage, config: SearchConfig) -> Result<Self> {
        let analyzer = Analyzer::from_config(&config.analysis)?;

        let lexicon = Lexicon::read(storage, TERMS_FILE).map_err(|e| e.at(Stage::LoadLexicon))?;
        let documents =
            DocumentStore::read(storage, DOCS_FILE).map_err(|e| e.at(Stage::LoadDocuments))?;
        let postings =
            PostingsReader::open(storage, POSTINGS_FILE).map_err(|e| e.at(Stage::OpenPostings))?;

        info!(
            "opened index: {} terms, {} documents, {} postings bytes",
            lexicon.len(),
            documents.doc_count(),
            postings.size()
        );

        Ok(SearchEngine {
            lexicon,
            documents,
            postings,
            analyzer,
            config,
        })
    }

    /// Load the index stored in directory `path`.
    pub fn open_dir<P: AsRef<Path>>(path: P, config: SearchConfig) -> Result<Self> {
        let storage = FileStorage::open(path, StorageConfig::default())
            .map_err(|e| e.at(Stage::LoadLexicon))?;
        Self::open(&storage, config)
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn documents(&self) -> &DocumentStore {
        &self.documents
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Tokenize `query` and convert it to postfix.
    pub fn parse(&self, query: &str) -> Result<Vec<PostfixOp>> {
        let tokens = QueryLexer::new(&self.analyzer).tokenize(query);
        to_postfix(tokens)
    }

    /// All matching document ids in ascending order.
    pub fn matches(&mut self, query: &str) -> Result<Vec<DocId>> {
        let ops = self.parse(query)?;
        debug!("postfix: {}", format_postfix(&ops));
        let mut source = IndexPostings {
            lexicon: &self.lexicon,
            postings: &mut self.postings,
            doc_count: self.documents.doc_count(),
        };
        evaluate(&ops, &mut source)
    }

    /// Run `query` and render at most `limit` hits.
    ///
    /// Ids outside the document store are skipped and do not count toward
    /// the limit.
    pub fn search(&mut self, query: &str, limit: usize) -> Result<SearchResults> {
        let ids = self.matches(query)?;
        let hits = ids
            .iter()
            .filter_map(|&doc_id| {
                self.documents.get(doc_id).map(|record| Hit {
                    doc_id,
                    url: record.url.clone(),
                    title: record.display_title().to_string(),
                })
            })
            .take(limit)
            .collect();

        Ok(SearchResults {
            total_hits: ids.len(),
            hits,
        })
    }

    /// Run `query` with the configured limit.
    pub fn search_default(&mut self, query: &str) -> Result<SearchResults> {
        let limit = self.config.limit;
        self.search(query, limit)
    }
}

/// Lexicon lookups backed by the postings store.
struct IndexPostings<'a> {
    lexicon: &'a Lexicon,
    postings: &'a mut PostingsReader,
    doc_count: u32,
}

impl PostingSource for IndexPostings<'_> {
    fn doc_count(&self) -> u32 {
        self.doc_count
    }

    fn postings(&mut self, term: &str) -> Result<Vec<DocId>> {
        match self.lexicon.get(term) {
            Some(entry) => self.postings.read(entry),
            None => Ok(Vec::new()),
        }
    }
}
