//! Corpus-wide term frequencies by external sort.
//!
//! Every token occurrence is buffered; full buffers are sorted and spilled
//! as newline-delimited runs, and the runs are merged to count each term.
//! Output lines are `term\tcount` in ascending term order.
//!
//! Failures are tagged with a [`Stage`]: reading the document list, writing
//! a run, merging runs and writing the output each exit with their own status.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Lines, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::analysis::{AnalysisConfig, Analyzer};
use crate::error::{BidxError, Result, Stage};
use crate::index::source::{DocumentSource, FileListSource, read_document_list};
use crate::sort::{KWayMerge, sort_stable};
use crate::storage::{FileStorage, Storage, StorageConfig, StorageInput, StorageOutput};

/// Default number of tokens buffered before a run is spilled.
pub const DEFAULT_CHUNK_TOKENS: usize = 2_000_000;

/// Configuration of a term frequency count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TermFreqConfig {
    /// Analysis applied to document text. Stemming is off by default.
    pub analysis: AnalysisConfig,
    /// Tokens held in memory before a run is spilled.
    pub chunk_tokens: usize,
}

impl Default for TermFreqConfig {
    fn default() -> Self {
        TermFreqConfig {
            analysis: AnalysisConfig {
                stemming: false,
                ..AnalysisConfig::default()
            },
            chunk_tokens: DEFAULT_CHUNK_TOKENS,
        }
    }
}

/// Totals of one count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TermFreqReport {
    pub documents: u32,
    pub tokens: u64,
    pub runs: usize,
    pub terms: u64,
}

/// Counts token occurrences using runs kept in a scratch storage.
pub struct TermCounter {
    scratch: Arc<dyn Storage>,
    analyzer: Analyzer,
    chunk_tokens: usize,
    buffer: Vec<String>,
    runs: Vec<String>,
    documents: u32,
    tokens: u64,
}

impl TermCounter {
    pub fn new(scratch: Arc<dyn Storage>, config: &TermFreqConfig) -> Result<Self> {
        if config.chunk_tokens == 0 {
            return Err(BidxError::invalid_argument("chunk_tokens must be at least 1"));
        }
        Ok(TermCounter {
            scratch,
            analyzer: Analyzer::from_config(&config.analysis)?,
            chunk_tokens: config.chunk_tokens,
            buffer: Vec::new(),
            runs: Vec::new(),
            documents: 0,
            tokens: 0,
        })
    }

    /// Count the tokens of one document.
    pub fn add_text(&mut self, text: &str) -> Result<()> {
        for token in self.analyzer.analyze(text) {
            self.buffer.push(token);
            self.tokens += 1;
            if self.buffer.len() >= self.chunk_tokens {
                self.spill()?;
            }
        }
        self.documents += 1;
        Ok(())
    }

    fn spill(&mut self) -> Result<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }
        sort_stable(&mut self.buffer);

        let name = format!("run_{}.txt", self.runs.len());
        self.write_buffer(&name).map_err(|e| e.at(Stage::TokenRunWrite))?;
        debug!("spilled {name}: {} tokens", self.buffer.len());

        self.runs.push(name);
        self.buffer.clear();
        Ok(())
    }

    fn write_buffer(&self, name: &str) -> Result<()> {
        let mut output = self.scratch.create_output(name)?;
        for token in &self.buffer {
            output.write_all(token.as_bytes())?;
            output.write_all(b"\n")?;
        }
        output.close()
    }

    /// Merge all runs and write `term\tcount` lines to `out`.
    pub fn finish<W: Write>(mut self, out: &mut W) -> Result<TermFreqReport> {
        self.spill()?;

        let sources = self
            .runs
            .iter()
            .map(|name| TokenRun::open(self.scratch.as_ref(), name))
            .collect::<Result<Vec<_>>>()
            .map_err(|e| e.at(Stage::TokenRunMerge))?;
        let merge = KWayMerge::new(sources).map_err(|e| e.at(Stage::TokenRunMerge))?;

        let mut terms = 0u64;
        let mut active: Option<(String, u64)> = None;
        for token in merge {
            let token = token.map_err(|e| e.at(Stage::TokenRunMerge))?;
            match active.as_mut() {
                Some((term, count)) if *term == token => *count += 1,
                _ => {
                    if let Some((term, count)) = active.replace((token, 1)) {
                        write_count(out, &term, count)?;
                        terms += 1;
                    }
                }
            }
        }
        if let Some((term, count)) = active {
            write_count(out, &term, count)?;
            terms += 1;
        }
        out.flush().map_err(|e| BidxError::from(e).at(Stage::WriteOutput))?;

        for name in &self.runs {
            if let Err(e) = self.scratch.delete_file(name) {
                warn!("failed to delete run {name}: {e}");
            }
        }

        Ok(TermFreqReport {
            documents: self.documents,
            tokens: self.tokens,
            runs: self.runs.len(),
            terms,
        })
    }
}

fn write_count<W: Write>(out: &mut W, term: &str, count: u64) -> Result<()> {
    writeln!(out, "{term}\t{count}").map_err(|e| BidxError::from(e).at(Stage::WriteOutput))
}

/// Tokens of one newline-delimited run.
struct TokenRun {
    lines: Lines<BufReader<Box<dyn StorageInput>>>,
}

impl TokenRun {
    fn open(storage: &dyn Storage, name: &str) -> Result<Self> {
        let input = storage.open_input(name)?;
        Ok(TokenRun {
            lines: BufReader::new(input).lines(),
        })
    }
}

impl Iterator for TokenRun {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.lines.next().map(|line| line.map_err(BidxError::from))
    }
}

/// Count the terms of every document listed in `docs_list` into `output`.
///
/// Runs are kept in a scratch directory next to `output`, removed at the end.
/// The output file is created before any run is written.
pub fn term_frequencies(
    docs_list: &Path,
    output: &Path,
    config: &TermFreqConfig,
) -> Result<TermFreqReport> {
    let paths = read_document_list(docs_list).map_err(|e| e.at(Stage::DocumentList))?;
    let source = FileListSource::new(paths).map_err(|e| e.at(Stage::DocumentList))?;

    let file = File::create(output).map_err(|e| {
        BidxError::invalid_argument(format!("cannot create {}: {e}", output.display()))
            .at(Stage::WriteOutput)
    })?;

    let scratch_dir = scratch_dir_for(output);
    let scratch: Arc<dyn Storage> = Arc::new(
        FileStorage::new(&scratch_dir, StorageConfig::default())
            .map_err(|e| e.at(Stage::TokenRunWrite))?,
    );

    let mut counter = TermCounter::new(scratch, config)?;
    for doc_id in 0..source.doc_count() {
        counter.add_text(&source.text(doc_id)?)?;
    }

    let report = counter.finish(&mut BufWriter::new(file))?;

    if let Err(e) = fs::remove_dir(&scratch_dir) {
        warn!("failed to remove {}: {e}", scratch_dir.display());
    }
    info!(
        "counted {} tokens over {} documents: {} distinct terms",
        report.tokens, report.documents, report.terms
    );
    Ok(report)
}

fn scratch_dir_for(output: &Path) -> PathBuf {
    let mut name = output
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    name.push(".runs");
    output.with_file_name(name)
}
