//! Error types for bidx.
//!
//! All fallible operations in the crate return [`Result`], whose error side is
//! [`BidxError`]. Failures that happen inside one of the offline build or
//! query stages are wrapped in [`BidxError::Stage`] so that the command line
//! front end can report a stage-specific exit status.
//!
//! # Examples
//!
//! ```
//! use bidx::error::{BidxError, Result, Stage};
//!
//! fn load() -> Result<()> {
//!     Err(BidxError::storage("terms.bin is truncated"))
//! }
//!
//! let err = load().map_err(|e| e.at(Stage::LoadLexicon)).unwrap_err();
//! assert_eq!(err.exit_code(), 2);
//! ```

use std::fmt;
use std::io;

use thiserror::Error;

/// The main error type for bidx operations.
#[derive(Error, Debug)]
pub enum BidxError {
    /// I/O errors (file operations).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Storage-related errors (missing files, bad magic, truncated data).
    #[error("Storage error: {0}")]
    Storage(String),

    /// Index construction errors.
    #[error("Index error: {0}")]
    Index(String),

    /// Analysis-related errors (tokenization, stemming).
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Query grammar errors (unmatched parentheses).
    #[error("Parse error: {0}")]
    Parse(String),

    /// Postfix evaluation errors (operand underflow, residual values).
    #[error("Evaluation error: {0}")]
    Evaluation(String),

    /// Invalid argument or configuration value.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A failure attributed to one pipeline stage.
    #[error("{stage} failed: {source}")]
    Stage {
        stage: Stage,
        #[source]
        source: Box<BidxError>,
    },

    /// JSON serialization/deserialization errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with BidxError.
pub type Result<T> = std::result::Result<T, BidxError>;

/// Pipeline stages of the index build and the query run.
///
/// Each stage owns a distinct process exit status within its subcommand.
/// Build, search and term frequency stages share numeric codes because they
/// belong to different subcommands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Reading the newline-delimited document list.
    DocumentList,
    /// The document list contained no paths.
    EmptyCorpus,
    /// Reading the metadata table or writing `docs.bin`.
    Metadata,
    /// Writing a spill run.
    RunWrite,
    /// Merging runs into `terms.bin` and `postings.bin`.
    Merge,
    /// Loading `terms.bin`.
    LoadLexicon,
    /// Loading `docs.bin`.
    LoadDocuments,
    /// Opening `postings.bin`.
    OpenPostings,
    /// Writing a token run of the term frequency count.
    TokenRunWrite,
    /// Reopening and merging token runs.
    TokenRunMerge,
    /// Creating or writing the term frequency output.
    WriteOutput,
}

impl Stage {
    /// Process exit status for a failure in this stage.
    pub fn exit_code(self) -> i32 {
        match self {
            Stage::DocumentList => 2,
            Stage::EmptyCorpus => 3,
            Stage::Metadata => 4,
            Stage::RunWrite => 5,
            Stage::Merge => 6,
            Stage::LoadLexicon => 2,
            Stage::LoadDocuments => 3,
            Stage::OpenPostings => 4,
            Stage::TokenRunWrite => 3,
            Stage::TokenRunMerge => 4,
            Stage::WriteOutput => 5,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::DocumentList => "reading document list",
            Stage::EmptyCorpus => "checking corpus",
            Stage::Metadata => "building document store",
            Stage::RunWrite => "writing run",
            Stage::Merge => "merging runs",
            Stage::LoadLexicon => "loading lexicon",
            Stage::LoadDocuments => "loading document store",
            Stage::OpenPostings => "opening postings",
            Stage::TokenRunWrite => "writing token run",
            Stage::TokenRunMerge => "merging token runs",
            Stage::WriteOutput => "writing output",
        };
        f.write_str(name)
    }
}

impl BidxError {
    /// Create a new storage error.
    pub fn storage<S: Into<String>>(msg: S) -> Self {
        BidxError::Storage(msg.into())
    }

    /// Create a new index error.
    pub fn index<S: Into<String>>(msg: S) -> Self {
        BidxError::Index(msg.into())
    }

    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        BidxError::Analysis(msg.into())
    }

    /// Create a new parse error.
    pub fn parse<S: Into<String>>(msg: S) -> Self {
        BidxError::Parse(msg.into())
    }

    /// Create a new evaluation error.
    pub fn evaluation<S: Into<String>>(msg: S) -> Self {
        BidxError::Evaluation(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        BidxError::InvalidArgument(msg.into())
    }

    /// Attribute this error to a pipeline stage.
    ///
    /// An error already tagged with a stage keeps its original stage.
    pub fn at(self, stage: Stage) -> Self {
        match self {
            BidxError::Stage { .. } => self,
            other => BidxError::Stage {
                stage,
                source: Box::new(other),
            },
        }
    }

    /// The stage this error is attributed to, if any.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            BidxError::Stage { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            BidxError::Stage { stage, .. } => stage.exit_code(),
            BidxError::Parse(_) => 5,
            BidxError::Evaluation(_) => 6,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = BidxError::index("Test index error");
        assert_eq!(error.to_string(), "Index error: Test index error");

        let error = BidxError::parse("unmatched ')'");
        assert_eq!(error.to_string(), "Parse error: unmatched ')'");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error = BidxError::from(io_error);

        match error {
            BidxError::Io(_) => {} // Expected
            _ => panic!("Expected IO error variant"),
        }
    }

    #[test]
    fn test_stage_wrapping_keeps_first_stage() {
        let error = BidxError::storage("bad magic")
            .at(Stage::LoadLexicon)
            .at(Stage::Merge);

        assert_eq!(error.stage(), Some(Stage::LoadLexicon));
        assert_eq!(error.exit_code(), 2);
        assert!(error.to_string().starts_with("loading lexicon failed"));
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(BidxError::parse("x").exit_code(), 5);
        assert_eq!(BidxError::evaluation("x").exit_code(), 6);
        assert_eq!(BidxError::invalid_argument("x").exit_code(), 1);
        assert_eq!(BidxError::index("x").at(Stage::RunWrite).exit_code(), 5);
        assert_eq!(BidxError::index("x").at(Stage::Merge).exit_code(), 6);
        assert_eq!(BidxError::index("x").at(Stage::EmptyCorpus).exit_code(), 3);
        assert_eq!(BidxError::index("x").at(Stage::TokenRunWrite).exit_code(), 3);
        assert_eq!(BidxError::index("x").at(Stage::TokenRunMerge).exit_code(), 4);
        assert_eq!(BidxError::index("x").at(Stage::WriteOutput).exit_code(), 5);
    }
}
