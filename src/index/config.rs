//! Configuration for index construction and search.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::analysis::AnalysisConfig;
use crate::error::{BidxError, Result};

/// Default number of `(term, doc)` pairs buffered before a run is spilled.
pub const DEFAULT_CHUNK_PAIRS: usize = 2_000_000;

/// Default number of hits returned by a search.
pub const DEFAULT_LIMIT: usize = 20;

/// Configuration for [`IndexBuilder`](crate::index::IndexBuilder).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexBuilderConfig {
    /// Analysis applied to document text.
    pub analysis: AnalysisConfig,
    /// Pairs held in memory before a run is spilled.
    pub chunk_pairs: usize,
}

impl Default for IndexBuilderConfig {
    fn default() -> Self {
        IndexBuilderConfig {
            analysis: AnalysisConfig::default(),
            chunk_pairs: DEFAULT_CHUNK_PAIRS,
        }
    }
}

impl IndexBuilderConfig {
    /// Load a JSON configuration file. Missing keys take their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config: IndexBuilderConfig = read_json(path.as_ref())?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.chunk_pairs == 0 {
            return Err(BidxError::invalid_argument("chunk_pairs must be at least 1"));
        }
        self.analysis.tokenizer.validate()
    }
}

/// Configuration for [`SearchEngine`](crate::query::SearchEngine).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Analysis applied to query words; must match the index build.
    pub analysis: AnalysisConfig,
    /// Maximum number of hits rendered.
    pub limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            analysis: AnalysisConfig::default(),
            limit: DEFAULT_LIMIT,
        }
    }
}

impl SearchConfig {
    /// Load a JSON configuration file. Missing keys take their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config: SearchConfig = read_json(path.as_ref())?;
        config.analysis.tokenizer.validate()?;
        Ok(config)
    }
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path).map_err(|e| {
        BidxError::invalid_argument(format!("cannot read config {}: {e}", path.display()))
    })?;
    Ok(serde_json::from_str(&text)?)
}
