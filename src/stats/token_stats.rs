//! Tokenization statistics over a document list.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use log::warn;
use serde::Serialize;

use crate::analysis::{AnalysisConfig, Analyzer};
use crate::error::Result;

/// Summary of tokenizing a corpus.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenStats {
    /// Paths in the document list, readable or not.
    pub docs: usize,
    /// Combined size of the readable documents.
    pub total_bytes: u64,
    pub token_count: u64,
    /// Mean token length in characters.
    pub avg_token_len_chars: f64,
    /// Time spent reading and tokenizing.
    pub time_sec: f64,
    pub tokens_per_kb: f64,
    pub stemming: bool,
}

impl TokenStats {
    /// `key=value` pairs in report order.
    pub fn key_values(&self) -> Vec<(&'static str, String)> {
        vec![
            ("docs", self.docs.to_string()),
            ("total_bytes", self.total_bytes.to_string()),
            ("token_count", self.token_count.to_string()),
            ("avg_token_len_chars", self.avg_token_len_chars.to_string()),
            ("time_sec", self.time_sec.to_string()),
            ("tokens_per_kb", self.tokens_per_kb.to_string()),
            ("stemming", u8::from(self.stemming).to_string()),
        ]
    }
}

/// Tokenize every file in `paths` and summarize. Unreadable files are skipped.
pub fn compute_token_stats(paths: &[PathBuf], analysis: &AnalysisConfig) -> Result<TokenStats> {
    let analyzer = Analyzer::from_config(analysis)?;

    let mut total_bytes = 0u64;
    let mut token_count = 0u64;
    let mut token_chars = 0u64;

    let started = Instant::now();
    for path in paths {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("skipping {}: {e}", path.display());
                continue;
            }
        };
        total_bytes += bytes.len() as u64;

        let text = String::from_utf8_lossy(&bytes);
        for token in analyzer.analyze(&text) {
            token_count += 1;
            token_chars += token.chars().count() as u64;
        }
    }
    let time_sec = started.elapsed().as_secs_f64();

    let kb = total_bytes as f64 / 1024.0;
    Ok(TokenStats {
        docs: paths.len(),
        total_bytes,
        token_count,
        avg_token_len_chars: if token_count > 0 {
            token_chars as f64 / token_count as f64
        } else {
            0.0
        },
        time_sec,
        tokens_per_kb: if kb > 0.0 {
            token_count as f64 / kb
        } else {
            0.0
        },
        stemming: analysis.stemming,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn no_stemming() -> AnalysisConfig {
        AnalysisConfig {
            stemming: false,
            ..AnalysisConfig::default()
        }
    }

    #[test]
    fn test_token_stats() {
        let dir = TempDir::new().unwrap();
        let doc = dir.path().join("0.txt");
        fs::write(&doc, "кот ел рыбу").unwrap();

        let paths = vec![doc, dir.path().join("missing.txt")];
        let stats = compute_token_stats(&paths, &no_stemming()).unwrap();

        assert_eq!(stats.docs, 2);
        assert_eq!(stats.total_bytes, "кот ел рыбу".len() as u64);
        assert_eq!(stats.token_count, 3);
        assert!((stats.avg_token_len_chars - 3.0).abs() < 1e-9);
        assert!(stats.tokens_per_kb > 0.0);
        assert!(!stats.stemming);
    }

    #[test]
    fn test_empty_corpus() {
        let stats = compute_token_stats(&[], &no_stemming()).unwrap();
        assert_eq!(stats.token_count, 0);
        assert_eq!(stats.avg_token_len_chars, 0.0);
        assert_eq!(stats.tokens_per_kb, 0.0);
    }

    #[test]
    fn test_key_values() {
        let stats = TokenStats {
            docs: 1,
            total_bytes: 10,
            token_count: 2,
            avg_token_len_chars: 2.5,
            time_sec: 0.0,
            tokens_per_kb: 204.8,
            stemming: true,
        };
        let rendered: Vec<String> = stats
            .key_values()
            .into_iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect();
        assert_eq!(rendered[0], "docs=1");
        assert_eq!(rendered[3], "avg_token_len_chars=2.5");
        assert_eq!(rendered[6], "stemming=1");
    }
}
