//! Corpus statistics tools.
//!
//! These run over the same document lists and analysis pipeline as the
//! index builder and help choose tokenizer settings before a build.

pub mod term_freq;
pub mod token_stats;

pub use term_freq::{TermCounter, TermFreqConfig, TermFreqReport, term_frequencies};
pub use token_stats::{TokenStats, compute_token_stats};
