//! Text analysis module for bidx.
//!
//! Tokenization and stemming turn raw text into index terms. Both documents
//! and queries go through the same [`Analyzer`].

pub mod analyzer;
pub mod stemmer;
pub mod tokenizer;

// Re-export commonly used types
pub use analyzer::*;
pub use stemmer::*;
pub use tokenizer::*;
