//! Analyzer combining a tokenizer with an optional stemmer.
//!
//! The same analyzer configuration must be used when building an index and
//! when querying it, otherwise query terms will not match lexicon terms.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::analysis::stemmer::{RussianStemmer, Stemmer};
use crate::analysis::tokenizer::{TextTokenizer, Tokenizer, TokenizerConfig};
use crate::error::Result;

/// Analysis settings shared by indexing and querying.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Tokenizer normalization settings.
    pub tokenizer: TokenizerConfig,
    /// Apply the stemmer to every token.
    pub stemming: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            tokenizer: TokenizerConfig::default(),
            stemming: true,
        }
    }
}

/// A text analysis pipeline: tokenize, then optionally stem.
pub struct Analyzer {
    tokenizer: Box<dyn Tokenizer>,
    stemmer: Option<Box<dyn Stemmer>>,
}

impl fmt::Debug for Analyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Analyzer")
            .field("tokenizer", &self.tokenizer.name())
            .field("stemmer", &self.stemmer.as_ref().map(|s| s.name()))
            .finish()
    }
}

impl Analyzer {
    /// Create an analyzer from explicit components.
    pub fn new(tokenizer: Box<dyn Tokenizer>, stemmer: Option<Box<dyn Stemmer>>) -> Self {
        Analyzer { tokenizer, stemmer }
    }

    /// Create the standard analyzer: [`TextTokenizer`] plus [`RussianStemmer`]
    /// when stemming is enabled.
    pub fn from_config(config: &AnalysisConfig) -> Result<Self> {
        config.tokenizer.validate()?;
        let stemmer: Option<Box<dyn Stemmer>> = if config.stemming {
            Some(Box::new(RussianStemmer::new()))
        } else {
            None
        };
        Ok(Analyzer::new(
            Box::new(TextTokenizer::new(config.tokenizer.clone())),
            stemmer,
        ))
    }

    /// Whether a stemmer is attached.
    pub fn is_stemming(&self) -> bool {
        self.stemmer.is_some()
    }

    /// Analyze text into terms. Empty terms are dropped.
    pub fn analyze(&self, text: &str) -> Vec<String> {
        let tokens = self.tokenizer.tokenize(text);
        match &self.stemmer {
            Some(stemmer) => tokens
                .iter()
                .map(|token| stemmer.stem(token))
                .filter(|term| !term.is_empty())
                .collect(),
            None => tokens.into_iter().filter(|term| !term.is_empty()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::stemmer::IdentityStemmer;

    #[test]
    fn test_analyze_with_stemming() {
        let analyzer = Analyzer::from_config(&AnalysisConfig::default()).unwrap();
        assert!(analyzer.is_stemming());
        assert_eq!(analyzer.analyze("Красивая собака"), vec!["красив", "собак"]);
    }

    #[test]
    fn test_analyze_without_stemming() {
        let config = AnalysisConfig {
            stemming: false,
            ..AnalysisConfig::default()
        };
        let analyzer = Analyzer::from_config(&config).unwrap();
        assert!(!analyzer.is_stemming());
        assert_eq!(analyzer.analyze("Красивая собака"), vec!["красивая", "собака"]);
    }

    #[test]
    fn test_custom_components() {
        let analyzer = Analyzer::new(
            Box::new(TextTokenizer::default()),
            Some(Box::new(IdentityStemmer::new())),
        );
        assert_eq!(analyzer.analyze("Hello, world"), vec!["hello", "world"]);
        assert!(format!("{analyzer:?}").contains("identity"));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = AnalysisConfig::default();
        config.tokenizer.min_len = 0;
        assert!(Analyzer::from_config(&config).is_err());
    }

    #[test]
    fn test_config_json_defaults() {
        let config: AnalysisConfig = serde_json::from_str(r#"{"stemming": false}"#).unwrap();
        assert!(!config.stemming);
        assert_eq!(config.tokenizer, TokenizerConfig::default());
    }
}
