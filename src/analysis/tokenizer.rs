//! Tokenizer implementations for text analysis.
//!
//! Tokenizers are the first step of the analysis pipeline: they split raw
//! document or query text into normalized word tokens.
//!
//! # Examples
//!
//! ```
//! use bidx::analysis::tokenizer::{TextTokenizer, Tokenizer, TokenizerConfig};
//!
//! let tokenizer = TextTokenizer::new(TokenizerConfig::default());
//! assert_eq!(tokenizer.tokenize("Ёжик, Hello-World!"), vec!["ежик", "hello-world"]);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{BidxError, Result};

/// Trait for tokenizers that convert text into word tokens.
///
/// The trait requires `Send + Sync` so a tokenizer can be shared freely.
pub trait Tokenizer: Send + Sync {
    /// Tokenize the given text into a sequence of tokens.
    fn tokenize(&self, text: &str) -> Vec<String>;

    /// Get the name of this tokenizer (for debugging and configuration).
    fn name(&self) -> &'static str;
}

/// Normalization settings for [`TextTokenizer`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenizerConfig {
    /// Lowercase ASCII capitals, `А`..`Я` and `Ё`.
    pub lowercase: bool,
    /// Fold `ё` into `е`.
    pub normalize_yo: bool,
    /// Keep tokens made only of ASCII digits.
    pub keep_numbers: bool,
    /// Minimum token length in characters.
    pub min_len: usize,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        TokenizerConfig {
            lowercase: true,
            normalize_yo: true,
            keep_numbers: true,
            min_len: 2,
        }
    }
}

impl TokenizerConfig {
    /// Check that the configuration can produce tokens at all.
    pub fn validate(&self) -> Result<()> {
        if self.min_len == 0 {
            return Err(BidxError::analysis("min_len must be at least 1"));
        }
        Ok(())
    }
}

/// Cyrillic block covered by the tokenizer (the two-byte UTF-8 range
/// starting with lead bytes 0xD0 and 0xD1).
const CYRILLIC: std::ops::RangeInclusive<char> = '\u{0400}'..='\u{047F}';

/// A tokenizer for mixed Latin/Cyrillic text.
///
/// Word characters are ASCII letters, ASCII digits and Cyrillic letters.
/// A hyphen or apostrophe stays inside a word when the word has started and
/// the following character is an ASCII alphanumeric or any non-ASCII
/// character. Everything else separates words.
#[derive(Debug, Clone, Default)]
pub struct TextTokenizer {
    config: TokenizerConfig,
}

impl TextTokenizer {
    /// Create a new tokenizer with the given configuration.
    pub fn new(config: TokenizerConfig) -> Self {
        TextTokenizer { config }
    }

    /// The configuration in use.
    pub fn config(&self) -> &TokenizerConfig {
        &self.config
    }

    fn normalize_cyrillic(&self, c: char) -> char {
        let mut c = c;
        if self.config.lowercase {
            c = match c {
                'Ё' => 'ё',
                '\u{0410}'..='\u{042F}' => char::from_u32(c as u32 + 0x20).unwrap_or(c),
                _ => c,
            };
        }
        if self.config.normalize_yo && c == 'ё' {
            c = 'е';
        }
        c
    }

    fn flush(&self, current: &mut String, out: &mut Vec<String>) {
        if current.is_empty() {
            return;
        }
        let word = std::mem::take(current);
        if word.chars().count() < self.config.min_len {
            return;
        }
        if !self.config.keep_numbers && word.bytes().all(|b| b.is_ascii_digit()) {
            return;
        }
        out.push(word);
    }
}

impl Tokenizer for TextTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        let mut tokens = Vec::new();
        let mut current = String::new();
        let mut chars = text.chars().peekable();

        while let Some(c) = chars.next() {
            if c.is_ascii_alphabetic() {
                current.push(if self.config.lowercase {
                    c.to_ascii_lowercase()
                } else {
                    c
                });
            } else if c.is_ascii_digit() {
                current.push(c);
            } else if CYRILLIC.contains(&c) {
                current.push(self.normalize_cyrillic(c));
            } else if (c == '-' || c == '\'')
                && !current.is_empty()
                && chars
                    .peek()
                    .is_some_and(|next| next.is_ascii_alphanumeric() || !next.is_ascii())
            {
                current.push(c);
            } else {
                self.flush(&mut current, &mut tokens);
            }
        }
        self.flush(&mut current, &mut tokens);

        tokens
    }

    fn name(&self) -> &'static str {
        "text"
    }
}
