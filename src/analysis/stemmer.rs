//! Stemming algorithms for reducing words to their root forms.

/// Trait for stemming algorithms.
pub trait Stemmer: Send + Sync {
    /// Stem a word to its root form.
    fn stem(&self, word: &str) -> String;

    /// Get the name of this stemmer.
    fn name(&self) -> &'static str;
}

/// Identity stemmer that returns words unchanged.
#[derive(Debug, Clone, Default)]
pub struct IdentityStemmer;

impl IdentityStemmer {
    /// Create a new identity stemmer.
    pub fn new() -> Self {
        IdentityStemmer
    }
}

impl Stemmer for IdentityStemmer {
    fn stem(&self, word: &str) -> String {
        word.to_string()
    }

    fn name(&self) -> &'static str {
        "identity"
    }
}

const VERB_SUFFIXES: &[&str] = &[
    "ировавшись", "ировались", "ировалась", "ировало", "ировать", "ируются", "ируется",
    "авшись", "явшись", "ившись", "ывшись", "вшись", "ешь", "ишь", "ете", "ите", "ют", "ут",
    "ят", "аем", "яем", "ает", "яет", "аемся", "яются", "ать", "ять", "ить", "еть", "уть", "ти",
    "ал", "ала", "ало", "али", "ил", "ила", "ило", "или",
];

const ADJECTIVE_SUFFIXES: &[&str] = &[
    "ейшего", "ейшей", "ейшие", "ейший", "ого", "его", "ому", "ему", "ыми", "ими", "ая", "яя",
    "ое", "ее", "ые", "ие", "ой", "ей", "ым", "им", "ом", "ем", "ую", "юю", "ых", "их",
];

const NOUN_SUFFIXES: &[&str] = &[
    "ирования", "ирование", "ированиям", "ированиях", "ациями", "ацией", "ация", "ации",
    "ацию", "ениями", "ением", "ение", "ения", "ению", "остями", "остью", "ость", "остей",
    "ами", "ями", "ах", "ях", "ов", "ев", "ей", "ом", "ем", "ам", "ям", "а", "я", "о", "е",
    "ы", "и", "у", "ю", "ь",
];

/// Minimum number of characters a stem must keep after suffix removal.
const MIN_STEM_CHARS: usize = 3;

/// Light suffix-stripping stemmer for Russian.
///
/// Each hyphen-separated segment is stemmed on its own. A segment is left
/// alone unless it contains a Cyrillic letter and is longer than three
/// characters. Verb, adjective and noun suffix classes are tried in that
/// order; within a class the longest matching suffix is removed, and the
/// removal only sticks when at least three characters remain.
#[derive(Debug, Clone, Default)]
pub struct RussianStemmer;

impl RussianStemmer {
    /// Create a new Russian stemmer.
    pub fn new() -> Self {
        RussianStemmer
    }

    fn stem_segment(&self, segment: &str) -> String {
        let looks_russian = segment.chars().any(|c| ('\u{0400}'..='\u{047F}').contains(&c));
        if !looks_russian || segment.chars().count() <= MIN_STEM_CHARS {
            return segment.to_string();
        }

        for class in [VERB_SUFFIXES, ADJECTIVE_SUFFIXES, NOUN_SUFFIXES] {
            if let Some(stem) = strip_longest_suffix(segment, class) {
                if stem.chars().count() >= MIN_STEM_CHARS {
                    return stem.to_string();
                }
            }
        }

        segment.to_string()
    }
}

fn strip_longest_suffix<'a>(word: &'a str, suffixes: &[&str]) -> Option<&'a str> {
    suffixes
        .iter()
        .filter(|suffix| word.ends_with(*suffix))
        .max_by_key(|suffix| suffix.len())
        .map(|suffix| &word[..word.len() - suffix.len()])
}

impl Stemmer for RussianStemmer {
    fn stem(&self, word: &str) -> String {
        if !word.contains('-') {
            return self.stem_segment(word);
        }
        word.split('-')
            .map(|segment| self.stem_segment(segment))
            .collect::<Vec<_>>()
            .join("-")
    }

    fn name(&self) -> &'static str {
        "russian"
    }
}
