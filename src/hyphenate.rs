//! Hyphenation capability consumed by the text model.
//!
//! Line breakers never decide where a word may be split themselves, they ask
//! the [`Hyphenator`] attached to the word's [`State`](crate::State). Positions
//! are character offsets into the word, strictly between its first and last
//! character, in ascending order.

use std::collections::HashMap;
use std::fmt;

/// Something that can find the syllable boundaries of a word
pub trait Hyphenator {
    /// Return the character offsets at which `word` may be split with a hyphen.
    /// An empty result means the word can't be split.
    fn hyphenate(&self, word: &str) -> Vec<usize>;
}

/// The default hyphenator: never splits a word
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHyphenation;

impl Hyphenator for NoHyphenation {
    fn hyphenate(&self, _word: &str) -> Vec<usize> {
        Vec::new()
    }
}

/// Any function from a word to its split positions can be used as a hyphenator
impl<F> Hyphenator for F
where
    F: Fn(&str) -> Vec<usize>,
{
    fn hyphenate(&self, word: &str) -> Vec<usize> {
        self(word)
    }
}

/// A hyphenator backed by an explicit table of words. Lookups ignore case and
/// surrounding punctuation, so `"Beautiful,"` finds the entry for `"beautiful"`.
#[derive(Default, Clone)]
pub struct Dictionary {
    entries: HashMap<String, Vec<usize>>,
}

impl fmt::Debug for Dictionary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dictionary")
            .field("words", &self.entries.len())
            .finish()
    }
}

impl Dictionary {
    pub fn new() -> Dictionary {
        Dictionary::default()
    }

    /// Add a word written with `-` at each allowed break, i.e. `"beau-ti-ful"`
    pub fn with_pattern(mut self, pattern: &str) -> Dictionary {
        let mut positions = Vec::new();
        let mut word = String::with_capacity(pattern.len());
        let mut count = 0usize;
        for ch in pattern.chars() {
            if ch == '-' {
                positions.push(count);
            } else {
                word.extend(ch.to_lowercase());
                count += 1;
            }
        }
        positions.retain(|&p| p > 0 && p < count);
        positions.dedup();
        self.entries.insert(word, positions);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Hyphenator for Dictionary {
    fn hyphenate(&self, word: &str) -> Vec<usize> {
        let chars: Vec<char> = word.chars().collect();
        let start = chars
            .iter()
            .position(|c| c.is_alphanumeric())
            .unwrap_or(chars.len());
        let end = chars
            .iter()
            .rposition(|c| c.is_alphanumeric())
            .map(|i| i + 1)
            .unwrap_or(start);
        if start >= end {
            return Vec::new();
        }

        let core: String = chars[start..end]
            .iter()
            .flat_map(|c| c.to_lowercase())
            .collect();
        match self.entries.get(&core) {
            Some(positions) => positions.iter().map(|p| p + start).collect(),
            None => Vec::new(),
        }
    }
}
