//! Denylist loading
//!
//! One candidate word per line, trimmed and lower-cased. Empty lines are
//! dropped and duplicates collapse into one entry.

use ahash::RandomState;
use hashbrown::HashSet;
use std::fs;
use std::path::Path;

use crate::error::{FilterError, Result};

/// Normalized, deduplicated set of lowercase denylist words
#[derive(Debug, Clone, Default)]
pub struct WordSet {
    words: HashSet<String, RandomState>,
}

impl WordSet {
    /// Load a denylist file.
    ///
    /// Fails with [`FilterError::Config`] when the file is missing, unreadable
    /// or not valid UTF-8. A leading UTF-8 BOM is ignored.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).map_err(|e| {
            FilterError::config(format!("cannot read denylist {:?}: {}", path, e))
        })?;

        let (text, had_errors) = encoding_rs::UTF_8.decode_with_bom_removal(&bytes);
        if had_errors {
            return Err(FilterError::config(format!(
                "denylist {:?} is not valid UTF-8",
                path
            )));
        }

        Ok(Self::parse(&text))
    }

    /// Build from denylist text already in memory
    pub fn parse(text: &str) -> Self {
        Self::from_words(text.lines())
    }

    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .filter_map(|w| {
                let w = w.as_ref().trim();
                if w.is_empty() {
                    None
                } else {
                    Some(w.to_lowercase())
                }
            })
            .collect();

        Self { words }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    /// Words in lexicographic order, used to give matcher patterns stable ids
    pub fn sorted(&self) -> Vec<&str> {
        let mut words: Vec<&str> = self.words.iter().map(String::as_str).collect();
        words.sort_unstable();
        words
    }
}
