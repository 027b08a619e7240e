//! Denylist matching
//!
//! Two stages, both over the lower-cased text:
//! 1. An Aho-Corasick automaton yields every denylist word that occurs as a
//!    raw substring. No hits means no further work.
//! 2. Each candidate is confirmed by its own whole-word check: an occurrence
//!    counts only when the characters on either side are not Unicode word
//!    characters (`\w`), or are the start/end of the text.
//!
//! When several words verify, the one whose occurrence starts leftmost wins;
//! equal starts prefer the longer word, then the lexicographically smaller one.

use aho_corasick::{AhoCorasick, MatchKind};
use memchr::memmem;
use regex_syntax::is_word_character;
use std::path::Path;

use crate::error::{FilterError, Result};
use crate::wordset::WordSet;

/// Whole-word verifier for a single denylist word
#[derive(Debug, Clone)]
pub struct BoundaryPattern {
    word: String,
    finder: memmem::Finder<'static>,
}

impl BoundaryPattern {
    pub fn new(word: &str) -> Result<Self> {
        let word = word.to_lowercase();
        if word.is_empty() {
            return Err(FilterError::config("empty denylist word"));
        }

        let finder = memmem::Finder::new(word.as_bytes()).into_owned();
        Ok(Self { word, finder })
    }

    pub fn word(&self) -> &str {
        &self.word
    }

    /// Byte offset of the first whole-word occurrence in already lower-cased
    /// text, if any
    pub fn find(&self, lowered: &str) -> Option<usize> {
        let len = self.word.len();

        // A match of a UTF-8 needle always starts and ends on char boundaries
        self.finder.find_iter(lowered.as_bytes()).find(|&start| {
            is_boundary(lowered[..start].chars().next_back())
                && is_boundary(lowered[start + len..].chars().next())
        })
    }
}

/// Start or end of text, or a non-word character
#[inline]
fn is_boundary(neighbour: Option<char>) -> bool {
    neighbour.map_or(true, |c| !is_word_character(c))
}

/// Multi-pattern denylist matcher. Immutable once built and safe to share
/// across worker threads.
pub struct Matcher {
    automaton: AhoCorasick,
    /// Indexed by automaton pattern id
    patterns: Vec<BoundaryPattern>,
}

impl Matcher {
    /// Build the automaton and one boundary pattern per word.
    ///
    /// Any construction failure is a [`FilterError::Config`].
    pub fn new(words: &WordSet) -> Result<Self> {
        let sorted = words.sorted();

        let automaton = AhoCorasick::builder()
            .match_kind(MatchKind::Standard)
            .build(&sorted)
            .map_err(|e| FilterError::config(format!("failed to build automaton: {}", e)))?;

        let patterns = sorted
            .iter()
            .map(|w| BoundaryPattern::new(w))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            automaton,
            patterns,
        })
    }

    /// Load a denylist file and build a matcher from it
    pub fn from_path(path: &Path) -> Result<Self> {
        let words = WordSet::load(path)?;
        Self::new(&words)
    }

    /// Number of denylist words
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Stage one: ids of denylist words occurring anywhere in `lowered`,
    /// boundary-agnostic, deduplicated.
    pub fn candidates(&self, lowered: &str) -> Vec<usize> {
        let mut ids: Vec<usize> = self
            .automaton
            .find_overlapping_iter(lowered)
            .map(|m| m.pattern().as_usize())
            .collect();

        ids.sort_unstable();
        ids.dedup();
        ids
    }

    /// Stage two for one candidate
    fn verify(&self, id: usize, lowered: &str) -> Result<Option<usize>> {
        let pattern = self.patterns.get(id).ok_or_else(|| FilterError::Match {
            word: format!("#{}", id),
            reason: "automaton returned an unknown pattern id".to_string(),
        })?;

        Ok(pattern.find(lowered))
    }

    /// Find a denylist word occurring as a whole word in `text`.
    ///
    /// Verification failures for a single candidate are logged and treated as
    /// "no match" for that candidate; this never fails.
    pub fn find_first_match(&self, text: &str) -> Option<&str> {
        let lowered = text.to_lowercase();
        let mut best: Option<(usize, &BoundaryPattern)> = None;

        for id in self.candidates(&lowered) {
            match self.verify(id, &lowered) {
                Ok(Some(start)) => {
                    let pattern = &self.patterns[id];
                    if best.map_or(true, |current| precedes((start, pattern), current)) {
                        best = Some((start, pattern));
                    }
                }
                Ok(None) => {}
                Err(e) => log::warn!("{}", e),
            }
        }

        best.map(|(_, pattern)| pattern.word())
    }
}

fn precedes(a: (usize, &BoundaryPattern), b: (usize, &BoundaryPattern)) -> bool {
    let (a_start, a_pat) = a;
    let (b_start, b_pat) = b;

    a_start
        .cmp(&b_start)
        .then_with(|| b_pat.word().len().cmp(&a_pat.word().len()))
        .then_with(|| a_pat.word().cmp(b_pat.word()))
        .is_lt()
}
