//! Exact substring matchers with comparison accounting.
//!
//! Three automata implement the same contract: find every (possibly
//! overlapping) occurrence of a byte pattern in a byte text, in left-to-right
//! order, and record how many comparisons the scan had performed when each
//! match was reported.
//!
//! - [`kmp`] - Knuth-Morris-Pratt with a failure function; any pattern length.
//!   Charges one comparison per character test and one per fallback.
//! - [`shift_and`] - Bit-parallel automaton, bits set on partial matches.
//!   Charges one comparison per text byte. Also hosts the multi-pattern scanner.
//! - [`shift_or`] - Complemented Shift-And, bits cleared on partial matches.
//!
//! The bit-parallel matchers keep one state bit per pattern byte in a `u64`
//! and reject patterns longer than [`MAX_PATTERN_LENGTH`].
//!
//! ## Example
//!
//! ```
//! use lexscan::search::Algorithm;
//!
//! let results = Algorithm::Kmp.search(b"banana", b"ana").unwrap();
//! assert_eq!(results.positions().collect::<Vec<_>>(), vec![1, 3]);
//! ```

pub mod benchmark;
pub mod executor;
pub mod kmp;
pub mod shift_and;
pub mod shift_or;

pub use benchmark::{compare_algorithms, AlgorithmStats, ComparisonReport};
pub use executor::{context_snippet, search_corpus, CorpusSearch, DocumentMatches};
pub use kmp::KmpTable;
pub use shift_and::{MultiMatch, MultiPatternShiftAnd, MultiSearchResults, ShiftAndTable};
pub use shift_or::ShiftOrTable;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Longest pattern accepted by the bit-parallel matchers.
/// One bit per position, the top bit of the word is left as shift headroom.
pub const MAX_PATTERN_LENGTH: usize = 63;

/// Initial capacity of a result list
pub const DEFAULT_RESULTS_CAPACITY: usize = 10;

/// A single match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    /// Byte offset of the first matched byte
    pub position: usize,
    /// Comparisons performed by the scan up to and including this match
    pub comparisons: u64,
}

/// Matches of one scan, in text order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResults {
    matches: Vec<SearchResult>,
    /// Comparisons of the whole scan, including bytes after the last match
    total_comparisons: u64,
}

impl SearchResults {
    pub fn new() -> Result<Self> {
        Self::with_capacity(DEFAULT_RESULTS_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Result<Self> {
        let mut matches = Vec::new();
        matches
            .try_reserve_exact(capacity)
            .map_err(|e| Error::allocation("search results", e))?;
        Ok(Self {
            matches,
            total_comparisons: 0,
        })
    }

    /// Record a match, growing the buffer by half when it is full.
    pub(crate) fn push(&mut self, position: usize, comparisons: u64) -> Result<()> {
        if self.matches.len() == self.matches.capacity() {
            let additional = (self.matches.capacity() / 2).max(1);
            self.matches
                .try_reserve_exact(additional)
                .map_err(|e| Error::allocation("search results", e))?;
        }
        self.matches.push(SearchResult {
            position,
            comparisons,
        });
        Ok(())
    }

    pub(crate) fn finish(mut self, total_comparisons: u64) -> Self {
        self.total_comparisons = total_comparisons;
        self
    }

    pub fn matches(&self) -> &[SearchResult] {
        &self.matches
    }

    pub fn positions(&self) -> impl Iterator<Item = usize> + '_ {
        self.matches.iter().map(|m| m.position)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SearchResult> {
        self.matches.iter()
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Comparisons performed over the whole text
    pub fn total_comparisons(&self) -> u64 {
        self.total_comparisons
    }

    /// Cumulative count recorded with the last match, 0 without matches
    pub fn last_comparisons(&self) -> u64 {
        self.matches.last().map_or(0, |m| m.comparisons)
    }

    /// Heap bytes held by the result buffer
    pub fn memory_usage(&self) -> usize {
        self.matches.capacity() * std::mem::size_of::<SearchResult>()
    }
}

impl<'a> IntoIterator for &'a SearchResults {
    type Item = &'a SearchResult;
    type IntoIter = std::slice::Iter<'a, SearchResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.matches.iter()
    }
}

/// A preprocessed pattern that can scan texts.
///
/// Tables are immutable once built, so one table can scan many texts,
/// including from several threads.
pub trait PatternMatcher {
    /// Which automaton this is
    fn algorithm(&self) -> Algorithm;

    /// Length of the preprocessed pattern in bytes
    fn pattern_len(&self) -> usize;

    /// Report every occurrence of the pattern in `text`.
    fn find_all(&self, text: &[u8]) -> Result<SearchResults>;

    /// Bytes used by the preprocessed table
    fn table_size(&self) -> usize;
}

/// The available matchers
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum Algorithm {
    #[default]
    Kmp,
    ShiftAnd,
    ShiftOr,
}

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [Algorithm::Kmp, Algorithm::ShiftAnd, Algorithm::ShiftOr];

    /// Human-readable name
    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Kmp => "KMP",
            Algorithm::ShiftAnd => "Shift-And",
            Algorithm::ShiftOr => "Shift-Or",
        }
    }

    /// Longest pattern this algorithm accepts, `None` if unbounded
    pub fn max_pattern_length(self) -> Option<usize> {
        match self {
            Algorithm::Kmp => None,
            Algorithm::ShiftAnd | Algorithm::ShiftOr => Some(MAX_PATTERN_LENGTH),
        }
    }

    /// Preprocess `pattern` for this algorithm.
    pub fn compile(self, pattern: &[u8]) -> Result<CompiledPattern> {
        Ok(match self {
            Algorithm::Kmp => CompiledPattern::Kmp(KmpTable::new(pattern)?),
            Algorithm::ShiftAnd => CompiledPattern::ShiftAnd(ShiftAndTable::new(pattern)?),
            Algorithm::ShiftOr => CompiledPattern::ShiftOr(ShiftOrTable::new(pattern)?),
        })
    }

    /// Preprocess and scan in one call.
    pub fn search(self, text: &[u8], pattern: &[u8]) -> Result<SearchResults> {
        self.compile(pattern)?.find_all(text)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A pattern preprocessed by one of the three algorithms
#[derive(Debug, Clone)]
pub enum CompiledPattern {
    Kmp(KmpTable),
    ShiftAnd(ShiftAndTable),
    ShiftOr(ShiftOrTable),
}

impl PatternMatcher for CompiledPattern {
    fn algorithm(&self) -> Algorithm {
        match self {
            CompiledPattern::Kmp(_) => Algorithm::Kmp,
            CompiledPattern::ShiftAnd(_) => Algorithm::ShiftAnd,
            CompiledPattern::ShiftOr(_) => Algorithm::ShiftOr,
        }
    }

    fn pattern_len(&self) -> usize {
        match self {
            CompiledPattern::Kmp(t) => t.pattern_len(),
            CompiledPattern::ShiftAnd(t) => t.pattern_len(),
            CompiledPattern::ShiftOr(t) => t.pattern_len(),
        }
    }

    fn find_all(&self, text: &[u8]) -> Result<SearchResults> {
        match self {
            CompiledPattern::Kmp(t) => t.find_all(text),
            CompiledPattern::ShiftAnd(t) => t.find_all(text),
            CompiledPattern::ShiftOr(t) => t.find_all(text),
        }
    }

    fn table_size(&self) -> usize {
        match self {
            CompiledPattern::Kmp(t) => t.table_size(),
            CompiledPattern::ShiftAnd(t) => t.table_size(),
            CompiledPattern::ShiftOr(t) => t.table_size(),
        }
    }
}

/// Reject empty patterns and, when `max` is given, patterns longer than it.
pub(crate) fn check_pattern(pattern: &[u8], max: Option<usize>) -> Result<()> {
    if pattern.is_empty() {
        return Err(Error::EmptyPattern);
    }
    match max {
        Some(max) if pattern.len() > max => Err(Error::PatternTooLong {
            len: pattern.len(),
            max,
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banana_all_algorithms() {
        for algorithm in Algorithm::ALL {
            let results = algorithm.search(b"banana", b"ana").unwrap();
            assert_eq!(
                results.positions().collect::<Vec<_>>(),
                vec![1, 3],
                "{}",
                algorithm
            );
        }
    }

    #[test]
    fn test_comparison_accounting_differs() {
        let kmp = Algorithm::Kmp.search(b"banana", b"ana").unwrap();
        let matches: Vec<_> = kmp.iter().map(|m| (m.position, m.comparisons)).collect();
        assert_eq!(matches, vec![(1, 4), (3, 6)]);
        assert_eq!(kmp.total_comparisons(), 6);

        for algorithm in [Algorithm::ShiftAnd, Algorithm::ShiftOr] {
            let results = algorithm.search(b"banana", b"ana").unwrap();
            // One comparison per text byte
            assert_eq!(results.total_comparisons(), 6);
            assert_eq!(results.last_comparisons(), 6);
        }
    }

    #[test]
    fn test_pattern_limits() {
        let long = vec![b'x'; MAX_PATTERN_LENGTH + 1];
        for algorithm in [Algorithm::ShiftAnd, Algorithm::ShiftOr] {
            assert!(matches!(
                algorithm.compile(&long),
                Err(Error::PatternTooLong { len: 64, max: 63 })
            ));
            assert!(algorithm.compile(&long[..MAX_PATTERN_LENGTH]).is_ok());
        }
        assert!(Algorithm::Kmp.compile(&long).is_ok());

        for algorithm in Algorithm::ALL {
            assert!(matches!(algorithm.compile(b""), Err(Error::EmptyPattern)));
        }
    }

    #[test]
    fn test_empty_text() {
        for algorithm in Algorithm::ALL {
            let results = algorithm.search(b"", b"a").unwrap();
            assert!(results.is_empty());
            assert_eq!(results.total_comparisons(), 0);
            assert_eq!(results.last_comparisons(), 0);
        }
    }

    #[test]
    fn test_results_grow_by_half() {
        let mut results = SearchResults::new().unwrap();
        for i in 0..11 {
            results.push(i, i as u64).unwrap();
        }
        assert_eq!(results.len(), 11);
        assert!(results.matches.capacity() >= 15);
    }

    #[test]
    fn test_compiled_pattern_dispatch() {
        let compiled = Algorithm::ShiftOr.compile(b"abc").unwrap();
        assert_eq!(compiled.algorithm(), Algorithm::ShiftOr);
        assert_eq!(compiled.pattern_len(), 3);
        assert_eq!(compiled.find_all(b"xxabcabc").unwrap().len(), 2);
        assert!(compiled.table_size() >= 256 * 8);
    }

    #[test]
    fn test_display_names() {
        assert_eq!(Algorithm::Kmp.to_string(), "KMP");
        assert_eq!(Algorithm::ShiftAnd.to_string(), "Shift-And");
        assert_eq!(Algorithm::ShiftOr.max_pattern_length(), Some(63));
    }
}
