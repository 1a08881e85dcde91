//! Knuth-Morris-Pratt matching.

use super::{check_pattern, Algorithm, PatternMatcher, SearchResults};
use crate::error::{Error, Result};

/// A pattern with its failure function.
///
/// `failure[i]` is the length of the longest proper prefix of
/// `pattern[..=i]` that is also a suffix of it.
#[derive(Debug, Clone)]
pub struct KmpTable {
    pattern: Vec<u8>,
    failure: Vec<usize>,
}

impl KmpTable {
    /// Build the failure function. Patterns of any non-zero length are accepted.
    pub fn new(pattern: &[u8]) -> Result<Self> {
        check_pattern(pattern, None)?;

        let mut failure = Vec::new();
        failure
            .try_reserve_exact(pattern.len())
            .map_err(|e| Error::allocation("failure function", e))?;
        failure.resize(pattern.len(), 0);

        let mut j = 0;
        for i in 1..pattern.len() {
            while j > 0 && pattern[i] != pattern[j] {
                j = failure[j - 1];
            }
            if pattern[i] == pattern[j] {
                j += 1;
            }
            failure[i] = j;
        }

        Ok(Self {
            pattern: pattern.to_vec(),
            failure,
        })
    }

    pub fn pattern(&self) -> &[u8] {
        &self.pattern
    }

    pub fn failure_function(&self) -> &[usize] {
        &self.failure
    }
}

impl PatternMatcher for KmpTable {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Kmp
    }

    fn pattern_len(&self) -> usize {
        self.pattern.len()
    }

    fn find_all(&self, text: &[u8]) -> Result<SearchResults> {
        let pattern = self.pattern.as_slice();
        let failure = self.failure.as_slice();
        let m = pattern.len();

        let mut results = SearchResults::new()?;
        let mut comparisons = 0u64;
        let mut j = 0;

        for (i, &c) in text.iter().enumerate() {
            while j > 0 && c != pattern[j] {
                j = failure[j - 1];
                comparisons += 1;
            }

            comparisons += 1;
            if c == pattern[j] {
                j += 1;
            }

            if j == m {
                results.push(i + 1 - m, comparisons)?;
                // Keep the border so overlapping matches are found
                j = failure[j - 1];
            }
        }

        Ok(results.finish(comparisons))
    }

    fn table_size(&self) -> usize {
        self.pattern.capacity() + self.failure.capacity() * std::mem::size_of::<usize>()
    }
}

/// Preprocess `pattern` and scan `text` once.
pub fn search(text: &[u8], pattern: &[u8]) -> Result<SearchResults> {
    KmpTable::new(pattern)?.find_all(text)
}
