//! Shift-And (bitap) matching, single and multi-pattern.

use super::{check_pattern, Algorithm, PatternMatcher, SearchResults, MAX_PATTERN_LENGTH};
use crate::error::{Error, Result};
use serde::Serialize;

/// Most patterns one [`MultiPatternShiftAnd`] scan can carry
pub const MAX_PATTERNS: usize = 64;

/// Per-byte masks: bit `k` of `masks[c]` is set iff `pattern[k] == c`.
#[derive(Debug, Clone)]
pub struct ShiftAndTable {
    masks: [u64; 256],
    pattern_length: usize,
}

impl ShiftAndTable {
    pub fn new(pattern: &[u8]) -> Result<Self> {
        check_pattern(pattern, Some(MAX_PATTERN_LENGTH))?;

        let mut masks = [0u64; 256];
        for (k, &c) in pattern.iter().enumerate() {
            masks[c as usize] |= 1 << k;
        }

        Ok(Self {
            masks,
            pattern_length: pattern.len(),
        })
    }

    /// Bit that signals a full match
    #[inline]
    fn match_bit(&self) -> u64 {
        1 << (self.pattern_length - 1)
    }

    #[inline]
    fn step(&self, state: u64, c: u8) -> u64 {
        ((state << 1) | 1) & self.masks[c as usize]
    }

    pub fn mask(&self, byte: u8) -> u64 {
        self.masks[byte as usize]
    }
}

impl PatternMatcher for ShiftAndTable {
    fn algorithm(&self) -> Algorithm {
        Algorithm::ShiftAnd
    }

    fn pattern_len(&self) -> usize {
        self.pattern_length
    }

    fn find_all(&self, text: &[u8]) -> Result<SearchResults> {
        let match_bit = self.match_bit();
        let m = self.pattern_length;

        let mut results = SearchResults::new()?;
        let mut state = 0u64;
        let mut comparisons = 0u64;

        for (i, &c) in text.iter().enumerate() {
            state = self.step(state, c);
            comparisons += 1;

            // The state is not cleared, so overlapping matches keep going
            if state & match_bit != 0 {
                results.push(i + 1 - m, comparisons)?;
            }
        }

        Ok(results.finish(comparisons))
    }

    fn table_size(&self) -> usize {
        std::mem::size_of::<Self>()
    }
}

/// Preprocess `pattern` and scan `text` once.
pub fn search(text: &[u8], pattern: &[u8]) -> Result<SearchResults> {
    ShiftAndTable::new(pattern)?.find_all(text)
}

/// A match found by the multi-pattern scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MultiMatch {
    /// Index of the pattern in the set passed to [`MultiPatternShiftAnd::new`]
    pub pattern_index: usize,
    pub position: usize,
    /// Comparisons across all patterns so far
    pub comparisons: u64,
}

/// Matches of a multi-pattern scan, in text order then pattern order.
#[derive(Debug, Clone, Default)]
pub struct MultiSearchResults {
    matches: Vec<MultiMatch>,
    total_comparisons: u64,
}

impl MultiSearchResults {
    pub fn matches(&self) -> &[MultiMatch] {
        &self.matches
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn total_comparisons(&self) -> u64 {
        self.total_comparisons
    }

    /// Positions where pattern `pattern_index` matched
    pub fn positions_of(&self, pattern_index: usize) -> impl Iterator<Item = usize> + '_ {
        self.matches
            .iter()
            .filter(move |m| m.pattern_index == pattern_index)
            .map(|m| m.position)
    }
}

/// Several Shift-And automata advanced together in one pass over the text.
#[derive(Debug, Clone)]
pub struct MultiPatternShiftAnd {
    tables: Vec<ShiftAndTable>,
}

impl MultiPatternShiftAnd {
    /// Preprocess every pattern.
    ///
    /// Fails if the set is empty, holds more than [`MAX_PATTERNS`] patterns,
    /// or if any pattern is rejected by [`ShiftAndTable::new`].
    pub fn new<P: AsRef<[u8]>>(patterns: &[P]) -> Result<Self> {
        if patterns.is_empty() {
            return Err(Error::invalid_argument("no patterns to search for"));
        }
        if patterns.len() > MAX_PATTERNS {
            return Err(Error::TooManyPatterns {
                given: patterns.len(),
                max: MAX_PATTERNS,
            });
        }

        let tables = patterns
            .iter()
            .map(|p| ShiftAndTable::new(p.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { tables })
    }

    /// Scan `text` once for all patterns.
    ///
    /// One comparison is charged per pattern per text byte.
    pub fn find_all(&self, text: &[u8]) -> Result<MultiSearchResults> {
        let mut states = [0u64; MAX_PATTERNS];
        let mut matches = Vec::new();
        let mut comparisons = 0u64;

        for (i, &c) in text.iter().enumerate() {
            for (p, table) in self.tables.iter().enumerate() {
                states[p] = table.step(states[p], c);
                comparisons += 1;

                if states[p] & table.match_bit() != 0 {
                    matches
                        .try_reserve(1)
                        .map_err(|e| Error::allocation("multi-pattern results", e))?;
                    matches.push(MultiMatch {
                        pattern_index: p,
                        position: i + 1 - table.pattern_length,
                        comparisons,
                    });
                }
            }
        }

        Ok(MultiSearchResults {
            matches,
            total_comparisons: comparisons,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masks() {
        let table = ShiftAndTable::new(b"aba").unwrap();
        assert_eq!(table.mask(b'a'), 0b101);
        assert_eq!(table.mask(b'b'), 0b010);
        assert_eq!(table.mask(b'z'), 0);
    }

    #[test]
    fn test_overlapping_matches() {
        let results = search(b"aaaa", b"aa").unwrap();
        assert_eq!(results.positions().collect::<Vec<_>>(), vec![0, 1, 2]);
        let comps: Vec<_> = results.iter().map(|m| m.comparisons).collect();
        assert_eq!(comps, vec![2, 3, 4]);
    }

    #[test]
    fn test_max_length_pattern() {
        let pattern = vec![b'q'; MAX_PATTERN_LENGTH];
        let mut text = b"xx".to_vec();
        text.extend_from_slice(&pattern);
        let results = search(&text, &pattern).unwrap();
        assert_eq!(results.positions().collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn test_non_ascii_bytes() {
        let text = "año, año".as_bytes();
        let results = search(text, "ño".as_bytes()).unwrap();
        assert_eq!(results.positions().collect::<Vec<_>>(), vec![1, 7]);
    }

    #[test]
    fn test_multi_pattern() {
        let multi = MultiPatternShiftAnd::new(&["he", "she", "hers"]).unwrap();
        let results = multi.find_all(b"ushers").unwrap();

        assert_eq!(results.positions_of(0).collect::<Vec<_>>(), vec![2]);
        assert_eq!(results.positions_of(1).collect::<Vec<_>>(), vec![1]);
        assert_eq!(results.positions_of(2).collect::<Vec<_>>(), vec![2]);
        // 3 patterns x 6 bytes
        assert_eq!(results.total_comparisons(), 18);
        // "she" and "he" both end at byte 3; pattern order breaks the tie
        assert_eq!(results.matches()[0].pattern_index, 0);
        assert_eq!(results.matches()[1].pattern_index, 1);
    }

    #[test]
    fn test_multi_pattern_cap() {
        let patterns: Vec<String> = (0..=MAX_PATTERNS).map(|i| format!("p{}", i)).collect();
        assert!(matches!(
            MultiPatternShiftAnd::new(&patterns),
            Err(Error::TooManyPatterns { given: 65, max: 64 })
        ));
        assert!(MultiPatternShiftAnd::new(&patterns[..MAX_PATTERNS]).is_ok());
    }

    #[test]
    fn test_multi_pattern_rejects_bad_pattern() {
        let empty: [&str; 0] = [];
        assert!(matches!(
            MultiPatternShiftAnd::new(&empty),
            Err(Error::InvalidArgument { .. })
        ));
        assert!(matches!(
            MultiPatternShiftAnd::new(&["ok", ""]),
            Err(Error::EmptyPattern)
        ));
    }
}
