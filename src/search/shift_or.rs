//! Shift-Or matching, the complemented form of Shift-And.

use super::{check_pattern, Algorithm, PatternMatcher, SearchResults, MAX_PATTERN_LENGTH};
use crate::error::Result;

/// Per-byte masks: bit `k` of `masks[c]` is **clear** iff `pattern[k] == c`.
#[derive(Debug, Clone)]
pub struct ShiftOrTable {
    masks: [u64; 256],
    pattern_length: usize,
}

impl ShiftOrTable {
    pub fn new(pattern: &[u8]) -> Result<Self> {
        check_pattern(pattern, Some(MAX_PATTERN_LENGTH))?;

        let mut masks = [!0u64; 256];
        for (k, &c) in pattern.iter().enumerate() {
            masks[c as usize] &= !(1 << k);
        }

        Ok(Self {
            masks,
            pattern_length: pattern.len(),
        })
    }

    pub fn mask(&self, byte: u8) -> u64 {
        self.masks[byte as usize]
    }
}

impl PatternMatcher for ShiftOrTable {
    fn algorithm(&self) -> Algorithm {
        Algorithm::ShiftOr
    }

    fn pattern_len(&self) -> usize {
        self.pattern_length
    }

    fn find_all(&self, text: &[u8]) -> Result<SearchResults> {
        let m = self.pattern_length;
        // Bits at and above `m` are set in every mask, so after the first
        // byte the state is below this threshold exactly when bit m-1 is clear
        let match_mask = !(1u64 << (m - 1));

        let mut results = SearchResults::new()?;
        let mut state = !0u64;
        let mut comparisons = 0u64;

        for (i, &c) in text.iter().enumerate() {
            state = (state << 1) | self.masks[c as usize];
            comparisons += 1;

            if state <= match_mask {
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
    ShiftOrTable::new(pattern)?.find_all(text)
}
