//! Normalize, tokenize and filter a document in one call.

use crate::utils::normalizer::{normalize, NormalizationConfig};
use crate::utils::stopwords::{StopwordLanguage, StopwordList};
use crate::utils::tokenizer::{tokenize, Token, TokenizerConfig};
use serde::Serialize;

/// Counters gathered while preprocessing a text
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PreprocessingStats {
    /// Input length in bytes
    pub original_length: usize,
    /// Normalized length in bytes
    pub processed_length: usize,
    /// Tokens kept after stopword filtering
    pub tokens_count: usize,
    pub words_count: usize,
    /// ASCII punctuation characters in the input
    pub punctuation_count: usize,
    pub stopwords_removed: usize,
    /// processed_length / original_length
    pub compression_ratio: f64,
}

impl PreprocessingStats {
    /// Sum two sets of counters; the ratio is recomputed from the totals.
    pub fn merge(&mut self, other: &PreprocessingStats) {
        self.original_length += other.original_length;
        self.processed_length += other.processed_length;
        self.tokens_count += other.tokens_count;
        self.words_count += other.words_count;
        self.punctuation_count += other.punctuation_count;
        self.stopwords_removed += other.stopwords_removed;
        self.compression_ratio = ratio(self.processed_length, self.original_length);
    }
}

fn ratio(processed: usize, original: usize) -> f64 {
    if original == 0 {
        0.0
    } else {
        processed as f64 / original as f64
    }
}

/// Output of [`TextPipeline::process`]
#[derive(Debug, Clone)]
pub struct ProcessedText {
    /// Normalized text; token positions are offsets into this string
    pub normalized: String,
    pub tokens: Vec<Token>,
    pub stats: PreprocessingStats,
}

/// Preprocessing chain shared by every document of a build
#[derive(Debug, Clone)]
pub struct TextPipeline {
    pub normalization: NormalizationConfig,
    pub tokenizer: TokenizerConfig,
    pub stopwords: StopwordList,
}

impl Default for TextPipeline {
    fn default() -> Self {
        Self::new(
            NormalizationConfig::default(),
            TokenizerConfig::default(),
            StopwordLanguage::default(),
        )
    }
}

impl TextPipeline {
    pub fn new(
        normalization: NormalizationConfig,
        tokenizer: TokenizerConfig,
        language: StopwordLanguage,
    ) -> Self {
        Self {
            normalization,
            tokenizer,
            stopwords: StopwordList::for_language(language),
        }
    }

    pub fn process(&self, text: &str) -> ProcessedText {
        let normalized = normalize(text, &self.normalization);
        let mut tokens = tokenize(&normalized, &self.tokenizer);
        let stopwords_removed = self.stopwords.filter_tokens(&mut tokens);

        let stats = PreprocessingStats {
            original_length: text.len(),
            processed_length: normalized.len(),
            tokens_count: tokens.len(),
            words_count: tokens.iter().filter(|t| t.is_word).count(),
            punctuation_count: text.bytes().filter(u8::is_ascii_punctuation).count(),
            stopwords_removed,
            compression_ratio: ratio(normalized.len(), text.len()),
        };

        ProcessedText {
            normalized,
            tokens,
            stats,
        }
    }
}
