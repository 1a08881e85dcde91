//! Text preprocessing collaborators and shared helpers.
//!
//! ## Modules
//!
//! - [`normalizer`] - Case folding, accent removal, whitespace collapsing
//! - [`tokenizer`] - Word/punctuation tokens with byte positions
//! - [`stopwords`] - Built-in Spanish and English stopword lists
//! - [`html`] - Plain-text extraction from HTML
//! - [`pipeline`] - normalize → tokenize → filter, with statistics
//! - [`progress`] - Progress bars (no-op without the `progress` feature)
//!
//! ## Example
//!
//! ```
//! use lexscan::utils::TextPipeline;
//!
//! let processed = TextPipeline::default().process("El índice de la biblioteca");
//! let words: Vec<_> = processed.tokens.iter().map(|t| t.text.as_str()).collect();
//! assert_eq!(words, vec!["indice", "biblioteca"]);
//! ```

pub mod html;
pub mod normalizer;
pub mod pipeline;
pub mod progress;
pub mod stopwords;
pub mod tokenizer;

pub use html::extract_text;
pub use normalizer::{normalize, normalize_simple, NormalizationConfig};
pub use pipeline::{PreprocessingStats, ProcessedText, TextPipeline};
pub use stopwords::{StopwordLanguage, StopwordList};
pub use tokenizer::{tokenize, tokenize_simple, Token, TokenizerConfig};

/// Check if content is likely binary (non-text)
pub fn is_binary(content: &[u8]) -> bool {
    let sample_size = content.len().min(8192);
    let sample = &content[..sample_size];

    // Any NUL in the sample is enough for a text corpus
    if memchr::memchr(0, sample).is_some() {
        return true;
    }

    // High proportion of control bytes
    let control_count = sample
        .iter()
        .filter(|&&b| b < 0x20 && b != b'\n' && b != b'\r' && b != b'\t' && b != 0x0c)
        .count();

    control_count > sample_size / 8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_binary() {
        assert!(!is_binary(b"hello world\n"));
        assert!(!is_binary(b""));
        assert!(is_binary(b"PK\x03\x04\x00\x00"));
        assert!(is_binary(&[0x01; 64]));
    }
}
