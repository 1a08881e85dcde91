//! Configuration for corpus loading, indexing and search.
//!
//! Every section falls back to its defaults, so a config file only needs the
//! keys it changes:
//!
//! ```json
//! { "index": { "stopwords": "english" }, "search": { "algorithm": "shift-or" } }
//! ```

use crate::error::{Error, Result};
use crate::search::Algorithm;
use crate::utils::{NormalizationConfig, StopwordLanguage, TokenizerConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub corpus: CorpusConfig,
    pub index: IndexConfig,
    pub search: SearchConfig,
}

impl Config {
    /// Read a JSON config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings no component can work with
    pub fn validate(&self) -> Result<()> {
        if self.index.word_table_capacity == 0 {
            return Err(Error::Config("index.word_table_capacity must be non-zero".into()));
        }
        if self.corpus.min_file_size > self.corpus.max_file_size {
            return Err(Error::Config(
                "corpus.min_file_size is larger than corpus.max_file_size".into(),
            ));
        }
        if self.corpus.include_globs.is_empty() {
            return Err(Error::Config("corpus.include_globs is empty".into()));
        }
        Ok(())
    }
}

/// Which files make up the corpus
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusConfig {
    /// Matched against the file name
    pub include_globs: Vec<String>,
    pub recursive: bool,
    /// Inclusive size window in bytes
    pub min_file_size: u64,
    pub max_file_size: u64,
    /// Keep at most this many documents
    pub limit: Option<usize>,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            include_globs: vec!["*.txt".into(), "*.html".into(), "*.htm".into()],
            recursive: true,
            min_file_size: 0,
            max_file_size: 10 * 1024 * 1024,
            limit: None,
        }
    }
}

/// How documents are preprocessed and indexed
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Buckets of the corpus-wide word count table
    pub word_table_capacity: usize,
    /// Buckets of the inverted index dictionary (0 = default)
    pub dictionary_capacity: usize,
    /// Shorter words stay out of the trie and the word table
    pub min_word_length: usize,
    pub stopwords: StopwordLanguage,
    pub tokenizer: TokenizerConfig,
    pub normalization: NormalizationConfig,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            word_table_capacity: 10_000,
            dictionary_capacity: crate::index::types::DEFAULT_DICTIONARY_CAPACITY,
            min_word_length: 3,
            stopwords: StopwordLanguage::default(),
            tokenizer: TokenizerConfig::default(),
            normalization: NormalizationConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub algorithm: Algorithm,
    /// Bytes of context printed on each side of a match
    pub context_radius: usize,
    /// Matches printed per document
    pub max_shown_matches: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::Kmp,
            context_radius: 30,
            max_shown_matches: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.index.word_table_capacity, 10_000);
        assert_eq!(config.index.dictionary_capacity, 1024);
        assert_eq!(config.index.min_word_length, 3);
        assert_eq!(config.search.algorithm, Algorithm::Kmp);
        assert_eq!(config.search.context_radius, 30);
        assert!(config.corpus.recursive);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json() {
        let config = Config::from_json(
            r#"{ "index": { "stopwords": "english", "tokenizer": { "keep_punctuation": true } },
                 "search": { "algorithm": "shift-or" } }"#,
        )
        .unwrap();
        assert_eq!(config.index.stopwords, StopwordLanguage::English);
        assert!(config.index.tokenizer.keep_punctuation);
        assert_eq!(config.index.tokenizer.max_token_length, 256);
        assert_eq!(config.search.algorithm, Algorithm::ShiftOr);
        assert_eq!(config.search.max_shown_matches, 10);
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            Config::from_json("{ not json"),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            Config::from_json(r#"{ "index": { "word_table_capacity": 0 } }"#),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lexscan.json");
        std::fs::write(&path, r#"{ "corpus": { "recursive": false, "limit": 5 } }"#).unwrap();

        let config = Config::load(&path).unwrap();
        assert!(!config.corpus.recursive);
        assert_eq!(config.corpus.limit, Some(5));

        assert!(matches!(
            Config::load(&dir.path().join("missing.json")),
            Err(Error::Io { .. })
        ));
    }
}
