//! # lexscan - Lexical Indexing and Exact Pattern Search
//!
//! lexscan loads a corpus of text documents into memory, builds lexical
//! structures over their words, and scans the raw text with three classic
//! exact-matching automata whose work is measured in comparisons.
//!
//! ## Architecture
//!
//! The crate is organized into these main modules:
//!
//! - [`index`] - Hash table, vocabulary trie, inverted index, corpus loading
//!   and the indexing pipeline
//! - [`search`] - KMP, Shift-And and Shift-Or matchers, multi-pattern
//!   Shift-And, benchmarking and corpus-wide search
//! - [`utils`] - Normalization, tokenization, stopwords, HTML text extraction
//! - [`output`] - Coloured terminal rendering and CSV/JSON export
//! - [`config`] - JSON-loadable settings
//!
//! ## Quick Start
//!
//! ```no_run
//! use lexscan::config::Config;
//! use lexscan::index::{build_index, load_corpus};
//! use lexscan::search::{search_corpus, Algorithm};
//! use std::path::Path;
//!
//! let config = Config::default();
//! let (documents, _) = load_corpus(Path::new("corpus"), &config.corpus).unwrap();
//! let index = build_index(&documents, &config.index, true).unwrap();
//!
//! for (word, count) in index.word_counts.top_n(10) {
//!     println!("{word}: {count}");
//! }
//!
//! let search = search_corpus(&documents, "biblioteca", Algorithm::ShiftOr).unwrap();
//! println!("{} matches", search.total_matches);
//! ```
//!
//! All structures are built once and then only read. Nothing is persisted.

pub mod config;
pub mod error;
pub mod index;
pub mod output;
pub mod search;
pub mod utils;

pub use error::{Error, Result};
