//! Error types shared by the index structures, matchers and corpus loader.

use crate::index::types::DocId;
use std::collections::TryReserveError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type used across the library.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors reported by lexscan operations.
///
/// Every failure is local to the call that produced it. Nothing is retried and
/// no error leaves a structure in an unusable state; the caller decides
/// whether to skip the document or pattern and keep going.
#[derive(Error, Debug, Clone)]
pub enum Error {
    /// A parameter was rejected at the API boundary.
    #[error("invalid argument: {message}")]
    InvalidArgument {
        /// What was wrong with the argument.
        message: String,
    },

    /// Patterns must contain at least one byte.
    #[error("pattern is empty")]
    EmptyPattern,

    /// Bit-parallel matchers keep one state bit per pattern position.
    #[error("pattern is {len} bytes long, the maximum supported is {max}")]
    PatternTooLong { len: usize, max: usize },

    /// The multi-pattern automaton packs its states in a fixed-size array.
    #[error("{given} patterns supplied, at most {max} can be searched in one pass")]
    TooManyPatterns { given: usize, max: usize },

    /// A document was submitted to the inverted index without any tokens.
    #[error("document {doc_id} has no tokens")]
    EmptyDocument { doc_id: DocId },

    /// Some terms of a document could not be merged. Postings merged before
    /// the failure stay in the index.
    #[error("document {doc_id}: {failed_terms} term(s) could not be merged")]
    PartialIndexing { doc_id: DocId, failed_terms: usize },

    /// Growing an internal buffer failed.
    #[error("allocation failed while growing {context}")]
    Allocation {
        context: &'static str,
        #[source]
        source: TryReserveError,
    },

    /// Reading a corpus file failed.
    #[error("failed to read {}: {message}", path.display())]
    Io { path: PathBuf, message: String },

    /// A corpus include glob did not compile.
    #[error("invalid glob pattern: {0}")]
    Glob(String),

    /// A configuration file could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// Create an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Wrap a failed reservation, naming the buffer that was growing.
    pub fn allocation(context: &'static str, source: TryReserveError) -> Self {
        Self::Allocation { context, source }
    }

    /// Wrap an I/O failure for the given path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: source.to_string(),
        }
    }
}

impl From<globset::Error> for Error {
    fn from(err: globset::Error) -> Self {
        Self::Glob(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}
