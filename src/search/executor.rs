//! Pattern search across a loaded corpus.

use super::{Algorithm, PatternMatcher, SearchResults};
use crate::error::Result;
use crate::index::types::{DocId, Document};
use rayon::prelude::*;
use std::time::{Duration, Instant};

/// Matches found in one document
#[derive(Debug, Clone)]
pub struct DocumentMatches {
    pub doc_id: DocId,
    pub results: SearchResults,
}

/// Result of [`search_corpus`]
#[derive(Debug, Clone)]
pub struct CorpusSearch {
    pub algorithm: Algorithm,
    pub pattern: String,
    /// Documents with at least one match, in doc id order
    pub documents: Vec<DocumentMatches>,
    pub documents_searched: usize,
    pub total_matches: usize,
    pub total_comparisons: u64,
    pub elapsed: Duration,
}

impl CorpusSearch {
    pub fn documents_with_matches(&self) -> usize {
        self.documents.len()
    }
}

/// Scan every document for `pattern` with `algorithm`.
///
/// The pattern is preprocessed once and the read-only table is shared by
/// the workers. Fails only if the pattern is rejected or a result buffer
/// cannot grow.
pub fn search_corpus(
    documents: &[Document],
    pattern: &str,
    algorithm: Algorithm,
) -> Result<CorpusSearch> {
    let start = Instant::now();
    let compiled = algorithm.compile(pattern.as_bytes())?;

    let scanned: Vec<(DocId, SearchResults)> = documents
        .par_iter()
        .map(|doc| {
            compiled
                .find_all(doc.text.as_bytes())
                .map(|results| (doc.doc_id, results))
        })
        .collect::<Result<_>>()?;

    let total_comparisons = scanned.iter().map(|(_, r)| r.total_comparisons()).sum();
    let mut matched: Vec<DocumentMatches> = scanned
        .into_iter()
        .filter(|(_, r)| !r.is_empty())
        .map(|(doc_id, results)| DocumentMatches { doc_id, results })
        .collect();
    matched.sort_by_key(|m| m.doc_id);

    let total_matches = matched.iter().map(|m| m.results.len()).sum();
    let elapsed = start.elapsed();

    tracing::info!(
        %algorithm,
        pattern,
        documents = documents.len(),
        matched = matched.len(),
        total_matches,
        elapsed_ms = elapsed.as_millis() as u64,
        "corpus search finished"
    );

    Ok(CorpusSearch {
        algorithm,
        pattern: pattern.to_string(),
        documents: matched,
        documents_searched: documents.len(),
        total_matches,
        total_comparisons,
        elapsed,
    })
}

/// Byte range of up to `radius` bytes either side of a match, widened to
/// char boundaries.
pub fn context_bounds(text: &str, position: usize, match_len: usize, radius: usize) -> (usize, usize) {
    let mut start = position.saturating_sub(radius).min(text.len());
    while !text.is_char_boundary(start) {
        start -= 1;
    }
    let mut end = position
        .saturating_add(match_len)
        .saturating_add(radius)
        .min(text.len());
    while !text.is_char_boundary(end) {
        end += 1;
    }
    (start, end)
}

/// Replace line breaks and tabs with spaces
pub fn flatten_whitespace(text: &str) -> String {
    text.chars()
        .map(|c| if matches!(c, '\n' | '\r' | '\t') { ' ' } else { c })
        .collect()
}

/// Text around a match (see [`context_bounds`]) on a single line.
pub fn context_snippet(text: &str, position: usize, match_len: usize, radius: usize) -> String {
    let (start, end) = context_bounds(text, position, match_len, radius);
    flatten_whitespace(&text[start..end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::types::DocumentKind;
    use std::path::PathBuf;

    fn corpus() -> Vec<Document> {
        ["el gato y el perro", "sin coincidencias", "gato gato"]
            .iter()
            .enumerate()
            .map(|(i, text)| Document {
                doc_id: i as DocId,
                path: PathBuf::from(format!("doc{}.txt", i)),
                kind: DocumentKind::Text,
                size: text.len() as u64,
                text: text.to_string(),
            })
            .collect()
    }

    #[test]
    fn test_search_corpus() {
        let docs = corpus();
        for algorithm in Algorithm::ALL {
            let search = search_corpus(&docs, "gato", algorithm).unwrap();
            assert_eq!(search.documents_searched, 3);
            assert_eq!(search.documents_with_matches(), 2);
            assert_eq!(search.total_matches, 3);
            assert_eq!(search.documents[0].doc_id, 0);
            assert_eq!(
                search.documents[1].results.positions().collect::<Vec<_>>(),
                vec![0, 5]
            );
        }
    }

    #[test]
    fn test_search_corpus_rejects_pattern() {
        let docs = corpus();
        assert!(search_corpus(&docs, "", Algorithm::Kmp).is_err());
        let long = "x".repeat(64);
        assert!(search_corpus(&docs, &long, Algorithm::ShiftOr).is_err());
        assert!(search_corpus(&docs, &long, Algorithm::Kmp).is_ok());
    }

    #[test]
    fn test_context_snippet() {
        let text = "line one\nline two with match here\nline three";
        let pos = text.find("match").unwrap();
        assert_eq!(context_snippet(text, pos, 5, 4), "ith match her");
        assert_eq!(context_snippet(text, 0, 4, 6), "line one l");
    }

    #[test]
    fn test_context_snippet_char_boundaries() {
        let text = "ñañañaña";
        // Byte 3 falls inside the second 'ñ'
        let snippet = context_snippet(text, 4, 1, 1);
        assert!(snippet.len() >= 2);
        assert_eq!(context_snippet(text, 0, text.len(), 100), text);
    }
}
