use crate::config::IndexConfig;
use crate::error::{Error, Result};
use crate::index::hash_table::HashTable;
use crate::index::inverted::InvertedIndex;
use crate::index::trie::Trie;
use crate::index::types::Document;
use crate::utils::progress;
use crate::utils::{PreprocessingStats, ProcessedText, TextPipeline};
use rayon::prelude::*;
use serde::Serialize;
use std::time::{Duration, Instant};

/// Counters from an index build
#[derive(Debug, Clone, Default, Serialize)]
pub struct BuildStats {
    pub documents: usize,
    pub documents_indexed: usize,
    /// Documents left without tokens after preprocessing
    pub documents_empty: usize,
    /// Documents whose terms could not all be merged
    pub documents_failed: usize,
    /// Word occurrences fed to the trie and the word table
    pub vocabulary_insertions: u64,
    pub preprocessing: PreprocessingStats,
    #[serde(skip)]
    pub elapsed: Duration,
}

/// All in-memory structures built over a corpus
#[derive(Debug, Clone)]
pub struct CorpusIndex {
    /// Vocabulary of words at least `min_word_length` chars long
    pub trie: Trie,
    /// Corpus-wide occurrence count for the same words
    pub word_counts: HashTable<u64>,
    pub inverted: InvertedIndex,
    pub stats: BuildStats,
}

/// Build the vocabulary trie, word table and inverted index for `documents`.
///
/// Preprocessing runs in parallel; the structures themselves are filled on
/// the calling thread in doc id order. Documents that cannot be merged into
/// the inverted index are logged and counted, and the build goes on.
pub fn build_index(documents: &[Document], config: &IndexConfig, silent: bool) -> Result<CorpusIndex> {
    let start = Instant::now();
    let pipeline = TextPipeline::new(
        config.normalization.clone(),
        config.tokenizer.clone(),
        config.stopwords,
    );

    // Phase 1: preprocess in parallel
    let progress_bar = progress::bar(documents.len() as u64, "Preprocessing documents...", silent);
    let pb_clone = progress_bar.clone();
    let processed: Vec<ProcessedText> = documents
        .par_iter()
        .map(|doc| {
            let processed = pipeline.process(&doc.text);
            if let Some(ref pb) = pb_clone {
                pb.inc(1);
            }
            processed
        })
        .collect();
    if let Some(pb) = progress_bar {
        pb.finish_with_message(format!("Preprocessed {} documents", documents.len()));
    }

    // Phase 2: fill the structures
    let spinner = progress::spinner("Building index...", silent);

    let mut trie = Trie::new();
    let mut word_counts = HashTable::new(config.word_table_capacity)?;
    let mut inverted = InvertedIndex::new(config.dictionary_capacity)?;
    let mut stats = BuildStats {
        documents: documents.len(),
        ..Default::default()
    };

    for (doc, processed) in documents.iter().zip(&processed) {
        stats.preprocessing.merge(&processed.stats);

        for token in processed.tokens.iter().filter(|t| t.is_word) {
            if token.text.chars().count() < config.min_word_length {
                continue;
            }
            trie.insert(&token.text);
            word_counts.insert(&token.text, 1)?;
            stats.vocabulary_insertions += 1;
        }

        match inverted.add_document(doc.doc_id, &processed.tokens) {
            Ok(()) => stats.documents_indexed += 1,
            Err(Error::EmptyDocument { doc_id }) => {
                tracing::debug!(doc_id, path = %doc.path.display(), "document has no tokens");
                stats.documents_empty += 1;
            }
            Err(err) => {
                tracing::warn!(doc_id = doc.doc_id, path = %doc.path.display(), error = %err, "document only partially indexed");
                stats.documents_failed += 1;
            }
        }
    }

    stats.elapsed = start.elapsed();

    if let Some(spinner) = spinner {
        spinner.finish_with_message("Index complete");
    }

    tracing::info!(
        documents = stats.documents,
        indexed = stats.documents_indexed,
        failed = stats.documents_failed,
        words = trie.word_count(),
        terms = inverted.term_count(),
        elapsed_ms = stats.elapsed.as_millis() as u64,
        "index built"
    );

    Ok(CorpusIndex {
        trie,
        word_counts,
        inverted,
        stats,
    })
}
