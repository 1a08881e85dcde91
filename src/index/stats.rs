use crate::index::build::CorpusIndex;
use crate::index::corpus::LoadStats;
use crate::index::trie::TrieStats;
use crate::index::types::{Document, SizeClass};
use serde::Serialize;

/// Prefixes reported by default in an analysis
pub const SAMPLE_PREFIXES: [&str; 5] = ["de", "la", "el", "en", "un"];

/// Documents per size class
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct SizeDistribution {
    /// Under 1 KiB
    pub small: usize,
    /// 1 to 10 KiB
    pub medium: usize,
    /// Over 10 KiB
    pub large: usize,
}

impl SizeDistribution {
    pub fn total(&self) -> usize {
        self.small + self.medium + self.large
    }

    fn percent(&self, n: usize) -> f64 {
        if self.total() == 0 {
            0.0
        } else {
            100.0 * n as f64 / self.total() as f64
        }
    }
}

/// Corpus-level metrics derived from loaded documents and their index
#[derive(Debug, Clone, Serialize)]
pub struct CorpusAnalysis {
    pub documents_processed: usize,
    pub total_characters: usize,
    /// Word tokens left after stopword filtering
    pub total_words: usize,
    /// Distinct words in the vocabulary trie
    pub unique_words: usize,
    /// Count of `.`, `!` and `?`
    pub estimated_sentences: usize,
    pub avg_words_per_doc: f64,
    pub avg_chars_per_doc: f64,
    /// unique_words / total_words
    pub lexical_diversity: f64,
    pub size_distribution: SizeDistribution,
    #[serde(skip)]
    pub trie: TrieStats,
    pub trie_nodes: usize,
    pub trie_depth: usize,
    pub word_table_load_factor: f64,
    pub word_table_longest_chain: usize,
    pub inverted_terms: usize,
    pub top_words: Vec<(String, u64)>,
    /// (prefix, number of distinct words starting with it)
    pub prefix_counts: Vec<(String, usize)>,
}

/// Count sentence terminators
pub fn count_sentences(text: &str) -> usize {
    memchr::memchr3_iter(b'.', b'!', b'?', text.as_bytes()).count()
}

impl CorpusAnalysis {
    pub fn compute(
        documents: &[Document],
        index: &CorpusIndex,
        prefixes: &[&str],
        top_n: usize,
    ) -> Self {
        let mut size_distribution = SizeDistribution::default();
        let mut total_characters = 0;
        let mut estimated_sentences = 0;

        for doc in documents {
            match doc.size_class() {
                SizeClass::Small => size_distribution.small += 1,
                SizeClass::Medium => size_distribution.medium += 1,
                SizeClass::Large => size_distribution.large += 1,
            }
            total_characters += doc.text.chars().count();
            estimated_sentences += count_sentences(&doc.text);
        }

        let documents_processed = documents.len();
        let total_words = index.stats.preprocessing.words_count;
        let trie = index.trie.stats();
        let per_doc = |n: usize| {
            if documents_processed == 0 {
                0.0
            } else {
                n as f64 / documents_processed as f64
            }
        };

        Self {
            documents_processed,
            total_characters,
            total_words,
            unique_words: trie.word_count,
            estimated_sentences,
            avg_words_per_doc: per_doc(total_words),
            avg_chars_per_doc: per_doc(total_characters),
            lexical_diversity: if total_words == 0 {
                0.0
            } else {
                trie.word_count as f64 / total_words as f64
            },
            size_distribution,
            trie,
            trie_nodes: trie.node_count,
            trie_depth: trie.depth,
            word_table_load_factor: index.word_counts.load_factor(),
            word_table_longest_chain: index.word_counts.longest_chain(),
            inverted_terms: index.inverted.term_count(),
            top_words: index
                .word_counts
                .top_n(top_n)
                .into_iter()
                .map(|(w, c)| (w.to_string(), c))
                .collect(),
            prefix_counts: prefixes
                .iter()
                .map(|p| (p.to_string(), index.trie.get_words_with_prefix(p).len()))
                .collect(),
        }
    }
}

/// Display corpus analysis
pub fn show_analysis(analysis: &CorpusAnalysis, elapsed_secs: f64) {
    println!("Corpus Analysis");
    println!("===============");
    println!();
    println!("Documents processed:   {}", analysis.documents_processed);
    println!("Analysis time:         {:.2}s", elapsed_secs);
    println!("Total characters:      {}", analysis.total_characters);
    println!("Total words:           {}", analysis.total_words);
    println!("Unique words:          {}", analysis.unique_words);
    println!("Estimated sentences:   {}", analysis.estimated_sentences);
    println!("Avg words/doc:         {:.1}", analysis.avg_words_per_doc);
    println!("Avg characters/doc:    {:.1}", analysis.avg_chars_per_doc);
    println!("Lexical diversity:     {:.3}", analysis.lexical_diversity);
    if elapsed_secs > 0.0 {
        println!(
            "Processing speed:      {:.1} docs/s",
            analysis.documents_processed as f64 / elapsed_secs
        );
    }

    let dist = &analysis.size_distribution;
    println!();
    println!("Documents by size:");
    println!("  {:15} {} ({:.1}%)", "< 1 KB", dist.small, dist.percent(dist.small));
    println!("  {:15} {} ({:.1}%)", "1-10 KB", dist.medium, dist.percent(dist.medium));
    println!("  {:15} {} ({:.1}%)", "> 10 KB", dist.large, dist.percent(dist.large));

    println!();
    println!("Index structure:");
    println!("  Trie nodes:          {}", analysis.trie_nodes);
    println!("  Trie depth:          {}", analysis.trie_depth);
    println!("  Nodes per word:      {:.1}%", analysis.trie.compression_factor());
    println!("  Hash load factor:    {:.2}", analysis.word_table_load_factor);
    println!("  Longest hash chain:  {}", analysis.word_table_longest_chain);
    println!("  Inverted terms:      {}", analysis.inverted_terms);

    if !analysis.top_words.is_empty() {
        println!();
        println!("Most frequent words:");
        for (word, count) in &analysis.top_words {
            println!("  {:20} {}", word, count);
        }
    }

    if !analysis.prefix_counts.is_empty() {
        println!();
        println!("Words by prefix:");
        for (prefix, count) in &analysis.prefix_counts {
            println!("  {:10} {} words", format!("'{}'", prefix), count);
        }
    }
}

/// Display corpus loading counters
pub fn show_load_stats(stats: &LoadStats) {
    println!("Corpus Loading");
    println!("==============");
    println!();
    println!("Files found:       {}", stats.total_files_found);
    println!("Files loaded:      {}", stats.files_loaded);
    println!("Files failed:      {}", stats.files_failed);
    println!("Files skipped:     {}", stats.files_skipped);
    println!("Bytes loaded:      {}", format_size(stats.total_bytes_loaded));
    println!("Loading time:      {:.2}s", stats.loading_time.as_secs_f64());

    println!();
    println!("Files by kind:");
    for (kind, count) in [
        ("txt", stats.text_files),
        ("html", stats.html_files),
        ("csv", stats.csv_files),
        ("other", stats.other_files),
    ] {
        if count > 0 {
            println!("  {:15} {}", kind, count);
        }
    }
}

/// Display the size of the built structures
pub fn show_index_summary(index: &CorpusIndex) {
    let stats = &index.stats;
    let trie = index.trie.stats();

    println!("Index Statistics");
    println!("================");
    println!();
    println!("Documents:         {}", stats.documents);
    println!("Indexed:           {}", stats.documents_indexed);
    if stats.documents_empty > 0 {
        println!("Empty:             {}", stats.documents_empty);
    }
    if stats.documents_failed > 0 {
        println!("Failed:            {}", stats.documents_failed);
    }
    println!("Build time:        {:.2}s", stats.elapsed.as_secs_f64());

    println!();
    println!("Trie words:        {}", trie.word_count);
    println!("Trie nodes:        {}", trie.node_count);
    println!("Trie depth:        {}", trie.depth);
    println!("Trie memory:       {}", format_size(index.trie.memory_usage() as u64));
    println!("Word table:        {} keys / {} buckets", index.word_counts.len(), index.word_counts.capacity());
    println!("Inverted terms:    {}", index.inverted.term_count());
    println!(
        "Stopwords removed: {}",
        stats.preprocessing.stopwords_removed
    );
    println!(
        "Compression:       {:.1}%",
        stats.preprocessing.compression_ratio * 100.0
    );
}

/// Format byte size to human readable
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IndexConfig;
    use crate::index::build::build_index;
    use crate::index::types::{DocId, DocumentKind};
    use std::path::PathBuf;

    #[test]
    fn test_count_sentences() {
        assert_eq!(count_sentences("Uno. ¿Dos? ¡Tres! Cuatro"), 3);
        assert_eq!(count_sentences(""), 0);
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 bytes");
        assert_eq!(format_size(2048), "2.00 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.00 MB");
    }

    #[test]
    fn test_compute_analysis() {
        let long = "palabra ".repeat(200);
        let texts = ["Puerto decisión. El puerto de la costa!", long.as_str()];
        let documents: Vec<Document> = texts
            .iter()
            .enumerate()
            .map(|(i, text)| Document {
                doc_id: i as DocId,
                path: PathBuf::from(format!("{}.txt", i)),
                kind: DocumentKind::Text,
                size: text.len() as u64,
                text: text.to_string(),
            })
            .collect();

        let index = build_index(&documents, &IndexConfig::default(), true).unwrap();
        let analysis = CorpusAnalysis::compute(&documents, &index, &SAMPLE_PREFIXES, 2);

        assert_eq!(analysis.documents_processed, 2);
        assert_eq!(analysis.estimated_sentences, 2);
        assert_eq!(analysis.size_distribution.small, 1);
        assert_eq!(analysis.size_distribution.medium, 1);
        // puerto x2, decision, costa, palabra x200
        assert_eq!(analysis.total_words, 204);
        assert_eq!(analysis.unique_words, 4);
        assert_eq!(analysis.top_words[0], ("palabra".to_string(), 200));
        assert_eq!(analysis.top_words[1], ("puerto".to_string(), 2));

        let de = analysis.prefix_counts.iter().find(|(p, _)| p == "de").unwrap();
        assert_eq!(de.1, 1);
        assert!((analysis.lexical_diversity - 4.0 / 204.0).abs() < 1e-9);
    }
}
