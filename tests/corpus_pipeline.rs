//! End-to-end: load a corpus from disk, index it, and search it.

use lexscan::config::{CorpusConfig, IndexConfig};
use lexscan::index::{build_index, load_corpus};
use lexscan::search::benchmark::compare_on_corpus;
use lexscan::search::{search_corpus, Algorithm};
use lexscan::utils::StopwordLanguage;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write(root: &Path, rel: &str, content: &[u8]) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn fixture() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();

    write(root, "a.txt", b"the there their\nthe theory");
    write(
        root,
        "b/c.html",
        b"<html><body><p>There &amp; their</p><script>the the</script></body></html>",
    );
    write(root, "d.txt", b"unrelated words");
    write(root, ".hidden.txt", b"the the the");
    write(root, "e.txt", b"\0\0\0the\0\0");
    write(root, "notes.md", b"the");

    dir
}

fn index_config() -> IndexConfig {
    IndexConfig {
        stopwords: StopwordLanguage::None,
        ..Default::default()
    }
}

#[test]
fn loads_only_matching_text_files() {
    let dir = fixture();
    let (documents, stats) = load_corpus(dir.path(), &CorpusConfig::default()).unwrap();

    let paths: Vec<PathBuf> = documents.iter().map(|d| d.path.clone()).collect();
    assert_eq!(
        paths,
        vec![PathBuf::from("a.txt"), PathBuf::from("b/c.html"), PathBuf::from("d.txt")]
    );
    let ids: Vec<u32> = documents.iter().map(|d| d.doc_id).collect();
    assert_eq!(ids, vec![0, 1, 2]);

    assert_eq!(stats.total_files_found, 4);
    assert_eq!(stats.files_loaded, 3);
    assert_eq!(stats.files_skipped, 1);
    assert_eq!(stats.html_files, 1);
    assert_eq!(stats.text_files, 2);

    // Markup and script bodies are gone
    assert!(!documents[1].text.contains('<'));
    assert!(!documents[1].text.contains("the the"));
    assert!(documents[1].text.contains("There & their"));
}

#[test]
fn non_recursive_and_limit() {
    let dir = fixture();
    let config = CorpusConfig {
        recursive: false,
        limit: Some(1),
        ..Default::default()
    };
    let (documents, stats) = load_corpus(dir.path(), &config).unwrap();

    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].path, PathBuf::from("a.txt"));
    assert_eq!(stats.files_loaded, 1);
}

#[test]
fn missing_root_is_an_error() {
    let dir = TempDir::new().unwrap();
    assert!(load_corpus(&dir.path().join("missing"), &CorpusConfig::default()).is_err());
}

#[test]
fn vocabulary_and_postings() {
    let dir = fixture();
    let (documents, _) = load_corpus(dir.path(), &CorpusConfig::default()).unwrap();
    let index = build_index(&documents, &index_config(), true).unwrap();

    assert_eq!(index.stats.documents_indexed, 3);
    assert_eq!(index.inverted.total_docs_indexed(), 3);

    let prefixed = index.trie.get_words_with_prefix("the");
    let mut words: Vec<&str> = prefixed.iter().map(|(w, _)| w).collect();
    words.sort_unstable();
    assert_eq!(words, vec!["the", "their", "theory", "there"]);
    assert_eq!(prefixed.frequency_of("the"), Some(2));
    assert_eq!(prefixed.frequency_of("there"), Some(2));
    assert_eq!(prefixed.frequency_of("their"), Some(2));
    assert_eq!(prefixed.frequency_of("theory"), Some(1));
    assert!(index.trie.get_words_with_prefix("xyz").is_empty());

    assert_eq!(index.word_counts.get("there"), Some(2));

    let the: Vec<_> = index
        .inverted
        .get_posting_list("the")
        .unwrap()
        .iter()
        .map(|p| (p.doc_id, p.frequency_in_doc))
        .collect();
    assert_eq!(the, vec![(0, 2)]);

    let their: Vec<_> = index
        .inverted
        .get_posting_list("their")
        .unwrap()
        .iter()
        .map(|p| (p.doc_id, p.frequency_in_doc))
        .collect();
    assert_eq!(their, vec![(0, 1), (1, 1)]);
    assert!(index.inverted.get_posting_list("missing").is_none());
}

#[test]
fn exact_search_over_raw_text() {
    let dir = fixture();
    let (documents, _) = load_corpus(dir.path(), &CorpusConfig::default()).unwrap();

    for algorithm in Algorithm::ALL {
        let search = search_corpus(&documents, "the", algorithm).unwrap();
        assert_eq!(search.documents_searched, 3);

        let ids: Vec<u32> = search.documents.iter().map(|d| d.doc_id).collect();
        assert_eq!(ids, vec![0, 1]);
        assert_eq!(
            search.documents[0].results.positions().collect::<Vec<_>>(),
            vec![0, 4, 10, 16, 20]
        );
        // "There" is not matched, "their" is
        assert_eq!(search.documents[1].results.len(), 1);
        assert_eq!(search.total_matches, 6);
    }
}

#[test]
fn corpus_benchmark_agrees() {
    let dir = fixture();
    let (documents, _) = load_corpus(dir.path(), &CorpusConfig::default()).unwrap();

    let report = compare_on_corpus(&documents, b"the", None);
    assert!(report.results_agree());
    for algorithm in Algorithm::ALL {
        assert_eq!(report.stats(algorithm).unwrap().matches_found, 6);
    }
}
