//! Trie, word table and inverted index checked against plain maps.

use lexscan::index::{HashTable, InvertedIndex, Trie};
use lexscan::utils::Token;
use lexscan::Error;
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

/// Short words over a tiny alphabet so prefixes and repeats are common
fn word() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(vec!['a', 'b', 'c']), 1..=5)
        .prop_map(|chars| chars.into_iter().collect())
}

fn counts(words: &[String]) -> BTreeMap<&str, u32> {
    let mut counts = BTreeMap::new();
    for w in words {
        *counts.entry(w.as_str()).or_insert(0) += 1;
    }
    counts
}

fn tokens(words: &[String]) -> Vec<Token> {
    let mut position = 0;
    words
        .iter()
        .map(|w| {
            let token = Token::new(w.clone(), position, true);
            position += w.len() + 1;
            token
        })
        .collect()
}

proptest! {
    #[test]
    fn trie_frequency_counts_insertions(
        words in prop::collection::vec(word(), 0..80),
        other in word(),
    ) {
        let mut trie = Trie::new();
        for w in &words {
            trie.insert(w);
        }

        let expected = counts(&words);
        for (w, n) in &expected {
            prop_assert!(trie.search(w));
            prop_assert_eq!(trie.get_frequency(w), *n);
        }
        if !expected.contains_key(other.as_str()) {
            prop_assert!(!trie.search(&other));
            prop_assert_eq!(trie.get_frequency(&other), 0);
        }
        prop_assert_eq!(trie.word_count(), expected.len());
    }

    #[test]
    fn prefix_listing_is_exact(
        words in prop::collection::vec(word(), 0..80),
        prefix in word(),
    ) {
        let mut trie = Trie::new();
        for w in &words {
            trie.insert(w);
        }

        let expected: BTreeMap<&str, u32> = counts(&words)
            .into_iter()
            .filter(|(w, _)| w.starts_with(prefix.as_str()))
            .collect();

        let result = trie.get_words_with_prefix(&prefix);
        let listed: BTreeMap<&str, u32> = result.iter().collect();
        prop_assert_eq!(listed.len(), result.len(), "duplicate words listed");
        prop_assert_eq!(listed, expected);
    }

    #[test]
    fn postings_are_unique_with_exact_frequencies(
        docs in prop::collection::vec(prop::collection::vec(word(), 1..30), 1..10),
    ) {
        let mut index = InvertedIndex::new(16).unwrap();
        for (doc_id, words) in docs.iter().enumerate() {
            index.add_document(doc_id as u32, &tokens(words)).unwrap();
        }
        prop_assert_eq!(index.total_docs_indexed(), docs.len());

        let mut vocabulary = BTreeSet::new();
        for words in &docs {
            vocabulary.extend(words.iter().map(String::as_str));
        }
        prop_assert_eq!(index.term_count(), vocabulary.len());

        for term in vocabulary {
            let list = index.get_posting_list(term).unwrap();
            let ids: Vec<u32> = list.doc_ids().collect();
            let unique: BTreeSet<u32> = ids.iter().copied().collect();
            prop_assert_eq!(unique.len(), ids.len(), "duplicate posting for {}", term);

            for posting in list {
                let in_doc = docs[posting.doc_id as usize]
                    .iter()
                    .filter(|w| w.as_str() == term)
                    .count() as u32;
                prop_assert_eq!(posting.frequency_in_doc, in_doc);
            }

            let containing = docs.iter().filter(|d| d.iter().any(|w| w == term)).count();
            prop_assert_eq!(list.len(), containing);
        }
    }

    #[test]
    fn word_table_insert_is_additive(
        entries in prop::collection::vec((word(), 1u64..100), 0..60),
    ) {
        let mut table: HashTable<u64> = HashTable::new(8).unwrap();
        let mut expected: BTreeMap<&str, u64> = BTreeMap::new();
        for (w, v) in &entries {
            table.insert(w, *v).unwrap();
            *expected.entry(w.as_str()).or_insert(0) += v;
        }

        prop_assert_eq!(table.len(), expected.len());
        for (w, v) in &expected {
            prop_assert_eq!(table.get(w), Some(*v));
        }
    }
}

#[test]
fn empty_document_is_rejected() {
    let mut index = InvertedIndex::new(16).unwrap();
    assert!(matches!(
        index.add_document(3, &[]),
        Err(Error::EmptyDocument { doc_id: 3 })
    ));
    assert_eq!(index.total_docs_indexed(), 0);
    assert_eq!(index.term_count(), 0);
}
