//! Term → posting list dictionary.
//!
//! Documents are added whole: their word tokens are first counted in a
//! throwaway [`HashTable`], then each distinct term is merged into the global
//! dictionary once. A term therefore never has two postings for the same
//! document, however often it occurs there.

use crate::error::{Error, Result};
use crate::index::hash_table::{bucket_of, HashTable};
use crate::index::types::{DocId, DEFAULT_DICTIONARY_CAPACITY, DEFAULT_POSTING_LIST_CAPACITY};
use crate::utils::tokenizer::Token;
use serde::Serialize;

/// One (document, in-document frequency) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Posting {
    pub doc_id: DocId,
    pub frequency_in_doc: u32,
}

/// Append-only list of postings for a single term, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct PostingList {
    postings: Vec<Posting>,
}

impl PostingList {
    fn with_capacity(capacity: usize) -> Result<Self> {
        let mut postings = Vec::new();
        postings
            .try_reserve_exact(capacity)
            .map_err(|e| Error::allocation("posting list", e))?;
        Ok(Self { postings })
    }

    /// Append a posting, doubling the buffer when it is full.
    fn push(&mut self, posting: Posting) -> Result<()> {
        if self.postings.len() == self.postings.capacity() {
            let additional = self.postings.capacity().max(DEFAULT_POSTING_LIST_CAPACITY);
            self.postings
                .try_reserve_exact(additional)
                .map_err(|e| Error::allocation("posting list", e))?;
        }
        self.postings.push(posting);
        Ok(())
    }

    pub fn postings(&self) -> &[Posting] {
        &self.postings
    }

    pub fn len(&self) -> usize {
        self.postings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Posting> {
        self.postings.iter()
    }

    pub fn doc_ids(&self) -> impl Iterator<Item = DocId> + '_ {
        self.postings.iter().map(|p| p.doc_id)
    }

    /// Sum of in-document frequencies
    pub fn total_frequency(&self) -> u64 {
        self.postings.iter().map(|p| p.frequency_in_doc as u64).sum()
    }
}

impl<'a> IntoIterator for &'a PostingList {
    type Item = &'a Posting;
    type IntoIter = std::slice::Iter<'a, Posting>;

    fn into_iter(self) -> Self::IntoIter {
        self.postings.iter()
    }
}

#[derive(Debug, Clone)]
struct IndexTermEntry {
    term: String,
    posting_list: PostingList,
}

/// Hash-bucketed dictionary from terms to their posting lists.
#[derive(Debug, Clone)]
pub struct InvertedIndex {
    dictionary: Vec<Vec<IndexTermEntry>>,
    /// Distinct terms
    dict_size: usize,
    /// Documents whose every term was merged
    total_docs_indexed: usize,
    /// Merging this term fails, to exercise partial indexing
    #[cfg(test)]
    fail_on_term: Option<String>,
}

impl Default for InvertedIndex {
    fn default() -> Self {
        let mut dictionary = Vec::with_capacity(DEFAULT_DICTIONARY_CAPACITY);
        dictionary.resize_with(DEFAULT_DICTIONARY_CAPACITY, Vec::new);
        Self {
            dictionary,
            dict_size: 0,
            total_docs_indexed: 0,
            #[cfg(test)]
            fail_on_term: None,
        }
    }
}

impl InvertedIndex {
    /// Create an index whose dictionary has `capacity` buckets.
    ///
    /// Zero selects [`DEFAULT_DICTIONARY_CAPACITY`].
    pub fn new(capacity: usize) -> Result<Self> {
        let capacity = if capacity == 0 {
            DEFAULT_DICTIONARY_CAPACITY
        } else {
            capacity
        };

        let mut dictionary = Vec::new();
        dictionary
            .try_reserve_exact(capacity)
            .map_err(|e| Error::allocation("term dictionary", e))?;
        dictionary.resize_with(capacity, Vec::new);

        Ok(Self {
            dictionary,
            dict_size: 0,
            total_docs_indexed: 0,
            #[cfg(test)]
            fail_on_term: None,
        })
    }

    /// Index the word tokens of one document.
    ///
    /// Non-word tokens are ignored. An empty token list is rejected. If some
    /// terms cannot be merged the others are still merged, nothing is rolled
    /// back, and the document is not counted as indexed.
    pub fn add_document(&mut self, doc_id: DocId, tokens: &[Token]) -> Result<()> {
        if tokens.is_empty() {
            return Err(Error::EmptyDocument { doc_id });
        }

        let mut term_frequencies: HashTable<u32> = HashTable::new(tokens.len() / 2 + 1)?;
        for token in tokens.iter().filter(|t| t.is_word && !t.text.is_empty()) {
            term_frequencies.insert(&token.text, 1)?;
        }

        let mut failed_terms = 0;
        for (term, count) in term_frequencies.iter() {
            if let Err(err) = self.add_term_occurrence(term, doc_id, count) {
                tracing::warn!(doc_id, term, error = %err, "failed to merge term");
                failed_terms += 1;
            }
        }

        if failed_terms > 0 {
            return Err(Error::PartialIndexing {
                doc_id,
                failed_terms,
            });
        }

        self.total_docs_indexed += 1;
        Ok(())
    }

    fn add_term_occurrence(&mut self, term: &str, doc_id: DocId, frequency: u32) -> Result<()> {
        #[cfg(test)]
        if self.fail_on_term.as_deref() == Some(term) {
            return Err(Error::invalid_argument(format!("merge of '{}' refused", term)));
        }

        let posting = Posting {
            doc_id,
            frequency_in_doc: frequency,
        };
        let index = bucket_of(term, self.dictionary.len());
        let chain = &mut self.dictionary[index];

        if let Some(entry) = chain.iter_mut().find(|e| e.term == term) {
            return entry.posting_list.push(posting);
        }

        let mut posting_list = PostingList::with_capacity(DEFAULT_POSTING_LIST_CAPACITY)?;
        posting_list.push(posting)?;
        chain
            .try_reserve(1)
            .map_err(|e| Error::allocation("term dictionary chain", e))?;
        chain.push(IndexTermEntry {
            term: term.to_owned(),
            posting_list,
        });
        self.dict_size += 1;
        Ok(())
    }

    /// Posting list for `term`, if it was ever indexed.
    pub fn get_posting_list(&self, term: &str) -> Option<&PostingList> {
        let index = bucket_of(term, self.dictionary.len());
        self.dictionary[index]
            .iter()
            .find(|e| e.term == term)
            .map(|e| &e.posting_list)
    }

    /// Number of documents containing `term`
    pub fn document_frequency(&self, term: &str) -> usize {
        self.get_posting_list(term).map_or(0, PostingList::len)
    }

    /// Number of distinct terms
    pub fn term_count(&self) -> usize {
        self.dict_size
    }

    pub fn total_docs_indexed(&self) -> usize {
        self.total_docs_indexed
    }

    /// Dictionary bucket count
    pub fn capacity(&self) -> usize {
        self.dictionary.len()
    }

    pub fn load_factor(&self) -> f64 {
        self.dict_size as f64 / self.dictionary.len() as f64
    }

    /// All terms with their posting lists, in dictionary order
    pub fn terms(&self) -> impl Iterator<Item = (&str, &PostingList)> + '_ {
        self.dictionary
            .iter()
            .flat_map(|chain| chain.iter().map(|e| (e.term.as_str(), &e.posting_list)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::tokenizer::tokenize_simple;

    fn word(text: &str, position: usize) -> Token {
        Token::new(text.to_string(), position, true)
    }

    #[test]
    fn test_partial_indexing_keeps_merged_terms() {
        let mut index = InvertedIndex::new(64).unwrap();
        index
            .add_document(0, &[word("alpha", 0), word("beta", 6)])
            .unwrap();

        index.fail_on_term = Some("gamma".to_string());
        let result = index.add_document(1, &[word("alpha", 0), word("gamma", 6), word("alpha", 12)]);
        assert!(matches!(
            result,
            Err(Error::PartialIndexing {
                doc_id: 1,
                failed_terms: 1
            })
        ));

        // Earlier postings and the other term of the failed document survive
        let alpha: Vec<_> = index
            .get_posting_list("alpha")
            .unwrap()
            .iter()
            .map(|p| (p.doc_id, p.frequency_in_doc))
            .collect();
        assert_eq!(alpha, vec![(0, 1), (1, 2)]);
        assert_eq!(index.get_posting_list("beta").unwrap().len(), 1);
        assert!(index.get_posting_list("gamma").is_none());

        assert_eq!(index.total_docs_indexed(), 1);
        assert_eq!(index.term_count(), 2);
    }

    #[test]
    fn test_zero_capacity_uses_default() {
        let index = InvertedIndex::new(0).unwrap();
        assert_eq!(index.capacity(), DEFAULT_DICTIONARY_CAPACITY);
        assert_eq!(index.term_count(), 0);
    }

    #[test]
    fn test_frequencies_are_aggregated_per_document() {
        let mut index = InvertedIndex::new(64).unwrap();
        index
            .add_document(0, &tokenize_simple("rust search rust index rust"))
            .unwrap();
        index.add_document(1, &tokenize_simple("search engine")).unwrap();

        let rust = index.get_posting_list("rust").unwrap();
        assert_eq!(
            rust.postings(),
            &[Posting {
                doc_id: 0,
                frequency_in_doc: 3
            }]
        );

        let search = index.get_posting_list("search").unwrap();
        assert_eq!(search.doc_ids().collect::<Vec<_>>(), vec![0, 1]);
        assert!(search.iter().all(|p| p.frequency_in_doc == 1));

        assert_eq!(index.term_count(), 4);
        assert_eq!(index.total_docs_indexed(), 2);
        assert!(index.get_posting_list("missing").is_none());
        assert_eq!(index.document_frequency("missing"), 0);
    }

    #[test]
    fn test_non_word_tokens_ignored() {
        let mut index = InvertedIndex::new(16).unwrap();
        let tokens = vec![
            word("alpha", 0),
            Token::new(".".to_string(), 5, false),
            Token::new("¿que".to_string(), 7, false),
            word("", 12),
        ];
        index.add_document(3, &tokens).unwrap();

        assert_eq!(index.term_count(), 1);
        assert!(index.get_posting_list(".").is_none());
        assert!(index.get_posting_list("¿que").is_none());
    }

    #[test]
    fn test_empty_document_rejected() {
        let mut index = InvertedIndex::new(16).unwrap();
        assert!(matches!(
            index.add_document(9, &[]),
            Err(Error::EmptyDocument { doc_id: 9 })
        ));
        assert_eq!(index.total_docs_indexed(), 0);
    }

    #[test]
    fn test_posting_list_grows_past_initial_capacity() {
        let mut index = InvertedIndex::new(4).unwrap();
        for doc_id in 0..25 {
            index.add_document(doc_id, &[word("common", 0)]).unwrap();
        }
        let list = index.get_posting_list("common").unwrap();
        assert_eq!(list.len(), 25);
        assert_eq!(list.total_frequency(), 25);
        assert_eq!(index.total_docs_indexed(), 25);
    }

    #[test]
    fn test_single_bucket_dictionary() {
        let mut index = InvertedIndex::new(1).unwrap();
        index
            .add_document(0, &tokenize_simple("one two three two"))
            .unwrap();
        assert_eq!(index.term_count(), 3);
        assert_eq!(
            index.get_posting_list("two").unwrap().postings()[0].frequency_in_doc,
            2
        );
        assert_eq!(index.terms().count(), 3);
    }
}
