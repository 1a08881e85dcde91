pub mod build;
pub mod corpus;
pub mod hash_table;
pub mod inverted;
pub mod stats;
pub mod trie;
pub mod types;

pub use build::{build_index, BuildStats, CorpusIndex};
pub use corpus::{load_corpus, LoadStats};
pub use hash_table::HashTable;
pub use inverted::{InvertedIndex, Posting, PostingList};
pub use trie::{PrefixResult, Trie, TrieStats};
pub use types::*;
