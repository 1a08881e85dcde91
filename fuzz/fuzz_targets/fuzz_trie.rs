#![no_main]

use libfuzzer_sys::fuzz_target;
use lexscan::index::{HashTable, Trie};

fuzz_target!(|words: Vec<String>| {
    let mut trie = Trie::new();
    let mut table: HashTable<u64> = HashTable::new(64).unwrap();

    for word in &words {
        trie.insert(word);
        if !word.is_empty() {
            table.insert(word, 1).unwrap();
        }
    }

    // Frequencies in the trie and the table must agree
    for word in words.iter().filter(|w| !w.is_empty()) {
        assert!(trie.search(word));
        assert_eq!(u64::from(trie.get_frequency(word)), table.get(word).unwrap_or(0));
    }

    // Enumeration from the empty prefix yields every distinct word once
    let all = trie.words();
    assert_eq!(all.len(), trie.word_count());
    let _ = trie.get_depth();
});
