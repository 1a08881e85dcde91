//! String-keyed counting map with separate chaining.
//!
//! Keys are hashed with djb2 and reduced modulo a capacity fixed at creation.
//! The table never rehashes, so the load factor grows with every distinct
//! key; pick the capacity from the expected vocabulary size.
//!
//! Inserting an existing key **adds** to its value. This is what every caller
//! relies on to count term occurrences.

use crate::error::{Error, Result};
use std::ops::AddAssign;

/// djb2 (`hash * 33 + byte`, seeded with 5381) over the raw key bytes.
#[inline]
pub fn djb2(key: &[u8]) -> u64 {
    key.iter()
        .fold(5381u64, |hash, &b| hash.wrapping_mul(33).wrapping_add(b as u64))
}

/// Bucket index for `key` in a table with `capacity` buckets.
#[inline]
pub(crate) fn bucket_of(key: &str, capacity: usize) -> usize {
    (djb2(key.as_bytes()) % capacity as u64) as usize
}

#[derive(Debug, Clone)]
struct HashEntry<V> {
    key: String,
    value: V,
}

/// Chained hash table mapping strings to additive integer values.
#[derive(Debug, Clone)]
pub struct HashTable<V = i64> {
    /// One insertion-ordered chain per bucket
    buckets: Vec<Vec<HashEntry<V>>>,
    /// Number of distinct keys
    size: usize,
}

impl<V> HashTable<V>
where
    V: AddAssign + Copy,
{
    /// Create a table with a fixed number of buckets.
    ///
    /// A capacity of zero is rejected.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::invalid_argument("hash table capacity must be non-zero"));
        }

        let mut buckets = Vec::new();
        buckets
            .try_reserve_exact(capacity)
            .map_err(|e| Error::allocation("hash table buckets", e))?;
        buckets.resize_with(capacity, Vec::new);

        Ok(Self { buckets, size: 0 })
    }

    /// Add `value` to the entry for `key`, creating it if absent.
    ///
    /// New keys are appended at the end of their bucket's chain.
    pub fn insert(&mut self, key: &str, value: V) -> Result<()> {
        let index = bucket_of(key, self.buckets.len());
        let chain = &mut self.buckets[index];

        if let Some(entry) = chain.iter_mut().find(|e| e.key == key) {
            entry.value += value;
            return Ok(());
        }

        chain
            .try_reserve(1)
            .map_err(|e| Error::allocation("hash table chain", e))?;
        chain.push(HashEntry {
            key: key.to_owned(),
            value,
        });
        self.size += 1;
        Ok(())
    }

    /// Mutable access to the value stored for `key`.
    ///
    /// Callers may update the value in place, e.g. to bump a counter.
    pub fn search(&mut self, key: &str) -> Option<&mut V> {
        let index = bucket_of(key, self.buckets.len());
        self.buckets[index]
            .iter_mut()
            .find(|e| e.key == key)
            .map(|e| &mut e.value)
    }

    /// Read-only lookup.
    pub fn get(&self, key: &str) -> Option<V> {
        let index = bucket_of(key, self.buckets.len());
        self.buckets[index]
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.value)
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Number of buckets, fixed at creation
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Distinct keys per bucket
    pub fn load_factor(&self) -> f64 {
        self.size as f64 / self.buckets.len() as f64
    }

    /// Length of the longest collision chain
    pub fn longest_chain(&self) -> usize {
        self.buckets.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Iterate entries in bucket order, then chain order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, V)> + '_ {
        self.buckets
            .iter()
            .flat_map(|chain| chain.iter().map(|e| (e.key.as_str(), e.value)))
    }
}

impl<V> HashTable<V>
where
    V: AddAssign + Copy + Ord,
{
    /// The `n` keys with the largest values, ties broken alphabetically.
    pub fn top_n(&self, n: usize) -> Vec<(&str, V)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries.truncate(n);
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(matches!(
            HashTable::<i64>::new(0),
            Err(Error::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_insert_accumulates() {
        let mut table = HashTable::new(16).unwrap();
        table.insert("search", 3).unwrap();
        table.insert("search", 4).unwrap();

        // Additive, never overwriting
        assert_eq!(table.get("search"), Some(7));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_search_returns_mutable_counter() {
        let mut table = HashTable::new(8).unwrap();
        table.insert("word", 1).unwrap();

        if let Some(count) = table.search("word") {
            *count += 1;
        }
        assert_eq!(table.get("word"), Some(2));
        assert!(table.search("missing").is_none());
    }

    #[test]
    fn test_single_bucket_chains() {
        // Everything collides, lookups must still be exact
        let mut table = HashTable::new(1).unwrap();
        for (i, key) in ["alpha", "beta", "gamma", "delta"].iter().enumerate() {
            table.insert(key, i as i64 + 1).unwrap();
        }

        assert_eq!(table.len(), 4);
        assert_eq!(table.longest_chain(), 4);
        assert_eq!(table.get("gamma"), Some(3));
        assert_eq!(table.get("epsilon"), None);

        // Chain keeps insertion order
        let keys: Vec<_> = table.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["alpha", "beta", "gamma", "delta"]);
    }

    #[test]
    fn test_no_rehash_load_factor_grows() {
        let mut table = HashTable::new(4).unwrap();
        for i in 0..40 {
            table.insert(&format!("key{}", i), 1).unwrap();
        }
        assert_eq!(table.capacity(), 4);
        assert!((table.load_factor() - 10.0).abs() < f64::EPSILON);
        for i in 0..40 {
            assert_eq!(table.get(&format!("key{}", i)), Some(1));
        }
    }

    #[test]
    fn test_djb2_known_values() {
        assert_eq!(djb2(b""), 5381);
        assert_eq!(djb2(b"a"), 5381 * 33 + 97);
        // Non-ASCII bytes hash as unsigned
        assert_eq!(djb2(&[0xC3]), 5381 * 33 + 0xC3);
    }

    #[test]
    fn test_top_n() {
        let mut table: HashTable<u64> = HashTable::new(32).unwrap();
        for word in ["b", "a", "c", "a", "b", "a"] {
            table.insert(word, 1).unwrap();
        }
        assert_eq!(table.top_n(2), vec![("a", 3), ("b", 2)]);
        assert_eq!(table.top_n(10).len(), 3);
    }
}
