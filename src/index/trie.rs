//! Byte-level prefix tree with per-word frequencies.
//!
//! Nodes live in a `Vec` and reference their children by index. Each node keeps
//! a sorted `(byte, child)` list instead of a dense 256-slot array, so sparse
//! vocabularies stay small while children are still visited in byte order.
//!
//! Enumeration and depth computation use an explicit stack, and words are
//! rebuilt in a growable buffer, so arbitrarily long inputs neither recurse
//! nor overflow a fixed buffer.

/// Index into the node arena
type NodeId = usize;

const ROOT: NodeId = 0;

#[derive(Debug, Clone, Default)]
struct TrieNode {
    /// Children sorted by byte value
    children: Vec<(u8, NodeId)>,
    is_end_of_word: bool,
    /// Times a word ending here was inserted
    frequency: u32,
    /// Insertions whose path passed through this node
    prefix_count: u32,
}

impl TrieNode {
    #[inline]
    fn child(&self, byte: u8) -> Option<NodeId> {
        self.children
            .binary_search_by_key(&byte, |&(b, _)| b)
            .ok()
            .map(|i| self.children[i].1)
    }
}

/// Prefix tree over the bytes of inserted words.
#[derive(Debug, Clone)]
pub struct Trie {
    nodes: Vec<TrieNode>,
    /// Number of distinct terminal nodes
    word_count: usize,
}

impl Default for Trie {
    fn default() -> Self {
        Self::new()
    }
}

impl Trie {
    /// Create an empty trie holding only the root node.
    pub fn new() -> Self {
        Self {
            nodes: vec![TrieNode::default()],
            word_count: 0,
        }
    }

    /// Insert one occurrence of `word`.
    ///
    /// Every node on the path gets its `prefix_count` bumped, the terminal
    /// node its `frequency`. Empty words are ignored.
    pub fn insert(&mut self, word: &str) {
        if word.is_empty() {
            return;
        }

        let mut current = ROOT;
        for &byte in word.as_bytes() {
            let next = match self.nodes[current].child(byte) {
                Some(id) => id,
                None => self.add_child(current, byte),
            };
            current = next;
            let node = &mut self.nodes[current];
            node.prefix_count = node.prefix_count.saturating_add(1);
        }

        let node = &mut self.nodes[current];
        if !node.is_end_of_word {
            node.is_end_of_word = true;
            self.word_count += 1;
        }
        node.frequency = node.frequency.saturating_add(1);
    }

    fn add_child(&mut self, parent: NodeId, byte: u8) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(TrieNode::default());

        let children = &mut self.nodes[parent].children;
        let pos = children.partition_point(|&(b, _)| b < byte);
        children.insert(pos, (byte, id));
        id
    }

    /// Node reached by following `key` from the root
    fn find_node(&self, key: &str) -> Option<NodeId> {
        key.as_bytes()
            .iter()
            .try_fold(ROOT, |node, &b| self.nodes[node].child(b))
    }

    /// True if `word` was inserted. A path that merely passes through is not a match.
    pub fn search(&self, word: &str) -> bool {
        self.find_node(word)
            .is_some_and(|id| self.nodes[id].is_end_of_word)
    }

    /// Number of times `word` was inserted, 0 if never.
    pub fn get_frequency(&self, word: &str) -> u32 {
        match self.find_node(word) {
            Some(id) if self.nodes[id].is_end_of_word => self.nodes[id].frequency,
            _ => 0,
        }
    }

    /// True if some inserted word starts with `prefix`.
    pub fn starts_with(&self, prefix: &str) -> bool {
        self.find_node(prefix)
            .is_some_and(|id| self.nodes[id].prefix_count > 0)
    }

    /// Number of insertions that passed through the end of `prefix`.
    pub fn prefix_count(&self, prefix: &str) -> u32 {
        self.find_node(prefix)
            .map(|id| self.nodes[id].prefix_count)
            .unwrap_or(0)
    }

    /// All distinct words starting with `prefix`, with their frequencies,
    /// in byte order. Returns an empty result if nothing matches.
    pub fn get_words_with_prefix(&self, prefix: &str) -> PrefixResult {
        let Some(start) = self.find_node(prefix) else {
            return PrefixResult::default();
        };

        let mut result = PrefixResult::default();
        let mut word = prefix.as_bytes().to_vec();

        // (node, length of the word ending at node, incoming byte)
        let mut stack: Vec<(NodeId, usize, Option<u8>)> = vec![(start, word.len(), None)];

        while let Some((id, len, byte)) = stack.pop() {
            if let Some(b) = byte {
                word.truncate(len - 1);
                word.push(b);
            }

            let node = &self.nodes[id];
            if node.is_end_of_word {
                result.push(String::from_utf8_lossy(&word).into_owned(), node.frequency);
            }

            // Reverse push so the smallest byte is popped first
            for &(b, child) in node.children.iter().rev() {
                stack.push((child, len + 1, Some(b)));
            }
        }

        result
    }

    /// Every word in the trie, in byte order.
    pub fn words(&self) -> PrefixResult {
        self.get_words_with_prefix("")
    }

    /// Length of the longest root-to-node path.
    pub fn get_depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack = vec![(ROOT, 0usize)];

        while let Some((id, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            for &(_, child) in &self.nodes[id].children {
                stack.push((child, depth + 1));
            }
        }

        max_depth
    }

    /// Number of distinct words
    pub fn word_count(&self) -> usize {
        self.word_count
    }

    /// Number of allocated nodes, root included
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.word_count == 0
    }

    pub fn stats(&self) -> TrieStats {
        TrieStats {
            word_count: self.word_count,
            node_count: self.nodes.len(),
            depth: self.get_depth(),
        }
    }

    /// Approximate heap usage in bytes
    pub fn memory_usage(&self) -> usize {
        self.nodes.capacity() * std::mem::size_of::<TrieNode>()
            + self
                .nodes
                .iter()
                .map(|n| n.children.capacity() * std::mem::size_of::<(u8, NodeId)>())
                .sum::<usize>()
    }
}

/// Summary numbers for a trie
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrieStats {
    pub word_count: usize,
    pub node_count: usize,
    pub depth: usize,
}

impl TrieStats {
    /// Nodes per distinct word, as a percentage
    pub fn compression_factor(&self) -> f64 {
        if self.word_count == 0 {
            return 0.0;
        }
        100.0 * self.node_count as f64 / self.word_count as f64
    }
}

/// Words and frequencies collected by a prefix query, kept as parallel lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrefixResult {
    words: Vec<String>,
    frequencies: Vec<u32>,
}

impl PrefixResult {
    pub fn push(&mut self, word: String, frequency: u32) {
        self.words.push(word);
        self.frequencies.push(frequency);
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn frequencies(&self) -> &[u32] {
        &self.frequencies
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        self.words
            .iter()
            .map(String::as_str)
            .zip(self.frequencies.iter().copied())
    }

    /// Frequency recorded for `word`, if it is part of the result
    pub fn frequency_of(&self, word: &str) -> Option<u32> {
        self.iter().find(|(w, _)| *w == word).map(|(_, f)| f)
    }
}
