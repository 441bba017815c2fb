//! Keyword prefix tree.
//!
//! A byte trie mapping keyword strings to token types. Lookup walks the
//! input from a given position and reports the *longest* entry that
//! matches, together with the position just past it. The trie itself does
//! no word-boundary checking; grammars that need it glue a negative
//! lookahead after the keyword node.

use rustc_hash::FxHashMap;

use crate::base::TokenTypeId;
use crate::buffer::Buffer;

#[derive(Debug, Clone, Default)]
struct TrieNode {
    children: FxHashMap<u8, u32>,
    terminal: Option<TokenTypeId>,
}

/// Prefix tree over keyword byte strings.
#[derive(Debug, Clone)]
pub(crate) struct KeywordTrie {
    nodes: Vec<TrieNode>,
}

impl KeywordTrie {
    pub(crate) fn new() -> Self {
        Self { nodes: vec![TrieNode::default()] }
    }

    /// Insert `word` with its token type. Re-inserting a word overwrites
    /// its token type.
    pub(crate) fn insert(&mut self, word: &[u8], token_type: TokenTypeId) {
        let mut at = 0usize;
        for &byte in word {
            at = match self.nodes[at].children.get(&byte) {
                Some(next) => *next as usize,
                None => {
                    let next = self.nodes.len();
                    self.nodes.push(TrieNode::default());
                    self.nodes[at].children.insert(byte, next as u32);
                    next
                }
            };
        }
        self.nodes[at].terminal = Some(token_type);
    }

    /// Longest entry matching at position `i`; returns the end position and
    /// the entry's token type.
    pub(crate) fn lookup(&self, media: &Buffer<'_>, i: usize) -> Option<(usize, TokenTypeId)> {
        let mut at = 0usize;
        let mut pos = i;
        let mut hit = self.nodes[0].terminal.map(|t| (pos, t));
        while let Some(byte) = media.get(pos) {
            match self.nodes[at].children.get(&byte) {
                Some(next) => {
                    at = *next as usize;
                    pos += 1;
                    if let Some(t) = self.nodes[at].terminal {
                        hit = Some((pos, t));
                    }
                }
                None => break,
            }
        }
        hit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trie(words: &[&str]) -> KeywordTrie {
        let mut trie = KeywordTrie::new();
        for (id, word) in words.iter().enumerate() {
            trie.insert(word.as_bytes(), TokenTypeId::new(id));
        }
        trie
    }

    #[test]
    fn test_exact_hit() {
        let trie = trie(&["if", "else", "while"]);
        let buf = Buffer::from("while");
        assert_eq!(trie.lookup(&buf, 0), Some((5, TokenTypeId::new(2))));
    }

    #[test]
    fn test_longest_entry_wins() {
        let trie = trie(&["in", "int"]);
        let buf = Buffer::from("integer");
        // "int" is preferred over the shorter "in".
        assert_eq!(trie.lookup(&buf, 0), Some((3, TokenTypeId::new(1))));
    }

    #[test]
    fn test_miss() {
        let trie = trie(&["if", "else"]);
        let buf = Buffer::from("iffy");
        // "if" still matches as a prefix; boundary checks are the grammar's job.
        assert_eq!(trie.lookup(&buf, 0), Some((2, TokenTypeId::new(0))));
        assert_eq!(trie.lookup(&buf, 1), None);
    }

    #[test]
    fn test_lookup_mid_buffer() {
        let trie = trie(&["else"]);
        let buf = Buffer::from("x else");
        assert_eq!(trie.lookup(&buf, 2), Some((6, TokenTypeId::new(0))));
    }
}
