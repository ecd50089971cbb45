//! Trie implementation over composite keys

use super::TrieNode;
use crate::model::{KeyPath, KeySegment};
use crate::{Error, Result};

/// A prefix tree keyed by [`KeyPath`]s
///
/// Not thread-safe; callers serialize mutation. The root never holds a
/// value because writes to the empty path are rejected.
#[derive(Clone, Debug)]
pub struct Trie<V> {
    root: TrieNode<V>,
}

impl<V> Trie<V> {
    /// Create a new empty trie
    pub fn new() -> Self {
        Trie {
            root: TrieNode::new(),
        }
    }

    pub fn root(&self) -> &TrieNode<V> {
        &self.root
    }

    /// Check if the trie holds no nodes besides the root
    pub fn is_empty(&self) -> bool {
        self.root.is_leaf()
    }

    pub fn clear(&mut self) {
        self.root = TrieNode::new();
    }

    /// Store `value` at `path`, creating missing nodes along the way
    ///
    /// Returns the value previously stored at `path`.
    pub fn set(&mut self, path: &[KeySegment], value: V) -> Result<Option<V>> {
        if path.is_empty() {
            return Err(Error::EmptyKey { op: "Trie::set" });
        }

        let mut node = &mut self.root;
        for segment in path {
            node = node.children.get_or_insert(segment);
        }
        Ok(node.value.replace(value))
    }

    /// Get the value stored at `path`
    pub fn get(&self, path: &[KeySegment]) -> Result<Option<&V>> {
        if path.is_empty() {
            return Err(Error::EmptyKey { op: "Trie::get" });
        }
        Ok(self.find(path).and_then(|node| node.value.as_ref()))
    }

    pub fn get_mut(&mut self, path: &[KeySegment]) -> Result<Option<&mut V>> {
        if path.is_empty() {
            return Err(Error::EmptyKey { op: "Trie::get_mut" });
        }
        Ok(self.find_mut(path).and_then(|node| node.value.as_mut()))
    }

    /// Collect every value whose path starts with `prefix`
    ///
    /// Values come out in pre-order: a node before its descendants, and
    /// siblings in child enumeration order. An empty prefix matches
    /// everything.
    pub fn get_range(&self, prefix: &[KeySegment]) -> Vec<&V> {
        let mut results = Vec::new();
        if let Some(node) = self.find(prefix) {
            collect_values(node, &mut results);
        }
        results
    }

    /// Like [`Trie::get_range`], paired with each value's full path
    pub fn entries(&self, prefix: &[KeySegment]) -> Vec<(KeyPath, &V)> {
        let mut results = Vec::new();
        if let Some(node) = self.find(prefix) {
            let mut path = prefix.to_vec();
            collect_entries(node, &mut path, &mut results);
        }
        results
    }

    /// Delete `path`, pruning childless nodes back toward the root
    ///
    /// The terminal node's value goes away only when the node itself is
    /// detached, which requires it to have no children. A path that is
    /// also a prefix of longer stored paths therefore keeps its value.
    /// Pruning climbs through every ancestor left without children, values
    /// included. Returns the terminal value if its node was detached.
    pub fn delete(&mut self, path: &[KeySegment]) -> Option<V> {
        if path.is_empty() {
            return None;
        }

        let mut removed = None;
        delete_recursive(&mut self.root, path, &mut removed);
        removed
    }

    fn find(&self, path: &[KeySegment]) -> Option<&TrieNode<V>> {
        let mut node = &self.root;
        for segment in path {
            node = node.children.get(segment)?;
        }
        Some(node)
    }

    fn find_mut(&mut self, path: &[KeySegment]) -> Option<&mut TrieNode<V>> {
        let mut node = &mut self.root;
        for segment in path {
            node = node.children.get_mut(segment)?;
        }
        Some(node)
    }
}

impl<V> Default for Trie<V> {
    fn default() -> Self {
        Trie::new()
    }
}

/// Returns true when `node` is a leaf and its parent should detach it
fn delete_recursive<V>(
    node: &mut TrieNode<V>,
    path: &[KeySegment],
    removed: &mut Option<V>,
) -> bool {
    let Some((segment, rest)) = path.split_first() else {
        return node.is_leaf();
    };

    let Some(child) = node.children.get_mut(segment) else {
        return false;
    };

    if !delete_recursive(child, rest, removed) {
        return false;
    }

    if let Some(detached) = node.children.remove(segment) {
        if rest.is_empty() {
            *removed = detached.value;
        }
    }
    node.is_leaf()
}

fn collect_values<'a, V>(node: &'a TrieNode<V>, results: &mut Vec<&'a V>) {
    if let Some(value) = &node.value {
        results.push(value);
    }
    for (_, child) in node.children.iter() {
        collect_values(child, results);
    }
}

fn collect_entries<'a, V>(
    node: &'a TrieNode<V>,
    path: &mut KeyPath,
    results: &mut Vec<(KeyPath, &'a V)>,
) {
    if let Some(value) = &node.value {
        results.push((path.clone(), value));
    }
    for (segment, child) in node.children.iter() {
        path.push(segment.clone());
        collect_entries(child, path, results);
        path.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key;
    use crate::model::Token;

    #[test]
    fn test_trie_set_get() {
        let mut trie = Trie::new();

        trie.set(&key!["users", 7], "alice").unwrap();

        assert_eq!(trie.get(&key!["users", 7]).unwrap(), Some(&"alice"));
        assert_eq!(trie.get(&key!["users", 8]).unwrap(), None);
        assert_eq!(trie.get(&key!["users"]).unwrap(), None);
        assert_eq!(trie.get(&key!["users", 7, "x"]).unwrap(), None);
    }

    #[test]
    fn test_trie_overwrite() {
        let mut trie = Trie::new();

        assert_eq!(trie.set(&key!["a", "b"], 1).unwrap(), None);
        assert_eq!(trie.set(&key!["a", "b"], 2).unwrap(), Some(1));

        assert_eq!(trie.get(&key!["a", "b"]).unwrap(), Some(&2));
        assert_eq!(trie.get_range(&key![]), vec![&2]);
        assert_eq!(trie.root().children().len(), 1);
    }

    #[test]
    fn test_trie_prefix_range() {
        let mut trie = Trie::new();

        trie.set(&key!["t", "one"], 1).unwrap();
        trie.set(&key!["t", "two"], 2).unwrap();
        trie.set(&key!["t", "two", "deep"], 3).unwrap();
        trie.set(&key!["e", "one"], 10).unwrap();
        trie.set(&key!["te"], 20).unwrap();

        assert_eq!(trie.get_range(&key!["t"]), vec![&1, &2, &3]);
        assert_eq!(trie.get_range(&key!["e"]), vec![&10]);
        assert_eq!(trie.get_range(&key!["t", "two"]), vec![&2, &3]);
        assert_eq!(trie.get_range(&key![]).len(), 5);
    }

    #[test]
    fn test_trie_range_missing_prefix() {
        let mut trie = Trie::new();
        trie.set(&key!["a"], 1).unwrap();

        assert!(trie.get_range(&key!["b"]).is_empty());
        assert!(trie.get_range(&key!["a", "b"]).is_empty());
        assert!(Trie::<u8>::new().get_range(&key![]).is_empty());
    }

    #[test]
    fn test_trie_range_numeric_order() {
        let mut trie = Trie::new();

        trie.set(&key![0], "zero").unwrap();
        trie.set(&key![2], "two").unwrap();
        trie.set(&key![1], "one").unwrap();

        assert_eq!(trie.get_range(&key![]), vec![&"zero", &"one", &"two"]);
    }

    #[test]
    fn test_trie_range_preorder_mixed_segments() {
        let mut trie = Trie::new();

        trie.set(&key!["log", "b"], "b").unwrap();
        trie.set(&key!["log", 10], "10").unwrap();
        trie.set(&key!["log", "a"], "a").unwrap();
        trie.set(&key!["log", "2"], "2").unwrap();
        trie.set(&key!["log", 10, "x"], "10x").unwrap();
        trie.set(&key!["log"], "log").unwrap();

        assert_eq!(
            trie.get_range(&key!["log"]),
            vec![&"log", &"2", &"10", &"10x", &"b", &"a"]
        );
    }

    #[test]
    fn test_trie_entries_carry_paths() {
        let mut trie = Trie::new();

        trie.set(&key!["q", 1], 'a').unwrap();
        trie.set(&key!["q", 0, "z"], 'b').unwrap();

        let entries = trie.entries(&key!["q"]);
        assert_eq!(
            entries,
            vec![(key!["q", 0, "z"], &'b'), (key!["q", 1], &'a')]
        );
    }

    #[test]
    fn test_trie_delete_leaf() {
        let mut trie = Trie::new();

        trie.set(&key!["a"], 1).unwrap();
        assert_eq!(trie.delete(&key!["a"]), Some(1));

        assert_eq!(trie.get(&key!["a"]).unwrap(), None);
        assert!(trie.is_empty());
    }

    #[test]
    fn test_trie_delete_prunes_empty_chain() {
        let mut trie = Trie::new();

        trie.set(&key!["a", "b", "c"], 1).unwrap();
        trie.set(&key!["x"], 2).unwrap();
        trie.delete(&key!["a", "b", "c"]);

        assert!(!trie.root().children().contains(&KeySegment::from("a")));
        assert_eq!(trie.get_range(&key![]), vec![&2]);
    }

    #[test]
    fn test_trie_delete_stops_at_branch() {
        let mut trie = Trie::new();

        trie.set(&key!["a", "b"], 1).unwrap();
        trie.set(&key!["a", "c"], 2).unwrap();
        trie.delete(&key!["a", "b"]);

        assert_eq!(trie.get(&key!["a", "b"]).unwrap(), None);
        assert_eq!(trie.get(&key!["a", "c"]).unwrap(), Some(&2));
        assert_eq!(trie.root().children().len(), 1);
    }

    #[test]
    fn test_trie_delete_prefix_keeps_value() {
        let mut trie = Trie::new();

        trie.set(&key!["a"], 1).unwrap();
        trie.set(&key!["a", "b"], 2).unwrap();

        assert_eq!(trie.delete(&key!["a"]), None);

        assert_eq!(trie.get(&key!["a"]).unwrap(), Some(&1));
        assert_eq!(trie.get(&key!["a", "b"]).unwrap(), Some(&2));
    }

    #[test]
    fn test_trie_delete_prunes_valued_ancestor() {
        let mut trie = Trie::new();

        trie.set(&key!["a"], 1).unwrap();
        trie.set(&key!["a", "b"], 2).unwrap();

        assert_eq!(trie.delete(&key!["a", "b"]), Some(2));

        assert_eq!(trie.get(&key!["a"]).unwrap(), None);
        assert!(trie.is_empty());
    }

    #[test]
    fn test_trie_delete_valueless_leaf_path() {
        let mut trie = Trie::new();

        trie.set(&key!["a", "b"], 1).unwrap();

        // ["a"] has a child, so nothing is detached.
        assert_eq!(trie.delete(&key!["a"]), None);
        assert_eq!(trie.get(&key!["a", "b"]).unwrap(), Some(&1));
    }

    #[test]
    fn test_trie_empty_path_rejected() {
        let mut trie: Trie<u8> = Trie::new();

        assert!(matches!(
            trie.set(&key![], 1),
            Err(Error::EmptyKey { op: "Trie::set" })
        ));
        assert!(matches!(trie.get(&key![]), Err(Error::EmptyKey { .. })));
        assert!(matches!(trie.get_mut(&key![]), Err(Error::EmptyKey { .. })));
        assert!(trie.is_empty());
    }

    #[test]
    fn test_trie_delete_missing_is_noop() {
        let mut trie: Trie<u8> = Trie::new();

        assert_eq!(trie.delete(&key!["x", "y"]), None);
        assert_eq!(trie.delete(&key![]), None);
        assert!(trie.is_empty());

        trie.set(&key!["x"], 1).unwrap();
        assert_eq!(trie.delete(&key!["x", "y"]), None);
        assert_eq!(trie.get(&key!["x"]).unwrap(), Some(&1));
    }

    #[test]
    fn test_trie_get_mut() {
        let mut trie = Trie::new();

        trie.set(&key!["n"], 1).unwrap();
        if let Some(v) = trie.get_mut(&key!["n"]).unwrap() {
            *v += 4;
        }

        assert_eq!(trie.get(&key!["n"]).unwrap(), Some(&5));
        assert!(trie.get_mut(&key!["m"]).unwrap().is_none());
    }

    #[test]
    fn test_trie_token_segments() {
        let mut trie = Trie::new();
        let t1 = Token::new();
        let t2 = Token::new();

        trie.set(&key![t1], "first").unwrap();

        assert_eq!(trie.get(&key![t1]).unwrap(), Some(&"first"));
        assert_eq!(trie.get(&key![t2]).unwrap(), None);
    }

    #[test]
    fn test_trie_clear() {
        let mut trie = Trie::new();
        trie.set(&key!["a"], 1).unwrap();
        trie.clear();
        assert!(trie.is_empty());
    }
}
