//! Trie node types

use crate::model::KeySegment;
use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};

/// A node in the trie
///
/// Each node exclusively owns its children. The payload slot is a plain
/// `Option`: there is no way to tell "cleared" apart from "never set".
#[derive(Clone, Debug)]
pub struct TrieNode<V> {
    pub(crate) children: Children<V>,
    pub(crate) value: Option<V>,
}

impl<V> TrieNode<V> {
    /// Create an empty node
    pub fn new() -> Self {
        TrieNode {
            children: Children::new(),
            value: None,
        }
    }

    /// Get the value stored at this exact node (if any)
    pub fn value(&self) -> Option<&V> {
        self.value.as_ref()
    }

    /// Check if this node has no children, whether or not it holds a value
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn children(&self) -> &Children<V> {
        &self.children
    }
}

impl<V> Default for TrieNode<V> {
    fn default() -> Self {
        TrieNode::new()
    }
}

#[derive(Clone, Debug)]
struct Slot<V> {
    seq: u64,
    node: TrieNode<V>,
}

/// Child nodes indexed by key segment
///
/// Enumeration order: segments with an ordinal (see
/// [`KeySegment::ordinal`]) come first in ascending ordinal order, then
/// every other segment in the order it was inserted. Ties on ordinal
/// break by insertion order.
#[derive(Clone, Debug)]
pub struct Children<V> {
    slots: HashMap<KeySegment, Slot<V>>,
    /// (ordinal, insertion seq) -> segment
    numbered: BTreeMap<(u64, u64), KeySegment>,
    /// insertion seq -> segment
    named: BTreeMap<u64, KeySegment>,
    next_seq: u64,
}

impl<V> Children<V> {
    pub fn new() -> Self {
        Children {
            slots: HashMap::new(),
            numbered: BTreeMap::new(),
            named: BTreeMap::new(),
            next_seq: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn contains(&self, segment: &KeySegment) -> bool {
        self.slots.contains_key(segment)
    }

    pub fn get(&self, segment: &KeySegment) -> Option<&TrieNode<V>> {
        self.slots.get(segment).map(|slot| &slot.node)
    }

    pub fn get_mut(&mut self, segment: &KeySegment) -> Option<&mut TrieNode<V>> {
        self.slots.get_mut(segment).map(|slot| &mut slot.node)
    }

    /// Get the child at `segment`, creating an empty one if missing
    pub fn get_or_insert(&mut self, segment: &KeySegment) -> &mut TrieNode<V> {
        match self.slots.entry(segment.clone()) {
            Entry::Occupied(entry) => &mut entry.into_mut().node,
            Entry::Vacant(entry) => {
                let seq = self.next_seq;
                self.next_seq += 1;

                match segment.ordinal() {
                    Some(ordinal) => {
                        self.numbered.insert((ordinal, seq), segment.clone());
                    }
                    None => {
                        self.named.insert(seq, segment.clone());
                    }
                }

                &mut entry
                    .insert(Slot {
                        seq,
                        node: TrieNode::new(),
                    })
                    .node
            }
        }
    }

    /// Detach the child at `segment` together with its whole subtree
    pub fn remove(&mut self, segment: &KeySegment) -> Option<TrieNode<V>> {
        let slot = self.slots.remove(segment)?;
        match segment.ordinal() {
            Some(ordinal) => {
                self.numbered.remove(&(ordinal, slot.seq));
            }
            None => {
                self.named.remove(&slot.seq);
            }
        }
        Some(slot.node)
    }

    /// Iterate children in enumeration order
    pub fn iter(&self) -> impl Iterator<Item = (&KeySegment, &TrieNode<V>)> + '_ {
        self.numbered
            .values()
            .chain(self.named.values())
            .filter_map(move |segment| self.slots.get(segment).map(|slot| (segment, &slot.node)))
    }

    pub fn segments(&self) -> impl Iterator<Item = &KeySegment> + '_ {
        self.numbered.values().chain(self.named.values())
    }
}

impl<V> Default for Children<V> {
    fn default() -> Self {
        Children::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Token;

    fn order<V>(children: &Children<V>) -> Vec<KeySegment> {
        children.segments().cloned().collect()
    }

    #[test]
    fn test_numeric_segments_sort_first() {
        let mut children: Children<()> = Children::new();
        for seg in [
            KeySegment::from("b"),
            KeySegment::Int(3),
            KeySegment::from("a"),
            KeySegment::from("1"),
            KeySegment::Int(0),
        ] {
            children.get_or_insert(&seg);
        }

        assert_eq!(
            order(&children),
            vec![
                KeySegment::Int(0),
                KeySegment::from("1"),
                KeySegment::Int(3),
                KeySegment::from("b"),
                KeySegment::from("a"),
            ]
        );
    }

    #[test]
    fn test_ordinal_ties_keep_insertion_order() {
        let mut children: Children<()> = Children::new();
        children.get_or_insert(&KeySegment::from("5"));
        children.get_or_insert(&KeySegment::Int(5));

        assert_eq!(
            order(&children),
            vec![KeySegment::from("5"), KeySegment::Int(5)]
        );
        assert_eq!(children.len(), 2);
    }

    #[test]
    fn test_get_or_insert_is_idempotent() {
        let mut children: Children<u32> = Children::new();
        let seg = KeySegment::from("x");
        children.get_or_insert(&seg).value = Some(1);
        children.get_or_insert(&seg);

        assert_eq!(children.len(), 1);
        assert_eq!(children.get(&seg).and_then(TrieNode::value), Some(&1));
    }

    #[test]
    fn test_reinsert_moves_to_end() {
        let mut children: Children<()> = Children::new();
        let a = KeySegment::from("a");
        let b = KeySegment::from("b");
        children.get_or_insert(&a);
        children.get_or_insert(&b);

        assert!(children.remove(&a).is_some());
        children.get_or_insert(&a);

        assert_eq!(order(&children), vec![b, a]);
    }

    #[test]
    fn test_remove_missing() {
        let mut children: Children<()> = Children::new();
        assert!(children.remove(&KeySegment::Int(1)).is_none());
        assert!(children.is_empty());
    }

    #[test]
    fn test_tokens_enumerate_with_named() {
        let mut children: Children<()> = Children::new();
        let t = KeySegment::from(Token::new());
        children.get_or_insert(&t);
        children.get_or_insert(&KeySegment::from("z"));
        children.get_or_insert(&KeySegment::Int(9));

        assert_eq!(
            order(&children),
            vec![KeySegment::Int(9), t, KeySegment::from("z")]
        );
        assert!(children.iter().all(|(_, node)| node.is_leaf()));
    }
}
