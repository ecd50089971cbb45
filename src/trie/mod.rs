//! Prefix tree over composite keys
//!
//! This implements an in-memory trie where:
//! - Each edge is labelled by one [`KeySegment`](crate::KeySegment)
//! - Nodes are created lazily along the path of every write
//! - Range queries walk a prefix, then collect the subtree in pre-order
//! - Deletes prune childless nodes on the way back to the root

mod node;
mod tree;

pub use node::{Children, TrieNode};
pub use tree::Trie;
