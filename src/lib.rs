//! # rowtrie
//!
//! A prefix tree over composite keys, mirrored onto a row-oriented store.
//!
//! Keys are sequences of segments (strings, integers or in-memory
//! tokens). The [`Trie`] answers exact lookups and prefix range scans; the
//! [`Kvs`] wrapper persists every entry as a `(key, value)` text row and
//! rebuilds the trie from those rows when opened.
//!
//! ## Core Concepts
//!
//! - **Segments**: atomic key elements compared by exact equality
//! - **Range scans**: pre-order over a prefix's subtree, integer-like
//!   segments first in ascending order, then the rest in insertion order
//! - **Rows**: JSON-encoded key and value columns under a `key,value` header
//!
//! ## Example
//!
//! ```
//! use rowtrie::{key, Kvs, MemoryRowStore};
//! use serde_json::json;
//!
//! let mut kvs: Kvs<_> = Kvs::open(MemoryRowStore::new())?;
//! kvs.put(&key!["events", 2], json!("b"))?;
//! kvs.put(&key!["events", 1], json!("a"))?;
//!
//! assert_eq!(kvs.get_range(&key!["events"]), vec![&json!("a"), &json!("b")]);
//! # Ok::<(), rowtrie::Error>(())
//! ```

pub mod codec;
pub mod config;
pub mod kvs;
pub mod model;
pub mod store;
pub mod trie;

mod error;

pub use config::{Config, OutputFormat};
pub use error::{Error, Result};
pub use kvs::{Entry, Kvs, HEADER};
pub use model::{format_path, KeyPath, KeySegment, Token};
pub use store::{JsonFileStore, MemoryRowStore, Row, RowId, RowStore};
pub use trie::{Trie, TrieNode};

/// Workbook file format version
pub const VERSION: u32 = 1;
