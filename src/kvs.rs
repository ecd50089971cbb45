//! Key-value store API
//!
//! [`Kvs`] keeps a [`Trie`] as the in-memory index of a [`RowStore`]. On
//! open it rebuilds the trie from every stored row; afterwards each write
//! goes to the row store first and is then applied to the trie.

use crate::codec;
use crate::model::{format_path, KeyPath, KeySegment};
use crate::store::{RowId, RowStore};
use crate::trie::Trie;
use crate::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Header row every store must carry
pub const HEADER: [&str; 2] = ["key", "value"];

/// A decoded value and the row it was read from
#[derive(Clone, Debug, PartialEq)]
pub struct Entry<V> {
    pub data: V,
    pub row: RowId,
}

/// A key-value store over composite keys, persisted as rows
///
/// Reads are served from memory. Deleting a key that is also a prefix of
/// other stored keys removes its row but leaves the in-memory value in
/// place until the store is reopened.
pub struct Kvs<S, V = serde_json::Value> {
    trie: Trie<Entry<V>>,
    store: S,
    /// Whether `open` replaced a non-empty header
    header_rewritten: bool,
}

impl<S: RowStore, V: Serialize + DeserializeOwned> Kvs<S, V> {
    /// Open the store and load every row into memory
    ///
    /// A header other than `["key", "value"]` is replaced.
    pub fn open(store: S) -> Result<Self> {
        let header = store.header()?;
        let mut header_rewritten = false;
        if header.is_empty() {
            log::debug!("empty sheet, writing header {:?}", HEADER);
            store.set_header(&HEADER)?;
        } else if !is_valid_header(&header) {
            log::warn!("unexpected header {:?}, rewriting as {:?}", header, HEADER);
            store.set_header(&HEADER)?;
            header_rewritten = true;
        }

        let rows = store.rows()?;
        let mut trie = Trie::new();
        for row in &rows {
            let key = codec::decode_key(&row.key)?;
            let data = codec::decode_value(&row.value)?;
            trie.set(&key, Entry { data, row: row.id })?;
        }
        log::debug!("loaded {} rows", rows.len());

        Ok(Kvs {
            trie,
            store,
            header_rewritten,
        })
    }

    /// Get the value stored under `key`
    pub fn get(&self, key: &[KeySegment]) -> Result<Option<&V>> {
        Ok(self.trie.get(key)?.map(|entry| &entry.data))
    }

    /// All values whose key starts with `prefix`, in trie order
    pub fn get_range(&self, prefix: &[KeySegment]) -> Vec<&V> {
        self.trie
            .get_range(prefix)
            .into_iter()
            .map(|entry| &entry.data)
            .collect()
    }

    /// Like [`Kvs::get_range`], with each value's key
    pub fn entries(&self, prefix: &[KeySegment]) -> Vec<(KeyPath, &V)> {
        self.trie
            .entries(prefix)
            .into_iter()
            .map(|(key, entry)| (key, &entry.data))
            .collect()
    }

    /// Insert or update `key`
    ///
    /// A new key gets a new row; an existing key has its row updated in
    /// place.
    pub fn put(&mut self, key: &[KeySegment], value: V) -> Result<()> {
        let encoded = codec::encode_value(&value)?;

        match self.trie.get_mut(key)? {
            Some(entry) => {
                self.store.update_row(entry.row, &encoded)?;
                entry.data = value;
                log::debug!("updated row {} for {}", entry.row, format_path(key));
            }
            None => {
                let row = self.store.add_row(&codec::encode_key(key)?, &encoded)?;
                log::debug!("added row {} for {}", row.id, format_path(key));
                self.trie.set(key, Entry { data: value, row: row.id })?;
            }
        }
        Ok(())
    }

    /// Delete `key`, returning whether it was present
    pub fn delete(&mut self, key: &[KeySegment]) -> Result<bool> {
        let row = match self.trie.get(key)? {
            Some(entry) => entry.row,
            None => return Ok(false),
        };

        self.store.delete_row(row)?;
        self.trie.delete(key);
        log::debug!("deleted row {} for {}", row, format_path(key));

        if self.trie.get(key)?.is_some() {
            log::warn!(
                "{} has descendants; its row {} is gone but the value stays in memory",
                format_path(key),
                row
            );
        }
        Ok(true)
    }

    /// Number of stored values
    pub fn len(&self) -> usize {
        self.trie.get_range(&[]).len()
    }

    pub fn is_empty(&self) -> bool {
        self.trie.is_empty()
    }

    /// True when opening found someone else's header and replaced it
    ///
    /// Writing the header into an empty sheet does not count.
    pub fn header_rewritten(&self) -> bool {
        self.header_rewritten
    }

    pub fn trie(&self) -> &Trie<Entry<V>> {
        &self.trie
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}

fn is_valid_header(header: &[String]) -> bool {
    header.len() == HEADER.len() && header.iter().zip(HEADER).all(|(a, b)| a == b)
}
