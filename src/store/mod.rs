//! Row-oriented storage backends
//!
//! A row store is a single table of `(key, value)` text rows under a
//! header row, addressed by stable row ids. The key-value layer mirrors
//! it into a trie on open and writes through it on every mutation.

mod file_store;
mod memory;
mod sheet;

pub use file_store::{JsonFileStore, Workbook};
pub use memory::MemoryRowStore;
pub use sheet::{Row, RowId, Sheet};

use crate::Result;

/// A table of text rows with a header
///
/// Methods take `&self`; implementations lock internally.
pub trait RowStore {
    /// Current header row
    fn header(&self) -> Result<Vec<String>>;

    /// Replace the header row
    fn set_header(&self, header: &[&str]) -> Result<()>;

    /// All rows, in storage order
    fn rows(&self) -> Result<Vec<Row>>;

    /// Append a row and return it with its assigned id
    fn add_row(&self, key: &str, value: &str) -> Result<Row>;

    /// Overwrite the value column of an existing row
    fn update_row(&self, id: RowId, value: &str) -> Result<()>;

    fn delete_row(&self, id: RowId) -> Result<()>;
}
