//! In-process row store

use super::{Row, RowId, RowStore, Sheet};
use crate::Result;
use parking_lot::Mutex;

/// A row store that lives only in memory
pub struct MemoryRowStore {
    sheet: Mutex<Sheet>,
}

impl MemoryRowStore {
    pub fn new() -> Self {
        MemoryRowStore {
            sheet: Mutex::new(Sheet::new("0", "Sheet1")),
        }
    }

    /// Wrap an existing sheet
    pub fn from_sheet(mut sheet: Sheet) -> Self {
        sheet.normalize();
        MemoryRowStore {
            sheet: Mutex::new(sheet),
        }
    }

    /// Snapshot of the underlying sheet
    pub fn sheet(&self) -> Sheet {
        self.sheet.lock().clone()
    }
}

impl Default for MemoryRowStore {
    fn default() -> Self {
        MemoryRowStore::new()
    }
}

impl RowStore for MemoryRowStore {
    fn header(&self) -> Result<Vec<String>> {
        Ok(self.sheet.lock().header.clone())
    }

    fn set_header(&self, header: &[&str]) -> Result<()> {
        self.sheet.lock().set_header(header);
        Ok(())
    }

    fn rows(&self) -> Result<Vec<Row>> {
        Ok(self.sheet.lock().rows.clone())
    }

    fn add_row(&self, key: &str, value: &str) -> Result<Row> {
        Ok(self.sheet.lock().add_row(key, value))
    }

    fn update_row(&self, id: RowId, value: &str) -> Result<()> {
        self.sheet.lock().update_row(id, value)
    }

    fn delete_row(&self, id: RowId) -> Result<()> {
        self.sheet.lock().delete_row(id)
    }
}
