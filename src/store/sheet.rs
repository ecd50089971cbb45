//! Sheet type - one table of rows

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Stable identifier of a row within its sheet
pub type RowId = u64;

/// A stored row: encoded key and encoded value
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    pub id: RowId,
    pub key: String,
    pub value: String,
}

/// A named table with a header row and data rows
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Sheet {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub header: Vec<String>,
    #[serde(default)]
    pub rows: Vec<Row>,
    /// Next id to hand out; ids are never reused
    #[serde(default)]
    next_row_id: RowId,
}

impl Sheet {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Sheet {
            id: id.into(),
            title: title.into(),
            header: Vec::new(),
            rows: Vec::new(),
            next_row_id: 1,
        }
    }

    pub fn set_header(&mut self, header: &[&str]) {
        self.header = header.iter().map(|s| s.to_string()).collect();
    }

    /// Raise the row-id counter above every stored row
    ///
    /// Sheets written by hand may omit or understate the counter; call
    /// this once after loading.
    pub fn normalize(&mut self) {
        let floor = self.rows.iter().map(|r| r.id + 1).max().unwrap_or(1);
        self.next_row_id = self.next_row_id.max(floor);
    }

    pub fn add_row(&mut self, key: &str, value: &str) -> Row {
        let id = self.next_row_id;
        self.next_row_id += 1;

        let row = Row {
            id,
            key: key.to_string(),
            value: value.to_string(),
        };
        self.rows.push(row.clone());
        row
    }

    pub fn update_row(&mut self, id: RowId, value: &str) -> Result<()> {
        let row = self
            .rows
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(Error::RowNotFound(id))?;
        row.value = value.to_string();
        Ok(())
    }

    pub fn delete_row(&mut self, id: RowId) -> Result<()> {
        let pos = self
            .rows
            .iter()
            .position(|r| r.id == id)
            .ok_or(Error::RowNotFound(id))?;
        self.rows.remove(pos);
        Ok(())
    }
}
