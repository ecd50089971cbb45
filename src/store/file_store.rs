//! Row store backed by a single JSON workbook file
//!
//! File format:
//! ```text
//! {
//!   "version": 1,
//!   "sheets": [
//!     {
//!       "id": "0",
//!       "title": "Sheet1",
//!       "header": ["key", "value"],
//!       "rows": [{ "id": 1, "key": "[\"a\"]", "value": "42" }],
//!       "next_row_id": 2
//!     }
//!   ]
//! }
//! ```
//!
//! The whole workbook is rewritten after every mutation, through a
//! temporary file that is synced and then renamed over the original. A
//! mutation whose write fails leaves both the file and the in-memory
//! sheet untouched.

use super::{Row, RowId, RowStore, Sheet};
use crate::{Error, Result, VERSION};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// On-disk workbook: a list of sheets
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Workbook {
    pub version: u32,
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    /// A workbook with one empty sheet
    pub fn new() -> Self {
        Workbook {
            version: VERSION,
            sheets: vec![Sheet::new("0", "Sheet1")],
        }
    }

    /// Find a sheet position by id, or the first sheet when `id` is `None`
    pub fn position(&self, id: Option<&str>) -> Result<usize> {
        match id {
            Some(id) => self
                .sheets
                .iter()
                .position(|s| s.id == id)
                .ok_or_else(|| Error::SheetNotFound(id.to_string())),
            None if self.sheets.is_empty() => {
                Err(Error::InvalidFile("workbook has no sheets".into()))
            }
            None => Ok(0),
        }
    }
}

impl Default for Workbook {
    fn default() -> Self {
        Workbook::new()
    }
}

/// A row store over one sheet of a JSON workbook file
pub struct JsonFileStore {
    /// Path to the workbook file
    path: PathBuf,
    workbook: RwLock<Workbook>,
    /// Position of the selected sheet
    sheet: usize,
}

impl JsonFileStore {
    /// Create a new workbook file with a single empty sheet
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        Self::create_with_sheet(path.as_ref(), None)
    }

    /// Create a fresh workbook, checking `sheet` before anything is written
    fn create_with_sheet(path: &Path, sheet: Option<&str>) -> Result<Self> {
        let workbook = Workbook::new();
        let sheet = workbook.position(sheet)?;
        write_workbook(path, &workbook)?;
        log::debug!("created workbook at {}", path.display());

        Ok(JsonFileStore {
            path: path.to_path_buf(),
            workbook: RwLock::new(workbook),
            sheet,
        })
    }

    /// Open an existing workbook file
    ///
    /// `sheet` selects a sheet by id; `None` picks the first one.
    pub fn open(path: impl AsRef<Path>, sheet: Option<&str>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let content = std::fs::read_to_string(&path)?;
        let mut workbook: Workbook = serde_json::from_str(&content)?;

        if workbook.version != VERSION {
            return Err(Error::InvalidFile(format!(
                "unsupported workbook version {} (expected {})",
                workbook.version, VERSION
            )));
        }

        let sheet = workbook.position(sheet)?;
        for s in &mut workbook.sheets {
            s.normalize();
        }
        log::debug!(
            "opened sheet '{}' of {} ({} rows)",
            workbook.sheets[sheet].id,
            path.display(),
            workbook.sheets[sheet].rows.len()
        );

        Ok(JsonFileStore {
            path,
            workbook: RwLock::new(workbook),
            sheet,
        })
    }

    /// Open the workbook, creating it first if the file does not exist
    pub fn open_or_create(path: impl AsRef<Path>, sheet: Option<&str>) -> Result<Self> {
        if path.as_ref().exists() {
            Self::open(path, sheet)
        } else {
            Self::create_with_sheet(path.as_ref(), sheet)
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Id of the selected sheet
    pub fn sheet_id(&self) -> String {
        self.workbook.read().sheets[self.sheet].id.clone()
    }

    /// Apply `f` to a copy of the sheet and keep it only once it is on disk
    fn mutate<T>(&self, f: impl FnOnce(&mut Sheet) -> Result<T>) -> Result<T> {
        let mut workbook = self.workbook.write();
        let mut sheet = workbook.sheets[self.sheet].clone();
        let out = f(&mut sheet)?;

        let previous = std::mem::replace(&mut workbook.sheets[self.sheet], sheet);
        if let Err(e) = write_workbook(&self.path, &workbook) {
            workbook.sheets[self.sheet] = previous;
            log::warn!("failed to write {}: {}", self.path.display(), e);
            return Err(e);
        }
        Ok(out)
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

fn write_workbook(path: &Path, workbook: &Workbook) -> Result<()> {
    let content = serde_json::to_string_pretty(workbook)?;
    let tmp = temp_path(path);

    let written = File::create(&tmp)
        .and_then(|mut file| {
            file.write_all(content.as_bytes())?;
            file.sync_all()
        })
        .and_then(|_| std::fs::rename(&tmp, path));

    if let Err(e) = written {
        let _ = std::fs::remove_file(&tmp);
        return Err(e.into());
    }
    Ok(())
}

impl RowStore for JsonFileStore {
    fn header(&self) -> Result<Vec<String>> {
        Ok(self.workbook.read().sheets[self.sheet].header.clone())
    }

    fn set_header(&self, header: &[&str]) -> Result<()> {
        self.mutate(|sheet| {
            sheet.set_header(header);
            Ok(())
        })
    }

    fn rows(&self) -> Result<Vec<Row>> {
        Ok(self.workbook.read().sheets[self.sheet].rows.clone())
    }

    fn add_row(&self, key: &str, value: &str) -> Result<Row> {
        self.mutate(|sheet| Ok(sheet.add_row(key, value)))
    }

    fn update_row(&self, id: RowId, value: &str) -> Result<()> {
        self.mutate(|sheet| sheet.update_row(id, value))
    }

    fn delete_row(&self, id: RowId) -> Result<()> {
        self.mutate(|sheet| sheet.delete_row(id))
    }
}
