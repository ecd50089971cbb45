//! Configuration for locating the row store and rendering output
//!
//! Sources, lowest to highest priority:
//! - `<config dir>/rowtrie/config.json`
//! - `ROWTRIE_STORE` and `ROWTRIE_SHEET` environment variables
//! - command-line flags (applied by the binary)
//!
//! `format` is read from the file and only overridden by `--format`.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Store file used when nothing else is configured
pub const DEFAULT_STORE: &str = "rowtrie.json";

pub const STORE_ENV: &str = "ROWTRIE_STORE";
pub const SHEET_ENV: &str = "ROWTRIE_SHEET";

/// How the CLI renders its JSON results
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One compact JSON object per line
    #[default]
    Json,
    /// Pretty-printed JSON
    Text,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Path to the workbook file
    #[serde(default = "default_store")]
    pub store: PathBuf,
    /// Sheet id to use; the first sheet when unset
    #[serde(default)]
    pub sheet: Option<String>,
    /// Output format for CLI results
    #[serde(default)]
    pub format: OutputFormat,
}

fn default_store() -> PathBuf {
    PathBuf::from(DEFAULT_STORE)
}

impl Default for Config {
    fn default() -> Self {
        Config {
            store: default_store(),
            sheet: None,
            format: OutputFormat::Json,
        }
    }
}

impl Config {
    /// Default config file location (~/.config/rowtrie/config.json)
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| Error::Config("Could not find config directory".into()))?;
        Ok(config_dir.join("rowtrie").join("config.json"))
    }

    /// Load from the default location, then apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = match Self::default_path() {
            Ok(path) => Self::load_from(&path)?,
            Err(_) => Self::default(),
        };
        config.apply_env(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Load a config file, falling back to defaults if it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))
    }

    /// Save to a config file, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::Config(format!("Failed to create config dir: {}", e)))?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .map_err(|e| Error::Config(format!("Failed to write {}: {}", path.display(), e)))?;
        Ok(())
    }

    /// Apply `ROWTRIE_STORE` / `ROWTRIE_SHEET` overrides from `var`
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(store) = var(STORE_ENV).filter(|s| !s.is_empty()) {
            self.store = PathBuf::from(store);
        }
        if let Some(sheet) = var(SHEET_ENV).filter(|s| !s.is_empty()) {
            self.sheet = Some(sheet);
        }
    }
}
