//! Error types for rowtrie

use thiserror::Error;

/// Result type alias for rowtrie operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in rowtrie operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("{op}: key has no elements")]
    EmptyKey { op: &'static str },

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    #[error("Row not found: {0}")]
    RowNotFound(u64),

    #[error("Invalid store file: {0}")]
    InvalidFile(String),

    #[error("Config error: {0}")]
    Config(String),
}
