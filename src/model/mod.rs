//! Core data model types for rowtrie

mod key;

pub use key::{format_path, KeyPath, KeySegment, Token};
