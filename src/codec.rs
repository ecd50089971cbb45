//! Text encoding of keys and values for row storage
//!
//! Keys are stored as compact JSON arrays (`["events",42]`), which keeps
//! segment order and distinguishes `1` from `"1"`. Values are plain JSON.

use crate::model::{KeyPath, KeySegment};
use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Encode a key path as a JSON array
pub fn encode_key(path: &[KeySegment]) -> Result<String> {
    if let Some(token) = path.iter().find(|segment| segment.is_token()) {
        return Err(Error::InvalidKey(format!(
            "token segment {} cannot be stored",
            token
        )));
    }
    Ok(serde_json::to_string(path)?)
}

/// Decode a key path from its JSON array form
pub fn decode_key(text: &str) -> Result<KeyPath> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    if !value.is_array() {
        return Err(Error::InvalidKey(format!("expected a JSON array, got {}", text)));
    }
    serde_json::from_value(value).map_err(|e| Error::InvalidKey(format!("{}: {}", text, e)))
}

pub fn encode_value<V: Serialize>(value: &V) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

pub fn decode_value<V: DeserializeOwned>(text: &str) -> Result<V> {
    Ok(serde_json::from_str(text)?)
}
