//! Key segments and composite key paths

use serde::de::{self, Deserializer, Visitor};
use serde::ser::{self, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_TOKEN: AtomicU64 = AtomicU64::new(1);

/// An opaque, process-unique key segment
///
/// Every call to [`Token::new`] yields a token that compares unequal to
/// all others. Tokens live only in memory and cannot be encoded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Token(u64);

impl Token {
    /// Mint a fresh token
    pub fn new() -> Self {
        Token(NEXT_TOKEN.fetch_add(1, Ordering::Relaxed))
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

impl Default for Token {
    fn default() -> Self {
        Token::new()
    }
}

/// One atomic element of a composite key
///
/// Segments compare by exact typed equality, so `Int(1)` and `Str("1")`
/// are different segments.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum KeySegment {
    Str(String),
    Int(i64),
    Token(Token),
}

/// An ordered sequence of key segments
pub type KeyPath = Vec<KeySegment>;

impl KeySegment {
    /// The numeric position of this segment when it reads as a
    /// non-negative integer.
    ///
    /// Children with an ordinal enumerate before all others, in ascending
    /// ordinal order.
    pub fn ordinal(&self) -> Option<u64> {
        match self {
            KeySegment::Int(n) => u64::try_from(*n).ok(),
            KeySegment::Str(s) => parse_index(s),
            KeySegment::Token(_) => None,
        }
    }

    pub fn is_token(&self) -> bool {
        matches!(self, KeySegment::Token(_))
    }
}

/// Render a path for messages, e.g. `["events", 42]`
pub fn format_path(path: &[KeySegment]) -> String {
    let segments: Vec<String> = path.iter().map(ToString::to_string).collect();
    format!("[{}]", segments.join(", "))
}

/// Parse a canonical decimal integer: digits only, no leading zeros.
fn parse_index(s: &str) -> Option<u64> {
    let bytes = s.as_bytes();
    if bytes.is_empty() || !bytes.iter().all(u8::is_ascii_digit) {
        return None;
    }
    if bytes.len() > 1 && bytes[0] == b'0' {
        return None;
    }
    s.parse().ok()
}

impl fmt::Display for KeySegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeySegment::Str(s) => write!(f, "{:?}", s),
            KeySegment::Int(n) => write!(f, "{}", n),
            KeySegment::Token(t) => write!(f, "#{}", t.0),
        }
    }
}

impl From<&str> for KeySegment {
    fn from(s: &str) -> Self {
        KeySegment::Str(s.to_string())
    }
}

impl From<String> for KeySegment {
    fn from(s: String) -> Self {
        KeySegment::Str(s)
    }
}

impl From<&String> for KeySegment {
    fn from(s: &String) -> Self {
        KeySegment::Str(s.clone())
    }
}

impl From<i64> for KeySegment {
    fn from(n: i64) -> Self {
        KeySegment::Int(n)
    }
}

impl From<i32> for KeySegment {
    fn from(n: i32) -> Self {
        KeySegment::Int(n.into())
    }
}

impl From<u32> for KeySegment {
    fn from(n: u32) -> Self {
        KeySegment::Int(n.into())
    }
}

impl From<Token> for KeySegment {
    fn from(t: Token) -> Self {
        KeySegment::Token(t)
    }
}

impl Serialize for KeySegment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            KeySegment::Str(s) => serializer.serialize_str(s),
            KeySegment::Int(n) => serializer.serialize_i64(*n),
            KeySegment::Token(_) => Err(ser::Error::custom(
                "token segments cannot be encoded",
            )),
        }
    }
}

impl<'de> Deserialize<'de> for KeySegment {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(SegmentVisitor)
    }
}

struct SegmentVisitor;

impl<'de> Visitor<'de> for SegmentVisitor {
    type Value = KeySegment;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a string or integer key segment")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<KeySegment, E> {
        Ok(KeySegment::Str(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<KeySegment, E> {
        Ok(KeySegment::Str(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<KeySegment, E> {
        Ok(KeySegment::Int(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<KeySegment, E> {
        i64::try_from(v)
            .map(KeySegment::Int)
            .map_err(|_| E::custom(format!("integer segment out of range: {}", v)))
    }
}

/// Build a [`KeyPath`] from anything convertible into [`KeySegment`]
///
/// ```
/// use rowtrie::{key, KeySegment};
///
/// let path = key!["events", 42];
/// assert_eq!(path, vec![KeySegment::from("events"), KeySegment::Int(42)]);
/// ```
#[macro_export]
macro_rules! key {
    () => {
        ::std::vec::Vec::<$crate::KeySegment>::new()
    };
    ($($seg:expr),+ $(,)?) => {
        ::std::vec![$($crate::KeySegment::from($seg)),+]
    };
}
