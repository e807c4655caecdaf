//! Scalar Value Model
//!
//! This module defines the value type used for sampled and queried cells.
//! `SqlValue` mirrors the five SQLite storage classes; there is no richer type
//! mapping because the facade only ever turns cells back into text.
//!
//! # Renderings
//! Two renderings exist and they are deliberately different:
//! - [`SqlValue::display_text`] — bare text for preview rows and scalar
//!   fetches (`Harrison`, `13`, `NULL`)
//! - [`SqlValue::literal`] — tuple-literal form for query-result strings
//!   (`'Harrison'`, `13`, `NULL`), with SQL-style quote doubling
//!
//! BLOB cells are Base64-encoded in both forms so binary data stays printable.

use base64::Engine as _;
use rusqlite::types::ValueRef;
use rusqlite::Row;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single cell value read from the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SqlValue {
    /// SQL NULL
    Null,
    /// INTEGER storage class
    Integer(i64),
    /// REAL storage class
    Real(f64),
    /// TEXT storage class
    Text(String),
    /// BLOB storage class
    Blob(Vec<u8>),
}

impl SqlValue {
    /// Read one cell of a driver row
    ///
    /// Non-UTF-8 TEXT cells surface as the driver's own conversion error so
    /// they propagate unchanged like every other engine failure.
    pub(crate) fn from_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Self> {
        let value = match row.get_ref(idx)? {
            ValueRef::Null => Self::Null,
            ValueRef::Integer(i) => Self::Integer(i),
            ValueRef::Real(f) => Self::Real(f),
            ValueRef::Text(bytes) => {
                let text = std::str::from_utf8(bytes).map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(
                        idx,
                        rusqlite::types::Type::Text,
                        Box::new(e),
                    )
                })?;
                Self::Text(text.to_string())
            }
            ValueRef::Blob(bytes) => Self::Blob(bytes.to_vec()),
        };
        Ok(value)
    }

    /// Returns true if this value is NULL
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Bare text rendering, used for preview rows and scalar fetches
    #[must_use]
    pub fn display_text(&self) -> String {
        match self {
            Self::Null => "NULL".to_string(),
            Self::Integer(i) => i.to_string(),
            Self::Real(f) => f.to_string(),
            Self::Text(s) => s.clone(),
            Self::Blob(bytes) => base64::engine::general_purpose::STANDARD.encode(bytes),
        }
    }

    /// Tuple-literal rendering, used for query-result strings
    ///
    /// Text is single-quoted with embedded quotes doubled; blobs are quoted
    /// Base64; numbers and NULL render bare.
    #[must_use]
    pub fn literal(&self) -> String {
        match self {
            Self::Null => "NULL".to_string(),
            Self::Integer(i) => i.to_string(),
            Self::Real(f) => f.to_string(),
            Self::Text(s) => format!("'{}'", s.replace('\'', "''")),
            Self::Blob(bytes) => {
                format!("'{}'", base64::engine::general_purpose::STANDARD.encode(bytes))
            }
        }
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_text())
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<i32> for SqlValue {
    fn from(v: i32) -> Self {
        Self::Integer(i64::from(v))
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        Self::Real(v)
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<Vec<u8>> for SqlValue {
    fn from(v: Vec<u8>) -> Self {
        Self::Blob(v)
    }
}

impl<T> From<Option<T>> for SqlValue
where
    T: Into<SqlValue>,
{
    fn from(v: Option<T>) -> Self {
        match v {
            Some(inner) => inner.into(),
            None => Self::Null,
        }
    }
}

/// Truncate rendered text to at most `max_chars` characters
///
/// Operates on char boundaries so multibyte text never splits mid-codepoint.
pub(crate) fn clip_chars(mut text: String, max_chars: usize) -> String {
    if let Some((idx, _)) = text.char_indices().nth(max_chars) {
        text.truncate(idx);
    }
    text
}
