//! Field records submitted to the search backend.
//!
//! A [`Record`] is an insertion-ordered mapping from field name to
//! [`FieldValue`]. Field names are unique; inserting an existing name
//! replaces its value in place. Math token fields hold a lazy
//! [`TokenStream`] that is only drained when the record is written.

use chrono::{DateTime, Utc};
use std::fmt;

/// Lazy, finite, non-restartable sequence of search tokens
pub type TokenStream = Box<dyn Iterator<Item = String> + Send>;

/// Canonical field names
pub mod fields {
    pub const PATH: &str = "path";
    pub const ID: &str = "id";
    pub const MODIFIED: &str = "modified";
    pub const FILESIZE: &str = "filesize";
    pub const TITLE: &str = "title";
    pub const AUTHORS: &str = "authors";
    pub const CONTENT: &str = "content";
    pub const ARCHIVE_PATH: &str = "archivepath";
    pub const PRESENTATION_MATH: &str = "pmath";
    pub const CONTENT_MATH: &str = "cmath";
}

/// A single field value
pub enum FieldValue {
    Text(String),
    U64(u64),
    Date(DateTime<Utc>),
    Tokens(TokenStream),
}

impl FieldValue {
    /// Borrow the text, if this is a text value
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get the integer, if this is a u64 value
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            FieldValue::U64(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Debug for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => f.debug_tuple("Text").field(s).finish(),
            FieldValue::U64(n) => f.debug_tuple("U64").field(n).finish(),
            FieldValue::Date(d) => f.debug_tuple("Date").field(d).finish(),
            FieldValue::Tokens(_) => f.write_str("Tokens(<lazy>)"),
        }
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<u64> for FieldValue {
    fn from(n: u64) -> Self {
        FieldValue::U64(n)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(d: DateTime<Utc>) -> Self {
        FieldValue::Date(d)
    }
}

/// One indexable unit
#[derive(Debug, Default)]
pub struct Record {
    fields: Vec<(String, FieldValue)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, replacing any previous value under the same name
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Set a text field only when `value` is present and non-blank
    pub fn insert_non_empty(&mut self, name: &str, value: Option<String>) {
        if let Some(v) = value {
            if !v.trim().is_empty() {
                self.insert(name, v);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Text value of a field
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FieldValue::as_text)
    }

    /// Document identity used by the backend
    pub fn id(&self) -> Option<&str> {
        self.text(fields::ID)
    }

    /// Root-relative path of the originating file
    pub fn path(&self) -> Option<&str> {
        self.text(fields::PATH)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field names in insertion order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }

    /// Consume the record, yielding its fields in insertion order
    pub fn into_fields(self) -> impl Iterator<Item = (String, FieldValue)> {
        self.fields.into_iter()
    }
}
