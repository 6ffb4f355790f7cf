//! Field access for heterogeneous records.

use std::fmt;

/// A single field value as seen by the list pipeline.
///
/// Nested objects and arrays are opaque: they never match a search term,
/// never satisfy a range and compare equal to everything.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Bool(bool),
    Nested,
}

impl FieldValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Case-insensitive substring match. `needle` must already be lowercase.
    pub(crate) fn contains_lowercase(&self, needle: &str) -> bool {
        match self {
            FieldValue::Text(s) => s.to_lowercase().contains(needle),
            FieldValue::Number(n) => n.to_string().to_lowercase().contains(needle),
            FieldValue::Bool(_) | FieldValue::Nested => false,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => write!(f, "{}", s),
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Nested => write!(f, "[nested]"),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Number(n as f64)
    }
}

impl From<i32> for FieldValue {
    fn from(n: i32) -> Self {
        FieldValue::Number(n as f64)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

/// Anything the pipeline can search, filter and sort by field name.
pub trait Record {
    /// Value of the named field, or `None` when the record has no such field.
    fn field(&self, name: &str) -> Option<FieldValue>;
}

impl<R: Record + ?Sized> Record for &R {
    fn field(&self, name: &str) -> Option<FieldValue> {
        (**self).field(name)
    }
}

/// JSON objects are records keyed by property name. `null` reads as absent.
impl Record for serde_json::Value {
    fn field(&self, name: &str) -> Option<FieldValue> {
        match self.get(name)? {
            serde_json::Value::Null => None,
            serde_json::Value::Bool(b) => Some(FieldValue::Bool(*b)),
            serde_json::Value::Number(n) => n.as_f64().map(FieldValue::Number),
            serde_json::Value::String(s) => Some(FieldValue::Text(s.clone())),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
                Some(FieldValue::Nested)
            }
        }
    }
}
