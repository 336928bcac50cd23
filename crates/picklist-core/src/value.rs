//! Selection values exchanged with the bound backend variable.

use crate::error::parse_json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A selection as the backend sees it: one id, or an ordered list of ids.
///
/// Serialized untagged (a JSON string or a JSON array of strings). Decoding
/// is lenient: numbers and booleans become their JSON text, `null` is an
/// empty list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
#[serde(from = "Value")]
pub enum SelectionValue {
    /// Single-select value
    Single(String),
    /// Multi-select value, in selection order
    Many(Vec<String>),
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

impl From<Value> for SelectionValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Many(Vec::new()),
            Value::Array(items) => Self::Many(items.iter().filter_map(scalar_text).collect()),
            Value::Object(_) => Self::Single(value.to_string()),
            scalar => Self::Single(scalar_text(&scalar).unwrap_or_default()),
        }
    }
}

impl From<&str> for SelectionValue {
    fn from(id: &str) -> Self {
        Self::Single(id.to_string())
    }
}

impl From<Vec<String>> for SelectionValue {
    fn from(ids: Vec<String>) -> Self {
        Self::Many(ids)
    }
}

impl SelectionValue {
    /// Decode a serialized default value.
    ///
    /// JSON arrays and scalars are decoded; anything else is taken literally
    /// as a single id.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        parse_json(raw).map_or_else(
            |err| {
                tracing::debug!(%err, "default value is not JSON, using raw text");
                Self::Single(raw.to_string())
            },
            Self::from,
        )
    }

    /// The ids, coercing a single value into a one-element list.
    #[must_use]
    pub fn into_ids(self) -> Vec<String> {
        match self {
            Self::Single(id) => vec![id],
            Self::Many(ids) => ids,
        }
    }

    /// Borrowing form of [`SelectionValue::into_ids`].
    #[must_use]
    pub fn ids(&self) -> Vec<&str> {
        match self {
            Self::Single(id) => vec![id.as_str()],
            Self::Many(ids) => ids.iter().map(String::as_str).collect(),
        }
    }
}
