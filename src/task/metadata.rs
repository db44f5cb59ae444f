//! Free-form task annotations.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Annotation map keyed by name. Keys are unique and kept sorted.
pub type Metadata = BTreeMap<String, MetadataValue>;

/// A scalar or sequence annotation value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    /// `true` / `false`.
    Bool(bool),
    /// Whole number.
    Integer(i64),
    /// Any other single value.
    Text(String),
    /// Comma-separated values or accumulated labels.
    List(Vec<String>),
}

impl MetadataValue {
    /// Types a raw annotation value best-effort.
    ///
    /// Integers and booleans are recognised, values containing a comma become
    /// a list, anything else is kept as text. Comma wins over digits, so
    /// `1,000` is the list `["1", "000"]`.
    #[must_use]
    pub fn infer(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.contains(',') {
            let items = raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
            return Self::List(items);
        }
        if let Ok(n) = raw.parse::<i64>() {
            return Self::Integer(n);
        }
        match raw {
            "true" => Self::Bool(true),
            "false" => Self::Bool(false),
            _ => Self::Text(raw.to_string()),
        }
    }

    /// Renders the value for display.
    #[must_use]
    pub fn display(&self) -> String {
        match self {
            Self::Bool(b) => b.to_string(),
            Self::Integer(n) => n.to_string(),
            Self::Text(s) => s.clone(),
            Self::List(items) => items.join(", "),
        }
    }
}
