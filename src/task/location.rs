//! Back-references from tasks to the raw artifact they came from.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A locator into the raw source: a file path, PR reference or commit, plus a line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    /// File path or other identifier of the originating artifact.
    pub source: String,
    /// 1-based line number within that artifact.
    pub line: usize,
}

impl SourceLocation {
    /// Creates a location.
    #[must_use]
    pub fn new(source: impl Into<String>, line: usize) -> Self {
        Self { source: source.into(), line }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.source, self.line)
    }
}
