//! The report document produced for the reviewer.

mod table;

pub use table::{render_errors, render_table, Glyphs};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::normalize::{NormalizeError, Normalized};
use crate::source::{RawSource, SourceType};
use crate::task::{Summary, Task, TaskCollection};

/// JSON document describing one normalizer run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskReport {
    /// Shape of the source that was parsed.
    pub source_type: SourceType,
    /// File path, PR number or branch name.
    pub source_ref: String,
    /// When the run happened.
    pub parsed_at: DateTime<Utc>,
    /// Status tally over `tasks`.
    pub summary: Summary,
    /// Tasks in document order.
    pub tasks: Vec<Task>,
    /// Problems found while normalizing.
    #[serde(default)]
    pub errors: Vec<NormalizeError>,
}

impl TaskReport {
    /// Builds a report from a normalizer run.
    #[must_use]
    pub fn new(source: &RawSource, normalized: Normalized, parsed_at: DateTime<Utc>) -> Self {
        let summary = normalized.collection.summary();
        Self {
            source_type: source.source_type,
            source_ref: source.source_ref.clone(),
            parsed_at,
            summary,
            tasks: normalized.collection.into_tasks(),
            errors: normalized.errors,
        }
    }

    /// Rebuilds an indexed collection from the stored tasks.
    #[must_use]
    pub fn collection(&self) -> TaskCollection {
        TaskCollection::from_tasks(self.tasks.clone())
    }

    /// Serializes the report as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, String> {
        serde_json::to_string_pretty(self).map_err(|e| format!("Failed to serialize report: {e}"))
    }

    /// Parses a report from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not describe a report.
    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| format!("Failed to parse report: {e}"))
    }
}
