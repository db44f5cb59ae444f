//! Canonical task types.
//!
//! Every source shape is normalized into these types. They are serialized
//! into the report document and read back by the review commands.

mod collection;
mod location;
mod metadata;
mod status;

pub use collection::{Summary, TaskCollection};
pub use location::SourceLocation;
pub use metadata::{Metadata, MetadataValue};
pub use status::TaskStatus;

use serde::{Deserialize, Serialize};

/// A single normalized task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Position-derived identifier (e.g. `"1"`, `"1.2"`).
    pub id: String,
    /// Display text, never empty.
    pub title: String,
    /// Supplementary text, present only when the source supplies it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Completion state.
    pub status: TaskStatus,
    /// Owning task, `None` for top-level tasks.
    #[serde(default)]
    pub parent_id: Option<String>,
    /// Ids of tasks whose `parent_id` is this task, in document order.
    #[serde(default)]
    pub children: Vec<String>,
    /// Ids of tasks that must be completed first.
    #[serde(default)]
    pub depends_on: Vec<String>,
    /// Entries of `depends_on` whose task is not completed yet.
    #[serde(default)]
    pub blocked_by: Vec<String>,
    /// Free-form annotations captured from the source line.
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    pub metadata: Metadata,
    /// Where the task came from.
    pub source_location: SourceLocation,
}

impl Task {
    /// Creates a top-level task with no relations.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        status: TaskStatus,
        source_location: SourceLocation,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            status,
            parent_id: None,
            children: Vec::new(),
            depends_on: Vec::new(),
            blocked_by: Vec::new(),
            metadata: Metadata::new(),
            source_location,
        }
    }

    /// Returns `true` if the task has been completed.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    /// Returns `true` if the task has no parent.
    #[must_use]
    pub fn is_top_level(&self) -> bool {
        self.parent_id.is_none()
    }
}
