//! Task completion state.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Whether a task is still open or done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Not done yet.
    Pending,
    /// Done.
    Completed,
}

impl TaskStatus {
    /// Maps a checklist box character to a status.
    ///
    /// Returns `None` for anything other than a space or `x`/`X`.
    #[must_use]
    pub fn from_marker(marker: char) -> Option<Self> {
        match marker {
            ' ' => Some(Self::Pending),
            'x' | 'X' => Some(Self::Completed),
            _ => None,
        }
    }

    /// Lowercase name as written in the report.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markers_map_to_statuses() {
        assert_eq!(TaskStatus::from_marker(' '), Some(TaskStatus::Pending));
        assert_eq!(TaskStatus::from_marker('x'), Some(TaskStatus::Completed));
        assert_eq!(TaskStatus::from_marker('X'), Some(TaskStatus::Completed));
        assert_eq!(TaskStatus::from_marker('?'), None);
    }

    #[test]
    fn display_matches_serde_name() {
        assert_eq!(TaskStatus::Completed.to_string(), "completed");
        assert_eq!(serde_json::to_string(&TaskStatus::Pending).unwrap(), "\"pending\"");
    }
}
