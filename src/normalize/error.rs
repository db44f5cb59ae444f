//! Errors collected while normalizing a source.
//!
//! None of these abort a run: the normalizer keeps every task it could
//! recover and returns the errors alongside them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::task::SourceLocation;

/// A problem found in the source text or its dependency graph.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NormalizeError {
    /// The text did not match the declared source shape.
    #[error("{location}: {message}")]
    #[serde(rename = "parse_error")]
    Parse {
        /// Offending position.
        location: SourceLocation,
        /// What was wrong.
        message: String,
    },

    /// A dependency reference matched no task id or title.
    #[error("task {referrer} depends on unknown task '{target}'")]
    DanglingDependency {
        /// Id of the task holding the reference.
        referrer: String,
        /// The reference as written.
        target: String,
    },

    /// Dependencies form a cycle; its edges were removed.
    #[error("dependency cycle: {}", render_cycle(.members))]
    CyclicDependency {
        /// Task ids on the cycle, in dependency order.
        members: Vec<String>,
    },
}

impl NormalizeError {
    /// Builds a parse error.
    pub fn parse(location: SourceLocation, message: impl Into<String>) -> Self {
        Self::Parse { location, message: message.into() }
    }

    /// Short kind name as serialized.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Parse { .. } => "parse_error",
            Self::DanglingDependency { .. } => "dangling_dependency",
            Self::CyclicDependency { .. } => "cyclic_dependency",
        }
    }
}

fn render_cycle(members: &[String]) -> String {
    let mut path = members.to_vec();
    if let Some(first) = members.first() {
        path.push(first.clone());
    }
    path.join(" -> ")
}
