//! Raw task sources handed to the normalizer.
//!
//! A source is raw text tagged with its shape and a reference naming where it
//! came from. Fetching the text is the caller's job (files, stdin, `git`).

mod bundle;

pub use bundle::{BranchSource, BundleError, Commit, SpecFile};

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// The shape of a raw source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    /// A checklist-style specification file.
    Spec,
    /// A pull-request description body.
    Pr,
    /// A version-control branch: commits, changed content and an optional spec file.
    Branch,
}

impl SourceType {
    /// Lowercase name as written in the report.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Spec => "spec",
            Self::Pr => "pr",
            Self::Branch => "branch",
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw text plus its shape and origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSource {
    /// Declared shape of `text`.
    pub source_type: SourceType,
    /// File path, PR number or branch name.
    pub source_ref: String,
    /// Raw contents. For branches this is the bundle text form.
    pub text: String,
    /// Branch contents read from git. When present the normalizer uses it
    /// instead of re-splitting `text`.
    pub bundle: Option<BranchSource>,
}

impl RawSource {
    /// Creates a raw source.
    #[must_use]
    pub fn new(source_type: SourceType, source_ref: impl Into<String>, text: impl Into<String>) -> Self {
        Self { source_type, source_ref: source_ref.into(), text: text.into(), bundle: None }
    }

    /// Wraps a branch bundle, keeping it alongside its text form.
    #[must_use]
    pub fn branch(branch: impl Into<String>, bundle: BranchSource) -> Self {
        let text = bundle.to_text();
        Self { bundle: Some(bundle), ..Self::new(SourceType::Branch, branch, text) }
    }

    /// Locator name used in `source_location` for line-based sources.
    ///
    /// PR bodies are referenced as `PR #<n>`; other sources use the reference verbatim.
    #[must_use]
    pub fn locator(&self) -> String {
        match self.source_type {
            SourceType::Pr => {
                let number = self.source_ref.trim_start_matches('#');
                format!("PR #{number}")
            }
            SourceType::Spec | SourceType::Branch => self.source_ref.clone(),
        }
    }
}
