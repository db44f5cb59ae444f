//! Text form of a branch source.
//!
//! A bundle is a sequence of sections, each introduced by a header line:
//!
//! ```text
//! === commit <sha>
//! <subject>
//! <body…>
//! === diff
//! <unified diff>
//! === spec <path>
//! <checklist file contents>
//! ```

use std::fmt::Write as _;

use thiserror::Error;

const HEADER: &str = "=== ";

/// A commit that landed on the branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    /// Full commit hash.
    pub sha: String,
    /// First line of the message.
    pub subject: String,
    /// Remaining message lines, trimmed; empty when there is no body.
    pub body: String,
}

impl Commit {
    /// First seven characters of the hash.
    #[must_use]
    pub fn short_sha(&self) -> &str {
        self.sha.get(..7).unwrap_or(&self.sha)
    }
}

/// A checklist file found on the branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecFile {
    /// Path of the file within the repository.
    pub path: String,
    /// File contents.
    pub contents: String,
}

/// Everything a branch contributes to task extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BranchSource {
    /// Commits in log order.
    pub commits: Vec<Commit>,
    /// Unified diff of the branch against its base.
    pub diff: String,
    /// Checklist file on the branch, if any.
    pub spec: Option<SpecFile>,
}

/// A problem found while splitting a bundle into sections.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {message}")]
pub struct BundleError {
    /// 1-based line in the bundle text.
    pub line: usize,
    /// What went wrong.
    pub message: String,
}

enum Section {
    None,
    Commit(Commit, Vec<String>),
    Diff,
    Spec(SpecFile),
    /// Lines dropped after a malformed header or stray leading text.
    Skip,
}

impl Section {
    /// Commit messages and spec files are free text: a line that merely
    /// looks like a header belongs to them.
    fn is_free_text(&self) -> bool {
        matches!(self, Self::Commit(..) | Self::Spec(_))
    }
}

impl BranchSource {
    /// Returns `true` if the bundle carries nothing at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commits.is_empty() && self.diff.trim().is_empty() && self.spec.is_none()
    }

    /// Splits bundle text into its sections.
    ///
    /// Never fails outright. Text before the first header, an unknown header
    /// outside a commit or spec section, a commit header without a hash and a
    /// second spec section are reported, and only the lines up to the next
    /// valid header are dropped.
    #[must_use]
    pub fn parse(text: &str) -> (Self, Vec<BundleError>) {
        let mut bundle = Self::default();
        let mut errors = Vec::new();
        let mut section = Section::None;

        for (idx, line) in text.lines().enumerate() {
            let line_no = idx + 1;
            if let Some(header) = line.strip_prefix(HEADER) {
                let spec_seen = bundle.spec.is_some() || matches!(section, Section::Spec(_));
                match open(header.trim(), line_no, spec_seen) {
                    Ok(next) => {
                        bundle.close(std::mem::replace(&mut section, next));
                        continue;
                    }
                    Err(_) if section.is_free_text() => {}
                    Err(err) => {
                        errors.push(err);
                        bundle.close(std::mem::replace(&mut section, Section::Skip));
                        continue;
                    }
                }
            }
            if matches!(section, Section::None) && !line.trim().is_empty() {
                errors.push(BundleError {
                    line: line_no,
                    message: "content before the first section header".into(),
                });
                section = Section::Skip;
                continue;
            }
            match &mut section {
                Section::Commit(commit, body) => {
                    if commit.subject.is_empty() && body.is_empty() {
                        commit.subject = line.trim().to_string();
                    } else {
                        body.push(line.to_string());
                    }
                }
                Section::Diff => {
                    bundle.diff.push_str(line);
                    bundle.diff.push('\n');
                }
                Section::Spec(file) => {
                    file.contents.push_str(line);
                    file.contents.push('\n');
                }
                Section::None | Section::Skip => {}
            }
        }
        bundle.close(section);
        (bundle, errors)
    }

    fn close(&mut self, section: Section) {
        match section {
            Section::Commit(mut commit, body) => {
                commit.body = body.join("\n").trim().to_string();
                self.commits.push(commit);
            }
            Section::Spec(file) => self.spec = Some(file),
            Section::None | Section::Diff | Section::Skip => {}
        }
    }

    /// Renders the bundle back to its text form.
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for commit in &self.commits {
            let _ = writeln!(out, "{HEADER}commit {}", commit.sha);
            let _ = writeln!(out, "{}", commit.subject);
            if !commit.body.is_empty() {
                let _ = writeln!(out, "\n{}", commit.body);
            }
        }
        if !self.diff.is_empty() {
            let _ = writeln!(out, "{HEADER}diff");
            out.push_str(&self.diff);
            if !self.diff.ends_with('\n') {
                out.push('\n');
            }
        }
        if let Some(spec) = &self.spec {
            let _ = writeln!(out, "{HEADER}spec {}", spec.path);
            out.push_str(&spec.contents);
        }
        out
    }
}

fn open(header: &str, line: usize, spec_seen: bool) -> Result<Section, BundleError> {
    let (kind, arg) = header.split_once(char::is_whitespace).unwrap_or((header, ""));
    let arg = arg.trim();
    match kind {
        "commit" if !arg.is_empty() => Ok(Section::Commit(
            Commit { sha: arg.to_string(), subject: String::new(), body: String::new() },
            Vec::new(),
        )),
        "commit" => Err(BundleError { line, message: "commit header without a hash".into() }),
        "diff" => Ok(Section::Diff),
        "spec" if spec_seen => Err(BundleError { line, message: "more than one spec section".into() }),
        "spec" if !arg.is_empty() => {
            Ok(Section::Spec(SpecFile { path: arg.to_string(), contents: String::new() }))
        }
        "spec" => Err(BundleError { line, message: "spec header without a path".into() }),
        other => Err(BundleError { line, message: format!("unknown section '{other}'") }),
    }
}
