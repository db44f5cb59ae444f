//! Task extraction from a branch: annotated comments, commits and a spec file.
//!
//! The three channels are extracted independently and concatenated in that
//! order. Nothing is merged or de-duplicated across channels.

use regex::Regex;

use super::annotation::split_trailing;
use super::checklist::{assemble, scan, Nesting};
use super::error::NormalizeError;
use super::Draft;
use crate::source::{BranchSource, Commit};
use crate::task::{MetadataValue, SourceLocation, Task, TaskStatus};

/// Builds the comment matcher for the given annotation keywords.
///
/// Returns `None` when no keywords are configured.
#[must_use]
pub fn comment_pattern(keywords: &[String]) -> Option<Regex> {
    let alternatives: Vec<String> =
        keywords.iter().filter(|k| !k.is_empty()).map(|k| regex::escape(k)).collect();
    if alternatives.is_empty() {
        return None;
    }
    let pattern = format!(
        r"(?://+|#+|--|/\*+|\*|;+)\s*(?P<kw>{})\b(?:\((?P<owner>[^)]*)\))?:?\s*(?P<text>.*?)\s*(?:\*/)?\s*$",
        alternatives.join("|")
    );
    Regex::new(&pattern).ok()
}

/// Extracts pending tasks from annotated comments on added diff lines.
pub fn comment_tasks(
    diff: &str,
    pattern: Option<&Regex>,
    next_top: &mut usize,
    errors: &mut Vec<NormalizeError>,
) -> Vec<Draft> {
    let Some(pattern) = pattern else {
        return Vec::new();
    };
    let mut drafts = Vec::new();
    let mut file: Option<String> = None;
    let mut new_line = 0usize;
    // Lines still owed by the current hunk, old side and new side.
    let mut old_left = 0usize;
    let mut new_left = 0usize;

    for line in diff.lines() {
        if old_left == 0 && new_left == 0 {
            if line.starts_with("diff --git") {
                file = None;
            } else if let Some(path) = line.strip_prefix("+++ ") {
                file = target_path(path);
            } else if let Some(hunk) = hunk_header(line) {
                (new_line, old_left, new_left) = hunk;
            }
            continue;
        }

        match line.as_bytes().first() {
            Some(b'-') => old_left = old_left.saturating_sub(1),
            Some(b'+') => new_left = new_left.saturating_sub(1),
            Some(b'\\') => {}
            _ => {
                old_left = old_left.saturating_sub(1);
                new_left = new_left.saturating_sub(1);
            }
        }

        match line.as_bytes().first() {
            Some(b'+') => {
                let Some(path) = file.as_deref() else {
                    new_line += 1;
                    continue;
                };
                let location = SourceLocation::new(path, new_line);
                if let Some(caps) = pattern.captures(&line[1..]) {
                    let (title, annotations) = split_trailing(&caps["text"]);
                    if title.is_empty() {
                        errors.push(NormalizeError::parse(
                            location,
                            format!("{} comment has no text", &caps["kw"]),
                        ));
                    } else {
                        *next_top += 1;
                        let mut task =
                            Task::new(next_top.to_string(), title, TaskStatus::Pending, location);
                        task.metadata = annotations.metadata;
                        task.metadata
                            .insert("kind".into(), MetadataValue::Text(caps["kw"].to_string()));
                        if let Some(owner) = caps.name("owner").map(|m| m.as_str().trim()) {
                            if !owner.is_empty() {
                                task.metadata
                                    .insert("owner".into(), MetadataValue::Text(owner.to_string()));
                            }
                        }
                        tracing::debug!(location = %task.source_location, title = %task.title, "comment task");
                        drafts.push(Draft { task, depends: annotations.depends });
                    }
                }
                new_line += 1;
            }
            Some(b' ') | None => new_line += 1,
            _ => {}
        }
    }

    drafts
}

fn target_path(header: &str) -> Option<String> {
    let path = header.split('\t').next().unwrap_or(header).trim();
    if path == "/dev/null" {
        return None;
    }
    Some(path.strip_prefix("b/").unwrap_or(path).to_string())
}

/// Reads `(new start, old length, new length)` from a hunk header like
/// `@@ -1,4 +7,6 @@`. An omitted length is 1.
fn hunk_header(line: &str) -> Option<(usize, usize, usize)> {
    let mut parts = line.strip_prefix("@@ ")?.split_whitespace();
    let (_, old_len) = range(parts.next()?.strip_prefix('-')?)?;
    let (new_start, new_len) = range(parts.next()?.strip_prefix('+')?)?;
    Some((new_start, old_len, new_len))
}

fn range(spec: &str) -> Option<(usize, usize)> {
    match spec.split_once(',') {
        Some((start, len)) => Some((start.parse().ok()?, len.parse().ok()?)),
        None => Some((spec.parse().ok()?, 1)),
    }
}

/// Turns each commit into a completed top-level task.
pub fn commit_tasks(
    branch: &str,
    commits: &[Commit],
    next_top: &mut usize,
    errors: &mut Vec<NormalizeError>,
) -> Vec<Draft> {
    let mut drafts = Vec::new();
    for commit in commits {
        let location = SourceLocation::new(format!("{branch}@{}", commit.short_sha()), 1);
        if commit.subject.trim().is_empty() {
            errors.push(NormalizeError::parse(location, "commit has an empty subject"));
            continue;
        }
        *next_top += 1;
        let mut task =
            Task::new(next_top.to_string(), commit.subject.trim(), TaskStatus::Completed, location);
        if !commit.body.is_empty() {
            task.description = Some(commit.body.clone());
        }
        task.metadata.insert("commit".into(), MetadataValue::Text(commit.sha.clone()));
        drafts.push(Draft { task, depends: Vec::new() });
    }
    drafts
}

/// Extracts all three channels from a branch bundle.
pub fn branch_tasks(
    branch: &str,
    bundle: &BranchSource,
    pattern: Option<&Regex>,
    errors: &mut Vec<NormalizeError>,
) -> Vec<Draft> {
    let mut next_top = 0;
    let mut drafts = comment_tasks(&bundle.diff, pattern, &mut next_top, errors);
    drafts.extend(commit_tasks(branch, &bundle.commits, &mut next_top, errors));

    if let Some(spec) = &bundle.spec {
        let found = scan(&spec.contents, &spec.path);
        errors.extend(found.errors);
        if found.items.is_empty() {
            errors.push(NormalizeError::parse(
                SourceLocation::new(&spec.path, 1),
                "spec file contains no checklist items",
            ));
        }
        drafts.extend(assemble(found.items, Nesting::ByIndent, &mut next_top));
    }

    tracing::debug!(branch, tasks = drafts.len(), "branch channels extracted");
    drafts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SpecFile;

    fn keywords() -> Vec<String> {
        ["TODO", "FIXME", "HACK", "XXX"].iter().map(|s| (*s).to_string()).collect()
    }

    const DIFF: &str = "\
diff --git a/src/auth.rs b/src/auth.rs
--- a/src/auth.rs
+++ b/src/auth.rs
@@ -10,3 +10,5 @@ fn login() {
 let user = load();
-// TODO: old note
+// TODO(alice): rate limit attempts [priority: high]
 check(user);
+    # FIXME handle expiry
+let x = 1; // not a todo
diff --git a/old.py b/old.py
--- a/old.py
+++ /dev/null
@@ -1,1 +0,0 @@
-# TODO gone
";

    #[test]
    fn finds_comments_on_added_lines() {
        let pattern = comment_pattern(&keywords());
        let mut next = 0;
        let mut errors = Vec::new();
        let drafts = comment_tasks(DIFF, pattern.as_ref(), &mut next, &mut errors);

        assert!(errors.is_empty());
        assert_eq!(drafts.len(), 2);
        let first = &drafts[0].task;
        assert_eq!(first.id, "1");
        assert_eq!(first.title, "rate limit attempts");
        assert_eq!(first.source_location, SourceLocation::new("src/auth.rs", 11));
        assert_eq!(first.metadata["owner"], MetadataValue::Text("alice".into()));
        assert_eq!(first.metadata["kind"], MetadataValue::Text("TODO".into()));
        assert_eq!(first.metadata["priority"], MetadataValue::Text("high".into()));

        let second = &drafts[1].task;
        assert_eq!(second.title, "handle expiry");
        assert_eq!(second.source_location.line, 13);
        assert_eq!(second.status, TaskStatus::Pending);
    }

    #[test]
    fn bare_keyword_is_reported() {
        let pattern = comment_pattern(&keywords());
        let diff = "+++ b/a.rs\n@@ -0,0 +1,1 @@\n+// TODO\n";
        let mut next = 0;
        let mut errors = Vec::new();
        let drafts = comment_tasks(diff, pattern.as_ref(), &mut next, &mut errors);
        assert!(drafts.is_empty());
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn added_lines_that_look_like_headers_stay_in_the_hunk() {
        let pattern = comment_pattern(&keywords());
        let diff = "--- a/q.sql\n+++ b/q.sql\n@@ -1,1 +1,3 @@\n select 1;\n+++ counter\n+-- TODO: index this\n";
        let mut next = 0;
        let mut errors = Vec::new();
        let drafts = comment_tasks(diff, pattern.as_ref(), &mut next, &mut errors);
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].task.source_location, SourceLocation::new("q.sql", 3));
    }

    #[test]
    fn hunk_lengths_default_to_one() {
        assert_eq!(hunk_header("@@ -3 +4 @@ fn main()"), Some((4, 1, 1)));
        assert_eq!(hunk_header("@@ -1,2 +0,0 @@"), Some((0, 2, 0)));
        assert_eq!(hunk_header("@@@ -1 -1 +1 @@@"), None);
    }

    #[test]
    fn no_keywords_means_no_comment_tasks() {
        assert!(comment_pattern(&[]).is_none());
    }

    #[test]
    fn commits_are_completed_tasks() {
        let commits = vec![Commit {
            sha: "abcdef0123".into(),
            subject: "Add session store".into(),
            body: "Backed by redis.".into(),
        }];
        let mut next = 2;
        let mut errors = Vec::new();
        let drafts = commit_tasks("feature/auth", &commits, &mut next, &mut errors);
        let task = &drafts[0].task;
        assert_eq!(task.id, "3");
        assert!(task.is_completed());
        assert_eq!(task.description.as_deref(), Some("Backed by redis."));
        assert_eq!(task.source_location.source, "feature/auth@abcdef0");
        assert_eq!(task.metadata["commit"], MetadataValue::Text("abcdef0123".into()));
    }

    #[test]
    fn channels_concatenate_in_order() {
        let bundle = BranchSource {
            commits: vec![Commit { sha: "1234567".into(), subject: "rate limit attempts".into(), body: String::new() }],
            diff: "+++ b/a.rs\n@@ -0,0 +1,1 @@\n+// TODO: rate limit attempts\n".into(),
            spec: Some(SpecFile { path: "TASKS.md".into(), contents: "- [ ] A\n  - [x] B\n".into() }),
        };
        let pattern = comment_pattern(&keywords());
        let mut errors = Vec::new();
        let drafts = branch_tasks("topic", &bundle, pattern.as_ref(), &mut errors);
        let ids: Vec<_> = drafts.iter().map(|d| d.task.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3", "3.1"]);
        // Same text through two channels stays two tasks.
        assert_eq!(drafts[0].task.title, drafts[1].task.title);
        assert_eq!(drafts[3].task.source_location, SourceLocation::new("TASKS.md", 2));
        assert!(errors.is_empty());
    }
}
