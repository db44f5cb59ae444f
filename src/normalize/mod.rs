//! The task normalizer.
//!
//! Turns a [`RawSource`] into a [`TaskCollection`] with position-derived ids,
//! parent/child links, resolved dependencies and derived `blocked_by` lists.
//! Problems are collected as [`NormalizeError`]s next to the partial result;
//! a run never aborts on bad input.

pub mod annotation;
pub mod branch;
pub mod checklist;
pub mod deps;
mod error;

pub use error::NormalizeError;

use std::borrow::Cow;

use regex::Regex;

use crate::source::{BranchSource, RawSource, SourceType};
use crate::task::{SourceLocation, Summary, Task, TaskCollection};
use checklist::Nesting;

/// Comment keywords that mark a task in changed code.
pub const DEFAULT_KEYWORDS: &[&str] = &["TODO", "FIXME", "HACK", "XXX"];

/// A task whose dependency references are not resolved yet.
#[derive(Debug, Clone, PartialEq)]
pub struct Draft {
    /// The task, with an empty `depends_on`.
    pub task: Task,
    /// References as written in the source.
    pub depends: Vec<String>,
}

/// Output of one normalizer run.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    /// Every task that could be recovered.
    pub collection: TaskCollection,
    /// Problems found along the way.
    pub errors: Vec<NormalizeError>,
}

impl Normalized {
    /// Status tally of the collection.
    #[must_use]
    pub fn summary(&self) -> Summary {
        self.collection.summary()
    }
}

/// Normalizes raw sources into task collections.
#[derive(Debug, Clone)]
pub struct Normalizer {
    comments: Option<Regex>,
}

impl Default for Normalizer {
    fn default() -> Self {
        let keywords: Vec<String> = DEFAULT_KEYWORDS.iter().map(|k| (*k).to_string()).collect();
        Self::new(&keywords)
    }
}

impl Normalizer {
    /// Creates a normalizer recognising the given comment keywords in branch diffs.
    #[must_use]
    pub fn new(keywords: &[String]) -> Self {
        Self { comments: branch::comment_pattern(keywords) }
    }

    /// Normalizes one source.
    ///
    /// Output is a pure function of the input: identical sources yield
    /// identical ids and structure.
    #[must_use]
    pub fn normalize(&self, source: &RawSource) -> Normalized {
        let mut errors = Vec::new();
        let locator = source.locator();

        let drafts = match source.source_type {
            SourceType::Spec => checklist_drafts(&source.text, &locator, false, &mut errors),
            SourceType::Pr => checklist_drafts(&source.text, &locator, true, &mut errors),
            SourceType::Branch => {
                let bundle = branch_bundle(source, &locator, &mut errors);
                branch::branch_tasks(&source.source_ref, &bundle, self.comments.as_ref(), &mut errors)
            }
        };

        if drafts.is_empty() {
            let message = match source.source_type {
                SourceType::Spec | SourceType::Pr => "no checklist items found",
                SourceType::Branch => "no tasks found in comments, commits or spec file",
            };
            errors.push(NormalizeError::parse(SourceLocation::new(&locator, 1), message));
        }

        let mut collection = deps::resolve(drafts, &mut errors);
        for members in deps::break_cycles(&mut collection) {
            errors.push(NormalizeError::CyclicDependency { members });
        }
        collection.refresh_blocked();

        let summary = collection.summary();
        tracing::info!(
            source_type = %source.source_type,
            source_ref = %source.source_ref,
            total = summary.total,
            completed = summary.completed,
            pending = summary.pending,
            errors = errors.len(),
            "normalized source"
        );
        for error in &errors {
            tracing::warn!(kind = error.kind(), "{error}");
        }

        Normalized { collection, errors }
    }
}

fn branch_bundle<'a>(
    source: &'a RawSource,
    locator: &str,
    errors: &mut Vec<NormalizeError>,
) -> Cow<'a, BranchSource> {
    if let Some(bundle) = &source.bundle {
        return Cow::Borrowed(bundle);
    }
    let (bundle, problems) = BranchSource::parse(&source.text);
    errors.extend(
        problems
            .into_iter()
            .map(|p| NormalizeError::parse(SourceLocation::new(locator, p.line), p.message)),
    );
    Cow::Owned(bundle)
}

fn checklist_drafts(
    text: &str,
    locator: &str,
    pr_body: bool,
    errors: &mut Vec<NormalizeError>,
) -> Vec<Draft> {
    let found = checklist::scan(text, locator);
    errors.extend(found.errors);
    let nesting = if pr_body { checklist::pr_nesting(&found.items) } else { Nesting::ByIndent };
    let mut next_top = 0;
    checklist::assemble(found.items, nesting, &mut next_top)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::Commit;
    use crate::task::{MetadataValue, TaskStatus};

    const EXAMPLE: &str = "- [ ] Implement user authentication\n  - [ ] Add login form\n  - [ ] Add session management\n- [x] Set up database schema\n";

    fn spec(text: &str) -> Normalized {
        Normalizer::default().normalize(&RawSource::new(SourceType::Spec, "docs/plan.md", text))
    }

    #[test]
    fn normalizes_reference_example() {
        let out = spec(EXAMPLE);
        assert!(out.errors.is_empty());
        assert_eq!(out.summary(), Summary { total: 4, completed: 1, pending: 3 });

        let tasks = out.collection.tasks();
        assert_eq!(tasks[0].id, "1");
        assert_eq!(tasks[0].children, vec!["1.1", "1.2"]);
        assert_eq!(tasks[1].parent_id.as_deref(), Some("1"));
        assert_eq!(tasks[2].title, "Add session management");
        assert_eq!(tasks[3].id, "2");
        assert_eq!(tasks[3].status, TaskStatus::Completed);
        assert!(tasks[3].children.is_empty());
    }

    #[test]
    fn identical_input_gives_identical_output() {
        assert_eq!(spec(EXAMPLE), spec(EXAMPLE));
    }

    #[test]
    fn missing_checklist_is_a_parse_error() {
        let out = spec("# Notes\n\nNothing to do here.\n");
        assert!(out.collection.is_empty());
        assert_eq!(
            out.errors,
            vec![NormalizeError::parse(SourceLocation::new("docs/plan.md", 1), "no checklist items found")]
        );
    }

    #[test]
    fn dependencies_and_blockers() {
        let text = "- [x] Schema\n- [ ] API [depends: 1]\n- [ ] UI (depends on API, Schema)\n- [ ] Docs [depends: 7]\n";
        let out = spec(text);
        let ui = out.collection.get("3").unwrap();
        assert_eq!(ui.depends_on, vec!["2", "1"]);
        assert_eq!(ui.blocked_by, vec!["2"]);
        assert!(out.collection.get("2").unwrap().blocked_by.is_empty());
        assert_eq!(
            out.errors,
            vec![NormalizeError::DanglingDependency { referrer: "4".into(), target: "7".into() }]
        );
        assert!(out.collection.get("4").unwrap().depends_on.is_empty());
    }

    #[test]
    fn cycles_are_reported_and_removed() {
        let out = spec("- [ ] A [depends: 2]\n- [ ] B [depends: 1]\n");
        assert_eq!(out.collection.len(), 2);
        assert_eq!(
            out.errors,
            vec![NormalizeError::CyclicDependency { members: vec!["1".into(), "2".into()] }]
        );
        assert!(out.collection.tasks().iter().all(|t| t.depends_on.is_empty() && t.blocked_by.is_empty()));
    }

    #[test]
    fn nested_child_does_not_depend_on_parent() {
        let out = spec(EXAMPLE);
        assert!(out.collection.get("1.1").unwrap().depends_on.is_empty());
    }

    #[test]
    fn pr_body_with_unreliable_indent_is_flat() {
        let body = "## Checklist\n- [x] Tests\n   - [ ] Docs\n  - [ ] Changelog\n";
        let out = Normalizer::default().normalize(&RawSource::new(SourceType::Pr, "42", body));
        assert!(out.collection.tasks().iter().all(Task::is_top_level));
        assert_eq!(out.collection.get("1").unwrap().source_location, SourceLocation::new("PR #42", 2));
    }

    #[test]
    fn pr_body_with_clean_indent_nests() {
        let body = "- [ ] Feature\n  - [x] Part one\n";
        let out = Normalizer::default().normalize(&RawSource::new(SourceType::Pr, "#7", body));
        assert_eq!(out.collection.get("1.1").unwrap().parent_id.as_deref(), Some("1"));
    }

    #[test]
    fn branch_bundle_errors_are_parse_errors() {
        let out = Normalizer::default()
            .normalize(&RawSource::new(SourceType::Branch, "topic", "=== bogus\n"));
        assert!(out.collection.is_empty());
        assert!(matches!(&out.errors[0], NormalizeError::Parse { location, .. } if location.source == "topic"));
    }

    #[test]
    fn branch_comment_can_reference_commit_title() {
        let bundle = "=== commit aaaaaaa\nAdd session store\n=== diff\n+++ b/a.rs\n@@ -0,0 +1,1 @@\n+// TODO: expire sessions (depends on Add session store)\n";
        let out = Normalizer::default().normalize(&RawSource::new(SourceType::Branch, "topic", bundle));
        assert!(out.errors.is_empty());
        let todo = out.collection.get("1").unwrap();
        assert_eq!(todo.depends_on, vec!["2"]);
        assert!(todo.blocked_by.is_empty());
        assert_eq!(out.collection.get("2").unwrap().metadata["commit"], MetadataValue::Text("aaaaaaa".into()));
    }

    #[test]
    fn branch_from_git_keeps_header_lookalikes_in_commit_bodies() {
        let bundle = BranchSource {
            commits: vec![
                Commit {
                    sha: "aaaaaaa1".into(),
                    subject: "Bump parser".into(),
                    body: "Details:\n=== Breaking changes\n=== diff\nnone".into(),
                },
                Commit { sha: "bbbbbbb2".into(), subject: "Fix typo".into(), body: String::new() },
            ],
            diff: "+++ b/a.rs\n@@ -0,0 +1,1 @@\n+// TODO: evict\n".into(),
            spec: None,
        };
        let out = Normalizer::default().normalize(&RawSource::branch("topic", bundle));
        assert!(out.errors.is_empty(), "{:?}", out.errors);
        let titles: Vec<&str> = out.collection.tasks().iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["evict", "Bump parser", "Fix typo"]);
    }

    #[test]
    fn bundle_text_recovers_after_a_bad_section() {
        let bundle = "=== notes\nignored\n=== commit aaaaaaa\nAdd cache\n\n=== Breaking changes\n";
        let out = Normalizer::default().normalize(&RawSource::new(SourceType::Branch, "topic", bundle));
        assert_eq!(out.collection.len(), 1);
        assert_eq!(out.collection.get("1").unwrap().title, "Add cache");
        assert_eq!(out.errors.len(), 1);
        assert!(matches!(&out.errors[0], NormalizeError::Parse { location, .. } if location.line == 1));
    }

    #[test]
    fn trailing_remarks_stay_in_titles() {
        let out = spec("- [ ] Deploy to prod (after lunch)\n- [ ] Merge PR (needs review)\n");
        assert!(out.errors.is_empty());
        assert_eq!(out.collection.get("1").unwrap().title, "Deploy to prod (after lunch)");
        assert_eq!(out.collection.get("2").unwrap().title, "Merge PR (needs review)");
        assert!(out.collection.tasks().iter().all(|t| t.depends_on.is_empty()));
    }

    #[test]
    fn custom_keywords() {
        let bundle = "=== diff\n+++ b/a.rs\n@@ -0,0 +1,2 @@\n+// NOTE: check this\n+// TODO: ignored\n";
        let out = Normalizer::new(&["NOTE".to_string()])
            .normalize(&RawSource::new(SourceType::Branch, "topic", bundle));
        assert_eq!(out.collection.len(), 1);
        assert_eq!(out.collection.tasks()[0].title, "check this");
    }
}
