//! Checklist scanning and indentation-driven nesting.
//!
//! A checklist line is a bullet (`-`, `*`, `+`, `1.` or `1)`), a box marker
//! (`[ ]`, `[x]`, `[X]`) and a title. Items nest under the closest preceding
//! item with a shallower indent; ids follow the resulting tree.

use std::sync::LazyLock;

use regex::Regex;

use super::annotation::{split_trailing, Annotations};
use super::error::NormalizeError;
use super::Draft;
use crate::task::{SourceLocation, Task, TaskStatus};

static ITEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<indent>[ \t]*)(?:[-*+]|\d+[.)])[ \t]+\[(?P<mark>[^\]]?)\](?P<title>.*)$")
        .expect("valid checklist regex")
});

const TAB_WIDTH: usize = 4;

/// One checklist line after annotation capture.
#[derive(Debug, Clone, PartialEq)]
pub struct ChecklistItem {
    /// Where the line is.
    pub location: SourceLocation,
    /// Indentation in columns.
    pub indent: usize,
    /// Whether the indentation contains a tab.
    pub tabbed: bool,
    /// Marker state.
    pub status: TaskStatus,
    /// Title with annotations removed.
    pub title: String,
    /// Continuation text indented under the item.
    pub description: Option<String>,
    /// Captured annotations.
    pub annotations: Annotations,
}

/// How items are arranged into a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nesting {
    /// Deeper indentation makes a child of the closest shallower item.
    ByIndent,
    /// Every item is top-level.
    Flat,
}

/// Result of scanning one text.
#[derive(Debug, Default)]
pub struct Scan {
    /// Recognised items in document order.
    pub items: Vec<ChecklistItem>,
    /// Lines that looked like checklist items but could not be used.
    pub errors: Vec<NormalizeError>,
}

/// Scans `text` for checklist items, locating them under `source`.
///
/// Lines inside fenced code blocks are skipped.
#[must_use]
pub fn scan(text: &str, source: &str) -> Scan {
    let mut scan = Scan::default();
    let mut in_fence = false;
    // Set while the lines directly under the last item may extend its description.
    let mut open_item = false;

    for (idx, line) in text.lines().enumerate() {
        let location = SourceLocation::new(source, idx + 1);
        let trimmed = line.trim_start();

        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            in_fence = !in_fence;
            open_item = false;
            continue;
        }
        if in_fence {
            continue;
        }

        if let Some(caps) = ITEM.captures(line) {
            open_item = false;
            let (indent, tabbed) = measure(&caps["indent"]);
            let mark = caps["mark"].chars().next();
            let Some(status) = mark.and_then(TaskStatus::from_marker) else {
                scan.errors.push(NormalizeError::parse(
                    location,
                    format!("unrecognised checklist marker '[{}]'", &caps["mark"]),
                ));
                continue;
            };
            let (title, annotations) = split_trailing(&caps["title"]);
            if title.is_empty() {
                scan.errors.push(NormalizeError::parse(location, "checklist item has no title"));
                continue;
            }
            tracing::debug!(%location, indent, %status, %title, "checklist item");
            scan.items.push(ChecklistItem {
                location,
                indent,
                tabbed,
                status,
                title,
                description: None,
                annotations,
            });
            open_item = true;
            continue;
        }

        if trimmed.is_empty() {
            open_item = false;
            continue;
        }
        if open_item {
            let (indent, _) = measure(&line[..line.len() - trimmed.len()]);
            if let Some(item) = scan.items.last_mut().filter(|item| indent > item.indent) {
                let text = trimmed.trim_end();
                item.description = Some(match item.description.take() {
                    Some(existing) => format!("{existing} {text}"),
                    None => text.to_string(),
                });
                continue;
            }
            open_item = false;
        }
    }

    scan
}

fn measure(indent: &str) -> (usize, bool) {
    let mut width = 0;
    let mut tabbed = false;
    for c in indent.chars() {
        if c == '\t' {
            tabbed = true;
            width += TAB_WIDTH;
        } else {
            width += 1;
        }
    }
    (width, tabbed)
}

/// Decides whether PR body indentation is reliable enough to nest by.
///
/// Nesting is used only when indents are spaces, every indent is a multiple of
/// the smallest non-zero indent, the first item is unindented and no item is
/// more than one level deeper than the item before it.
#[must_use]
pub fn pr_nesting(items: &[ChecklistItem]) -> Nesting {
    if items.iter().any(|item| item.tabbed) {
        return Nesting::Flat;
    }
    let Some(unit) = items.iter().map(|item| item.indent).filter(|&i| i > 0).min() else {
        return Nesting::Flat;
    };
    let mut previous: Option<usize> = None;
    for item in items {
        if item.indent % unit != 0 {
            return Nesting::Flat;
        }
        let level = item.indent / unit;
        let limit = previous.map_or(0, |p| p + 1);
        if level > limit {
            return Nesting::Flat;
        }
        previous = Some(level);
    }
    Nesting::ByIndent
}

/// Arranges items into a forest and assigns position-derived ids.
///
/// `next_top` is the number of top-level tasks already assigned; it is
/// advanced so that several sources can share one numbering.
#[must_use]
pub fn assemble(items: Vec<ChecklistItem>, nesting: Nesting, next_top: &mut usize) -> Vec<Draft> {
    let mut drafts: Vec<Draft> = Vec::with_capacity(items.len());
    // (indent, index into drafts)
    let mut stack: Vec<(usize, usize)> = Vec::new();

    for item in items {
        if nesting == Nesting::Flat {
            stack.clear();
        }
        while stack.last().is_some_and(|&(indent, _)| indent >= item.indent) {
            stack.pop();
        }

        let parent = stack.last().map(|&(_, index)| index);
        let id = match parent {
            Some(p) => format!("{}.{}", drafts[p].task.id, drafts[p].task.children.len() + 1),
            None => {
                *next_top += 1;
                next_top.to_string()
            }
        };

        let mut task = Task::new(id.clone(), item.title, item.status, item.location);
        task.description = item.description;
        task.metadata = item.annotations.metadata;
        if let Some(p) = parent {
            task.parent_id = Some(drafts[p].task.id.clone());
            drafts[p].task.children.push(id);
        }

        stack.push((item.indent, drafts.len()));
        drafts.push(Draft { task, depends: item.annotations.depends });
    }

    drafts
}
