//! Markdown table rendering of a task collection.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::normalize::NormalizeError;
use crate::task::{Task, TaskCollection, TaskStatus};

/// Status glyphs used in the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Glyphs {
    /// Shown for pending tasks.
    pub pending: String,
    /// Shown for completed tasks.
    pub completed: String,
}

impl Default for Glyphs {
    fn default() -> Self {
        Self { pending: "⬜".to_string(), completed: "✅".to_string() }
    }
}

impl Glyphs {
    fn for_status(&self, status: TaskStatus) -> &str {
        match status {
            TaskStatus::Pending => &self.pending,
            TaskStatus::Completed => &self.completed,
        }
    }
}

/// Renders one row per task: top-level rows numbered, children indented
/// beneath their parent, followed by the summary line.
#[must_use]
pub fn render_table(collection: &TaskCollection, glyphs: &Glyphs) -> String {
    let mut out = String::new();
    out.push_str("| # | Status | Task | Depends on |\n");
    out.push_str("|---|--------|------|------------|\n");

    for (n, top) in collection.top_level().enumerate() {
        let mut pending = vec![(top, Some(n + 1), 0)];
        while let Some((task, number, depth)) = pending.pop() {
            write_row(&mut out, task, number, depth, glyphs);
            let children: Vec<&Task> = collection.children_of(task).collect();
            pending.extend(children.into_iter().rev().map(|child| (child, None, depth + 1)));
        }
    }

    let _ = write!(out, "\n{}\n", collection.summary().line());
    out
}

fn write_row(out: &mut String, task: &Task, number: Option<usize>, depth: usize, glyphs: &Glyphs) {
    let number = number.map(|n| n.to_string()).unwrap_or_default();
    let prefix = if depth == 0 { String::new() } else { format!("{}└─ ", "  ".repeat(depth - 1)) };
    let _ = writeln!(
        out,
        "| {number} | {} | {prefix}{} | {} |",
        glyphs.for_status(task.status),
        escape(&task.title),
        task.depends_on.join(", "),
    );
}

fn escape(text: &str) -> String {
    text.replace('|', "\\|")
}

/// Renders collected errors as a bullet list, or nothing when there are none.
#[must_use]
pub fn render_errors(errors: &[NormalizeError]) -> String {
    if errors.is_empty() {
        return String::new();
    }
    let mut out = format!("\n{} problem(s):\n", errors.len());
    for error in errors {
        let _ = writeln!(out, "- {error}");
    }
    out
}
