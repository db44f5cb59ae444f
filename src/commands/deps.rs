//! `taskparse deps` command.

use std::fmt::Write as _;
use std::path::Path;

use super::load_report;
use crate::context::ServiceContext;
use crate::task::TaskCollection;

/// Execute the `deps` command.
///
/// Lists pending tasks with nothing blocking them, then blocked tasks with
/// the ids they wait on.
///
/// # Errors
///
/// Returns an error string if the stored report cannot be read.
pub fn run(ctx: &ServiceContext, path: &Path) -> Result<(), String> {
    let Some(report) = load_report(ctx, path)? else {
        return Ok(());
    };
    print!("{}", render_deps(&report.collection()));
    Ok(())
}

fn render_deps(collection: &TaskCollection) -> String {
    let pending: Vec<_> = collection.tasks().iter().filter(|t| !t.is_completed()).collect();
    if pending.is_empty() {
        return format!("All {} task(s) completed.\n", collection.len());
    }
    let (blocked, ready): (Vec<_>, Vec<_>) = pending.into_iter().partition(|t| !t.blocked_by.is_empty());

    let mut out = String::new();
    let _ = writeln!(out, "Ready ({}):", ready.len());
    for task in &ready {
        let _ = writeln!(out, "  {}  {}", task.id, task.title);
    }
    if !blocked.is_empty() {
        let _ = writeln!(out, "\nBlocked ({}):", blocked.len());
        for task in &blocked {
            let _ = writeln!(out, "  {}  {}  (waiting on {})", task.id, task.title, task.blocked_by.join(", "));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::fixed::{CannedGitRepo, MemoryFileSystem};
    use crate::normalize::Normalizer;
    use crate::source::{RawSource, SourceType};

    fn collection(text: &str) -> TaskCollection {
        Normalizer::default().normalize(&RawSource::new(SourceType::Spec, "a.md", text)).collection
    }

    #[test]
    fn splits_ready_and_blocked() {
        let text = "- [x] Schema\n- [ ] API [depends: 1]\n- [ ] UI [depends: 2]\n";
        let out = render_deps(&collection(text));
        assert_eq!(out, "Ready (1):\n  2  API\n\nBlocked (1):\n  3  UI  (waiting on 2)\n");
    }

    #[test]
    fn everything_done() {
        assert_eq!(render_deps(&collection("- [x] A\n- [x] B\n")), "All 2 task(s) completed.\n");
    }

    #[test]
    fn missing_report_is_ok() {
        let ctx = ServiceContext::fixed(MemoryFileSystem::default(), CannedGitRepo::default());
        assert!(run(&ctx, Path::new("none.json")).is_ok());
    }
}
