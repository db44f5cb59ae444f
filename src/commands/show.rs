//! `taskparse show` command.

use std::fmt::Write as _;
use std::path::Path;

use super::load_report;
use crate::context::ServiceContext;
use crate::report::TaskReport;
use crate::task::Task;

/// Execute the `show` command.
///
/// When `id` is provided, prints that task's full record.
/// When no `id` is given, lists all task ids with their titles.
///
/// # Errors
///
/// Returns an error string if the report cannot be read or the id is unknown.
pub fn run(ctx: &ServiceContext, path: &Path, id: Option<&str>) -> Result<(), String> {
    let Some(report) = load_report(ctx, path)? else {
        return match id {
            Some(id) => Err(format!("Task {id} not found: no report at {}", path.display())),
            None => Ok(()),
        };
    };

    match id {
        Some(id) => {
            let task = report
                .tasks
                .iter()
                .find(|t| t.id == id)
                .ok_or_else(|| format!("Task {id} not found in {}", path.display()))?;
            print!("{}", render_task(task));
        }
        None => print!("{}", render_listing(&report)),
    }
    Ok(())
}

fn render_listing(report: &TaskReport) -> String {
    if report.tasks.is_empty() {
        return "No tasks in report.\n".to_string();
    }
    let width = report.tasks.iter().map(|t| t.id.len()).max().unwrap_or(2).max(2);
    let mut out = String::from("Available tasks:\n");
    for task in &report.tasks {
        let _ = writeln!(out, "  {:<width$}  {}", task.id, task.title);
    }
    out.push_str("\nUse `taskparse show <ID>` to view details.\n");
    out
}

fn render_task(task: &Task) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Task: {}", task.id);
    let _ = writeln!(out, "Title: {}", task.title);
    let _ = writeln!(out, "Status: {}", task.status);
    if let Some(parent) = &task.parent_id {
        let _ = writeln!(out, "Parent: {parent}");
    }
    if !task.children.is_empty() {
        let _ = writeln!(out, "Children: {}", task.children.join(", "));
    }
    if !task.depends_on.is_empty() {
        let _ = writeln!(out, "Depends on: {}", task.depends_on.join(", "));
    }
    if !task.blocked_by.is_empty() {
        let _ = writeln!(out, "Blocked by: {}", task.blocked_by.join(", "));
    }
    let _ = writeln!(out, "Source: {}", task.source_location);
    if let Some(description) = &task.description {
        let _ = writeln!(out, "\nDescription:\n  {description}");
    }
    if !task.metadata.is_empty() {
        out.push_str("\nMetadata:\n");
        for (key, value) in &task.metadata {
            let _ = writeln!(out, "  {key}: {}", value.display());
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
    use crate::store::ReportStore;

    fn stored_context() -> ServiceContext {
        let ctx = ServiceContext::fixed(MemoryFileSystem::default(), CannedGitRepo::default());
        let source = RawSource::new(
            SourceType::Spec,
            "plan.md",
            "- [ ] Auth [priority: high]\n  Sessions and login.\n  - [ ] Login [depends: 2]\n- [ ] Schema\n",
        );
        let report = TaskReport::new(&source, Normalizer::default().normalize(&source), ctx.clock.now());
        ReportStore::new(&ctx, Path::new("r.json")).save(&report).unwrap();
        ctx
    }

    #[test]
    fn shows_known_task() {
        let ctx = stored_context();
        assert!(run(&ctx, Path::new("r.json"), Some("1.1")).is_ok());
        assert!(run(&ctx, Path::new("r.json"), None).is_ok());
    }

    #[test]
    fn unknown_id_is_an_error() {
        let ctx = stored_context();
        let err = run(&ctx, Path::new("r.json"), Some("9")).unwrap_err();
        assert!(err.contains("Task 9 not found"));
    }

    #[test]
    fn missing_report_with_id_is_an_error() {
        let ctx = ServiceContext::fixed(MemoryFileSystem::default(), CannedGitRepo::default());
        assert!(run(&ctx, Path::new("none.json"), Some("1")).is_err());
        assert!(run(&ctx, Path::new("none.json"), None).is_ok());
    }

    #[test]
    fn task_detail_lists_relations() {
        let ctx = stored_context();
        let report = ReportStore::new(&ctx, Path::new("r.json")).load().unwrap();

        let auth = render_task(&report.tasks[0]);
        assert!(auth.contains("Children: 1.1"));
        assert!(auth.contains("Description:\n  Sessions and login."));
        assert!(auth.contains("priority: high"));
        assert!(auth.contains("Source: plan.md:1"));

        let login = render_task(&report.tasks[1]);
        assert!(login.contains("Parent: 1"));
        assert!(login.contains("Depends on: 2"));
        assert!(login.contains("Blocked by: 2"));
    }

    #[test]
    fn listing_aligns_ids() {
        let ctx = stored_context();
        let report = ReportStore::new(&ctx, Path::new("r.json")).load().unwrap();
        let listing = render_listing(&report);
        assert!(listing.contains("  1.1  Login\n"));
        assert!(listing.contains("  2    Schema\n"));
    }
}
