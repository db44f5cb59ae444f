//! `taskparse status` command.

use std::path::Path;

use super::load_report;
use crate::config::Config;
use crate::context::ServiceContext;
use crate::report::{render_errors, render_table, TaskReport};

/// Execute the `status` command.
///
/// Reprints the stored report's table, summary line and problems.
///
/// # Errors
///
/// Returns an error string if the stored report cannot be read.
pub fn run(ctx: &ServiceContext, config: &Config, path: &Path) -> Result<(), String> {
    let Some(report) = load_report(ctx, path)? else {
        return Ok(());
    };
    print!("{}", render_status(&report, config));
    Ok(())
}

fn render_status(report: &TaskReport, config: &Config) -> String {
    format!(
        "Source: {} {} (parsed {})\n\n{}{}",
        report.source_type,
        report.source_ref,
        report.parsed_at.format("%Y-%m-%d %H:%M:%S UTC"),
        render_table(&report.collection(), &config.glyphs),
        render_errors(&report.errors),
    )
}
