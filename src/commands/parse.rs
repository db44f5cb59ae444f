//! `taskparse parse` command.

use crate::cli::ParseArgs;
use crate::config::Config;
use crate::context::ServiceContext;
use crate::normalize::Normalizer;
use crate::reader::{read_source, SourceRequest};
use crate::report::{render_errors, render_table, TaskReport};
use crate::store::ReportStore;

/// Execute the `parse` command.
///
/// Reads the source, normalizes it, prints the table (or JSON) and writes the
/// report document unless `--no-write` is given.
///
/// # Errors
///
/// Returns an error string if the source cannot be read, the report cannot be
/// written, or `--strict` is set and normalization reported problems.
pub fn run(ctx: &ServiceContext, config: &Config, args: &ParseArgs) -> Result<TaskReport, String> {
    let base = args.base.as_deref().unwrap_or(&config.base_ref);
    let request = SourceRequest {
        source_type: args.source_type,
        source_ref: &args.source_ref,
        input: args.input.as_deref(),
        base,
        spec_files: &config.spec_files,
    };
    let raw = read_source(ctx, &request)?;

    let normalized = Normalizer::new(&config.annotation_keywords).normalize(&raw);
    let report = TaskReport::new(&raw, normalized, ctx.clock.now());

    if args.json {
        println!("{}", report.to_json()?);
    } else {
        print!("{}", render_table(&report.collection(), &config.glyphs));
        eprint!("{}", render_errors(&report.errors));
    }

    if !args.no_write {
        let path = args.output.as_deref().unwrap_or(&config.output);
        let store = ReportStore::new(ctx, path);
        store.save(&report)?;
        if !args.json {
            println!("Report written to {}", store.path().display());
        }
    }

    if args.strict && !report.errors.is_empty() {
        return Err(format!("{} problem(s) found in {} {}", report.errors.len(), raw.source_type, raw.source_ref));
    }
    Ok(report)
}
