//! Command dispatch and handlers.

pub mod deps;
pub mod parse;
pub mod show;
pub mod status;

use std::path::{Path, PathBuf};

use crate::cli::Command;
use crate::config::Config;
use crate::context::ServiceContext;
use crate::report::TaskReport;
use crate::store::ReportStore;

/// Dispatch a parsed command to its handler using live adapters.
///
/// # Errors
///
/// Returns an error string if configuration loading or the handler fails.
pub fn dispatch(command: &Command) -> Result<(), String> {
    let ctx = ServiceContext::live();
    let config = Config::load(&*ctx.fs)?;
    dispatch_with_context(command, &ctx, &config)
}

/// Dispatch a command with the given service context and configuration.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails.
pub fn dispatch_with_context(
    command: &Command,
    ctx: &ServiceContext,
    config: &Config,
) -> Result<(), String> {
    match command {
        Command::Parse(args) => parse::run(ctx, config, args).map(|_| ()),
        Command::Show { id, report } => {
            show::run(ctx, &report_path(config, report.as_deref()), id.as_deref())
        }
        Command::Status { report } => {
            status::run(ctx, config, &report_path(config, report.as_deref()))
        }
        Command::Deps { report } => deps::run(ctx, &report_path(config, report.as_deref())),
    }
}

fn report_path(config: &Config, explicit: Option<&Path>) -> PathBuf {
    explicit.map_or_else(|| config.output.clone(), Path::to_path_buf)
}

/// Loads the stored report, or prints a hint and returns `None` when there is none.
fn load_report(ctx: &ServiceContext, path: &Path) -> Result<Option<TaskReport>, String> {
    let store = ReportStore::new(ctx, path);
    if !store.exists() {
        println!("No report found at {}. Run `taskparse parse` first.", path.display());
        return Ok(None);
    }
    store.load().map(Some)
}
