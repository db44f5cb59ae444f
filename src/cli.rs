//! CLI argument definitions.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::source::SourceType;

/// Top-level CLI parser for `taskparse`.
#[derive(Debug, Parser)]
#[command(name = "taskparse", version, about = "Normalize tasks from specs, PRs and branches")]
pub struct Cli {
    /// Raise log verbosity (-v info, -vv debug). `TASKPARSE_LOG` overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Parse a source into the task report and print it as a table.
    Parse(ParseArgs),
    /// Show one task from the stored report, or list all task ids.
    Show {
        /// Task id to display.
        id: Option<String>,
        /// Report to read instead of the configured output path.
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Print the stored report as a table.
    Status {
        /// Report to read instead of the configured output path.
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// List tasks that are ready to start and tasks that are blocked.
    Deps {
        /// Report to read instead of the configured output path.
        #[arg(long)]
        report: Option<PathBuf>,
    },
}

/// Arguments of `taskparse parse`.
#[derive(Debug, Args)]
pub struct ParseArgs {
    /// Shape of the source.
    #[arg(value_enum)]
    pub source_type: SourceType,

    /// File path (spec), PR number (pr) or branch name (branch).
    pub source_ref: String,

    /// Read raw text from this file instead; `-` reads stdin. Required for PRs.
    #[arg(long, short)]
    pub input: Option<PathBuf>,

    /// Base ref for branch sources.
    #[arg(long)]
    pub base: Option<String>,

    /// Where to write the JSON report.
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Do not write the JSON report.
    #[arg(long, conflicts_with = "output")]
    pub no_write: bool,

    /// Print the JSON report instead of the table.
    #[arg(long)]
    pub json: bool,

    /// Exit with failure when any parse, dependency or cycle error was found.
    #[arg(long)]
    pub strict: bool,
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use crate::source::SourceType;
    use clap::Parser;

    #[test]
    fn parses_parse_subcommand() {
        let cli = Cli::parse_from(["taskparse", "parse", "spec", "docs/plan.md", "--json"]);
        let Command::Parse(args) = cli.command else {
            panic!("expected parse command");
        };
        assert_eq!(args.source_type, SourceType::Spec);
        assert_eq!(args.source_ref, "docs/plan.md");
        assert!(args.json);
        assert!(!args.strict);
    }

    #[test]
    fn parses_pr_with_stdin_input() {
        let cli = Cli::parse_from(["taskparse", "-vv", "parse", "pr", "42", "--input", "-"]);
        assert_eq!(cli.verbose, 2);
        let Command::Parse(args) = cli.command else {
            panic!("expected parse command");
        };
        assert_eq!(args.input.as_deref(), Some(std::path::Path::new("-")));
    }

    #[test]
    fn rejects_unknown_source_type() {
        assert!(Cli::try_parse_from(["taskparse", "parse", "wiki", "x"]).is_err());
    }

    #[test]
    fn no_write_conflicts_with_output() {
        assert!(Cli::try_parse_from(["taskparse", "parse", "spec", "a.md", "--no-write", "-o", "x.json"])
            .is_err());
    }

    #[test]
    fn parses_show_with_id() {
        let cli = Cli::parse_from(["taskparse", "show", "1.2"]);
        assert!(matches!(cli.command, Command::Show { id: Some(ref id), .. } if id == "1.2"));
    }
}
