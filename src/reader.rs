//! Source reading: turns command arguments into a [`RawSource`].
//!
//! Spec files come from disk, PR bodies from a file or stdin, and branches
//! from a bundle file or the git repository.

use std::path::Path;

use crate::context::ServiceContext;
use crate::source::{BranchSource, RawSource, SourceType, SpecFile};

/// What to read.
#[derive(Debug, Clone, Copy)]
pub struct SourceRequest<'a> {
    /// Declared shape.
    pub source_type: SourceType,
    /// File path, PR number or branch name.
    pub source_ref: &'a str,
    /// Explicit input path; `-` reads stdin.
    pub input: Option<&'a Path>,
    /// Base ref for branch comparison.
    pub base: &'a str,
    /// Checklist files looked up on a branch.
    pub spec_files: &'a [String],
}

/// Reads the raw text for a request.
///
/// # Errors
///
/// Returns an error if the input cannot be read, a PR body is requested
/// without `--input`, or git fails.
pub fn read_source(ctx: &ServiceContext, request: &SourceRequest<'_>) -> Result<RawSource, String> {
    if let Some(input) = request.input {
        let text = read_input(ctx, input)?;
        return Ok(RawSource::new(request.source_type, request.source_ref, text));
    }

    match request.source_type {
        SourceType::Spec => {
            let path = Path::new(request.source_ref);
            let text = ctx
                .fs
                .read_to_string(path)
                .map_err(|e| format!("Failed to read spec file {}: {e}", path.display()))?;
            Ok(RawSource::new(SourceType::Spec, request.source_ref, text))
        }
        SourceType::Pr => Err(format!(
            "PR #{} body must be supplied with --input <FILE> or --input -",
            request.source_ref.trim_start_matches('#')
        )),
        SourceType::Branch => {
            let bundle = read_branch(ctx, request.source_ref, request.base, request.spec_files)?;
            Ok(RawSource::branch(request.source_ref, bundle))
        }
    }
}

fn read_input(ctx: &ServiceContext, input: &Path) -> Result<String, String> {
    if input.as_os_str() == "-" {
        return std::io::read_to_string(std::io::stdin())
            .map_err(|e| format!("Failed to read stdin: {e}"));
    }
    ctx.fs
        .read_to_string(input)
        .map_err(|e| format!("Failed to read input {}: {e}", input.display()))
}

/// Collects commits, diff and the first spec file present on `branch`.
///
/// # Errors
///
/// Returns an error if any git query fails.
pub fn read_branch(
    ctx: &ServiceContext,
    branch: &str,
    base: &str,
    spec_files: &[String],
) -> Result<BranchSource, String> {
    let commits = ctx
        .git
        .commits(base, branch)
        .map_err(|e| format!("Failed to list commits on {branch}: {e}"))?;
    let diff = ctx
        .git
        .diff(base, branch)
        .map_err(|e| format!("Failed to diff {branch} against {base}: {e}"))?;

    let mut spec = None;
    for path in spec_files {
        let found = ctx
            .git
            .show_file(branch, path)
            .map_err(|e| format!("Failed to read {path} on {branch}: {e}"))?;
        if let Some(contents) = found {
            spec = Some(SpecFile { path: path.clone(), contents });
            break;
        }
    }

    tracing::info!(
        branch,
        base,
        commits = commits.len(),
        spec = spec.as_ref().map(|s| s.path.as_str()),
        "read branch"
    );
    Ok(BranchSource { commits, diff, spec })
}
