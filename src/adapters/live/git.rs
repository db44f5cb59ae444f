//! Live git adapter using `git` CLI commands.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use crate::ports::git::GitRepo;
use crate::ports::PortError;
use crate::source::Commit;

const FIELD_SEP: char = '\u{1f}';
const RECORD_SEP: char = '\u{1e}';

/// Live git adapter that shells out to the `git` CLI.
pub struct LiveGitRepo {
    dir: PathBuf,
}

impl Default for LiveGitRepo {
    /// Runs `git` in the current directory.
    fn default() -> Self {
        Self::in_dir(".")
    }
}

impl LiveGitRepo {
    /// Runs `git` inside `dir`.
    #[must_use]
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self { dir: dir.as_ref().to_path_buf() }
    }

    fn git(&self, args: &[&str]) -> Result<Output, PortError> {
        tracing::debug!(?args, dir = %self.dir.display(), "running git");
        Ok(Command::new("git").current_dir(&self.dir).args(args).output()?)
    }

    fn checked(&self, args: &[&str]) -> Result<String, PortError> {
        let output = self.git(args)?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(format!("git {} failed: {}", args.join(" "), stderr.trim()).into());
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl GitRepo for LiveGitRepo {
    fn commits(&self, base: &str, branch: &str) -> Result<Vec<Commit>, PortError> {
        let range = format!("{base}..{branch}");
        let stdout = self.checked(&["log", "--reverse", "--format=%H%x1f%s%x1f%b%x1e", &range])?;
        Ok(parse_log(&stdout))
    }

    fn diff(&self, base: &str, branch: &str) -> Result<String, PortError> {
        let range = format!("{base}...{branch}");
        self.checked(&["diff", "--no-color", "--no-ext-diff", &range])
    }

    fn show_file(&self, branch: &str, path: &str) -> Result<Option<String>, PortError> {
        let object = format!("{branch}:{path}");
        let output = self.git(&["show", &object])?;
        if output.status.success() {
            Ok(Some(String::from_utf8_lossy(&output.stdout).into_owned()))
        } else {
            Ok(None)
        }
    }
}

/// Parses `git log` output written with unit/record separators.
fn parse_log(stdout: &str) -> Vec<Commit> {
    stdout
        .split(RECORD_SEP)
        .filter_map(|record| {
            let record = record.trim_start_matches(['\n', '\r']);
            let mut fields = record.splitn(3, FIELD_SEP);
            let sha = fields.next()?.trim();
            if sha.is_empty() {
                return None;
            }
            let subject = fields.next().unwrap_or_default().trim().to_string();
            let body = fields.next().unwrap_or_default().trim().to_string();
            Some(Commit { sha: sha.to_string(), subject, body })
        })
        .collect()
}
