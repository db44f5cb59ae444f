//! Git repository port for reading what a branch contributes.

use super::PortError;
use crate::source::Commit;

/// Provides read access to a git repository.
pub trait GitRepo: Send + Sync {
    /// Commits reachable from `branch` but not from `base`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if either ref is unknown or git fails.
    fn commits(&self, base: &str, branch: &str) -> Result<Vec<Commit>, PortError>;

    /// Unified diff of `branch` against its merge base with `base`.
    ///
    /// # Errors
    ///
    /// Returns an error if the diff cannot be computed.
    fn diff(&self, base: &str, branch: &str) -> Result<String, PortError>;

    /// Contents of `path` as of `branch`, or `None` if the file is absent there.
    ///
    /// # Errors
    ///
    /// Returns an error if git cannot be run.
    fn show_file(&self, branch: &str, path: &str) -> Result<Option<String>, PortError>;
}
