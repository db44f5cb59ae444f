//! Report store: the single JSON document a parse run leaves behind.
//!
//! All I/O goes through `ctx.fs` so the store works with any filesystem adapter.

use std::path::{Path, PathBuf};

use crate::context::ServiceContext;
use crate::report::TaskReport;

/// Reads and writes the report document at one path.
pub struct ReportStore<'a> {
    ctx: &'a ServiceContext,
    path: PathBuf,
}

impl<'a> ReportStore<'a> {
    /// Creates a store for the document at `path`.
    #[must_use]
    pub fn new(ctx: &'a ServiceContext, path: &Path) -> Self {
        Self { ctx, path: path.to_path_buf() }
    }

    /// Location of the document.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `true` if a document exists.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.ctx.fs.exists(&self.path)
    }

    /// Writes the report as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    pub fn save(&self, report: &TaskReport) -> Result<(), String> {
        let json = report.to_json()?;
        self.ctx
            .fs
            .write(&self.path, &format!("{json}\n"))
            .map_err(|e| format!("Failed to write report {}: {e}", self.path.display()))?;
        tracing::info!(path = %self.path.display(), tasks = report.tasks.len(), "report written");
        Ok(())
    }

    /// Reads the report back.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(&self) -> Result<TaskReport, String> {
        let contents = self
            .ctx
            .fs
            .read_to_string(&self.path)
            .map_err(|e| format!("Failed to read report {}: {e}", self.path.display()))?;
        TaskReport::from_json(&contents).map_err(|e| format!("{e} ({})", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::fixed::{CannedGitRepo, MemoryFileSystem};
    use crate::normalize::Normalizer;
    use crate::source::{RawSource, SourceType};

    #[test]
    fn save_then_load() {
        let ctx = ServiceContext::fixed(MemoryFileSystem::default(), CannedGitRepo::default());
        let store = ReportStore::new(&ctx, Path::new("out/tasks.json"));
        assert!(!store.exists());

        let source = RawSource::new(SourceType::Spec, "a.md", "- [ ] One\n");
        let report =
            TaskReport::new(&source, Normalizer::default().normalize(&source), ctx.clock.now());
        store.save(&report).unwrap();

        assert!(store.exists());
        assert_eq!(store.load().unwrap(), report);
    }

    #[test]
    fn load_missing_or_corrupt() {
        let fs = MemoryFileSystem::with_files([("bad.json", "{ nope")]);
        let ctx = ServiceContext::fixed(fs, CannedGitRepo::default());
        assert!(ReportStore::new(&ctx, Path::new("missing.json")).load().is_err());
        let err = ReportStore::new(&ctx, Path::new("bad.json")).load().unwrap_err();
        assert!(err.contains("bad.json"));
    }
}
