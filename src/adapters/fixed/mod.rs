//! In-memory adapters for unit tests.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeZone, Utc};

use crate::ports::{Clock, FileSystem, GitRepo, PortError};
use crate::source::Commit;

/// Clock frozen at one instant.
pub struct FixedClock(pub DateTime<Utc>);

impl Default for FixedClock {
    fn default() -> Self {
        Self(Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Filesystem held in a map.
#[derive(Default)]
pub struct MemoryFileSystem {
    files: Mutex<HashMap<PathBuf, String>>,
}

impl MemoryFileSystem {
    /// Creates a filesystem containing the given files.
    pub fn with_files<'a>(files: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let fs = Self::default();
        for (path, contents) in files {
            fs.files.lock().unwrap().insert(PathBuf::from(path), contents.to_string());
        }
        fs
    }
}

impl FileSystem for MemoryFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String, PortError> {
        self.files
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| format!("File not found: {}", path.display()).into())
    }

    fn write(&self, path: &Path, contents: &str) -> Result<(), PortError> {
        self.files.lock().unwrap().insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.lock().unwrap().contains_key(path)
    }
}

/// Git repository answering from canned data for any refs.
#[derive(Default)]
pub struct CannedGitRepo {
    /// Returned by `commits`.
    pub commits: Vec<Commit>,
    /// Returned by `diff`.
    pub diff: String,
    /// Files visible on the branch.
    pub files: HashMap<String, String>,
    /// `(base, branch)` pairs passed to `commits` and `diff`, in call order.
    pub queried: Arc<Mutex<Vec<(String, String)>>>,
}

impl CannedGitRepo {
    fn record(&self, base: &str, branch: &str) {
        self.queried.lock().unwrap().push((base.to_string(), branch.to_string()));
    }
}

impl GitRepo for CannedGitRepo {
    fn commits(&self, base: &str, branch: &str) -> Result<Vec<Commit>, PortError> {
        self.record(base, branch);
        Ok(self.commits.clone())
    }

    fn diff(&self, base: &str, branch: &str) -> Result<String, PortError> {
        self.record(base, branch);
        Ok(self.diff.clone())
    }

    fn show_file(&self, _branch: &str, path: &str) -> Result<Option<String>, PortError> {
        Ok(self.files.get(path).cloned())
    }
}
