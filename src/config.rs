//! Layered configuration.
//!
//! Defaults, then an optional YAML file (`TASKPARSE_CONFIG` or
//! `./taskparse.yaml`), then environment variables. Command-line flags are
//! applied last by the command handlers.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::normalize::DEFAULT_KEYWORDS;
use crate::ports::FileSystem;
use crate::report::Glyphs;

/// Config file read when `TASKPARSE_CONFIG` is unset.
pub const DEFAULT_CONFIG_FILE: &str = "taskparse.yaml";

/// Resolved settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Where the report document is written and read back.
    pub output: PathBuf,
    /// Base ref that branch sources are compared against.
    pub base_ref: String,
    /// Comment keywords that mark tasks in branch diffs.
    pub annotation_keywords: Vec<String>,
    /// Checklist files looked up on a branch, first match wins.
    pub spec_files: Vec<String>,
    /// Status glyphs for the table.
    pub glyphs: Glyphs,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output: PathBuf::from(".taskparse/tasks.json"),
            base_ref: "main".to_string(),
            annotation_keywords: DEFAULT_KEYWORDS.iter().map(|k| (*k).to_string()).collect(),
            spec_files: ["TASKS.md", "tasks.md", "docs/tasks.md"].iter().map(|f| (*f).to_string()).collect(),
            glyphs: Glyphs::default(),
        }
    }
}

impl Config {
    /// Loads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly named config file is missing, or any
    /// config file cannot be read or parsed.
    pub fn load(fs: &dyn FileSystem) -> Result<Self, String> {
        Self::load_with(fs, |key| std::env::var(key).ok())
    }

    /// Loads configuration, looking environment variables up through `env`.
    ///
    /// # Errors
    ///
    /// See [`Config::load`].
    pub fn load_with(fs: &dyn FileSystem, env: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let mut config = match env("TASKPARSE_CONFIG") {
            Some(path) => {
                let path = PathBuf::from(path);
                if !fs.exists(&path) {
                    return Err(format!("Config file {} does not exist", path.display()));
                }
                Self::from_file(fs, &path)?
            }
            None if fs.exists(Path::new(DEFAULT_CONFIG_FILE)) => {
                Self::from_file(fs, Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };

        if let Some(output) = env("TASKPARSE_OUTPUT").filter(|v| !v.is_empty()) {
            config.output = PathBuf::from(output);
        }
        if let Some(base) = env("TASKPARSE_BASE").filter(|v| !v.is_empty()) {
            config.base_ref = base;
        }
        Ok(config)
    }

    fn from_file(fs: &dyn FileSystem, path: &Path) -> Result<Self, String> {
        let contents = fs
            .read_to_string(path)
            .map_err(|e| format!("Failed to read config file {}: {e}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded config file");
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&contents)
            .map_err(|e| format!("Failed to parse config file {}: {e}", path.display()))
    }
}
