//! Service context bundling all port trait objects.

use crate::adapters::live::clock::LiveClock;
use crate::adapters::live::filesystem::LiveFileSystem;
use crate::adapters::live::git::LiveGitRepo;
use crate::ports::clock::Clock;
use crate::ports::filesystem::FileSystem;
use crate::ports::git::GitRepo;

/// Bundles all port trait objects into a single context.
///
/// Each field provides access to one external boundary.
pub struct ServiceContext {
    /// Clock for stamping reports.
    pub clock: Box<dyn Clock>,
    /// Filesystem for sources, config and reports.
    pub fs: Box<dyn FileSystem>,
    /// Git repository for branch sources.
    pub git: Box<dyn GitRepo>,
}

impl ServiceContext {
    /// Creates a context from explicit adapters.
    #[must_use]
    pub fn new(clock: Box<dyn Clock>, fs: Box<dyn FileSystem>, git: Box<dyn GitRepo>) -> Self {
        Self { clock, fs, git }
    }

    /// Creates a live context: system clock, real disk, `git` in the working directory.
    #[must_use]
    pub fn live() -> Self {
        Self::new(Box::new(LiveClock), Box::new(LiveFileSystem), Box::new(LiveGitRepo::default()))
    }
}

#[cfg(test)]
impl ServiceContext {
    /// Context over in-memory files, a fixed clock and a canned repository.
    pub(crate) fn fixed(
        fs: crate::adapters::fixed::MemoryFileSystem,
        git: crate::adapters::fixed::CannedGitRepo,
    ) -> Self {
        Self::new(Box::new(crate::adapters::fixed::FixedClock::default()), Box::new(fs), Box::new(git))
    }
}
