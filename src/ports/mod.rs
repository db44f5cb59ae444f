//! Port traits defining external boundaries.
//!
//! Each trait is a boundary between the normalizer and the outside world
//! (time, filesystem, git). Implementations live in `src/adapters/`.

pub mod clock;
pub mod filesystem;
pub mod git;

pub use clock::Clock;
pub use filesystem::FileSystem;
pub use git::GitRepo;

/// Error type returned by port operations.
pub type PortError = Box<dyn std::error::Error + Send + Sync>;
