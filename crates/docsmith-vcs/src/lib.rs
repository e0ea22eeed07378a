//! Git release history and page staleness for docsmith.
//!
//! Releases are commits whose subject starts with `Release YYYYMMDD.NNN`. For
//! every page the build reports whether it changed in the last release and how
//! many releases have passed since it last changed.

mod history;
mod record;
mod release;

pub use history::{GitHistory, HistoryProvider, NoHistory};
pub use record::{CommitRecord, Release};
pub use release::{PageStatus, ReleaseContext, ReleaseInfo};

/// Error running a history query.
///
/// Never escapes a [`HistoryProvider`]; failures are logged and read as empty
/// history.
#[derive(Debug, thiserror::Error)]
pub enum VcsError {
    #[error("Failed to run git: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("git {command} failed: {stderr}")]
    Failed { command: String, stderr: String },
}
