//! History providers.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::VcsError;
use crate::record::{CommitRecord, LOG_FORMAT};

/// Source of commit history for release metadata.
///
/// Implementations never fail: missing history is reported as empty data so a
/// build outside a repository still succeeds.
pub trait HistoryProvider {
    /// Commits whose subject starts with `Release`, newest first.
    fn release_commits(&self) -> Vec<CommitRecord>;

    /// Repository-relative paths touched by commit `hash`.
    fn files_changed_in(&self, hash: &str) -> Vec<String>;

    /// Most recent commit touching `path`.
    fn last_change(&self, path: &str) -> Option<CommitRecord>;
}

/// History read from the `git` command line.
#[derive(Clone, Debug)]
pub struct GitHistory {
    repo_root: PathBuf,
}

impl GitHistory {
    /// Query the repository containing `repo_root`.
    #[must_use]
    pub fn new(repo_root: impl Into<PathBuf>) -> Self {
        Self {
            repo_root: repo_root.into(),
        }
    }

    #[must_use]
    pub fn repo_root(&self) -> &Path {
        &self.repo_root
    }

    /// Run git and return trimmed stdout.
    fn run(&self, args: &[&str]) -> Result<String, VcsError> {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.repo_root)
            .output()
            .map_err(VcsError::Spawn)?;
        if !output.status.success() {
            return Err(VcsError::Failed {
                command: args.first().copied().unwrap_or_default().to_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_owned())
    }

    /// Like [`run`](Self::run), logging failures and returning empty output.
    fn run_or_empty(&self, args: &[&str]) -> String {
        self.run(args).unwrap_or_else(|e| {
            tracing::debug!(error = %e, "Git query failed, treating history as empty");
            String::new()
        })
    }
}

impl HistoryProvider for GitHistory {
    fn release_commits(&self) -> Vec<CommitRecord> {
        self.run_or_empty(&["log", "--grep", "^Release", "--date=iso-strict", LOG_FORMAT])
            .lines()
            .filter_map(CommitRecord::parse)
            .collect()
    }

    fn files_changed_in(&self, hash: &str) -> Vec<String> {
        self.run_or_empty(&["diff-tree", "--no-commit-id", "--name-only", "-r", hash])
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_owned)
            .collect()
    }

    fn last_change(&self, path: &str) -> Option<CommitRecord> {
        let output =
            self.run_or_empty(&["log", "-1", "--date=iso-strict", LOG_FORMAT, "--", path]);
        CommitRecord::parse(&output)
    }
}

/// Provider for builds with history disabled.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoHistory;

impl HistoryProvider for NoHistory {
    fn release_commits(&self) -> Vec<CommitRecord> {
        Vec::new()
    }

    fn files_changed_in(&self, _hash: &str) -> Vec<String> {
        Vec::new()
    }

    fn last_change(&self, _path: &str) -> Option<CommitRecord> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_history_outside_repository_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let history = GitHistory::new(dir.path());
        assert!(history.release_commits().is_empty());
        assert!(history.files_changed_in("HEAD").is_empty());
        assert!(history.last_change("docs/README.md").is_none());
    }

    #[test]
    fn test_no_history() {
        assert!(NoHistory.release_commits().is_empty());
        assert!(NoHistory.last_change("x").is_none());
    }
}
