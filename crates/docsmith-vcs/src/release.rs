//! Per-page release status.

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::history::HistoryProvider;
use crate::record::{CommitRecord, Release};

/// How a page relates to the most recent release.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageStatus {
    /// The page was touched by the last release commit.
    UpdatedInLastRelease,
    /// The page has not changed for this many releases.
    NotUpdatedFor(usize),
    /// The page's last change is not older than any release.
    ChangedAfterLastRelease,
    /// No release history available.
    Unknown,
}

impl fmt::Display for PageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UpdatedInLastRelease => f.write_str("Updated in last release"),
            Self::NotUpdatedFor(n) => write!(f, "Not updated for {n} release(s)"),
            Self::ChangedAfterLastRelease => f.write_str("Changed after last release"),
            Self::Unknown => f.write_str("Unknown"),
        }
    }
}

/// Release label, tooltip and status for one page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReleaseInfo {
    /// Short pill text, e.g. `Release 20240105.001`.
    pub label: String,
    /// Newline-separated details.
    pub tooltip: String,
    pub status: PageStatus,
}

impl ReleaseInfo {
    /// Info shown when there is no release history.
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            label: "Release N/A".to_owned(),
            tooltip: "Last release info unavailable.".to_owned(),
            status: PageStatus::Unknown,
        }
    }
}

/// Release history gathered once per build.
#[derive(Clone, Debug, Default)]
pub struct ReleaseContext {
    /// Releases, newest first.
    releases: Vec<Release>,
    last_release_files: HashSet<String>,
    source_changes: HashMap<String, CommitRecord>,
}

impl ReleaseContext {
    /// Query `history` for releases and the last change of every source.
    pub fn collect<'a, I>(history: &dyn HistoryProvider, sources: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let releases: Vec<Release> = history
            .release_commits()
            .into_iter()
            .filter_map(Release::from_commit)
            .collect();

        let last_release_files = releases
            .first()
            .map(|last| history.files_changed_in(&last.commit.hash))
            .unwrap_or_default()
            .into_iter()
            .collect();

        let source_changes = sources
            .into_iter()
            .filter_map(|source| {
                history
                    .last_change(source)
                    .map(|commit| (source.to_owned(), commit))
            })
            .collect();

        tracing::debug!(releases = releases.len(), "Collected release history");

        Self {
            releases,
            last_release_files,
            source_changes,
        }
    }

    /// The most recent release, if any.
    #[must_use]
    pub fn last_release(&self) -> Option<&Release> {
        self.releases.first()
    }

    /// Release info for the page built from `source`.
    #[must_use]
    pub fn release_info(&self, source: &str) -> ReleaseInfo {
        let Some(last) = self.last_release() else {
            return ReleaseInfo::unavailable();
        };

        let page_change = self.source_changes.get(source);
        let stale = page_change.map_or(0, |change| {
            self.releases
                .iter()
                .filter(|release| release.commit.at > change.at)
                .count()
        });
        let changed_in_last = self.last_release_files.contains(source);

        let status = if changed_in_last {
            PageStatus::UpdatedInLastRelease
        } else if stale > 0 {
            PageStatus::NotUpdatedFor(stale)
        } else {
            PageStatus::ChangedAfterLastRelease
        };

        let tooltip = [
            format!("Last release: {}", last.tag),
            format!("Release timestamp: {}", last.commit.date),
            format!(
                "This page changed in last release: {}",
                if changed_in_last { "Yes" } else { "No" }
            ),
            format!(
                "Page last change: {}",
                page_change.map_or("Unknown", |c| c.date.as_str())
            ),
            format!("Releases since page changed: {stale}"),
        ]
        .join("\n");

        ReleaseInfo {
            label: format!("Release {}", last.tag),
            tooltip,
            status,
        }
    }
}
