//! Source discovery by glob expansion.

use std::collections::BTreeSet;
use std::path::Path;

use glob::{MatchOptions, Pattern};

use crate::SiteError;

/// Default include patterns, relative to the repository root.
pub const DEFAULT_INCLUDE: &[&str] = &[
    "docs/**/*.md",
    "docs/**/*.mmd",
    "src/**/*.md",
    "tests/**/*.md",
    "requirements.md",
    "Readme.md",
];

/// Default excluded directories: generated output and scaffolding templates.
pub const DEFAULT_EXCLUDE: &[&str] = &["docs/site", "docs/utils/templates"];

/// Which repository files make up the site.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceSet {
    /// Glob patterns relative to the repository root.
    pub include: Vec<String>,
    /// Repository-relative directories whose contents are skipped.
    pub exclude: Vec<String>,
}

impl Default for SourceSet {
    fn default() -> Self {
        Self {
            include: DEFAULT_INCLUDE.iter().map(|s| (*s).to_owned()).collect(),
            exclude: DEFAULT_EXCLUDE.iter().map(|s| (*s).to_owned()).collect(),
        }
    }
}

impl SourceSet {
    /// Whether `source` lies under one of the excluded directories.
    #[must_use]
    pub fn is_excluded(&self, source: &str) -> bool {
        self.exclude.iter().any(|dir| {
            let dir = dir.trim_matches('/');
            source
                .strip_prefix(dir)
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
        })
    }
}

/// Expand `sources` under `repo_root`.
///
/// Returns repository-relative, forward-slash paths of regular files, sorted
/// and without duplicates. Unreadable directory entries are skipped.
pub fn discover_sources(repo_root: &Path, sources: &SourceSet) -> Result<Vec<String>, SiteError> {
    let options = MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: false,
    };
    let root = Pattern::escape(&repo_root.to_string_lossy());
    let mut found = BTreeSet::new();

    for pattern in &sources.include {
        let full = format!("{root}/{}", pattern.trim_start_matches('/'));
        let paths = glob::glob_with(&full, options).map_err(|source| SiteError::Pattern {
            pattern: pattern.clone(),
            source,
        })?;

        for entry in paths {
            let path = match entry {
                Ok(path) => path,
                Err(e) => {
                    tracing::debug!(error = %e, "Skipping unreadable path");
                    continue;
                }
            };
            if !path.is_file() {
                continue;
            }
            let Some(relative) = repo_relative(repo_root, &path) else {
                continue;
            };
            if sources.is_excluded(&relative) {
                continue;
            }
            found.insert(relative);
        }
    }

    tracing::debug!(count = found.len(), "Discovered sources");
    Ok(found.into_iter().collect())
}

fn repo_relative(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    (!parts.is_empty()).then(|| parts.join("/"))
}
