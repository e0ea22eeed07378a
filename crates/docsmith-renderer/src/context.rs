//! Per-document render context.

use crate::paths::SitePathMap;

/// Everything the renderer needs to know about where a document lives.
///
/// Cheap to copy; every render call for one document shares the same context.
#[derive(Clone, Copy, Debug)]
pub struct RenderContext<'a> {
    pub(crate) source: &'a str,
    pub(crate) destination: &'a str,
    pub(crate) paths: &'a SitePathMap,
    pub(crate) site_prefix: Option<&'a str>,
    pub(crate) repo_root: Option<&'a str>,
}

impl<'a> RenderContext<'a> {
    /// Create a context for the document at `source` (repository-relative)
    /// that is written to `destination` (site-relative).
    #[must_use]
    pub fn new(source: &'a str, destination: &'a str, paths: &'a SitePathMap) -> Self {
        Self {
            source,
            destination,
            paths,
            site_prefix: None,
            repo_root: None,
        }
    }

    /// Set the repository-relative location of the site output directory
    /// (e.g. `docs/site`).
    ///
    /// Links to non-document repository files are only rewritten when this is
    /// known; they then point back into the source tree from the page's
    /// position inside the site.
    #[must_use]
    pub fn with_site_prefix(mut self, prefix: &'a str) -> Self {
        self.site_prefix = Some(prefix.trim_matches('/'));
        self
    }

    /// Set the absolute repository root, so absolute filesystem paths inside
    /// the repository can be resolved.
    #[must_use]
    pub fn with_repo_root(mut self, root: &'a str) -> Self {
        let root = root.trim_end_matches('/');
        self.repo_root = (!root.is_empty()).then_some(root);
        self
    }

    /// Repository-relative source path.
    #[must_use]
    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Site-relative destination path.
    #[must_use]
    pub fn destination(&self) -> &'a str {
        self.destination
    }

    /// The shared site path map.
    #[must_use]
    pub fn paths(&self) -> &'a SitePathMap {
        self.paths
    }
}
