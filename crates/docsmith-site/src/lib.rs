//! Source discovery, document loading and navigation for docsmith.
//!
//! A [`Site`] is the read-only input of a build: every discovered source with
//! its text, title and destination, plus the [`SitePathMap`] shared by all
//! render calls.
//!
//! [`SitePathMap`]: docsmith_renderer::SitePathMap

use std::path::PathBuf;

use docsmith_renderer::PathMapError;

mod discovery;
mod navigation;
mod site;
mod title;

pub use discovery::{DEFAULT_EXCLUDE, DEFAULT_INCLUDE, SourceSet, discover_sources};
pub use navigation::{NavChip, NavGroup, NavLink, NavSection, Navigation};
pub use site::{Document, DocumentKind, Site};
pub use title::extract_title;

/// Error loading a site.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    /// Discovery found nothing to build.
    #[error("No markdown sources found")]
    NoSources,
    /// An include pattern is not a valid glob.
    #[error("Invalid source pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
    /// A source could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    PathMap(#[from] PathMapError),
}
