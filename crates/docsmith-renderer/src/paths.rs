//! Destination mapping and the site path map.
//!
//! Source paths are repository-relative (`docs/api/index.md`), destination
//! paths are relative to the site output directory (`api/index.html`). Both
//! use forward slashes.

use std::collections::{BTreeMap, HashMap};

use crate::util::{extension, file_name, join_path, parent_dir, with_extension};

/// Where each kind of source document lands in the generated site.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PathLayout {
    /// Top-level directory holding the documentation proper (e.g. "docs").
    pub docs_root: String,
    /// Source path of the document that becomes the site's `index.html`.
    pub root_readme: String,
    /// Output directory for documents that live outside the docs root.
    pub reference_prefix: String,
    /// Extension (without dot) of standalone diagram-source files.
    pub diagram_extension: String,
}

impl Default for PathLayout {
    fn default() -> Self {
        Self {
            docs_root: "docs".to_owned(),
            root_readme: "docs/README.md".to_owned(),
            reference_prefix: "reference".to_owned(),
            diagram_extension: "mmd".to_owned(),
        }
    }
}

impl PathLayout {
    /// Whether `source` is a standalone diagram-source file.
    #[must_use]
    pub fn is_diagram(&self, source: &str) -> bool {
        extension(source).is_some_and(|ext| ext.eq_ignore_ascii_case(&self.diagram_extension))
    }

    /// Map a repository-relative source path to its site-relative output path.
    ///
    /// - the root readme becomes `index.html`
    /// - diagram sources drop the docs-root segment (or go under the reference
    ///   prefix) and get an `.html` extension
    /// - documents under the docs root drop that segment, `.md` becomes
    ///   `.html`, and a `README` file name becomes `index.html`
    /// - everything else mirrors its path under the reference prefix
    ///
    /// # Examples
    ///
    /// ```
    /// use docsmith_renderer::PathLayout;
    ///
    /// let layout = PathLayout::default();
    /// assert_eq!(layout.destination_for("docs/README.md"), "index.html");
    /// assert_eq!(layout.destination_for("docs/api/Readme.md"), "api/index.html");
    /// assert_eq!(layout.destination_for("src/core/notes.md"), "reference/src/core/notes.html");
    /// ```
    #[must_use]
    pub fn destination_for(&self, source: &str) -> String {
        if source == self.root_readme {
            return "index.html".to_owned();
        }

        let under_docs = source
            .strip_prefix(self.docs_root.as_str())
            .and_then(|rest| rest.strip_prefix('/'))
            .filter(|rest| !rest.is_empty());

        if self.is_diagram(source) {
            return match under_docs {
                Some(rest) => with_extension(rest, "html"),
                None => join_path(&self.reference_prefix, &with_extension(source, "html")),
            };
        }

        if let Some(rest) = under_docs {
            let relative = with_extension(rest, "html");
            if file_name(&relative).eq_ignore_ascii_case("readme.html") {
                return join_path(parent_dir(&relative), "index.html");
            }
            return relative;
        }

        join_path(&self.reference_prefix, &with_extension(source, "html"))
    }
}

/// Error building a [`SitePathMap`].
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum PathMapError {
    /// Two sources would be written to the same output file.
    #[error("{first} and {second} both map to {destination}")]
    DuplicateDestination {
        /// The contested output path.
        destination: String,
        /// Source that claimed the destination first.
        first: String,
        /// Source that collided with it.
        second: String,
    },
}

/// Immutable mapping from every known source document to its output path.
///
/// Built once before rendering and shared read-only by every render call.
#[derive(Clone, Debug)]
pub struct SitePathMap {
    layout: PathLayout,
    entries: BTreeMap<String, String>,
}

impl SitePathMap {
    /// Build the map for `sources` using `layout`.
    ///
    /// # Errors
    ///
    /// Returns [`PathMapError::DuplicateDestination`] if two distinct sources
    /// map to the same output file.
    pub fn build<I, S>(layout: PathLayout, sources: I) -> Result<Self, PathMapError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut entries = BTreeMap::new();
        let mut claimed: HashMap<String, String> = HashMap::new();

        for source in sources {
            let source = source.into();
            if entries.contains_key(&source) {
                continue;
            }
            let destination = layout.destination_for(&source);
            if let Some(first) = claimed.get(&destination) {
                return Err(PathMapError::DuplicateDestination {
                    destination,
                    first: first.clone(),
                    second: source,
                });
            }
            claimed.insert(destination.clone(), source.clone());
            entries.insert(source, destination);
        }

        Ok(Self { layout, entries })
    }

    /// Layout used to compute every destination.
    #[must_use]
    pub fn layout(&self) -> &PathLayout {
        &self.layout
    }

    /// Destination of a known source.
    #[must_use]
    pub fn destination(&self, source: &str) -> Option<&str> {
        self.entries.get(source).map(String::as_str)
    }

    /// Where `source` would land if it were part of the build.
    #[must_use]
    pub fn guess_destination(&self, source: &str) -> String {
        self.layout.destination_for(source)
    }

    /// Whether `source` is part of the build.
    #[must_use]
    pub fn contains(&self, source: &str) -> bool {
        self.entries.contains_key(source)
    }

    /// Iterate `(source, destination)` pairs in source order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(s, d)| (s.as_str(), d.as_str()))
    }

    /// Number of documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map has no documents.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn destination(source: &str) -> String {
        PathLayout::default().destination_for(source)
    }

    #[test]
    fn test_root_readme_is_index() {
        assert_eq!(destination("docs/README.md"), "index.html");
    }

    #[test]
    fn test_docs_pages_drop_root_segment() {
        assert_eq!(destination("docs/guide.md"), "guide.html");
        assert_eq!(destination("docs/api/endpoints.md"), "api/endpoints.html");
    }

    #[test]
    fn test_nested_readme_becomes_index() {
        assert_eq!(destination("docs/frontend/README.md"), "frontend/index.html");
        assert_eq!(destination("docs/tests/readme.md"), "tests/index.html");
    }

    #[test]
    fn test_diagram_sources() {
        assert_eq!(destination("docs/diagrams/flow.mmd"), "diagrams/flow.html");
        assert_eq!(destination("src/arch.mmd"), "reference/src/arch.html");
    }

    #[test]
    fn test_outside_docs_goes_to_reference() {
        assert_eq!(destination("requirements.md"), "reference/requirements.html");
        assert_eq!(destination("Readme.md"), "reference/Readme.html");
        assert_eq!(destination("src/api/README.md"), "reference/src/api/README.html");
    }

    #[test]
    fn test_docs_prefix_must_be_a_whole_segment() {
        assert_eq!(destination("docsearch/a.md"), "reference/docsearch/a.html");
    }

    #[test]
    fn test_custom_layout() {
        let layout = PathLayout {
            docs_root: "manual".to_owned(),
            root_readme: "manual/index.md".to_owned(),
            reference_prefix: "ref".to_owned(),
            diagram_extension: "mermaid".to_owned(),
        };
        assert_eq!(layout.destination_for("manual/index.md"), "index.html");
        assert_eq!(layout.destination_for("manual/a/b.mermaid"), "a/b.html");
        assert_eq!(layout.destination_for("notes.md"), "ref/notes.html");
    }

    #[test]
    fn test_build_map() {
        let map = SitePathMap::build(
            PathLayout::default(),
            ["docs/README.md", "docs/guide.md", "requirements.md"],
        )
        .unwrap();
        assert_eq!(map.len(), 3);
        assert_eq!(map.destination("docs/guide.md"), Some("guide.html"));
        assert_eq!(map.destination("docs/missing.md"), None);
        assert_eq!(map.guess_destination("docs/missing.md"), "missing.html");
    }

    #[test]
    fn test_build_map_rejects_duplicate_destinations() {
        let err = SitePathMap::build(
            PathLayout::default(),
            ["docs/README.md", "docs/readme.md"],
        )
        .unwrap_err();
        assert_eq!(
            err,
            PathMapError::DuplicateDestination {
                destination: "index.html".to_owned(),
                first: "docs/README.md".to_owned(),
                second: "docs/readme.md".to_owned(),
            }
        );
    }

    #[test]
    fn test_build_map_ignores_repeated_sources() {
        let map =
            SitePathMap::build(PathLayout::default(), ["docs/a.md", "docs/a.md"]).unwrap();
        assert_eq!(map.len(), 1);
    }
}
