//! Loaded documents and the site path map.

use std::fs;
use std::path::{Path, PathBuf};

use docsmith_renderer::{PathLayout, SitePathMap};

use crate::SiteError;
use crate::discovery::{SourceSet, discover_sources};
use crate::title::extract_title;

/// How a document is turned into a page body.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DocumentKind {
    /// Markdown rendered block by block, with a table of contents.
    Markdown,
    /// A standalone diagram source shown as a rendered diagram.
    Diagram,
}

/// A source document, read once per run.
#[derive(Clone, Debug)]
pub struct Document {
    /// Repository-relative source path.
    pub source: String,
    /// Site-relative output path.
    pub destination: String,
    pub kind: DocumentKind,
    /// Raw file contents.
    pub text: String,
    pub title: String,
}

/// Every document of one build, with the shared path map.
#[derive(Debug)]
pub struct Site {
    root: PathBuf,
    documents: Vec<Document>,
    paths: SitePathMap,
}

impl Site {
    /// Discover and read all sources under `root`.
    ///
    /// Fails with [`SiteError::NoSources`] when nothing matches, and on the
    /// first unreadable source.
    pub fn load(root: &Path, sources: &SourceSet, layout: PathLayout) -> Result<Self, SiteError> {
        let found = discover_sources(root, sources)?;
        let mut files = Vec::with_capacity(found.len());
        for source in found {
            let path = root.join(&source);
            let text = fs::read_to_string(&path).map_err(|e| SiteError::Io { path, source: e })?;
            files.push((source, text));
        }
        Self::from_sources(root, layout, files)
    }

    /// Build a site from in-memory `(source, text)` pairs.
    pub fn from_sources<I>(root: &Path, layout: PathLayout, files: I) -> Result<Self, SiteError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut files: Vec<(String, String)> = files.into_iter().collect();
        if files.is_empty() {
            return Err(SiteError::NoSources);
        }
        files.sort_by(|a, b| a.0.cmp(&b.0));
        files.dedup_by(|a, b| a.0 == b.0);

        let paths = SitePathMap::build(layout, files.iter().map(|(source, _)| source.clone()))?;

        let documents = files
            .into_iter()
            .map(|(source, text)| {
                let is_diagram = paths.layout().is_diagram(&source);
                let destination = paths.guess_destination(&source);
                let title = extract_title(&source, &text, is_diagram);
                Document {
                    kind: if is_diagram {
                        DocumentKind::Diagram
                    } else {
                        DocumentKind::Markdown
                    },
                    source,
                    destination,
                    text,
                    title,
                }
            })
            .collect();

        Ok(Self {
            root: root.to_path_buf(),
            documents,
            paths,
        })
    }

    /// Repository root the sources were read from.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Documents in source order.
    #[must_use]
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    #[must_use]
    pub fn paths(&self) -> &SitePathMap {
        &self.paths
    }

    /// Look up a document by source path.
    #[must_use]
    pub fn get(&self, source: &str) -> Option<&Document> {
        self.documents
            .binary_search_by(|doc| doc.source.as_str().cmp(source))
            .ok()
            .map(|i| &self.documents[i])
    }

    /// Title of `source`, if it is part of the site.
    #[must_use]
    pub fn title(&self, source: &str) -> Option<&str> {
        self.get(source).map(|doc| doc.title.as_str())
    }
}
