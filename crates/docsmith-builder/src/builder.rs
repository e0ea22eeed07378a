//! Static site builder.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use docsmith_renderer::{
    RenderContext, TocEntry, clean_path, extract_toc, relative_path, render_diagram_source,
    render_markdown,
};
use docsmith_site::{Document, DocumentKind, Navigation, Site};
use docsmith_vcs::{HistoryProvider, NoHistory, ReleaseContext};

use crate::template::{PageData, render_page};

/// Configuration for static site building.
#[derive(Clone, Debug)]
pub struct BuildConfig {
    /// Site name shown in the top bar and page titles.
    pub site_name: String,
    /// Repository-relative candidates for the footer's generator link.
    ///
    /// The first one that exists wins; when none exists the last is used.
    pub generator_links: Vec<String>,
    /// Remove the output directory before writing.
    pub clean: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            site_name: "Project Docs".to_owned(),
            generator_links: Vec::new(),
            clean: false,
        }
    }
}

/// Error returned by the static site builder.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Outcome of a successful build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    /// Number of pages written.
    pub pages: usize,
    pub output_dir: PathBuf,
}

impl BuildReport {
    /// Entry page of the generated site.
    #[must_use]
    pub fn index(&self) -> PathBuf {
        self.output_dir.join("index.html")
    }
}

/// Builds a static documentation site from a loaded [`Site`].
pub struct StaticSiteBuilder<'a> {
    site: &'a Site,
    config: BuildConfig,
    history: Box<dyn HistoryProvider + 'a>,
}

impl<'a> StaticSiteBuilder<'a> {
    /// Create a builder that renders every document of `site`.
    ///
    /// Release metadata is disabled until [`with_history`](Self::with_history)
    /// supplies a provider.
    #[must_use]
    pub fn new(site: &'a Site, config: BuildConfig) -> Self {
        Self {
            site,
            config,
            history: Box::new(NoHistory),
        }
    }

    /// Read release metadata from `history`.
    #[must_use]
    pub fn with_history(mut self, history: impl HistoryProvider + 'a) -> Self {
        self.history = Box::new(history);
        self
    }

    /// Render every page into `output_dir`.
    ///
    /// Pages are written to `<output_dir>/<destination>`, creating parent
    /// directories as needed.
    pub fn build(&self, output_dir: &Path) -> Result<BuildReport, BuildError> {
        if self.config.clean && output_dir.exists() {
            tracing::info!(path = %output_dir.display(), "Cleaning output directory");
            fs::remove_dir_all(output_dir).map_err(|e| io_error(output_dir, e))?;
        }
        fs::create_dir_all(output_dir).map_err(|e| io_error(output_dir, e))?;

        let root = self.site.root();
        let prefix = site_prefix(root, output_dir);
        if prefix.is_none() {
            tracing::warn!(
                path = %output_dir.display(),
                "Output directory is outside the repository, source links will be absolute"
            );
        }
        let repo_root = root.to_str().filter(|_| root.is_absolute());
        let generator = self.generator_link();

        let release = ReleaseContext::collect(
            self.history.as_ref(),
            self.site.documents().iter().map(|doc| doc.source.as_str()),
        );
        let navigation = Navigation::new(self.site);
        let generated_at = Utc::now();

        let shared = Shared {
            site_prefix: prefix.as_deref(),
            repo_root,
            generator: generator.as_deref(),
        };

        for doc in self.site.documents() {
            let page = self.page(doc, &shared, &navigation, &release, generated_at);
            let path = output_dir.join(&doc.destination);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
            }
            fs::write(&path, render_page(&page)).map_err(|e| io_error(&path, e))?;
            tracing::debug!(source = %doc.source, destination = %doc.destination, "Wrote page");
        }

        let report = BuildReport {
            pages: self.site.documents().len(),
            output_dir: output_dir.to_path_buf(),
        };
        tracing::info!(pages = report.pages, "Site built");
        Ok(report)
    }

    fn page(
        &self,
        doc: &Document,
        shared: &Shared<'_>,
        navigation: &Navigation,
        release: &ReleaseContext,
        generated_at: chrono::DateTime<Utc>,
    ) -> PageData {
        let (html_content, toc) = self.render_body(doc, shared);

        let source_href = self.repo_href(doc, shared.site_prefix, &doc.source);
        let generator_href = shared.generator.map_or_else(
            || relative_path(&doc.destination, "index.html"),
            |target| self.repo_href(doc, shared.site_prefix, target),
        );

        PageData {
            brand: self.config.site_name.clone(),
            title: doc.title.clone(),
            source: doc.source.clone(),
            source_href,
            home_href: relative_path(&doc.destination, "index.html"),
            generator_href,
            html_content,
            toc,
            sidebar: navigation.sidebar(&doc.source, &doc.destination),
            chips: navigation.chips(&doc.source, &doc.destination),
            release: release.release_info(&doc.source),
            generated_at,
        }
    }

    fn render_body(&self, doc: &Document, shared: &Shared<'_>) -> (String, Vec<TocEntry>) {
        match doc.kind {
            DocumentKind::Diagram => (render_diagram_source(&doc.text), Vec::new()),
            DocumentKind::Markdown => {
                let mut ctx = RenderContext::new(&doc.source, &doc.destination, self.site.paths());
                if let Some(prefix) = shared.site_prefix {
                    ctx = ctx.with_site_prefix(prefix);
                }
                if let Some(root) = shared.repo_root {
                    ctx = ctx.with_repo_root(root);
                }
                (render_markdown(&doc.text, &ctx), extract_toc(&doc.text))
            }
        }
    }

    /// Href from the page of `doc` to a repository file.
    fn repo_href(&self, doc: &Document, site_prefix: Option<&str>, target: &str) -> String {
        match site_prefix {
            Some(prefix) => relative_path(&join(prefix, &doc.destination), target),
            None => self.site.root().join(target).display().to_string(),
        }
    }

    fn generator_link(&self) -> Option<String> {
        let links = &self.config.generator_links;
        links
            .iter()
            .find(|link| self.site.root().join(link).exists())
            .or_else(|| links.last())
            .cloned()
    }
}

/// Per-build values every page shares.
struct Shared<'a> {
    site_prefix: Option<&'a str>,
    repo_root: Option<&'a str>,
    generator: Option<&'a str>,
}

/// Output directory relative to the repository root, slash-separated.
///
/// `None` when the output directory lies outside the repository.
fn site_prefix(root: &Path, output_dir: &Path) -> Option<String> {
    let output_dir = clean_path(output_dir);
    let relative = output_dir.strip_prefix(clean_path(root)).ok()?;
    let parts: Option<Vec<&str>> = relative
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect();
    Some(parts?.join("/"))
}

fn join(prefix: &str, path: &str) -> String {
    if prefix.is_empty() {
        path.to_owned()
    } else {
        format!("{prefix}/{path}")
    }
}

fn io_error(path: &Path, source: std::io::Error) -> BuildError {
    BuildError::Io {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use docsmith_renderer::PathLayout;
    use pretty_assertions::assert_eq;

    use super::*;

    fn site(root: &Path) -> Site {
        let files = [
            ("docs/README.md", "# Home\n\nSee [guide](guide.md)."),
            ("docs/guide.md", "# Guide\n\n## Setup\n\nRun the installer."),
            ("docs/diagrams/flow.mmd", "%% Request flow\ngraph TD; A-->B;"),
        ];
        Site::from_sources(
            root,
            PathLayout::default(),
            files.map(|(s, t)| (s.to_owned(), t.to_owned())),
        )
        .unwrap()
    }

    #[test]
    fn test_site_prefix() {
        assert_eq!(
            site_prefix(Path::new("/repo"), Path::new("/repo/docs/site")).as_deref(),
            Some("docs/site")
        );
        assert_eq!(
            site_prefix(Path::new("/repo"), Path::new("/repo")).as_deref(),
            Some("")
        );
        assert_eq!(site_prefix(Path::new("/repo"), Path::new("/tmp/out")), None);
    }

    #[test]
    fn test_site_prefix_resolves_parent_components() {
        assert_eq!(site_prefix(Path::new("/repo"), Path::new("/repo/../out")), None);
        assert_eq!(
            site_prefix(Path::new("/repo"), Path::new("/repo/docs/../site/./html")).as_deref(),
            Some("site/html")
        );
    }

    #[test]
    fn test_build_writes_every_page() {
        let dir = tempfile::tempdir().unwrap();
        let site = site(dir.path());
        let output = dir.path().join("docs/site");

        let report = StaticSiteBuilder::new(&site, BuildConfig::default())
            .build(&output)
            .unwrap();

        assert_eq!(report.pages, 3);
        assert_eq!(report.index(), output.join("index.html"));
        assert!(output.join("index.html").is_file());
        assert!(output.join("guide.html").is_file());
        assert!(output.join("diagrams/flow.html").is_file());
    }

    #[test]
    fn test_page_links() {
        let dir = tempfile::tempdir().unwrap();
        let site = site(dir.path());
        let output = dir.path().join("docs/site");
        let config = BuildConfig {
            generator_links: vec!["tools.zip".to_owned(), "tools/README.md".to_owned()],
            ..BuildConfig::default()
        };
        fs::create_dir_all(dir.path().join("tools")).unwrap();
        fs::write(dir.path().join("tools/README.md"), "# Tools").unwrap();

        StaticSiteBuilder::new(&site, config).build(&output).unwrap();

        let index = fs::read_to_string(output.join("index.html")).unwrap();
        assert!(index.contains(r#"<a href="guide.html">guide</a>"#));
        assert!(index.contains(r#"<a href="../README.md"><code>docs/README.md</code></a>"#));
        assert!(index.contains(r#"<a href="../../tools/README.md" title="DocSmith documentation generator">"#));

        let diagram = fs::read_to_string(output.join("diagrams/flow.html")).unwrap();
        assert!(diagram.contains(r#"<a class="brand" href="../index.html">"#));
        assert!(diagram.contains("<h1>Request flow</h1>"));
        assert!(diagram.contains("No section headings on this page."));
    }

    #[test]
    fn test_guide_has_toc_and_unknown_release() {
        let dir = tempfile::tempdir().unwrap();
        let site = site(dir.path());
        let output = dir.path().join("docs/site");

        StaticSiteBuilder::new(&site, BuildConfig::default())
            .build(&output)
            .unwrap();

        let guide = fs::read_to_string(output.join("guide.html")).unwrap();
        assert!(guide.contains(r##"<a class="toc-link toc-main" href="#setup">Setup</a>"##));
        assert!(guide.contains(">Release N/A</span>"));
        assert!(guide.contains(">Unknown</span>"));
    }

    #[test]
    fn test_clean_removes_stale_files() {
        let dir = tempfile::tempdir().unwrap();
        let site = site(dir.path());
        let output = dir.path().join("docs/site");
        fs::create_dir_all(&output).unwrap();
        fs::write(output.join("stale.html"), "old").unwrap();

        StaticSiteBuilder::new(&site, BuildConfig::default())
            .build(&output)
            .unwrap();
        assert!(output.join("stale.html").exists());

        let config = BuildConfig {
            clean: true,
            ..BuildConfig::default()
        };
        StaticSiteBuilder::new(&site, config).build(&output).unwrap();
        assert!(!output.join("stale.html").exists());
        assert!(output.join("index.html").exists());
    }

    #[test]
    fn test_generator_link_falls_back_to_last() {
        let dir = tempfile::tempdir().unwrap();
        let site = site(dir.path());
        let config = BuildConfig {
            generator_links: vec!["a.zip".to_owned(), "b/README.md".to_owned()],
            ..BuildConfig::default()
        };
        let builder = StaticSiteBuilder::new(&site, config);
        assert_eq!(builder.generator_link().as_deref(), Some("b/README.md"));

        let empty = StaticSiteBuilder::new(&site, BuildConfig::default());
        assert_eq!(empty.generator_link(), None);
    }
}
