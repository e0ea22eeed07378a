//! Module documentation scaffolding.
//!
//! Creates a Markdown page for one source file from a template. The template
//! may contain these placeholders:
//!
//! - `<repo-relative-path>` - the source path as given
//! - `<module>` - the source file stem
//! - `<module-doc-html>` - file name of the generated page

use std::fs;
use std::path::{Path, PathBuf};

/// Error creating a module doc.
#[derive(Debug, thiserror::Error)]
pub enum ScaffoldError {
    #[error("Source file not found: {0}")]
    SourceNotFound(String),
    #[error("Template not found: {}", .0.display())]
    TemplateNotFound(PathBuf),
    #[error("Module doc already exists: {}. Use --force to overwrite.", .0.display())]
    AlreadyExists(PathBuf),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Where scaffolding reads from and writes to.
#[derive(Debug, Clone)]
pub struct Scaffold {
    /// Repository root that source paths are relative to.
    pub root: PathBuf,
    /// Module doc template.
    pub template: PathBuf,
    /// Directory new module docs are written to.
    pub modules_dir: PathBuf,
}

impl Scaffold {
    /// Create the module doc for the repository-relative `source`.
    ///
    /// Returns the path of the written file. An existing doc is only replaced
    /// when `force` is set.
    pub fn module_doc(&self, source: &str, force: bool) -> Result<PathBuf, ScaffoldError> {
        let source = source.trim_start_matches("./").replace('\\', "/");
        if !self.root.join(&source).exists() {
            return Err(ScaffoldError::SourceNotFound(source));
        }
        if !self.template.exists() {
            return Err(ScaffoldError::TemplateNotFound(self.template.clone()));
        }

        let name = module_doc_name(&source);
        let output = self.modules_dir.join(&name);
        if output.exists() && !force {
            return Err(ScaffoldError::AlreadyExists(output));
        }

        let template = fs::read_to_string(&self.template)?;
        let stem = Path::new(&source)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default();
        let page = name.strip_suffix(".md").unwrap_or(&name);
        let content = template
            .replace("<repo-relative-path>", &source)
            .replace("<module>", stem)
            .replace("<module-doc-html>", &format!("{page}.html"));

        fs::create_dir_all(&self.modules_dir)?;
        fs::write(&output, content)?;
        tracing::info!(source = %source, path = %output.display(), "Created module doc");
        Ok(output)
    }
}

/// File name of the module doc for `source`.
///
/// Slashes become dashes and dots become underscores, so every source maps to
/// a distinct flat name.
///
/// # Examples
///
/// ```
/// use docsmith_builder::module_doc_name;
///
/// assert_eq!(module_doc_name("src/api/main.py"), "src-api-main_py.md");
/// ```
#[must_use]
pub fn module_doc_name(source: &str) -> String {
    format!("{}.md", source.replace('/', "-").replace('.', "_"))
}
