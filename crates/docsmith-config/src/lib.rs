//! Configuration management for docsmith.
//!
//! Parses `docsmith.toml` with serde and discovers it in the current
//! directory or its parents. The directory holding the config file is the
//! repository root; relative paths resolve against it.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `site.title`
//! - `site.output_dir`

mod expand;

use std::path::{Path, PathBuf};

use docsmith_renderer::{PathLayout, clean_path};
use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the site output directory.
    pub output_dir: Option<PathBuf>,
    /// Override whether git history is queried.
    pub history_enabled: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "docsmith.toml";

const DEFAULT_TITLE: &str = "Project Docs";
const DEFAULT_OUTPUT_DIR: &str = "docs/site";
const DEFAULT_TEMPLATE: &str = "docs/utils/templates/module_doc_template.md";
const DEFAULT_MODULES_DIR: &str = "docs/modules";

/// Candidate targets for the footer's generator link, first existing wins.
const DEFAULT_GENERATOR_LINKS: &[&str] = &[
    "docs-toolkit.zip",
    "docs-toolkit/README.md",
    "utils/docs/build_docs_site.py",
];

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    site: SiteConfigRaw,
    /// Which files become pages.
    pub sources: SourcesConfig,
    /// Where pages land in the output tree.
    pub layout: PathLayout,
    pub history: HistoryConfig,
    scaffold: ScaffoldConfigRaw,

    /// Resolved site configuration (set after loading).
    #[serde(skip)]
    pub site_resolved: SiteConfig,
    /// Resolved scaffold configuration (set after loading).
    #[serde(skip)]
    pub scaffold_resolved: ScaffoldConfig,
    /// Repository root (the config file's directory, or the working directory).
    #[serde(skip)]
    pub root: PathBuf,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw site configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct SiteConfigRaw {
    title: Option<String>,
    output_dir: Option<String>,
    generator_links: Option<Vec<String>>,
}

/// Resolved site configuration.
#[derive(Debug, Default)]
pub struct SiteConfig {
    /// Brand shown in the top bar and page titles.
    pub title: String,
    /// Absolute output directory.
    pub output_dir: PathBuf,
    /// Repository-relative candidates for the generator link.
    pub generator_links: Vec<String>,
}

/// Source discovery configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    /// Glob patterns relative to the repository root.
    pub include: Vec<String>,
    /// Repository-relative directories to skip.
    pub exclude: Vec<String>,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            include: [
                "docs/**/*.md",
                "docs/**/*.mmd",
                "src/**/*.md",
                "tests/**/*.md",
                "requirements.md",
                "Readme.md",
            ]
            .map(str::to_owned)
            .to_vec(),
            exclude: ["docs/site", "docs/utils/templates"].map(str::to_owned).to_vec(),
        }
    }
}

/// Release history configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Whether to query git for release metadata.
    pub enabled: bool,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Raw scaffold configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ScaffoldConfigRaw {
    template: Option<String>,
    modules_dir: Option<String>,
}

/// Resolved module-doc scaffolding configuration with absolute paths.
#[derive(Debug, Default)]
pub struct ScaffoldConfig {
    /// Module doc template file.
    pub template: PathBuf,
    /// Directory new module docs are written to.
    pub modules_dir: PathBuf,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`site.title`").
        field: String,
        /// Error message (e.g., "${`DOCS_TITLE`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a path field to be relative to the repository root.
fn require_relative(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.starts_with('/') || value.split('/').any(|segment| segment == "..") {
        return Err(ConfigError::Validation(format!(
            "{field} must be a path inside the repository"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file. Otherwise searches
    /// for `docsmith.toml` in the current directory and its parents, falling
    /// back to defaults rooted at the current directory.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, or if parsing,
    /// expansion or validation fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings)?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    ///
    /// An overridden output directory is checked the same way as one from the
    /// config file.
    fn apply_cli_settings(&mut self, settings: &CliSettings) -> Result<(), ConfigError> {
        if let Some(output_dir) = &settings.output_dir {
            self.site_resolved.output_dir = clean_path(&self.root.join(output_dir));
            self.validate_output_dir()?;
        }
        if let Some(enabled) = settings.history_enabled {
            self.history.enabled = enabled;
        }
        Ok(())
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config rooted at the current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&clean_path(&cwd))
    }

    /// Create default config rooted at `base`.
    fn default_with_base(base: &Path) -> Self {
        Self {
            site: SiteConfigRaw::default(),
            sources: SourcesConfig::default(),
            layout: PathLayout::default(),
            history: HistoryConfig::default(),
            scaffold: ScaffoldConfigRaw::default(),
            site_resolved: SiteConfig {
                title: DEFAULT_TITLE.to_owned(),
                output_dir: base.join(DEFAULT_OUTPUT_DIR),
                generator_links: DEFAULT_GENERATOR_LINKS.iter().map(|s| (*s).to_owned()).collect(),
            },
            scaffold_resolved: ScaffoldConfig {
                template: base.join(DEFAULT_TEMPLATE),
                modules_dir: base.join(DEFAULT_MODULES_DIR),
            },
            root: base.to_path_buf(),
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        config.resolve_paths(&std::path::absolute(config_dir)?);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.site_resolved.title, "site.title")?;
        self.validate_output_dir()?;
        self.validate_sources()?;
        self.validate_layout()?;
        Ok(())
    }

    /// The output directory is wiped by `--clean`, so it may hold neither the
    /// repository root nor the docs root.
    fn validate_output_dir(&self) -> Result<(), ConfigError> {
        let output_dir = &self.site_resolved.output_dir;
        let docs_root = self.root.join(&self.layout.docs_root);
        if self.root.starts_with(output_dir) || docs_root.starts_with(output_dir) {
            return Err(ConfigError::Validation(format!(
                "site.output_dir {} would contain the documentation sources",
                output_dir.display()
            )));
        }
        Ok(())
    }

    fn validate_sources(&self) -> Result<(), ConfigError> {
        if self.sources.include.is_empty() {
            return Err(ConfigError::Validation(
                "sources.include must list at least one pattern".to_owned(),
            ));
        }
        for pattern in &self.sources.include {
            require_non_empty(pattern, "sources.include")?;
            require_relative(pattern, "sources.include")?;
        }
        Ok(())
    }

    fn validate_layout(&self) -> Result<(), ConfigError> {
        let layout = &self.layout;
        require_non_empty(&layout.docs_root, "layout.docs_root")?;
        require_relative(&layout.docs_root, "layout.docs_root")?;
        require_non_empty(&layout.root_readme, "layout.root_readme")?;
        require_relative(&layout.root_readme, "layout.root_readme")?;
        require_non_empty(&layout.reference_prefix, "layout.reference_prefix")?;
        require_relative(&layout.reference_prefix, "layout.reference_prefix")?;
        require_non_empty(&layout.diagram_extension, "layout.diagram_extension")?;
        if layout.diagram_extension.eq_ignore_ascii_case("md") {
            return Err(ConfigError::Validation(
                "layout.diagram_extension cannot be md".to_owned(),
            ));
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref title) = self.site.title {
            self.site.title = Some(expand::expand_env(title, "site.title")?);
        }
        if let Some(ref output_dir) = self.site.output_dir {
            self.site.output_dir = Some(expand::expand_env(output_dir, "site.output_dir")?);
        }
        Ok(())
    }

    /// Resolve relative paths against the config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let config_dir = &clean_path(config_dir);
        let resolve =
            |path: Option<&str>, default: &str| clean_path(&config_dir.join(path.unwrap_or(default)));

        self.site_resolved = SiteConfig {
            title: self
                .site
                .title
                .clone()
                .unwrap_or_else(|| DEFAULT_TITLE.to_owned()),
            output_dir: resolve(self.site.output_dir.as_deref(), DEFAULT_OUTPUT_DIR),
            generator_links: self.site.generator_links.clone().unwrap_or_else(|| {
                DEFAULT_GENERATOR_LINKS.iter().map(|s| (*s).to_owned()).collect()
            }),
        };
        self.scaffold_resolved = ScaffoldConfig {
            template: resolve(self.scaffold.template.as_deref(), DEFAULT_TEMPLATE),
            modules_dir: resolve(self.scaffold.modules_dir.as_deref(), DEFAULT_MODULES_DIR),
        };
        self.root = config_dir.to_path_buf();
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/repo"));
        assert_eq!(config.site_resolved.title, "Project Docs");
        assert_eq!(config.site_resolved.output_dir, PathBuf::from("/repo/docs/site"));
        assert_eq!(config.site_resolved.generator_links.len(), 3);
        assert_eq!(
            config.scaffold_resolved.template,
            PathBuf::from("/repo/docs/utils/templates/module_doc_template.md")
        );
        assert_eq!(
            config.scaffold_resolved.modules_dir,
            PathBuf::from("/repo/docs/modules")
        );
        assert_eq!(config.layout, PathLayout::default());
        assert!(config.history.enabled);
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.layout.docs_root, "docs");
        assert_eq!(config.sources.include[0], "docs/**/*.md");
        assert!(config.history.enabled);
    }

    #[test]
    fn test_parse_partial_layout() {
        let toml = r#"
[layout]
docs_root = "manual"
root_readme = "manual/index.md"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.layout.docs_root, "manual");
        assert_eq!(config.layout.root_readme, "manual/index.md");
        assert_eq!(config.layout.reference_prefix, "reference");
        assert_eq!(config.layout.diagram_extension, "mmd");
    }

    #[test]
    fn test_parse_sources_and_history() {
        let toml = r#"
[sources]
include = ["handbook/**/*.md"]
exclude = []

[history]
enabled = false
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.sources.include, vec!["handbook/**/*.md"]);
        assert!(config.sources.exclude.is_empty());
        assert!(!config.history.enabled);
    }

    #[test]
    fn test_resolve_paths() {
        let toml = r#"
[site]
title = "Handbook"
output_dir = "public"
generator_links = ["tools/gen.md"]

[scaffold]
template = "templates/module.md"
modules_dir = "docs/components"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(config.site_resolved.title, "Handbook");
        assert_eq!(config.site_resolved.output_dir, PathBuf::from("/project/public"));
        assert_eq!(config.site_resolved.generator_links, vec!["tools/gen.md"]);
        assert_eq!(
            config.scaffold_resolved.template,
            PathBuf::from("/project/templates/module.md")
        );
        assert_eq!(
            config.scaffold_resolved.modules_dir,
            PathBuf::from("/project/docs/components")
        );
        assert_eq!(config.root, PathBuf::from("/project"));
    }

    #[test]
    fn test_apply_cli_settings_absolute_output_dir() {
        let mut config = Config::default_with_base(Path::new("/repo"));
        config
            .apply_cli_settings(&CliSettings {
                output_dir: Some(PathBuf::from("/tmp/site")),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(config.site_resolved.output_dir, PathBuf::from("/tmp/site"));
    }

    #[test]
    fn test_apply_cli_settings_relative_output_dir() {
        let mut config = Config::default_with_base(Path::new("/repo"));
        config
            .apply_cli_settings(&CliSettings {
                output_dir: Some(PathBuf::from("build/html")),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(config.site_resolved.output_dir, PathBuf::from("/repo/build/html"));
        assert!(config.history.enabled); // Unchanged
    }

    #[test]
    fn test_apply_cli_settings_normalizes_output_dir() {
        let mut config = Config::default_with_base(Path::new("/repo"));
        config
            .apply_cli_settings(&CliSettings {
                output_dir: Some(PathBuf::from("../out/./site")),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(config.site_resolved.output_dir, PathBuf::from("/out/site"));
    }

    #[test]
    fn test_apply_cli_settings_rejects_output_dir_holding_sources() {
        for output_dir in [".", "docs", "/", "docs/.."] {
            let mut config = Config::default_with_base(Path::new("/repo"));
            let err = config
                .apply_cli_settings(&CliSettings {
                    output_dir: Some(PathBuf::from(output_dir)),
                    ..Default::default()
                })
                .unwrap_err();
            assert!(matches!(err, ConfigError::Validation(_)), "{output_dir}");
            assert!(err.to_string().contains("site.output_dir"));
        }
    }

    #[test]
    fn test_validate_output_dir_inside_docs_is_allowed() {
        let mut config = Config::default_with_base(Path::new("/repo"));
        config.site_resolved.output_dir = PathBuf::from("/repo/docs/site");
        config.validate().unwrap();
        config.site_resolved.output_dir = PathBuf::from("/repo/public");
        config.validate().unwrap();
    }

    #[test]
    fn test_load_rejects_output_dir_at_root() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docsmith.toml");
        std::fs::write(&path, "[site]\noutput_dir = \".\"\n").unwrap();
        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_apply_cli_settings_history() {
        let mut config = Config::default_with_base(Path::new("/repo"));
        config
            .apply_cli_settings(&CliSettings {
                history_enabled: Some(false),
                ..Default::default()
            })
            .unwrap();
        assert!(!config.history.enabled);
        assert_eq!(config.site_resolved.output_dir, PathBuf::from("/repo/docs/site"));
    }

    #[test]
    fn test_expand_env_vars_site_title() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("DOCSMITH_TEST_PROJECT", "Atlas");
        }
        let toml = r#"
[site]
title = "${DOCSMITH_TEST_PROJECT} Docs"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars().unwrap();
        assert_eq!(config.site.title.as_deref(), Some("Atlas Docs"));
        unsafe {
            std::env::remove_var("DOCSMITH_TEST_PROJECT");
        }
    }

    #[test]
    fn test_expand_env_vars_missing_required_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("DOCSMITH_TEST_MISSING_DIR");
        }
        let toml = r#"
[site]
output_dir = "${DOCSMITH_TEST_MISSING_DIR}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        let err = config.expand_env_vars().unwrap_err();
        assert!(err.to_string().contains("site.output_dir"));
    }

    #[test]
    fn test_validate_default_config_passes() {
        Config::default_with_base(Path::new("/repo")).validate().unwrap();
    }

    #[test]
    fn test_validate_empty_title() {
        let mut config = Config::default_with_base(Path::new("/repo"));
        config.site_resolved.title = "  ".to_owned();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("site.title"));
    }

    #[test]
    fn test_validate_empty_include() {
        let mut config = Config::default_with_base(Path::new("/repo"));
        config.sources.include.clear();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("sources.include"));
    }

    #[test]
    fn test_validate_pattern_escaping_repo() {
        let mut config = Config::default_with_base(Path::new("/repo"));
        config.sources.include = vec!["../other/**/*.md".to_owned()];
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("inside the repository"));
    }

    #[test]
    fn test_validate_markdown_diagram_extension() {
        let mut config = Config::default_with_base(Path::new("/repo"));
        config.layout.diagram_extension = "MD".to_owned();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_explicit_missing_path() {
        let err = Config::load(Some(Path::new("/nonexistent/docsmith.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docsmith.toml");
        std::fs::write(&path, "[site]\ntitle = \"Atlas\"\n\n[history]\nenabled = false\n").unwrap();

        let settings = CliSettings {
            history_enabled: Some(true),
            ..Default::default()
        };
        let config = Config::load(Some(&path), Some(&settings)).unwrap();

        assert_eq!(config.site_resolved.title, "Atlas");
        assert_eq!(config.root, dir.path());
        assert_eq!(config.site_resolved.output_dir, dir.path().join("docs/site"));
        assert_eq!(config.config_path.as_deref(), Some(path.as_path()));
        assert!(config.history.enabled);
    }

    #[test]
    fn test_load_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docsmith.toml");
        std::fs::write(&path, "[site\n").unwrap();
        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
