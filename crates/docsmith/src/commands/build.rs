//! `docsmith build` command implementation.

use std::path::PathBuf;

use clap::Args;
use docsmith_builder::{BuildConfig, StaticSiteBuilder};
use docsmith_config::{CliSettings, Config};
use docsmith_site::{Site, SourceSet};
use docsmith_vcs::GitHistory;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Remove the existing output directory before generating.
    #[arg(long)]
    pub(crate) clean: bool,

    /// Output directory for the generated site (overrides config).
    #[arg(short, long)]
    pub(crate) output_dir: Option<PathBuf>,

    /// Skip git release metadata.
    #[arg(long)]
    pub(crate) no_history: bool,

    /// Path to configuration file (default: auto-discover docsmith.toml).
    #[arg(short, long)]
    pub(crate) config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl BuildArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            output_dir: self.output_dir,
            history_enabled: self.no_history.then_some(false),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        if let Some(path) = &config.config_path {
            output.detail(&format!("Config: {}", path.display()));
        }

        let sources = SourceSet {
            include: config.sources.include.clone(),
            exclude: config.sources.exclude.clone(),
        };
        tracing::debug!(
            root = %config.root.display(),
            output_dir = %config.site_resolved.output_dir.display(),
            history = config.history.enabled,
            "Config loaded"
        );
        let site = Site::load(&config.root, &sources, config.layout.clone())?;

        let build_config = BuildConfig {
            site_name: config.site_resolved.title.clone(),
            generator_links: config.site_resolved.generator_links.clone(),
            clean: self.clean,
        };
        let mut builder = StaticSiteBuilder::new(&site, build_config);
        if config.history.enabled {
            builder = builder.with_history(GitHistory::new(&config.root));
        }
        let report = builder.build(&config.site_resolved.output_dir)?;

        output.success(&format!(
            "Generated {} pages at {}",
            report.pages,
            report.output_dir.display()
        ));
        output.info(&format!("Open {}", report.index().display()));
        Ok(())
    }
}
