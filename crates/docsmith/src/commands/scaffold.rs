//! `docsmith scaffold` command implementation.

use std::path::PathBuf;

use clap::Args;
use docsmith_builder::Scaffold;
use docsmith_config::Config;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the scaffold command.
#[derive(Args)]
pub(crate) struct ScaffoldArgs {
    /// Repo-relative source file path, for example src/api/main.py.
    #[arg(long)]
    pub(crate) source: String,

    /// Overwrite an existing module doc.
    #[arg(long)]
    pub(crate) force: bool,

    /// Path to configuration file (default: auto-discover docsmith.toml).
    #[arg(short, long)]
    pub(crate) config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl ScaffoldArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = Config::load(self.config.as_deref(), None)?;

        let scaffold = Scaffold {
            root: config.root.clone(),
            template: config.scaffold_resolved.template.clone(),
            modules_dir: config.scaffold_resolved.modules_dir.clone(),
        };
        let path = scaffold.module_doc(&self.source, self.force)?;

        let shown = path.strip_prefix(&config.root).unwrap_or(&path);
        output.success(&format!("Created {}", shown.display()));
        Ok(())
    }
}
