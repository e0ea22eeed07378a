//! CLI error types.

use docsmith_builder::{BuildError, ScaffoldError};
use docsmith_config::ConfigError;
use docsmith_site::SiteError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Site(#[from] SiteError),

    #[error("{0}")]
    Build(#[from] BuildError),

    #[error("{0}")]
    Scaffold(#[from] ScaffoldError),
}
