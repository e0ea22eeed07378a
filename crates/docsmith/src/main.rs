//! docsmith CLI - Markdown-first documentation site generator.
//!
//! Provides commands for:
//! - `build`: Generate the static documentation site
//! - `scaffold`: Create a module doc for a source file from the template

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{BuildArgs, ScaffoldArgs};
use output::Output;

/// docsmith - Markdown-first documentation site generator.
#[derive(Parser)]
#[command(name = "docsmith", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate HTML pages from Markdown sources.
    Build(BuildArgs),
    /// Create a module doc from the project template.
    Scaffold(ScaffoldArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let verbose = match &cli.command {
        Commands::Build(args) => args.verbose,
        Commands::Scaffold(args) => args.verbose,
    };
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Build(args) => args.execute(),
        Commands::Scaffold(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
