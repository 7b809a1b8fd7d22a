//! Command-line driver for `resbind`.
//!
//! Loads a project configuration, orders its source sets so that parents
//! precede children, and runs the generation driver for each one, feeding
//! every source set the metadata its ancestors wrote.

pub mod cli;
pub mod config;
pub mod error;
pub mod project;

pub use cli::{Cli, Command, GenerateArgs};
pub use config::{ProjectConfig, SourceSetConfig};
pub use error::CliError;

use resbind::GenerationReport;

/// Executes the parsed command line.
///
/// # Errors
///
/// Returns a [`CliError`] when configuration loading or generation fails.
pub fn run(cli: &Cli) -> Result<Vec<GenerationReport>, CliError> {
    match &cli.command {
        Command::Generate(args) => {
            let config = ProjectConfig::load(args)?;
            project::generate(&config, &args.source_sets)
        }
    }
}
