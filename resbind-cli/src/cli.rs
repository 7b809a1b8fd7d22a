//! Command-line interface definitions for `resbind`.

use camino::Utf8PathBuf;
use clap::{ArgAction, Args as ClapArgs, Parser, Subcommand};

/// Parsed command line.
#[derive(Debug, Parser)]
#[command(name = "resbind")]
#[command(about = "Generate typed resource bindings for a source-set hierarchy")]
#[command(version)]
pub struct Cli {
    /// Increase log verbosity (`-v` for debug, `-vv` for trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate bindings for every source set, or only the named ones.
    Generate(GenerateArgs),
}

/// Arguments for `resbind generate`.
#[derive(Debug, Clone, Default, ClapArgs)]
pub struct GenerateArgs {
    /// Project configuration file (defaults to `resbind.toml`).
    #[arg(long, value_name = "path")]
    pub config: Option<Utf8PathBuf>,
    /// Source set to generate (repeat for several; defaults to all).
    #[arg(long = "source-set", value_name = "name")]
    pub source_sets: Vec<String>,
    /// Output root overriding the configured one.
    #[arg(long, value_name = "path")]
    pub out_dir: Option<Utf8PathBuf>,
    /// Package of the generated container.
    #[arg(long = "package", value_name = "name")]
    pub package_name: Option<String>,
    /// Name of the generated container type.
    #[arg(long, value_name = "name")]
    pub class_name: Option<String>,
}

impl Cli {
    /// Log filter directive implied by `--verbose`, if any.
    #[must_use]
    pub const fn verbosity_filter(&self) -> Option<&'static str> {
        match self.verbose {
            0 => None,
            1 => Some("debug"),
            _ => Some("trace"),
        }
    }
}
