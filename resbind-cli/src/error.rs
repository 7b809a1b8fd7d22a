//! Error types for the `resbind` command-line driver.

use camino::Utf8PathBuf;
use resbind::{GenerateError, ResolveError};
use thiserror::Error;

/// Errors surfaced while loading a project and generating its source sets.
#[derive(Debug, Error)]
pub enum CliError {
    /// Generation of a source set failed.
    #[error(transparent)]
    Generate(#[from] GenerateError),

    /// A resource manifest declares conflicting entries.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// Configuration layers could not be merged or extracted.
    #[error("failed to load configuration: {0}")]
    Config(#[from] Box<figment::Error>),

    /// An explicitly requested configuration file is missing.
    #[error("configuration file {0} does not exist")]
    MissingConfig(Utf8PathBuf),

    /// Two source sets share a name.
    #[error("source set '{0}' is declared more than once")]
    DuplicateSourceSet(String),

    /// `--source-set` named an undeclared source set.
    #[error("source set '{0}' is not declared in the project")]
    UnknownSourceSet(String),

    /// A source set lists a parent that is not declared.
    #[error("source set '{source_set}' names unknown parent '{parent}'")]
    UnknownParent { source_set: String, parent: String },

    /// Parent links loop back on themselves.
    #[error("source sets form a cycle: {}", .0.join(" -> "))]
    Cycle(Vec<String>),

    /// A resource manifest is not valid JSON for the manifest schema.
    #[error("failed to parse resource manifest {path}: {source}")]
    Manifest {
        path: Utf8PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Filesystem access failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}
