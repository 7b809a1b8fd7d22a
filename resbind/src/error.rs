//! Error types for resource generation.

use camino::Utf8PathBuf;
use thiserror::Error;

use crate::metadata::{GeneratorType, ResourceKind};
use crate::platform::Platform;

/// Failures raised while resolving hierarchy metadata.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// Two resources in one container share a property name.
    #[error("duplicate {generator} key '{key}' in source set '{source_set}'")]
    DuplicateKey {
        /// Source set that declared the duplicate.
        source_set: String,
        /// Generator family of the container.
        generator: GeneratorType,
        /// Offending key.
        key: String,
    },

    /// Two ancestor contracts declare the same member with different resources.
    #[error(
        "property '{property}' of {generator} is declared incompatibly by source sets '{first}' and '{second}'"
    )]
    IncompatibleContracts {
        /// Member name declared by both contracts.
        property: String,
        /// Generator family of both contracts.
        generator: GeneratorType,
        /// Source set owning the first declaration.
        first: String,
        /// Source set owning the conflicting declaration.
        second: String,
    },
}

/// Errors surfaced by the generation pipeline.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// Invalid settings detected before generation starts.
    #[error("invalid configuration for '{field}': {message}")]
    Config {
        /// Settings field that failed validation.
        field: &'static str,
        /// Human-readable explanation.
        message: String,
    },

    /// A locale tag could not be parsed.
    #[error("failed to parse locale '{value}': {message}")]
    InvalidLocale {
        /// Raw locale tag.
        value: String,
        /// Parser diagnostic.
        message: String,
    },

    /// Hierarchy metadata is inconsistent.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// A resource payload does not match the emitter it was routed to.
    #[error("resource '{key}' is not a {expected} resource")]
    KindMismatch {
        /// Key of the offending resource.
        key: String,
        /// Kind the emitter expected.
        expected: ResourceKind,
    },

    /// No emitter is registered for a kind on the active platform.
    #[error("no {kind} emitter registered for platform {platform}")]
    MissingEmitter {
        /// Requested resource kind.
        kind: ResourceKind,
        /// Active platform.
        platform: Platform,
    },

    /// The metadata file has a version this build cannot read.
    #[error("metadata file {path} has version {found}; expected {expected}")]
    MetadataVersion {
        /// Metadata file location.
        path: Utf8PathBuf,
        /// Version recorded in the file.
        found: u32,
        /// Version supported by this build.
        expected: u32,
    },

    /// Metadata JSON could not be encoded or decoded.
    #[error("failed to process metadata JSON: {0}")]
    MetadataJson(#[from] serde_json::Error),

    /// A generation hook reported a failure.
    #[error("generation hook failed: {0}")]
    Hook(String),

    /// Filesystem access failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path being accessed.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl GenerateError {
    pub(crate) fn io(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn config(field: &'static str, message: impl Into<String>) -> Self {
        Self::Config {
            field,
            message: message.into(),
        }
    }
}
