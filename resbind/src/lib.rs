//! Resource-binding generator for multiplatform source-set hierarchies.
//!
//! Each source set declares typed resources (strings, plurals, assets, fonts,
//! colours and images). For every source set the crate produces one registry
//! type exposing those resources as typed accessors, plus the companion files
//! each platform needs to load them.
//!
//! The pipeline has five parts:
//!
//! - [`metadata`] describes generated containers and persists them for
//!   descendant source sets.
//! - [`resolver`] decides, per property, whether it overrides an inherited
//!   contract, realises a new member, or is a plain declaration.
//! - [`emitter`] turns resolved entries into initialisers and side files for
//!   one resource kind on one platform.
//! - [`container`] adds platform scaffolding to the registry type.
//! - [`driver`] runs clean, populate and write for one source set.

pub mod code;
pub mod container;
pub mod driver;
pub mod emitter;
mod error;
pub mod escape;
mod fs_helpers;
pub mod locale;
pub mod metadata;
mod platform;
pub mod resolver;
mod settings;
pub mod source;

pub use driver::{GenerationDriver, GenerationInput, GenerationReport, Hooks, SourceSetInfo};
pub use error::{GenerateError, ResolveError};
pub use platform::{Platform, UnknownPlatform};
pub use settings::{OutputDirs, Settings, Visibility};
