//! Test helpers shared across the resbind crates.
//!
//! - [`fs`] provides UTF-8 temporary directories and file-tree snapshots.
//! - [`figment`] wraps `figment::Jail` for configuration layering tests.
//! - [`text`] normalises placeholders captured by behavioural steps.

pub mod figment;
pub mod fs;
pub mod text;
