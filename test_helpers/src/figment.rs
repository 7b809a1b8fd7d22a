//! Helpers for running project tests inside a `figment::Jail`.
//!
//! A jail gives each test its own working directory and environment, so
//! project files and `RESBIND_` variables never leak between tests.

use std::fmt::Display;

use anyhow::{Result, anyhow};
use camino::Utf8PathBuf;

/// Executes `f` inside a [`figment::Jail`], returning the closure's output.
///
/// # Errors
///
/// Returns an error if the jail cannot be created or the closure fails.
pub fn with_jail<F, T>(f: F) -> Result<T>
where
    F: FnOnce(&mut figment::Jail) -> figment::error::Result<T>,
{
    let mut output = None;
    figment::Jail::try_with(|jail| {
        output = Some(f(jail)?);
        Ok(())
    })
    .map_err(|err| anyhow!(err.to_string()))?;
    output.ok_or_else(|| anyhow!("jail closure did not return a value"))
}

/// Seeds the jail with `files` (relative path, contents), then runs `f`.
///
/// Parent directories of nested paths are created first.
///
/// # Errors
///
/// Returns an error if a file cannot be written or the closure fails.
pub fn with_project<F, T>(files: &[(&str, &str)], f: F) -> Result<T>
where
    F: FnOnce(&mut figment::Jail) -> figment::error::Result<T>,
{
    with_jail(|jail| {
        for (path, contents) in files {
            if let Some((parent, _)) = path.rsplit_once('/') {
                jail.create_dir(parent)?;
            }
            jail.create_file(path, contents)?;
        }
        f(jail)
    })
}

/// Working directory of `jail` as a UTF-8 path.
///
/// # Errors
///
/// Returns a [`figment::Error`] when the directory is not valid UTF-8.
pub fn jail_dir(jail: &figment::Jail) -> figment::error::Result<Utf8PathBuf> {
    Utf8PathBuf::from_path_buf(jail.directory().to_path_buf())
        .map_err(|path| figment::Error::from(format!("non-UTF-8 jail path: {}", path.display())))
}

/// Wraps any displayable failure as a [`figment::Error`] so it can cross a
/// jail boundary with `?`.
#[must_use]
pub fn jail_error(err: &dyn Display) -> figment::Error {
    figment::Error::from(err.to_string())
}
