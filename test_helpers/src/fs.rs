//! UTF-8 temporary directories and file-tree snapshots.

use std::collections::BTreeMap;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use tempfile::TempDir;

/// Temporary directory with a UTF-8 path, removed on drop.
#[derive(Debug)]
pub struct Utf8TempDir {
    _dir: TempDir,
    path: Utf8PathBuf,
}

impl Utf8TempDir {
    /// Creates a fresh temporary directory.
    ///
    /// # Errors
    ///
    /// Returns an error when the directory cannot be created or its path is
    /// not valid UTF-8.
    pub fn new() -> io::Result<Self> {
        let dir = tempfile::tempdir()?;
        let path = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).map_err(|path| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("non-UTF-8 temp path: {}", path.display()),
            )
        })?;
        Ok(Self { _dir: dir, path })
    }

    /// Path of the directory.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }
}

/// Every file beneath `root`, keyed by `/`-separated relative path.
///
/// A missing `root` yields an empty snapshot.
///
/// # Errors
///
/// Returns an error when a directory or file cannot be read.
pub fn snapshot_tree(root: &Utf8Path) -> io::Result<BTreeMap<String, Vec<u8>>> {
    let mut files = BTreeMap::new();
    let dir = match Dir::open_ambient_dir(root, ambient_authority()) {
        Ok(dir) => dir,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(files),
        Err(err) => return Err(err),
    };
    collect(&dir, "", &mut files)?;
    Ok(files)
}

fn collect(dir: &Dir, prefix: &str, files: &mut BTreeMap<String, Vec<u8>>) -> io::Result<()> {
    for entry in dir.entries()? {
        let entry = entry?;
        let name = entry.file_name()?;
        let relative = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{prefix}/{name}")
        };
        if entry.file_type()?.is_dir() {
            collect(&dir.open_dir(&name)?, &relative, files)?;
        } else {
            files.insert(relative, dir.read(&name)?);
        }
    }
    Ok(())
}

/// Relative paths of every file beneath `root`, sorted.
///
/// # Errors
///
/// Returns an error when the tree cannot be read.
pub fn list_tree(root: &Utf8Path) -> io::Result<Vec<String>> {
    Ok(snapshot_tree(root)?.into_keys().collect())
}
