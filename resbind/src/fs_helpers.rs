//! Filesystem helpers shared by the emitters and the driver.
//!
//! Paths are split into a parent directory opened with ambient authority and
//! a file name resolved through `cap-std`.

use std::io::{ErrorKind, Write};

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::{Dir, OpenOptions};

use crate::error::GenerateError;

/// Opens `path`, creating it (and its parents) first when missing.
pub fn ensure_dir(path: &Utf8Path) -> Result<Dir, GenerateError> {
    match Dir::open_ambient_dir(path, ambient_authority()) {
        Ok(dir) => Ok(dir),
        Err(open_err) if open_err.kind() == ErrorKind::NotFound => {
            Dir::create_ambient_dir_all(path, ambient_authority())
                .map_err(|io_err| GenerateError::io(path, io_err))?;
            Dir::open_ambient_dir(path, ambient_authority())
                .map_err(|io_err| GenerateError::io(path, io_err))
        }
        Err(open_err) => Err(GenerateError::io(path, open_err)),
    }
}

/// Opens a directory if it exists, returning `None` when the path is missing.
pub fn open_optional_dir(path: &Utf8Path) -> Result<Option<Dir>, GenerateError> {
    match Dir::open_ambient_dir(path, ambient_authority()) {
        Ok(dir) => Ok(Some(dir)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(GenerateError::io(path, err)),
    }
}

fn split(path: &Utf8Path) -> Result<(&Utf8Path, &str), GenerateError> {
    let name = path.file_name().ok_or_else(|| {
        GenerateError::io(
            path,
            std::io::Error::new(ErrorKind::InvalidInput, "path has no file name"),
        )
    })?;
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    Ok((parent, name))
}

/// Writes `content` to `path`, truncating any previous file.
pub fn write_bytes(path: &Utf8Path, content: &[u8]) -> Result<Utf8PathBuf, GenerateError> {
    let (parent, name) = split(path)?;
    let dir = ensure_dir(parent)?;
    let mut file = dir
        .open_with(
            name,
            OpenOptions::new().write(true).create(true).truncate(true),
        )
        .map_err(|io_err| GenerateError::io(path, io_err))?;
    file.write_all(content)
        .map_err(|io_err| GenerateError::io(path, io_err))?;
    Ok(path.to_path_buf())
}

/// Writes UTF-8 text to `path`, truncating any previous file.
pub fn write_text(path: &Utf8Path, content: &str) -> Result<Utf8PathBuf, GenerateError> {
    write_bytes(path, content.as_bytes())
}

/// Reads the whole file at `path`.
pub fn read_bytes(path: &Utf8Path) -> Result<Vec<u8>, GenerateError> {
    let (parent, name) = split(path)?;
    let dir = Dir::open_ambient_dir(parent, ambient_authority())
        .map_err(|io_err| GenerateError::io(parent, io_err))?;
    dir.read(name).map_err(|io_err| GenerateError::io(path, io_err))
}

/// Reads `path` as UTF-8, returning `None` when the file does not exist.
pub fn read_optional_text(path: &Utf8Path) -> Result<Option<String>, GenerateError> {
    let (parent, name) = split(path)?;
    let Some(dir) = open_optional_dir(parent)? else {
        return Ok(None);
    };
    match dir.read_to_string(name) {
        Ok(text) => Ok(Some(text)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(GenerateError::io(path, err)),
    }
}

/// Copies `source` to `destination`, creating parent directories.
pub fn copy_file(source: &Utf8Path, destination: &Utf8Path) -> Result<Utf8PathBuf, GenerateError> {
    let content = read_bytes(source)?;
    write_bytes(destination, &content)
}

/// Recursively removes the directory at `path` when present.
pub fn remove_dir_all_if_exists(path: &Utf8Path) -> Result<bool, GenerateError> {
    let (parent, name) = split(path)?;
    let Some(dir) = open_optional_dir(parent)? else {
        return Ok(false);
    };
    match dir.remove_dir_all(name) {
        Ok(()) => Ok(true),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
        Err(err) => Err(GenerateError::io(path, err)),
    }
}

/// Removes the file at `path` when present.
pub fn remove_file_if_exists(path: &Utf8Path) -> Result<bool, GenerateError> {
    let (parent, name) = split(path)?;
    let Some(dir) = open_optional_dir(parent)? else {
        return Ok(false);
    };
    match dir.remove_file(name) {
        Ok(()) => Ok(true),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
        Err(err) => Err(GenerateError::io(path, err)),
    }
}

/// Returns the extension of `path`, or `bin` when it has none.
#[must_use]
pub fn extension_or_default(path: &Utf8Path) -> &str {
    path.extension().unwrap_or("bin")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use test_helpers::fs::Utf8TempDir;

    #[rstest]
    fn writes_into_missing_parents_and_truncates() {
        let temp = Utf8TempDir::new().expect("temp dir");
        let target = temp.path().join("a/b/c.txt");

        write_text(&target, "first, longer text").expect("first write");
        write_text(&target, "second").expect("second write");

        let text = read_optional_text(&target).expect("read").expect("file exists");
        assert_eq!(text, "second");
    }

    #[rstest]
    fn removal_of_missing_paths_is_not_an_error() {
        let temp = Utf8TempDir::new().expect("temp dir");
        assert!(!remove_dir_all_if_exists(&temp.path().join("missing/dir")).expect("remove dir"));
        assert!(!remove_file_if_exists(&temp.path().join("missing.json")).expect("remove file"));
    }

    #[rstest]
    fn copies_binary_content() {
        let temp = Utf8TempDir::new().expect("temp dir");
        let source = temp.path().join("in.bin");
        write_bytes(&source, &[0, 159, 146, 150]).expect("write source");

        let copied = copy_file(&source, &temp.path().join("out/copy.bin")).expect("copy");

        assert_eq!(read_bytes(&copied).expect("read copy"), vec![0, 159, 146, 150]);
    }
}
