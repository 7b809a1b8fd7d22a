//! Versioned JSON persistence of finalised metadata.
//!
//! Each source set writes one file after a successful run; descendant source
//! sets read their ancestors' files to build a [`MetadataArena`].

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::GenerateError;
use crate::fs_helpers;
use crate::metadata::{GeneratedObject, MetadataArena};

/// Format version written by this build.
pub const METADATA_VERSION: u32 = 1;

/// On-disk envelope of one source set's metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataFile {
    /// Format version.
    pub version: u32,
    /// Source set that produced the objects.
    pub source_set: String,
    /// Finalised objects in generation order.
    pub objects: Vec<GeneratedObject>,
}

impl MetadataFile {
    /// Wraps `objects` in the current format version.
    #[must_use]
    pub fn new(source_set: impl Into<String>, objects: Vec<GeneratedObject>) -> Self {
        Self {
            version: METADATA_VERSION,
            source_set: source_set.into(),
            objects,
        }
    }
}

/// Writes the metadata of `source_set` to `path`.
///
/// # Errors
///
/// Returns [`GenerateError::MetadataJson`] if encoding fails or
/// [`GenerateError::Io`] if the file cannot be written.
pub fn write_metadata(
    path: &Utf8Path,
    source_set: &str,
    objects: &[GeneratedObject],
) -> Result<Utf8PathBuf, GenerateError> {
    let file = MetadataFile::new(source_set, objects.to_vec());
    let mut content = serde_json::to_string_pretty(&file)?;
    content.push('\n');
    fs_helpers::write_text(path, &content)
}

/// Reads the metadata stored at `path`.
///
/// A missing file yields an empty list, as produced by a source set that
/// declared nothing.
///
/// # Errors
///
/// Returns [`GenerateError::MetadataVersion`] for an unsupported version,
/// [`GenerateError::MetadataJson`] for malformed content, or
/// [`GenerateError::Io`] when the file cannot be read.
pub fn read_metadata(path: &Utf8Path) -> Result<Vec<GeneratedObject>, GenerateError> {
    let Some(content) = fs_helpers::read_optional_text(path)? else {
        debug!(path = %path, "metadata file missing; treating as empty");
        return Ok(Vec::new());
    };
    let file: MetadataFile = serde_json::from_str(&content)?;
    if file.version != METADATA_VERSION {
        return Err(GenerateError::MetadataVersion {
            path: path.to_path_buf(),
            found: file.version,
            expected: METADATA_VERSION,
        });
    }
    Ok(file.objects)
}

/// Builds an arena from ancestor metadata files, most general first.
///
/// # Errors
///
/// Propagates any failure from [`read_metadata`].
pub fn load_ancestors<P: AsRef<Utf8Path>>(
    paths: impl IntoIterator<Item = P>,
) -> Result<MetadataArena, GenerateError> {
    let mut arena = MetadataArena::new();
    for path in paths {
        arena.extend(read_metadata(path.as_ref())?);
    }
    Ok(arena)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{
        GeneratedProperty, GeneratorType, ObjectModifier, ObjectType, PropertyModifier,
        ResourceData, ResourceEntry, Rgba,
    };
    use rstest::rstest;
    use test_helpers::fs::Utf8TempDir;

    fn contract() -> GeneratedObject {
        let mut object = GeneratedObject::new(
            "commonMain",
            "__CommonMainColors",
            GeneratorType::Colors,
            ObjectType::Interface,
            ObjectModifier::None,
        );
        object.properties.push(GeneratedProperty {
            name: "accent".to_owned(),
            modifier: PropertyModifier::None,
            resource: ResourceEntry::new(
                "accent",
                ResourceData::Color {
                    light: Rgba(0x3366_99FF),
                    dark: None,
                },
            ),
        });
        object
    }

    #[rstest]
    fn persisted_metadata_reads_back() {
        let temp = Utf8TempDir::new().expect("temp dir");
        let path = temp.path().join("commonMain/metadata.json");

        write_metadata(&path, "commonMain", &[contract()]).expect("write metadata");

        assert_eq!(read_metadata(&path).expect("read metadata"), vec![contract()]);
    }

    #[rstest]
    fn missing_file_is_empty() {
        let temp = Utf8TempDir::new().expect("temp dir");
        let objects = read_metadata(&temp.path().join("absent.json")).expect("read metadata");
        assert!(objects.is_empty());
    }

    #[rstest]
    fn rejects_unknown_versions() {
        let temp = Utf8TempDir::new().expect("temp dir");
        let path = temp.path().join("metadata.json");
        fs_helpers::write_text(&path, r#"{"version":7,"source_set":"a","objects":[]}"#)
            .expect("write fixture");

        let err = read_metadata(&path).expect_err("version 7 is unsupported");

        assert!(matches!(
            err,
            GenerateError::MetadataVersion {
                found: 7,
                expected: METADATA_VERSION,
                ..
            }
        ));
    }

    #[rstest]
    fn rejects_malformed_json() {
        let temp = Utf8TempDir::new().expect("temp dir");
        let path = temp.path().join("metadata.json");
        fs_helpers::write_text(&path, "{not json").expect("write fixture");

        assert!(matches!(
            read_metadata(&path),
            Err(GenerateError::MetadataJson(_))
        ));
    }
}
