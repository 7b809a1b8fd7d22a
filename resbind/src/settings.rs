//! Generation settings shared by every emitter in one run.

use std::str::FromStr;

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};
use unic_langid::LanguageIdentifier;

use crate::error::GenerateError;

/// Visibility applied to generated declarations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Visible to every consumer of the generated module.
    #[default]
    Public,
    /// Visible within the generated module only.
    Internal,
}

impl Visibility {
    /// Returns the keyword emitted in generated source.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Internal => "internal",
        }
    }
}

/// Output locations owned by one source set.
///
/// Every directory listed here is removed at the start of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputDirs {
    /// Root for generated source files.
    pub sources: Utf8PathBuf,
    /// Root for companion resource files (string tables, asset catalogs).
    pub resources: Utf8PathBuf,
    /// Root for raw assets copied verbatim.
    pub assets: Utf8PathBuf,
    /// Metadata file consumed by descendant source sets.
    pub metadata_file: Utf8PathBuf,
}

impl OutputDirs {
    /// Lays out the standard directories beneath `root`.
    ///
    /// # Examples
    ///
    /// ```
    /// use camino::Utf8Path;
    /// use resbind::OutputDirs;
    ///
    /// let dirs = OutputDirs::under(Utf8Path::new("build/resbind/iosMain"));
    /// assert_eq!(dirs.sources.as_str(), "build/resbind/iosMain/src");
    /// assert_eq!(dirs.metadata_file.as_str(), "build/resbind/iosMain/metadata.json");
    /// ```
    #[must_use]
    pub fn under(root: &camino::Utf8Path) -> Self {
        Self {
            sources: root.join("src"),
            resources: root.join("res"),
            assets: root.join("assets"),
            metadata_file: root.join("metadata.json"),
        }
    }
}

/// Configuration for a single generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Package of the generated container (for example `com.example.app`).
    pub package_name: String,
    /// Name of the generated container type. Defaults to `MR`.
    pub class_name: String,
    /// Visibility of generated declarations.
    pub visibility: Visibility,
    /// Region code that receives a copy of the base Apple string tables.
    pub base_localization_region: String,
    /// Keep raw line breaks in Android string tables instead of escaping them.
    pub strict_line_breaks: bool,
    /// Bundle identifier used by Apple realisations.
    pub bundle_identifier: Option<String>,
    /// Package of the Android `R` class.
    pub android_r_class_package: Option<String>,
    /// Output directories for this source set.
    pub output: OutputDirs,
}

impl Settings {
    /// Default container name.
    pub const DEFAULT_CLASS_NAME: &'static str = "MR";
    /// Default base localisation region.
    pub const DEFAULT_BASE_REGION: &'static str = "en";

    /// Creates settings with documented defaults for everything but the
    /// package and output directories.
    #[must_use]
    pub fn new(package_name: impl Into<String>, output: OutputDirs) -> Self {
        Self {
            package_name: package_name.into(),
            class_name: Self::DEFAULT_CLASS_NAME.to_owned(),
            visibility: Visibility::default(),
            base_localization_region: Self::DEFAULT_BASE_REGION.to_owned(),
            strict_line_breaks: false,
            bundle_identifier: None,
            android_r_class_package: None,
            output,
        }
    }

    /// Bundle identifier, falling back to `<package>.<class>`.
    #[must_use]
    pub fn bundle_identifier(&self) -> String {
        self.bundle_identifier
            .clone()
            .unwrap_or_else(|| format!("{}.{}", self.package_name, self.class_name))
    }

    /// Android `R` class package, falling back to the container package.
    #[must_use]
    pub fn android_r_class_package(&self) -> &str {
        self.android_r_class_package
            .as_deref()
            .unwrap_or(&self.package_name)
    }

    /// Checks the settings before any output is touched.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::Config`] when the package or class name is not
    /// a valid identifier path, or when the base region cannot be parsed.
    pub fn validate(&self) -> Result<(), GenerateError> {
        if self.package_name.is_empty() || !self.package_name.split('.').all(is_identifier) {
            return Err(GenerateError::config(
                "package_name",
                format!("'{}' is not a dotted identifier path", self.package_name),
            ));
        }
        if !is_identifier(&self.class_name) {
            return Err(GenerateError::config(
                "class_name",
                format!("'{}' is not a valid identifier", self.class_name),
            ));
        }
        LanguageIdentifier::from_str(&self.base_localization_region).map_err(|err| {
            GenerateError::config(
                "base_localization_region",
                format!("'{}': {err}", self.base_localization_region),
            )
        })?;
        if self
            .bundle_identifier
            .as_deref()
            .is_some_and(|id| id.trim().is_empty())
        {
            return Err(GenerateError::config(
                "bundle_identifier",
                "bundle identifier must not be blank",
            ));
        }
        Ok(())
    }
}

fn is_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    chars
        .next()
        .is_some_and(|first| first.is_ascii_alphabetic() || first == '_')
        && chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
}
