//! Project configuration.
//!
//! Values are layered from lowest to highest precedence: built-in defaults,
//! the project file (`resbind.toml` or `--config`), `RESBIND_` environment
//! variables, then command-line overrides. Relative paths from the project
//! file resolve against its directory; relative paths from the environment
//! or the command line stay relative to the working directory.

use camino::{Utf8Path, Utf8PathBuf};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use resbind::{OutputDirs, Platform, Settings, Visibility};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cli::GenerateArgs;
use crate::error::CliError;

/// Project file read when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "resbind.toml";
/// Prefix of environment variables that override project settings.
pub const ENV_PREFIX: &str = "RESBIND_";
/// Output root used when none is configured.
pub const DEFAULT_OUTPUT_ROOT: &str = "build/resbind";

/// Settings shared by every source set of a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Package of the generated container.
    pub package_name: String,
    /// Name of the generated container type.
    pub class_name: String,
    /// Visibility of generated declarations.
    pub visibility: Visibility,
    /// Region receiving a copy of the base Apple string tables.
    pub base_localization_region: String,
    /// Keep raw line breaks in Android string tables.
    pub strict_line_breaks: bool,
    /// Apple bundle identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bundle_identifier: Option<String>,
    /// Package of the Android `R` class.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub android_r_class_package: Option<String>,
    /// Directory receiving one subdirectory per source set.
    pub output_root: Utf8PathBuf,
    /// Declared source sets, in declaration order.
    pub source_sets: Vec<SourceSetConfig>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            package_name: String::new(),
            class_name: Settings::DEFAULT_CLASS_NAME.to_owned(),
            visibility: Visibility::default(),
            base_localization_region: Settings::DEFAULT_BASE_REGION.to_owned(),
            strict_line_breaks: false,
            bundle_identifier: None,
            android_r_class_package: None,
            output_root: Utf8PathBuf::from(DEFAULT_OUTPUT_ROOT),
            source_sets: Vec::new(),
        }
    }
}

/// One `[[source_sets]]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSetConfig {
    /// Unique source-set name.
    pub name: String,
    /// Direct parents, most significant first.
    #[serde(default)]
    pub parents: Vec<String>,
    /// Platform realised by this source set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<Platform>,
    /// Resource manifest declaring this source set's resources.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<Utf8PathBuf>,
}

#[derive(Debug, Serialize)]
struct Overrides<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    package_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    class_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    output_root: Option<&'a Utf8Path>,
}

impl<'a> From<&'a GenerateArgs> for Overrides<'a> {
    fn from(args: &'a GenerateArgs) -> Self {
        Self {
            package_name: args.package_name.as_deref(),
            class_name: args.class_name.as_deref(),
            output_root: args.out_dir.as_deref(),
        }
    }
}

impl ProjectConfig {
    /// Loads the layered configuration for `args`.
    ///
    /// A missing default project file is treated as empty; a missing file
    /// named by `--config` is an error.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::MissingConfig`] when `--config` names a missing
    /// file and [`CliError::Config`] when the layers cannot be extracted.
    pub fn load(args: &GenerateArgs) -> Result<Self, CliError> {
        let path = args
            .config
            .clone()
            .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_CONFIG_FILE));
        if args.config.is_some() && !path.is_file() {
            return Err(CliError::MissingConfig(path));
        }
        debug!(config = %path, "loading project configuration");
        let base = path.parent().unwrap_or_else(|| Utf8Path::new(""));
        let file: Self = Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file_exact(path.as_std_path()))
            .extract()?;
        let config = Figment::from(Serialized::defaults(file.resolved_against(base)))
            .merge(
                Env::prefixed(ENV_PREFIX)
                    .split("__")
                    .ignore(&["source_sets"]),
            )
            .merge(Serialized::defaults(Overrides::from(args)))
            .extract()?;
        Ok(config)
    }

    fn resolved_against(mut self, base: &Utf8Path) -> Self {
        self.output_root = resolve(base, &self.output_root);
        for source_set in &mut self.source_sets {
            source_set.resources = source_set
                .resources
                .take()
                .map(|manifest| resolve(base, &manifest));
        }
        self
    }

    /// Output directories owned by `source_set`.
    #[must_use]
    pub fn output_dirs(&self, source_set: &str) -> OutputDirs {
        OutputDirs::under(&self.output_root.join(source_set))
    }

    /// Generation settings for `source_set`.
    #[must_use]
    pub fn settings_for(&self, source_set: &str) -> Settings {
        let mut settings = Settings::new(self.package_name.clone(), self.output_dirs(source_set));
        settings.class_name.clone_from(&self.class_name);
        settings.visibility = self.visibility;
        settings
            .base_localization_region
            .clone_from(&self.base_localization_region);
        settings.strict_line_breaks = self.strict_line_breaks;
        settings.bundle_identifier.clone_from(&self.bundle_identifier);
        settings
            .android_r_class_package
            .clone_from(&self.android_r_class_package);
        settings
    }
}

fn resolve(base: &Utf8Path, path: &Utf8Path) -> Utf8PathBuf {
    if path.is_absolute() {
        path.to_owned()
    } else {
        base.join(path)
    }
}
