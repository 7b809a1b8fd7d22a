//! Per-kind, per-platform resource emitters.
//!
//! Every resource kind has one [`ResourceEmitter`] implementation per
//! platform. Emitters are looked up by `(kind, platform)` in an
//! [`EmitterRegistry`], so a run only ever sees the emitters of its platform.

mod asset;
mod color;
mod font;
mod image;
mod plural;
mod string;

use std::collections::BTreeMap;
use std::fmt;

use camino::{Utf8Path, Utf8PathBuf};

use crate::code::{Import, Member};
use crate::error::GenerateError;
use crate::fs_helpers;
use crate::metadata::{GeneratorType, ResourceEntry, ResourceKind};
use crate::platform::Platform;
use crate::settings::Settings;

pub use asset::{AndroidAssetEmitter, AppleAssetEmitter, JsAssetEmitter, JvmAssetEmitter};
pub use color::{AndroidColorEmitter, AppleColorEmitter, JsColorEmitter, JvmColorEmitter};
pub use font::{AndroidFontEmitter, AppleFontEmitter, JsFontEmitter, JvmFontEmitter};
pub use image::{AndroidImageEmitter, AppleImageEmitter, JsImageEmitter, JvmImageEmitter};
pub use plural::{AndroidPluralEmitter, ApplePluralEmitter, JsPluralEmitter, JvmPluralEmitter};
pub use string::{AndroidStringEmitter, AppleStringEmitter, JsStringEmitter, JvmStringEmitter};

/// Inputs shared by every emitter during one run.
#[derive(Debug, Clone, Copy)]
pub struct EmitContext<'a> {
    /// Run settings.
    pub settings: &'a Settings,
    /// Source set being generated.
    pub source_set: &'a str,
}

impl<'a> EmitContext<'a> {
    /// Creates a context.
    #[must_use]
    pub const fn new(settings: &'a Settings, source_set: &'a str) -> Self {
        Self {
            settings,
            source_set,
        }
    }

    /// Root for companion resource files.
    #[must_use]
    pub fn resources_dir(&self) -> &Utf8Path {
        &self.settings.output.resources
    }

    /// Root for raw assets.
    #[must_use]
    pub fn assets_dir(&self) -> &Utf8Path {
        &self.settings.output.assets
    }

    /// Name of the generated container.
    #[must_use]
    pub fn class_name(&self) -> &str {
        &self.settings.class_name
    }

    /// Base name of a JVM/JS localisation table (`localization/MRStrings`).
    #[must_use]
    pub fn localization_table(&self, generator: GeneratorType) -> String {
        format!(
            "{LOCALIZATION_DIR}/{}{}",
            self.class_name(),
            generator.type_suffix()
        )
    }
}

/// Directory holding JVM and JS localisation tables.
pub const LOCALIZATION_DIR: &str = "localization";
/// Apple asset catalog directory.
pub const XCASSETS_DIR: &str = "Assets.xcassets";

/// Code and side files for one resource kind on one platform.
pub trait ResourceEmitter {
    /// Kind handled by the emitter.
    fn kind(&self) -> ResourceKind;

    /// Symbols referenced by the generated accessors.
    fn imports(&self, _ctx: &EmitContext<'_>) -> Vec<Import> {
        vec![Import::runtime(GeneratorType::for_kind(self.kind()).value_type())]
    }

    /// Expression constructing the accessor value for `entry`.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::KindMismatch`] when `entry` has another kind.
    fn initializer(&self, ctx: &EmitContext<'_>, entry: &ResourceEntry)
    -> Result<String, GenerateError>;

    /// Scaffolding the nested object needs before its properties.
    fn before_properties(&self, _ctx: &EmitContext<'_>, _entries: &[ResourceEntry]) -> Vec<Member> {
        Vec::new()
    }

    /// Writes companion files for `entries`, returning the written paths.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::Io`] when a file cannot be read or written.
    fn write_resource_files(
        &self,
        _ctx: &EmitContext<'_>,
        _entries: &[ResourceEntry],
    ) -> Result<Vec<Utf8PathBuf>, GenerateError> {
        Ok(Vec::new())
    }
}

/// Flat lookup table of emitters keyed by kind and platform.
#[derive(Default)]
pub struct EmitterRegistry {
    emitters: BTreeMap<(ResourceKind, Platform), Box<dyn ResourceEmitter>>,
}

impl fmt::Debug for EmitterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.emitters.keys()).finish()
    }
}

impl EmitterRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry covering every built-in kind on every platform.
    #[must_use]
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register(Platform::Android, AndroidStringEmitter);
        registry.register(Platform::Apple, AppleStringEmitter);
        registry.register(Platform::Jvm, JvmStringEmitter);
        registry.register(Platform::Js, JsStringEmitter);
        registry.register(Platform::Android, AndroidPluralEmitter);
        registry.register(Platform::Apple, ApplePluralEmitter);
        registry.register(Platform::Jvm, JvmPluralEmitter);
        registry.register(Platform::Js, JsPluralEmitter);
        registry.register(Platform::Android, AndroidAssetEmitter);
        registry.register(Platform::Apple, AppleAssetEmitter);
        registry.register(Platform::Jvm, JvmAssetEmitter);
        registry.register(Platform::Js, JsAssetEmitter);
        registry.register(Platform::Android, AndroidFontEmitter);
        registry.register(Platform::Apple, AppleFontEmitter);
        registry.register(Platform::Jvm, JvmFontEmitter);
        registry.register(Platform::Js, JsFontEmitter);
        registry.register(Platform::Android, AndroidColorEmitter);
        registry.register(Platform::Apple, AppleColorEmitter);
        registry.register(Platform::Jvm, JvmColorEmitter);
        registry.register(Platform::Js, JsColorEmitter);
        registry.register(Platform::Android, AndroidImageEmitter);
        registry.register(Platform::Apple, AppleImageEmitter);
        registry.register(Platform::Jvm, JvmImageEmitter);
        registry.register(Platform::Js, JsImageEmitter);
        registry
    }

    /// Registers `emitter` for its kind on `platform`, replacing any previous one.
    pub fn register(&mut self, platform: Platform, emitter: impl ResourceEmitter + 'static) {
        self.emitters
            .insert((emitter.kind(), platform), Box::new(emitter));
    }

    /// Looks up the emitter for `kind` on `platform`.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::MissingEmitter`] when none is registered.
    pub fn get(
        &self,
        kind: ResourceKind,
        platform: Platform,
    ) -> Result<&dyn ResourceEmitter, GenerateError> {
        self.emitters
            .get(&(kind, platform))
            .map(|emitter| &**emitter)
            .ok_or(GenerateError::MissingEmitter { kind, platform })
    }
}

pub(crate) fn mismatch(entry: &ResourceEntry, expected: ResourceKind) -> GenerateError {
    GenerateError::KindMismatch {
        key: entry.key.clone(),
        expected,
    }
}

/// Android resource identifier for `entry` (lowercase, `_`-separated).
pub(crate) fn android_name(entry: &ResourceEntry) -> String {
    entry.property_name().to_ascii_lowercase()
}

/// `R.<type>.<name>` reference used by Android initialisers.
pub(crate) fn android_reference(resource_type: &str, entry: &ResourceEntry) -> String {
    format!("R.{resource_type}.{}", android_name(entry))
}

/// Per-object accessor to the container-level Apple bundle.
pub(crate) fn apple_bundle_member() -> Member {
    Member::new("__nsBundle", "private val __nsBundle: NSBundle\n    get() = bundle")
}

/// Writes the root `Contents.json` of the Apple asset catalog.
pub(crate) fn write_xcassets_root(ctx: &EmitContext<'_>) -> Result<Utf8PathBuf, GenerateError> {
    let path = ctx.resources_dir().join(XCASSETS_DIR).join("Contents.json");
    write_json(&path, &serde_json::json!({ "info": xcode_info() }))
}

pub(crate) fn xcode_info() -> serde_json::Value {
    serde_json::json!({ "author": "xcode", "version": 1 })
}

/// Writes pretty-printed JSON followed by a newline.
pub(crate) fn write_json(
    path: &Utf8Path,
    value: &serde_json::Value,
) -> Result<Utf8PathBuf, GenerateError> {
    let mut content = serde_json::to_string_pretty(value)?;
    content.push('\n');
    fs_helpers::write_text(path, &content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn standard_registry_covers_every_kind_and_platform() {
        let registry = EmitterRegistry::standard();
        for platform in Platform::ALL {
            for kind in ResourceKind::ALL {
                let emitter = registry
                    .get(kind, platform)
                    .unwrap_or_else(|err| panic!("{err}"));
                assert_eq!(emitter.kind(), kind);
            }
        }
    }

    #[rstest]
    fn empty_registry_reports_missing_emitter() {
        let registry = EmitterRegistry::new();
        let err = registry
            .get(ResourceKind::Font, Platform::Js)
            .err()
            .expect("nothing registered");
        assert!(matches!(
            err,
            GenerateError::MissingEmitter {
                kind: ResourceKind::Font,
                platform: Platform::Js
            }
        ));
    }
}
