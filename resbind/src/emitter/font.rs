//! Font emitters.

use camino::{Utf8Path, Utf8PathBuf};

use super::{
    EmitContext, ResourceEmitter, android_name, android_reference, apple_bundle_member, mismatch,
};
use crate::code::{Member, string_literal};
use crate::error::GenerateError;
use crate::fs_helpers;
use crate::metadata::{ResourceData, ResourceEntry, ResourceKind};

const FONTS_DIR: &str = "fonts";

fn source(entry: &ResourceEntry) -> Result<&Utf8Path, GenerateError> {
    match &entry.data {
        ResourceData::Font { source } => Ok(source),
        _ => Err(mismatch(entry, ResourceKind::Font)),
    }
}

/// Packaged file name: accessor name plus the source extension.
fn file_name(stem: &str, entry: &ResourceEntry) -> Result<String, GenerateError> {
    let source = source(entry)?;
    Ok(format!("{stem}.{}", fs_helpers::extension_or_default(source)))
}

fn copy_fonts<F>(
    entries: &[ResourceEntry],
    mut destination: F,
) -> Result<Vec<Utf8PathBuf>, GenerateError>
where
    F: FnMut(&ResourceEntry) -> Result<Utf8PathBuf, GenerateError>,
{
    entries
        .iter()
        .map(|entry| fs_helpers::copy_file(source(entry)?, &destination(entry)?))
        .collect()
}

/// Copies fonts into `font/` with Android-safe names.
#[derive(Debug, Clone, Copy, Default)]
pub struct AndroidFontEmitter;

impl ResourceEmitter for AndroidFontEmitter {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Font
    }

    fn initializer(
        &self,
        _ctx: &EmitContext<'_>,
        entry: &ResourceEntry,
    ) -> Result<String, GenerateError> {
        source(entry)?;
        Ok(format!("FontResource({})", android_reference("font", entry)))
    }

    fn write_resource_files(
        &self,
        ctx: &EmitContext<'_>,
        entries: &[ResourceEntry],
    ) -> Result<Vec<Utf8PathBuf>, GenerateError> {
        let root = ctx.resources_dir().join("font");
        copy_fonts(entries, |entry| {
            Ok(root.join(file_name(&android_name(entry), entry)?))
        })
    }
}

/// Copies fonts to the bundle root, where they are registered by file name.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppleFontEmitter;

impl ResourceEmitter for AppleFontEmitter {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Font
    }

    fn initializer(
        &self,
        _ctx: &EmitContext<'_>,
        entry: &ResourceEntry,
    ) -> Result<String, GenerateError> {
        let name = file_name(&entry.property_name(), entry)?;
        Ok(format!(
            "FontResource(fontName = {}, bundle = __nsBundle)",
            string_literal(&name)
        ))
    }

    fn before_properties(&self, _ctx: &EmitContext<'_>, _entries: &[ResourceEntry]) -> Vec<Member> {
        vec![apple_bundle_member()]
    }

    fn write_resource_files(
        &self,
        ctx: &EmitContext<'_>,
        entries: &[ResourceEntry],
    ) -> Result<Vec<Utf8PathBuf>, GenerateError> {
        let root = ctx.resources_dir();
        copy_fonts(entries, |entry| {
            Ok(root.join(file_name(&entry.property_name(), entry)?))
        })
    }
}

/// Copies fonts under `fonts/` on the class path.
#[derive(Debug, Clone, Copy, Default)]
pub struct JvmFontEmitter;

impl ResourceEmitter for JvmFontEmitter {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Font
    }

    fn initializer(
        &self,
        _ctx: &EmitContext<'_>,
        entry: &ResourceEntry,
    ) -> Result<String, GenerateError> {
        let name = file_name(&entry.property_name(), entry)?;
        Ok(format!(
            "FontResource(resourcesClassLoader = resourcesClassLoader, filePath = {})",
            string_literal(&format!("{FONTS_DIR}/{name}"))
        ))
    }

    fn write_resource_files(
        &self,
        ctx: &EmitContext<'_>,
        entries: &[ResourceEntry],
    ) -> Result<Vec<Utf8PathBuf>, GenerateError> {
        let root = ctx.resources_dir().join(FONTS_DIR);
        copy_fonts(entries, |entry| {
            Ok(root.join(file_name(&entry.property_name(), entry)?))
        })
    }
}

/// Copies fonts under `fonts/` for the JS bundler.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsFontEmitter;

impl ResourceEmitter for JsFontEmitter {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Font
    }

    fn initializer(
        &self,
        _ctx: &EmitContext<'_>,
        entry: &ResourceEntry,
    ) -> Result<String, GenerateError> {
        let family = entry.property_name();
        let name = file_name(&family, entry)?;
        Ok(format!(
            "FontResource(fileUrl = {}, fontFamily = {})",
            string_literal(&format!("{FONTS_DIR}/{name}")),
            string_literal(&family)
        ))
    }

    fn write_resource_files(
        &self,
        ctx: &EmitContext<'_>,
        entries: &[ResourceEntry],
    ) -> Result<Vec<Utf8PathBuf>, GenerateError> {
        let root = ctx.resources_dir().join(FONTS_DIR);
        copy_fonts(entries, |entry| {
            Ok(root.join(file_name(&entry.property_name(), entry)?))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{OutputDirs, Settings};
    use rstest::rstest;
    use test_helpers::fs::Utf8TempDir;

    #[rstest]
    fn android_fonts_are_lowercased_under_font_dir() {
        let temp = Utf8TempDir::new().expect("temp dir");
        let source = temp.path().join("fonts/Inter-Bold.TTF");
        fs_helpers::write_bytes(&source, b"font").expect("write font");
        let settings = Settings::new("app", OutputDirs::under(&temp.path().join("out")));
        let ctx = EmitContext::new(&settings, "androidMain");
        let entry = ResourceEntry::new("Inter-Bold", ResourceData::Font { source });

        let written = AndroidFontEmitter
            .write_resource_files(&ctx, std::slice::from_ref(&entry))
            .expect("copy font");

        assert_eq!(
            written,
            vec![settings.output.resources.join("font/inter_bold.TTF")]
        );
        assert_eq!(
            AndroidFontEmitter.initializer(&ctx, &entry).expect("initializer"),
            "FontResource(R.font.inter_bold)"
        );
    }

    #[rstest]
    fn jvm_font_paths_keep_extension() {
        let settings = Settings::new("app", OutputDirs::under(Utf8Path::new("out")));
        let ctx = EmitContext::new(&settings, "jvmMain");
        let entry = ResourceEntry::new(
            "body",
            ResourceData::Font {
                source: "src/body.otf".into(),
            },
        );

        assert_eq!(
            JvmFontEmitter.initializer(&ctx, &entry).expect("initializer"),
            "FontResource(resourcesClassLoader = resourcesClassLoader, filePath = \"fonts/body.otf\")"
        );
    }
}
