//! Raster image emitters.

use camino::{Utf8Path, Utf8PathBuf};
use serde_json::json;
use tracing::debug;

use super::{
    EmitContext, ResourceEmitter, XCASSETS_DIR, android_name, android_reference,
    apple_bundle_member, mismatch, write_json, write_xcassets_root, xcode_info,
};
use crate::code::{Member, string_literal};
use crate::error::GenerateError;
use crate::fs_helpers;
use crate::metadata::{ImageVariant, ResourceData, ResourceEntry, ResourceKind};

const IMAGES_DIR: &str = "images";

fn variants(entry: &ResourceEntry) -> Result<Vec<&ImageVariant>, GenerateError> {
    let ResourceData::Image { variants } = &entry.data else {
        return Err(mismatch(entry, ResourceKind::Image));
    };
    if variants.is_empty() {
        return Err(GenerateError::config(
            "resources",
            format!("image '{}' declares no variants", entry.key),
        ));
    }
    let mut sorted: Vec<&ImageVariant> = variants.iter().collect();
    sorted.sort_by_key(|variant| variant.density);
    Ok(sorted)
}

fn scaled_name(stem: &str, variant: &ImageVariant) -> String {
    format!(
        "{stem}@{}.{}",
        variant.density.scale_label(),
        fs_helpers::extension_or_default(&variant.source)
    )
}

/// Path of the highest-density copy, relative to the resources root.
fn best_variant_path(entry: &ResourceEntry) -> Result<String, GenerateError> {
    let sorted = variants(entry)?;
    let best = sorted
        .last()
        .ok_or_else(|| mismatch(entry, ResourceKind::Image))?;
    Ok(format!(
        "{IMAGES_DIR}/{}",
        scaled_name(&entry.property_name(), best)
    ))
}

fn copy_scaled(root: &Utf8Path, entries: &[ResourceEntry]) -> Result<Vec<Utf8PathBuf>, GenerateError> {
    let mut written = Vec::new();
    for entry in entries {
        let stem = entry.property_name();
        for variant in variants(entry)? {
            let target = root.join(IMAGES_DIR).join(scaled_name(&stem, variant));
            written.push(fs_helpers::copy_file(&variant.source, &target)?);
        }
    }
    Ok(written)
}

/// Copies variants into `drawable-<density>` directories.
#[derive(Debug, Clone, Copy, Default)]
pub struct AndroidImageEmitter;

impl ResourceEmitter for AndroidImageEmitter {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Image
    }

    fn initializer(
        &self,
        _ctx: &EmitContext<'_>,
        entry: &ResourceEntry,
    ) -> Result<String, GenerateError> {
        variants(entry)?;
        Ok(format!("ImageResource({})", android_reference("drawable", entry)))
    }

    fn write_resource_files(
        &self,
        ctx: &EmitContext<'_>,
        entries: &[ResourceEntry],
    ) -> Result<Vec<Utf8PathBuf>, GenerateError> {
        let mut written = Vec::new();
        for entry in entries {
            let name = android_name(entry);
            for variant in variants(entry)? {
                let target = ctx
                    .resources_dir()
                    .join(format!("drawable-{}", variant.density.android_qualifier()))
                    .join(format!(
                        "{name}.{}",
                        fs_helpers::extension_or_default(&variant.source)
                    ));
                written.push(fs_helpers::copy_file(&variant.source, &target)?);
            }
        }
        Ok(written)
    }
}

/// `.imageset` entries inside the asset catalog.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppleImageEmitter;

impl ResourceEmitter for AppleImageEmitter {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Image
    }

    fn initializer(
        &self,
        _ctx: &EmitContext<'_>,
        entry: &ResourceEntry,
    ) -> Result<String, GenerateError> {
        variants(entry)?;
        Ok(format!(
            "ImageResource(assetImageName = {}, bundle = __nsBundle)",
            string_literal(&entry.property_name())
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
        if entries.is_empty() {
            return Ok(Vec::new());
        }
        let mut written = vec![write_xcassets_root(ctx)?];
        for entry in entries {
            let name = entry.property_name();
            let set_dir = ctx
                .resources_dir()
                .join(XCASSETS_DIR)
                .join(format!("{name}.imageset"));
            let mut images = Vec::new();
            for variant in variants(entry)? {
                let Some(scale) = variant.density.apple_scale() else {
                    debug!(key = %entry.key, density = ?variant.density, "no Apple scale; skipping variant");
                    continue;
                };
                let file_name = format!(
                    "{name}@{scale}.{}",
                    fs_helpers::extension_or_default(&variant.source)
                );
                written.push(fs_helpers::copy_file(
                    &variant.source,
                    &set_dir.join(&file_name),
                )?);
                images.push(json!({
                    "filename": file_name,
                    "idiom": "universal",
                    "scale": scale,
                }));
            }
            let contents = json!({ "images": images, "info": xcode_info() });
            written.push(write_json(&set_dir.join("Contents.json"), &contents)?);
        }
        Ok(written)
    }
}

/// Copies variants under `images/` on the class path.
#[derive(Debug, Clone, Copy, Default)]
pub struct JvmImageEmitter;

impl ResourceEmitter for JvmImageEmitter {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Image
    }

    fn initializer(
        &self,
        _ctx: &EmitContext<'_>,
        entry: &ResourceEntry,
    ) -> Result<String, GenerateError> {
        Ok(format!(
            "ImageResource(resourcesClassLoader = resourcesClassLoader, filePath = {})",
            string_literal(&best_variant_path(entry)?)
        ))
    }

    fn write_resource_files(
        &self,
        ctx: &EmitContext<'_>,
        entries: &[ResourceEntry],
    ) -> Result<Vec<Utf8PathBuf>, GenerateError> {
        copy_scaled(ctx.resources_dir(), entries)
    }
}

/// Copies variants under `images/` for the JS bundler.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsImageEmitter;

impl ResourceEmitter for JsImageEmitter {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Image
    }

    fn initializer(
        &self,
        _ctx: &EmitContext<'_>,
        entry: &ResourceEntry,
    ) -> Result<String, GenerateError> {
        Ok(format!(
            "ImageResource(fileUrl = {})",
            string_literal(&best_variant_path(entry)?)
        ))
    }

    fn write_resource_files(
        &self,
        ctx: &EmitContext<'_>,
        entries: &[ResourceEntry],
    ) -> Result<Vec<Utf8PathBuf>, GenerateError> {
        copy_scaled(ctx.resources_dir(), entries)
    }
}
