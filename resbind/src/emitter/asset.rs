//! Raw asset emitters: files are copied verbatim under an `assets` root.

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};

use super::{EmitContext, ResourceEmitter, apple_bundle_member, mismatch};
use crate::code::{Member, string_literal};
use crate::error::GenerateError;
use crate::fs_helpers;
use crate::metadata::{ResourceData, ResourceEntry, ResourceKind};

const ASSETS_DIR: &str = "assets";

fn asset(entry: &ResourceEntry) -> Result<(&Utf8Path, &Utf8Path), GenerateError> {
    match &entry.data {
        ResourceData::Asset { path, source } => {
            let escapes_root = path
                .components()
                .any(|component| !matches!(component, Utf8Component::Normal(_)));
            if escapes_root || path.as_str().is_empty() {
                return Err(GenerateError::config(
                    "resources",
                    format!("asset '{}' must use a relative path, got '{path}'", entry.key),
                ));
            }
            Ok((path, source))
        }
        _ => Err(mismatch(entry, ResourceKind::Asset)),
    }
}

/// Path of an asset inside a packaged `assets` directory, with `/` separators.
fn packaged_path(path: &Utf8Path) -> String {
    let segments: Vec<&str> = path.components().map(|component| component.as_str()).collect();
    format!("{ASSETS_DIR}/{}", segments.join("/"))
}

fn copy_all(
    root: &Utf8Path,
    entries: &[ResourceEntry],
) -> Result<Vec<Utf8PathBuf>, GenerateError> {
    entries
        .iter()
        .map(|entry| {
            let (path, source) = asset(entry)?;
            fs_helpers::copy_file(source, &root.join(path))
        })
        .collect()
}

/// Copies assets into the Android `assets` source directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct AndroidAssetEmitter;

impl ResourceEmitter for AndroidAssetEmitter {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Asset
    }

    fn initializer(
        &self,
        _ctx: &EmitContext<'_>,
        entry: &ResourceEntry,
    ) -> Result<String, GenerateError> {
        let (path, _) = asset(entry)?;
        Ok(format!("AssetResource(path = {})", string_literal(path.as_str())))
    }

    fn write_resource_files(
        &self,
        ctx: &EmitContext<'_>,
        entries: &[ResourceEntry],
    ) -> Result<Vec<Utf8PathBuf>, GenerateError> {
        copy_all(ctx.assets_dir(), entries)
    }
}

/// Copies assets into the bundle resources.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppleAssetEmitter;

impl ResourceEmitter for AppleAssetEmitter {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Asset
    }

    fn initializer(
        &self,
        _ctx: &EmitContext<'_>,
        entry: &ResourceEntry,
    ) -> Result<String, GenerateError> {
        let (path, _) = asset(entry)?;
        Ok(format!(
            "AssetResource(path = {}, bundle = __nsBundle)",
            string_literal(&packaged_path(path))
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
        copy_all(&ctx.resources_dir().join(ASSETS_DIR), entries)
    }
}

/// Copies assets next to the class-loader resources.
#[derive(Debug, Clone, Copy, Default)]
pub struct JvmAssetEmitter;

impl ResourceEmitter for JvmAssetEmitter {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Asset
    }

    fn initializer(
        &self,
        _ctx: &EmitContext<'_>,
        entry: &ResourceEntry,
    ) -> Result<String, GenerateError> {
        let (path, _) = asset(entry)?;
        Ok(format!(
            "AssetResource(resourcesClassLoader = resourcesClassLoader, path = {})",
            string_literal(&packaged_path(path))
        ))
    }

    fn write_resource_files(
        &self,
        ctx: &EmitContext<'_>,
        entries: &[ResourceEntry],
    ) -> Result<Vec<Utf8PathBuf>, GenerateError> {
        copy_all(&ctx.resources_dir().join(ASSETS_DIR), entries)
    }
}

/// Copies assets for the JS bundler to serve.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsAssetEmitter;

impl ResourceEmitter for JsAssetEmitter {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Asset
    }

    fn initializer(
        &self,
        _ctx: &EmitContext<'_>,
        entry: &ResourceEntry,
    ) -> Result<String, GenerateError> {
        let (path, _) = asset(entry)?;
        Ok(format!(
            "AssetResource(originalPath = {}, fileUrl = {})",
            string_literal(path.as_str()),
            string_literal(&packaged_path(path))
        ))
    }

    fn write_resource_files(
        &self,
        ctx: &EmitContext<'_>,
        entries: &[ResourceEntry],
    ) -> Result<Vec<Utf8PathBuf>, GenerateError> {
        copy_all(&ctx.resources_dir().join(ASSETS_DIR), entries)
    }
}
