//! String resource emitters.

use std::collections::BTreeMap;
use std::str::FromStr;

use camino::Utf8PathBuf;
use tracing::debug;
use unic_langid::LanguageIdentifier;

use super::{
    EmitContext, ResourceEmitter, android_name, android_reference, apple_bundle_member, mismatch,
    write_json,
};
use crate::code::{Member, string_literal};
use crate::error::GenerateError;
use crate::escape;
use crate::fs_helpers;
use crate::locale::{LanguageType, group_by_locale};
use crate::metadata::{GeneratorType, ResourceData, ResourceEntry, ResourceKind};

fn values(entry: &ResourceEntry) -> Result<&BTreeMap<String, String>, GenerateError> {
    match &entry.data {
        ResourceData::String { values } => Ok(values),
        _ => Err(mismatch(entry, ResourceKind::String)),
    }
}

fn keyed_values(
    entries: &[ResourceEntry],
) -> Result<Vec<(&str, &BTreeMap<String, String>)>, GenerateError> {
    entries
        .iter()
        .map(|entry| Ok((entry.key.as_str(), values(entry)?)))
        .collect()
}

/// Locale directories that receive a copy of the base table on Apple targets.
///
/// The copy is skipped when the resources define the region explicitly.
pub(crate) fn apple_region_copy(
    ctx: &EmitContext<'_>,
    locales: &[&LanguageType],
) -> Result<Option<String>, GenerateError> {
    let region = &ctx.settings.base_localization_region;
    let id = LanguageIdentifier::from_str(region).map_err(|err| {
        GenerateError::config("base_localization_region", format!("'{region}': {err}"))
    })?;
    let explicit = locales
        .iter()
        .any(|language| matches!(language, LanguageType::Locale(existing) if *existing == id));
    if explicit {
        debug!(region = %id, "base region defined explicitly; skipping copy");
        return Ok(None);
    }
    Ok(Some(LanguageType::Locale(id).apple_resources_dir()))
}

/// `strings.xml` tables under `values*` directories.
#[derive(Debug, Clone, Copy, Default)]
pub struct AndroidStringEmitter;

impl ResourceEmitter for AndroidStringEmitter {
    fn kind(&self) -> ResourceKind {
        ResourceKind::String
    }

    fn initializer(
        &self,
        _ctx: &EmitContext<'_>,
        entry: &ResourceEntry,
    ) -> Result<String, GenerateError> {
        values(entry)?;
        Ok(format!(
            "StringResource({})",
            android_reference("string", entry)
        ))
    }

    fn write_resource_files(
        &self,
        ctx: &EmitContext<'_>,
        entries: &[ResourceEntry],
    ) -> Result<Vec<Utf8PathBuf>, GenerateError> {
        let named = entries
            .iter()
            .map(|entry| Ok((android_name(entry), values(entry)?)))
            .collect::<Result<Vec<_>, GenerateError>>()?;
        let grouped = group_by_locale(named.iter().map(|(name, map)| (name.as_str(), *map)))?;
        let strict = ctx.settings.strict_line_breaks;

        let mut written = Vec::with_capacity(grouped.len());
        for (language, rows) in grouped {
            let mut xml = String::from("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<resources>\n");
            for (name, value) in rows {
                xml.push_str(&format!(
                    "    <string name=\"{name}\">{}</string>\n",
                    escape::android_string(value, strict)
                ));
            }
            xml.push_str("</resources>\n");
            let path = ctx
                .resources_dir()
                .join(language.android_values_dir())
                .join("strings.xml");
            written.push(fs_helpers::write_text(&path, &xml)?);
        }
        Ok(written)
    }
}

/// `Localizable.strings` tables inside `.lproj` directories.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppleStringEmitter;

impl ResourceEmitter for AppleStringEmitter {
    fn kind(&self) -> ResourceKind {
        ResourceKind::String
    }

    fn initializer(
        &self,
        _ctx: &EmitContext<'_>,
        entry: &ResourceEntry,
    ) -> Result<String, GenerateError> {
        values(entry)?;
        Ok(format!(
            "StringResource(resourceId = {}, bundle = __nsBundle)",
            string_literal(&entry.key)
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
        let grouped = group_by_locale(keyed_values(entries)?)?;
        let locales: Vec<&LanguageType> = grouped.iter().map(|(language, _)| language).collect();
        let region_copy = apple_region_copy(ctx, &locales)?;

        let mut written = Vec::new();
        for (language, rows) in &grouped {
            let content = rows
                .iter()
                .map(|(key, value)| format!("\"{key}\" = \"{}\";", escape::apple_string(value)))
                .collect::<Vec<_>>()
                .join("\n");
            let mut dirs = vec![language.apple_resources_dir()];
            if language.is_base() {
                dirs.extend(region_copy.clone());
            }
            for dir in dirs {
                let path = ctx.resources_dir().join(dir).join("Localizable.strings");
                written.push(fs_helpers::write_text(&path, &content)?);
            }
        }
        Ok(written)
    }
}

/// `.properties` resource bundles loaded through the class loader.
#[derive(Debug, Clone, Copy, Default)]
pub struct JvmStringEmitter;

impl ResourceEmitter for JvmStringEmitter {
    fn kind(&self) -> ResourceKind {
        ResourceKind::String
    }

    fn initializer(
        &self,
        ctx: &EmitContext<'_>,
        entry: &ResourceEntry,
    ) -> Result<String, GenerateError> {
        values(entry)?;
        Ok(format!(
            "StringResource(resourcesClassLoader = resourcesClassLoader, bundleName = {}, key = {})",
            string_literal(&ctx.localization_table(GeneratorType::Strings)),
            string_literal(&entry.key)
        ))
    }

    fn write_resource_files(
        &self,
        ctx: &EmitContext<'_>,
        entries: &[ResourceEntry],
    ) -> Result<Vec<Utf8PathBuf>, GenerateError> {
        let table = ctx.localization_table(GeneratorType::Strings);
        let mut written = Vec::new();
        for (language, rows) in group_by_locale(keyed_values(entries)?)? {
            let content: String = rows
                .iter()
                .map(|(key, value)| format!("{key}={}\n", escape::properties_value(value)))
                .collect();
            let path = ctx
                .resources_dir()
                .join(format!("{table}{}.properties", language.jvm_bundle_suffix()));
            written.push(fs_helpers::write_text(&path, &content)?);
        }
        Ok(written)
    }
}

/// JSON localisation tables fetched by the JS runtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsStringEmitter;

impl ResourceEmitter for JsStringEmitter {
    fn kind(&self) -> ResourceKind {
        ResourceKind::String
    }

    fn initializer(
        &self,
        ctx: &EmitContext<'_>,
        entry: &ResourceEntry,
    ) -> Result<String, GenerateError> {
        values(entry)?;
        Ok(format!(
            "StringResource(key = {}, localizationTable = {})",
            string_literal(&entry.key),
            string_literal(&ctx.localization_table(GeneratorType::Strings))
        ))
    }

    fn write_resource_files(
        &self,
        ctx: &EmitContext<'_>,
        entries: &[ResourceEntry],
    ) -> Result<Vec<Utf8PathBuf>, GenerateError> {
        let table = ctx.localization_table(GeneratorType::Strings);
        let mut written = Vec::new();
        for (language, rows) in group_by_locale(keyed_values(entries)?)? {
            let object: serde_json::Map<String, serde_json::Value> = rows
                .into_iter()
                .map(|(key, value)| {
                    (
                        key.to_owned(),
                        serde_json::Value::String(escape::unescape_xml(value)),
                    )
                })
                .collect();
            let path = ctx
                .resources_dir()
                .join(format!("{table}{}.json", language.js_file_suffix()));
            written.push(write_json(&path, &serde_json::Value::Object(object))?);
        }
        Ok(written)
    }
}
