//! Colour emitters.

use camino::Utf8PathBuf;
use serde_json::{Value, json};

use super::{
    EmitContext, ResourceEmitter, XCASSETS_DIR, android_name, android_reference,
    apple_bundle_member, mismatch, write_json, write_xcassets_root, xcode_info,
};
use crate::code::{Import, Member, RUNTIME_PACKAGE, string_literal};
use crate::error::GenerateError;
use crate::fs_helpers;
use crate::metadata::{ResourceData, ResourceEntry, ResourceKind, Rgba};

fn colors(entry: &ResourceEntry) -> Result<(Rgba, Option<Rgba>), GenerateError> {
    match &entry.data {
        ResourceData::Color { light, dark } => Ok((*light, *dark)),
        _ => Err(mismatch(entry, ResourceKind::Color)),
    }
}

fn android_table(rows: &[(String, Rgba)]) -> String {
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<resources>\n");
    for (name, color) in rows {
        xml.push_str(&format!(
            "    <color name=\"{name}\">{}</color>\n",
            color.to_argb_hex()
        ));
    }
    xml.push_str("</resources>\n");
    xml
}

/// `colors.xml` tables with a `values-night` variant for themed colours.
#[derive(Debug, Clone, Copy, Default)]
pub struct AndroidColorEmitter;

impl ResourceEmitter for AndroidColorEmitter {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Color
    }

    fn initializer(
        &self,
        _ctx: &EmitContext<'_>,
        entry: &ResourceEntry,
    ) -> Result<String, GenerateError> {
        colors(entry)?;
        Ok(format!("ColorResource({})", android_reference("color", entry)))
    }

    fn write_resource_files(
        &self,
        ctx: &EmitContext<'_>,
        entries: &[ResourceEntry],
    ) -> Result<Vec<Utf8PathBuf>, GenerateError> {
        let mut light_rows = Vec::with_capacity(entries.len());
        let mut dark_rows = Vec::new();
        for entry in entries {
            let (light, dark) = colors(entry)?;
            let name = android_name(entry);
            if let Some(dark) = dark {
                dark_rows.push((name.clone(), dark));
            }
            light_rows.push((name, light));
        }

        let mut written = Vec::new();
        if !light_rows.is_empty() {
            let path = ctx.resources_dir().join("values/colors.xml");
            written.push(fs_helpers::write_text(&path, &android_table(&light_rows))?);
        }
        if !dark_rows.is_empty() {
            let path = ctx.resources_dir().join("values-night/colors.xml");
            written.push(fs_helpers::write_text(&path, &android_table(&dark_rows))?);
        }
        Ok(written)
    }
}

fn colorset_entry(color: Rgba, dark: bool) -> Value {
    let mut entry = json!({
        "color": {
            "color-space": "srgb",
            "components": {
                "alpha": format!("{:.3}", f64::from(color.alpha()) / 255.0),
                "blue": format!("0x{:02X}", color.blue()),
                "green": format!("0x{:02X}", color.green()),
                "red": format!("0x{:02X}", color.red()),
            }
        },
        "idiom": "universal"
    });
    if dark && let Some(object) = entry.as_object_mut() {
        object.insert(
            "appearances".to_owned(),
            json!([{ "appearance": "luminosity", "value": "dark" }]),
        );
    }
    entry
}

/// `.colorset` entries inside the asset catalog.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppleColorEmitter;

impl ResourceEmitter for AppleColorEmitter {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Color
    }

    fn initializer(
        &self,
        _ctx: &EmitContext<'_>,
        entry: &ResourceEntry,
    ) -> Result<String, GenerateError> {
        colors(entry)?;
        Ok(format!(
            "ColorResource(name = {}, bundle = __nsBundle)",
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
            let (light, dark) = colors(entry)?;
            let mut variants = vec![colorset_entry(light, false)];
            variants.extend(dark.map(|color| colorset_entry(color, true)));
            let path = ctx
                .resources_dir()
                .join(XCASSETS_DIR)
                .join(format!("{}.colorset", entry.property_name()))
                .join("Contents.json");
            let contents = json!({ "colors": variants, "info": xcode_info() });
            written.push(write_json(&path, &contents)?);
        }
        Ok(written)
    }
}

fn literal_initializer(entry: &ResourceEntry) -> Result<String, GenerateError> {
    let literal = |color: Rgba| format!("Color(0x{:08X})", color.0);
    Ok(match colors(entry)? {
        (light, None) => format!("ColorResource.Single(color = {})", literal(light)),
        (light, Some(dark)) => format!(
            "ColorResource.Themed(light = {}, dark = {})",
            literal(light),
            literal(dark)
        ),
    })
}

fn literal_imports() -> Vec<Import> {
    vec![
        Import::runtime("ColorResource"),
        Import::new(&format!("{RUNTIME_PACKAGE}.graphics"), "Color"),
    ]
}

/// Inline colour literals; no side files.
#[derive(Debug, Clone, Copy, Default)]
pub struct JvmColorEmitter;

impl ResourceEmitter for JvmColorEmitter {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Color
    }

    fn imports(&self, _ctx: &EmitContext<'_>) -> Vec<Import> {
        literal_imports()
    }

    fn initializer(
        &self,
        _ctx: &EmitContext<'_>,
        entry: &ResourceEntry,
    ) -> Result<String, GenerateError> {
        literal_initializer(entry)
    }
}

/// Inline colour literals; no side files.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsColorEmitter;

impl ResourceEmitter for JsColorEmitter {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Color
    }

    fn imports(&self, _ctx: &EmitContext<'_>) -> Vec<Import> {
        literal_imports()
    }

    fn initializer(
        &self,
        _ctx: &EmitContext<'_>,
        entry: &ResourceEntry,
    ) -> Result<String, GenerateError> {
        literal_initializer(entry)
    }
}
