//! Plural resource emitters.

use std::collections::BTreeMap;

use camino::Utf8PathBuf;

use super::string::apple_region_copy;
use super::{
    EmitContext, ResourceEmitter, android_name, android_reference, apple_bundle_member, mismatch,
    write_json,
};
use crate::code::{Member, string_literal};
use crate::error::GenerateError;
use crate::escape;
use crate::fs_helpers;
use crate::locale::{LanguageType, group_by_locale};
use crate::metadata::{GeneratorType, PluralForms, ResourceData, ResourceEntry, ResourceKind};

fn forms(entry: &ResourceEntry) -> Result<&BTreeMap<String, PluralForms>, GenerateError> {
    match &entry.data {
        ResourceData::Plural { values } => Ok(values),
        _ => Err(mismatch(entry, ResourceKind::Plural)),
    }
}

fn keyed_forms(
    entries: &[ResourceEntry],
) -> Result<Vec<(&str, &BTreeMap<String, PluralForms>)>, GenerateError> {
    entries
        .iter()
        .map(|entry| Ok((entry.key.as_str(), forms(entry)?)))
        .collect()
}

/// `plurals.xml` tables under `values*` directories.
#[derive(Debug, Clone, Copy, Default)]
pub struct AndroidPluralEmitter;

impl ResourceEmitter for AndroidPluralEmitter {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Plural
    }

    fn initializer(
        &self,
        _ctx: &EmitContext<'_>,
        entry: &ResourceEntry,
    ) -> Result<String, GenerateError> {
        forms(entry)?;
        Ok(format!(
            "PluralsResource({})",
            android_reference("plurals", entry)
        ))
    }

    fn write_resource_files(
        &self,
        ctx: &EmitContext<'_>,
        entries: &[ResourceEntry],
    ) -> Result<Vec<Utf8PathBuf>, GenerateError> {
        let named = entries
            .iter()
            .map(|entry| Ok((android_name(entry), forms(entry)?)))
            .collect::<Result<Vec<_>, GenerateError>>()?;
        let grouped = group_by_locale(named.iter().map(|(name, map)| (name.as_str(), *map)))?;
        let strict = ctx.settings.strict_line_breaks;

        let mut written = Vec::new();
        for (language, rows) in grouped {
            let mut xml = String::from("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<resources>\n");
            for (name, plural) in rows {
                xml.push_str(&format!("    <plurals name=\"{name}\">\n"));
                for (quantity, text) in plural.iter() {
                    xml.push_str(&format!(
                        "        <item quantity=\"{}\">{}</item>\n",
                        quantity.as_str(),
                        escape::android_string(text, strict)
                    ));
                }
                xml.push_str("    </plurals>\n");
            }
            xml.push_str("</resources>\n");
            let path = ctx
                .resources_dir()
                .join(language.android_values_dir())
                .join("plurals.xml");
            written.push(fs_helpers::write_text(&path, &xml)?);
        }
        Ok(written)
    }
}

/// `Localizable.stringsdict` property lists inside `.lproj` directories.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApplePluralEmitter;

const PLIST_HEADER: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>
<!DOCTYPE plist PUBLIC \"-//Apple//DTD PLIST 1.0//EN\" \"http://www.apple.com/DTDs/PropertyList-1.0.dtd\">
<plist version=\"1.0\">
<dict>
";

fn stringsdict(rows: &[(&str, &PluralForms)]) -> String {
    let mut plist = String::from(PLIST_HEADER);
    for (key, plural) in rows {
        plist.push_str(&format!("    <key>{}</key>\n    <dict>\n", escape::xml_text(key)));
        plist.push_str("        <key>NSStringLocalizedFormatKey</key>\n");
        plist.push_str("        <string>%#@value@</string>\n");
        plist.push_str("        <key>value</key>\n        <dict>\n");
        plist.push_str("            <key>NSStringFormatSpecTypeKey</key>\n");
        plist.push_str("            <string>NSStringPluralRuleType</string>\n");
        plist.push_str("            <key>NSStringFormatValueTypeKey</key>\n");
        plist.push_str("            <string>d</string>\n");
        for (quantity, text) in plural.iter() {
            plist.push_str(&format!(
                "            <key>{}</key>\n            <string>{}</string>\n",
                quantity.as_str(),
                escape::xml_text(&escape::unescape_xml(text))
            ));
        }
        plist.push_str("        </dict>\n    </dict>\n");
    }
    plist.push_str("</dict>\n</plist>\n");
    plist
}

impl ResourceEmitter for ApplePluralEmitter {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Plural
    }

    fn initializer(
        &self,
        _ctx: &EmitContext<'_>,
        entry: &ResourceEntry,
    ) -> Result<String, GenerateError> {
        forms(entry)?;
        Ok(format!(
            "PluralsResource(resourceId = {}, bundle = __nsBundle)",
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
        let grouped = group_by_locale(keyed_forms(entries)?)?;
        let locales: Vec<&LanguageType> = grouped.iter().map(|(language, _)| language).collect();
        let region_copy = apple_region_copy(ctx, &locales)?;

        let mut written = Vec::new();
        for (language, rows) in &grouped {
            let content = stringsdict(rows);
            let mut dirs = vec![language.apple_resources_dir()];
            if language.is_base() {
                dirs.extend(region_copy.clone());
            }
            for dir in dirs {
                let path = ctx
                    .resources_dir()
                    .join(dir)
                    .join("Localizable.stringsdict");
                written.push(fs_helpers::write_text(&path, &content)?);
            }
        }
        Ok(written)
    }
}

/// `.properties` bundles with one `key.quantity` row per form.
#[derive(Debug, Clone, Copy, Default)]
pub struct JvmPluralEmitter;

impl ResourceEmitter for JvmPluralEmitter {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Plural
    }

    fn initializer(
        &self,
        ctx: &EmitContext<'_>,
        entry: &ResourceEntry,
    ) -> Result<String, GenerateError> {
        forms(entry)?;
        Ok(format!(
            "PluralsResource(resourcesClassLoader = resourcesClassLoader, bundleName = {}, key = {})",
            string_literal(&ctx.localization_table(GeneratorType::Plurals)),
            string_literal(&entry.key)
        ))
    }

    fn write_resource_files(
        &self,
        ctx: &EmitContext<'_>,
        entries: &[ResourceEntry],
    ) -> Result<Vec<Utf8PathBuf>, GenerateError> {
        let table = ctx.localization_table(GeneratorType::Plurals);
        let mut written = Vec::new();
        for (language, rows) in group_by_locale(keyed_forms(entries)?)? {
            let mut content = String::new();
            for (key, plural) in rows {
                for (quantity, text) in plural.iter() {
                    content.push_str(&format!(
                        "{key}.{}={}\n",
                        quantity.as_str(),
                        escape::properties_value(text)
                    ));
                }
            }
            let path = ctx
                .resources_dir()
                .join(format!("{table}{}.properties", language.jvm_bundle_suffix()));
            written.push(fs_helpers::write_text(&path, &content)?);
        }
        Ok(written)
    }
}

/// JSON tables mapping each key to its quantity forms.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsPluralEmitter;

impl ResourceEmitter for JsPluralEmitter {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Plural
    }

    fn initializer(
        &self,
        ctx: &EmitContext<'_>,
        entry: &ResourceEntry,
    ) -> Result<String, GenerateError> {
        forms(entry)?;
        Ok(format!(
            "PluralsResource(key = {}, localizationTable = {})",
            string_literal(&entry.key),
            string_literal(&ctx.localization_table(GeneratorType::Plurals))
        ))
    }

    fn write_resource_files(
        &self,
        ctx: &EmitContext<'_>,
        entries: &[ResourceEntry],
    ) -> Result<Vec<Utf8PathBuf>, GenerateError> {
        let table = ctx.localization_table(GeneratorType::Plurals);
        let mut written = Vec::new();
        for (language, rows) in group_by_locale(keyed_forms(entries)?)? {
            let object: serde_json::Map<String, serde_json::Value> = rows
                .into_iter()
                .map(|(key, plural)| {
                    let quantities: serde_json::Map<String, serde_json::Value> = plural
                        .iter()
                        .map(|(quantity, text)| {
                            (
                                quantity.as_str().to_owned(),
                                serde_json::Value::String(escape::unescape_xml(text)),
                            )
                        })
                        .collect();
                    (key.to_owned(), serde_json::Value::Object(quantities))
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{OutputDirs, Settings};
    use rstest::rstest;
    use test_helpers::fs::Utf8TempDir;

    fn items() -> ResourceEntry {
        ResourceEntry::new(
            "cart.items",
            ResourceData::Plural {
                values: BTreeMap::from([(
                    "base".to_owned(),
                    PluralForms {
                        one: Some("%d item".to_owned()),
                        ..PluralForms::other("%d items")
                    },
                )]),
            },
        )
    }

    #[rstest]
    fn android_plurals_list_quantities_in_order() {
        let temp = Utf8TempDir::new().expect("temp dir");
        let settings = Settings::new("app", OutputDirs::under(temp.path()));
        let ctx = EmitContext::new(&settings, "androidMain");

        AndroidPluralEmitter
            .write_resource_files(&ctx, &[items()])
            .expect("write plurals");

        let xml = fs_helpers::read_optional_text(&settings.output.resources.join("values/plurals.xml"))
            .expect("read")
            .expect("plurals.xml exists");
        assert_eq!(
            xml,
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<resources>\n    <plurals name=\"cart_items\">\n        <item quantity=\"one\">%d item</item>\n        <item quantity=\"other\">%d items</item>\n    </plurals>\n</resources>\n"
        );
    }

    #[rstest]
    fn apple_stringsdict_is_copied_to_region() {
        let temp = Utf8TempDir::new().expect("temp dir");
        let settings = Settings::new("app", OutputDirs::under(temp.path()));
        let ctx = EmitContext::new(&settings, "iosMain");

        let written = ApplePluralEmitter
            .write_resource_files(&ctx, &[items()])
            .expect("write stringsdict");

        let relative: Vec<_> = written
            .iter()
            .map(|path| {
                path.strip_prefix(&settings.output.resources)
                    .expect("under resources")
                    .as_str()
                    .to_owned()
            })
            .collect();
        assert_eq!(
            relative,
            vec![
                "Base.lproj/Localizable.stringsdict",
                "en.lproj/Localizable.stringsdict"
            ]
        );
        let base = written.first().expect("base table written");
        let plist = fs_helpers::read_optional_text(base)
            .expect("read")
            .expect("stringsdict exists");
        assert!(plist.contains("<key>cart.items</key>"));
        assert!(plist.contains("<key>one</key>\n            <string>%d item</string>"));
    }

    #[rstest]
    fn jvm_plurals_flatten_quantities() {
        let temp = Utf8TempDir::new().expect("temp dir");
        let settings = Settings::new("app", OutputDirs::under(temp.path()));
        let ctx = EmitContext::new(&settings, "jvmMain");

        JvmPluralEmitter
            .write_resource_files(&ctx, &[items()])
            .expect("write properties");

        let content = fs_helpers::read_optional_text(
            &settings
                .output
                .resources
                .join("localization/MRPlurals.properties"),
        )
        .expect("read")
        .expect("properties exist");
        assert_eq!(content, "cart.items.one=%d item\ncart.items.other=%d items\n");
    }
}
