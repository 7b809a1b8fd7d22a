//! Source-set ordering, resource manifests and per-project generation.
//!
//! A resource manifest is a JSON array of entries, each carrying a `key`, a
//! `kind` and the kind's payload:
//!
//! ```json
//! [
//!   { "key": "app.name", "kind": "string", "values": { "base": "Demo", "de": "Demo DE" } },
//!   { "key": "accent", "kind": "color", "light": "#3366CC", "dark": "#112233" },
//!   { "key": "logo", "kind": "image", "variants": [ { "density": "xhdpi", "source": "img/logo@2x.png" } ] }
//! ]
//! ```
//!
//! Source paths inside a manifest are resolved against the manifest's directory.

use std::collections::BTreeSet;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use resbind::metadata::file::load_ancestors;
use resbind::metadata::{ResourceData, ResourceEntry, ResourceSet};
use resbind::{GenerationDriver, GenerationInput, GenerationReport, SourceSetInfo};
use serde::Deserialize;
use tracing::{debug, info};

use crate::config::{ProjectConfig, SourceSetConfig};
use crate::error::CliError;

#[derive(Debug, Deserialize)]
struct ManifestEntry {
    key: String,
    #[serde(flatten)]
    data: ResourceData,
}

/// Orders source sets so that every parent precedes its children.
///
/// Among source sets whose parents are all placed, declaration order wins.
///
/// # Errors
///
/// Returns [`CliError::DuplicateSourceSet`], [`CliError::UnknownParent`] or
/// [`CliError::Cycle`] when the declared hierarchy is not a DAG of known names.
pub fn generation_order(
    source_sets: &[SourceSetConfig],
) -> Result<Vec<&SourceSetConfig>, CliError> {
    let mut names = BTreeSet::new();
    for source_set in source_sets {
        if !names.insert(source_set.name.as_str()) {
            return Err(CliError::DuplicateSourceSet(source_set.name.clone()));
        }
    }
    for source_set in source_sets {
        if let Some(parent) = source_set
            .parents
            .iter()
            .find(|parent| !names.contains(parent.as_str()))
        {
            return Err(CliError::UnknownParent {
                source_set: source_set.name.clone(),
                parent: parent.clone(),
            });
        }
    }

    let mut placed = BTreeSet::new();
    let mut ordered = Vec::with_capacity(source_sets.len());
    while ordered.len() < source_sets.len() {
        let ready = source_sets.iter().find(|candidate| {
            !placed.contains(candidate.name.as_str())
                && candidate
                    .parents
                    .iter()
                    .all(|parent| placed.contains(parent.as_str()))
        });
        let Some(next) = ready else {
            return Err(CliError::Cycle(find_cycle(source_sets, &placed)));
        };
        placed.insert(next.name.as_str());
        ordered.push(next);
    }
    Ok(ordered)
}

// Every pending source set has a pending parent, so following the first one
// always revisits a name.
fn find_cycle(source_sets: &[SourceSetConfig], placed: &BTreeSet<&str>) -> Vec<String> {
    let pending = |name: &str| {
        source_sets
            .iter()
            .find(|candidate| candidate.name == name && !placed.contains(name))
    };
    let mut path: Vec<String> = Vec::new();
    let mut current = source_sets
        .iter()
        .find(|candidate| !placed.contains(candidate.name.as_str()));
    while let Some(source_set) = current {
        if let Some(start) = path.iter().position(|name| *name == source_set.name) {
            let mut cycle = path.split_off(start);
            cycle.push(source_set.name.clone());
            return cycle;
        }
        path.push(source_set.name.clone());
        current = source_set
            .parents
            .iter()
            .find_map(|parent| pending(parent));
    }
    path
}

/// Transitive ancestors of `name`, most general first, without duplicates.
#[must_use]
pub fn ancestors<'a>(source_sets: &'a [SourceSetConfig], name: &str) -> Vec<&'a str> {
    let mut ordered = Vec::new();
    collect_ancestors(source_sets, name, &mut ordered);
    ordered
}

fn collect_ancestors<'a>(source_sets: &'a [SourceSetConfig], name: &str, ordered: &mut Vec<&'a str>) {
    let Some(source_set) = source_sets.iter().find(|candidate| candidate.name == name) else {
        return;
    };
    for parent in &source_set.parents {
        if ordered.contains(&parent.as_str()) {
            continue;
        }
        collect_ancestors(source_sets, parent, ordered);
        if !ordered.contains(&parent.as_str()) {
            ordered.push(parent.as_str());
        }
    }
}

/// Reads the resource manifest at `path` for `source_set`.
///
/// # Errors
///
/// Returns [`CliError::Io`] when the file cannot be read,
/// [`CliError::Manifest`] when it is not a valid manifest, and
/// [`CliError::Resolve`] when two entries share a property name.
pub fn load_manifest(path: &Utf8Path, source_set: &str) -> Result<ResourceSet, CliError> {
    let text = read_text(path)?;
    let entries: Vec<ManifestEntry> =
        serde_json::from_str(&text).map_err(|source| CliError::Manifest {
            path: path.to_owned(),
            source,
        })?;
    let base = path.parent().unwrap_or_else(|| Utf8Path::new(""));
    let entries = entries
        .into_iter()
        .map(|entry| ResourceEntry::new(entry.key, relative_to(base, entry.data)));
    Ok(ResourceSet::from_entries(source_set, entries)?)
}

fn relative_to(base: &Utf8Path, data: ResourceData) -> ResourceData {
    let anchor = |source: Utf8PathBuf| {
        if source.is_absolute() {
            source
        } else {
            base.join(source)
        }
    };
    match data {
        ResourceData::Asset { path, source } => ResourceData::Asset {
            path,
            source: anchor(source),
        },
        ResourceData::Font { source } => ResourceData::Font {
            source: anchor(source),
        },
        ResourceData::Image { mut variants } => {
            for variant in &mut variants {
                variant.source = anchor(std::mem::take(&mut variant.source));
            }
            ResourceData::Image { variants }
        }
        other => other,
    }
}

fn read_text(path: &Utf8Path) -> Result<String, CliError> {
    let io_error = |source| CliError::Io {
        path: path.to_owned(),
        source,
    };
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let file_name = path.file_name().ok_or_else(|| {
        io_error(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "manifest path has no file name",
        ))
    })?;
    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(io_error)?;
    dir.read_to_string(file_name).map_err(io_error)
}

/// Generates every source set of `config` in hierarchy order.
///
/// When `only` is non-empty, the remaining source sets are skipped; their
/// previously written metadata still feeds their descendants.
///
/// # Errors
///
/// Returns [`CliError::UnknownSourceSet`] when `only` names an undeclared
/// source set, the ordering errors of [`generation_order`], manifest errors
/// of [`load_manifest`], and any [`resbind::GenerateError`] raised by the
/// driver.
pub fn generate(
    config: &ProjectConfig,
    only: &[String],
) -> Result<Vec<GenerationReport>, CliError> {
    let ordered = generation_order(&config.source_sets)?;
    if let Some(unknown) = only
        .iter()
        .find(|name| !ordered.iter().any(|source_set| source_set.name == **name))
    {
        return Err(CliError::UnknownSourceSet(unknown.clone()));
    }

    let mut reports = Vec::new();
    for source_set in ordered {
        if !only.is_empty() && !only.contains(&source_set.name) {
            debug!(source_set = %source_set.name, "skipping source set");
            continue;
        }
        reports.push(generate_one(config, source_set)?);
    }
    info!(
        source_sets = reports.len(),
        files = reports.iter().map(written_files).sum::<usize>(),
        "project generated"
    );
    Ok(reports)
}

fn generate_one(
    config: &ProjectConfig,
    source_set: &SourceSetConfig,
) -> Result<GenerationReport, CliError> {
    let resources = match &source_set.resources {
        Some(manifest) => load_manifest(manifest, &source_set.name)?,
        None => ResourceSet::new(),
    };
    let ancestor_names = ancestors(&config.source_sets, &source_set.name);
    let ancestors = load_ancestors(
        ancestor_names
            .iter()
            .map(|name| config.output_dirs(name).metadata_file),
    )?;
    let mut info = SourceSetInfo::new(source_set.name.as_str())
        .with_parents(source_set.parents.iter().map(String::as_str));
    if let Some(platform) = source_set.platform {
        info = info.with_platform(platform);
    }
    let input = GenerationInput {
        source_set: info,
        resources,
        ancestors,
    };
    Ok(GenerationDriver::new(config.settings_for(&source_set.name)).generate(&input)?)
}

fn written_files(report: &GenerationReport) -> usize {
    usize::from(report.source_file.is_some())
        + report.resource_files.len()
        + usize::from(report.metadata_file.is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use resbind::Platform;
    use resbind::metadata::{Density, ResourceKind};
    use rstest::rstest;
    use test_helpers::fs::Utf8TempDir;

    fn source_set(name: &str, parents: &[&str]) -> SourceSetConfig {
        SourceSetConfig {
            name: name.to_owned(),
            parents: parents.iter().map(|parent| (*parent).to_owned()).collect(),
            platform: None,
            resources: None,
        }
    }

    fn names<'a>(ordered: &[&'a SourceSetConfig]) -> Vec<&'a str> {
        ordered.iter().map(|source_set| source_set.name.as_str()).collect()
    }

    #[rstest]
    fn parents_precede_children_and_ties_keep_declaration_order() {
        let declared = [
            source_set("iosMain", &["appleMain"]),
            source_set("commonMain", &[]),
            source_set("androidMain", &["commonMain"]),
            source_set("appleMain", &["commonMain"]),
        ];

        let ordered = generation_order(&declared).expect("order");

        assert_eq!(
            names(&ordered),
            ["commonMain", "androidMain", "appleMain", "iosMain"]
        );
    }

    #[rstest]
    #[case::self_loop(vec![source_set("a", &["a"])], vec!["a", "a"])]
    #[case::pair(
        vec![source_set("root", &[]), source_set("a", &["b"]), source_set("b", &["a"])],
        vec!["a", "b", "a"]
    )]
    fn cycles_are_reported_with_their_path(
        #[case] declared: Vec<SourceSetConfig>,
        #[case] expected: Vec<&str>,
    ) {
        let err = generation_order(&declared).expect_err("cycle");
        assert!(matches!(err, CliError::Cycle(path) if path == expected));
    }

    #[rstest]
    fn unknown_parent_is_rejected() {
        let declared = [source_set("iosMain", &["appleMain"])];
        let err = generation_order(&declared).expect_err("unknown parent");
        assert!(matches!(
            err,
            CliError::UnknownParent { ref source_set, ref parent }
                if source_set == "iosMain" && parent == "appleMain"
        ));
    }

    #[rstest]
    fn duplicate_names_are_rejected() {
        let declared = [source_set("commonMain", &[]), source_set("commonMain", &[])];
        assert!(matches!(
            generation_order(&declared),
            Err(CliError::DuplicateSourceSet(name)) if name == "commonMain"
        ));
    }

    #[rstest]
    fn ancestors_are_general_first_without_duplicates() {
        let declared = [
            source_set("commonMain", &[]),
            source_set("appleMain", &["commonMain"]),
            source_set("nativeMain", &["commonMain"]),
            source_set("iosMain", &["appleMain", "nativeMain"]),
        ];

        assert_eq!(
            ancestors(&declared, "iosMain"),
            ["commonMain", "appleMain", "nativeMain"]
        );
        assert!(ancestors(&declared, "commonMain").is_empty());
    }

    #[rstest]
    fn manifest_sources_resolve_against_manifest_directory() {
        let temp = Utf8TempDir::new().expect("temp dir");
        let manifest = temp.path().join("res/manifest.json");
        std::fs::create_dir_all(temp.path().join("res")).expect("mkdir");
        std::fs::write(
            &manifest,
            r#"[
                {"key": "app.name", "kind": "string", "values": {"base": "Demo"}},
                {"key": "inter", "kind": "font", "source": "fonts/Inter.ttf"},
                {"key": "logo", "kind": "image", "variants": [{"density": "xhdpi", "source": "img/logo.png"}]}
            ]"#,
        )
        .expect("write manifest");

        let set = load_manifest(&manifest, "commonMain").expect("manifest");

        for kind in [ResourceKind::String, ResourceKind::Font, ResourceKind::Image] {
            assert_eq!(set.of_kind(kind).count(), 1, "{kind:?}");
        }
        assert!(matches!(
            &set.of_kind(ResourceKind::Font).next().expect("font").data,
            ResourceData::Font { source } if *source == temp.path().join("res/fonts/Inter.ttf")
        ));
        assert!(matches!(
            &set.of_kind(ResourceKind::Image).next().expect("image").data,
            ResourceData::Image { variants }
                if variants.first().is_some_and(|variant| variant.density == Density::Xhdpi
                    && variant.source == temp.path().join("res/img/logo.png"))
        ));
    }

    #[rstest]
    #[case::malformed("{not json", "parse")]
    #[case::duplicate(
        r#"[{"key": "a.b", "kind": "string", "values": {}}, {"key": "a_b", "kind": "string", "values": {}}]"#,
        "duplicate"
    )]
    fn invalid_manifests_are_rejected(#[case] content: &str, #[case] expected: &str) {
        let temp = Utf8TempDir::new().expect("temp dir");
        let manifest = temp.path().join("manifest.json");
        std::fs::write(&manifest, content).expect("write manifest");

        let err = load_manifest(&manifest, "commonMain").expect_err("invalid manifest");

        match expected {
            "parse" => assert!(matches!(err, CliError::Manifest { .. })),
            _ => assert!(matches!(err, CliError::Resolve(_))),
        }
    }

    #[rstest]
    fn unknown_selected_source_set_is_rejected() {
        let config = ProjectConfig {
            package_name: "com.example".to_owned(),
            source_sets: vec![SourceSetConfig {
                platform: Some(Platform::Jvm),
                ..source_set("jvmMain", &[])
            }],
            ..ProjectConfig::default()
        };

        let err = generate(&config, &["iosMain".to_owned()]).expect_err("unknown");

        assert!(matches!(err, CliError::UnknownSourceSet(name) if name == "iosMain"));
    }
}
