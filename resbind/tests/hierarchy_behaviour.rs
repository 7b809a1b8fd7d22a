//! Behavioural scenarios for hierarchy resolution and regeneration.

use std::collections::BTreeMap;

use anyhow::{Context, Result, anyhow, ensure};
use resbind::metadata::file::load_ancestors;
use resbind::metadata::{GeneratorType, PropertyModifier, ResourceData, ResourceEntry, ResourceSet};
use resbind::{
    GenerationDriver, GenerationInput, GenerationReport, OutputDirs, Platform, Settings,
    SourceSetInfo,
};
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::{ScenarioState, given, scenarios, then, when};
use test_helpers::fs::{Utf8TempDir, list_tree, snapshot_tree};
use test_helpers::text::split_list;

/// A source set declared by a scenario, with its string keys.
#[derive(Debug, Clone)]
struct Declared {
    info: SourceSetInfo,
    keys: Vec<String>,
}

#[derive(Debug, Default, ScenarioState)]
struct HierarchyContext {
    workspace: Slot<Utf8TempDir>,
    declared: Slot<Vec<Declared>>,
    reports: Slot<BTreeMap<String, GenerationReport>>,
    first_run: Slot<BTreeMap<String, Vec<u8>>>,
    second_run: Slot<BTreeMap<String, Vec<u8>>>,
}

#[fixture]
fn hierarchy_context() -> HierarchyContext {
    let ctx = HierarchyContext::default();
    if let Ok(temp) = Utf8TempDir::new() {
        ctx.workspace.set(temp);
    }
    ctx
}

fn declare(ctx: &HierarchyContext, info: SourceSetInfo, keys: &str) {
    let mut declared = ctx.declared.take().unwrap_or_default();
    declared.push(Declared {
        info,
        keys: split_list(keys),
    });
    ctx.declared.set(declared);
}

fn build_root(ctx: &HierarchyContext) -> Result<camino::Utf8PathBuf> {
    ctx.workspace
        .with_ref(|temp| temp.path().join("build"))
        .ok_or_else(|| anyhow!("workspace should be initialised"))
}

fn output(build: &camino::Utf8Path, source_set: &str) -> OutputDirs {
    OutputDirs::under(&build.join(source_set))
}

/// Ancestors of `name`, most general first, without duplicates.
fn ancestors_of(declared: &[Declared], name: &str) -> Vec<String> {
    let mut ordered = Vec::new();
    let Some(entry) = declared.iter().find(|candidate| candidate.info.name == name) else {
        return ordered;
    };
    for parent in &entry.info.parents {
        for ancestor in ancestors_of(declared, parent) {
            if !ordered.contains(&ancestor) {
                ordered.push(ancestor);
            }
        }
        if !ordered.contains(parent) {
            ordered.push(parent.clone());
        }
    }
    ordered
}

fn generate_all(ctx: &HierarchyContext) -> Result<()> {
    let build = build_root(ctx)?;
    let declared = ctx.declared.get().unwrap_or_default();
    let mut reports = BTreeMap::new();
    for source_set in &declared {
        let name = &source_set.info.name;
        let resources = ResourceSet::from_entries(
            name,
            source_set.keys.iter().map(|key| {
                ResourceEntry::new(
                    key.as_str(),
                    ResourceData::String {
                        values: [("base".to_owned(), key.to_uppercase())].into_iter().collect(),
                    },
                )
            }),
        )?;
        let ancestors = load_ancestors(
            ancestors_of(&declared, name)
                .iter()
                .map(|ancestor| output(&build, ancestor).metadata_file),
        )?;
        let input = GenerationInput {
            source_set: source_set.info.clone(),
            resources,
            ancestors,
        };
        let settings = Settings::new("com.example", output(&build, name));
        let report = GenerationDriver::new(settings)
            .generate(&input)
            .with_context(|| format!("generate {name}"))?;
        reports.insert(name.clone(), report);
    }
    ctx.reports.set(reports);
    Ok(())
}

fn modifier_of(ctx: &HierarchyContext, source_set: &str, key: &str) -> Result<PropertyModifier> {
    ctx.reports
        .with_ref(|reports| {
            reports.get(source_set).and_then(|report| {
                report
                    .objects
                    .iter()
                    .filter(|object| object.generator_type == GeneratorType::Strings)
                    .find_map(|object| object.property(key))
                    .map(|property| property.modifier)
            })
        })
        .flatten()
        .ok_or_else(|| anyhow!("{source_set} does not declare {key}"))
}

#[given("a root source set \"{name}\" declaring strings \"{keys}\"")]
fn root_with_strings(hierarchy_context: &HierarchyContext, name: String, keys: String) -> Result<()> {
    declare(hierarchy_context, SourceSetInfo::new(name), &keys);
    Ok(())
}

#[given("a root source set \"{name}\" without resources")]
fn root_without_resources(hierarchy_context: &HierarchyContext, name: String) -> Result<()> {
    declare(hierarchy_context, SourceSetInfo::new(name), "");
    Ok(())
}

#[given("an intermediate source set \"{name}\" under \"{parent}\" declaring strings \"{keys}\"")]
fn intermediate_with_strings(
    hierarchy_context: &HierarchyContext,
    name: String,
    parent: String,
    keys: String,
) -> Result<()> {
    declare(
        hierarchy_context,
        SourceSetInfo::new(name).with_parents([parent]),
        &keys,
    );
    Ok(())
}

#[given(
    "a platform source set \"{name}\" for \"{platform}\" under \"{parent}\" declaring strings \"{keys}\""
)]
fn platform_with_strings(
    hierarchy_context: &HierarchyContext,
    name: String,
    platform: String,
    parent: String,
    keys: String,
) -> Result<()> {
    let platform: Platform = platform.parse()?;
    declare(
        hierarchy_context,
        SourceSetInfo::new(name)
            .with_parents([parent])
            .with_platform(platform),
        &keys,
    );
    Ok(())
}

#[given("a platform source set \"{name}\" for \"{platform}\" under \"{parent}\" without resources")]
fn platform_without_resources(
    hierarchy_context: &HierarchyContext,
    name: String,
    platform: String,
    parent: String,
) -> Result<()> {
    let platform: Platform = platform.parse()?;
    declare(
        hierarchy_context,
        SourceSetInfo::new(name)
            .with_parents([parent])
            .with_platform(platform),
        "",
    );
    Ok(())
}

#[when("the hierarchy is generated")]
fn generate_once(hierarchy_context: &HierarchyContext) -> Result<()> {
    generate_all(hierarchy_context)
}

#[when("the hierarchy is generated twice")]
fn generate_twice(hierarchy_context: &HierarchyContext) -> Result<()> {
    let build = build_root(hierarchy_context)?;
    generate_all(hierarchy_context)?;
    hierarchy_context.first_run.set(snapshot_tree(&build)?);
    generate_all(hierarchy_context)?;
    hierarchy_context.second_run.set(snapshot_tree(&build)?);
    Ok(())
}

#[then("\"{source_set}\" resolves \"{key}\" as {modifier}")]
fn resolves_as(
    hierarchy_context: &HierarchyContext,
    source_set: String,
    key: String,
    modifier: String,
) -> Result<()> {
    let expected = match modifier.as_str() {
        "override" => PropertyModifier::Override,
        "actual" => PropertyModifier::Actual,
        "none" => PropertyModifier::None,
        other => return Err(anyhow!("unknown modifier {other}")),
    };
    let actual = modifier_of(hierarchy_context, &source_set, &key)?;
    ensure!(
        actual == expected,
        "{source_set}.{key}: expected {expected:?}, got {actual:?}"
    );
    Ok(())
}

#[then("\"{source_set}\" declares \"{key}\" exactly once")]
fn declares_once(hierarchy_context: &HierarchyContext, source_set: String, key: String) -> Result<()> {
    let count = hierarchy_context
        .reports
        .with_ref(|reports| {
            reports.get(&source_set).map_or(0, |report| {
                report
                    .objects
                    .iter()
                    .flat_map(|object| &object.properties)
                    .filter(|property| property.name == key)
                    .count()
            })
        })
        .unwrap_or_default();
    ensure!(count == 1, "{source_set} declares {key} {count} times");
    Ok(())
}

#[then("both runs produce byte-identical outputs")]
fn runs_identical(hierarchy_context: &HierarchyContext) -> Result<()> {
    let first = hierarchy_context
        .first_run
        .get()
        .ok_or_else(|| anyhow!("first run missing"))?;
    let second = hierarchy_context
        .second_run
        .get()
        .ok_or_else(|| anyhow!("second run missing"))?;
    ensure!(!first.is_empty(), "first run wrote nothing");
    ensure!(first == second, "outputs differ between runs");
    Ok(())
}

#[then("no output files exist")]
fn no_outputs(hierarchy_context: &HierarchyContext) -> Result<()> {
    let build = build_root(hierarchy_context)?;
    let files = list_tree(&build)?;
    ensure!(files.is_empty(), "unexpected outputs: {files:?}");
    let all_empty = hierarchy_context
        .reports
        .with_ref(|reports| reports.values().all(GenerationReport::is_empty))
        .unwrap_or(false);
    ensure!(all_empty, "reports list written files");
    Ok(())
}

scenarios!(
    "tests/features/hierarchy.feature",
    fixtures = [hierarchy_context: HierarchyContext]
);
