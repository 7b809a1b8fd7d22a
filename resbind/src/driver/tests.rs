//! Unit tests for the generation driver.

use std::cell::RefCell;
use std::rc::Rc;

use camino::Utf8Path;
use rstest::{fixture, rstest};
use test_helpers::fs::Utf8TempDir;

use super::*;
use crate::code::TypeDecl;
use crate::error::ResolveError;
use crate::metadata::{PropertyModifier, ResourceData, ResourceEntry};
use crate::settings::OutputDirs;

fn string(key: &str, text: &str) -> ResourceEntry {
    ResourceEntry::new(
        key,
        ResourceData::String {
            values: [("base".to_owned(), text.to_owned())].into_iter().collect(),
        },
    )
}

fn strings(source_set: &str, keys: &[&str]) -> ResourceSet {
    ResourceSet::from_entries(source_set, keys.iter().map(|key| string(key, key)))
        .expect("unique keys")
}

struct Workspace {
    temp: Utf8TempDir,
}

impl Workspace {
    fn settings(&self, source_set: &str) -> Settings {
        Settings::new(
            "com.example",
            OutputDirs::under(&self.temp.path().join(source_set)),
        )
    }

    fn driver(&self, source_set: &str) -> GenerationDriver {
        GenerationDriver::new(self.settings(source_set))
    }
}

#[fixture]
fn workspace() -> Workspace {
    Workspace {
        temp: Utf8TempDir::new().expect("temp dir"),
    }
}

fn generate_common(workspace: &Workspace, keys: &[&str]) -> GenerationReport {
    let input = GenerationInput {
        source_set: SourceSetInfo::new("commonMain"),
        resources: strings("commonMain", keys),
        ancestors: MetadataArena::new(),
    };
    workspace
        .driver("commonMain")
        .generate(&input)
        .expect("generate commonMain")
}

fn nested<'a>(file: &'a GeneratedFile, name: &str) -> &'a TypeDecl {
    file.container
        .as_ref()
        .and_then(|container| container.objects.iter().find(|object| object.name == name))
        .expect("nested object")
}

#[rstest]
#[case::root(SourceSetInfo::new("commonMain"), SourceSetRole::Root)]
#[case::intermediate(
    SourceSetInfo::new("appleMain").with_parents(["commonMain"]),
    SourceSetRole::Intermediate
)]
#[case::platform(
    SourceSetInfo::new("iosMain").with_parents(["appleMain"]).with_platform(Platform::Apple),
    SourceSetRole::Platform(Platform::Apple)
)]
#[case::standalone_platform(
    SourceSetInfo::new("jvmMain").with_platform(Platform::Jvm),
    SourceSetRole::Platform(Platform::Jvm)
)]
fn role_follows_parents_and_platform(#[case] info: SourceSetInfo, #[case] expected: SourceSetRole) {
    assert_eq!(info.role(), expected);
}

#[rstest]
fn root_declares_contract_and_expected_object(workspace: Workspace) {
    let report = generate_common(&workspace, &["a", "b"]);

    let kinds: Vec<(&str, ObjectModifier)> = report
        .objects
        .iter()
        .map(|object| (object.name.as_str(), object.modifier))
        .collect();
    assert_eq!(
        kinds,
        [
            ("__CommonMainStrings", ObjectModifier::None),
            ("strings", ObjectModifier::Expect)
        ]
    );
    assert!(report.resource_files.is_empty());
    let source = report.source_file.expect("source written");
    assert_eq!(
        source,
        workspace
            .temp
            .path()
            .join("commonMain/src/com/example/MR.kt")
    );
    let metadata = report.metadata_file.expect("metadata written");
    let stored = crate::metadata::file::read_metadata(&metadata).expect("read metadata");
    assert_eq!(stored, report.objects);
}

#[rstest]
fn platform_realises_inherited_contract(workspace: Workspace) {
    let common = generate_common(&workspace, &["a", "b"]);
    let ios = SourceSetInfo::new("iosMain")
        .with_parents(["commonMain"])
        .with_platform(Platform::Apple);
    let input = GenerationInput {
        resources: strings("iosMain", &["a", "c"]),
        ancestors: common.objects.into_iter().collect(),
        source_set: ios,
    };
    let driver = workspace.driver("iosMain");

    let populated = driver
        .clean(&input.source_set)
        .and_then(|cleaned| cleaned.populate(&driver, &input))
        .expect("populate");

    let strings_object = nested(populated.file(), "strings");
    assert_eq!(strings_object.modifier, ObjectModifier::Actual);
    assert_eq!(strings_object.supertypes, ["__CommonMainStrings"]);
    let modifiers: Vec<(&str, PropertyModifier)> = strings_object
        .properties
        .iter()
        .map(|property| (property.name.as_str(), property.modifier))
        .collect();
    assert_eq!(
        modifiers,
        [
            ("a", PropertyModifier::Override),
            ("b", PropertyModifier::Override),
            ("c", PropertyModifier::Actual)
        ]
    );
    let container = populated.file().container.as_ref().expect("container");
    assert_eq!(container.modifier, ObjectModifier::Actual);
    assert!(container.members.iter().any(|member| member.name == "bundle"));

    let report = populated.write(&driver).expect("write");
    let tables: Vec<&str> = report
        .resource_files
        .iter()
        .filter_map(|path| path.strip_prefix(&driver.settings().output.resources).ok())
        .map(Utf8Path::as_str)
        .collect();
    assert_eq!(
        tables,
        ["Base.lproj/Localizable.strings", "en.lproj/Localizable.strings"]
    );
}

fn localized(key: &str, values: &[(&str, &str)]) -> ResourceEntry {
    ResourceEntry::new(
        key,
        ResourceData::String {
            values: values
                .iter()
                .map(|(tag, text)| ((*tag).to_owned(), (*text).to_owned()))
                .collect(),
        },
    )
}

#[rstest]
fn differently_cased_locales_share_one_table(workspace: Workspace) {
    let resources = ResourceSet::from_entries(
        "iosMain",
        [
            localized("a", &[("en-GB", "A")]),
            localized("b", &[("en-gb", "B")]),
            localized("c", &[("base", "C")]),
            localized("d", &[("Base", "D")]),
        ],
    )
    .expect("unique keys");
    let input = GenerationInput {
        source_set: SourceSetInfo::new("iosMain").with_platform(Platform::Apple),
        resources,
        ancestors: MetadataArena::new(),
    };
    let driver = workspace.driver("iosMain");

    let report = driver.generate(&input).expect("generate");

    let mut unique = report.resource_files.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), report.resource_files.len());
    let read = |dir: &str| {
        std::fs::read_to_string(
            driver
                .settings()
                .output
                .resources
                .join(dir)
                .join("Localizable.strings"),
        )
        .expect("table written")
    };
    assert_eq!(read("en-GB.lproj"), "\"a\" = \"A\";\n\"b\" = \"B\";");
    assert_eq!(read("Base.lproj"), "\"c\" = \"C\";\n\"d\" = \"D\";");
}

#[rstest]
fn platform_redeclaring_a_member_under_another_key_fails(workspace: Workspace) {
    let common = generate_common(&workspace, &["a_b"]);
    let input = GenerationInput {
        source_set: SourceSetInfo::new("iosMain")
            .with_parents(["commonMain"])
            .with_platform(Platform::Apple),
        resources: strings("iosMain", &["a.b"]),
        ancestors: common.objects.into_iter().collect(),
    };

    let err = workspace
        .driver("iosMain")
        .generate(&input)
        .expect_err("keys differ");

    let resolve = match err {
        GenerateError::Resolve(resolve) => resolve,
        other => panic!("unexpected error: {other}"),
    };
    assert_eq!(
        resolve,
        ResolveError::IncompatibleContracts {
            property: "a_b".to_owned(),
            generator: GeneratorType::Strings,
            first: "commonMain".to_owned(),
            second: "iosMain".to_owned(),
        }
    );
}

#[rstest]
fn intermediate_declares_contract_only(workspace: Workspace) {
    let common = generate_common(&workspace, &["a"]);
    let input = GenerationInput {
        source_set: SourceSetInfo::new("appleMain").with_parents(["commonMain"]),
        resources: strings("appleMain", &["apple_only"]),
        ancestors: common.objects.into_iter().collect(),
    };
    let driver = workspace.driver("appleMain");

    let populated = driver
        .clean(&input.source_set)
        .and_then(|cleaned| cleaned.populate(&driver, &input))
        .expect("populate");

    let file = populated.file();
    assert!(file.container.is_none());
    let interface = file.interfaces.first().expect("contract");
    assert_eq!(interface.name, "__AppleMainStrings");
    assert_eq!(interface.supertypes, ["__CommonMainStrings"]);
    assert!(
        interface
            .properties
            .iter()
            .all(|property| property.modifier == PropertyModifier::None)
    );
}

#[rstest]
fn empty_run_cleans_and_runs_both_hooks(workspace: Workspace) {
    let settings = workspace.settings("jsMain");
    let stale = settings.output.sources.join("stale.kt");
    fs_helpers::write_text(&stale, "old").expect("seed stale output");
    let calls = Rc::new(RefCell::new(Vec::new()));
    let before_calls = Rc::clone(&calls);
    let after_calls = Rc::clone(&calls);
    let hooks = Hooks::none()
        .before(move |info| {
            before_calls.borrow_mut().push(format!("before {}", info.name));
            Ok(())
        })
        .after(move |report| {
            after_calls
                .borrow_mut()
                .push(format!("after empty={}", report.is_empty()));
            Ok(())
        });
    let input = GenerationInput {
        source_set: SourceSetInfo::new("jsMain").with_platform(Platform::Js),
        resources: ResourceSet::new(),
        ancestors: MetadataArena::new(),
    };

    let report = GenerationDriver::new(settings.clone())
        .with_hooks(hooks)
        .generate(&input)
        .expect("generate");

    assert!(report.is_empty());
    assert!(!stale.exists());
    assert!(!settings.output.metadata_file.exists());
    assert_eq!(*calls.borrow(), ["before jsMain", "after empty=true"]);
}

#[rstest]
fn invalid_settings_fail_before_cleaning(workspace: Workspace) {
    let mut settings = workspace.settings("commonMain");
    settings.class_name = "not valid".to_owned();
    let kept = settings.output.resources.join("kept.txt");
    fs_helpers::write_text(&kept, "keep").expect("seed output");
    let input = GenerationInput {
        source_set: SourceSetInfo::new("commonMain"),
        resources: strings("commonMain", &["a"]),
        ancestors: MetadataArena::new(),
    };

    let err = GenerationDriver::new(settings)
        .generate(&input)
        .expect_err("invalid class name");

    assert!(matches!(err, GenerateError::Config { field: "class_name", .. }));
    assert!(kept.exists());
}

#[rstest]
fn failing_pre_hook_stops_before_writing(workspace: Workspace) {
    let settings = workspace.settings("commonMain");
    let input = GenerationInput {
        source_set: SourceSetInfo::new("commonMain"),
        resources: strings("commonMain", &["a"]),
        ancestors: MetadataArena::new(),
    };

    let err = GenerationDriver::new(settings.clone())
        .with_hooks(Hooks::none().before(|_| Err("refused".to_owned())))
        .generate(&input)
        .expect_err("hook failure");

    assert!(matches!(err, GenerateError::Hook(ref message) if message == "refused"));
    assert!(!settings.output.sources.exists());
    assert!(!settings.output.metadata_file.exists());
}

#[derive(Debug, Clone, Default)]
struct RecordingWriter {
    files: Rc<RefCell<Vec<(String, GeneratedFile)>>>,
}

impl SourceWriter for RecordingWriter {
    fn write(
        &self,
        file: &GeneratedFile,
        type_name: &str,
        sources_dir: &Utf8Path,
    ) -> Result<Utf8PathBuf, GenerateError> {
        self.files
            .borrow_mut()
            .push((type_name.to_owned(), file.clone()));
        Ok(sources_dir.join(type_name))
    }
}

#[rstest]
fn injected_writer_receives_container_description(workspace: Workspace) {
    let writer = RecordingWriter::default();
    let mut settings = workspace.settings("commonMain");
    settings.class_name = "Res".to_owned();
    let input = GenerationInput {
        source_set: SourceSetInfo::new("commonMain"),
        resources: strings("commonMain", &["title"]),
        ancestors: MetadataArena::new(),
    };

    GenerationDriver::new(settings)
        .with_writer(writer.clone())
        .generate(&input)
        .expect("generate");

    let files = writer.files.borrow();
    let (type_name, file) = files.first().expect("one file written");
    assert_eq!(type_name, "Res");
    assert_eq!(
        file.container.as_ref().map(|container| container.modifier),
        Some(ObjectModifier::Expect)
    );
}
