//! Generation driver for a single source set.
//!
//! A run moves through three states. [`Cleaned`] holds nothing but the fact
//! that every previous output is gone. [`Populated`] carries the resolved
//! container description and metadata, still in memory. Writing a
//! [`Populated`] value yields the [`GenerationReport`] handed to the post hook.
//!
//! ```no_run
//! use camino::Utf8Path;
//! use resbind::driver::{GenerationDriver, GenerationInput, SourceSetInfo};
//! use resbind::metadata::{MetadataArena, ResourceSet};
//! use resbind::{OutputDirs, Platform, Settings};
//!
//! let settings = Settings::new("com.example", OutputDirs::under(Utf8Path::new("build/ios")));
//! let input = GenerationInput {
//!     source_set: SourceSetInfo::new("iosMain").with_platform(Platform::Apple),
//!     resources: ResourceSet::new(),
//!     ancestors: MetadataArena::new(),
//! };
//! let report = GenerationDriver::new(settings).generate(&input)?;
//! assert!(report.is_empty());
//! # Ok::<(), resbind::GenerateError>(())
//! ```

mod hooks;
mod plan;

use std::fmt;

use camino::Utf8PathBuf;
use tracing::{debug, info};

use crate::code::{ContainerDecl, GeneratedFile, push_unique_members};
use crate::container::ContainerRegistry;
use crate::emitter::{EmitContext, EmitterRegistry};
use crate::error::GenerateError;
use crate::fs_helpers;
use crate::metadata::{GeneratedObject, GeneratorType, MetadataArena, ObjectModifier, ResourceSet};
use crate::metadata::file::write_metadata;
use crate::platform::Platform;
use crate::resolver::Resolver;
use crate::settings::Settings;
use crate::source::{KotlinSourceWriter, SourceWriter};

pub use hooks::{AfterHook, BeforeHook, Hooks};
use plan::{PlannedType, Planner};

/// Identity of the source set being generated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSetInfo {
    /// Source set name (`commonMain`, `iosMain`).
    pub name: String,
    /// Direct parents, most general first.
    pub parents: Vec<String>,
    /// Target platform, for source sets compiled for exactly one.
    pub platform: Option<Platform>,
}

impl SourceSetInfo {
    /// Creates a root source set without a platform.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parents: Vec::new(),
            platform: None,
        }
    }

    /// Sets the direct parents.
    #[must_use]
    pub fn with_parents<I, S>(mut self, parents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parents = parents.into_iter().map(Into::into).collect();
        self
    }

    /// Marks the source set as compiled for `platform`.
    #[must_use]
    pub const fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = Some(platform);
        self
    }

    /// Role deciding which declarations the source set produces.
    #[must_use]
    pub fn role(&self) -> SourceSetRole {
        match self.platform {
            Some(platform) => SourceSetRole::Platform(platform),
            None if self.parents.is_empty() => SourceSetRole::Root,
            None => SourceSetRole::Intermediate,
        }
    }
}

/// Position of a source set in the hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceSetRole {
    /// Top of the hierarchy: declares contracts and expected objects.
    Root,
    /// Shared level between the root and platforms: declares contracts only.
    Intermediate,
    /// Platform level: realises every inherited contract.
    Platform(Platform),
}

/// Inputs of one run.
#[derive(Debug, Clone)]
pub struct GenerationInput {
    /// Source set being generated.
    pub source_set: SourceSetInfo,
    /// Resources declared by the source set itself.
    pub resources: ResourceSet,
    /// Finalised metadata of every ancestor, most general first.
    pub ancestors: MetadataArena,
}

/// Outcome of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    /// Source set that was generated.
    pub source_set: String,
    /// Finalised metadata, as written to the metadata file.
    pub objects: Vec<GeneratedObject>,
    /// Rendered source file.
    pub source_file: Option<Utf8PathBuf>,
    /// Companion resource files, in emission order.
    pub resource_files: Vec<Utf8PathBuf>,
    /// Written metadata file.
    pub metadata_file: Option<Utf8PathBuf>,
}

impl GenerationReport {
    /// Whether the run wrote nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.source_file.is_none() && self.resource_files.is_empty() && self.metadata_file.is_none()
    }
}

/// Orchestrates one source set: clean, populate, write.
pub struct GenerationDriver {
    settings: Settings,
    emitters: EmitterRegistry,
    containers: ContainerRegistry,
    writer: Box<dyn SourceWriter>,
    hooks: Hooks,
}

impl fmt::Debug for GenerationDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationDriver")
            .field("settings", &self.settings)
            .field("emitters", &self.emitters)
            .field("containers", &self.containers)
            .field("hooks", &self.hooks)
            .finish_non_exhaustive()
    }
}

impl GenerationDriver {
    /// Driver with the standard emitters and the Kotlin writer.
    #[must_use]
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            emitters: EmitterRegistry::standard(),
            containers: ContainerRegistry::standard(),
            writer: Box::new(KotlinSourceWriter),
            hooks: Hooks::none(),
        }
    }

    /// Replaces the resource emitter registry.
    #[must_use]
    pub fn with_emitters(mut self, emitters: EmitterRegistry) -> Self {
        self.emitters = emitters;
        self
    }

    /// Replaces the container emitter registry.
    #[must_use]
    pub fn with_containers(mut self, containers: ContainerRegistry) -> Self {
        self.containers = containers;
        self
    }

    /// Replaces the source writer.
    #[must_use]
    pub fn with_writer(mut self, writer: impl SourceWriter + 'static) -> Self {
        self.writer = Box::new(writer);
        self
    }

    /// Installs pre- and post-generation hooks.
    #[must_use]
    pub fn with_hooks(mut self, hooks: Hooks) -> Self {
        self.hooks = hooks;
        self
    }

    /// Settings of the run.
    #[must_use]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Runs the whole pipeline for `input`.
    ///
    /// Writing nothing is a valid outcome: when no declaration results, the
    /// outputs are still cleaned and both hooks still run.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::Config`] for invalid settings before any file
    /// is touched, [`GenerateError::Resolve`] for inconsistent metadata,
    /// [`GenerateError::Hook`] when a hook fails and [`GenerateError::Io`] for
    /// filesystem failures.
    pub fn generate(&self, input: &GenerationInput) -> Result<GenerationReport, GenerateError> {
        self.settings.validate()?;
        let cleaned = self.clean(&input.source_set)?;
        self.hooks.run_before(&input.source_set)?;
        let populated = cleaned.populate(self, input)?;
        let report = populated.write(self)?;
        self.hooks.run_after(&report)?;
        info!(
            source_set = %report.source_set,
            objects = report.objects.len(),
            files = report.resource_files.len(),
            "generation finished"
        );
        Ok(report)
    }

    /// Removes every output a previous run may have left behind.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::Io`] when an output cannot be removed.
    pub fn clean(&self, source_set: &SourceSetInfo) -> Result<Cleaned, GenerateError> {
        let output = &self.settings.output;
        for dir in [&output.sources, &output.resources, &output.assets] {
            if fs_helpers::remove_dir_all_if_exists(dir)? {
                debug!(source_set = %source_set.name, path = %dir, "removed previous output");
            }
        }
        if fs_helpers::remove_file_if_exists(&output.metadata_file)? {
            debug!(source_set = %source_set.name, path = %output.metadata_file, "removed stale metadata");
        }
        Ok(Cleaned { _private: () })
    }
}

/// Every previous output has been removed.
#[derive(Debug)]
pub struct Cleaned {
    _private: (),
}

impl Cleaned {
    /// Resolves every generator type and assembles the container description.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::Resolve`] for inconsistent metadata and
    /// [`GenerateError::MissingEmitter`] when the platform lacks an emitter.
    pub fn populate(
        self,
        driver: &GenerationDriver,
        input: &GenerationInput,
    ) -> Result<Populated, GenerateError> {
        let source_set = &input.source_set;
        let role = source_set.role();
        let planner = Planner {
            ctx: EmitContext::new(&driver.settings, &source_set.name),
            role,
            resources: &input.resources,
            ancestors: &input.ancestors,
            resolver: Resolver::new(&input.ancestors),
            emitters: &driver.emitters,
        };

        let mut planned = Vec::new();
        for generator in GeneratorType::ALL {
            if let Some(plan) = planner.plan(generator)? {
                debug!(
                    source_set = %source_set.name,
                    generator = %generator,
                    properties = plan.objects.iter().map(|object| object.properties.len()).sum::<usize>(),
                    "planned generator"
                );
                planned.push(plan);
            }
        }

        let file = assemble(driver, &planner.ctx, role, &input.ancestors, &planned);
        Ok(Populated {
            source_set: source_set.name.clone(),
            platform: source_set.platform,
            file,
            planned,
        })
    }
}

fn assemble(
    driver: &GenerationDriver,
    ctx: &EmitContext<'_>,
    role: SourceSetRole,
    ancestors: &MetadataArena,
    planned: &[PlannedType],
) -> GeneratedFile {
    let settings = &driver.settings;
    let mut file = GeneratedFile::new(settings.package_name.clone(), settings.visibility);
    for plan in planned {
        file.imports.extend(plan.imports.iter().cloned());
        file.interfaces.extend(plan.interface.iter().cloned());
    }
    let objects: Vec<_> = planned
        .iter()
        .filter_map(|plan| plan.nested.clone())
        .collect();
    if objects.is_empty() {
        return file;
    }

    let mut members = Vec::new();
    let modifier = match role {
        SourceSetRole::Root => ObjectModifier::Expect,
        SourceSetRole::Intermediate => ObjectModifier::None,
        SourceSetRole::Platform(platform) => {
            if let Some(container) = driver.containers.get(platform) {
                file.imports.extend(container.imports(ctx));
                push_unique_members(&mut members, container.before_types(ctx));
            }
            if ancestors.has_expect_object(None) {
                ObjectModifier::Actual
            } else {
                ObjectModifier::None
            }
        }
    };
    file.container = Some(ContainerDecl {
        name: settings.class_name.clone(),
        modifier,
        members,
        objects,
    });
    file
}

/// Resolved declarations, not yet on disk.
#[derive(Debug)]
pub struct Populated {
    source_set: String,
    platform: Option<Platform>,
    file: GeneratedFile,
    planned: Vec<PlannedType>,
}

impl Populated {
    /// Container description handed to the source writer.
    #[must_use]
    pub const fn file(&self) -> &GeneratedFile {
        &self.file
    }

    /// Finalised metadata of every generator type, in generator order.
    #[must_use]
    pub fn objects(&self) -> Vec<GeneratedObject> {
        self.planned
            .iter()
            .flat_map(|plan| plan.objects.iter().cloned())
            .collect()
    }

    /// Writes the source file, companion files and metadata.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::Io`] when an output cannot be written.
    pub fn write(self, driver: &GenerationDriver) -> Result<GenerationReport, GenerateError> {
        let objects = self.objects();
        let mut report = GenerationReport {
            source_set: self.source_set.clone(),
            objects,
            ..GenerationReport::default()
        };
        if self.file.is_empty() {
            info!(source_set = %self.source_set, "no resources in hierarchy; nothing to write");
            return Ok(report);
        }

        let settings = &driver.settings;
        report.source_file = Some(driver.writer.write(
            &self.file,
            &settings.class_name,
            &settings.output.sources,
        )?);

        if let Some(platform) = self.platform {
            let ctx = EmitContext::new(settings, &self.source_set);
            for plan in &self.planned {
                let emitter = driver.emitters.get(plan.generator.kind(), platform)?;
                let written = emitter.write_resource_files(&ctx, &plan.resources)?;
                debug!(
                    source_set = %self.source_set,
                    generator = %plan.generator,
                    files = written.len(),
                    "wrote resource files"
                );
                report.resource_files.extend(written);
            }
        }

        if !report.objects.is_empty() {
            report.metadata_file = Some(write_metadata(
                &settings.output.metadata_file,
                &self.source_set,
                &report.objects,
            )?);
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests;
