//! Per-generator planning: which objects a source set declares and how.

use crate::code::{Import, Member, PropertyDecl, TypeDecl};
use crate::emitter::{EmitContext, EmitterRegistry};
use crate::error::GenerateError;
use crate::metadata::{
    GeneratedObject, GeneratorType, MetadataArena, ObjectModifier, ObjectType, ResourceEntry,
    ResourceSet,
};
use crate::platform::Platform;
use crate::resolver::Resolver;

use super::SourceSetRole;

/// Everything one generator type contributes to a source set.
#[derive(Debug)]
pub(super) struct PlannedType {
    pub generator: GeneratorType,
    /// Finalised metadata, recorded for descendants.
    pub objects: Vec<GeneratedObject>,
    /// Top-level contract, if the source set declares one.
    pub interface: Option<TypeDecl>,
    /// Object nested in the container.
    pub nested: Option<TypeDecl>,
    pub imports: Vec<Import>,
    /// Entries whose companion files the platform emitter writes.
    pub resources: Vec<ResourceEntry>,
}

pub(super) struct Planner<'a> {
    pub ctx: EmitContext<'a>,
    pub role: SourceSetRole,
    pub resources: &'a ResourceSet,
    pub ancestors: &'a MetadataArena,
    pub resolver: Resolver<'a>,
    pub emitters: &'a EmitterRegistry,
}

impl Planner<'_> {
    pub fn plan(&self, generator: GeneratorType) -> Result<Option<PlannedType>, GenerateError> {
        let own: Vec<ResourceEntry> = self
            .resources
            .of_kind(generator.kind())
            .cloned()
            .collect();
        for entry in &own {
            self.resolver
                .ensure_redeclaration(generator, self.ctx.source_set, entry)?;
        }
        match self.role {
            SourceSetRole::Platform(platform) => self.plan_realisation(generator, platform, own),
            SourceSetRole::Root => self.plan_root(generator, own),
            SourceSetRole::Intermediate => self.plan_intermediate(generator, own),
        }
    }

    fn contract(
        &self,
        generator: GeneratorType,
        own: Vec<ResourceEntry>,
    ) -> Result<GeneratedObject, GenerateError> {
        let source_set = self.ctx.source_set;
        let target = GeneratedObject::new(
            source_set,
            generator.contract_name(source_set),
            generator,
            ObjectType::Interface,
            ObjectModifier::None,
        );
        Ok(self.resolver.resolve(target, own)?)
    }

    fn ancestor_contract_names(&self, generator: GeneratorType) -> Vec<String> {
        self.resolver
            .actual_interfaces(generator)
            .map(|contract| contract.name.clone())
            .collect()
    }

    fn plan_root(
        &self,
        generator: GeneratorType,
        own: Vec<ResourceEntry>,
    ) -> Result<Option<PlannedType>, GenerateError> {
        if own.is_empty() {
            return Ok(None);
        }
        let contract = self.contract(generator, own)?;
        let expected = GeneratedObject::new(
            self.ctx.source_set,
            generator.object_name(),
            generator,
            ObjectType::Object,
            ObjectModifier::Expect,
        );
        let interface = abstract_decl(&contract, generator, Vec::new());
        let nested = TypeDecl {
            name: expected.name.clone(),
            object_type: ObjectType::Object,
            modifier: ObjectModifier::Expect,
            supertypes: vec![contract.name.clone()],
            members: Vec::new(),
            properties: Vec::new(),
        };
        Ok(Some(PlannedType {
            generator,
            objects: vec![contract, expected],
            interface: Some(interface),
            nested: Some(nested),
            imports: vec![Import::runtime(generator.value_type())],
            resources: Vec::new(),
        }))
    }

    fn plan_intermediate(
        &self,
        generator: GeneratorType,
        own: Vec<ResourceEntry>,
    ) -> Result<Option<PlannedType>, GenerateError> {
        if own.is_empty() {
            return Ok(None);
        }
        let contract = self.contract(generator, own)?;
        let interface = abstract_decl(&contract, generator, self.ancestor_contract_names(generator));
        Ok(Some(PlannedType {
            generator,
            objects: vec![contract],
            interface: Some(interface),
            nested: None,
            imports: vec![Import::runtime(generator.value_type())],
            resources: Vec::new(),
        }))
    }

    fn plan_realisation(
        &self,
        generator: GeneratorType,
        platform: Platform,
        own: Vec<ResourceEntry>,
    ) -> Result<Option<PlannedType>, GenerateError> {
        let entries = merge_own(self.resolver.inherited_members(generator)?, own);
        if entries.is_empty() {
            return Ok(None);
        }
        let modifier = if self.ancestors.has_expect_object(Some(generator)) {
            ObjectModifier::Actual
        } else {
            ObjectModifier::None
        };
        let target = GeneratedObject::new(
            self.ctx.source_set,
            generator.object_name(),
            generator,
            ObjectType::Object,
            modifier,
        );
        let object = self.resolver.resolve(target, entries.iter().cloned())?;

        let emitter = self.emitters.get(generator.kind(), platform)?;
        let properties = object
            .properties
            .iter()
            .map(|property| {
                Ok(PropertyDecl {
                    name: property.name.clone(),
                    modifier: property.modifier,
                    value_type: generator.value_type().to_owned(),
                    initializer: Some(emitter.initializer(&self.ctx, &property.resource)?),
                })
            })
            .collect::<Result<Vec<_>, GenerateError>>()?;
        let mut members: Vec<Member> = Vec::new();
        crate::code::push_unique_members(
            &mut members,
            emitter.before_properties(&self.ctx, &entries),
        );
        let nested = TypeDecl {
            name: object.name.clone(),
            object_type: ObjectType::Object,
            modifier,
            supertypes: self.ancestor_contract_names(generator),
            members,
            properties,
        };
        Ok(Some(PlannedType {
            generator,
            objects: vec![object],
            interface: None,
            nested: Some(nested),
            imports: emitter.imports(&self.ctx),
            resources: entries,
        }))
    }
}

/// Replaces inherited members declared again locally, then appends new ones.
///
/// Callers check redeclarations with [`Resolver::ensure_redeclaration`] first.
fn merge_own(mut entries: Vec<ResourceEntry>, own: Vec<ResourceEntry>) -> Vec<ResourceEntry> {
    for entry in own {
        let name = entry.property_name();
        match entries
            .iter_mut()
            .find(|existing| existing.property_name() == name)
        {
            Some(existing) => *existing = entry.layered_over(existing),
            None => entries.push(entry),
        }
    }
    entries
}

fn abstract_decl(
    contract: &GeneratedObject,
    generator: GeneratorType,
    supertypes: Vec<String>,
) -> TypeDecl {
    TypeDecl {
        name: contract.name.clone(),
        object_type: ObjectType::Interface,
        modifier: contract.modifier,
        supertypes,
        members: Vec::new(),
        properties: contract
            .properties
            .iter()
            .map(|property| PropertyDecl {
                name: property.name.clone(),
                modifier: property.modifier,
                value_type: generator.value_type().to_owned(),
                initializer: None,
            })
            .collect(),
    }
}
