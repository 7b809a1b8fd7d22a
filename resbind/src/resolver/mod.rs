//! Modifier inference for generated properties.
//!
//! The resolver reads ancestor metadata through a [`MetadataArena`] and
//! decides, for every property of a container, whether it overrides an
//! inherited contract member, realises a new member on a platform, or is a
//! plain declaration. It never mutates its inputs and performs no I/O.

use std::collections::BTreeMap;

use crate::error::ResolveError;
use crate::metadata::{
    ContractIndex, GeneratedObject, GeneratedProperty, GeneratorType, MetadataArena,
    ObjectModifier, PropertyModifier, ResourceEntry,
};

/// Applies the modifier decision table to one property.
///
/// Non-object containers always yield [`PropertyModifier::None`]. For objects,
/// a member already declared by a reachable contract is an override; otherwise
/// a platform realisation introduces it as `Actual`.
///
/// # Examples
///
/// ```
/// use resbind::metadata::{
///     GeneratedObject, GeneratorType, ObjectModifier, ObjectType, PropertyModifier,
/// };
/// use resbind::resolver::resolve_property_modifier;
///
/// let ios = GeneratedObject::new(
///     "iosMain",
///     "strings",
///     GeneratorType::Strings,
///     ObjectType::Object,
///     ObjectModifier::Actual,
/// );
/// assert_eq!(resolve_property_modifier(true, &ios), PropertyModifier::Override);
/// assert_eq!(resolve_property_modifier(false, &ios), PropertyModifier::Actual);
/// ```
#[must_use]
pub const fn resolve_property_modifier(
    contains_in_actual_interfaces: bool,
    target: &GeneratedObject,
) -> PropertyModifier {
    if !target.is_object() {
        return PropertyModifier::None;
    }
    if contains_in_actual_interfaces {
        return PropertyModifier::Override;
    }
    match target.modifier {
        ObjectModifier::Actual => PropertyModifier::Actual,
        ObjectModifier::None | ObjectModifier::Expect => PropertyModifier::None,
    }
}

/// Contract lookups over the metadata of every ancestor source set.
#[derive(Debug, Clone)]
pub struct Resolver<'a> {
    arena: &'a MetadataArena,
    contracts: ContractIndex,
}

impl<'a> Resolver<'a> {
    /// Indexes the contracts stored in `arena`.
    #[must_use]
    pub fn new(arena: &'a MetadataArena) -> Self {
        Self {
            arena,
            contracts: arena.contract_index(),
        }
    }

    /// Contracts a container of `generator_type` must honour, most general first.
    pub fn actual_interfaces(
        &self,
        generator_type: GeneratorType,
    ) -> impl Iterator<Item = &'a GeneratedObject> + '_ {
        let arena = self.arena;
        self.contracts
            .contracts(generator_type)
            .iter()
            .filter_map(move |id| arena.get(*id))
    }

    /// Whether any reachable contract of `generator_type` declares `name`.
    #[must_use]
    pub fn contains_in_actual_interfaces(&self, generator_type: GeneratorType, name: &str) -> bool {
        self.actual_interfaces(generator_type)
            .any(|contract| contract.declares(name))
    }

    /// Finds the first contract member named `name`, with its owner.
    ///
    /// Every other contract declaring the same member must refer to the same
    /// resource key.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::IncompatibleContracts`] when two contracts
    /// declare `name` for different resources.
    pub fn find_contract_member(
        &self,
        generator_type: GeneratorType,
        name: &str,
    ) -> Result<Option<(&'a GeneratedObject, &'a GeneratedProperty)>, ResolveError> {
        let mut first: Option<(&'a GeneratedObject, &'a GeneratedProperty)> = None;
        for contract in self.actual_interfaces(generator_type) {
            let Some(property) = contract.property(name) else {
                continue;
            };
            match first {
                None => first = Some((contract, property)),
                Some((owner, existing)) => {
                    ensure_compatible(generator_type, owner, existing, contract, property)?;
                }
            }
        }
        Ok(first)
    }

    /// Checks that `entry`, declared by `source_set`, names the same resource
    /// as any contract member it redeclares.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::IncompatibleContracts`] when a contract
    /// declares the member for a different key or kind.
    pub fn ensure_redeclaration(
        &self,
        generator_type: GeneratorType,
        source_set: &str,
        entry: &ResourceEntry,
    ) -> Result<(), ResolveError> {
        let name = entry.property_name();
        match self.find_contract_member(generator_type, &name)? {
            Some((owner, property)) if !entry.is_compatible_with(&property.resource) => {
                Err(ResolveError::IncompatibleContracts {
                    property: name,
                    generator: generator_type,
                    first: owner.source_set.clone(),
                    second: source_set.to_owned(),
                })
            }
            _ => Ok(()),
        }
    }

    /// Members inherited from every contract of `generator_type`.
    ///
    /// Members appear at the position of their first declaration. When a more
    /// specific contract declares the same member again, its payload is
    /// layered over the earlier one.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::IncompatibleContracts`] when two contracts
    /// declare one member for different resources.
    pub fn inherited_members(
        &self,
        generator_type: GeneratorType,
    ) -> Result<Vec<ResourceEntry>, ResolveError> {
        let mut members: Vec<ResourceEntry> = Vec::new();
        let mut owners: BTreeMap<&str, (usize, &'a GeneratedObject, &'a GeneratedProperty)> =
            BTreeMap::new();
        for contract in self.actual_interfaces(generator_type) {
            for property in &contract.properties {
                match owners.get(property.name.as_str()) {
                    None => {
                        owners.insert(property.name.as_str(), (members.len(), contract, property));
                        members.push(property.resource.clone());
                    }
                    Some(&(slot, owner, existing)) => {
                        ensure_compatible(generator_type, owner, existing, contract, property)?;
                        if let Some(member) = members.get_mut(slot) {
                            *member = property.resource.clone().layered_over(member);
                        }
                    }
                }
            }
        }
        Ok(members)
    }

    /// Builds the final declaration of `target` from `entries`.
    ///
    /// Property order follows `entries`; each property's modifier comes from
    /// [`resolve_property_modifier`].
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::DuplicateKey`] when two entries map to the same
    /// property name.
    pub fn resolve(
        &self,
        target: GeneratedObject,
        entries: impl IntoIterator<Item = ResourceEntry>,
    ) -> Result<GeneratedObject, ResolveError> {
        let mut object = target;
        for entry in entries {
            let name = entry.property_name();
            if object.declares(&name) {
                return Err(ResolveError::DuplicateKey {
                    source_set: object.source_set.clone(),
                    generator: object.generator_type,
                    key: entry.key,
                });
            }
            let contains = self.contains_in_actual_interfaces(object.generator_type, &name);
            let modifier = resolve_property_modifier(contains, &object);
            object.properties.push(GeneratedProperty {
                name,
                modifier,
                resource: entry,
            });
        }
        Ok(object)
    }
}

fn ensure_compatible(
    generator_type: GeneratorType,
    first_owner: &GeneratedObject,
    first: &GeneratedProperty,
    second_owner: &GeneratedObject,
    second: &GeneratedProperty,
) -> Result<(), ResolveError> {
    if first.resource.is_compatible_with(&second.resource) {
        return Ok(());
    }
    Err(ResolveError::IncompatibleContracts {
        property: first.name.clone(),
        generator: generator_type,
        first: first_owner.source_set.clone(),
        second: second_owner.source_set.clone(),
    })
}
