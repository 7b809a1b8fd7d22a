//! Index-based storage for ancestor metadata.
//!
//! Ancestor containers are kept in a flat arena in hierarchy order (most
//! general first). Contracts are referenced by [`ObjectId`] so the resolver
//! never needs links between objects.

use std::collections::BTreeMap;

use crate::metadata::{GeneratedObject, GeneratorType, ObjectModifier};

/// Position of an object inside a [`MetadataArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId(usize);

impl ObjectId {
    /// Arena slot of the object.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Immutable store of metadata read from ancestor source sets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataArena {
    objects: Vec<GeneratedObject>,
}

impl MetadataArena {
    /// Creates an empty arena.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            objects: Vec::new(),
        }
    }

    /// Appends the metadata of one ancestor.
    ///
    /// Ancestors must be added from the most general to the most specific so
    /// that contract lookups observe hierarchy order.
    pub fn extend(&mut self, objects: impl IntoIterator<Item = GeneratedObject>) {
        self.objects.extend(objects);
    }

    /// Returns the object stored at `id`.
    #[must_use]
    pub fn get(&self, id: ObjectId) -> Option<&GeneratedObject> {
        self.objects.get(id.0)
    }

    /// Iterates objects with their ids, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &GeneratedObject)> {
        self.objects
            .iter()
            .enumerate()
            .map(|(index, object)| (ObjectId(index), object))
    }

    /// Whether an ancestor declared an expected object, optionally of one type.
    #[must_use]
    pub fn has_expect_object(&self, generator_type: Option<GeneratorType>) -> bool {
        self.objects.iter().any(|object| {
            object.is_object()
                && object.modifier == ObjectModifier::Expect
                && generator_type.is_none_or(|expected| object.generator_type == expected)
        })
    }

    /// Precomputes the contracts available to each generator type.
    #[must_use]
    pub fn contract_index(&self) -> ContractIndex {
        let mut by_type: BTreeMap<GeneratorType, Vec<ObjectId>> = BTreeMap::new();
        for (id, object) in self.iter().filter(|(_, object)| object.is_interface()) {
            by_type.entry(object.generator_type).or_default().push(id);
        }
        ContractIndex { by_type }
    }
}

impl FromIterator<GeneratedObject> for MetadataArena {
    fn from_iter<I: IntoIterator<Item = GeneratedObject>>(iter: I) -> Self {
        Self {
            objects: iter.into_iter().collect(),
        }
    }
}

/// Ancestor contracts per generator type, in hierarchy order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContractIndex {
    by_type: BTreeMap<GeneratorType, Vec<ObjectId>>,
}

impl ContractIndex {
    /// Contracts a container of `generator_type` must honour.
    #[must_use]
    pub fn contracts(&self, generator_type: GeneratorType) -> &[ObjectId] {
        self.by_type
            .get(&generator_type)
            .map_or(&[], Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::ObjectType;
    use rstest::rstest;

    fn object(source_set: &str, generator: GeneratorType, object_type: ObjectType) -> GeneratedObject {
        GeneratedObject::new(
            source_set,
            generator.contract_name(source_set),
            generator,
            object_type,
            ObjectModifier::None,
        )
    }

    #[rstest]
    fn indexes_interfaces_by_generator_in_insertion_order() {
        let arena: MetadataArena = [
            object("commonMain", GeneratorType::Strings, ObjectType::Interface),
            object("commonMain", GeneratorType::Strings, ObjectType::Object),
            object("commonMain", GeneratorType::Colors, ObjectType::Interface),
            object("appleMain", GeneratorType::Strings, ObjectType::Interface),
        ]
        .into_iter()
        .collect();

        let index = arena.contract_index();

        assert_eq!(
            index.contracts(GeneratorType::Strings),
            &[ObjectId(0), ObjectId(3)]
        );
        assert_eq!(index.contracts(GeneratorType::Colors), &[ObjectId(2)]);
        assert!(index.contracts(GeneratorType::Images).is_empty());
    }

    #[rstest]
    fn detects_expected_objects_per_generator() {
        let mut expected = object("commonMain", GeneratorType::Colors, ObjectType::Object);
        expected.modifier = ObjectModifier::Expect;
        let arena: MetadataArena = [
            object("commonMain", GeneratorType::Colors, ObjectType::Interface),
            expected,
        ]
        .into_iter()
        .collect();

        assert!(arena.has_expect_object(None));
        assert!(arena.has_expect_object(Some(GeneratorType::Colors)));
        assert!(!arena.has_expect_object(Some(GeneratorType::Strings)));
    }
}
