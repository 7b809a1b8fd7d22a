//! Metadata describing generated containers and their resource properties.
//!
//! A [`GeneratedObject`] is produced per source set and generator type. The
//! finalised list is persisted with [`file`] and read back by descendant
//! source sets, where [`arena`] indexes it for the resolver.

pub mod arena;
pub mod file;
mod resource;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use arena::{ContractIndex, MetadataArena, ObjectId};
pub use resource::{
    Density, ImageVariant, PluralForms, PluralQuantity, ResourceData, ResourceEntry, ResourceKind,
    ResourceSet, Rgba,
};

/// Resource family served by one nested container object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeneratorType {
    /// `strings`
    Strings,
    /// `plurals`
    Plurals,
    /// `assets`
    Assets,
    /// `fonts`
    Fonts,
    /// `colors`
    Colors,
    /// `images`
    Images,
}

impl GeneratorType {
    /// Every generator type, in generation order.
    pub const ALL: [Self; 6] = [
        Self::Strings,
        Self::Plurals,
        Self::Assets,
        Self::Fonts,
        Self::Colors,
        Self::Images,
    ];

    /// Generator type serving `kind`.
    #[must_use]
    pub const fn for_kind(kind: ResourceKind) -> Self {
        match kind {
            ResourceKind::String => Self::Strings,
            ResourceKind::Plural => Self::Plurals,
            ResourceKind::Asset => Self::Assets,
            ResourceKind::Font => Self::Fonts,
            ResourceKind::Color => Self::Colors,
            ResourceKind::Image => Self::Images,
        }
    }

    /// Resource kind served by this generator type.
    #[must_use]
    pub const fn kind(self) -> ResourceKind {
        match self {
            Self::Strings => ResourceKind::String,
            Self::Plurals => ResourceKind::Plural,
            Self::Assets => ResourceKind::Asset,
            Self::Fonts => ResourceKind::Font,
            Self::Colors => ResourceKind::Color,
            Self::Images => ResourceKind::Image,
        }
    }

    /// Name of the nested object inside the container (`strings`).
    #[must_use]
    pub const fn object_name(self) -> &'static str {
        match self {
            Self::Strings => "strings",
            Self::Plurals => "plurals",
            Self::Assets => "assets",
            Self::Fonts => "fonts",
            Self::Colors => "colors",
            Self::Images => "images",
        }
    }

    /// Suffix used in contract interface names (`Strings`).
    #[must_use]
    pub const fn type_suffix(self) -> &'static str {
        match self {
            Self::Strings => "Strings",
            Self::Plurals => "Plurals",
            Self::Assets => "Assets",
            Self::Fonts => "Fonts",
            Self::Colors => "Colors",
            Self::Images => "Images",
        }
    }

    /// Runtime type of each generated accessor.
    #[must_use]
    pub const fn value_type(self) -> &'static str {
        match self {
            Self::Strings => "StringResource",
            Self::Plurals => "PluralsResource",
            Self::Assets => "AssetResource",
            Self::Fonts => "FontResource",
            Self::Colors => "ColorResource",
            Self::Images => "ImageResource",
        }
    }

    /// Contract interface name for `source_set` (`__CommonMainStrings`).
    ///
    /// # Examples
    ///
    /// ```
    /// use resbind::metadata::GeneratorType;
    ///
    /// assert_eq!(
    ///     GeneratorType::Strings.contract_name("commonMain"),
    ///     "__CommonMainStrings"
    /// );
    /// ```
    #[must_use]
    pub fn contract_name(self, source_set: &str) -> String {
        let mut chars = source_set.chars();
        let capitalised: String = chars
            .next()
            .map(|first| first.to_uppercase().chain(chars).collect())
            .unwrap_or_default();
        format!("__{capitalised}{}", self.type_suffix())
    }
}

impl fmt::Display for GeneratorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.object_name())
    }
}

/// Structural shape of a generated declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectType {
    /// Concrete singleton.
    Object,
    /// Abstract contract.
    Interface,
}

/// Hierarchy role of a whole declaration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectModifier {
    /// Plain declaration.
    #[default]
    None,
    /// Abstract root realised by each platform.
    Expect,
    /// Platform realisation of an expected declaration.
    Actual,
}

/// Role of one property inside its declaration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyModifier {
    /// Plain declaration.
    #[default]
    None,
    /// Re-implements a member inherited from a contract.
    Override,
    /// Platform realisation of a newly introduced member.
    Actual,
}

impl PropertyModifier {
    /// Keyword emitted before the property, if any.
    #[must_use]
    pub const fn keyword(self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Override => Some("override"),
            Self::Actual => Some("actual"),
        }
    }
}

/// One resource accessor inside a generated declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedProperty {
    /// Accessor name.
    pub name: String,
    /// Resolved role of the accessor.
    pub modifier: PropertyModifier,
    /// Resource backing the accessor.
    pub resource: ResourceEntry,
}

/// One generated declaration for a source set and generator type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedObject {
    /// Source set that produced the declaration.
    pub source_set: String,
    /// Declared type name.
    pub name: String,
    /// Resource family served.
    pub generator_type: GeneratorType,
    /// Concrete object or abstract contract.
    pub object_type: ObjectType,
    /// Role of the declaration as a whole.
    #[serde(default)]
    pub modifier: ObjectModifier,
    /// Accessors in declaration order.
    #[serde(default)]
    pub properties: Vec<GeneratedProperty>,
}

impl GeneratedObject {
    /// Creates a declaration with no properties.
    #[must_use]
    pub fn new(
        source_set: impl Into<String>,
        name: impl Into<String>,
        generator_type: GeneratorType,
        object_type: ObjectType,
        modifier: ObjectModifier,
    ) -> Self {
        Self {
            source_set: source_set.into(),
            name: name.into(),
            generator_type,
            object_type,
            modifier,
            properties: Vec::new(),
        }
    }

    /// Whether the declaration is a concrete singleton.
    #[must_use]
    pub const fn is_object(&self) -> bool {
        matches!(self.object_type, ObjectType::Object)
    }

    /// Whether the declaration is an abstract contract.
    #[must_use]
    pub const fn is_interface(&self) -> bool {
        matches!(self.object_type, ObjectType::Interface)
    }

    /// Looks up a property by accessor name.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&GeneratedProperty> {
        self.properties.iter().find(|property| property.name == name)
    }

    /// Whether the declaration has a property named `name`.
    #[must_use]
    pub fn declares(&self, name: &str) -> bool {
        self.property(name).is_some()
    }
}
