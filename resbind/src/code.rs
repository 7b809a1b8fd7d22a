//! Language-neutral description of the generated source file.
//!
//! The driver assembles a [`GeneratedFile`] per source set and hands it to a
//! [`crate::source::SourceWriter`], which owns the concrete syntax.

use std::collections::BTreeSet;
use std::fmt;

use crate::metadata::{ObjectModifier, ObjectType, PropertyModifier};
use crate::settings::Visibility;

/// Package holding the runtime resource types.
pub const RUNTIME_PACKAGE: &str = "resbind.runtime";

/// Fully qualified symbol referenced by generated code.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Import(String);

impl Import {
    /// Creates an import of `name` from `package`.
    #[must_use]
    pub fn new(package: &str, name: &str) -> Self {
        Self(format!("{package}.{name}"))
    }

    /// Imports a symbol from the runtime package.
    #[must_use]
    pub fn runtime(name: &str) -> Self {
        Self::new(RUNTIME_PACKAGE, name)
    }

    /// Fully qualified path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Import {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Verbatim scaffolding declared before the resource properties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    /// Declared name, used to avoid emitting one member twice.
    pub name: String,
    /// Declaration text; continuation lines are indented by the writer.
    pub declaration: String,
}

impl Member {
    /// Creates a member.
    #[must_use]
    pub fn new(name: impl Into<String>, declaration: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declaration: declaration.into(),
        }
    }
}

/// One accessor inside a type declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDecl {
    /// Accessor name.
    pub name: String,
    /// Resolved property modifier.
    pub modifier: PropertyModifier,
    /// Declared value type.
    pub value_type: String,
    /// Initialiser expression; `None` for abstract members.
    pub initializer: Option<String>,
}

/// A nested object or a contract interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDecl {
    /// Declared name.
    pub name: String,
    /// Object or interface.
    pub object_type: ObjectType,
    /// Hierarchy role.
    pub modifier: ObjectModifier,
    /// Implemented contracts, most general first.
    pub supertypes: Vec<String>,
    /// Scaffolding emitted before the properties.
    pub members: Vec<Member>,
    /// Accessors in declaration order.
    pub properties: Vec<PropertyDecl>,
}

/// The top-level registry type of a source set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerDecl {
    /// Container name (`MR` by default).
    pub name: String,
    /// Hierarchy role of the container.
    pub modifier: ObjectModifier,
    /// Platform scaffolding emitted before the nested objects.
    pub members: Vec<Member>,
    /// Nested objects, one per generator type.
    pub objects: Vec<TypeDecl>,
}

/// Everything generated for one source set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// Package of every declaration.
    pub package: String,
    /// Visibility keyword applied to public declarations.
    pub visibility: Visibility,
    /// Imports, kept sorted for stable output.
    pub imports: BTreeSet<Import>,
    /// Top-level contract interfaces.
    pub interfaces: Vec<TypeDecl>,
    /// Container, absent when the source set only contributes contracts.
    pub container: Option<ContainerDecl>,
}

impl GeneratedFile {
    /// Creates an empty file for `package`.
    #[must_use]
    pub fn new(package: impl Into<String>, visibility: Visibility) -> Self {
        Self {
            package: package.into(),
            visibility,
            imports: BTreeSet::new(),
            interfaces: Vec::new(),
            container: None,
        }
    }

    /// Whether the file declares nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.interfaces.is_empty()
            && self
                .container
                .as_ref()
                .is_none_or(|container| container.objects.is_empty())
    }
}

/// Appends members whose names are not yet present.
pub fn push_unique_members(target: &mut Vec<Member>, members: impl IntoIterator<Item = Member>) {
    for member in members {
        if target.iter().all(|existing| existing.name != member.name) {
            target.push(member);
        }
    }
}

/// Quotes `value` as a string literal.
///
/// # Examples
///
/// ```
/// use resbind::code::string_literal;
///
/// assert_eq!(string_literal("a\"b$c"), "\"a\\\"b\\$c\"");
/// ```
#[must_use]
pub fn string_literal(value: &str) -> String {
    let mut literal = String::with_capacity(value.len() + 2);
    literal.push('"');
    for ch in value.chars() {
        match ch {
            '\\' => literal.push_str("\\\\"),
            '"' => literal.push_str("\\\""),
            '$' => literal.push_str("\\$"),
            '\n' => literal.push_str("\\n"),
            '\r' => literal.push_str("\\r"),
            '\t' => literal.push_str("\\t"),
            _ => literal.push(ch),
        }
    }
    literal.push('"');
    literal
}
