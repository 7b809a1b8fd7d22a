//! Rendering of [`GeneratedFile`] descriptions to source files.

use camino::{Utf8Path, Utf8PathBuf};

use crate::code::{ContainerDecl, GeneratedFile, Member, PropertyDecl, TypeDecl};
use crate::error::GenerateError;
use crate::fs_helpers;
use crate::metadata::{ObjectModifier, ObjectType};

/// Writes a generated file description to disk.
pub trait SourceWriter {
    /// Renders `file` as the source type `type_name` beneath `sources_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::Io`] when the file cannot be written.
    fn write(
        &self,
        file: &GeneratedFile,
        type_name: &str,
        sources_dir: &Utf8Path,
    ) -> Result<Utf8PathBuf, GenerateError>;
}

/// Deterministic Kotlin renderer.
#[derive(Debug, Clone, Copy, Default)]
pub struct KotlinSourceWriter;

const INDENT: &str = "    ";
const HEADER: &str = "// Generated by resbind. Do not edit.";

impl KotlinSourceWriter {
    /// Location of the rendered file for `package` and `type_name`.
    #[must_use]
    pub fn file_path(sources_dir: &Utf8Path, package: &str, type_name: &str) -> Utf8PathBuf {
        let mut path = sources_dir.to_path_buf();
        for segment in package.split('.').filter(|segment| !segment.is_empty()) {
            path.push(segment);
        }
        path.push(format!("{type_name}.kt"));
        path
    }

    /// Renders `file` to Kotlin source text.
    #[must_use]
    pub fn render(file: &GeneratedFile) -> String {
        let mut out = Renderer::new(file.visibility.keyword());
        out.line(0, HEADER);
        out.line(0, &format!("package {}", file.package));
        if !file.imports.is_empty() {
            out.blank();
            for import in &file.imports {
                out.line(0, &format!("import {import}"));
            }
        }
        for interface in &file.interfaces {
            out.blank();
            out.type_decl(0, interface);
        }
        if let Some(container) = &file.container {
            out.blank();
            out.container(container);
        }
        out.finish()
    }
}

impl SourceWriter for KotlinSourceWriter {
    fn write(
        &self,
        file: &GeneratedFile,
        type_name: &str,
        sources_dir: &Utf8Path,
    ) -> Result<Utf8PathBuf, GenerateError> {
        let path = Self::file_path(sources_dir, &file.package, type_name);
        fs_helpers::write_text(&path, &Self::render(file))
    }
}

struct Renderer<'a> {
    visibility: &'a str,
    text: String,
}

impl<'a> Renderer<'a> {
    const fn new(visibility: &'a str) -> Self {
        Self {
            visibility,
            text: String::new(),
        }
    }

    fn line(&mut self, depth: usize, content: &str) {
        for _ in 0..depth {
            self.text.push_str(INDENT);
        }
        self.text.push_str(content);
        self.text.push('\n');
    }

    fn blank(&mut self) {
        self.text.push('\n');
    }

    fn members(&mut self, depth: usize, members: &[Member]) {
        for member in members {
            for line in member.declaration.lines() {
                self.line(depth, line);
            }
        }
    }

    fn container(&mut self, container: &ContainerDecl) {
        let header = format!(
            "{} {}object {} {{",
            self.visibility,
            modifier_prefix(container.modifier),
            container.name
        );
        self.line(0, &header);
        self.members(1, &container.members);
        for (index, object) in container.objects.iter().enumerate() {
            if index > 0 || !container.members.is_empty() {
                self.blank();
            }
            self.type_decl(1, object);
        }
        self.line(0, "}");
    }

    fn type_decl(&mut self, depth: usize, decl: &TypeDecl) {
        let keyword = match decl.object_type {
            ObjectType::Object => "object",
            ObjectType::Interface => "interface",
        };
        let mut header = format!(
            "{} {}{keyword} {}",
            self.visibility,
            modifier_prefix(decl.modifier),
            decl.name
        );
        if !decl.supertypes.is_empty() {
            header.push_str(" : ");
            header.push_str(&decl.supertypes.join(", "));
        }
        if decl.members.is_empty() && decl.properties.is_empty() {
            self.line(depth, &header);
            return;
        }
        header.push_str(" {");
        self.line(depth, &header);
        self.members(depth + 1, &decl.members);
        if !decl.members.is_empty() && !decl.properties.is_empty() {
            self.blank();
        }
        for property in &decl.properties {
            let rendered = self.property(property);
            self.line(depth + 1, &rendered);
        }
        self.line(depth, "}");
    }

    fn property(&self, property: &PropertyDecl) -> String {
        let mut rendered = String::from(self.visibility);
        if let Some(keyword) = property.modifier.keyword() {
            rendered.push(' ');
            rendered.push_str(keyword);
        }
        rendered.push_str(&format!(" val {}: {}", property.name, property.value_type));
        if let Some(initializer) = &property.initializer {
            rendered.push_str(" = ");
            rendered.push_str(initializer);
        }
        rendered
    }

    fn finish(self) -> String {
        self.text
    }
}

const fn modifier_prefix(modifier: ObjectModifier) -> &'static str {
    match modifier {
        ObjectModifier::None => "",
        ObjectModifier::Expect => "expect ",
        ObjectModifier::Actual => "actual ",
    }
}
