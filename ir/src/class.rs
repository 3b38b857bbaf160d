use std::fmt;

use crate::{Instruction, Label, Type};
use util::{Id, Map};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VarScope {
    This,
    Parameter,
    Local,
    Field,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Descriptor {
    pub scope: VarScope,
    pub slot: usize,
    pub ty: Type,
}

impl Descriptor {
    pub fn new(scope: VarScope, slot: usize, ty: Type) -> Self {
        Self { scope, slot, ty }
    }

    // fixed by the calling convention, never reassigned
    pub fn is_pinned(&self) -> bool {
        matches!(self.scope, VarScope::This | VarScope::Parameter)
    }
}

pub type VarTable = Map<Id, Descriptor>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessModifier {
    Public,
    Private,
    Protected,
    Default,
}

impl fmt::Display for AccessModifier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AccessModifier::Public => write!(f, "public "),
            AccessModifier::Private => write!(f, "private "),
            AccessModifier::Protected => write!(f, "protected "),
            AccessModifier::Default => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    pub name: Id,
    pub ty: Type,
    pub access: AccessModifier,
    pub is_static: bool,
    pub is_final: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: Id,
    pub ty: Type,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Method {
    pub name: String,
    pub access: AccessModifier,
    pub is_static: bool,
    pub is_constructor: bool,
    pub params: Vec<Param>,
    pub ret: Type,
    pub instructions: Vec<Instruction>,
    // (label, index of the instruction it precedes), in definition order
    pub labels: Vec<(Label, usize)>,
    pub var_table: VarTable,
}

impl Method {
    pub fn new(name: impl Into<String>, ret: Type) -> Self {
        Self {
            name: name.into(),
            access: AccessModifier::Public,
            is_static: false,
            is_constructor: false,
            params: vec![],
            ret,
            instructions: vec![],
            labels: vec![],
            var_table: VarTable::default(),
        }
    }

    pub fn labels_at(&self, idx: usize) -> impl Iterator<Item = &Label> {
        self.labels
            .iter()
            .filter(move |(_, i)| *i == idx)
            .map(|(l, _)| l)
    }

    pub fn label_target(&self, label: &str) -> Option<usize> {
        self.labels.iter().find(|(l, _)| l == label).map(|(_, i)| *i)
    }

    fn format_indented(&self, f: &mut fmt::Formatter, class: &str, level: usize) -> fmt::Result {
        let indent = |level: usize| "    ".repeat(level);
        if self.is_constructor {
            write!(f, "{}.construct {}", indent(level), class)?;
        } else {
            write!(f, "{}.method {}", indent(level), self.access)?;
            if self.is_static {
                write!(f, "static ")?;
            }
            write!(f, "{}", self.name)?;
        }
        let params: Vec<_> = self
            .params
            .iter()
            .map(|p| format!("{}.{}", p.name, p.ty))
            .collect();
        util::format_vec(f, &params, "(", ", ", ")")?;
        writeln!(f, ".{} {{", self.ret)?;

        for (idx, inst) in self.instructions.iter().enumerate() {
            for label in self.labels_at(idx) {
                writeln!(f, "{}{}:", indent(level), label)?;
            }
            writeln!(f, "{}{};", indent(level + 1), inst)?;
        }
        for label in self.labels_at(self.instructions.len()) {
            writeln!(f, "{}{}:", indent(level), label)?;
        }

        writeln!(f, "{}}}", indent(level))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassUnit {
    pub name: Id,
    pub super_class: Option<Id>,
    pub imports: Vec<String>,
    pub fields: Vec<FieldDecl>,
    pub methods: Vec<Method>,
}

impl ClassUnit {
    pub fn new(name: impl Into<Id>) -> Self {
        Self {
            name: name.into(),
            super_class: None,
            imports: vec![],
            fields: vec![],
            methods: vec![],
        }
    }

    // `Foo` -> `a/b/Foo` when `a.b.Foo` is imported
    pub fn resolve_class(&self, name: &str) -> String {
        if name == self.name {
            return name.to_string();
        }

        self.imports
            .iter()
            .find(|imp| imp.rsplit('.').next() == Some(name))
            .map(|imp| imp.replace('.', "/"))
            .unwrap_or_else(|| name.to_string())
    }

    pub fn super_class_path(&self) -> String {
        match &self.super_class {
            Some(s) => self.resolve_class(s),
            None => "java/lang/Object".to_string(),
        }
    }

    pub fn method(&self, name: &str) -> Option<&Method> {
        self.methods.iter().find(|m| m.name == name)
    }
}

impl fmt::Display for ClassUnit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for imp in &self.imports {
            writeln!(f, "import {imp};")?;
        }
        write!(f, "{}", self.name)?;
        if let Some(s) = &self.super_class {
            write!(f, " extends {s}")?;
        }
        writeln!(f, " {{")?;

        for field in &self.fields {
            write!(f, "    .field {}", field.access)?;
            if field.is_static {
                write!(f, "static ")?;
            }
            if field.is_final {
                write!(f, "final ")?;
            }
            writeln!(f, "{}.{};", field.name, field.ty)?;
        }

        for method in &self.methods {
            writeln!(f)?;
            method.format_indented(f, &self.name, 1)?;
        }

        writeln!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_imported_class() {
        let mut unit = ClassUnit::new("Simple");
        unit.imports = vec!["io".to_string(), "a.b.Foo".to_string()];
        unit.super_class = Some("Foo".to_string());

        assert_eq!(unit.resolve_class("Foo"), "a/b/Foo");
        assert_eq!(unit.resolve_class("io"), "io");
        assert_eq!(unit.resolve_class("Simple"), "Simple");
        assert_eq!(unit.resolve_class("Bar"), "Bar");
        assert_eq!(unit.super_class_path(), "a/b/Foo");
        assert_eq!(unit.resolve_class("b"), "b");
    }

    #[test]
    fn default_super_class() {
        let unit = ClassUnit::new("Simple");
        assert_eq!(unit.super_class_path(), "java/lang/Object");
    }

    #[test]
    fn pinned_scopes() {
        assert!(Descriptor::new(VarScope::This, 0, Type::Class("A".to_string())).is_pinned());
        assert!(Descriptor::new(VarScope::Parameter, 1, Type::Int).is_pinned());
        assert!(!Descriptor::new(VarScope::Local, 2, Type::Int).is_pinned());
    }
}
