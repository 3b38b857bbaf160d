use ir::*;
use util::{Id, Spanned};

// method bodies as written; labels and jumps are resolved after parsing
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Label(Spanned<Label>),
    Inst(Spanned<Instruction>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodDecl {
    pub method: Method,
    pub body: Vec<Item>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Member {
    Field(FieldDecl),
    Method(MethodDecl),
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnitDecl {
    pub imports: Vec<String>,
    pub name: Id,
    pub super_class: Option<Id>,
    pub members: Vec<Member>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Modifier {
    Access(AccessModifier),
    Static,
    Final,
}

#[derive(Debug, Default)]
pub struct Modifiers {
    pub access: Option<AccessModifier>,
    pub is_static: bool,
    pub is_final: bool,
}

impl Modifiers {
    pub fn new(list: Vec<Modifier>) -> Self {
        let mut m = Modifiers::default();
        for x in list {
            match x {
                Modifier::Access(a) => m.access = Some(a),
                Modifier::Static => m.is_static = true,
                Modifier::Final => m.is_final = true,
            }
        }
        m
    }
}

pub fn named_type(name: String) -> Type {
    match name.as_str() {
        "i32" => Type::Int,
        "bool" => Type::Bool,
        "String" => Type::String,
        "V" => Type::Void,
        _ => Type::Class(name),
    }
}

// `true.bool` and `false.bool` are literals
pub fn operand(name: Id, ty: Type) -> Element {
    match name.as_str() {
        "true" => Element::literal("1", ty),
        "false" => Element::literal("0", ty),
        _ => Element::Operand { name, ty },
    }
}

// an untyped name: a class used as a receiver, or `this`
pub fn bare(name: Id) -> Element {
    let ty = Type::Class(name.clone());
    Element::Operand { name, ty }
}

pub fn field(m: Modifiers, name: Id, ty: Type) -> FieldDecl {
    FieldDecl {
        name,
        ty,
        access: m.access.unwrap_or(AccessModifier::Default),
        is_static: m.is_static,
        is_final: m.is_final,
    }
}

pub fn method(m: Modifiers, name: Id, params: Vec<Param>, ret: Type, body: Vec<Item>) -> MethodDecl {
    let mut method = Method::new(name, ret);
    method.access = m.access.unwrap_or(AccessModifier::Default);
    method.is_static = m.is_static;
    method.params = params;
    MethodDecl { method, body }
}

pub fn constructor(m: Modifiers, params: Vec<Param>, ret: Type, body: Vec<Item>) -> MethodDecl {
    let access = m.access.unwrap_or(AccessModifier::Public);
    let mut decl = method(m, "<init>".to_string(), params, ret, body);
    decl.method.access = access;
    decl.method.is_constructor = true;
    decl
}
