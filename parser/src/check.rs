use ir::*;
use util::{Id, Span, Spanned};

use crate::error::{ParseError, ParseErrorKind};
use crate::syntax::{Item, Member, MethodDecl, UnitDecl};

type Result<T> = std::result::Result<T, ParseError>;

fn elements_mut(inst: &mut Instruction) -> Vec<&mut Element> {
    use Instruction::*;
    match inst {
        Assign { dest, rhs, .. } => {
            let mut v = elements_mut(rhs);
            v.push(dest);
            v
        }
        SingleOp(e) | ArrayLength(e) => vec![e],
        BinaryOp { lhs, rhs, .. } => vec![lhs, rhs],
        UnaryOp { operand, .. } => vec![operand],
        Return { value, .. } => value.iter_mut().collect(),
        Call(call) => {
            let mut v = vec![&mut call.receiver];
            v.extend(call.args.iter_mut());
            v
        }
        New { args, .. } => args.iter_mut().collect(),
        GetField { object, .. } => vec![object],
        PutField { object, value, .. } => vec![object, value],
        CondBranch { cond, .. } => match cond {
            Condition::Compare { lhs, rhs, .. } => vec![lhs, rhs],
            Condition::Not(e) | Condition::Test(e) => vec![e],
        },
        Goto(_) => vec![],
    }
}

fn jump_target(inst: &Instruction) -> Option<&Label> {
    match inst {
        Instruction::Goto(label) | Instruction::CondBranch { label, .. } => Some(label),
        _ => None,
    }
}

fn method(decl: MethodDecl, class: &str) -> Result<Method> {
    let MethodDecl { mut method, body } = decl;
    let mut jumps: Vec<(Label, Span)> = vec![];

    for item in body {
        match item {
            Item::Label(Spanned { item: label, loc }) => {
                if method.label_target(&label).is_some() {
                    return Err(Spanned::new(ParseErrorKind::DuplicatedLabel(label), loc));
                }
                method.labels.push((label, method.instructions.len()));
            }
            Item::Inst(Spanned { item: mut inst, loc }) => {
                if let Instruction::Assign { dest, .. } = &inst {
                    if dest.is_literal() {
                        return Err(Spanned::new(
                            ParseErrorKind::InvalidAssignTarget(dest.to_string()),
                            loc,
                        ));
                    }
                }

                for e in elements_mut(&mut inst) {
                    if let Element::Operand { name, ty } = e {
                        if name.as_str() == "this" {
                            *ty = Type::Class(class.to_string());
                        }
                    }
                }

                if let Some(label) = jump_target(&inst) {
                    jumps.push((label.clone(), loc));
                }
                method.instructions.push(inst);
            }
        }
    }

    for (label, loc) in jumps {
        if method.label_target(&label).is_none() {
            return Err(Spanned::new(
                ParseErrorKind::UndefinedLabel(label, method.name.clone()),
                loc,
            ));
        }
    }

    method.var_table = build_var_table(&method, class);
    log::debug!(
        "parsed `{}`: {} instruction(s), {} variable(s)",
        method.name,
        method.instructions.len(),
        method.var_table.len()
    );
    Ok(method)
}

pub fn unit(decl: UnitDecl) -> Result<ClassUnit> {
    let UnitDecl {
        imports,
        name,
        super_class,
        members,
    } = decl;

    let mut unit = ClassUnit::new(name);
    unit.imports = imports;
    unit.super_class = super_class;

    for m in members {
        match m {
            Member::Field(f) => unit.fields.push(f),
            Member::Method(m) => {
                let m = method(m, &unit.name)?;
                unit.methods.push(m);
            }
        }
    }

    Ok(unit)
}

fn register(table: &mut VarTable, next: &mut usize, e: &Element) {
    let (name, ty) = match e {
        Element::Literal { .. } => return,
        Element::Operand { name, ty } => (name, ty.clone()),
        Element::ArrayOperand { name, index, ty } => {
            register(table, next, index);
            (name, Type::array_of(ty.clone()))
        }
    };

    if name == "this" || table.contains_key(name) {
        return;
    }
    table.insert(name.clone(), Descriptor::new(VarScope::Local, *next, ty));
    *next += 1;
}

// `this`, then parameters, then locals in order of first appearance
pub fn build_var_table(method: &Method, class: &str) -> VarTable {
    let mut table = VarTable::default();
    let mut next = 0;

    if !method.is_static {
        table.insert(
            "this".to_string(),
            Descriptor::new(VarScope::This, 0, Type::Class(Id::from(class))),
        );
        next = 1;
    }

    for p in &method.params {
        table.insert(
            p.name.clone(),
            Descriptor::new(VarScope::Parameter, next, p.ty.clone()),
        );
        next += 1;
    }

    for inst in &method.instructions {
        if let Some(dest) = inst.writes() {
            register(&mut table, &mut next, dest);
        }
        for e in inst.reads() {
            register(&mut table, &mut next, e);
        }
    }

    table
}
