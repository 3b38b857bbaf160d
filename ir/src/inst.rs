use std::fmt;

use crate::{Label, Type};
use util::Id;

#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Literal {
        value: String,
        ty: Type,
    },
    Operand {
        name: Id,
        ty: Type,
    },
    // `ty` is the type of the element, not of the array
    ArrayOperand {
        name: Id,
        index: Box<Element>,
        ty: Type,
    },
}

impl Element {
    pub fn literal(value: impl Into<String>, ty: Type) -> Self {
        Element::Literal {
            value: value.into(),
            ty,
        }
    }

    pub fn operand(name: impl Into<Id>, ty: Type) -> Self {
        Element::Operand {
            name: name.into(),
            ty,
        }
    }

    pub fn ty(&self) -> &Type {
        match self {
            Element::Literal { ty, .. }
            | Element::Operand { ty, .. }
            | Element::ArrayOperand { ty, .. } => ty,
        }
    }

    pub fn var_name(&self) -> Option<&Id> {
        match self {
            Element::Literal { .. } => None,
            Element::Operand { name, .. } | Element::ArrayOperand { name, .. } => Some(name),
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Element::Literal { .. })
    }

    pub fn is_zero_literal(&self) -> bool {
        match self {
            Element::Literal { value, .. } => value.parse::<i64>() == Ok(0),
            _ => false,
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Element::Literal { value, ty } => write!(f, "{value}.{ty}"),
            Element::Operand { name, ty } => write!(f, "{name}.{ty}"),
            Element::ArrayOperand { name, index, ty } => write!(f, "{name}[{index}].{ty}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOpKind {
    Add,
    Sub,
    Mul,
    Div,
    Lt,
    Gt,
    Le,
    Ge,
    Eq,
    Ne,
    And,
    Or,
}

impl BinaryOpKind {
    pub fn is_relational(&self) -> bool {
        use BinaryOpKind::*;
        matches!(self, Lt | Gt | Le | Ge | Eq | Ne)
    }

    pub fn symbol(&self) -> &'static str {
        use BinaryOpKind::*;
        match self {
            Add => "+",
            Sub => "-",
            Mul => "*",
            Div => "/",
            Lt => "<",
            Gt => ">",
            Le => "<=",
            Ge => ">=",
            Eq => "==",
            Ne => "!=",
            And => "&&",
            Or => "||",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOpKind {
    Not,
    Neg,
}

impl UnaryOpKind {
    pub fn symbol(&self) -> &'static str {
        match self {
            UnaryOpKind::Not => "!",
            UnaryOpKind::Neg => "-",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallKind {
    Static,
    Virtual,
    Special,
}

impl fmt::Display for CallKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CallKind::Static => write!(f, "invokestatic"),
            CallKind::Virtual => write!(f, "invokevirtual"),
            CallKind::Special => write!(f, "invokespecial"),
        }
    }
}

// for `Static`, the receiver is an operand naming the class
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub kind: CallKind,
    pub receiver: Element,
    pub method: String,
    pub args: Vec<Element>,
    pub ret: Type,
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}(", self.kind)?;
        match (&self.kind, &self.receiver) {
            (CallKind::Static, Element::Operand { name, .. }) => write!(f, "{name}")?,
            (_, receiver) => write!(f, "{receiver}")?,
        }
        write!(f, ", \"{}\"", self.method)?;
        for arg in &self.args {
            write!(f, ", {arg}")?;
        }
        write!(f, ").{}", self.ret)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: Id,
    pub ty: Type,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}.{}", self.name, self.ty)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Compare {
        op: BinaryOpKind,
        lhs: Element,
        rhs: Element,
    },
    Not(Element),
    Test(Element),
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Condition::Compare { op, lhs, rhs } => {
                write!(f, "{lhs} {}.bool {rhs}", op.symbol())
            }
            Condition::Not(e) => write!(f, "!.bool {e}"),
            Condition::Test(e) => write!(f, "{e}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    Assign {
        dest: Element,
        ty: Type,
        rhs: Box<Instruction>,
    },
    SingleOp(Element),
    BinaryOp {
        op: BinaryOpKind,
        lhs: Element,
        rhs: Element,
        ty: Type,
    },
    UnaryOp {
        op: UnaryOpKind,
        operand: Element,
        ty: Type,
    },
    Return {
        ty: Type,
        value: Option<Element>,
    },
    Call(Call),
    // arrays: `ty` is the array type and `args` holds the length
    New {
        ty: Type,
        args: Vec<Element>,
    },
    GetField {
        object: Element,
        field: Field,
    },
    PutField {
        object: Element,
        field: Field,
        value: Element,
    },
    Goto(Label),
    CondBranch {
        cond: Condition,
        label: Label,
    },
    ArrayLength(Element),
}

impl Instruction {
    pub fn kind_name(&self) -> &'static str {
        use Instruction::*;
        match self {
            Assign { .. } => "Assign",
            SingleOp(_) => "SingleOp",
            BinaryOp { .. } => "BinaryOp",
            UnaryOp { .. } => "UnaryOp",
            Return { .. } => "Return",
            Call(c) => match c.kind {
                CallKind::Static => "CallStatic",
                CallKind::Virtual => "CallVirtual",
                CallKind::Special => "CallSpecial",
            },
            New { .. } => "New",
            GetField { .. } => "GetField",
            PutField { .. } => "PutField",
            Goto(_) => "Goto",
            CondBranch { .. } => "CondBranch",
            ArrayLength(_) => "ArrayLength",
        }
    }

    // elements read by the instruction; an array-element destination is read too
    pub fn reads(&self) -> Vec<&Element> {
        use Instruction::*;
        match self {
            Assign { dest, rhs, .. } => {
                let mut v = rhs.reads();
                if let Element::ArrayOperand { .. } = dest {
                    v.push(dest);
                }
                v
            }
            SingleOp(e) | ArrayLength(e) => vec![e],
            BinaryOp { lhs, rhs, .. } => vec![lhs, rhs],
            UnaryOp { operand, .. } => vec![operand],
            Return { value, .. } => value.iter().collect(),
            Call(c) => {
                let mut v = vec![];
                if c.kind != CallKind::Static {
                    v.push(&c.receiver);
                }
                v.extend(c.args.iter());
                v
            }
            New { args, .. } => args.iter().collect(),
            GetField { object, .. } => vec![object],
            PutField { object, value, .. } => vec![object, value],
            Goto(_) => vec![],
            CondBranch { cond, .. } => match cond {
                Condition::Compare { lhs, rhs, .. } => vec![lhs, rhs],
                Condition::Not(e) | Condition::Test(e) => vec![e],
            },
        }
    }

    pub fn writes(&self) -> Option<&Element> {
        match self {
            Instruction::Assign { dest, .. } => Some(dest),
            _ => None,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use Instruction::*;
        match self {
            Assign { dest, ty, rhs } => write!(f, "{dest} :=.{ty} {rhs}"),
            SingleOp(e) => write!(f, "{e}"),
            BinaryOp { op, lhs, rhs, ty } => write!(f, "{lhs} {}.{ty} {rhs}", op.symbol()),
            UnaryOp { op, operand, ty } => write!(f, "{}.{ty} {operand}", op.symbol()),
            Return { ty, value: Some(v) } => write!(f, "ret.{ty} {v}"),
            Return { ty, value: None } => write!(f, "ret.{ty}"),
            Call(c) => write!(f, "{c}"),
            New {
                ty: ty @ Type::Array(_),
                args,
            } => {
                write!(f, "new(array")?;
                for arg in args {
                    write!(f, ", {arg}")?;
                }
                write!(f, ").{ty}")
            }
            New { ty, args } => {
                write!(f, "new({ty}")?;
                for arg in args {
                    write!(f, ", {arg}")?;
                }
                write!(f, ").{ty}")
            }
            GetField { object, field } => write!(f, "getfield({object}, {field}).{}", field.ty),
            PutField {
                object,
                field,
                value,
            } => write!(f, "putfield({object}, {field}, {value}).V"),
            Goto(label) => write!(f, "goto {label}"),
            CondBranch { cond, label } => write!(f, "if ({cond}) goto {label}"),
            ArrayLength(e) => write!(f, "arraylength({e}).i32"),
        }
    }
}
