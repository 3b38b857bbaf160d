use std::fmt;

use ir::{BinaryOpKind, CallKind, Type};

// category of a slot or array element: `i` or `a` prefixed opcodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Int,
    Ref,
}

impl Kind {
    pub fn of(ty: &Type) -> Self {
        if ty.is_int_like() {
            Kind::Int
        } else {
            Kind::Ref
        }
    }

    fn prefix(&self) -> &'static str {
        match self {
            Kind::Int => "i",
            Kind::Ref => "a",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cond {
    Eq,
    Ne,
    Lt,
    Ge,
    Gt,
    Le,
}

impl Cond {
    pub fn from_op(op: BinaryOpKind) -> Option<Self> {
        let c = match op {
            BinaryOpKind::Eq => Cond::Eq,
            BinaryOpKind::Ne => Cond::Ne,
            BinaryOpKind::Lt => Cond::Lt,
            BinaryOpKind::Ge => Cond::Ge,
            BinaryOpKind::Gt => Cond::Gt,
            BinaryOpKind::Le => Cond::Le,
            _ => return None,
        };
        Some(c)
    }

    // the same test with both operands exchanged
    pub fn swap(self) -> Self {
        match self {
            Cond::Lt => Cond::Gt,
            Cond::Gt => Cond::Lt,
            Cond::Le => Cond::Ge,
            Cond::Ge => Cond::Le,
            c => c,
        }
    }
}

impl fmt::Display for Cond {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            Cond::Eq => "eq",
            Cond::Ne => "ne",
            Cond::Lt => "lt",
            Cond::Ge => "ge",
            Cond::Gt => "gt",
            Cond::Le => "le",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Inst {
    IConstM1,
    IConst(i32),
    BiPush(i32),
    SiPush(i32),
    Ldc(String),
    Load(Kind, usize),
    Store(Kind, usize),
    ArrayLoad(Kind),
    ArrayStore(Kind),
    IAdd,
    ISub,
    IMul,
    IDiv,
    INeg,
    IXor,
    IInc(usize, i32),
    If(Cond, String),
    IfICmp(Cond, String),
    Goto(String),
    Return(Option<Kind>),
    Invoke {
        kind: CallKind,
        // `Owner/name(params)ret`
        target: String,
        pops: usize,
        pushes: usize,
    },
    New(String),
    NewArray(String),
    ANewArray(String),
    ArrayLength,
    GetField {
        target: String,
        desc: String,
    },
    PutField {
        target: String,
        desc: String,
    },
    Pop,
}

impl Inst {
    /// Net change of the operand stack height.
    pub fn stack_effect(&self) -> i32 {
        use Inst::*;
        match self {
            IConstM1 | IConst(_) | BiPush(_) | SiPush(_) | Ldc(_) | Load(..) | New(_) => 1,
            Store(..) | IAdd | ISub | IMul | IDiv | IXor | If(..) | ArrayLoad(_) | Pop => -1,
            ArrayStore(_) => -3,
            IfICmp(..) | PutField { .. } => -2,
            Return(Some(_)) => -1,
            Invoke { pops, pushes, .. } => *pushes as i32 - *pops as i32,
            INeg | IInc(..) | Goto(_) | Return(None) | NewArray(_) | ANewArray(_) | ArrayLength
            | GetField { .. } => 0,
        }
    }

    pub fn jump_target(&self) -> Option<&str> {
        match self {
            Inst::If(_, l) | Inst::IfICmp(_, l) | Inst::Goto(l) => Some(l.as_str()),
            _ => None,
        }
    }

    // control never falls through to the next line
    pub fn is_terminator(&self) -> bool {
        matches!(self, Inst::Goto(_) | Inst::Return(_))
    }

    pub fn slot(&self) -> Option<usize> {
        match self {
            Inst::Load(_, s) | Inst::Store(_, s) | Inst::IInc(s, _) => Some(*s),
            _ => None,
        }
    }
}

/// Shortest instruction pushing the integer `v`.
pub fn push_int(v: i32) -> Inst {
    match v {
        -1 => Inst::IConstM1,
        0..=5 => Inst::IConst(v),
        -128..=127 => Inst::BiPush(v),
        -32768..=32767 => Inst::SiPush(v),
        _ => Inst::Ldc(v.to_string()),
    }
}

impl fmt::Display for Inst {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use Inst::*;
        match self {
            IConstM1 => write!(f, "iconst_m1"),
            IConst(v) => write!(f, "iconst_{v}"),
            BiPush(v) => write!(f, "bipush {v}"),
            SiPush(v) => write!(f, "sipush {v}"),
            Ldc(v) => write!(f, "ldc {v}"),
            Load(k, s) if *s <= 3 => write!(f, "{}load_{s}", k.prefix()),
            Load(k, s) => write!(f, "{}load {s}", k.prefix()),
            Store(k, s) if *s <= 3 => write!(f, "{}store_{s}", k.prefix()),
            Store(k, s) => write!(f, "{}store {s}", k.prefix()),
            ArrayLoad(k) => write!(f, "{}aload", k.prefix()),
            ArrayStore(k) => write!(f, "{}astore", k.prefix()),
            IAdd => write!(f, "iadd"),
            ISub => write!(f, "isub"),
            IMul => write!(f, "imul"),
            IDiv => write!(f, "idiv"),
            INeg => write!(f, "ineg"),
            IXor => write!(f, "ixor"),
            IInc(s, v) => write!(f, "iinc {s} {v}"),
            If(c, l) => write!(f, "if{c} {l}"),
            IfICmp(c, l) => write!(f, "if_icmp{c} {l}"),
            Goto(l) => write!(f, "goto {l}"),
            Return(None) => write!(f, "return"),
            Return(Some(k)) => write!(f, "{}return", k.prefix()),
            Invoke { kind, target, .. } => write!(f, "{kind} {target}"),
            New(c) => write!(f, "new {c}"),
            NewArray(t) => write!(f, "newarray {t}"),
            ANewArray(c) => write!(f, "anewarray {c}"),
            ArrayLength => write!(f, "arraylength"),
            GetField { target, desc } => write!(f, "getfield {target} {desc}"),
            PutField { target, desc } => write!(f, "putfield {target} {desc}"),
            Pop => write!(f, "pop"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Line {
    Label(String),
    Inst(Inst),
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Line::Label(l) => write!(f, "{l}:"),
            Line::Inst(inst) => write!(f, "\t{inst}"),
        }
    }
}
