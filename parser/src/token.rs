use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Ident(String),
    Int(String),
    Str(String),
    Import,
    Extends,
    Field,
    Method,
    Construct,
    Public,
    Private,
    Protected,
    Static,
    Final,
    Goto,
    If,
    Ret,
    New,
    Array,
    GetField,
    PutField,
    ArrayLength,
    InvokeStatic,
    InvokeVirtual,
    InvokeSpecial,
    Dot,
    Comma,
    SemiColon,
    Colon,
    LPar,
    RPar,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Assign,
    Plus,
    Minus,
    Star,
    Slash,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
    EqualEqual,
    NotEqual,
    AndAnd,
    OrOr,
    Not,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use Token::*;
        match self {
            Ident(s) | Int(s) => write!(f, "{s}"),
            Str(s) => write!(f, "\"{s}\""),
            Import => write!(f, "import"),
            Extends => write!(f, "extends"),
            Field => write!(f, "field"),
            Method => write!(f, "method"),
            Construct => write!(f, "construct"),
            Public => write!(f, "public"),
            Private => write!(f, "private"),
            Protected => write!(f, "protected"),
            Static => write!(f, "static"),
            Final => write!(f, "final"),
            Goto => write!(f, "goto"),
            If => write!(f, "if"),
            Ret => write!(f, "ret"),
            New => write!(f, "new"),
            Array => write!(f, "array"),
            GetField => write!(f, "getfield"),
            PutField => write!(f, "putfield"),
            ArrayLength => write!(f, "arraylength"),
            InvokeStatic => write!(f, "invokestatic"),
            InvokeVirtual => write!(f, "invokevirtual"),
            InvokeSpecial => write!(f, "invokespecial"),
            Dot => write!(f, "."),
            Comma => write!(f, ","),
            SemiColon => write!(f, ";"),
            Colon => write!(f, ":"),
            LPar => write!(f, "("),
            RPar => write!(f, ")"),
            LBrace => write!(f, "{{"),
            RBrace => write!(f, "}}"),
            LBracket => write!(f, "["),
            RBracket => write!(f, "]"),
            Assign => write!(f, ":="),
            Plus => write!(f, "+"),
            Minus => write!(f, "-"),
            Star => write!(f, "*"),
            Slash => write!(f, "/"),
            Less => write!(f, "<"),
            Greater => write!(f, ">"),
            LessEqual => write!(f, "<="),
            GreaterEqual => write!(f, ">="),
            EqualEqual => write!(f, "=="),
            NotEqual => write!(f, "!="),
            AndAnd => write!(f, "&&"),
            OrOr => write!(f, "||"),
            Not => write!(f, "!"),
        }
    }
}
