use std::fmt;
use util::Id;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Int,
    Bool,
    String,
    Void,
    Array(Box<Type>),
    Class(Id),
}

impl Type {
    #[inline]
    pub fn array_of(t: Type) -> Type {
        Type::Array(Box::new(t))
    }

    // int and boolean share the same JVM representation
    pub fn is_int_like(&self) -> bool {
        matches!(self, Type::Int | Type::Bool)
    }

    pub fn is_void(&self) -> bool {
        *self == Type::Void
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use Type::*;
        match self {
            Int => write!(f, "i32"),
            Bool => write!(f, "bool"),
            String => write!(f, "String"),
            Void => write!(f, "V"),
            Array(t) => write!(f, "array.{}", t),
            Class(name) => write!(f, "{}", name),
        }
    }
}
