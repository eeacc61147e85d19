use std::fmt;

/// A resolved MiniJava type.
///
/// `Unknown` marks an expression whose type could not be determined because a
/// diagnostic was already reported for it (or for something it depends on).
/// It is compatible with every other type so one root cause is reported once.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Int,
    Boolean,
    IntArray,
    Class(String),
    Unknown,
}

impl Type {
    pub fn is_array(&self) -> bool {
        matches!(self, Type::IntArray)
    }

    pub fn is_class(&self) -> bool {
        matches!(self, Type::Class(_))
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, Type::Int | Type::Boolean | Type::IntArray)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Type::Unknown)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Int => write!(f, "int"),
            Type::Boolean => write!(f, "boolean"),
            Type::IntArray => write!(f, "int[]"),
            Type::Class(name) => write!(f, "{name}"),
            Type::Unknown => write!(f, "<unknown>"),
        }
    }
}

/// Assignment/return legality: identical types, or either side `Unknown`.
/// There is no widening and no subtyping.
pub fn compatible(declared: &Type, actual: &Type) -> bool {
    declared.is_unknown() || actual.is_unknown() || declared == actual
}
