use std::fmt::Display;

/// Result type of an expression.
///
/// `None` marks an expression whose type is unknown: either it was already
/// reported as an error, or it reads a map whose value type has not been seen
/// yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    None,
    Integer,
    /// Histogram aggregation, the result of `quantize()`
    Quantize,
    /// Counter aggregation, the result of `count()`
    Count,
}

impl Type {
    pub fn as_str(&self) -> &'static str {
        match self {
            Type::None => "none",
            Type::Integer => "integer",
            Type::Quantize => "quantize",
            Type::Count => "count",
        }
    }

    pub fn is_known(&self) -> bool {
        *self != Type::None
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", typestr(*self))
    }
}

/// Name of a type as it appears in diagnostics.
pub fn typestr(ty: Type) -> &'static str {
    ty.as_str()
}
