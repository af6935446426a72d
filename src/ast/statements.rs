use super::expressions::{Call, Expr, Map};

/// Statements
///
/// Assignments to maps are split by the kind of their right hand side, since
/// aggregation calls (`count()`, `quantize()`) are reported by function name
/// rather than by value type.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// A bare expression, evaluated for its side effects.
    Expr(Expr),
    /// `@map[keys] = expr`
    AssignMap { map: Map, expr: Expr },
    /// `@map[keys] = func(args)`
    AssignMapCall { map: Map, call: Call },
}

impl Statement {
    pub fn expr(expr: Expr) -> Self {
        Statement::Expr(expr)
    }

    pub fn assign(map: Map, expr: Expr) -> Self {
        Statement::AssignMap { map, expr }
    }

    pub fn assign_call(map: Map, call: Call) -> Self {
        Statement::AssignMapCall { map, call }
    }
}
