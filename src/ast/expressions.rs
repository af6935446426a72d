use std::fmt::Display;

use crate::lexer::tokens::TokenKind;

/// Expressions
///
/// Closed set of expression kinds. Every pass over the tree matches on this
/// exhaustively, so adding a kind is a compile error until every visitor
/// handles it.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Integer(i64),
    /// Value supplied by the tracing environment, e.g. `pid`
    Builtin(String),
    Call(Call),
    Map(Map),
    Binop {
        left: Box<Expr>,
        op: BinaryOperator,
        right: Box<Expr>,
    },
    Unop {
        op: UnaryOperator,
        expr: Box<Expr>,
    },
}

impl Expr {
    pub fn integer(value: i64) -> Self {
        Expr::Integer(value)
    }

    pub fn builtin(ident: &str) -> Self {
        Expr::Builtin(ident.to_string())
    }

    pub fn binop(left: Expr, op: BinaryOperator, right: Expr) -> Self {
        Expr::Binop {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    pub fn unop(op: UnaryOperator, expr: Expr) -> Self {
        Expr::Unop {
            op,
            expr: Box::new(expr),
        }
    }
}

impl From<Call> for Expr {
    fn from(call: Call) -> Self {
        Expr::Call(call)
    }
}

impl From<Map> for Expr {
    fn from(map: Map) -> Self {
        Expr::Map(map)
    }
}

/// `func(vargs...)`
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub func: String,
    pub vargs: Vec<Expr>,
}

impl Call {
    pub fn new(func: &str, vargs: Vec<Expr>) -> Self {
        Call {
            func: func.to_string(),
            vargs,
        }
    }
}

/// `@ident[vargs...]`
///
/// `ident` keeps its leading `@`. A map accessed without brackets has no
/// key expressions.
#[derive(Debug, Clone, PartialEq)]
pub struct Map {
    pub ident: String,
    pub vargs: Vec<Expr>,
}

impl Map {
    pub fn new(ident: &str, vargs: Vec<Expr>) -> Self {
        Map {
            ident: ident.to_string(),
            vargs,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    Eq,
    Ne,
    Le,
    Ge,
    Lt,
    Gt,
    LAnd,
    LOr,
    Plus,
    Minus,
    Mul,
    Div,
    Mod,
    BAnd,
    BOr,
    BXor,
}

impl BinaryOperator {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        let op = match kind {
            TokenKind::Equals => BinaryOperator::Eq,
            TokenKind::NotEquals => BinaryOperator::Ne,
            TokenKind::LessEquals => BinaryOperator::Le,
            TokenKind::GreaterEquals => BinaryOperator::Ge,
            TokenKind::Less => BinaryOperator::Lt,
            TokenKind::Greater => BinaryOperator::Gt,
            TokenKind::And => BinaryOperator::LAnd,
            TokenKind::Or => BinaryOperator::LOr,
            TokenKind::Plus => BinaryOperator::Plus,
            TokenKind::Dash => BinaryOperator::Minus,
            TokenKind::Star => BinaryOperator::Mul,
            TokenKind::Slash => BinaryOperator::Div,
            TokenKind::Percent => BinaryOperator::Mod,
            TokenKind::Ampersand => BinaryOperator::BAnd,
            TokenKind::Pipe => BinaryOperator::BOr,
            TokenKind::Caret => BinaryOperator::BXor,
            _ => return None,
        };
        Some(op)
    }

    /// Source text of the operator, used in diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOperator::Eq => "==",
            BinaryOperator::Ne => "!=",
            BinaryOperator::Le => "<=",
            BinaryOperator::Ge => ">=",
            BinaryOperator::Lt => "<",
            BinaryOperator::Gt => ">",
            BinaryOperator::LAnd => "&&",
            BinaryOperator::LOr => "||",
            BinaryOperator::Plus => "+",
            BinaryOperator::Minus => "-",
            BinaryOperator::Mul => "*",
            BinaryOperator::Div => "/",
            BinaryOperator::Mod => "%",
            BinaryOperator::BAnd => "&",
            BinaryOperator::BOr => "|",
            BinaryOperator::BXor => "^",
        }
    }
}

impl Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    LNot,
    BNot,
    Neg,
}

impl UnaryOperator {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Not => Some(UnaryOperator::LNot),
            TokenKind::Tilde => Some(UnaryOperator::BNot),
            TokenKind::Dash => Some(UnaryOperator::Neg),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOperator::LNot => "!",
            UnaryOperator::BNot => "~",
            UnaryOperator::Neg => "-",
        }
    }
}

impl Display for UnaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
