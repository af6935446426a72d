use std::fmt::Display;

use thiserror::Error;

use crate::{
    type_checker::types::{typestr, Type},
    Position,
};

/// A lexing or parsing error, anchored to the position it was found at.
#[derive(Debug, Clone)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_error(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::UnexpectedTokenDetailed { .. } => "UnexpectedTokenDetailed",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::InvalidAssignment { .. } => "InvalidAssignment",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => ErrorTip::None,
            ErrorImpl::UnexpectedToken { token } => ErrorTip::Suggestion(format!(
                "Unexpected token: `{}`, did you miss a semicolon?",
                token
            )),
            ErrorImpl::UnexpectedTokenDetailed { token, message } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`, {}", token, message))
            }
            ErrorImpl::NumberParseError { token } => ErrorTip::Suggestion(format!(
                "Invalid number: `{}`, is it above the integer limit?",
                token
            )),
            ErrorImpl::InvalidAssignment { target } => ErrorTip::Suggestion(format!(
                "Cannot assign to `{}`, only maps can be assigned to",
                target
            )),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}:{}", self.internal_error, self.position.1, self.position.0)
    }
}

impl std::error::Error for Error {}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },
    #[error("unexpected token: {token:?}")]
    UnexpectedToken { token: String },
    #[error("unexpected token ({message:?}): {token:?}")]
    UnexpectedTokenDetailed { token: String, message: String },
    #[error("error parsing number: {token:?}")]
    NumberParseError { token: String },
    #[error("invalid assignment target: {target:?}")]
    InvalidAssignment { target: String },
}

/// A type error found by the semantic analyser.
///
/// These are collected rather than returned: a single pass keeps walking after
/// each one so every independent problem is reported together.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SemanticError {
    #[error("Unknown builtin: '{ident}'")]
    UnknownBuiltin { ident: String },
    #[error("Unknown function: '{func}'")]
    UnknownFunction { func: String },
    #[error("{func}() should take {expected} argument{} ({provided} provided)", plural(.expected))]
    ArgumentCount {
        func: String,
        expected: usize,
        provided: usize,
    },
    #[error(
        "Argument mismatch for {ident}: trying to access with arguments: {}\n\twhen map already uses the arguments: {}",
        signature(.provided),
        signature(.recorded)
    )]
    MapKeyMismatch {
        ident: String,
        provided: Vec<Type>,
        recorded: Vec<Type>,
    },
    #[error(
        "Type mismatch for {ident}: trying to assign variable of type '{assigned}'\n\twhen map already contains a value of type '{recorded}'"
    )]
    MapValueMismatch {
        ident: String,
        assigned: Type,
        recorded: Type,
    },
    #[error(
        "Type mismatch for {ident}: trying to assign result of '{func}()'\n\twhen map already contains a value of type '{recorded}'"
    )]
    MapCallValueMismatch {
        ident: String,
        func: String,
        recorded: Type,
    },
    #[error("Type mismatch for '{op}': comparing '{left}' with '{right}'")]
    OperandMismatch { op: String, left: Type, right: Type },
    #[error("Map {ident} is used before it is assigned")]
    MapUsedBeforeAssignment { ident: String },
    #[error("Map {ident} is read before the type of its value could be resolved")]
    MapTypeUnresolved { ident: String },
}

fn plural(count: &usize) -> &'static str {
    if *count == 1 {
        ""
    } else {
        "s"
    }
}

/// `[ integer count ]`
fn signature(types: &[Type]) -> String {
    let mut out = String::from("[ ");
    for ty in types {
        out.push_str(typestr(*ty));
        out.push(' ');
    }
    out.push(']');
    out
}
