//! Parser module for building the syntax tree of a probe program.
//!
//! This module transforms a stream of tokens into a `Program`. It uses a
//! Pratt parser for expressions with operator precedence and handles:
//!
//! - Probe headers (`kind:attach_point`) and `/predicate/` guards
//! - Statements: bare expressions and map assignments
//! - Expressions: integers, builtins, calls, map accesses, unary and binary
//!   operators
//!
//! The parser uses NUD (null denotation) and LED (left denotation) functions
//! for expression parsing with binding power for precedence handling.

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod probe;
pub mod stmt;
