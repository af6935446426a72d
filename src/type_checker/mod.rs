//! Type checking and semantic analysis module.
//!
//! This module checks a parsed probe program for type consistency without
//! producing anything but diagnostics:
//!
//! - Inferring the type of every expression
//! - Recording the key signature and value type of every map, program wide
//! - Checking builtins, function names and call arity
//! - Checking that binary operands agree once all map types are known
//!
//! Analysis walks the tree twice. The first walk collects map value types
//! from assignments so that maps read before their assignment resolve on the
//! second walk, which also validates operator operands.

pub mod maps;
pub mod type_checker;
pub mod types;

#[cfg(test)]
mod tests;
