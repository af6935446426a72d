//! Error types for the probe checker.
//!
//! - `Error`/`ErrorImpl` for lexing and parsing, with source position and tip
//! - `SemanticError` for type errors collected during analysis

pub mod errors;
