//! Lexical analysis module.
//!
//! This module contains the lexer (tokenizer) that converts probe source
//! into a stream of tokens for parsing. It handles:
//!
//! - Tokenization of source code using regex patterns
//! - Recognition of identifiers, map identifiers, integers and operators
//! - Token position tracking for error reporting
//! - Comments and whitespace handling

pub mod lexer;
pub mod tokens;
