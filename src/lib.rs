#![allow(clippy::module_inception)]

use std::{rc::Rc, sync::Once};

use crate::{
    ast::ast::Program,
    errors::errors::{Error, ErrorTip},
    lexer::lexer::tokenize,
    parser::parser::parse,
};

pub mod ast;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod type_checker;

extern crate regex;

#[derive(Debug, Clone, PartialEq)]
pub struct Position(pub u32, pub Rc<String>);

#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

static TRACING_INIT: Once = Once::new();

/// Initialize tracing output on stderr.
///
/// `RUST_LOG` takes precedence; otherwise `verbosity` picks the level
/// (0 = off, 1 = debug, 2+ = trace). Safe to call multiple times.
pub fn init_tracing(verbosity: u8) {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            match verbosity {
                0 => return,
                1 => EnvFilter::new("probecheck=debug"),
                _ => EnvFilter::new("probecheck=trace"),
            }
        };

        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true).with_level(true))
            .with(filter)
            .init();
    });
}

/// Tokenizes and parses `source` in one step.
pub fn parse_source(source: String, file: &str) -> Result<Program, Error> {
    let tokens = tokenize(source, Some(file.to_string()))?;
    parse(tokens, Rc::new(file.to_string())).1
}

/// Finds the line containing byte offset `position`.
///
/// Returns the 1-based line number, the line text and the offset of
/// `position` within that line. An offset at the very end of the source maps
/// to the end of the last line.
pub fn get_line_at_position(content: &str, position: u32) -> Option<(usize, String, usize)> {
    let pos = position as usize;
    if pos > content.len() {
        return None;
    }

    let mut start = 0;
    let mut last = None;

    for (index, line) in content.split_inclusive('\n').enumerate() {
        let end = start + line.len();

        if (start..end).contains(&pos) {
            return Some((index + 1, line.to_string(), pos - start));
        }

        last = Some((index + 1, line.to_string(), pos - start));
        start = end;
    }

    last.or_else(|| Some((1, String::new(), 0)))
}


/// Renders a syntax error with the offending line to stderr.
pub fn display_error(error: &Error, source: &str) {
    /*
        Error: message
        -> trace.bt
           |
         2 | kprobe:f { pid = 1 }
           | -----------^
    */

    let position = error.get_position();

    if let ErrorTip::None = error.get_tip() {
        eprintln!("Error: {}", error.get_error_name());
    } else {
        eprintln!("Error: {} ({})", error.get_error_name(), error.get_tip());
    }
    eprintln!("-> {}", position.1);

    let (line, line_text, line_pos) = match get_line_at_position(source, position.0) {
        Some(found) => found,
        None => return,
    };

    let line_string = line.to_string();
    let padding = line_string.len() + 2;
    eprintln!("{:>padding$}", "|");

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(&line_text);
    eprintln!("{} | {}", line_string, line_text_removed.trim_end());

    let arrows = line_pos.saturating_sub(removed_whitespace) + 1;

    eprintln!("{:>padding$} {:->arrows$}", "|", "^");
}

fn remove_starting_whitespace(string: &str) -> (&str, usize) {
    let trimmed = string.trim_start_matches([' ', '\t']);
    (trimmed, string.len() - trimmed.len())
}
