/// AST (Abstract Syntax Tree) module
/// Contains the syntax tree of a probe program
///
/// Submodules:
/// - ast: Program, probes and predicates
/// - expressions: Expressions and the operators they use
/// - statements: Action statements found inside a probe body
pub mod ast;
pub mod expressions;
pub mod statements;
