use std::{fmt::Display, io::Write};

use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::{
    ast::{
        ast::{Predicate, Probe, Program},
        expressions::{BinaryOperator, Call, Expr, Map},
        statements::Statement,
    },
    errors::errors::SemanticError,
};

use super::{maps::MapRegistry, types::Type};

const BUILTINS: [&str; 3] = ["nsecs", "pid", "tid"];

/// One full walk over the program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    /// Records map value types from every assignment, so maps read before
    /// their assignment can be resolved afterwards.
    Collect = 1,
    /// Repeats the walk with map types settled and checks operator operands.
    Validate = 2,
}

impl Pass {
    pub const ALL: [Pass; 2] = [Pass::Collect, Pass::Validate];

    pub fn number(self) -> i32 {
        self as i32
    }
}

impl Display for Pass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// Analysis stopped after `pass` reported `diagnostics`.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("semantic analysis failed on pass {pass} with {} error(s)", .diagnostics.len())]
pub struct AnalysisFailure {
    pub pass: Pass,
    pub diagnostics: Vec<SemanticError>,
}

impl AnalysisFailure {
    /// Process exit code for this failure: the number of the failing pass.
    pub fn code(&self) -> i32 {
        self.pass.number()
    }
}

/// Exit code for an analysis result: `0` on success, else the failing pass.
pub fn exit_code(result: &Result<(), AnalysisFailure>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(failure) => failure.code(),
    }
}

/// Checks a program for type errors.
///
/// The map registry lives as long as the analyser and is shared by both
/// passes; each pass starts with an empty list of diagnostics.
#[derive(Debug)]
pub struct SemanticAnalyser<'a> {
    program: &'a Program,
    maps: MapRegistry,
}

impl<'a> SemanticAnalyser<'a> {
    pub fn new(program: &'a Program) -> Self {
        SemanticAnalyser {
            program,
            maps: MapRegistry::new(),
        }
    }

    pub fn maps(&self) -> &MapRegistry {
        &self.maps
    }

    /// Runs both passes, writing diagnostics of a failing pass to stderr.
    pub fn analyse(&mut self) -> Result<(), AnalysisFailure> {
        let stderr = std::io::stderr();
        let mut out = stderr.lock();
        self.analyse_to(&mut out)
    }

    /// Runs both passes, writing diagnostics of a failing pass to `out`, one
    /// per line, in the order they were found.
    pub fn analyse_to<W: Write>(&mut self, out: &mut W) -> Result<(), AnalysisFailure> {
        for pass in Pass::ALL {
            let diagnostics = self.run_pass(pass);
            if diagnostics.is_empty() {
                continue;
            }

            for diagnostic in &diagnostics {
                if let Err(err) = writeln!(out, "{}", diagnostic) {
                    warn!(%err, "failed to write diagnostic");
                }
            }

            debug!(pass = pass.number(), errors = diagnostics.len(), "analysis failed");
            return Err(AnalysisFailure { pass, diagnostics });
        }

        debug!(maps = self.maps.len(), "analysis succeeded");
        Ok(())
    }

    /// Walks the whole program once and returns what that walk reported.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn run_pass(&mut self, pass: Pass) -> Vec<SemanticError> {
        let program = self.program;
        let mut walker = PassWalker::new(pass, &mut self.maps);
        walker.visit_program(program);
        walker.finish()
    }
}

/// State of a single walk: which pass it is, the shared map registry and the
/// diagnostics found so far.
pub struct PassWalker<'r> {
    pass: Pass,
    maps: &'r mut MapRegistry,
    diagnostics: Vec<SemanticError>,
}

impl<'r> PassWalker<'r> {
    pub fn new(pass: Pass, maps: &'r mut MapRegistry) -> Self {
        PassWalker {
            pass,
            maps,
            diagnostics: vec![],
        }
    }

    pub fn finish(self) -> Vec<SemanticError> {
        self.diagnostics
    }

    fn error(&mut self, error: SemanticError) {
        trace!(pass = self.pass.number(), %error, "diagnostic");
        self.diagnostics.push(error);
    }

    pub fn visit_program(&mut self, program: &Program) {
        for probe in &program.probes {
            self.visit_probe(probe);
        }
    }

    pub fn visit_probe(&mut self, probe: &Probe) {
        trace!(probe = %probe.name(), "visiting probe");
        if let Some(pred) = &probe.pred {
            self.visit_predicate(pred);
        }
        for stmt in &probe.stmts {
            self.visit_statement(stmt);
        }
    }

    /// Any type is accepted as a filter.
    pub fn visit_predicate(&mut self, pred: &Predicate) {
        self.visit_expr(&pred.expr);
    }

    pub fn visit_statement(&mut self, stmt: &Statement) {
        match stmt {
            Statement::Expr(expr) => {
                self.visit_expr(expr);
            }
            Statement::AssignMap { map, expr } => {
                self.visit_map_keys(map);
                let assigned = self.visit_expr(expr);

                if let Err(recorded) = self.maps.assign(&map.ident, assigned) {
                    self.error(SemanticError::MapValueMismatch {
                        ident: map.ident.clone(),
                        assigned,
                        recorded,
                    });
                }
            }
            Statement::AssignMapCall { map, call } => {
                self.visit_map_keys(map);
                let assigned = self.visit_call(call);

                if let Err(recorded) = self.maps.assign(&map.ident, assigned) {
                    self.error(SemanticError::MapCallValueMismatch {
                        ident: map.ident.clone(),
                        func: call.func.clone(),
                        recorded,
                    });
                }
            }
        }
    }

    pub fn visit_expr(&mut self, expr: &Expr) -> Type {
        match expr {
            Expr::Integer(_) => Type::Integer,
            Expr::Builtin(ident) => self.visit_builtin(ident),
            Expr::Call(call) => self.visit_call(call),
            Expr::Map(map) => self.visit_map(map),
            Expr::Binop { left, op, right } => self.visit_binop(left, *op, right),
            Expr::Unop { expr, .. } => {
                self.visit_expr(expr);
                Type::Integer
            }
        }
    }

    fn visit_builtin(&mut self, ident: &str) -> Type {
        if BUILTINS.contains(&ident) {
            Type::Integer
        } else {
            self.error(SemanticError::UnknownBuiltin { ident: ident.to_string() });
            Type::None
        }
    }

    pub fn visit_call(&mut self, call: &Call) -> Type {
        // Arguments may read maps, so they are checked even if the call is not
        for arg in &call.vargs {
            self.visit_expr(arg);
        }

        match call.func.as_str() {
            "quantize" => self.check_arity(call, 1, Type::Quantize),
            "count" => self.check_arity(call, 0, Type::Count),
            _ => {
                self.error(SemanticError::UnknownFunction { func: call.func.clone() });
                Type::None
            }
        }
    }

    fn check_arity(&mut self, call: &Call, expected: usize, result: Type) -> Type {
        if call.vargs.len() == expected {
            return result;
        }

        self.error(SemanticError::ArgumentCount {
            func: call.func.clone(),
            expected,
            provided: call.vargs.len(),
        });
        Type::None
    }

    /// Checks the key signature of a map access. Used alone for assignment
    /// targets, whose value is written rather than read.
    fn visit_map_keys(&mut self, map: &Map) {
        let keys: Vec<Type> = map.vargs.iter().map(|arg| self.visit_expr(arg)).collect();

        if let Err(recorded) = self.maps.check_keys(&map.ident, &keys) {
            self.error(SemanticError::MapKeyMismatch {
                ident: map.ident.clone(),
                provided: keys,
                recorded,
            });
        }
    }

    /// A map read evaluates to the value type recorded for the map.
    pub fn visit_map(&mut self, map: &Map) -> Type {
        self.visit_map_keys(map);

        match self.maps.value_of(&map.ident) {
            Some(value) => value,
            None => {
                // After the collect pass every assignment has been seen, so a
                // map without a value type is either never written at all or
                // only written from maps that were themselves unresolved
                if self.pass == Pass::Validate {
                    let ident = map.ident.clone();
                    if self.maps.is_assigned(&map.ident) {
                        self.error(SemanticError::MapTypeUnresolved { ident });
                    } else {
                        self.error(SemanticError::MapUsedBeforeAssignment { ident });
                    }
                }
                Type::None
            }
        }
    }

    fn visit_binop(&mut self, left: &Expr, op: BinaryOperator, right: &Expr) -> Type {
        let lhs = self.visit_expr(left);
        let rhs = self.visit_expr(right);

        if self.pass == Pass::Validate && lhs.is_known() && rhs.is_known() && lhs != rhs {
            self.error(SemanticError::OperandMismatch {
                op: op.to_string(),
                left: lhs,
                right: rhs,
            });
        }

        Type::Integer
    }
}
