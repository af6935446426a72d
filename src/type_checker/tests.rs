//! Unit tests for the semantic analyser.
//!
//! Programs are built directly from AST nodes so each rule can be exercised
//! without going through the parser.

use pretty_assertions::assert_eq;

use crate::ast::{
    ast::{Predicate, Probe, Program},
    expressions::{BinaryOperator, Call, Expr, Map, UnaryOperator},
    statements::Statement,
};
use crate::errors::errors::SemanticError;

use super::{
    maps::MapRegistry,
    type_checker::{exit_code, AnalysisFailure, Pass, PassWalker, SemanticAnalyser},
    types::{typestr, Type},
};

fn probe(stmts: Vec<Statement>) -> Probe {
    Probe::new("kprobe", "sys_read", None, stmts)
}

fn program(stmts: Vec<Statement>) -> Program {
    Program::new(vec![probe(stmts)])
}

fn map(ident: &str, keys: Vec<Expr>) -> Map {
    Map::new(ident, keys)
}

fn read(ident: &str, keys: Vec<Expr>) -> Expr {
    Expr::Map(map(ident, keys))
}

fn int(value: i64) -> Expr {
    Expr::integer(value)
}

/// Runs the full analysis, capturing what would go to stderr.
fn analyse(program: &Program) -> (Result<(), AnalysisFailure>, String) {
    let mut out = Vec::new();
    let result = SemanticAnalyser::new(program).analyse_to(&mut out);
    (result, String::from_utf8(out).unwrap())
}

fn diagnostics(program: &Program) -> Vec<SemanticError> {
    match analyse(program).0 {
        Ok(()) => vec![],
        Err(failure) => failure.diagnostics,
    }
}

fn infer(expr: &Expr, pass: Pass) -> (Type, Vec<SemanticError>) {
    let mut maps = MapRegistry::new();
    let mut walker = PassWalker::new(pass, &mut maps);
    let ty = walker.visit_expr(expr);
    (ty, walker.finish())
}

#[test]
fn test_typestr() {
    assert_eq!(typestr(Type::None), "none");
    assert_eq!(typestr(Type::Integer), "integer");
    assert_eq!(typestr(Type::Quantize), "quantize");
    assert_eq!(typestr(Type::Count), "count");
    assert_eq!(Type::Count.to_string(), "count");
}

#[test]
fn test_integer_literals_are_integers() {
    for value in [0, 1, -5, i64::MAX] {
        assert_eq!(infer(&int(value), Pass::Collect), (Type::Integer, vec![]));
    }
}

#[test]
fn test_known_builtins_are_integers() {
    for ident in ["nsecs", "pid", "tid"] {
        assert_eq!(infer(&Expr::builtin(ident), Pass::Collect), (Type::Integer, vec![]));
    }
}

#[test]
fn test_unknown_builtin() {
    let (ty, errors) = infer(&Expr::builtin("uid"), Pass::Collect);

    assert_eq!(ty, Type::None);
    assert_eq!(errors, vec![SemanticError::UnknownBuiltin { ident: "uid".to_string() }]);
}

#[test]
fn test_quantize_arity() {
    let (ty, errors) = infer(&Call::new("quantize", vec![int(1)]).into(), Pass::Collect);
    assert_eq!(ty, Type::Quantize);
    assert!(errors.is_empty());

    for args in [vec![], vec![int(1), int(2)]] {
        let provided = args.len();
        let (ty, errors) = infer(&Call::new("quantize", args).into(), Pass::Collect);
        assert_eq!(ty, Type::None);
        assert_eq!(
            errors,
            vec![SemanticError::ArgumentCount {
                func: "quantize".to_string(),
                expected: 1,
                provided,
            }]
        );
    }
}

#[test]
fn test_count_arity() {
    let (ty, errors) = infer(&Call::new("count", vec![]).into(), Pass::Collect);
    assert_eq!(ty, Type::Count);
    assert!(errors.is_empty());

    let (ty, errors) = infer(&Call::new("count", vec![Expr::builtin("pid")]).into(), Pass::Collect);
    assert_eq!(ty, Type::None);
    assert_eq!(errors[0].to_string(), "count() should take 0 arguments (1 provided)");
}

#[test]
fn test_unknown_function() {
    let (ty, errors) = infer(&Call::new("hist", vec![int(1)]).into(), Pass::Collect);

    assert_eq!(ty, Type::None);
    assert_eq!(errors, vec![SemanticError::UnknownFunction { func: "hist".to_string() }]);
}

#[test]
fn test_invalid_call_still_visits_arguments() {
    let (_, errors) = infer(
        &Call::new("hist", vec![Expr::builtin("uid")]).into(),
        Pass::Collect,
    );

    assert_eq!(
        errors,
        vec![
            SemanticError::UnknownBuiltin { ident: "uid".to_string() },
            SemanticError::UnknownFunction { func: "hist".to_string() },
        ]
    );
}

#[test]
fn test_binop_and_unop_are_integers() {
    let binop = Expr::binop(int(1), BinaryOperator::Plus, int(2));
    assert_eq!(infer(&binop, Pass::Validate), (Type::Integer, vec![]));

    let unop = Expr::unop(UnaryOperator::LNot, Call::new("count", vec![]).into());
    assert_eq!(infer(&unop, Pass::Validate), (Type::Integer, vec![]));
}

#[test]
fn test_unop_operand_is_checked() {
    let unop = Expr::unop(UnaryOperator::BNot, Expr::builtin("uid"));
    let (ty, errors) = infer(&unop, Pass::Collect);

    assert_eq!(ty, Type::Integer);
    assert_eq!(errors.len(), 1);
}

#[test]
fn test_operand_mismatch_only_on_validate_pass() {
    let binop = Expr::binop(int(1), BinaryOperator::Eq, Call::new("count", vec![]).into());

    assert_eq!(infer(&binop, Pass::Collect), (Type::Integer, vec![]));
    assert_eq!(
        infer(&binop, Pass::Validate),
        (
            Type::Integer,
            vec![SemanticError::OperandMismatch {
                op: "==".to_string(),
                left: Type::Integer,
                right: Type::Count,
            }]
        )
    );
}

#[test]
fn test_operand_mismatch_fails_second_pass() {
    let prog = program(vec![Statement::expr(Expr::binop(
        Call::new("quantize", vec![int(1)]).into(),
        BinaryOperator::Plus,
        int(1),
    ))]);

    let (result, output) = analyse(&prog);
    let failure = result.unwrap_err();

    assert_eq!(failure.pass, Pass::Validate);
    assert_eq!(failure.code(), 2);
    assert_eq!(output, "Type mismatch for '+': comparing 'quantize' with 'integer'\n");
}

#[test]
fn test_map_signature_stability() {
    let prog = program(vec![
        Statement::assign(map("@m", vec![int(1)]), int(0)),
        Statement::expr(read("@m", vec![Expr::builtin("pid")])),
        Statement::expr(read("@m", vec![int(1), int(2)])),
    ]);

    assert_eq!(
        diagnostics(&prog),
        vec![SemanticError::MapKeyMismatch {
            ident: "@m".to_string(),
            provided: vec![Type::Integer, Type::Integer],
            recorded: vec![Type::Integer],
        }]
    );
}

#[test]
fn test_map_signature_is_order_sensitive() {
    let prog = program(vec![
        Statement::assign_call(map("@c", vec![]), Call::new("count", vec![])),
        Statement::assign(map("@m", vec![int(1), read("@c", vec![])]), int(0)),
        Statement::assign(map("@m", vec![read("@c", vec![]), int(1)]), int(0)),
    ]);

    let errors = diagnostics(&prog);
    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0], SemanticError::MapKeyMismatch { .. }));
}

#[test]
fn test_map_value_stability() {
    let consistent = program(vec![
        Statement::assign(map("@m", vec![]), int(1)),
        Statement::assign(map("@m", vec![]), Expr::builtin("nsecs")),
    ]);
    assert_eq!(analyse(&consistent).0, Ok(()));

    let conflicting = program(vec![
        Statement::assign(map("@m", vec![]), int(1)),
        Statement::assign_call(map("@m", vec![]), Call::new("quantize", vec![int(1)])),
    ]);
    let failure = analyse(&conflicting).0.unwrap_err();

    assert_eq!(failure.pass, Pass::Collect);
    assert_eq!(
        failure.diagnostics,
        vec![SemanticError::MapCallValueMismatch {
            ident: "@m".to_string(),
            func: "quantize".to_string(),
            recorded: Type::Integer,
        }]
    );
}

#[test]
fn test_map_value_mismatch_from_expression() {
    let prog = program(vec![
        Statement::assign_call(map("@q", vec![]), Call::new("quantize", vec![int(1)])),
        Statement::assign(map("@m", vec![]), int(1)),
        Statement::assign(map("@m", vec![]), read("@q", vec![])),
    ]);

    assert_eq!(
        diagnostics(&prog),
        vec![SemanticError::MapValueMismatch {
            ident: "@m".to_string(),
            assigned: Type::Quantize,
            recorded: Type::Integer,
        }]
    );
}

#[test]
fn test_map_read_before_assignment_resolves() {
    // The comparison reads @start before the probe assigning it is reached
    let prog = Program::new(vec![
        probe(vec![Statement::assign(
            map("@elapsed", vec![]),
            Expr::binop(Expr::builtin("nsecs"), BinaryOperator::Minus, read("@start", vec![])),
        )]),
        probe(vec![Statement::assign(map("@start", vec![]), Expr::builtin("nsecs"))]),
    ]);

    let (result, output) = analyse(&prog);
    assert_eq!(result, Ok(()));
    assert_eq!(output, "");
}

#[test]
fn test_forward_read_feeds_later_assignment() {
    let prog = program(vec![
        Statement::assign(map("@copy", vec![]), read("@orig", vec![])),
        Statement::assign(map("@orig", vec![]), int(5)),
        Statement::expr(Expr::binop(read("@copy", vec![]), BinaryOperator::Gt, int(1))),
    ]);

    let mut analyser = SemanticAnalyser::new(&prog);
    assert_eq!(analyser.analyse_to(&mut Vec::new()), Ok(()));
    assert_eq!(analyser.maps().value_of("@copy"), Some(Type::Integer));
}

#[test]
fn test_map_never_assigned_is_reported() {
    let prog = program(vec![Statement::expr(Expr::binop(
        read("@never", vec![]),
        BinaryOperator::Eq,
        int(1),
    ))]);

    let failure = analyse(&prog).0.unwrap_err();

    assert_eq!(failure.pass, Pass::Validate);
    assert_eq!(
        failure.diagnostics,
        vec![SemanticError::MapUsedBeforeAssignment { ident: "@never".to_string() }]
    );
}

#[test]
fn test_batch_diagnostics_across_probes() {
    let prog = Program::new(vec![
        probe(vec![Statement::expr(Expr::builtin("uid"))]),
        probe(vec![Statement::expr(Expr::builtin("comm"))]),
    ]);

    let (result, output) = analyse(&prog);
    let failure = result.unwrap_err();

    assert_eq!(failure.pass, Pass::Collect);
    assert_eq!(failure.diagnostics.len(), 2);
    assert_eq!(output, "Unknown builtin: 'uid'\nUnknown builtin: 'comm'\n");
}

#[test]
fn test_maps_are_shared_between_probes() {
    let prog = Program::new(vec![
        probe(vec![Statement::assign(map("@x", vec![Expr::builtin("pid")]), int(1))]),
        probe(vec![Statement::expr(Expr::binop(
            read("@x", vec![Expr::builtin("tid")]),
            BinaryOperator::Plus,
            int(1),
        ))]),
    ]);

    let mut analyser = SemanticAnalyser::new(&prog);
    assert_eq!(analyser.analyse_to(&mut Vec::new()), Ok(()));
    assert_eq!(analyser.maps().keys_of("@x"), Some(&[Type::Integer][..]));
}

#[test]
fn test_predicate_accepts_any_type() {
    let prog = Program::new(vec![
        probe(vec![Statement::assign_call(map("@c", vec![]), Call::new("count", vec![]))]),
        Probe::new(
            "kprobe",
            "sys_write",
            Some(Predicate::new(read("@c", vec![]))),
            vec![Statement::assign(map("@x", vec![]), int(1))],
        ),
    ]);

    assert_eq!(analyse(&prog).0, Ok(()));
}

#[test]
fn test_predicate_expression_is_checked() {
    let prog = Program::new(vec![Probe::new(
        "kprobe",
        "sys_read",
        Some(Predicate::new(Expr::binop(Expr::builtin("uid"), BinaryOperator::Eq, int(0)))),
        vec![],
    )]);

    assert_eq!(
        diagnostics(&prog),
        vec![SemanticError::UnknownBuiltin { ident: "uid".to_string() }]
    );
}

#[test]
fn test_success_path() {
    let prog = Program::new(vec![
        Probe::new(
            "kprobe",
            "sys_read",
            Some(Predicate::new(Expr::binop(Expr::builtin("pid"), BinaryOperator::Eq, int(1234)))),
            vec![
                Statement::assign(map("@start", vec![Expr::builtin("tid")]), Expr::builtin("nsecs")),
                Statement::assign_call(map("@reads", vec![]), Call::new("count", vec![])),
            ],
        ),
        Probe::new(
            "kretprobe",
            "sys_read",
            None,
            vec![Statement::assign_call(
                map("@latency", vec![]),
                Call::new(
                    "quantize",
                    vec![Expr::binop(
                        Expr::builtin("nsecs"),
                        BinaryOperator::Minus,
                        read("@start", vec![Expr::builtin("tid")]),
                    )],
                ),
            )],
        ),
    ]);

    let (result, output) = analyse(&prog);
    assert_eq!(result, Ok(()));
    assert_eq!(exit_code(&result), 0);
    assert!(output.is_empty());
}

#[test]
fn test_empty_program() {
    assert_eq!(analyse(&Program::new(vec![])).0, Ok(()));
}

#[test]
fn test_run_pass_is_repeatable() {
    let prog = program(vec![Statement::expr(Expr::builtin("uid"))]);
    let mut analyser = SemanticAnalyser::new(&prog);

    assert_eq!(analyser.run_pass(Pass::Collect).len(), 1);
    assert_eq!(analyser.run_pass(Pass::Collect).len(), 1);
}

#[test]
fn test_failure_display() {
    let prog = program(vec![Statement::expr(Expr::builtin("uid"))]);
    let failure = analyse(&prog).0.unwrap_err();

    assert_eq!(failure.to_string(), "semantic analysis failed on pass 1 with 1 error(s)");
    assert_eq!(exit_code(&Err(failure)), 1);
}

#[test]
fn test_registry_records_first_signature() {
    let mut maps = MapRegistry::new();

    assert_eq!(maps.check_keys("@x", &[Type::Integer]), Ok(()));
    assert_eq!(maps.check_keys("@x", &[Type::Integer]), Ok(()));
    assert_eq!(
        maps.check_keys("@x", &[Type::Integer, Type::Integer]),
        Err(vec![Type::Integer])
    );
    assert_eq!(maps.keys_of("@x"), Some(&[Type::Integer][..]));
}

#[test]
fn test_registry_never_overwrites_value() {
    let mut maps = MapRegistry::new();

    assert_eq!(maps.assign("@x", Type::Count), Ok(()));
    assert_eq!(maps.assign("@x", Type::Integer), Err(Type::Count));
    assert_eq!(maps.value_of("@x"), Some(Type::Count));
    assert_eq!(maps.len(), 1);
}

#[test]
fn test_registry_ignores_unknown_value_types() {
    let mut maps = MapRegistry::new();

    assert_eq!(maps.assign("@x", Type::None), Ok(()));
    assert_eq!(maps.value_of("@x"), None);
    assert!(maps.is_assigned("@x"));
    assert!(maps.is_empty());
}

#[test]
fn test_registry_unknown_key_matches_any_type() {
    let mut maps = MapRegistry::new();

    assert_eq!(maps.check_keys("@x", &[Type::None]), Ok(()));
    assert_eq!(maps.keys_of("@x"), Some(&[Type::None][..]));
    assert_eq!(maps.check_keys("@x", &[Type::Integer]), Ok(()));
    assert_eq!(maps.check_keys("@x", &[Type::Count]), Ok(()));
    assert_eq!(
        maps.check_keys("@x", &[Type::Integer, Type::Integer]),
        Err(vec![Type::None])
    );
}

#[test]
fn test_key_count_mismatch_reported_with_unknown_key() {
    let prog = program(vec![
        Statement::assign(map("@x", vec![Expr::builtin("uid")]), int(1)),
        Statement::assign(map("@x", vec![int(1), int(2)]), int(2)),
    ]);

    let (result, output) = analyse(&prog);

    assert_eq!(result.unwrap_err().pass, Pass::Collect);
    assert_eq!(
        output,
        "Unknown builtin: 'uid'\n\
         Argument mismatch for @x: trying to access with arguments: [ integer integer ]\n\
         \twhen map already uses the arguments: [ none ]\n"
    );
}

#[test]
fn test_reverse_copy_chain_is_reported() {
    // Each copy reads a map that is only typed later in the walk
    let prog = program(vec![
        Statement::assign(
            map("@q", vec![]),
            Expr::binop(read("@x", vec![]), BinaryOperator::Plus, Call::new("count", vec![]).into()),
        ),
        Statement::assign(map("@x", vec![]), read("@y", vec![])),
        Statement::assign(map("@y", vec![]), read("@z", vec![])),
        Statement::assign(map("@z", vec![]), int(1)),
    ]);

    let failure = analyse(&prog).0.unwrap_err();

    assert_eq!(failure.pass, Pass::Validate);
    assert_eq!(
        failure.diagnostics,
        vec![
            SemanticError::MapTypeUnresolved { ident: "@x".to_string() },
            SemanticError::MapTypeUnresolved { ident: "@y".to_string() },
        ]
    );
}

#[test]
fn test_single_forward_copy_resolves() {
    let prog = program(vec![
        Statement::assign(map("@y", vec![]), read("@z", vec![])),
        Statement::assign(map("@z", vec![]), int(1)),
    ]);

    assert_eq!(analyse(&prog).0, Ok(()));
}
