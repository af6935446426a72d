use crate::{
    ast::ast::{Predicate, Probe},
    errors::errors::Error,
    lexer::tokens::TokenKind,
};

use super::{expr::parse_expr, lookups::BindingPower, parser::Parser, stmt::parse_block};

/// `kind:attach_point /predicate/ { statements }`
///
/// The attach point may be omitted for probes such as `BEGIN`.
pub fn parse_probe(parser: &mut Parser) -> Result<Probe, Error> {
    let error = parser.unexpected_detailed("expected probe type");
    let kind = parser.expect_error(TokenKind::Identifier, Some(error))?.value;

    let attach_point = if parser.current_token_kind() == TokenKind::Colon {
        parser.advance();
        let error = parser.unexpected_detailed("expected attach point after ':'");
        parser.expect_error(TokenKind::Identifier, Some(error))?.value
    } else {
        String::new()
    };

    let pred = if parser.current_token_kind() == TokenKind::Slash {
        Some(parse_predicate(parser)?)
    } else {
        None
    };

    let stmts = parse_block(parser)?;

    Ok(Probe {
        kind,
        attach_point,
        pred,
        stmts,
    })
}

pub fn parse_predicate(parser: &mut Parser) -> Result<Predicate, Error> {
    parser.expect(TokenKind::Slash)?;

    let was_in_predicate = parser.set_in_predicate(true);
    let expr = parse_expr(parser, BindingPower::Default)?;
    parser.set_in_predicate(was_in_predicate);

    let error = parser.unexpected_detailed("expected '/' to close the predicate");
    parser.expect_error(TokenKind::Slash, Some(error))?;

    Ok(Predicate::new(expr))
}
