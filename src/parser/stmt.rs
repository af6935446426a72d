use crate::{
    ast::{expressions::Expr, statements::Statement},
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    parser::{expr::parse_expr, lookups::BindingPower},
};

use super::parser::Parser;

/// Parses one statement, without its trailing `;`.
///
/// `@map = call()` and `@map = expr` become map assignments; anything else is
/// an expression statement.
pub fn parse_stmt(parser: &mut Parser) -> Result<Statement, Error> {
    let start = parser.get_position();
    let expr = parse_expr(parser, BindingPower::Default)?;

    if parser.current_token_kind() != TokenKind::Assignment {
        return Ok(Statement::expr(expr));
    }

    let map = match expr {
        Expr::Map(map) => map,
        other => {
            return Err(Error::new(
                ErrorImpl::InvalidAssignment { target: describe(&other) },
                start,
            ))
        }
    };

    parser.advance();
    let value = parse_expr(parser, BindingPower::Default)?;

    Ok(match value {
        Expr::Call(call) => Statement::assign_call(map, call),
        expr => Statement::assign(map, expr),
    })
}

/// `{ stmt; stmt; ... }`, the last `;` being optional.
pub fn parse_block(parser: &mut Parser) -> Result<Vec<Statement>, Error> {
    parser.expect(TokenKind::OpenCurly)?;

    let mut statements = Vec::new();
    while parser.current_token_kind() != TokenKind::CloseCurly {
        statements.push(parse_stmt(parser)?);

        match parser.current_token_kind() {
            TokenKind::Semicolon => {
                parser.advance();
            }
            TokenKind::CloseCurly => {}
            _ => return Err(parser.unexpected()),
        }
    }

    parser.expect(TokenKind::CloseCurly)?;

    Ok(statements)
}

/// Short text naming an expression that cannot be assigned to.
fn describe(expr: &Expr) -> String {
    match expr {
        Expr::Integer(value) => value.to_string(),
        Expr::Builtin(ident) => ident.clone(),
        Expr::Call(call) => format!("{}()", call.func),
        Expr::Map(map) => map.ident.clone(),
        Expr::Binop { op, .. } => format!("expression using '{}'", op),
        Expr::Unop { op, .. } => format!("expression using '{}'", op),
    }
}
