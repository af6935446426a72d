use crate::{
    ast::expressions::{BinaryOperator, Call, Expr, Map, UnaryOperator},
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
};

use super::{lookups::BindingPower, parser::Parser};

pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Result<Expr, Error> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    let nud = match parser.get_nud_lookup().get(&token_kind) {
        Some(nud) => *nud,
        None => return Err(parser.unexpected()),
    };

    let mut left = nud(parser)?;

    // While the next operator binds tighter than bp, keep extending lhs
    loop {
        let token_kind = parser.current_token_kind();
        if parser.in_predicate() && token_kind == TokenKind::Slash {
            break;
        }

        let next_bp = *parser.get_bp_lookup().get(&token_kind).unwrap_or(&BindingPower::Default);
        if next_bp <= bp {
            break;
        }

        let led = match parser.get_led_lookup().get(&token_kind) {
            Some(led) => *led,
            None => return Err(parser.unexpected()),
        };
        left = led(parser, left, next_bp)?;
    }

    Ok(left)
}

pub fn parse_primary_expr(parser: &mut Parser) -> Result<Expr, Error> {
    match parser.current_token_kind() {
        TokenKind::Number => {
            let token = parser.advance().clone();
            token.value.parse().map(Expr::Integer).map_err(|_| {
                Error::new(ErrorImpl::NumberParseError { token: token.value.clone() }, token.span.start.clone())
            })
        }
        TokenKind::Identifier => {
            let ident = parser.advance().value.clone();

            if parser.current_token_kind() == TokenKind::OpenParen {
                let vargs = parse_args(parser, TokenKind::OpenParen, TokenKind::CloseParen)?;
                Ok(Expr::Call(Call { func: ident, vargs }))
            } else {
                Ok(Expr::Builtin(ident))
            }
        }
        _ => Err(parser.unexpected()),
    }
}

/// `@name` or `@name[args]`
pub fn parse_map(parser: &mut Parser) -> Result<Map, Error> {
    let ident = parser.expect(TokenKind::MapIdentifier)?.value;

    let vargs = if parser.current_token_kind() == TokenKind::OpenBracket {
        parse_args(parser, TokenKind::OpenBracket, TokenKind::CloseBracket)?
    } else {
        vec![]
    };

    Ok(Map { ident, vargs })
}

pub fn parse_map_expr(parser: &mut Parser) -> Result<Expr, Error> {
    Ok(Expr::Map(parse_map(parser)?))
}

/// Comma separated expressions between `open` and `close`.
///
/// A `/` inside the delimiters is division even within a predicate.
fn parse_args(parser: &mut Parser, open: TokenKind, close: TokenKind) -> Result<Vec<Expr>, Error> {
    parser.expect(open)?;
    let was_in_predicate = parser.set_in_predicate(false);

    let mut args = vec![];
    while parser.current_token_kind() != close {
        args.push(parse_expr(parser, BindingPower::Default)?);

        if parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
            if parser.current_token_kind() == close {
                return Err(parser.unexpected_detailed("expected an argument after ','"));
            }
        } else if parser.current_token_kind() != close {
            return Err(parser.unexpected_detailed("expected ',' between arguments"));
        }
    }

    parser.expect(close)?;
    parser.set_in_predicate(was_in_predicate);

    Ok(args)
}

pub fn parse_binary_expr(parser: &mut Parser, left: Expr, bp: BindingPower) -> Result<Expr, Error> {
    let operator_token = parser.advance().clone();
    let op = match BinaryOperator::from_token(operator_token.kind) {
        Some(op) => op,
        None => {
            return Err(Error::new(
                ErrorImpl::UnexpectedToken { token: operator_token.value },
                operator_token.span.start,
            ))
        }
    };

    let right = parse_expr(parser, bp)?;

    Ok(Expr::binop(left, op, right))
}

pub fn parse_prefix_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let operator_token = parser.advance().clone();
    let op = match UnaryOperator::from_token(operator_token.kind) {
        Some(op) => op,
        None => {
            return Err(Error::new(
                ErrorImpl::UnexpectedToken { token: operator_token.value },
                operator_token.span.start,
            ))
        }
    };

    let rhs = parse_expr(parser, BindingPower::Unary)?;

    Ok(Expr::unop(op, rhs))
}

pub fn parse_grouping_expr(parser: &mut Parser) -> Result<Expr, Error> {
    parser.expect(TokenKind::OpenParen)?;
    let was_in_predicate = parser.set_in_predicate(false);

    let expr = parse_expr(parser, BindingPower::Default)?;

    parser.expect(TokenKind::CloseParen)?;
    parser.set_in_predicate(was_in_predicate);

    Ok(expr)
}
