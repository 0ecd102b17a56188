//! Expression grammar: binder forms (`\`, `forall`, `let ... in`) and flat
//! application spines of atoms. This stage deliberately does not resolve
//! operator precedence -- an `APPLICATION_EXPR` spine is reparsed into an
//! operator tree later, once fixity declarations are in scope.

use crate::parser::items::{self, parse_name};
use crate::parser::{MarkClosed, Parser};
use crate::syntax_kind::SyntaxKind;

pub(crate) fn at_atom_start(p: &Parser) -> bool {
    p.at_any(&[SyntaxKind::IDENT, SyntaxKind::UNDERSCORE, SyntaxKind::TYPE_KW, SyntaxKind::L_PAREN])
}

pub(crate) fn parse_expr(p: &mut Parser) -> MarkClosed {
    match p.current() {
        SyntaxKind::BACKSLASH => parse_lambda(p),
        SyntaxKind::FORALL_KW => parse_quantified(p),
        SyntaxKind::LET_KW => parse_let_expr(p),
        _ => parse_arrow(p),
    }
}

/// `AppExpr ('->' Expr)?`, right-associative. A bare application spine with
/// no arrow just returns as-is; one or more arrows build right-nested
/// `ARROW_EXPR`s, so `A -> B -> C` reads as `A -> (B -> C)`.
fn parse_arrow(p: &mut Parser) -> MarkClosed {
    let lhs = parse_application(p);
    if !p.eat(SyntaxKind::ARROW) {
        return lhs;
    }
    let m = p.open_before(lhs);
    parse_expr(p);
    p.close(m, SyntaxKind::ARROW_EXPR)
}

/// Parses one atom, then -- only if another atom follows -- wraps the whole
/// run in an `APPLICATION_EXPR` via the forward-parent technique, so a bare
/// single atom never gets an unnecessary wrapper node.
fn parse_application(p: &mut Parser) -> MarkClosed {
    let first = parse_atom(p);
    if !at_atom_start(p) {
        return first;
    }
    let m = p.open_before(first);
    while at_atom_start(p) {
        parse_atom(p);
    }
    p.close(m, SyntaxKind::APPLICATION_EXPR)
}

pub(crate) fn parse_atom(p: &mut Parser) -> MarkClosed {
    match p.current() {
        SyntaxKind::UNDERSCORE => {
            let m = p.open();
            p.advance();
            p.close(m, SyntaxKind::UNDERSCORE_EXPR)
        }
        SyntaxKind::TYPE_KW => {
            let m = p.open();
            p.advance();
            p.close(m, SyntaxKind::TYPE_EXPR)
        }
        SyntaxKind::L_PAREN => {
            let m = p.open();
            p.advance();
            parse_expr(p);
            p.expect(SyntaxKind::R_PAREN);
            p.close(m, SyntaxKind::PAREN_EXPR)
        }
        SyntaxKind::IDENT => {
            let m = p.open();
            items::parse_qualified_name(p);
            p.close(m, SyntaxKind::NAMED_BASIC_EXPR)
        }
        _ => p.advance_with_error("expected an expression"),
    }
}

fn parse_lambda(p: &mut Parser) -> MarkClosed {
    let m = p.open();
    p.expect(SyntaxKind::BACKSLASH);
    parse_binding_list(p);
    p.expect(SyntaxKind::ARROW);
    parse_expr(p);
    p.close(m, SyntaxKind::LAMBDA_EXPR)
}

fn parse_quantified(p: &mut Parser) -> MarkClosed {
    let m = p.open();
    p.expect(SyntaxKind::FORALL_KW);
    parse_binding_list(p);
    p.expect(SyntaxKind::ARROW);
    parse_expr(p);
    p.close(m, SyntaxKind::QUANTIFIED_EXPR)
}

fn at_binding_start(p: &Parser) -> bool {
    p.at_any(&[SyntaxKind::IDENT, SyntaxKind::L_PAREN])
}

fn parse_binding_list(p: &mut Parser) -> MarkClosed {
    let m = p.open();
    parse_typed_binding(p);
    while at_binding_start(p) {
        parse_typed_binding(p);
    }
    p.close(m, SyntaxKind::BINDING_LIST)
}

fn parse_typed_binding(p: &mut Parser) -> MarkClosed {
    let m = p.open();
    if p.eat(SyntaxKind::L_PAREN) {
        parse_name(p);
        p.expect(SyntaxKind::COLON);
        parse_expr(p);
        p.expect(SyntaxKind::R_PAREN);
    } else {
        parse_name(p);
    }
    p.close(m, SyntaxKind::TYPED_BINDING)
}

fn parse_let_expr(p: &mut Parser) -> MarkClosed {
    let m = p.open();
    p.expect(SyntaxKind::LET_KW);
    p.expect(SyntaxKind::L_BRACE);
    while !p.at(SyntaxKind::R_BRACE) && !p.at(SyntaxKind::EOF) {
        while p.eat(SyntaxKind::SEMICOLON) {}
        if p.at(SyntaxKind::R_BRACE) {
            break;
        }
        items::parse_let_decl(p);
        if p.has_error() {
            p.clear_error();
            p.recover_until(SyntaxKind::SEMICOLON);
        }
    }
    p.expect(SyntaxKind::R_BRACE);
    p.expect(SyntaxKind::IN_KW);
    parse_expr(p);
    p.close(m, SyntaxKind::LET_EXPR)
}
