//! Declaration-level grammar: modules, imports, fixities, data/record types,
//! ascriptions, postulates, and function clauses.

use crate::parser::expressions::{self, at_atom_start};
use crate::parser::{MarkClosed, Parser};
use crate::syntax_kind::SyntaxKind;

pub(crate) fn parse_decl(p: &mut Parser) {
    match p.current() {
        SyntaxKind::MODULE_KW => parse_module_decl(p),
        SyntaxKind::IMPORT_KW => parse_import_decl(p),
        SyntaxKind::OPEN_KW => parse_open_decl(p),
        SyntaxKind::INFIX_KW | SyntaxKind::INFIXL_KW | SyntaxKind::INFIXR_KW => parse_fixity_decl(p),
        SyntaxKind::DATA_KW => parse_data_decl(p),
        SyntaxKind::RECORD_KW => parse_record_decl(p),
        SyntaxKind::POSTULATE_KW => parse_postulate_decl(p),
        SyntaxKind::LET_KW => {
            parse_let_decl(p);
        }
        SyntaxKind::IDENT => parse_ascription_or_clause(p),
        _ => {
            p.advance_with_error("expected a declaration");
        }
    }
}

pub(crate) fn parse_name(p: &mut Parser) -> MarkClosed {
    let m = p.open();
    p.expect(SyntaxKind::IDENT);
    p.close(m, SyntaxKind::NAME)
}

pub(crate) fn parse_qualified_name(p: &mut Parser) -> MarkClosed {
    let m = p.open();
    parse_name(p);
    while p.at(SyntaxKind::DOT) {
        p.advance();
        parse_name(p);
    }
    p.close(m, SyntaxKind::QUALIFIED_NAME)
}

fn parse_body_until_rbrace(p: &mut Parser, mut parse_one: impl FnMut(&mut Parser)) {
    p.expect(SyntaxKind::L_BRACE);
    while !p.at(SyntaxKind::R_BRACE) && !p.at(SyntaxKind::EOF) {
        while p.eat(SyntaxKind::SEMICOLON) {}
        if p.at(SyntaxKind::R_BRACE) {
            break;
        }
        parse_one(p);
        if p.has_error() {
            p.clear_error();
            p.recover_until(SyntaxKind::SEMICOLON);
        }
    }
    p.expect(SyntaxKind::R_BRACE);
}

fn parse_module_decl(p: &mut Parser) {
    let m = p.open();
    p.expect(SyntaxKind::MODULE_KW);
    parse_qualified_name(p);
    p.expect(SyntaxKind::WHERE_KW);
    parse_body_until_rbrace(p, parse_decl);
    p.close(m, SyntaxKind::MODULE_DECL);
}

fn parse_import_decl(p: &mut Parser) {
    let m = p.open();
    p.expect(SyntaxKind::IMPORT_KW);
    parse_qualified_name(p);
    p.close(m, SyntaxKind::IMPORT_DECL);
}

fn parse_open_decl(p: &mut Parser) {
    let m = p.open();
    p.expect(SyntaxKind::OPEN_KW);
    parse_qualified_name(p);
    p.close(m, SyntaxKind::OPEN_DECL);
}

fn parse_fixity_decl(p: &mut Parser) {
    let m = p.open();
    p.advance(); // infix / infixl / infixr
    p.expect(SyntaxKind::IDENT); // precedence level
    parse_name(p); // the (possibly mixfix) notation being declared
    p.close(m, SyntaxKind::FIXITY_DECL);
}

fn parse_data_decl(p: &mut Parser) {
    let m = p.open();
    p.expect(SyntaxKind::DATA_KW);
    parse_name(p);
    p.expect(SyntaxKind::COLON);
    expressions::parse_expr(p);
    p.expect(SyntaxKind::WHERE_KW);
    parse_body_until_rbrace(p, parse_constructor_decl);
    p.close(m, SyntaxKind::DATA_DECL);
}

fn parse_constructor_decl(p: &mut Parser) {
    let m = p.open();
    parse_name(p);
    p.expect(SyntaxKind::COLON);
    expressions::parse_expr(p);
    p.close(m, SyntaxKind::CONSTRUCTOR_DECL);
}

fn parse_record_decl(p: &mut Parser) {
    let m = p.open();
    p.expect(SyntaxKind::RECORD_KW);
    parse_name(p);
    p.expect(SyntaxKind::COLON);
    expressions::parse_expr(p);
    p.expect(SyntaxKind::WHERE_KW);
    parse_body_until_rbrace(p, parse_record_field_decl);
    p.close(m, SyntaxKind::RECORD_DECL);
}

fn parse_record_field_decl(p: &mut Parser) {
    let m = p.open();
    p.eat(SyntaxKind::FIELD_KW);
    parse_name(p);
    p.expect(SyntaxKind::COLON);
    expressions::parse_expr(p);
    p.close(m, SyntaxKind::RECORD_FIELD_DECL);
}

fn parse_postulate_decl(p: &mut Parser) {
    let m = p.open();
    p.expect(SyntaxKind::POSTULATE_KW);
    parse_name(p);
    p.expect(SyntaxKind::COLON);
    expressions::parse_expr(p);
    p.close(m, SyntaxKind::POSTULATE_DECL);
}

/// `let NAME (: Expr)? = Expr`. Shared between top-level let bindings and
/// the binding list of a `let ... in` expression.
pub(crate) fn parse_let_decl(p: &mut Parser) -> MarkClosed {
    let m = p.open();
    p.expect(SyntaxKind::LET_KW);
    parse_name(p);
    if p.eat(SyntaxKind::COLON) {
        expressions::parse_expr(p);
    }
    p.expect(SyntaxKind::EQ);
    expressions::parse_expr(p);
    p.close(m, SyntaxKind::LET_DECL)
}

/// `QualifiedName : Expr` (an ascription) or `QualifiedName Atom* = Expr`
/// (a function clause) -- disambiguated by whether `:` follows the name.
fn parse_ascription_or_clause(p: &mut Parser) {
    let name = parse_qualified_name(p);
    if p.eat(SyntaxKind::COLON) {
        let m = p.open_before(name);
        expressions::parse_expr(p);
        p.close(m, SyntaxKind::ASCRIPTION_DECL);
        return;
    }

    let m = p.open_before(name);
    while at_atom_start(p) {
        expressions::parse_atom(p);
    }
    p.expect(SyntaxKind::EQ);
    expressions::parse_expr(p);
    p.close(m, SyntaxKind::FUNCTION_CLAUSE);
}
