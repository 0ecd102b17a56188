//! End-to-end parser tests driving `silt_syntax::parse` over whole files.

use silt_syntax::ast::item::{Decl, SourceFile};
use silt_syntax::ast::AstNode;
use silt_syntax::parse;

fn decls(src: &str) -> Vec<Decl> {
    let parsed = parse(src);
    assert!(parsed.ok(), "expected no errors, got {:?}", parsed.errors());
    SourceFile::cast(parsed.syntax()).expect("source file root").decls().collect()
}

#[test]
fn module_with_ascription_and_clause() {
    let src = "module M where\n  x : Type\n  x = Type\n";
    let top = decls(src);
    assert_eq!(top.len(), 1);
    let module = match &top[0] {
        Decl::Module(m) => m,
        other => panic!("expected a module decl, got {other:?}"),
    };
    let name = module.name().expect("module name");
    assert_eq!(name.segments().map(|s| s.text()).collect::<Vec<_>>(), vec!["M"]);
    let inner: Vec<_> = module.decls().collect();
    assert_eq!(inner.len(), 2);
    assert!(matches!(inner[0], Decl::Ascription(_)));
    assert!(matches!(inner[1], Decl::Clause(_)));
}

#[test]
fn data_declaration_with_two_constructors() {
    let src = "data Bool : Type where\n  true : Bool\n  false : Bool\n";
    let top = decls(src);
    let data = match &top[0] {
        Decl::Data(d) => d,
        other => panic!("expected a data decl, got {other:?}"),
    };
    assert_eq!(data.name().unwrap().text(), "Bool");
    let ctors: Vec<_> = data.constructors().collect();
    assert_eq!(ctors.len(), 2);
    assert_eq!(ctors[0].name().unwrap().text(), "true");
    assert_eq!(ctors[1].name().unwrap().text(), "false");
}

#[test]
fn record_declaration_with_field_keyword() {
    let src = "record Pair : Type where\n  field fst : Type\n  field snd : Type\n";
    let top = decls(src);
    let record = match &top[0] {
        Decl::Record(r) => r,
        other => panic!("expected a record decl, got {other:?}"),
    };
    let fields: Vec<_> = record.fields().collect();
    assert_eq!(fields.len(), 2);
    assert_eq!(fields[0].name().unwrap().text(), "fst");
}

#[test]
fn fixity_declaration_parses_associativity_and_notation() {
    let top = decls("infixr 1 _&&_\n");
    let fixity = match &top[0] {
        Decl::Fixity(f) => f,
        other => panic!("expected a fixity decl, got {other:?}"),
    };
    assert_eq!(fixity.operator_name().unwrap().text(), "_&&_");
}

#[test]
fn function_clause_collects_patterns_and_body() {
    let top = decls("const x y = x\n");
    let clause = match &top[0] {
        Decl::Clause(c) => c,
        other => panic!("expected a function clause, got {other:?}"),
    };
    assert_eq!(clause.patterns().len(), 2);
    assert!(clause.body().is_some());
}

#[test]
fn lambda_and_forall_and_let_expressions_all_parse() {
    decls("id : forall (a : Type) -> a -> a\nid = \\x -> x\n");
    decls("main : Type\nmain = let { x : Type; x = Type } in x\n");
}

#[test]
fn application_spine_is_flat_until_mixfix_reparse() {
    let top = decls("apply f x = f x\n");
    let clause = match &top[0] {
        Decl::Clause(c) => c,
        other => panic!("expected a function clause, got {other:?}"),
    };
    let body = clause.body().expect("clause body");
    match body {
        silt_syntax::ast::expr::Expr::Application(app) => {
            assert_eq!(app.spine().count(), 2);
        }
        other => panic!("expected an application spine, got {other:?}"),
    }
}

#[test]
fn malformed_declaration_is_recovered_without_panicking() {
    let parsed = parse("data : where\nmodule N where\n  y : Type\n");
    assert!(!parsed.ok());
    let root = SourceFile::cast(parsed.syntax()).expect("source file root");
    // Parsing continues past the broken decl and still finds the next one.
    assert!(root.decls().any(|d| matches!(d, Decl::Module(_))));
}
