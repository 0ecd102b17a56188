//! The Silt front-end driver.
//!
//! Provides the `siltc` command:
//!
//! ```text
//! siltc <PATHS...> [--mode <mode>] [--no-color]
//! ```
//!
//! `--mode` selects how far through the pipeline each input is driven and
//! what gets printed: `dump-tokens`/`dump-file`/`dump-shined` stop at the
//! lexer/layout stage, `dump-parse`/`dump-scopes` run the parser or the full
//! scope checker and print a JSON dump, `verify-parse`/`verify-scopes` run
//! the same passes but only report pass/fail, and `compile` (the default)
//! runs the full pipeline and reports diagnostics with no dump output.

mod discovery;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, ValueEnum};
use serde_json::{json, Value};

use silt_common::diagnostics::{render, Diagnostic, DiagnosticEngine, Severity};
use silt_common::span::SourceLocationConverter;
use silt_scope::checked::{Decl, DeclaredClause, DeclaredModule, Elimination, Expr, Head};
use silt_scope::names::{Name, NameInfo, NameSpace, QualifiedName};
use silt_syntax::{SyntaxElement, SyntaxNode};

#[derive(Parser)]
#[command(name = "siltc", version, about = "The Silt front-end driver")]
struct Cli {
    /// Source files to process.
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// How far to drive the pipeline and what to print.
    #[arg(long, value_enum, default_value = "compile")]
    mode: Mode,

    /// Disable ANSI color in rendered diagnostics.
    #[arg(long)]
    no_color: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    DumpTokens,
    DumpFile,
    DumpShined,
    DumpParse,
    DumpScopes,
    VerifyParse,
    VerifyScopes,
    Compile,
}

fn main() {
    let cli = Cli::parse();
    let mut any_errors = false;

    for path in &cli.paths {
        any_errors |= process_file(path, cli.mode, !cli.no_color);
    }

    if any_errors {
        process::exit(1);
    }
}

/// Runs one file through the pipeline up to `mode`. Returns whether any
/// error-severity diagnostic was emitted.
fn process_file(path: &Path, mode: Mode, colors: bool) -> bool {
    let mut diagnostics = DiagnosticEngine::new();
    let filename = path.display().to_string();

    let source = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(_) => {
            diagnostics.diagnose(silt_scope::diagnostics::could_not_read_input(&filename));
            report(&diagnostics, &filename, "", colors);
            return true;
        }
    };

    match mode {
        Mode::DumpTokens => {
            let tokens = silt_lexer::lex(&source, &mut diagnostics);
            print_json(json!({ "file": filename, "tokens": tokens }));
        }
        Mode::DumpShined => {
            let tokens = silt_lexer::lex(&source, &mut diagnostics);
            let conv = SourceLocationConverter::new(&source);
            let shined = silt_lexer::layout::apply_layout(&tokens, &conv);
            print_json(json!({ "file": filename, "tokens": shined }));
        }
        Mode::DumpFile => {
            let tokens = silt_lexer::lex(&source, &mut diagnostics);
            let reconstructed = reconstruct(&tokens);
            print!("{reconstructed}");
        }
        Mode::DumpParse => {
            let parsed = silt_syntax::parse(&source);
            print_json(json!({ "file": filename, "tree": tree_to_json(&parsed.syntax()) }));
            report_parse_errors(&mut diagnostics, parsed.errors());
        }
        Mode::DumpScopes => {
            let relative = path.to_path_buf();
            if let Some(module) = silt_scope::check(&source, &relative, &mut diagnostics) {
                print_json(module_to_json(&module));
            }
        }
        Mode::VerifyParse => {
            let parsed = silt_syntax::parse(&source);
            report_parse_errors(&mut diagnostics, parsed.errors());
        }
        Mode::VerifyScopes | Mode::Compile => {
            let relative = path.to_path_buf();
            let _ = silt_scope::check(&source, &relative, &mut diagnostics);
        }
    }

    report(&diagnostics, &filename, &source, colors)
}

/// Renders every diagnostic to stderr and reports whether any was an error.
fn report(diagnostics: &DiagnosticEngine, filename: &str, source: &str, colors: bool) -> bool {
    for d in diagnostics.diagnostics() {
        eprint!("{}", render(d, filename, source, colors));
    }
    diagnostics.has_errors()
}

fn report_parse_errors(diagnostics: &mut DiagnosticEngine, errors: &[silt_syntax::ParseError]) {
    for err in errors {
        let mut d = Diagnostic::new("parseError", Severity::Error, err.message.clone()).at(err.span);
        if let Some((msg, span)) = &err.related {
            d = d.with_note(msg.clone(), Some(*span));
        }
        diagnostics.diagnose(d);
    }
}

fn print_json(value: Value) {
    match serde_json::to_string_pretty(&value) {
        Ok(text) => println!("{text}"),
        Err(e) => eprintln!("error: could not serialize dump output: {e}"),
    }
}

/// Concatenates `leading + text + trailing` over every present token, the
/// lex round-trip invariant's defining reconstruction.
fn reconstruct(tokens: &[silt_common::token::Token]) -> String {
    let mut out = String::new();
    for tok in tokens {
        for piece in &tok.leading_trivia {
            out.push_str(&piece.to_text());
        }
        out.push_str(&tok.core_text());
        for piece in &tok.trailing_trivia {
            out.push_str(&piece.to_text());
        }
    }
    out
}

/// Builds a JSON debug tree from a rowan CST: `{kind, range, children}` for
/// nodes, `{kind, range, text}` for tokens. `silt-syntax` carries no such
/// dump itself (it's a CST/AST crate, not a JSON one); this is the driver's
/// own bespoke view of the tree for `dump-parse`.
fn tree_to_json(node: &SyntaxNode) -> Value {
    let range = node.text_range();
    let children: Vec<Value> = node.children_with_tokens().map(element_to_json).collect();
    json!({
        "kind": format!("{:?}", node.kind()),
        "range": [u32::from(range.start()), u32::from(range.end())],
        "children": children,
    })
}

fn element_to_json(element: SyntaxElement) -> Value {
    if let Some(node) = element.as_node() {
        return tree_to_json(node);
    }
    let token = element.as_token().expect("a SyntaxElement is always a node or a token");
    let range = token.text_range();
    json!({
        "kind": format!("{:?}", token.kind()),
        "range": [u32::from(range.start()), u32::from(range.end())],
        "text": token.text(),
    })
}

fn name_json(name: &Name) -> Value {
    json!(name.as_str())
}

fn qn_json(qn: &QualifiedName) -> Value {
    json!(qn.display())
}

fn name_info_json(info: &NameInfo) -> Value {
    match info {
        NameInfo::Definition(plicities) => json!({ "kind": "definition", "arity": plicities.len() }),
        NameInfo::Constructor(plicities) => json!({ "kind": "constructor", "arity": plicities.len() }),
        NameInfo::Projection => json!({ "kind": "projection" }),
        NameInfo::Module(locals) => json!({ "kind": "module", "exports": local_names_json(locals) }),
    }
}

fn local_names_json(locals: &silt_scope::names::LocalNames) -> Value {
    let mut names: Vec<_> = locals.iter().collect();
    names.sort_by_key(|(n, _)| n.as_str().to_string());
    Value::Array(names.into_iter().map(|(n, info)| json!({ "name": n.as_str(), "info": name_info_json(info) })).collect())
}

fn namespace_json(ns: &NameSpace) -> Value {
    json!({
        "module": ns.module.display(),
        "localNames": local_names_json(&ns.local_names),
    })
}

fn module_to_json(module: &DeclaredModule) -> Value {
    json!({
        "moduleName": module.module_name.display(),
        "namespace": namespace_json(&module.namespace),
        "decls": module.decls.iter().map(decl_to_json).collect::<Vec<_>>(),
    })
}

fn decl_to_json(decl: &Decl) -> Value {
    match decl {
        Decl::Ascription { name, ty } => json!({ "kind": "ascription", "name": qn_json(name), "type": expr_to_json(ty) }),
        Decl::Postulate { name, ty } => json!({ "kind": "postulate", "name": qn_json(name), "type": expr_to_json(ty) }),
        Decl::Function { name, clauses } => {
            json!({ "kind": "function", "name": qn_json(name), "clauses": clauses.iter().map(clause_to_json).collect::<Vec<_>>() })
        }
        Decl::Data { name, signature, constructors } => json!({
            "kind": "data",
            "name": qn_json(name),
            "signature": expr_to_json(signature),
            "constructors": constructors.iter().map(|c| json!({ "name": qn_json(&c.name), "signature": expr_to_json(&c.signature) })).collect::<Vec<_>>(),
        }),
        Decl::Record { name, signature, fields } => json!({
            "kind": "record",
            "name": qn_json(name),
            "signature": expr_to_json(signature),
            "fields": fields.iter().map(|f| json!({ "name": qn_json(&f.name), "type": expr_to_json(&f.ty) })).collect::<Vec<_>>(),
        }),
        Decl::Module(m) => json!({ "kind": "module", "module": module_to_json(m) }),
        Decl::Import(qn) => json!({ "kind": "import", "name": qn_json(qn) }),
        Decl::OpenImport(qn) => json!({ "kind": "open", "name": qn_json(qn) }),
        Decl::LetBinding { name, ty, value } => json!({
            "kind": "let",
            "name": name_json(name),
            "type": ty.as_ref().map(expr_to_json),
            "value": expr_to_json(value),
        }),
    }
}

fn clause_to_json(clause: &DeclaredClause) -> Value {
    json!({
        "patterns": clause.patterns.iter().map(expr_to_json).collect::<Vec<_>>(),
        "body": expr_to_json(&clause.body),
    })
}

fn head_to_json(head: &Head) -> Value {
    match head {
        Head::Variable(n) => json!({ "kind": "variable", "name": name_json(n) }),
        Head::Definition(qn) => json!({ "kind": "definition", "name": qn_json(qn) }),
        Head::Expr(e) => json!({ "kind": "expr", "expr": expr_to_json(e) }),
    }
}

fn expr_to_json(expr: &Expr) -> Value {
    match expr {
        Expr::Apply(head, elims) => json!({
            "kind": "apply",
            "head": head_to_json(head),
            "args": elims.iter().map(|Elimination::Apply(a)| expr_to_json(a)).collect::<Vec<_>>(),
        }),
        Expr::Pi(name, domain, codomain) => json!({
            "kind": "pi",
            "name": name_json(name),
            "domain": expr_to_json(domain),
            "codomain": expr_to_json(codomain),
        }),
        Expr::Function(domain, codomain) => json!({
            "kind": "function",
            "domain": expr_to_json(domain),
            "codomain": expr_to_json(codomain),
        }),
        Expr::Lambda(name, ty, body) => json!({
            "kind": "lambda",
            "name": name_json(name),
            "type": ty.as_deref().map(expr_to_json),
            "body": expr_to_json(body),
        }),
        Expr::Type => json!({ "kind": "type" }),
        Expr::Meta => json!({ "kind": "meta" }),
        Expr::Error => json!({ "kind": "error" }),
        Expr::Let(bindings, body) => json!({
            "kind": "let",
            "bindings": bindings.iter().map(|b| json!({
                "name": name_json(&b.name),
                "type": b.ty.as_ref().map(expr_to_json),
                "value": expr_to_json(&b.value),
            })).collect::<Vec<_>>(),
            "body": expr_to_json(body),
        }),
    }
}
