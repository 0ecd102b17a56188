//! The scope checker: walks a parsed source file's typed AST, resolves every
//! name to a binding, runs the mixfix reparser over every expression spine,
//! and produces a [`checked::DeclaredModule`].
//!
//! Two passes per module body, per the notation-then-declaration split:
//! fixity declarations are registered into the current scope first so a
//! notation can be used by a clause written above its `infixl`/`infixr`
//! declaration, then declarations are walked in source order.

use std::path::Path;

use rustc_hash::{FxHashMap, FxHashSet};
use silt_common::diagnostics::DiagnosticEngine;
use silt_common::span::Span;
use silt_syntax::ast::expr::Expr as SynExpr;
use silt_syntax::ast::item::{
    Decl as SynDecl, Name as SynName, QualifiedName as SynQualifiedName, SourceFile,
};
use silt_syntax::ast::AstNode;
use silt_syntax::{SyntaxNode, SyntaxToken};
use silt_mixfix::{closed_words, reparse, Assoc, Fixity, MixToken, MixTree, PrecedenceLevel};

use crate::checked::{Decl, DeclaredClause, DeclaredConstructor, DeclaredField, DeclaredLetBinding, DeclaredModule, Elimination, Expr, Head};
use crate::diagnostics as diag;
use crate::env::ScopeStack;
use crate::module_path;
use crate::names::{LocalNames, Name, NameInfo, QualifiedName};

/// Hook for resolving an `import`ed module's exported names. The scope
/// checker never reads a file itself; the driver supplies this.
pub trait ImportResolver {
    fn resolve(&mut self, segments: &[Name]) -> Option<LocalNames>;
}

/// The resolver used when nothing else is wired up: every import fails to
/// resolve, which is exactly the right behavior for checking a single file
/// in isolation (e.g. `verify(scopes)` on one path at a time).
pub struct NullImportResolver;

impl ImportResolver for NullImportResolver {
    fn resolve(&mut self, _segments: &[Name]) -> Option<LocalNames> {
        None
    }
}

fn span_of(node: &SyntaxNode) -> Span {
    let range = node.text_range();
    Span::new(range.start().into(), range.end().into())
}

fn token_span(token: &SyntaxToken) -> Span {
    let range = token.text_range();
    Span::new(range.start().into(), range.end().into())
}

fn to_name(syn: &SynName) -> Name {
    let text = syn.text();
    let span = syn.ident_token().map(|t| token_span(&t)).unwrap_or_else(|| span_of(syn.syntax()));
    Name::new(text, span)
}

fn to_segments(syn: &SynQualifiedName) -> Vec<Name> {
    syn.segments().map(|s| to_name(&s)).collect()
}

fn dotted(segments: &[Name]) -> String {
    segments.iter().map(Name::as_str).collect::<Vec<_>>().join(".")
}

/// Checks a single source file, validating that its declared module matches
/// `relative_file`'s position in the directory tree.
pub fn check(source: &str, relative_file: &Path, diagnostics: &mut DiagnosticEngine) -> Option<DeclaredModule> {
    check_with_imports(source, relative_file, diagnostics, &mut NullImportResolver)
}

pub fn check_with_imports(
    source: &str,
    relative_file: &Path,
    diagnostics: &mut DiagnosticEngine,
    imports: &mut impl ImportResolver,
) -> Option<DeclaredModule> {
    let parsed = silt_syntax::parse(source);
    for err in parsed.errors() {
        let mut d = silt_common::diagnostics::Diagnostic::new(
            "parseError",
            silt_common::diagnostics::Severity::Error,
            err.message.clone(),
        )
        .at(err.span);
        if let Some((msg, span)) = &err.related {
            d = d.with_note(msg.clone(), Some(*span));
        }
        diagnostics.diagnose(d);
    }

    let root = SourceFile::cast(parsed.syntax())?;
    let top_decls: Vec<SynDecl> = root.decls().collect();

    let module_decl = top_decls.iter().find_map(|d| match d {
        SynDecl::Module(m) => Some(m.clone()),
        _ => None,
    })?;
    let name_syn = module_decl.name()?;
    let segments = to_segments(&name_syn);

    if !module_path::matches_directory_layout(&segments, relative_file) {
        let expected = module_path::expected_file_path(&segments);
        diagnostics.diagnose(diag::incorrect_module_structure(
            &dotted(&segments),
            &expected.display().to_string(),
            span_of(name_syn.syntax()),
        ));
        return None;
    }

    let (module_path_segments, leaf) = segments.split_at(segments.len() - 1);
    let module_name = QualifiedName::new(leaf[0].clone(), module_path_segments.to_vec());

    let mut stack = ScopeStack::new(module_name.clone());
    let decls = process_module_body(&mut stack, module_decl.decls().collect(), diagnostics, imports);

    Some(DeclaredModule { module_name, namespace: stack.current().name_space.clone(), decls })
}

fn process_module_body(
    stack: &mut ScopeStack,
    decls: Vec<SynDecl>,
    diagnostics: &mut DiagnosticEngine,
    imports: &mut impl ImportResolver,
) -> Vec<Decl> {
    // Pass 1: notations, so a clause can use a notation declared later in
    // the same scope.
    for decl in &decls {
        if let SynDecl::Fixity(f) = decl {
            register_fixity(stack, f, diagnostics);
        }
    }

    // Pass 2: declarations, in source order.
    let mut out = Vec::new();
    let mut ascribed: FxHashSet<String> = FxHashSet::default();
    let mut clause_order: Vec<String> = Vec::new();
    let mut clauses: FxHashMap<String, (QualifiedName, Vec<DeclaredClause>)> = FxHashMap::default();

    for decl in decls {
        match decl {
            SynDecl::Fixity(_) => {}
            SynDecl::Module(m) => {
                let Some(name_syn) = m.name() else { continue };
                let segs = to_segments(&name_syn);
                let local_name = segs.last().expect("qualified name has at least one segment").clone();
                let nested_module_name = QualifiedName::new(local_name.clone(), {
                    let mut prefix = stack.current().name_space.module.full_segments();
                    prefix.extend(segs[..segs.len() - 1].iter().cloned());
                    prefix
                });
                let child_decls = m.decls().collect();
                let (declared, child_namespace) = stack.under_module_scope(nested_module_name.clone(), |inner| {
                    let declared_decls = process_module_body(inner, child_decls, diagnostics, imports);
                    (declared_decls, inner.current().name_space.clone())
                });
                bind_local(stack, local_name, NameInfo::Module(child_namespace.local_names.clone()), diagnostics);
                out.push(Decl::Module(DeclaredModule {
                    module_name: nested_module_name,
                    namespace: child_namespace,
                    decls: declared,
                }));
            }
            SynDecl::Import(i) => {
                let Some(name_syn) = i.name() else { continue };
                let segs = to_segments(&name_syn);
                let qn = QualifiedName::new(
                    segs.last().expect("import has a name").clone(),
                    segs[..segs.len() - 1].to_vec(),
                );
                if stack.current().imported_modules.contains_key(&qn) {
                    diagnostics.diagnose(diag::duplicate_import(&dotted(&segs), span_of(name_syn.syntax())));
                }
                let resolved = imports.resolve(&segs).unwrap_or_default();
                stack.current_mut().imported_modules.insert(qn.clone(), resolved);
                out.push(Decl::Import(qn));
            }
            SynDecl::Open(o) => {
                let Some(name_syn) = o.name() else { continue };
                let segs = to_segments(&name_syn);
                let qn = QualifiedName::new(
                    segs.last().expect("open has a name").clone(),
                    segs[..segs.len() - 1].to_vec(),
                );
                if let Some(locals) = stack.current().imported_modules.get(&qn).cloned() {
                    let module_path = qn.full_segments();
                    let opened = stack.current_mut();
                    for (n, info) in locals {
                        let exported = QualifiedName::new(n.clone(), module_path.clone());
                        opened.opened_names.entry(n).or_default().push((exported, info));
                    }
                }
                out.push(Decl::OpenImport(qn));
            }
            SynDecl::Data(d) => {
                let Some(name_syn) = d.name() else { continue };
                let name = to_name(&name_syn);
                let signature = match d.signature() {
                    Some(sig) => check_expr(stack, &sig, diagnostics),
                    None => Expr::Type,
                };
                let qn = bind_local(stack, name.clone(), NameInfo::Definition(Vec::new()), diagnostics);
                let constructors = d
                    .constructors()
                    .filter_map(|c| {
                        let cname = to_name(&c.name()?);
                        let csig = match c.signature() {
                            Some(s) => check_expr(stack, &s, diagnostics),
                            None => Expr::Type,
                        };
                        let cqn = bind_local(stack, cname, NameInfo::Constructor(Vec::new()), diagnostics);
                        Some(DeclaredConstructor { name: cqn, signature: csig })
                    })
                    .collect();
                out.push(Decl::Data { name: qn, signature, constructors });
            }
            SynDecl::Record(r) => {
                let Some(name_syn) = r.name() else { continue };
                let name = to_name(&name_syn);
                let signature = match r.signature() {
                    Some(sig) => check_expr(stack, &sig, diagnostics),
                    None => Expr::Type,
                };
                let fields: Vec<SynName> = r.fields().filter_map(|f| f.name()).collect();
                if fields.is_empty() {
                    diagnostics.diagnose(diag::record_missing_constructor(name.as_str(), name.origin));
                }
                let qn = bind_local(stack, name, NameInfo::Definition(Vec::new()), diagnostics);
                let checked_fields = r
                    .fields()
                    .filter_map(|f| {
                        let fname = to_name(&f.name()?);
                        let fty = check_expr(stack, &f.ty()?, diagnostics);
                        let fqn = bind_local(stack, fname, NameInfo::Projection, diagnostics);
                        Some(DeclaredField { name: fqn, ty: fty })
                    })
                    .collect();
                out.push(Decl::Record { name: qn, signature, fields: checked_fields });
            }
            SynDecl::Ascription(a) => {
                let Some(name_syn) = a.name() else { continue };
                let segs = to_segments(&name_syn);
                let leaf = to_name(&segs_to_plain_name(&name_syn));
                let Some(ty_syn) = a.ty() else { continue };
                let ty = check_expr(stack, &ty_syn, diagnostics);
                ascribed.insert(leaf.as_str().to_string());
                let qn = bind_local(stack, leaf, NameInfo::Definition(Vec::new()), diagnostics);
                out.push(Decl::Ascription { name: qn, ty });
                let _ = segs;
            }
            SynDecl::Postulate(p) => {
                let Some(name_syn) = p.name() else { continue };
                let name = to_name(&name_syn);
                let Some(ty_syn) = p.ty() else { continue };
                let ty = check_expr(stack, &ty_syn, diagnostics);
                let qn = bind_local(stack, name, NameInfo::Definition(Vec::new()), diagnostics);
                out.push(Decl::Postulate { name: qn, ty });
            }
            SynDecl::Clause(c) => {
                let Some(name_syn) = c.name() else { continue };
                let leaf = to_name(&segs_to_plain_name(&name_syn));
                let leaf_text = leaf.as_str().to_string();
                if !ascribed.contains(&leaf_text) {
                    diagnostics.diagnose(diag::body_before_signature(&leaf_text, leaf.origin));
                }
                let (patterns, body) = stack.under_block_scope(|inner| {
                    let patterns: Vec<Expr> =
                        c.patterns().iter().map(|p| check_pattern(inner, p, diagnostics)).collect();
                    let body = match c.body() {
                        Some(b) => check_expr(inner, &b, diagnostics),
                        None => Expr::Error,
                    };
                    (patterns, body)
                });
                let qn = QualifiedName::new(leaf.clone(), stack.current().name_space.module.full_segments());
                if !clauses.contains_key(&leaf_text) {
                    clause_order.push(leaf_text.clone());
                    clauses.insert(leaf_text.clone(), (qn, Vec::new()));
                }
                clauses.get_mut(&leaf_text).unwrap().1.push(DeclaredClause { patterns, body });
            }
            SynDecl::Let(l) => {
                let Some(name_syn) = l.name() else { continue };
                let name = to_name(&name_syn);
                let ty = l.ty().map(|t| check_expr(stack, &t, diagnostics));
                let value = match l.value() {
                    Some(v) => check_expr(stack, &v, diagnostics),
                    None => Expr::Error,
                };
                bind_variable(stack, name.clone(), diagnostics);
                out.push(Decl::LetBinding { name, ty, value });
            }
        }
    }

    for leaf_text in clause_order {
        let (name, cls) = clauses.remove(&leaf_text).expect("clause group was just inserted");
        out.push(Decl::Function { name, clauses: cls });
    }

    out
}

/// A `FunctionClause`/`AscriptionDecl` name is syntactically a
/// `QualifiedName`, but never has more than one segment in this grammar
/// subset (a definition is always declared in the module it belongs to, not
/// dotted into an arbitrary namespace) -- this extracts that one segment.
fn segs_to_plain_name(syn: &SynQualifiedName) -> SynName {
    syn.segments().last().expect("qualified name has at least one segment")
}

fn bind_local(stack: &mut ScopeStack, name: Name, info: NameInfo, diagnostics: &mut DiagnosticEngine) -> QualifiedName {
    let module = stack.current().name_space.module.full_segments();
    let qn = QualifiedName::new(name.clone(), module);
    let scope = stack.current_mut();
    if let Some((existing, _)) = scope.name_space.local_names.get_key_value(&name) {
        diagnostics.diagnose(diag::name_shadows(name.as_str(), name.origin, existing.origin));
    }
    scope.name_space.rebind(name, info);
    qn
}

fn bind_variable(stack: &mut ScopeStack, name: Name, diagnostics: &mut DiagnosticEngine) {
    if name.as_str() == "Type" {
        diagnostics.diagnose(diag::name_reserved(name.as_str(), name.origin));
        return;
    }
    if name.as_str() != "_" {
        if let Some(prev) = stack.current().vars.get(&name).copied() {
            diagnostics.diagnose(diag::name_shadows(name.as_str(), name.origin, prev));
        }
    }
    stack.current_mut().vars.insert(name.clone(), name.origin);
}

fn register_fixity(stack: &mut ScopeStack, decl: &silt_syntax::ast::item::FixityDecl, diagnostics: &mut DiagnosticEngine) {
    let Some(op_syn) = decl.operator_name() else { return };
    let op_name = to_name(&op_syn);

    let assoc = match decl.associativity_token().map(|t| t.kind()) {
        Some(silt_syntax::SyntaxKind::INFIXL_KW) => Assoc::Left,
        Some(silt_syntax::SyntaxKind::INFIXR_KW) => Assoc::Right,
        _ => Assoc::Non,
    };

    let level = match decl.precedence_token() {
        Some(tok) => match tok.text().parse::<i64>() {
            Ok(v) => PrecedenceLevel::Related(v),
            Err(_) => {
                diagnostics.diagnose(diag::precedence_not_integral(token_span(&tok)));
                PrecedenceLevel::Related(20)
            }
        },
        None => PrecedenceLevel::Related(20),
    };

    stack.current_mut().fixities.insert(op_name, Fixity { level, assoc });
}

/// Resolves an unqualified or dotted identifier against the current scope:
/// a bound variable first, then this scope's own namespace (and its parent
/// chain, so a nested block can see names from its enclosing module without
/// qualification), then names brought in by `open`, then (for a dotted
/// reference) an imported module's exports.
fn resolve_name(stack: &ScopeStack, segments: &[Name], span: Span, diagnostics: &mut DiagnosticEngine) -> Expr {
    if segments.len() == 1 {
        let n = &segments[0];
        if stack.current().vars.contains_key(n) {
            return Expr::Apply(Head::Variable(n.clone()), Vec::new());
        }
        if let Some(info) = lookup_unqualified(stack, n) {
            return head_from_info(stack, n, &info);
        }
        if let Some(candidates) = lookup_opened(stack, n) {
            if candidates.len() > 1 {
                let mut names: Vec<QualifiedName> = candidates.iter().map(|(qn, _)| qn.clone()).collect();
                names.sort_by(|a, b| a.display().cmp(&b.display()));
                diagnostics.diagnose(diag::ambiguous_name(n.as_str(), span, &names));
            }
            if let Some((qn, info)) = candidates.first() {
                return info_to_expr(qn.clone(), info);
            }
        }
        diagnostics.diagnose(diag::undeclared_identifier(n.as_str(), span));
        return Expr::Error;
    }

    let (module_path, leaf_slice) = segments.split_at(segments.len() - 1);
    let leaf = &leaf_slice[0];
    if let Some(locals) = lookup_module_path(stack, module_path) {
        if let Some(info) = locals.get(leaf) {
            let qn = QualifiedName::new(leaf.clone(), module_path.to_vec());
            return info_to_expr(qn, info);
        }
    }
    diagnostics.diagnose(diag::undeclared_identifier(&dotted(segments), span));
    Expr::Error
}

fn lookup_unqualified(stack: &ScopeStack, name: &Name) -> Option<NameInfo> {
    let mut ns = Some(&stack.current().name_space);
    while let Some(n) = ns {
        if let Some(info) = n.local_names.get(name) {
            return Some(info.clone());
        }
        ns = n.parent.as_deref();
    }
    None
}

fn lookup_opened(stack: &ScopeStack, name: &Name) -> Option<Vec<(QualifiedName, NameInfo)>> {
    stack.current().opened_names.get(name).cloned()
}

/// Resolves a dotted module prefix to its exported names: either a
/// same-file submodule reachable up the enclosing namespace chain (single
/// segment only), or an imported module matched by its full dotted name.
fn lookup_module_path<'a>(stack: &'a ScopeStack, path: &[Name]) -> Option<&'a LocalNames> {
    if path.is_empty() {
        return None;
    }
    if path.len() == 1 {
        if let Some(locals) = find_module_locals(stack, &path[0]) {
            return Some(locals);
        }
    }
    let joined = dotted(path);
    stack
        .current()
        .imported_modules
        .iter()
        .find(|(qn, _)| qn.display() == joined)
        .map(|(_, locals)| locals)
}

fn find_module_locals<'a>(stack: &'a ScopeStack, name: &Name) -> Option<&'a LocalNames> {
    let mut ns = Some(&stack.current().name_space);
    while let Some(n) = ns {
        if let Some(NameInfo::Module(locals)) = n.local_names.get(name) {
            return Some(locals);
        }
        ns = n.parent.as_deref();
    }
    None
}

fn head_from_info(stack: &ScopeStack, name: &Name, info: &NameInfo) -> Expr {
    let module = stack.current().name_space.module.full_segments();
    info_to_expr(QualifiedName::new(name.clone(), module), info)
}

fn info_to_expr(qn: QualifiedName, info: &NameInfo) -> Expr {
    match info {
        NameInfo::Module(_) => Expr::Error,
        _ => Expr::Apply(Head::Definition(qn), Vec::new()),
    }
}

fn check_expr(stack: &mut ScopeStack, node: &SynExpr, diagnostics: &mut DiagnosticEngine) -> Expr {
    check_expr_impl(stack, node, diagnostics, false)
}

fn check_pattern(stack: &mut ScopeStack, node: &SynExpr, diagnostics: &mut DiagnosticEngine) -> Expr {
    check_expr_impl(stack, node, diagnostics, true)
}

fn check_expr_impl(stack: &mut ScopeStack, node: &SynExpr, diagnostics: &mut DiagnosticEngine, is_pattern: bool) -> Expr {
    match node {
        SynExpr::NamedBasic(n) => {
            let Some(qn) = n.name() else { return Expr::Error };
            let segments = to_segments(&qn);
            let span = span_of(qn.syntax());
            if is_pattern && segments.len() == 1 && lookup_unqualified(stack, &segments[0]).is_none() {
                bind_variable(stack, segments[0].clone(), diagnostics);
                return Expr::Apply(Head::Variable(segments[0].clone()), Vec::new());
            }
            resolve_name(stack, &segments, span, diagnostics)
        }
        SynExpr::Application(a) => check_spine(stack, &a.spine().collect::<Vec<_>>(), span_of(a.syntax()), diagnostics, is_pattern),
        SynExpr::Lambda(l) => {
            let bindings: Vec<_> = l.bindings().map(|b| b.bindings().collect::<Vec<_>>()).unwrap_or_default();
            stack.under_block_scope(|inner| {
                let mut checked_bindings = Vec::new();
                for b in &bindings {
                    let ty = b.ty().map(|t| check_expr(inner, &t, diagnostics));
                    let Some(name_syn) = b.name() else { continue };
                    let name = to_name(&name_syn);
                    bind_variable(inner, name.clone(), diagnostics);
                    checked_bindings.push((name, ty));
                }
                let body = match l.body() {
                    Some(b) => check_expr(inner, &b, diagnostics),
                    None => Expr::Error,
                };
                checked_bindings.into_iter().rev().fold(body, |acc, (name, ty)| {
                    Expr::Lambda(name, ty.map(Box::new), Box::new(acc))
                })
            })
        }
        SynExpr::Quantified(q) => {
            let bindings: Vec<_> = q.bindings().map(|b| b.bindings().collect::<Vec<_>>()).unwrap_or_default();
            stack.under_block_scope(|inner| {
                let mut checked_bindings = Vec::new();
                for b in &bindings {
                    let ty = match b.ty() {
                        Some(t) => check_expr(inner, &t, diagnostics),
                        None => Expr::Meta,
                    };
                    let Some(name_syn) = b.name() else { continue };
                    let name = to_name(&name_syn);
                    bind_variable(inner, name.clone(), diagnostics);
                    checked_bindings.push((name, ty));
                }
                let body = match q.body() {
                    Some(b) => check_expr(inner, &b, diagnostics),
                    None => Expr::Error,
                };
                checked_bindings.into_iter().rev().fold(body, |acc, (name, ty)| {
                    Expr::Pi(name, Box::new(ty), Box::new(acc))
                })
            })
        }
        SynExpr::Arrow(a) => {
            let domain = match a.domain() {
                Some(d) => check_expr(stack, &d, diagnostics),
                None => Expr::Error,
            };
            let codomain = match a.codomain() {
                Some(c) => check_expr(stack, &c, diagnostics),
                None => Expr::Error,
            };
            Expr::Function(Box::new(domain), Box::new(codomain))
        }
        SynExpr::Let(l) => stack.under_block_scope(|inner| {
            let mut bindings = Vec::new();
            for b in l.bindings() {
                let ty = b.ty().map(|t| check_expr(inner, &t, diagnostics));
                let value = match b.value() {
                    Some(v) => check_expr(inner, &v, diagnostics),
                    None => Expr::Error,
                };
                let Some(name_syn) = b.name() else { continue };
                let name = to_name(&name_syn);
                bind_variable(inner, name.clone(), diagnostics);
                bindings.push(DeclaredLetBinding { name, ty, value });
            }
            let body = match l.body() {
                Some(b) => check_expr(inner, &b, diagnostics),
                None => Expr::Error,
            };
            Expr::Let(bindings, Box::new(body))
        }),
        SynExpr::Paren(p) => match p.inner() {
            Some(inner) => check_expr_impl(stack, &inner, diagnostics, is_pattern),
            None => Expr::Error,
        },
        SynExpr::Underscore(_) => Expr::Meta,
        SynExpr::Type(_) => Expr::Type,
    }
}

/// Reparses a flat application spine using the fixities visible in the
/// current scope, then converts the resulting tree (or, on failure, the
/// first atom) into a checked [`Expr`].
fn check_spine(stack: &mut ScopeStack, spine: &[SynExpr], whole_span: Span, diagnostics: &mut DiagnosticEngine, is_pattern: bool) -> Expr {
    if spine.is_empty() {
        return Expr::Error;
    }
    if spine.len() == 1 {
        return check_expr_impl(stack, &spine[0], diagnostics, is_pattern);
    }

    let available_words: std::collections::HashSet<String> = spine
        .iter()
        .filter_map(bare_single_segment_text)
        .collect();
    let dag = stack.current().fixities.build_dag(&available_words);
    let closed = closed_words(available_words.iter().map(String::as_str), &dag);

    if dag.is_empty() {
        // No notations visible at all: plain left-associative application.
        let mut iter = spine.iter();
        let head = check_expr_impl(stack, iter.next().unwrap(), diagnostics, is_pattern);
        return iter.fold(head, |acc, e| {
            let arg = check_expr_impl(stack, e, diagnostics, is_pattern);
            apply(acc, arg)
        });
    }

    let mut has_word = false;
    let tokens: Vec<MixToken<Expr>> = spine
        .iter()
        .map(|e| {
            if let Some(text) = bare_single_segment_text(e) {
                if available_words.contains(&text) && !closed.contains(&text) {
                    has_word = true;
                    return MixToken::Word(text, span_of(e.syntax()));
                }
            }
            MixToken::Atom(check_expr_impl(stack, e, diagnostics, is_pattern), span_of(e.syntax()))
        })
        .collect();

    if !has_word {
        let mut iter = tokens.into_iter();
        let head = match iter.next().unwrap() {
            MixToken::Atom(e, _) => e,
            MixToken::Word(w, s) => {
                diagnostics.diagnose(diag::undeclared_identifier(&w, s));
                Expr::Error
            }
        };
        return iter.fold(head, |acc, tok| match tok {
            MixToken::Atom(e, _) => apply(acc, e),
            MixToken::Word(w, s) => {
                diagnostics.diagnose(diag::undeclared_identifier(&w, s));
                apply(acc, Expr::Error)
            }
        });
    }

    let outcome = reparse(&tokens, &dag);
    if !outcome.is_complete() {
        if outcome.consumed == 0 {
            diagnostics.diagnose(diag::reparse_lhs_failed(whole_span, &outcome.considered));
        } else {
            diagnostics.diagnose(diag::reparse_rhs_failed(whole_span, &outcome.considered));
        }
    }

    tree_to_expr(stack, &outcome.tree, whole_span, diagnostics)
}

fn apply(head: Expr, arg: Expr) -> Expr {
    match head {
        Expr::Apply(h, mut elims) => {
            elims.push(Elimination::Apply(Box::new(arg)));
            Expr::Apply(h, elims)
        }
        other => Expr::Apply(Head::Expr(Box::new(other)), vec![Elimination::Apply(Box::new(arg))]),
    }
}

fn tree_to_expr(stack: &ScopeStack, tree: &MixTree<Expr>, span: Span, diagnostics: &mut DiagnosticEngine) -> Expr {
    match tree {
        MixTree::Atom(e) => e.clone(),
        MixTree::Op { notation, args } => {
            let operator = resolve_name(stack, &[Name::new(notation.clone(), span)], span, diagnostics);
            let checked_args: Vec<Expr> = args.iter().map(|a| tree_to_expr(stack, a, span, diagnostics)).collect();
            checked_args.into_iter().fold(operator, apply)
        }
    }
}

fn bare_single_segment_text(expr: &SynExpr) -> Option<String> {
    match expr {
        SynExpr::NamedBasic(n) => {
            let qn = n.name()?;
            let mut segments = qn.segments();
            let only = segments.next()?;
            if segments.next().is_some() {
                return None;
            }
            Some(only.text())
        }
        _ => None,
    }
}
