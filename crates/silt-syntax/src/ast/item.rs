//! Typed AST nodes for declarations.
//!
//! Covers: SourceFile, ModuleDecl, ImportDecl, OpenDecl, FixityDecl,
//! DataDecl, ConstructorDecl, RecordDecl, RecordFieldDecl, AscriptionDecl,
//! PostulateDecl, FunctionClause, LetDecl, QualifiedName, Name, BindingList,
//! TypedBinding.

use crate::ast::expr::Expr;
use crate::ast::{ast_node, child_node, child_nodes, child_token, AstNode};
use crate::cst::{SyntaxNode, SyntaxToken};
use crate::syntax_kind::SyntaxKind;

// ── Source file ──────────────────────────────────────────────────────────

ast_node!(SourceFile, SOURCE_FILE);

impl SourceFile {
    pub fn decls(&self) -> impl Iterator<Item = Decl> + '_ {
        self.syntax.children().filter_map(Decl::cast)
    }
}

// ── Decl enum ────────────────────────────────────────────────────────────

/// Any top-level or nested declaration.
#[derive(Debug, Clone)]
pub enum Decl {
    Module(ModuleDecl),
    Import(ImportDecl),
    Open(OpenDecl),
    Fixity(FixityDecl),
    Data(DataDecl),
    Record(RecordDecl),
    Ascription(AscriptionDecl),
    Postulate(PostulateDecl),
    Clause(FunctionClause),
    Let(LetDecl),
}

impl Decl {
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::MODULE_DECL => Some(Decl::Module(ModuleDecl { syntax: node })),
            SyntaxKind::IMPORT_DECL => Some(Decl::Import(ImportDecl { syntax: node })),
            SyntaxKind::OPEN_DECL => Some(Decl::Open(OpenDecl { syntax: node })),
            SyntaxKind::FIXITY_DECL => Some(Decl::Fixity(FixityDecl { syntax: node })),
            SyntaxKind::DATA_DECL => Some(Decl::Data(DataDecl { syntax: node })),
            SyntaxKind::RECORD_DECL => Some(Decl::Record(RecordDecl { syntax: node })),
            SyntaxKind::ASCRIPTION_DECL => Some(Decl::Ascription(AscriptionDecl { syntax: node })),
            SyntaxKind::POSTULATE_DECL => Some(Decl::Postulate(PostulateDecl { syntax: node })),
            SyntaxKind::FUNCTION_CLAUSE => Some(Decl::Clause(FunctionClause { syntax: node })),
            SyntaxKind::LET_DECL => Some(Decl::Let(LetDecl { syntax: node })),
            _ => None,
        }
    }

    pub fn syntax(&self) -> &SyntaxNode {
        match self {
            Decl::Module(n) => n.syntax(),
            Decl::Import(n) => n.syntax(),
            Decl::Open(n) => n.syntax(),
            Decl::Fixity(n) => n.syntax(),
            Decl::Data(n) => n.syntax(),
            Decl::Record(n) => n.syntax(),
            Decl::Ascription(n) => n.syntax(),
            Decl::Postulate(n) => n.syntax(),
            Decl::Clause(n) => n.syntax(),
            Decl::Let(n) => n.syntax(),
        }
    }
}

// ── Name / QualifiedName ─────────────────────────────────────────────────

ast_node!(Name, NAME);

impl Name {
    /// The identifier token itself.
    pub fn ident_token(&self) -> Option<SyntaxToken> {
        child_token(&self.syntax, SyntaxKind::IDENT)
    }

    pub fn text(&self) -> String {
        self.ident_token().map(|t| t.text().to_string()).unwrap_or_default()
    }
}

ast_node!(QualifiedName, QUALIFIED_NAME);

impl QualifiedName {
    /// Dot-separated segments, in order, e.g. `A.B.C` -> `["A", "B", "C"]`.
    pub fn segments(&self) -> impl Iterator<Item = Name> + '_ {
        child_nodes(&self.syntax)
    }
}

// ── Module ───────────────────────────────────────────────────────────────

ast_node!(ModuleDecl, MODULE_DECL);

impl ModuleDecl {
    pub fn name(&self) -> Option<QualifiedName> {
        child_node(&self.syntax)
    }

    pub fn decls(&self) -> impl Iterator<Item = Decl> + '_ {
        self.syntax.children().filter_map(Decl::cast)
    }
}

// ── Import / Open ────────────────────────────────────────────────────────

ast_node!(ImportDecl, IMPORT_DECL);

impl ImportDecl {
    pub fn name(&self) -> Option<QualifiedName> {
        child_node(&self.syntax)
    }
}

ast_node!(OpenDecl, OPEN_DECL);

impl OpenDecl {
    pub fn name(&self) -> Option<QualifiedName> {
        child_node(&self.syntax)
    }
}

// ── Fixity ───────────────────────────────────────────────────────────────

ast_node!(FixityDecl, FIXITY_DECL);

impl FixityDecl {
    /// `infix`, `infixl`, or `infixr`.
    pub fn associativity_token(&self) -> Option<SyntaxToken> {
        self.syntax
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|t| matches!(t.kind(), SyntaxKind::INFIX_KW | SyntaxKind::INFIXL_KW | SyntaxKind::INFIXR_KW))
    }

    /// The precedence level token (an identifier spelling a natural number).
    pub fn precedence_token(&self) -> Option<SyntaxToken> {
        child_token(&self.syntax, SyntaxKind::IDENT)
    }

    /// The notation identifier, e.g. `_+_` or `if_then_else_`.
    pub fn operator_name(&self) -> Option<Name> {
        child_node(&self.syntax)
    }
}

// ── Data ─────────────────────────────────────────────────────────────────

ast_node!(DataDecl, DATA_DECL);

impl DataDecl {
    pub fn name(&self) -> Option<Name> {
        child_node(&self.syntax)
    }

    pub fn signature(&self) -> Option<Expr> {
        child_node(&self.syntax)
    }

    pub fn constructors(&self) -> impl Iterator<Item = ConstructorDecl> + '_ {
        child_nodes(&self.syntax)
    }
}

ast_node!(ConstructorDecl, CONSTRUCTOR_DECL);

impl ConstructorDecl {
    pub fn name(&self) -> Option<Name> {
        child_node(&self.syntax)
    }

    pub fn signature(&self) -> Option<Expr> {
        child_node(&self.syntax)
    }
}

// ── Record ───────────────────────────────────────────────────────────────

ast_node!(RecordDecl, RECORD_DECL);

impl RecordDecl {
    pub fn name(&self) -> Option<Name> {
        child_node(&self.syntax)
    }

    pub fn signature(&self) -> Option<Expr> {
        child_node(&self.syntax)
    }

    pub fn fields(&self) -> impl Iterator<Item = RecordFieldDecl> + '_ {
        child_nodes(&self.syntax)
    }
}

ast_node!(RecordFieldDecl, RECORD_FIELD_DECL);

impl RecordFieldDecl {
    pub fn name(&self) -> Option<Name> {
        child_node(&self.syntax)
    }

    pub fn ty(&self) -> Option<Expr> {
        child_node(&self.syntax)
    }
}

// ── Ascription / postulate ───────────────────────────────────────────────

ast_node!(AscriptionDecl, ASCRIPTION_DECL);

impl AscriptionDecl {
    pub fn name(&self) -> Option<QualifiedName> {
        child_node(&self.syntax)
    }

    pub fn ty(&self) -> Option<Expr> {
        child_node(&self.syntax)
    }
}

ast_node!(PostulateDecl, POSTULATE_DECL);

impl PostulateDecl {
    pub fn name(&self) -> Option<Name> {
        child_node(&self.syntax)
    }

    pub fn ty(&self) -> Option<Expr> {
        child_node(&self.syntax)
    }
}

// ── Function clause / let ────────────────────────────────────────────────

ast_node!(FunctionClause, FUNCTION_CLAUSE);

impl FunctionClause {
    pub fn name(&self) -> Option<QualifiedName> {
        child_node(&self.syntax)
    }

    /// Left-hand-side patterns, reparsed the same as any other expression
    /// spine at this stage -- pattern-shape validation happens downstream.
    /// The last `Expr` child is the clause body, so patterns are everything
    /// before it.
    pub fn patterns(&self) -> Vec<Expr> {
        let mut exprs: Vec<Expr> = self.syntax.children().filter_map(Expr::cast).collect();
        exprs.pop();
        exprs
    }

    pub fn body(&self) -> Option<Expr> {
        self.syntax.children().filter_map(Expr::cast).last()
    }
}

ast_node!(LetDecl, LET_DECL);

impl LetDecl {
    pub fn name(&self) -> Option<Name> {
        child_node(&self.syntax)
    }

    pub fn ty(&self) -> Option<Expr> {
        self.syntax.children().filter_map(Expr::cast).next()
    }

    pub fn value(&self) -> Option<Expr> {
        self.syntax.children().filter_map(Expr::cast).last()
    }
}

// ── Bindings ─────────────────────────────────────────────────────────────

ast_node!(BindingList, BINDING_LIST);

impl BindingList {
    pub fn bindings(&self) -> impl Iterator<Item = TypedBinding> + '_ {
        child_nodes(&self.syntax)
    }
}

ast_node!(TypedBinding, TYPED_BINDING);

impl TypedBinding {
    pub fn name(&self) -> Option<Name> {
        child_node(&self.syntax)
    }

    /// Absent for an unannotated binding, e.g. a bare `x` in a lambda.
    pub fn ty(&self) -> Option<Expr> {
        child_node(&self.syntax)
    }
}
