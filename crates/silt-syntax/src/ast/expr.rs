//! Typed AST nodes for expressions.
//!
//! At this stage the grammar only distinguishes the shapes a later mixfix
//! reparse and scope check need: an application spine is flat (the
//! precedence-DAG pass is what gives it real operator structure), and binder
//! forms (`\`, `forall`, `let ... in`) carry an explicit `BindingList`.

use crate::ast::item::{BindingList, LetDecl, Name, QualifiedName};
use crate::ast::{ast_node, child_node, child_nodes, AstNode};
use crate::cst::SyntaxNode;
use crate::syntax_kind::SyntaxKind;

/// Any expression node.
#[derive(Debug, Clone)]
pub enum Expr {
    NamedBasic(NamedBasicExpr),
    Application(ApplicationExpr),
    Lambda(LambdaExpr),
    Quantified(QuantifiedExpr),
    Arrow(ArrowExpr),
    Let(LetExpr),
    Paren(ParenExpr),
    Underscore(UnderscoreExpr),
    Type(TypeExpr),
}

impl Expr {
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::NAMED_BASIC_EXPR => Some(Expr::NamedBasic(NamedBasicExpr { syntax: node })),
            SyntaxKind::APPLICATION_EXPR => Some(Expr::Application(ApplicationExpr { syntax: node })),
            SyntaxKind::LAMBDA_EXPR => Some(Expr::Lambda(LambdaExpr { syntax: node })),
            SyntaxKind::QUANTIFIED_EXPR => Some(Expr::Quantified(QuantifiedExpr { syntax: node })),
            SyntaxKind::ARROW_EXPR => Some(Expr::Arrow(ArrowExpr { syntax: node })),
            SyntaxKind::LET_EXPR => Some(Expr::Let(LetExpr { syntax: node })),
            SyntaxKind::PAREN_EXPR => Some(Expr::Paren(ParenExpr { syntax: node })),
            SyntaxKind::UNDERSCORE_EXPR => Some(Expr::Underscore(UnderscoreExpr { syntax: node })),
            SyntaxKind::TYPE_EXPR => Some(Expr::Type(TypeExpr { syntax: node })),
            _ => None,
        }
    }

    pub fn syntax(&self) -> &SyntaxNode {
        match self {
            Expr::NamedBasic(n) => n.syntax(),
            Expr::Application(n) => n.syntax(),
            Expr::Lambda(n) => n.syntax(),
            Expr::Quantified(n) => n.syntax(),
            Expr::Arrow(n) => n.syntax(),
            Expr::Let(n) => n.syntax(),
            Expr::Paren(n) => n.syntax(),
            Expr::Underscore(n) => n.syntax(),
            Expr::Type(n) => n.syntax(),
        }
    }
}

impl AstNode for Expr {
    fn cast(node: SyntaxNode) -> Option<Self> {
        Expr::cast(node)
    }

    fn syntax(&self) -> &SyntaxNode {
        Expr::syntax(self)
    }
}

// ── Atoms ────────────────────────────────────────────────────────────────

ast_node!(NamedBasicExpr, NAMED_BASIC_EXPR);

impl NamedBasicExpr {
    pub fn name(&self) -> Option<QualifiedName> {
        child_node(&self.syntax)
    }
}

ast_node!(UnderscoreExpr, UNDERSCORE_EXPR);
ast_node!(TypeExpr, TYPE_EXPR);

ast_node!(ParenExpr, PAREN_EXPR);

impl ParenExpr {
    pub fn inner(&self) -> Option<Expr> {
        self.syntax.children().find_map(Expr::cast)
    }
}

// ── Application ──────────────────────────────────────────────────────────

ast_node!(ApplicationExpr, APPLICATION_EXPR);

impl ApplicationExpr {
    /// The flat spine of sub-expressions, in source order. The mixfix
    /// reparser is what turns this into an operator tree.
    pub fn spine(&self) -> impl Iterator<Item = Expr> + '_ {
        child_nodes(&self.syntax)
    }
}

// ── Binder forms ─────────────────────────────────────────────────────────

ast_node!(LambdaExpr, LAMBDA_EXPR);

impl LambdaExpr {
    pub fn bindings(&self) -> Option<BindingList> {
        child_node(&self.syntax)
    }

    pub fn body(&self) -> Option<Expr> {
        self.syntax.children().find_map(Expr::cast)
    }
}

ast_node!(QuantifiedExpr, QUANTIFIED_EXPR);

impl QuantifiedExpr {
    pub fn bindings(&self) -> Option<BindingList> {
        child_node(&self.syntax)
    }

    pub fn body(&self) -> Option<Expr> {
        self.syntax.children().find_map(Expr::cast)
    }
}

/// A non-dependent function type, `Domain -> Codomain`. Sugar for
/// `forall (_ : Domain) -> Codomain`, but kept as its own node since no
/// binder name is ever written down.
ast_node!(ArrowExpr, ARROW_EXPR);

impl ArrowExpr {
    pub fn domain(&self) -> Option<Expr> {
        self.syntax.children().find_map(Expr::cast)
    }

    pub fn codomain(&self) -> Option<Expr> {
        self.syntax.children().filter_map(Expr::cast).nth(1)
    }
}

ast_node!(LetExpr, LET_EXPR);

impl LetExpr {
    pub fn bindings(&self) -> impl Iterator<Item = LetDecl> + '_ {
        child_nodes(&self.syntax)
    }

    pub fn body(&self) -> Option<Expr> {
        self.syntax.children().find_map(Expr::cast)
    }
}
