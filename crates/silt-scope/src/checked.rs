//! The output data model of scope checking: a [`DeclaredModule`] tree built
//! from the raw syntax tree, with every name resolved to a [`QualifiedName`]
//! or local [`Name`] and every expression spine reparsed into an operator
//! tree by the mixfix pass.

use crate::names::{Name, QualifiedName};

#[derive(Debug, Clone)]
pub enum Head {
    Variable(Name),
    Definition(QualifiedName),
    /// An elimination spine headed by something other than a bare name --
    /// a parenthesized lambda, `let`, or `forall` applied directly to
    /// arguments. Scope checking has nothing left to resolve here; it is
    /// carried through for the downstream elaborator.
    Expr(Box<Expr>),
}

#[derive(Debug, Clone)]
pub enum Elimination {
    Apply(Box<Expr>),
}

#[derive(Debug, Clone)]
pub enum Expr {
    Apply(Head, Vec<Elimination>),
    Pi(Name, Box<Expr>, Box<Expr>),
    Function(Box<Expr>, Box<Expr>),
    Lambda(Name, Option<Box<Expr>>, Box<Expr>),
    Type,
    /// `_`: an elaboration hole, left for a downstream unifier to fill in.
    Meta,
    /// A hole left by a parse or reparse failure the checker has already
    /// diagnosed; lets traversal continue instead of aborting the module.
    Error,
    Let(Vec<DeclaredLetBinding>, Box<Expr>),
}

#[derive(Debug, Clone)]
pub struct DeclaredLetBinding {
    pub name: Name,
    pub ty: Option<Expr>,
    pub value: Expr,
}

#[derive(Debug, Clone)]
pub struct DeclaredClause {
    pub patterns: Vec<Expr>,
    pub body: Expr,
}

#[derive(Debug, Clone)]
pub struct DeclaredConstructor {
    pub name: QualifiedName,
    pub signature: Expr,
}

#[derive(Debug, Clone)]
pub struct DeclaredField {
    pub name: QualifiedName,
    pub ty: Expr,
}

#[derive(Debug, Clone)]
pub enum Decl {
    Ascription { name: QualifiedName, ty: Expr },
    Postulate { name: QualifiedName, ty: Expr },
    Function { name: QualifiedName, clauses: Vec<DeclaredClause> },
    Data { name: QualifiedName, signature: Expr, constructors: Vec<DeclaredConstructor> },
    Record { name: QualifiedName, signature: Expr, fields: Vec<DeclaredField> },
    Module(DeclaredModule),
    Import(QualifiedName),
    OpenImport(QualifiedName),
    LetBinding { name: Name, ty: Option<Expr>, value: Expr },
}

#[derive(Debug, Clone)]
pub struct DeclaredModule {
    pub module_name: QualifiedName,
    pub namespace: crate::names::NameSpace,
    pub decls: Vec<Decl>,
}
