//! Silt scope checker: name binding, fixity tracking, and mixfix reparsing
//! over a parsed source file.
//!
//! Walks the typed AST `silt-syntax` produces, resolves every identifier to
//! a variable or a [`names::QualifiedName`], and rewrites every application
//! spine that mentions a declared notation into an operator tree via
//! `silt-mixfix`. The result is a [`checked::DeclaredModule`] -- a
//! fully-named tree ready for a downstream elaborator, which this crate does
//! not implement.
//!
//! # Architecture
//!
//! - [`names`]: `QualifiedName`, `NameInfo`, `NameSpace` -- what a bound name
//!   refers to and where it lives.
//! - [`fixity`]: the per-scope fixity table and its bridge to a
//!   `silt-mixfix` precedence DAG.
//! - [`env`]: the `Scope`/`ScopeStack` push-pop discipline binder forms and
//!   nested modules open and close.
//! - [`checked`]: the output data model (`DeclaredModule`, `Expr`, `Decl`).
//! - [`checker`]: the two-pass traversal that produces it.
//! - [`diagnostics`]: the error-code builder functions for every condition
//!   in the checker's taxonomy.
//! - [`module_path`]: validates a declared module name against the file it
//!   was read from.

pub mod checked;
pub mod checker;
pub mod diagnostics;
pub mod env;
pub mod fixity;
pub mod module_path;
pub mod names;

pub use checked::DeclaredModule;
pub use checker::{check, check_with_imports, ImportResolver, NullImportResolver};
pub use names::{LocalNames, Name, NameInfo, NameSpace, QualifiedName};
