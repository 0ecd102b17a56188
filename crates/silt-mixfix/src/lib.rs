//! Precedence-DAG-driven mixfix reparsing.
//!
//! Given the set of notations visible in a scope and a linearized token
//! spine, [`reparse::reparse`] rewrites application chains like
//! `if b then n else n` into an explicit operator tree headed by the
//! notation's canonical name. The scope checker is the only consumer: it
//! builds a [`dag::PrecedenceDag`] per scope from the fixities currently
//! bound, then calls `reparse` once per expression spine that contains more
//! than one token.

pub mod dag;
pub mod reparse;

pub use dag::{Assoc, Fixity, NewNotation, NotationSection, PrecedenceDag, PrecedenceLevel};
pub use reparse::{closed_words, reparse, MixToken, MixTree, ReparseOutcome};
