//! Silt's syntax crate: the immutable rowan-backed CST, its typed AST
//! wrappers, and the grammar-level parser that feeds the scope checker.
//!
//! The parser here is the external-collaborator stand-in: it recognizes
//! enough of Silt's surface grammar (modules, data/record types, fixity
//! declarations, function clauses, binder forms) to hand a `RawSyntax`-style
//! tree to `silt-scope`, but never resolves operator precedence -- every
//! juxtaposition of atoms comes out as a flat `APPLICATION_EXPR` spine for
//! `silt-mixfix` to reparse once fixities are known.

pub mod ast;
pub mod cst;
pub mod error;
mod parser;
pub mod syntax_kind;

pub use cst::{SyntaxElement, SyntaxNode, SyntaxToken};
pub use error::ParseError;
pub use syntax_kind::SyntaxKind;

use silt_common::diagnostics::DiagnosticEngine;
use silt_common::span::SourceLocationConverter;

/// Result of parsing a Silt source file: the green tree plus any parse
/// errors. The parser never panics and never aborts early -- on malformed
/// input it records an error, wraps the offending token(s) in an
/// `ERROR_NODE`, and keeps going, so `syntax()` always returns a tree.
pub struct Parse {
    green: rowan::GreenNode,
    errors: Vec<ParseError>,
}

impl Parse {
    pub fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green.clone())
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Parse a Silt source file into a CST.
///
/// Lexes the source, applies offside-rule layout, then runs the grammar
/// parser over the shined token stream.
pub fn parse(source: &str) -> Parse {
    let mut diagnostics = DiagnosticEngine::new();
    let tokens = silt_lexer::lex(source, &mut diagnostics);
    let conv = SourceLocationConverter::new(source);
    let shined = silt_lexer::layout::apply_layout(&tokens, &conv);

    let mut p = parser::Parser::new(shined);
    parser::parse_source_file(&mut p);
    let (green, errors) = p.build_tree();

    Parse { green, errors }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::item::SourceFile;
    use crate::ast::AstNode;

    #[test]
    fn parses_module_with_ascription_and_clause() {
        let src = "module M where\n  x : Type\n  x = Type\n";
        let parsed = parse(src);
        assert!(parsed.ok(), "unexpected errors: {:?}", parsed.errors());
        let root = SourceFile::cast(parsed.syntax()).expect("source file root");
        let decls: Vec<_> = root.decls().collect();
        assert_eq!(decls.len(), 1);
    }

    #[test]
    fn malformed_input_never_panics_and_records_errors() {
        let src = "data : where\n";
        let parsed = parse(src);
        assert!(!parsed.ok());
        // The tree is still produced even though the input is broken.
        let _ = parsed.syntax();
    }
}
