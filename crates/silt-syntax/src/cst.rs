//! Rowan-based concrete syntax tree types for Silt.
//!
//! Defines the `SiltLanguage` marker type that connects [`SyntaxKind`] to
//! rowan's generic tree infrastructure, plus type aliases for convenience.
//! This realizes spec.md's "RawSyntax"/"Syntax view" design: rowan's
//! `Arc`-interned green tree is the immutable, structurally-shared backing
//! store, and `SyntaxNode`/`SyntaxToken` are its lazily materialized,
//! parent-threaded views (see `DESIGN.md`).

use crate::syntax_kind::SyntaxKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SiltLanguage {}

impl rowan::Language for SiltLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        // Safety: SyntaxKind is #[repr(u16)] and rowan only ever hands back
        // raw kinds we produced via kind_to_raw.
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        rowan::SyntaxKind(kind as u16)
    }
}

/// A CST node (interior node with children).
pub type SyntaxNode = rowan::SyntaxNode<SiltLanguage>;
/// A CST token (leaf node with text).
pub type SyntaxToken = rowan::SyntaxToken<SiltLanguage>;
/// Either a node or a token in the CST.
pub type SyntaxElement = rowan::SyntaxElement<SiltLanguage>;
