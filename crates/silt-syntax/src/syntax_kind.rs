//! `SyntaxKind` for the Silt CST.
//!
//! Token kinds (leaves) map 1:1 from [`TokenKind`], plus three trivia kinds
//! (whitespace/line-comment/block-comment, each emitted as its own green
//! token so the tree stays byte-exact) and the composite node kinds the
//! parser produces. `TOMBSTONE`/`ERROR_NODE` are sentinels the event-based
//! parser machinery needs.

use silt_common::token::TokenKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    TOMBSTONE = 0,
    ERROR_NODE = 1,

    // ── Punctuation tokens ───────────────────────────────────────────────
    L_PAREN,
    R_PAREN,
    L_BRACE,
    R_BRACE,
    SEMICOLON,
    COLON,
    DOT,
    PIPE,
    UNDERSCORE,
    EQ,
    BACKSLASH,
    ARROW,

    // ── Keyword tokens ───────────────────────────────────────────────────
    MODULE_KW,
    OPEN_KW,
    IMPORT_KW,
    WHERE_KW,
    WITH_KW,
    LET_KW,
    IN_KW,
    DATA_KW,
    RECORD_KW,
    FIELD_KW,
    CONSTRUCTOR_KW,
    FORALL_KW,
    INFIX_KW,
    INFIXL_KW,
    INFIXR_KW,
    POSTULATE_KW,
    TYPE_KW,

    IDENT,
    UNKNOWN,
    EOF,

    // ── Trivia tokens ────────────────────────────────────────────────────
    WHITESPACE,
    LINE_COMMENT,
    BLOCK_COMMENT,

    // ── Composite nodes ──────────────────────────────────────────────────
    SOURCE_FILE,
    MODULE_DECL,
    IMPORT_DECL,
    OPEN_DECL,
    FIXITY_DECL,
    ASCRIPTION_DECL,
    POSTULATE_DECL,
    DATA_DECL,
    CONSTRUCTOR_DECL,
    RECORD_DECL,
    RECORD_FIELD_DECL,
    FUNCTION_CLAUSE,
    LET_DECL,
    NAME,
    QUALIFIED_NAME,
    TYPED_BINDING,
    BINDING_LIST,
    NAMED_BASIC_EXPR,
    APPLICATION_EXPR,
    LAMBDA_EXPR,
    QUANTIFIED_EXPR,
    ARROW_EXPR,
    LET_EXPR,
    PAREN_EXPR,
    UNDERSCORE_EXPR,
    TYPE_EXPR,
}

impl SyntaxKind {
    pub fn is_trivia(self) -> bool {
        matches!(self, SyntaxKind::WHITESPACE | SyntaxKind::LINE_COMMENT | SyntaxKind::BLOCK_COMMENT)
    }
}

impl From<&TokenKind> for SyntaxKind {
    fn from(kind: &TokenKind) -> Self {
        use SyntaxKind::*;
        match kind {
            TokenKind::LParen => L_PAREN,
            TokenKind::RParen => R_PAREN,
            TokenKind::LBrace => L_BRACE,
            TokenKind::RBrace => R_BRACE,
            TokenKind::Semicolon => SEMICOLON,
            TokenKind::Colon => COLON,
            TokenKind::Dot => DOT,
            TokenKind::Pipe => PIPE,
            TokenKind::Underscore => UNDERSCORE,
            TokenKind::Eq => EQ,
            TokenKind::Backslash => BACKSLASH,
            TokenKind::Arrow => ARROW,
            TokenKind::Module => MODULE_KW,
            TokenKind::Open => OPEN_KW,
            TokenKind::Import => IMPORT_KW,
            TokenKind::Where => WHERE_KW,
            TokenKind::With => WITH_KW,
            TokenKind::Let => LET_KW,
            TokenKind::In => IN_KW,
            TokenKind::Data => DATA_KW,
            TokenKind::Record => RECORD_KW,
            TokenKind::Field => FIELD_KW,
            TokenKind::Constructor => CONSTRUCTOR_KW,
            TokenKind::Forall => FORALL_KW,
            TokenKind::Infix => INFIX_KW,
            TokenKind::Infixl => INFIXL_KW,
            TokenKind::Infixr => INFIXR_KW,
            TokenKind::Postulate => POSTULATE_KW,
            TokenKind::Type => TYPE_KW,
            TokenKind::Identifier(_) => IDENT,
            TokenKind::Unknown(_) => UNKNOWN,
            TokenKind::Eof => EOF,
        }
    }
}
