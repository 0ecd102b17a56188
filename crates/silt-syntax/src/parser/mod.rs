//! Event-based parser for Silt.
//!
//! The parser consumes the already-layout-shined token stream and produces
//! events (Open/Close/Advance) that [`Parser::build_tree`] later converts
//! into a rowan green tree. This decouples parsing logic from tree
//! construction and is matklad's event-based approach (as in rust-analyzer).
//!
//! Unlike a parser over a raw token stream, trivia here is never a separate
//! token to skip over: each [`Token`] already carries its own leading and
//! trailing trivia, so `current()`/`nth()` always see the next significant
//! token directly. `advance()` re-emits that trivia as its own green leaf
//! tokens on both sides of the significant one, so the tree stays lossless.
//!
//! `open_before()` implements the "forward parent" technique: wrapping a
//! previously completed node (e.g. turning a bare atom into the first
//! element of an application spine) without physically shifting events.

pub(crate) mod expressions;
pub(crate) mod items;

use silt_common::span::Span;
use silt_common::token::{Presence, Token, TokenKind};

use crate::error::ParseError;
use crate::syntax_kind::SyntaxKind;

#[derive(Debug)]
enum Event {
    Open { kind: SyntaxKind, forward_parent: Option<usize> },
    Close,
    Advance,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct MarkOpened {
    index: usize,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct MarkClosed {
    index: usize,
}

pub(crate) struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    events: Vec<Event>,
    errors: Vec<ParseError>,
    has_error: bool,
}

impl Parser {
    pub(crate) fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0, events: Vec::new(), errors: Vec::new(), has_error: false }
    }

    // ── Lookahead ────────────────────────────────────────────────────────

    pub(crate) fn current(&self) -> SyntaxKind {
        self.nth(0)
    }

    pub(crate) fn nth(&self, n: usize) -> SyntaxKind {
        match self.tokens.get(self.pos + n) {
            Some(tok) => SyntaxKind::from(&tok.kind),
            None => SyntaxKind::EOF,
        }
    }

    pub(crate) fn current_span(&self) -> Span {
        match self.tokens.get(self.pos).and_then(|t| t.span) {
            Some(span) => span,
            None => {
                let end = self.tokens.last().and_then(|t| t.span).map(|s| s.end).unwrap_or(0);
                Span::empty_at(end)
            }
        }
    }

    pub(crate) fn at(&self, kind: SyntaxKind) -> bool {
        self.current() == kind
    }

    pub(crate) fn at_any(&self, kinds: &[SyntaxKind]) -> bool {
        kinds.contains(&self.current())
    }

    // ── Node management ──────────────────────────────────────────────────

    pub(crate) fn open(&mut self) -> MarkOpened {
        let mark = MarkOpened { index: self.events.len() };
        self.events.push(Event::Open { kind: SyntaxKind::TOMBSTONE, forward_parent: None });
        mark
    }

    /// Open a new node wrapping a previously completed one, via the
    /// forward-parent technique (no physical insertion into `events`).
    pub(crate) fn open_before(&mut self, completed: MarkClosed) -> MarkOpened {
        let mark = MarkOpened { index: self.events.len() };
        self.events.push(Event::Open { kind: SyntaxKind::TOMBSTONE, forward_parent: None });
        if let Event::Open { forward_parent, .. } = &mut self.events[completed.index] {
            *forward_parent = Some(mark.index);
        }
        mark
    }

    pub(crate) fn close(&mut self, m: MarkOpened, kind: SyntaxKind) -> MarkClosed {
        if let Event::Open { kind: slot, .. } = &mut self.events[m.index] {
            *slot = kind;
        }
        self.events.push(Event::Close);
        MarkClosed { index: m.index }
    }

    // ── Token consumption ────────────────────────────────────────────────

    pub(crate) fn advance(&mut self) {
        if self.pos < self.tokens.len() {
            self.events.push(Event::Advance);
            self.pos += 1;
        }
    }

    /// Consume the current token wrapped in an ERROR_NODE.
    pub(crate) fn advance_with_error(&mut self, message: &str) -> MarkClosed {
        let m = self.open();
        self.error(message);
        self.advance();
        self.close(m, SyntaxKind::ERROR_NODE)
    }

    pub(crate) fn expect(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            self.error(&format!("expected {:?}, found {:?}", kind, self.current()));
            false
        }
    }

    pub(crate) fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    // ── Error reporting ──────────────────────────────────────────────────

    pub(crate) fn error(&mut self, message: &str) {
        let span = self.current_span();
        self.errors.push(ParseError::new(message, span));
        self.has_error = true;
    }

    pub(crate) fn has_error(&self) -> bool {
        self.has_error
    }

    pub(crate) fn clear_error(&mut self) {
        self.has_error = false;
    }

    /// Advance past tokens until `kind` (or a declaration boundary, or EOF)
    /// so one malformed declaration doesn't swallow the rest of the file.
    pub(crate) fn recover_until(&mut self, kind: SyntaxKind) {
        let m = self.open();
        while !self.at(kind) && !self.at(SyntaxKind::EOF) && !self.at_any(DECL_STARTERS) {
            self.advance();
        }
        self.close(m, SyntaxKind::ERROR_NODE);
    }

    // ── Tree building ────────────────────────────────────────────────────

    pub(crate) fn build_tree(mut self) -> (rowan::GreenNode, Vec<ParseError>) {
        let mut builder = rowan::GreenNodeBuilder::new();
        let mut token_pos = 0usize;
        let mut forward_parents: Vec<(usize, SyntaxKind)> = Vec::new();

        let mut i = 0;
        while i < self.events.len() {
            match self.events[i] {
                Event::Open { kind, forward_parent } => {
                    if forward_parent.is_some() {
                        forward_parents.clear();
                        let mut current = i;
                        loop {
                            let (fk, fp) = match self.events[current] {
                                Event::Open { kind, forward_parent } => (kind, forward_parent),
                                _ => unreachable!(),
                            };
                            forward_parents.push((current, fk));
                            match fp {
                                Some(next) => current = next,
                                None => break,
                            }
                        }
                        for &(fp_idx, _) in forward_parents.iter().skip(1) {
                            if let Event::Open { kind, forward_parent } = &mut self.events[fp_idx] {
                                *kind = SyntaxKind::TOMBSTONE;
                                *forward_parent = None;
                            }
                        }
                        if let Event::Open { forward_parent, .. } = &mut self.events[i] {
                            *forward_parent = None;
                        }
                        for &(_, fk) in forward_parents.iter().rev() {
                            if fk != SyntaxKind::TOMBSTONE {
                                builder.start_node(rowan::SyntaxKind(fk as u16));
                            }
                        }
                    } else if kind != SyntaxKind::TOMBSTONE {
                        builder.start_node(rowan::SyntaxKind(kind as u16));
                    }
                }
                Event::Close => builder.finish_node(),
                Event::Advance => {
                    if token_pos < self.tokens.len() {
                        push_token(&mut builder, &self.tokens[token_pos]);
                        token_pos += 1;
                    }
                }
            }
            i += 1;
        }

        (builder.finish(), self.errors)
    }
}

/// Declaration-starting kinds used as synchronization points during error
/// recovery: if parsing a decl fails partway through, skipping ahead to the
/// next one of these avoids losing the rest of the file to one bad decl.
const DECL_STARTERS: &[SyntaxKind] = &[
    SyntaxKind::MODULE_KW,
    SyntaxKind::IMPORT_KW,
    SyntaxKind::OPEN_KW,
    SyntaxKind::INFIX_KW,
    SyntaxKind::INFIXL_KW,
    SyntaxKind::INFIXR_KW,
    SyntaxKind::DATA_KW,
    SyntaxKind::RECORD_KW,
    SyntaxKind::POSTULATE_KW,
    SyntaxKind::LET_KW,
];

fn push_token(builder: &mut rowan::GreenNodeBuilder, token: &Token) {
    for piece in &token.leading_trivia {
        builder.token(rowan::SyntaxKind(trivia_kind(piece) as u16), &piece.to_text());
    }
    let kind = SyntaxKind::from(&token.kind);
    builder.token(rowan::SyntaxKind(kind as u16), &token.core_text());
    for piece in &token.trailing_trivia {
        builder.token(rowan::SyntaxKind(trivia_kind(piece) as u16), &piece.to_text());
    }
}

fn trivia_kind(piece: &silt_common::token::TriviaPiece) -> SyntaxKind {
    use silt_common::token::TriviaPiece::*;
    match piece {
        LineComment(_) => SyntaxKind::LINE_COMMENT,
        BlockComment(_) => SyntaxKind::BLOCK_COMMENT,
        Spaces(_) | Tabs(_) | Newlines(_) | VerticalTabs(_) | Formfeeds(_) => SyntaxKind::WHITESPACE,
    }
}

// ── Top-level parsing ────────────────────────────────────────────────────

/// Parse a complete source file: `Decl*` until EOF.
pub(crate) fn parse_source_file(p: &mut Parser) {
    let root = p.open();

    while !p.at(SyntaxKind::EOF) {
        while p.eat(SyntaxKind::SEMICOLON) {}
        if p.at(SyntaxKind::EOF) {
            break;
        }

        items::parse_decl(p);

        if p.has_error() {
            p.clear_error();
            p.recover_until(SyntaxKind::SEMICOLON);
        }
    }

    p.advance(); // EOF
    p.close(root, SyntaxKind::SOURCE_FILE);
}

#[cfg(test)]
mod tests {
    use super::*;
    use silt_common::diagnostics::DiagnosticEngine;
    use silt_common::span::SourceLocationConverter;

    fn parse(src: &str) -> (rowan::GreenNode, Vec<ParseError>) {
        let mut diags = DiagnosticEngine::new();
        let tokens = silt_lexer::lex(src, &mut diags);
        let conv = SourceLocationConverter::new(src);
        let shined = silt_lexer::layout::apply_layout(&tokens, &conv);
        let mut parser = Parser::new(shined);
        parse_source_file(&mut parser);
        parser.build_tree()
    }

    #[test]
    fn empty_source_parses_to_bare_source_file() {
        let (green, errors) = parse("");
        assert!(errors.is_empty());
        let root = crate::cst::SyntaxNode::new_root(green);
        assert_eq!(root.kind(), SyntaxKind::SOURCE_FILE);
    }

    #[test]
    fn tree_text_round_trips_source_including_trivia() {
        let src = "module M where\n  x : Type\n  x = Type\n";
        let (green, _) = parse(src);
        let root = crate::cst::SyntaxNode::new_root(green);
        // Implicit layout tokens contribute no text, so the tree's text
        // reproduces the original source exactly.
        assert_eq!(root.text().to_string(), src);
    }
}
