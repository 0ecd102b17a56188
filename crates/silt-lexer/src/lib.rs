//! Full-trivia lexer and offside-rule layout for Silt.
//!
//! [`Lexer::tokenize`] turns source text into a token stream whose
//! concatenated `leading + text + trailing` reproduces the source
//! byte-for-byte. [`layout::apply_layout`] then inserts the implicit
//! `{`/`;`/`}` tokens an indentation-sensitive grammar needs.

pub mod layout;

use silt_common::diagnostics::{Diagnostic, DiagnosticEngine, Severity};
use silt_common::span::Span;
use silt_common::token::{keyword_from_str, push_trivia, Token, TokenKind, TriviaPiece};

/// Characters that always end an identifier/operator run, regardless of
/// position. `_` is deliberately absent: it is part of ordinary identifier
/// text (mixfix holes like `if_then_else_`), and is only promoted to the
/// standalone `Underscore` token when an entire run collapses to just `_`.
const HARD_DELIMITERS: &[char] = &['(', ')', '{', '}', ';', ':', '.', '|', '=', '\\', '→', '∀'];

fn is_control_trivia_exempt(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\u{0B}' | '\u{0C}')
}

/// A byte the lexer cannot classify as trivia, punctuation, or identifier
/// text: unprintable control characters other than recognized whitespace.
fn is_unknown_byte(c: char) -> bool {
    (c.is_control() && !is_control_trivia_exempt(c)) || c == '\u{7F}'
}

/// Byte-offset source iterator plus the scanning routines built on it.
pub struct Lexer<'src> {
    source: &'src str,
    pos: u32,
    chars: std::str::Chars<'src>,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self { source, pos: 0, chars: source.chars() }
    }

    fn peek(&self) -> Option<char> {
        self.chars.clone().next()
    }

    fn peek_next(&self) -> Option<char> {
        let mut iter = self.chars.clone();
        iter.next();
        iter.next()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        self.pos += c.len_utf8() as u32;
        Some(c)
    }

    fn pos(&self) -> u32 {
        self.pos
    }

    fn is_eof(&self) -> bool {
        self.peek().is_none()
    }

    fn eat_while(&mut self, predicate: impl Fn(char) -> bool) {
        while let Some(c) = self.peek() {
            if predicate(c) {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn slice(&self, start: u32, end: u32) -> &'src str {
        &self.source[start as usize..end as usize]
    }

    /// Tokenize the entire source, ending with a single `Eof` token.
    /// Never aborts: invalid input becomes `Unknown` tokens and the lexer
    /// keeps going.
    pub fn tokenize(&mut self, diagnostics: &mut DiagnosticEngine) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let leading = self.collect_trivia(diagnostics, false);
            if self.is_eof() {
                let pos = self.pos();
                let mut eof = Token::present(TokenKind::Eof, Span::new(pos, pos));
                eof.leading_trivia = leading;
                tokens.push(eof);
                break;
            }
            let start = self.pos();
            let kind = self.scan_token();
            let end = self.pos();
            let trailing = self.collect_trivia(diagnostics, true);
            let mut tok = Token::present(kind, Span::new(start, end));
            tok.leading_trivia = leading;
            tok.trailing_trivia = trailing;
            tokens.push(tok);
        }
        tokens
    }

    /// Collect a run of trivia. When `stop_before_newline` is set (trailing
    /// trivia collection), a bare newline ends the run without being
    /// consumed; a comment that itself happens to start here is still
    /// consumed in full even if it is the last thing on the line.
    fn collect_trivia(&mut self, diagnostics: &mut DiagnosticEngine, stop_before_newline: bool) -> Vec<TriviaPiece> {
        let mut pieces = Vec::new();
        loop {
            match self.peek() {
                Some(' ') => {
                    let mut n = 0u32;
                    while self.peek() == Some(' ') {
                        self.advance();
                        n += 1;
                    }
                    push_trivia(&mut pieces, TriviaPiece::Spaces(n));
                }
                Some('\t') => {
                    let mut n = 0u32;
                    while self.peek() == Some('\t') {
                        self.advance();
                        n += 1;
                    }
                    push_trivia(&mut pieces, TriviaPiece::Tabs(n));
                }
                Some('\u{0B}') => {
                    self.advance();
                    push_trivia(&mut pieces, TriviaPiece::VerticalTabs(1));
                }
                Some('\u{0C}') => {
                    self.advance();
                    push_trivia(&mut pieces, TriviaPiece::Formfeeds(1));
                }
                Some('\r') => {
                    if stop_before_newline {
                        break;
                    }
                    let start = self.pos();
                    self.advance();
                    if self.peek() == Some('\n') {
                        self.advance();
                    }
                    let text = self.slice(start, self.pos()).to_string();
                    push_trivia(&mut pieces, TriviaPiece::Newlines(text));
                }
                Some('\n') => {
                    if stop_before_newline {
                        break;
                    }
                    self.advance();
                    push_trivia(&mut pieces, TriviaPiece::Newlines("\n".to_string()));
                }
                Some('-') if self.peek_next() == Some('-') => {
                    let start = self.pos();
                    self.advance();
                    self.advance();
                    self.eat_while(|c| c != '\n' && c != '\r');
                    let text = self.slice(start, self.pos()).to_string();
                    push_trivia(&mut pieces, TriviaPiece::LineComment(text));
                }
                Some('{') if self.peek_next() == Some('-') => {
                    let start = self.pos();
                    self.scan_block_comment(diagnostics);
                    let text = self.slice(start, self.pos()).to_string();
                    push_trivia(&mut pieces, TriviaPiece::BlockComment(text));
                }
                _ => break,
            }
        }
        pieces
    }

    /// Consume a (possibly nested) `{- ... -}` block comment. Mismatched
    /// open/close is diagnosed and recovered by running to EOF.
    fn scan_block_comment(&mut self, diagnostics: &mut DiagnosticEngine) {
        let comment_start = self.pos();
        self.advance(); // '{'
        self.advance(); // '-'
        let mut depth = 1u32;
        loop {
            match (self.peek(), self.peek_next()) {
                (Some('-'), Some('}')) => {
                    self.advance();
                    self.advance();
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                (Some('{'), Some('-')) => {
                    self.advance();
                    self.advance();
                    depth += 1;
                }
                (Some(_), _) => {
                    self.advance();
                }
                (None, _) => {
                    diagnostics.diagnose(
                        Diagnostic::new("E0101", Severity::Error, "unterminated block comment")
                            .at(Span::new(comment_start, self.pos())),
                    );
                    break;
                }
            }
        }
    }

    fn scan_token(&mut self) -> TokenKind {
        let c = self.peek().expect("scan_token called at EOF");

        if is_unknown_byte(c) {
            self.advance();
            return TokenKind::Unknown(c);
        }

        match c {
            '(' => { self.advance(); TokenKind::LParen }
            ')' => { self.advance(); TokenKind::RParen }
            '{' => { self.advance(); TokenKind::LBrace }
            '}' => { self.advance(); TokenKind::RBrace }
            ';' => { self.advance(); TokenKind::Semicolon }
            ':' => { self.advance(); TokenKind::Colon }
            '.' => { self.advance(); TokenKind::Dot }
            '|' => { self.advance(); TokenKind::Pipe }
            '=' => { self.advance(); TokenKind::Eq }
            '\\' => { self.advance(); TokenKind::Backslash }
            '→' => { self.advance(); TokenKind::Arrow }
            '∀' => { self.advance(); TokenKind::Forall }
            '-' if self.peek_next() == Some('>') => {
                self.advance();
                self.advance();
                TokenKind::Arrow
            }
            _ => self.scan_identifier_like(),
        }
    }

    /// Scan a maximal run of identifier/operator text: anything that is not
    /// whitespace, not a hard delimiter, not the start of a comment, and not
    /// the two-character `->` sequence (which is its own token).
    fn scan_identifier_like(&mut self) -> TokenKind {
        let start = self.pos();
        loop {
            let Some(c) = self.peek() else { break };
            if c.is_whitespace() || HARD_DELIMITERS.contains(&c) || is_unknown_byte(c) {
                break;
            }
            if c == '-' {
                match self.peek_next() {
                    Some('>') | Some('-') => break,
                    _ => {}
                }
            }
            self.advance();
        }
        let text = self.slice(start, self.pos());
        if text == "_" {
            TokenKind::Underscore
        } else if let Some(kw) = keyword_from_str(text) {
            kw
        } else {
            TokenKind::Identifier(text.to_string())
        }
    }
}

/// Lex `source` in full, collecting diagnostics on `diagnostics`.
pub fn lex(source: &str, diagnostics: &mut DiagnosticEngine) -> Vec<Token> {
    Lexer::new(source).tokenize(diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use silt_common::token::Presence;

    fn lex_ok(src: &str) -> Vec<Token> {
        let mut diags = DiagnosticEngine::new();
        let toks = lex(src, &mut diags);
        assert!(!diags.has_errors(), "unexpected diagnostics for {src:?}");
        toks
    }

    fn kinds(toks: &[Token]) -> Vec<TokenKind> {
        toks.iter().map(|t| t.kind.clone()).collect()
    }

    #[test]
    fn lexes_punctuation_and_arrow_spellings() {
        let toks = lex_ok("( ) { } ; : . | _ = \\ -> →");
        let ks = kinds(&toks);
        assert_eq!(
            ks,
            vec![
                TokenKind::LParen,
                TokenKind::RParen,
                TokenKind::LBrace,
                TokenKind::RBrace,
                TokenKind::Semicolon,
                TokenKind::Colon,
                TokenKind::Dot,
                TokenKind::Pipe,
                TokenKind::Underscore,
                TokenKind::Eq,
                TokenKind::Backslash,
                TokenKind::Arrow,
                TokenKind::Arrow,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn forall_keyword_and_glyph_are_the_same_token() {
        let a = lex_ok("forall");
        let b = lex_ok("∀");
        assert_eq!(a[0].kind, TokenKind::Forall);
        assert_eq!(b[0].kind, TokenKind::Forall);
    }

    #[test]
    fn mixfix_identifier_keeps_its_underscores() {
        let toks = lex_ok("if_then_else_");
        assert_eq!(toks[0].kind, TokenKind::Identifier("if_then_else_".into()));
    }

    #[test]
    fn lex_round_trip_reproduces_source_from_present_tokens() {
        let src = "module M where\n  x : Type\n  x = Type\n";
        let toks = lex_ok(src);
        let mut rebuilt = String::new();
        for tok in &toks {
            if tok.presence != Presence::Present {
                continue;
            }
            for piece in &tok.leading_trivia {
                rebuilt.push_str(&trivia_text(piece));
            }
            if let Some(text) = tok.kind.fixed_text() {
                rebuilt.push_str(text);
            } else if let TokenKind::Identifier(s) = &tok.kind {
                rebuilt.push_str(s);
            }
            for piece in &tok.trailing_trivia {
                rebuilt.push_str(&trivia_text(piece));
            }
        }
        assert_eq!(rebuilt, src);
    }

    fn trivia_text(piece: &TriviaPiece) -> String {
        match piece {
            TriviaPiece::Spaces(n) => " ".repeat(*n as usize),
            TriviaPiece::Tabs(n) => "\t".repeat(*n as usize),
            TriviaPiece::Newlines(s) => s.clone(),
            TriviaPiece::VerticalTabs(n) => "\u{0B}".repeat(*n as usize),
            TriviaPiece::Formfeeds(n) => "\u{0C}".repeat(*n as usize),
            TriviaPiece::LineComment(s) | TriviaPiece::BlockComment(s) => s.clone(),
        }
    }

    #[test]
    fn lex_round_trip_preserves_crlf_line_endings() {
        let src = "module M where\r\n  x : Type\r\n  x = Type\r\n";
        let toks = lex_ok(src);
        let mut rebuilt = String::new();
        for tok in &toks {
            if tok.presence != Presence::Present {
                continue;
            }
            for piece in &tok.leading_trivia {
                rebuilt.push_str(&trivia_text(piece));
            }
            if let Some(text) = tok.kind.fixed_text() {
                rebuilt.push_str(text);
            } else if let TokenKind::Identifier(s) = &tok.kind {
                rebuilt.push_str(s);
            }
            for piece in &tok.trailing_trivia {
                rebuilt.push_str(&trivia_text(piece));
            }
        }
        assert_eq!(rebuilt, src);
    }

    #[test]
    fn unterminated_block_comment_is_diagnosed_and_recovers_at_eof() {
        let mut diags = DiagnosticEngine::new();
        let toks = lex("{- never closed", &mut diags);
        assert!(diags.has_errors());
        assert_eq!(toks.last().unwrap().kind, TokenKind::Eof);
    }

    #[test]
    fn nested_block_comments_balance() {
        let toks = lex_ok("{- outer {- inner -} still outer -} x");
        assert_eq!(toks[0].kind, TokenKind::Identifier("x".into()));
    }

    #[test]
    fn invalid_control_byte_becomes_unknown_token_and_lexer_continues() {
        let mut diags = DiagnosticEngine::new();
        let toks = lex("a \u{1}b", &mut diags);
        let ks = kinds(&toks);
        assert_eq!(
            ks,
            vec![
                TokenKind::Identifier("a".into()),
                TokenKind::Unknown('\u{1}'),
                TokenKind::Identifier("b".into()),
                TokenKind::Eof,
            ]
        );
    }
}
