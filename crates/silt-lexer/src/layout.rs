//! Offside-rule layout: inserts implicit `{`, `;`, `}` tokens so a purely
//! token-driven parser can handle indentation-sensitive syntax.
//!
//! Of Silt's keywords, `where` (module bodies) and `let` (binding groups)
//! open a layout block; there is no Haskell-style `of`/`case` construct in
//! this grammar, so the layout-introducing keyword set is just these two.

use silt_common::span::SourceLocationConverter;
use silt_common::token::{Presence, Token, TokenKind, TriviaPiece};

fn opens_layout(kind: &TokenKind) -> bool {
    matches!(kind, TokenKind::Where | TokenKind::Let)
}

fn starts_new_line(tok: &Token, is_first: bool) -> bool {
    is_first || tok.leading_trivia.iter().any(|p| matches!(p, TriviaPiece::Newlines(_)))
}

fn column_of(tok: &Token, conv: &SourceLocationConverter) -> Option<u32> {
    tok.span.map(|s| conv.line_col(s.start).1)
}

/// Drop any previously-inserted implicit tokens, recovering the lexer's raw
/// output. Running [`apply_layout`] on an already-shined stream first calls
/// this, which is what makes re-running layout idempotent.
pub fn strip_implicit(tokens: &[Token]) -> Vec<Token> {
    tokens.iter().filter(|t| t.presence != Presence::Implicit).cloned().collect()
}

/// Insert implicit `{`, `;`, `}` tokens per the offside rule. Idempotent:
/// running it again on its own output reproduces the same stream, since it
/// always starts by stripping whatever implicit tokens are already present.
pub fn apply_layout(tokens: &[Token], conv: &SourceLocationConverter) -> Vec<Token> {
    let tokens = strip_implicit(tokens);
    let mut output = Vec::with_capacity(tokens.len());
    let mut stack: Vec<u32> = Vec::new();
    let mut expect_open = false;
    // Depth of user-written explicit braces; while > 0, layout's column
    // comparisons are suppressed for that region.
    let mut explicit_depth: u32 = 0;

    for (i, tok) in tokens.iter().enumerate() {
        if tok.kind == TokenKind::Eof {
            while stack.pop().is_some() {
                output.push(Token::implicit(TokenKind::RBrace));
            }
            output.push(tok.clone());
            break;
        }

        if expect_open {
            expect_open = false;
            if tok.kind == TokenKind::LBrace {
                explicit_depth += 1;
            } else if let Some(col) = column_of(tok, conv) {
                stack.push(col);
                output.push(Token::implicit(TokenKind::LBrace));
            }
        } else if tok.kind == TokenKind::LBrace {
            explicit_depth += 1;
        } else if tok.kind == TokenKind::RBrace && explicit_depth > 0 {
            explicit_depth -= 1;
        } else if explicit_depth == 0 && starts_new_line(tok, i == 0) && !stack.is_empty() {
            if let Some(col) = column_of(tok, conv) {
                loop {
                    match stack.last() {
                        Some(&b) if col == b => {
                            output.push(Token::implicit(TokenKind::Semicolon));
                            break;
                        }
                        Some(&b) if col < b => {
                            stack.pop();
                            output.push(Token::implicit(TokenKind::RBrace));
                        }
                        _ => break,
                    }
                }
            }
        }

        output.push(tok.clone());
        if opens_layout(&tok.kind) {
            expect_open = true;
        }
    }

    output
}
