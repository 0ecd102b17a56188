use serde::Serialize;

use crate::span::Span;

/// The closed set of token kinds in Silt source text.
///
/// `Arrow` covers both ASCII `->` and Unicode `→`; `Forall` covers both the
/// `forall` keyword spelling and the `∀` glyph — the lexer folds both
/// spellings into the same variant so nothing downstream needs to know which
/// one was written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TokenKind {
    // ── Punctuation ────────────────────────────────────────────────────
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `;`
    Semicolon,
    /// `:`
    Colon,
    /// `.`
    Dot,
    /// `|`
    Pipe,
    /// `_`
    Underscore,
    /// `=`
    Eq,
    /// `\`
    Backslash,
    /// `->` or `→`
    Arrow,

    // ── Keywords ───────────────────────────────────────────────────────
    Module,
    Open,
    Import,
    Where,
    With,
    Let,
    In,
    Data,
    Record,
    Field,
    Constructor,
    /// `forall` or `∀`
    Forall,
    Infix,
    Infixl,
    Infixr,
    Postulate,
    Type,

    /// Any maximal non-whitespace run not starting with reserved punctuation.
    /// May contain `_` marking mixfix holes; non-ASCII is permitted.
    Identifier(String),
    /// A single byte/character the lexer could not otherwise classify.
    /// The lexer never aborts on these; it emits one and moves on.
    Unknown(char),
    Eof,
}

impl TokenKind {
    /// Text to render this kind back out, for tokens whose text is fixed
    /// (everything except `Identifier` and `Unknown`, which carry their own).
    pub fn fixed_text(&self) -> Option<&'static str> {
        use TokenKind::*;
        Some(match self {
            LParen => "(",
            RParen => ")",
            LBrace => "{",
            RBrace => "}",
            Semicolon => ";",
            Colon => ":",
            Dot => ".",
            Pipe => "|",
            Underscore => "_",
            Eq => "=",
            Backslash => "\\",
            Arrow => "->",
            Module => "module",
            Open => "open",
            Import => "import",
            Where => "where",
            With => "with",
            Let => "let",
            In => "in",
            Data => "data",
            Record => "record",
            Field => "field",
            Constructor => "constructor",
            Forall => "forall",
            Infix => "infix",
            Infixl => "infixl",
            Infixr => "infixr",
            Postulate => "postulate",
            Type => "Type",
            Eof => "",
            Identifier(_) | Unknown(_) => return None,
        })
    }
}

/// Look up a keyword from its scanned identifier text.
///
/// Called by the lexer after it has already scanned a generic identifier-
/// shaped run; if the text matches a keyword exactly, the lexer re-tags the
/// token instead of emitting `Identifier`.
pub fn keyword_from_str(s: &str) -> Option<TokenKind> {
    use TokenKind::*;
    Some(match s {
        "module" => Module,
        "open" => Open,
        "import" => Import,
        "where" => Where,
        "with" => With,
        "let" => Let,
        "in" => In,
        "data" => Data,
        "record" => Record,
        "field" => Field,
        "constructor" => Constructor,
        "forall" => Forall,
        "infix" => Infix,
        "infixl" => Infixl,
        "infixr" => Infixr,
        "postulate" => Postulate,
        "Type" => Type,
        _ => return None,
    })
}

/// A single piece of trivia: whitespace runs or comments.
///
/// Pieces of the same base kind combine additively — e.g. three consecutive
/// space characters produce one `Spaces(3)`, never three `Spaces(1)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TriviaPiece {
    Spaces(u32),
    Tabs(u32),
    /// The literal newline bytes consumed (`"\n"`, `"\r\n"`, or `"\r"` per
    /// line break, concatenated across a run). Stored verbatim rather than
    /// as a count so that a `\r\n`-terminated source round-trips byte-for-
    /// byte instead of collapsing to `\n`.
    Newlines(String),
    VerticalTabs(u32),
    Formfeeds(u32),
    LineComment(String),
    BlockComment(String),
}

impl TriviaPiece {
    /// Reconstruct this piece's canonical text.
    pub fn to_text(&self) -> String {
        use TriviaPiece::*;
        match self {
            Spaces(n) => " ".repeat(*n as usize),
            Tabs(n) => "\t".repeat(*n as usize),
            Newlines(s) => s.clone(),
            VerticalTabs(n) => "\u{0B}".repeat(*n as usize),
            Formfeeds(n) => "\u{0C}".repeat(*n as usize),
            LineComment(s) | BlockComment(s) => s.clone(),
        }
    }

    /// Try to merge `other` into `self` if they are the same additive kind.
    /// Comments never merge with anything, including themselves.
    pub fn try_combine(&mut self, other: &TriviaPiece) -> bool {
        use TriviaPiece::*;
        match (self, other) {
            (Spaces(a), Spaces(b)) => { *a += b; true }
            (Tabs(a), Tabs(b)) => { *a += b; true }
            (Newlines(a), Newlines(b)) => { a.push_str(b); true }
            (VerticalTabs(a), VerticalTabs(b)) => { *a += b; true }
            (Formfeeds(a), Formfeeds(b)) => { *a += b; true }
            _ => false,
        }
    }
}

/// Appends `piece` onto `pieces`, combining it into the last entry when the
/// kinds match additively.
pub fn push_trivia(pieces: &mut Vec<TriviaPiece>, piece: TriviaPiece) {
    if let Some(last) = pieces.last_mut() {
        if last.try_combine(&piece) {
            return;
        }
    }
    pieces.push(piece);
}

/// Whether a token was actually present in the source, inserted by layout, or
/// synthesized during error recovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Presence {
    Present,
    Implicit,
    Missing,
}

/// A token with full trivia fidelity.
///
/// Concatenating `leading + text + trailing` over every `present` token
/// reproduces the original source byte-for-byte (the lex round-trip
/// invariant); including `implicit` tokens in that concatenation produces the
/// "shined" form with layout braces made visible.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub leading_trivia: Vec<TriviaPiece>,
    pub trailing_trivia: Vec<TriviaPiece>,
    /// `None` for `implicit`/`missing` tokens, which have no source range.
    pub span: Option<Span>,
    pub presence: Presence,
}

impl Token {
    pub fn present(kind: TokenKind, span: Span) -> Self {
        Self {
            kind,
            leading_trivia: Vec::new(),
            trailing_trivia: Vec::new(),
            span: Some(span),
            presence: Presence::Present,
        }
    }

    pub fn implicit(kind: TokenKind) -> Self {
        Self {
            kind,
            leading_trivia: Vec::new(),
            trailing_trivia: Vec::new(),
            span: None,
            presence: Presence::Implicit,
        }
    }

    pub fn missing(kind: TokenKind) -> Self {
        Self {
            kind,
            leading_trivia: Vec::new(),
            trailing_trivia: Vec::new(),
            span: None,
            presence: Presence::Missing,
        }
    }

    pub fn is_trivia_free(&self) -> bool {
        self.leading_trivia.is_empty() && self.trailing_trivia.is_empty()
    }

    /// This token's own text, excluding trivia: empty for `implicit`/
    /// `missing` tokens (they have no source range), otherwise the fixed
    /// spelling or the carried `Identifier`/`Unknown` text.
    pub fn core_text(&self) -> String {
        if self.presence != Presence::Present {
            return String::new();
        }
        match &self.kind {
            TokenKind::Identifier(s) => s.clone(),
            TokenKind::Unknown(c) => c.to_string(),
            other => other.fixed_text().unwrap_or("").to_string(),
        }
    }
}
