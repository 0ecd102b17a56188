//! Types shared across the Silt front end: the trivia-preserving token model,
//! source spans/line-column conversion, the diagnostic engine, and a small
//! error type for unrecoverable conditions.

pub mod diagnostics;
pub mod error;
pub mod name;
pub mod span;
pub mod token;

pub use diagnostics::{Diagnostic, DiagnosticEngine, Note, Severity};
pub use error::SiltError;
pub use name::Name;
pub use span::{LineIndex, SourceLocationConverter, Span};
pub use token::{keyword_from_str, Presence, Token, TokenKind, TriviaPiece};
