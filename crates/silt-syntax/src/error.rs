//! Parse error types for the Silt grammar parser.

use std::fmt;

use silt_common::span::Span;

/// A parse error with location information and optional related span.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
    pub span: Span,
    /// Optional related location with context message (e.g. "block opened here").
    pub related: Option<(String, Span)>,
}

impl ParseError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self { message: message.into(), span, related: None }
    }

    pub fn with_related(
        message: impl Into<String>,
        span: Span,
        related_message: impl Into<String>,
        related_span: Span,
    ) -> Self {
        Self { message: message.into(), span, related: Some((related_message.into(), related_span)) }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_new() {
        let err = ParseError::new("expected expression", Span::new(5, 10));
        assert_eq!(err.message, "expected expression");
        assert!(err.related.is_none());
    }

    #[test]
    fn parse_error_with_related() {
        let err = ParseError::with_related(
            "expected `}` to close module body",
            Span::new(50, 53),
            "block opened here",
            Span::new(10, 12),
        );
        let (msg, span) = err.related.unwrap();
        assert_eq!(msg, "block opened here");
        assert_eq!(span, Span::new(10, 12));
    }
}
