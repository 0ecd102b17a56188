use serde::Serialize;

/// Byte-offset span into source text. Start is inclusive, end is exclusive.
///
/// Every position tracked by the front end is a byte offset into the original
/// source string; line/column information is computed on demand via
/// [`LineIndex`] only when a diagnostic needs to be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    pub fn new(start: u32, end: u32) -> Self {
        debug_assert!(start <= end, "span start ({start}) must be <= end ({end})");
        Self { start, end }
    }

    /// A zero-length span at `offset`, used for implicit/missing tokens that
    /// have no source range of their own but still need an anchor point.
    pub fn empty_at(offset: u32) -> Self {
        Self { start: offset, end: offset }
    }

    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

/// Pre-computed index of line start positions for on-demand line/column lookup.
///
/// `\r\n` is treated as a single newline: the line start recorded is the byte
/// immediately after the `\n`, so a bare offset landing on the `\r` still
/// resolves to the preceding line.
#[derive(Debug)]
pub struct LineIndex {
    line_starts: Vec<u32>,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0u32];
        let bytes = source.as_bytes();
        let mut i = 0usize;
        while i < bytes.len() {
            if bytes[i] == b'\n' {
                line_starts.push((i + 1) as u32);
            } else if bytes[i] == b'\r' {
                // `\r\n` counts as one newline; a lone `\r` still starts a new line.
                let skip = if bytes.get(i + 1) == Some(&b'\n') { 2 } else { 1 };
                line_starts.push((i + skip) as u32);
                i += skip;
                continue;
            }
            i += 1;
        }
        Self { line_starts }
    }

    /// Convert a byte offset to a 1-based (line, column) pair.
    pub fn line_col(&self, offset: u32) -> (u32, u32) {
        let line_idx = self.line_starts.partition_point(|&start| start <= offset);
        let line_idx = line_idx.saturating_sub(1);
        let line = (line_idx as u32) + 1;
        let col = offset - self.line_starts[line_idx] + 1;
        (line, col)
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

/// Converts byte offsets into `(line, column)` pairs for one source file.
///
/// Built once per file and shared by the lexer (for `unknown`-token
/// diagnostics) and the scope checker.
#[derive(Debug)]
pub struct SourceLocationConverter {
    index: LineIndex,
}

impl SourceLocationConverter {
    pub fn new(source: &str) -> Self {
        Self { index: LineIndex::new(source) }
    }

    pub fn line_col(&self, offset: u32) -> (u32, u32) {
        self.index.line_col(offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_new_and_len() {
        let span = Span::new(5, 10);
        assert_eq!(span.len(), 5);
        assert!(!span.is_empty());
    }

    #[test]
    fn span_empty() {
        let span = Span::new(3, 3);
        assert!(span.is_empty());
        assert_eq!(Span::empty_at(3), span);
    }

    #[test]
    fn span_merge() {
        let a = Span::new(5, 10);
        let b = Span::new(8, 15);
        assert_eq!(a.merge(b), Span::new(5, 15));
    }

    #[test]
    fn line_index_single_line() {
        let idx = LineIndex::new("hello");
        assert_eq!(idx.line_col(0), (1, 1));
        assert_eq!(idx.line_col(4), (1, 5));
    }

    #[test]
    fn line_index_multiple_lines() {
        let src = "hello\nworld\nfoo";
        let idx = LineIndex::new(src);
        assert_eq!(idx.line_col(0), (1, 1));
        assert_eq!(idx.line_col(6), (2, 1));
        assert_eq!(idx.line_col(13), (3, 2));
    }

    #[test]
    fn line_index_crlf_counts_as_one_newline() {
        let src = "ab\r\ncd";
        let idx = LineIndex::new(src);
        assert_eq!(idx.line_col(0), (1, 1));
        // 'c' follows the \r\n pair and starts line 2.
        assert_eq!(idx.line_col(4), (2, 1));
        assert_eq!(idx.line_count(), 2);
    }

    #[test]
    fn source_location_converter_matches_line_index() {
        let conv = SourceLocationConverter::new("a\nbb\nccc");
        assert_eq!(conv.line_col(5), (3, 1));
    }
}
