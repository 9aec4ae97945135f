//! Source locations.

use std::fmt;

/// A contiguous region of source text.
///
/// `start`/`end` are byte offsets (end exclusive); rows and columns are
/// 1-based and inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub column: usize,
    pub end_line: usize,
    pub end_column: usize,
}

impl Span {
    pub fn new(start: usize, end: usize, line: usize, column: usize) -> Self {
        Self {
            start,
            end,
            line,
            column,
            end_line: line,
            end_column: column + end.saturating_sub(start).saturating_sub(1),
        }
    }

    /// Build a span with an explicit end location.
    pub fn with_end(mut self, end_line: usize, end_column: usize) -> Self {
        self.end_line = end_line;
        self.end_column = end_column;
        self
    }

    /// The smallest span covering both `self` and `other`.
    pub fn merge(&self, other: &Span) -> Span {
        let (first, second) = if self.start <= other.start {
            (self, other)
        } else {
            (other, self)
        };
        let last = if second.end >= first.end { second } else { first };
        Span {
            start: first.start,
            end: last.end,
            line: first.line,
            column: first.column,
            end_line: last.end_line,
            end_column: last.end_column,
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_is_order_independent() {
        let a = Span::new(0, 3, 1, 1);
        let b = Span::new(6, 9, 1, 7);
        assert_eq!(a.merge(&b), b.merge(&a));
        let merged = a.merge(&b);
        assert_eq!(merged.start, 0);
        assert_eq!(merged.end, 9);
        assert_eq!(merged.column, 1);
        assert_eq!(merged.end_column, 9);
    }

    #[test]
    fn test_merge_spans_lines() {
        let a = Span::new(0, 3, 1, 1);
        let b = Span::new(10, 12, 2, 3);
        let merged = a.merge(&b);
        assert_eq!((merged.line, merged.end_line), (1, 2));
        assert_eq!(merged.len(), 12);
    }
}
