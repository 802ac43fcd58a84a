use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Where a declaration sits in the source file a model was extracted from,
/// as `{ "start": .., "end": .. }` byte offsets (end exclusive).
///
/// Model files may omit spans; diagnostics then show the element's trace
/// text instead of a source excerpt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    pub fn new(start: u32, end: u32) -> Self {
        debug_assert!(start <= end, "span start ({start}) must be <= end ({end})");
        Self { start, end }
    }

    /// Label range for a source of `len` bytes. Offsets past the end are
    /// clamped, and an empty span is widened to one byte so the label has
    /// something to point at.
    pub fn to_range(self, len: usize) -> Range<usize> {
        let start = (self.start as usize).min(len);
        let end = (self.end as usize).min(len).max(start);
        if start == end {
            start..(end + 1).min(len)
        } else {
            start..end
        }
    }
}

/// Line starts of a source file, for reporting spans as line and column in
/// JSON diagnostics.
#[derive(Debug)]
pub struct LineIndex {
    line_starts: Vec<u32>,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0u32];
        for (i, byte) in source.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push((i + 1) as u32);
            }
        }
        Self { line_starts }
    }

    /// 1-based `(line, column)` of a byte offset.
    pub fn line_col(&self, offset: u32) -> (u32, u32) {
        let line_idx = self
            .line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);
        let col = offset - self.line_starts[line_idx] + 1;
        (line_idx as u32 + 1, col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_range_clamps_and_widens() {
        assert_eq!(Span::new(2, 4).to_range(10), 2..4);
        assert_eq!(Span::new(3, 3).to_range(10), 3..4);
        assert_eq!(Span::new(8, 20).to_range(10), 8..10);
        assert_eq!(Span::new(12, 20).to_range(10), 10..10);
    }

    #[test]
    fn line_col_of_model_offsets() {
        let idx = LineIndex::new("@Component\nabstract class C {\n    val foo: Foo\n}\n");
        assert_eq!(idx.line_col(0), (1, 1));
        assert_eq!(idx.line_col(11), (2, 1));
        assert_eq!(idx.line_col(34), (3, 5));
    }

    #[test]
    fn span_deserializes_from_table() {
        let span: Span = toml::from_str("start = 1\nend = 4").unwrap();
        assert_eq!(span, Span::new(1, 4));
    }
}
