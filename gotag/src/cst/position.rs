//! Byte offset to line/column resolution.

/// Line-start table for one source text.
///
/// Tree nodes carry raw byte offsets; this index turns them into the 1-based
/// line and column pairs used in diagnostics and by the printer when it needs
/// to know whether two nodes share a line.
#[derive(Debug, Clone)]
pub struct PositionIndex {
    /// Stores the byte index of the start of each line.
    line_starts: Vec<usize>,
    len: usize,
}

impl PositionIndex {
    /// Creates a new `PositionIndex` by scanning the source for newlines.
    #[must_use]
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        // '\n' is always a single byte in UTF-8
        for (i, byte) in source.as_bytes().iter().enumerate() {
            if *byte == b'\n' {
                line_starts.push(i + 1);
            }
        }
        Self {
            line_starts,
            len: source.len(),
        }
    }

    /// 1-based line number of a byte offset. Offsets past the end clamp to the last line.
    #[must_use]
    pub fn line(&self, offset: usize) -> usize {
        let offset = offset.min(self.len);
        match self.line_starts.binary_search(&offset) {
            Ok(line) => line + 1,
            Err(line) => line,
        }
    }

    /// 1-based `(line, column)` of a byte offset; the column counts bytes.
    #[must_use]
    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        let line = self.line(offset);
        let start = self.line_starts[line - 1];
        (line, offset.min(self.len) - start + 1)
    }

    /// Byte offset where the given 1-based line starts.
    #[must_use]
    pub fn line_start(&self, line: usize) -> Option<usize> {
        self.line_starts.get(line.checked_sub(1)?).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_col_first_line() {
        let index = PositionIndex::new("package main\n");
        assert_eq!(index.line_col(0), (1, 1));
        assert_eq!(index.line_col(8), (1, 9));
    }

    #[test]
    fn test_line_col_after_newline() {
        let index = PositionIndex::new("package main\n\ntype T struct{}\n");
        assert_eq!(index.line_col(13), (2, 1));
        assert_eq!(index.line_col(14), (3, 1));
        assert_eq!(index.line(19), 3);
    }

    #[test]
    fn test_offset_past_end_clamps() {
        let index = PositionIndex::new("a\nb");
        assert_eq!(index.line(100), 2);
        assert_eq!(index.line_col(100), (2, 2));
    }

    #[test]
    fn test_line_start() {
        let index = PositionIndex::new("a\nbc\n");
        assert_eq!(index.line_start(1), Some(0));
        assert_eq!(index.line_start(2), Some(2));
        assert_eq!(index.line_start(0), None);
        assert_eq!(index.line_start(9), None);
    }
}
