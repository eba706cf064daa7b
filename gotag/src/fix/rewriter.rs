//! Byte-range safe code rewriter.
//!
//! Applies edits expressed as byte ranges of the original text, so every
//! region nobody touched comes out exactly as it went in.
//!
//! # Usage
//!
//! ```
//! use gotag::fix::{ByteRangeRewriter, Edit};
//!
//! let source = "type T struct{ A int }";
//! let mut rewriter = ByteRangeRewriter::new(source);
//! rewriter.add_edit(Edit::insert(20, " `json:\"A\"`"));
//! let fixed = rewriter.apply().unwrap();
//! assert_eq!(fixed, "type T struct{ A int `json:\"A\"` }");
//! ```

use thiserror::Error;

/// A single edit operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    /// Start byte offset (inclusive)
    pub start_byte: usize,
    /// End byte offset (exclusive)
    pub end_byte: usize,
    /// Replacement content
    pub replacement: String,
}

impl Edit {
    /// Create a new edit
    #[must_use]
    pub fn new(start_byte: usize, end_byte: usize, replacement: impl Into<String>) -> Self {
        Self {
            start_byte,
            end_byte,
            replacement: replacement.into(),
        }
    }

    /// Create an insertion edit (insert before position)
    #[must_use]
    pub fn insert(position: usize, content: impl Into<String>) -> Self {
        Self::new(position, position, content)
    }

    /// Move the edit `by` bytes towards the start of the text.
    ///
    /// Used when the edit is applied to a slice that begins at `by`.
    #[must_use]
    pub fn shifted_back(mut self, by: usize) -> Self {
        self.start_byte -= by;
        self.end_byte -= by;
        self
    }

    /// Check if this edit overlaps with another
    #[must_use]
    pub const fn overlaps(&self, other: &Self) -> bool {
        self.start_byte < other.end_byte && other.start_byte < self.end_byte
    }
}

/// Error during rewriting
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RewriteError {
    /// Two or more edits have overlapping ranges
    #[error("overlapping edits at indices {edit_a} and {edit_b}")]
    OverlappingEdits {
        /// Index of first overlapping edit
        edit_a: usize,
        /// Index of second overlapping edit
        edit_b: usize,
    },
    /// Edit range is out of bounds or reversed
    #[error("edit {edit_index} out of bounds: {start_byte}..{end_byte} in source of length {source_len}")]
    OutOfBounds {
        /// Index of the bad edit
        edit_index: usize,
        /// Start byte of the edit
        start_byte: usize,
        /// End byte of the edit
        end_byte: usize,
        /// Length of the source
        source_len: usize,
    },
    /// Edit boundary falls inside a multi-byte character
    #[error("edit {edit_index} does not start or end on a character boundary")]
    NotCharBoundary {
        /// Index of the bad edit
        edit_index: usize,
    },
}

/// Safe code rewriter using byte ranges
///
/// Edits are applied in reverse order so earlier byte positions stay valid,
/// after checking that no two edits overlap.
#[derive(Debug, Clone)]
pub struct ByteRangeRewriter {
    /// Original source code
    source: String,
    /// Pending edits
    edits: Vec<Edit>,
}

impl ByteRangeRewriter {
    /// Create a new rewriter for the given source
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            edits: Vec::new(),
        }
    }

    /// Add an edit to the pending list
    pub fn add_edit(&mut self, edit: Edit) {
        self.edits.push(edit);
    }

    /// Add multiple edits
    pub fn add_edits(&mut self, edits: impl IntoIterator<Item = Edit>) {
        self.edits.extend(edits);
    }

    /// Validate edits without applying them
    ///
    /// # Errors
    /// Returns error if edits overlap, are out of bounds, or split a character
    pub fn validate(&self) -> Result<(), RewriteError> {
        for (i, edit) in self.edits.iter().enumerate() {
            if edit.start_byte > edit.end_byte || edit.end_byte > self.source.len() {
                return Err(RewriteError::OutOfBounds {
                    edit_index: i,
                    start_byte: edit.start_byte,
                    end_byte: edit.end_byte,
                    source_len: self.source.len(),
                });
            }
            if !self.source.is_char_boundary(edit.start_byte)
                || !self.source.is_char_boundary(edit.end_byte)
            {
                return Err(RewriteError::NotCharBoundary { edit_index: i });
            }
        }

        for i in 0..self.edits.len() {
            for j in (i + 1)..self.edits.len() {
                if self.edits[i].overlaps(&self.edits[j]) {
                    return Err(RewriteError::OverlappingEdits {
                        edit_a: i,
                        edit_b: j,
                    });
                }
            }
        }

        Ok(())
    }

    /// Apply all edits and return the modified source
    ///
    /// # Errors
    /// Returns error if the edits do not validate
    pub fn apply(self) -> Result<String, RewriteError> {
        self.validate()?;

        let mut result = self.source;
        let mut sorted_edits = self.edits;

        // Apply from end to start. Within one start position the ranged edit
        // (at most one, validation rejects overlaps) goes first, then the
        // insertions in reverse so they end up in the order they were added.
        sorted_edits.sort_by(|a, b| b.start_byte.cmp(&a.start_byte));
        let mut i = 0;
        while i < sorted_edits.len() {
            let start = sorted_edits[i].start_byte;
            let mut j = i;
            while j < sorted_edits.len() && sorted_edits[j].start_byte == start {
                j += 1;
            }
            let group = &sorted_edits[i..j];
            for edit in group.iter().filter(|e| e.end_byte > e.start_byte) {
                result.replace_range(edit.start_byte..edit.end_byte, &edit.replacement);
            }
            for edit in group.iter().rev().filter(|e| e.end_byte == e.start_byte) {
                result.insert_str(edit.start_byte, &edit.replacement);
            }
            i = j;
        }

        Ok(result)
    }
}
