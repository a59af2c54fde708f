//! Position tracking for propsheet tokens and values
//!
//! Every token and every value in a parsed sheet carries a [`SourceLocation`]
//! for diagnostics. Locations are `(file, row, column)` triples with 1-based
//! rows and columns for display; [`SourceLocation::unknown`] is the valid
//! sentinel for values with no provenance (synthetic tokens, generated text).
//!
//! The lexer produces byte offsets, so [`LineIndex`] pre-computes the byte
//! offset of every line start once per source and converts offsets to
//! row/column positions with a binary search. This is O(log n) per
//! conversion, efficient for large documents.

use serde::Serialize;
use std::fmt;

/// A position in a source file: file name (when known), 1-based row and column.
///
/// Row 0 / column 0 is reserved for the [`unknown`](SourceLocation::unknown)
/// sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SourceLocation {
    pub file: Option<String>,
    pub row: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(file: Option<&str>, row: usize, column: usize) -> Self {
        Self {
            file: file.map(str::to_string),
            row,
            column,
        }
    }

    /// The sentinel location for values whose provenance is unavailable.
    pub fn unknown() -> Self {
        Self {
            file: None,
            row: 0,
            column: 0,
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.row == 0 && self.column == 0
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unknown() {
            return write!(f, "<unknown>");
        }
        match &self.file {
            Some(file) => write!(f, "{}:{}:{}", file, self.row, self.column),
            None => write!(f, "{}:{}", self.row, self.column),
        }
    }
}

/// Pre-computed line-start table for converting byte offsets to positions.
pub struct LineIndex {
    /// Byte offsets where each line starts
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];

        for (byte_pos, ch) in source.char_indices() {
            if ch == '\n' {
                line_starts.push(byte_pos + 1);
            }
        }

        Self { line_starts }
    }

    /// Convert a byte offset to a (row, column) pair, both 1-based.
    pub fn position(&self, byte_offset: usize) -> (usize, usize) {
        let line = self
            .line_starts
            .binary_search(&byte_offset)
            .unwrap_or_else(|i| i - 1);

        (line + 1, byte_offset - self.line_starts[line] + 1)
    }

    /// Convert a byte offset to a full location in `file`.
    pub fn location(&self, byte_offset: usize, file: Option<&str>) -> SourceLocation {
        let (row, column) = self.position(byte_offset);
        SourceLocation::new(file, row, column)
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}
