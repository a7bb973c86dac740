//! Text utilities for position conversion.
//!
//! Translates editor selections (LSP positions, UTF-16 columns) into the byte
//! ranges a format plan works on, and back.

use tower_lsp::lsp_types::{Position, Range};

use crate::range::TextRange;

/// Pre-computed line index for efficient position lookups.
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Byte offset where each line starts.
    line_starts: Vec<usize>,
    /// Source text (needed for UTF-16 column calculation).
    source: String,
}

impl LineIndex {
    /// Build a line index from source text.
    pub fn new(source: String) -> Self {
        let line_starts = std::iter::once(0)
            .chain(
                source
                    .char_indices()
                    .filter(|&(_, c)| c == '\n')
                    .map(|(i, _)| i + 1),
            )
            .collect();

        Self {
            line_starts,
            source,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// The range covering the whole document.
    pub fn full_range(&self) -> TextRange {
        TextRange::new(0, self.source.len())
    }

    /// Convert a byte offset to an LSP position.
    ///
    /// Offsets past the end of the source map to the end of the last line.
    pub fn offset_to_position(&self, offset: usize) -> Position {
        let offset = offset.min(self.source.len());
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(line) => line.saturating_sub(1),
        };

        let line_start = self.line_starts[line];
        let col: u32 = self.source[line_start..]
            .char_indices()
            .take_while(|(i, _)| line_start + i < offset)
            .map(|(_, c)| c.len_utf16() as u32)
            .sum();

        Position::new(line as u32, col)
    }

    /// Convert an LSP position to a byte offset.
    ///
    /// Returns None if the line is out of bounds. Columns past the end of a
    /// line clamp to the line end.
    pub fn position_to_offset(&self, position: Position) -> Option<usize> {
        let line = position.line as usize;
        let line_start = *self.line_starts.get(line)?;
        let line_end = self
            .line_starts
            .get(line + 1)
            .map(|&end| end.saturating_sub(1)) // Exclude newline
            .unwrap_or(self.source.len());

        let mut utf16_col = 0u32;
        for (i, c) in self.source[line_start..line_end].char_indices() {
            if utf16_col >= position.character {
                return Some(line_start + i);
            }
            utf16_col += c.len_utf16() as u32;
        }

        Some(line_end)
    }

    /// Convert an editor selection into a byte range.
    ///
    /// Returns None if either end lies on a line past the document. A
    /// selection with its ends swapped is normalised.
    pub fn range_to_text_range(&self, range: Range) -> Option<TextRange> {
        let start = self.position_to_offset(range.start)?;
        let end = self.position_to_offset(range.end)?;
        Some(TextRange::new(start.min(end), start.max(end)))
    }

    /// Convert a byte range to an LSP range.
    pub fn text_range_to_range(&self, range: TextRange) -> Range {
        Range::new(
            self.offset_to_position(range.start()),
            self.offset_to_position(range.end()),
        )
    }
}
