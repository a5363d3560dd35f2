use std::ops::Range as ByteRange;
use ticketlink_core::LineIndex;
use tower_lsp::lsp_types::{Position, Range};

/// Lightweight container for document state
pub struct Document {
    pub content: String,
    pub version: i32,
    lines: LineIndex,
}

impl Document {
    pub fn new(content: String, version: i32) -> Self {
        let lines = LineIndex::new(&content);
        Self {
            content,
            version,
            lines,
        }
    }

    /// Applies a batch of `didChange` edits; a change without a range
    /// replaces the whole text.
    pub fn apply_changes<'a>(
        &self,
        changes: impl IntoIterator<Item = (Option<Range>, &'a str)>,
        version: i32,
    ) -> Self {
        let mut content = self.content.clone();
        let mut lines = self.lines.clone();
        for (range, text) in changes {
            match range {
                Some(range) => {
                    let start = offset_at(&content, &lines, range.start);
                    let end = offset_at(&content, &lines, range.end).max(start);
                    content.replace_range(start..end, text);
                }
                None => content = text.to_string(),
            }
            lines = LineIndex::new(&content);
        }
        Self {
            content,
            version,
            lines,
        }
    }

    pub fn offset_at(&self, position: Position) -> usize {
        offset_at(&self.content, &self.lines, position)
    }

    pub fn position_at(&self, offset: usize) -> Position {
        let (line, character) = self.lines.utf16_position(&self.content, offset);
        Position::new(line as u32, character as u32)
    }

    pub fn range_at(&self, span: ByteRange<usize>) -> Range {
        Range::new(self.position_at(span.start), self.position_at(span.end))
    }
}

/// Byte offset of an LSP position (line, UTF-16 column). Positions past the
/// end of a line clamp to the line end, positions past the end of the text
/// clamp to its length.
fn offset_at(text: &str, lines: &LineIndex, position: Position) -> usize {
    lines.utf16_offset(text, position.line as usize, position.character as usize)
}
