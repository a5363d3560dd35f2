//! Line table for converting between byte offsets and line/column pairs.
//!
//! `\n`, `\r\n` and a lone `\r` each end a line, the same rule editors use
//! for LSP positions.

/// Start offset of every line, built once per text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    line_starts: Vec<usize>,
    len: usize,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let bytes = text.as_bytes();
        let mut line_starts = vec![0];
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'\n' => line_starts.push(i + 1),
                b'\r' => {
                    if bytes.get(i + 1) == Some(&b'\n') {
                        i += 1;
                    }
                    line_starts.push(i + 1);
                }
                _ => {}
            }
            i += 1;
        }
        Self {
            line_starts,
            len: text.len(),
        }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Zero-based line containing `offset`. Offsets past the end map to the
    /// last line.
    pub fn line_of(&self, offset: usize) -> usize {
        let offset = offset.min(self.len);
        self.line_starts.partition_point(|&start| start <= offset) - 1
    }

    /// Byte offset where `line` starts, or the text length past the last line.
    pub fn line_start(&self, line: usize) -> usize {
        self.line_starts.get(line).copied().unwrap_or(self.len)
    }

    /// Byte offset where the content of `line` ends, before its line break.
    pub fn line_end(&self, text: &str, line: usize) -> usize {
        let start = self.line_start(line);
        let next = self.line_start(line + 1);
        let content = &text[start..next];
        let content = content
            .strip_suffix("\r\n")
            .or_else(|| content.strip_suffix('\n'))
            .or_else(|| content.strip_suffix('\r'))
            .unwrap_or(content);
        start + content.len()
    }

    /// Line and UTF-16 column of a byte offset on a char boundary.
    pub fn utf16_position(&self, text: &str, offset: usize) -> (usize, usize) {
        let offset = offset.min(self.len);
        let line = self.line_of(offset);
        let column = text[self.line_start(line)..offset]
            .chars()
            .map(char::len_utf16)
            .sum();
        (line, column)
    }

    /// Byte offset of a line and UTF-16 column. Columns past the end of the
    /// line clamp to its end; lines past the end of the text clamp to its
    /// length.
    pub fn utf16_offset(&self, text: &str, line: usize, column: usize) -> usize {
        if line >= self.line_count() {
            return self.len;
        }
        let start = self.line_start(line);
        let end = self.line_end(text, line);
        let mut units = 0;
        for (i, c) in text[start..end].char_indices() {
            if units >= column {
                return start + i;
            }
            units += c.len_utf16();
        }
        end
    }
}
