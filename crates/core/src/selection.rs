use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;

static WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[#A-Z0-9-]+").expect("word pattern must compile"));

const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', ')', ']'];
const LINE_BREAKS: [char; 2] = ['\n', '\r'];

/// What the user is pointing at, in byte offsets into the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Range(Range<usize>),
    Cursor(usize),
}

/// Derives the token the user intends to act on.
///
/// A non-empty range is taken verbatim; a cursor (or empty range) expands to
/// the surrounding run of `[#A-Z0-9-]`. The result is trimmed and stripped of
/// trailing punctuation but not validated against any token pattern.
pub fn resolve_selection(text: &str, selection: Selection) -> Option<String> {
    let range = match selection {
        Selection::Range(range) if range.start < range.end => range,
        Selection::Range(range) => word_range_at(text, range.start)?,
        Selection::Cursor(offset) => word_range_at(text, offset)?,
    };
    let raw = text.get(range)?;
    let token = clean_token(raw);
    (!token.is_empty()).then(|| token.to_string())
}

/// Range of the word run touching `offset` on its line. A cursor right after
/// the last character still counts as touching the word.
pub fn word_range_at(text: &str, offset: usize) -> Option<Range<usize>> {
    if offset > text.len() || !text.is_char_boundary(offset) {
        return None;
    }
    let line_start = text[..offset].rfind(LINE_BREAKS).map_or(0, |i| i + 1);
    let line_end = text[offset..]
        .find(LINE_BREAKS)
        .map_or(text.len(), |i| offset + i);
    let cursor = offset - line_start;

    WORD.find_iter(&text[line_start..line_end])
        .find(|m| m.start() <= cursor && cursor <= m.end())
        .map(|m| line_start + m.start()..line_start + m.end())
}

/// Trims whitespace, then strips trailing `.,;:)]` until none remain.
pub fn clean_token(raw: &str) -> &str {
    raw.trim().trim_end_matches(TRAILING_PUNCTUATION)
}
