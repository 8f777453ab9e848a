use crate::error::{TrackerError, TrackerResult};
use crate::text::{
    ContentChange, Position, Range, byte_to_position, compute_line_starts,
    convert_byte_to_utf16_in_line, convert_utf16_to_byte_in_line, utf16_len,
};
use regex::Regex;
use url::Url;

/// A line-indexed text document.
///
/// Positions are LSP-style (UTF-16 columns). Line starts are recomputed after
/// every applied change so lookups stay O(log lines).
#[derive(Clone, Debug)]
pub struct TextDocument {
    uri: Url,
    text: String,
    version: i32,
    line_starts: Vec<usize>,
}

impl TextDocument {
    /// Create a new text document at version 0
    pub fn new(uri: Url, text: impl Into<String>) -> Self {
        Self::with_version(uri, text, 0)
    }

    /// Create a new text document with version
    pub fn with_version(uri: Url, text: impl Into<String>, version: i32) -> Self {
        let text = text.into();
        let line_starts = compute_line_starts(&text);
        Self {
            uri,
            text,
            version,
            line_starts,
        }
    }

    pub fn uri(&self) -> &Url {
        &self.uri
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn version(&self) -> i32 {
        self.version
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Text of `line` without its line terminator.
    pub fn line_text(&self, line: u32) -> Option<&str> {
        let line = line as usize;
        let start = *self.line_starts.get(line)?;
        let end = self
            .line_starts
            .get(line + 1)
            .map(|next| next - 1)
            .unwrap_or(self.text.len());
        let text = &self.text[start..end];
        Some(text.strip_suffix('\r').unwrap_or(text))
    }

    /// Byte offset of `position`, or None if it lies outside the document.
    pub fn offset_at(&self, position: Position) -> Option<usize> {
        let line_start = *self.line_starts.get(position.line as usize)?;
        let line_text = self.line_text(position.line)?;
        convert_utf16_to_byte_in_line(line_text, position.character as usize)
            .map(|byte| line_start + byte)
    }

    /// Byte offset of `position`, clamping past-the-end columns and lines.
    pub fn offset_at_clamped(&self, position: Position) -> usize {
        let Some(line_start) = self.line_starts.get(position.line as usize).copied() else {
            return self.text.len();
        };
        let line_text = self.line_text(position.line).unwrap_or("");
        let byte = convert_utf16_to_byte_in_line(line_text, position.character as usize)
            .unwrap_or(line_text.len());
        line_start + byte
    }

    pub fn position_at(&self, offset: usize) -> Position {
        byte_to_position(&self.text, &self.line_starts, offset)
    }

    pub fn end_position(&self) -> Position {
        self.position_at(self.text.len())
    }

    /// Whole-document range.
    pub fn full_range(&self) -> Range {
        Range::new(Position::default(), self.end_position())
    }

    /// Substring covered by `range`, clamped to the document.
    pub fn text_in(&self, range: Range) -> &str {
        let start = self.offset_at_clamped(range.start);
        let end = self.offset_at_clamped(range.end).max(start);
        &self.text[start..end]
    }

    /// Character distance (UTF-16 units) spanned by `range`.
    pub fn char_distance(&self, range: Range) -> usize {
        utf16_len(self.text_in(range))
    }

    /// Apply one change record, bumping the version.
    pub fn apply_change(&mut self, change: &ContentChange) -> TrackerResult<()> {
        let start = self.checked_offset(change.range.start)?;
        let end = self.checked_offset(change.range.end)?;
        if end < start {
            return Err(TrackerError::position_out_of_bounds(
                self.uri.as_str(),
                change.range.end.line,
                change.range.end.character,
            ));
        }

        self.text.replace_range(start..end, &change.text);
        self.line_starts = compute_line_starts(&self.text);
        self.version += 1;
        Ok(())
    }

    /// Widen `range` so neither endpoint splits a word.
    ///
    /// An endpoint strictly inside a `word_pattern` match moves outward to the
    /// match boundary. Endpoints already on a boundary, or outside any word,
    /// stay where they are.
    pub fn snap_to_words(&self, range: Range, word_pattern: &Regex) -> Range {
        let start = self
            .enclosing_word(range.start, word_pattern)
            .map(|word| word.start)
            .unwrap_or(range.start);
        let end = self
            .enclosing_word(range.end, word_pattern)
            .map(|word| word.end)
            .unwrap_or(range.end);
        Range::new(start.min(range.start), end.max(range.end))
    }

    /// The word match that strictly contains `position`, if any.
    fn enclosing_word(&self, position: Position, word_pattern: &Regex) -> Option<Range> {
        let line_text = self.line_text(position.line)?;
        let byte = convert_utf16_to_byte_in_line(line_text, position.character as usize)?;
        let word = word_pattern
            .find_iter(line_text)
            .find(|m| m.start() < byte && byte < m.end())?;

        let start = convert_byte_to_utf16_in_line(line_text, word.start())?;
        let end = convert_byte_to_utf16_in_line(line_text, word.end())?;
        Some(Range::new(
            Position::new(position.line, start as u32),
            Position::new(position.line, end as u32),
        ))
    }

    fn checked_offset(&self, position: Position) -> TrackerResult<usize> {
        self.offset_at(position).ok_or_else(|| {
            TrackerError::position_out_of_bounds(
                self.uri.as_str(),
                position.line,
                position.character,
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(text: &str) -> TextDocument {
        TextDocument::new(Url::parse("file:///test/doc.rs").unwrap(), text)
    }

    fn words() -> Regex {
        Regex::new(r"[A-Za-z0-9_]+").unwrap()
    }

    #[test]
    fn test_text_document_creation() {
        let document = doc("hello\nworld");
        assert_eq!(document.text(), "hello\nworld");
        assert_eq!(document.version(), 0);
        assert_eq!(document.line_count(), 2);
        assert_eq!(document.line_text(1), Some("world"));
        assert_eq!(document.line_text(2), None);
    }

    #[test]
    fn test_offset_at_rejects_out_of_bounds() {
        let document = doc("ab\ncd");
        assert_eq!(document.offset_at(Position::new(1, 2)), Some(5));
        assert_eq!(document.offset_at(Position::new(1, 3)), None);
        assert_eq!(document.offset_at(Position::new(5, 0)), None);
        assert_eq!(document.offset_at_clamped(Position::new(0, 40)), 2);
    }

    #[test]
    fn test_apply_change_insert_and_delete() {
        let mut document = doc("fn main() {}\n");
        document
            .apply_change(&ContentChange::insert(Position::new(0, 11), "\n    x\n"))
            .unwrap();
        assert_eq!(document.text(), "fn main() {\n    x\n}\n");
        assert_eq!(document.version(), 1);

        document
            .apply_change(&ContentChange::delete(Range::from_coords(1, 0, 2, 0)))
            .unwrap();
        assert_eq!(document.text(), "fn main() {\n}\n");
        assert_eq!(document.line_count(), 3);
    }

    #[test]
    fn test_apply_change_out_of_bounds_is_error() {
        let mut document = doc("abc");
        let result = document.apply_change(&ContentChange::insert(Position::new(3, 0), "x"));
        assert!(matches!(
            result,
            Err(TrackerError::PositionOutOfBounds { line: 3, .. })
        ));
        assert_eq!(document.text(), "abc");
        assert_eq!(document.version(), 0);
    }

    #[test]
    fn test_text_in_multiline() {
        let document = doc("one\ntwo\nthree");
        assert_eq!(document.text_in(Range::from_coords(0, 1, 2, 2)), "ne\ntwo\nth");
        assert_eq!(document.char_distance(Range::from_coords(0, 1, 2, 2)), 10);
    }

    #[test]
    fn test_snap_to_words_expands_split_identifier() {
        let document = doc("let counter = value;");
        // [6, 16) splits "counter" and "value"
        let snapped = document.snap_to_words(Range::from_coords(0, 6, 0, 16), &words());
        assert_eq!(snapped, Range::from_coords(0, 4, 0, 19));
    }

    #[test]
    fn test_snap_to_words_keeps_boundaries() {
        let document = doc("let counter = value;");
        let range = Range::from_coords(0, 4, 0, 11);
        assert_eq!(document.snap_to_words(range, &words()), range);
    }

    #[test]
    fn test_snap_to_words_multibyte_line() {
        let document = doc("x = \"あい\" + total");
        // character 13 splits "total" (starts at 11)
        let snapped = document.snap_to_words(Range::from_coords(0, 0, 0, 13), &words());
        assert_eq!(snapped, Range::from_coords(0, 0, 0, 16));
    }
}
