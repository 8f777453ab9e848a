use super::position::{Position, Range, byte_to_position, compute_line_starts, utf16_len};
use serde::{Deserialize, Serialize};

/// One content-change record: replace `range` with `text`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentChange {
    pub range: Range,
    pub text: String,
}

/// What a change does to the document, judged from its shape alone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditKind {
    /// Empty range, non-empty text
    Addition,
    /// Non-empty range, empty text
    Deletion,
    /// Non-empty range and non-empty text: a deletion followed by an addition
    Paste,
    /// Empty range and empty text
    Noop,
}

impl ContentChange {
    pub fn new(range: Range, text: impl Into<String>) -> Self {
        Self {
            range,
            text: text.into(),
        }
    }

    pub fn insert(at: Position, text: impl Into<String>) -> Self {
        Self::new(Range::point(at), text)
    }

    pub fn delete(range: Range) -> Self {
        Self::new(range, String::new())
    }

    pub fn kind(&self) -> EditKind {
        match (self.range.is_empty(), self.text.is_empty()) {
            (true, false) => EditKind::Addition,
            (false, true) => EditKind::Deletion,
            (false, false) => EditKind::Paste,
            (true, true) => EditKind::Noop,
        }
    }

    /// Shape of the inserted text.
    pub fn extent(&self) -> TextExtent {
        text_extent(&self.text)
    }
}

/// Line shape of a piece of text: how many newlines it contains and how long
/// (in UTF-16 units) its trailing segment is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextExtent {
    pub newlines: u32,
    pub last_line_len: u32,
}

pub fn text_extent(text: &str) -> TextExtent {
    let newlines = text.matches('\n').count() as u32;
    let trailing = text.rsplit('\n').next().unwrap_or("");
    TextExtent {
        newlines,
        last_line_len: utf16_len(trailing) as u32,
    }
}

/// Reconstruct a single merged change record from a full-text replacement.
///
/// Returns None if texts are identical. All differences are merged into one
/// change: `[first_change_start, last_change_end_old)` in the old text is
/// replaced by `new[first_change_start..last_change_end_new]`.
pub fn reconstruct_change(old_text: &str, new_text: &str) -> Option<ContentChange> {
    use similar::{ChangeTag, TextDiff};

    if old_text == new_text {
        return None;
    }

    // NOTE: from_chars() keeps character granularity; byte positions are tracked via len()
    let diff = TextDiff::from_chars(old_text, new_text);

    let mut first_change_start: Option<usize> = None;
    let mut last_old_end: usize = 0;
    let mut last_new_end: usize = 0;
    let mut old_byte = 0;
    let mut new_byte = 0;

    for change in diff.iter_all_changes() {
        match change.tag() {
            ChangeTag::Equal => {
                old_byte += change.value().len();
                new_byte += change.value().len();
            }
            ChangeTag::Delete => {
                first_change_start.get_or_insert(old_byte);
                old_byte += change.value().len();
                last_old_end = old_byte;
                last_new_end = new_byte;
            }
            ChangeTag::Insert => {
                first_change_start.get_or_insert(old_byte);
                new_byte += change.value().len();
                last_old_end = old_byte;
                last_new_end = new_byte;
            }
        }
    }

    let start = first_change_start?;
    let line_starts = compute_line_starts(old_text);
    let range = Range::new(
        byte_to_position(old_text, &line_starts, start),
        byte_to_position(old_text, &line_starts, last_old_end),
    );
    // Equal prefix is identical in both texts, so `start` indexes `new_text` too
    Some(ContentChange::new(range, &new_text[start..last_new_end]))
}
