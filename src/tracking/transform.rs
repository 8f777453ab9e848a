//! Endpoint arithmetic for rebasing a range across one single-kind edit.
//!
//! A paste never reaches the families whole: `EditShape::split` turns it into
//! its deletion and addition halves first. Each half is selected into one of
//! four families by (range single/multi-line) x (edit single/multi-line), and
//! each family answers the 11-way intersection switch for its shape.

use super::intersection::IntersectionType;
use crate::text::{ContentChange, EditKind, Position, Range, TextExtent};

/// A single-kind edit as seen by the transform families.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum EditShape {
    /// Text with `extent` inserted at `at`
    Insert { at: Position, extent: TextExtent },
    /// Text in `range` removed
    Remove { range: Range },
}

impl EditShape {
    /// The single-kind halves of `change` in application order. A paste is
    /// its removal followed by an insertion at the removed range's start.
    pub(crate) fn split(change: &ContentChange) -> impl Iterator<Item = EditShape> {
        let remove = EditShape::Remove {
            range: change.range,
        };
        let insert = EditShape::Insert {
            at: change.range.start,
            extent: change.extent(),
        };
        let (first, second) = match change.kind() {
            EditKind::Noop => (None, None),
            EditKind::Addition => (Some(insert), None),
            EditKind::Deletion => (Some(remove), None),
            EditKind::Paste => (Some(remove), Some(insert)),
        };
        [first, second].into_iter().flatten()
    }

    /// The range the intersection is classified against: the insertion point
    /// for an addition, the removed range for a deletion.
    pub(crate) fn change_range(&self) -> Range {
        match self {
            EditShape::Insert { at, .. } => Range::point(*at),
            EditShape::Remove { range } => *range,
        }
    }

    /// The region the edit spans in the document where it is visible.
    pub(crate) fn span(&self) -> Range {
        match self {
            EditShape::Insert { at, extent } => {
                let end = if extent.newlines == 0 {
                    Position::new(at.line, at.character + extent.last_line_len)
                } else {
                    Position::new(at.line + extent.newlines, extent.last_line_len)
                };
                Range::new(*at, end)
            }
            EditShape::Remove { range } => *range,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Outcome {
    Moved(Position, Position),
    Unchanged,
    Deleted,
    Unclassified,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Family {
    SingleLineRangeSingleLineEdit,
    SingleLineRangeMultiLineEdit,
    MultiLineRangeSingleLineEdit,
    MultiLineRangeMultiLineEdit,
}

impl Family {
    pub(crate) fn select(range_single_line: bool, edit_single_line: bool) -> Self {
        match (range_single_line, edit_single_line) {
            (true, true) => Family::SingleLineRangeSingleLineEdit,
            (true, false) => Family::SingleLineRangeMultiLineEdit,
            (false, true) => Family::MultiLineRangeSingleLineEdit,
            (false, false) => Family::MultiLineRangeMultiLineEdit,
        }
    }

    pub(crate) fn apply(
        self,
        start: Position,
        end: Position,
        edit: EditShape,
        intersection: IntersectionType,
    ) -> Outcome {
        match self {
            Family::SingleLineRangeSingleLineEdit => {
                single_line_range_single_line_edit(start, end, edit, intersection)
            }
            Family::SingleLineRangeMultiLineEdit => {
                single_line_range_multi_line_edit(start, end, edit, intersection)
            }
            Family::MultiLineRangeSingleLineEdit => {
                multi_line_range_single_line_edit(start, end, edit, intersection)
            }
            Family::MultiLineRangeMultiLineEdit => {
                multi_line_range_multi_line_edit(start, end, edit, intersection)
            }
        }
    }
}

fn plus_chars(position: Position, delta: u32) -> Position {
    Position::new(position.line, position.character + delta)
}

fn minus_chars(position: Position, delta: u32) -> Position {
    Position::new(position.line, position.character.saturating_sub(delta))
}

/// Where `q` (at or after `at`) lands once `extent` is inserted at `at`.
pub(crate) fn shift_after_insert(q: Position, at: Position, extent: TextExtent) -> Position {
    if q.line != at.line {
        return Position::new(q.line + extent.newlines, q.character);
    }
    if extent.newlines == 0 {
        plus_chars(q, extent.last_line_len)
    } else {
        Position::new(
            q.line + extent.newlines,
            extent.last_line_len + q.character.saturating_sub(at.character),
        )
    }
}

/// Where `q` (at or after `removed.end`) lands once `removed` is deleted.
pub(crate) fn pull_after_remove(q: Position, removed: Range) -> Position {
    if q.line == removed.end.line {
        Position::new(
            removed.start.line,
            removed.start.character + q.character.saturating_sub(removed.end.character),
        )
    } else {
        Position::new(
            q.line - (removed.end.line - removed.start.line),
            q.character,
        )
    }
}

/// Range on one line, edit on one line: only character columns move.
fn single_line_range_single_line_edit(
    start: Position,
    end: Position,
    edit: EditShape,
    intersection: IntersectionType,
) -> Outcome {
    use IntersectionType::*;

    match (intersection, edit) {
        (After | TouchesEnd, _) => Outcome::Unchanged,
        (Unknown, _) => Outcome::Unclassified,
        (StartBeforeEndAfter | StartOnEndAfter, EditShape::Remove { .. }) => Outcome::Deleted,

        (Before, EditShape::Insert { at, extent }) => {
            if at.line == start.line {
                let width = extent.last_line_len;
                Outcome::Moved(plus_chars(start, width), plus_chars(end, width))
            } else {
                Outcome::Unchanged
            }
        }
        (TouchesStart, EditShape::Insert { extent, .. }) => {
            let width = extent.last_line_len;
            Outcome::Moved(plus_chars(start, width), plus_chars(end, width))
        }
        (StartInsideEndInside, EditShape::Insert { extent, .. }) => {
            Outcome::Moved(start, plus_chars(end, extent.last_line_len))
        }

        (Before, EditShape::Remove { range }) => {
            if range.end.line == start.line {
                let width = range.end.character - range.start.character;
                Outcome::Moved(minus_chars(start, width), minus_chars(end, width))
            } else {
                Outcome::Unchanged
            }
        }
        (TouchesStart | StartBeforeEndInside, EditShape::Remove { range }) => {
            let width = range.end.character - range.start.character;
            Outcome::Moved(range.start, minus_chars(end, width))
        }
        (StartOnEndInside | StartInsideEndInside, EditShape::Remove { range }) => {
            let width = range.end.character - range.start.character;
            Outcome::Moved(start, minus_chars(end, width))
        }
        (StartInsideEndOn | StartInsideEndAfter, EditShape::Remove { range }) => {
            Outcome::Moved(start, range.start)
        }

        // An insertion point is never classified as overlapping our end
        (_, EditShape::Insert { .. }) => Outcome::Unclassified,
    }
}

/// Range on one line, edit spanning lines: endpoints may change line.
fn single_line_range_multi_line_edit(
    start: Position,
    end: Position,
    edit: EditShape,
    intersection: IntersectionType,
) -> Outcome {
    use IntersectionType::*;

    match (intersection, edit) {
        (After | TouchesEnd, _) => Outcome::Unchanged,
        (Unknown, _) => Outcome::Unclassified,
        (StartBeforeEndAfter | StartOnEndAfter, EditShape::Remove { .. }) => Outcome::Deleted,

        (Before | TouchesStart, EditShape::Insert { at, extent }) => Outcome::Moved(
            shift_after_insert(start, at, extent),
            shift_after_insert(end, at, extent),
        ),
        (StartInsideEndInside, EditShape::Insert { at, extent }) => {
            Outcome::Moved(start, shift_after_insert(end, at, extent))
        }

        (Before, EditShape::Remove { range }) => Outcome::Moved(
            pull_after_remove(start, range),
            pull_after_remove(end, range),
        ),
        (TouchesStart | StartBeforeEndInside, EditShape::Remove { range }) => {
            Outcome::Moved(range.start, pull_after_remove(end, range))
        }
        (StartOnEndInside | StartInsideEndInside, EditShape::Remove { range }) => {
            Outcome::Moved(start, pull_after_remove(end, range))
        }
        (StartInsideEndOn | StartInsideEndAfter, EditShape::Remove { range }) => {
            Outcome::Moved(start, range.start)
        }

        (_, EditShape::Insert { .. }) => Outcome::Unclassified,
    }
}

/// Range spanning lines, edit on one line: an endpoint moves only when the
/// edit shares its line.
fn multi_line_range_single_line_edit(
    start: Position,
    end: Position,
    edit: EditShape,
    intersection: IntersectionType,
) -> Outcome {
    use IntersectionType::*;

    match (intersection, edit) {
        (After | TouchesEnd, _) => Outcome::Unchanged,
        (Unknown, _) => Outcome::Unclassified,
        (StartBeforeEndAfter | StartOnEndAfter, EditShape::Remove { .. }) => Outcome::Deleted,

        (Before, EditShape::Insert { at, extent }) => {
            if at.line == start.line {
                Outcome::Moved(plus_chars(start, extent.last_line_len), end)
            } else {
                Outcome::Unchanged
            }
        }
        (TouchesStart, EditShape::Insert { extent, .. }) => {
            Outcome::Moved(plus_chars(start, extent.last_line_len), end)
        }
        (StartInsideEndInside, EditShape::Insert { at, extent }) => {
            if at.line == end.line {
                Outcome::Moved(start, plus_chars(end, extent.last_line_len))
            } else {
                Outcome::Unchanged
            }
        }

        (Before, EditShape::Remove { range }) => {
            if range.end.line == start.line {
                let width = range.end.character - range.start.character;
                Outcome::Moved(minus_chars(start, width), end)
            } else {
                Outcome::Unchanged
            }
        }
        (TouchesStart, EditShape::Remove { range }) => Outcome::Moved(range.start, end),
        (StartBeforeEndInside, EditShape::Remove { range }) => {
            Outcome::Moved(range.start, pull_end_on_shared_line(end, range))
        }
        (StartOnEndInside | StartInsideEndInside, EditShape::Remove { range }) => {
            Outcome::Moved(start, pull_end_on_shared_line(end, range))
        }
        (StartInsideEndOn | StartInsideEndAfter, EditShape::Remove { range }) => {
            Outcome::Moved(start, range.start)
        }

        (_, EditShape::Insert { .. }) => Outcome::Unclassified,
    }
}

fn pull_end_on_shared_line(end: Position, range: Range) -> Position {
    if range.end.line == end.line {
        minus_chars(end, range.end.character - range.start.character)
    } else {
        end
    }
}

/// Range spanning lines, edit spanning lines: the general case.
fn multi_line_range_multi_line_edit(
    start: Position,
    end: Position,
    edit: EditShape,
    intersection: IntersectionType,
) -> Outcome {
    use IntersectionType::*;

    match (intersection, edit) {
        (After | TouchesEnd, _) => Outcome::Unchanged,
        (Unknown, _) => Outcome::Unclassified,
        (StartBeforeEndAfter | StartOnEndAfter, EditShape::Remove { .. }) => Outcome::Deleted,

        (Before | TouchesStart, EditShape::Insert { at, extent }) => Outcome::Moved(
            shift_after_insert(start, at, extent),
            shift_after_insert(end, at, extent),
        ),
        (StartInsideEndInside, EditShape::Insert { at, extent }) => {
            Outcome::Moved(start, shift_after_insert(end, at, extent))
        }

        (Before | TouchesStart, EditShape::Remove { range }) => Outcome::Moved(
            pull_after_remove(start, range),
            pull_after_remove(end, range),
        ),
        (StartBeforeEndInside, EditShape::Remove { range }) => {
            Outcome::Moved(range.start, pull_after_remove(end, range))
        }
        (StartOnEndInside | StartInsideEndInside, EditShape::Remove { range }) => {
            Outcome::Moved(start, pull_after_remove(end, range))
        }
        (StartInsideEndOn | StartInsideEndAfter, EditShape::Remove { range }) => {
            Outcome::Moved(start, range.start)
        }

        (_, EditShape::Insert { .. }) => Outcome::Unclassified,
    }
}
