use super::intersection::{IntersectionType, classify};
use super::transform::{EditShape, Family, Outcome};
use crate::text::{ContentChange, Position, Range};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RangeState {
    Active,
    /// Terminal: a deletion swallowed the whole range
    Deleted,
}

/// Result of rebasing a range across one change, without mutation.
#[derive(Clone, Debug, PartialEq)]
pub enum Rebase {
    Range(TrackedRange),
    Deleted,
}

/// What `TrackedRange::update` did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RangeUpdate {
    Rebased { previous: Range },
    Unchanged,
    Deleted,
    /// The range was already deleted; the change was dropped
    Ignored,
}

/// A half-open text interval that rebases itself across content changes.
///
/// Equality compares the endpoints and state only; `cached_length` is advisory
/// and `unclassified_edits` is diagnostic. The persisted form is a plain
/// `{start, end}` range, plus `"deleted": true` once a range is deleted.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(from = "RangeRecord", into = "RangeRecord")]
pub struct TrackedRange {
    start: Position,
    end: Position,
    cached_length: usize,
    state: RangeState,
    unclassified_edits: u32,
}

impl TrackedRange {
    /// Create a range over `[start, end)`. Reversed endpoints are swapped.
    pub fn new(start: Position, end: Position) -> Self {
        let (start, end) = if start <= end {
            (start, end)
        } else {
            (end, start)
        };
        let cached_length = if start.line == end.line {
            (end.character - start.character) as usize
        } else {
            0
        };
        Self {
            start,
            end,
            cached_length,
            state: RangeState::Active,
            unclassified_edits: 0,
        }
    }

    pub fn from_range(range: Range) -> Self {
        Self::new(range.start, range.end)
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn end(&self) -> Position {
        self.end
    }

    pub fn range(&self) -> Range {
        Range::new(self.start, self.end)
    }

    /// Character length of the covered text, in UTF-16 units.
    pub fn cached_length(&self) -> usize {
        self.cached_length
    }

    pub fn state(&self) -> RangeState {
        self.state
    }

    pub fn is_deleted(&self) -> bool {
        self.state == RangeState::Deleted
    }

    pub fn is_single_line(&self) -> bool {
        self.start.line == self.end.line
    }

    /// How many changes hit an unclassifiable relationship and were skipped.
    pub fn unclassified_edits(&self) -> u32 {
        self.unclassified_edits
    }

    pub fn intersection(&self, change_range: &Range) -> IntersectionType {
        classify(change_range, self.start, self.end)
    }

    pub(crate) fn set_cached_length(&mut self, length: usize) {
        self.cached_length = length;
    }

    /// Move both endpoints, keeping state and counters.
    pub(crate) fn set_bounds(&mut self, start: Position, end: Position) {
        self.start = start.min(end);
        self.end = end.max(start);
        if self.is_single_line() {
            self.cached_length = (self.end.character - self.start.character) as usize;
        }
    }

    /// Compute where this range ends up after `change`, leaving `self` as is.
    ///
    /// A change whose relationship to this range cannot be classified is a
    /// no-op for every edit kind; only the counter moves.
    pub fn rebase(&self, change: &ContentChange) -> Rebase {
        if self.is_deleted() {
            return Rebase::Deleted;
        }
        if self.intersection(&change.range) == IntersectionType::Unknown {
            return Rebase::Range(self.skip_unclassified(&change.range));
        }

        let mut current = self.clone();
        for edit in EditShape::split(change) {
            match current.rebase_shape(edit) {
                Rebase::Deleted => return Rebase::Deleted,
                Rebase::Range(next) => current = next,
            }
        }
        Rebase::Range(current)
    }

    /// Apply `change` to this range in place.
    pub fn update(&mut self, change: &ContentChange) -> RangeUpdate {
        if self.is_deleted() {
            log::trace!(
                target: "scopetrack::range",
                "Ignoring change {} on deleted range",
                change.range
            );
            return RangeUpdate::Ignored;
        }

        let previous = self.range();
        match self.rebase(change) {
            Rebase::Deleted => {
                log::debug!(
                    target: "scopetrack::range",
                    "Range {} deleted by change {}",
                    previous,
                    change.range
                );
                self.state = RangeState::Deleted;
                RangeUpdate::Deleted
            }
            Rebase::Range(next) => {
                *self = next;
                if self.range() == previous {
                    RangeUpdate::Unchanged
                } else {
                    RangeUpdate::Rebased { previous }
                }
            }
        }
    }

    fn rebase_shape(&self, edit: EditShape) -> Rebase {
        let intersection = classify(&edit.change_range(), self.start, self.end);
        let family = Family::select(self.is_single_line(), edit.span().is_single_line());

        log::trace!(
            target: "scopetrack::range",
            "Rebasing {} across {:?}: {:?} via {:?}",
            self.range(),
            edit,
            intersection,
            family
        );

        match family.apply(self.start, self.end, edit, intersection) {
            Outcome::Deleted => Rebase::Deleted,
            Outcome::Unchanged => Rebase::Range(self.clone()),
            Outcome::Moved(start, end) => {
                let mut next = self.clone();
                next.set_bounds(start, end);
                Rebase::Range(next)
            }
            Outcome::Unclassified => Rebase::Range(self.skip_unclassified(&edit.change_range())),
        }
    }

    fn skip_unclassified(&self, change_range: &Range) -> Self {
        log::warn!(
            target: "scopetrack::range",
            "Unclassified intersection between {} and change {}; leaving range unchanged",
            self.range(),
            change_range
        );
        let mut next = self.clone();
        next.unclassified_edits += 1;
        next
    }
}

impl PartialEq for TrackedRange {
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start && self.end == other.end && self.state == other.state
    }
}

impl Eq for TrackedRange {}

impl From<Range> for TrackedRange {
    fn from(range: Range) -> Self {
        Self::from_range(range)
    }
}

impl From<TrackedRange> for Range {
    fn from(tracked: TrackedRange) -> Self {
        tracked.range()
    }
}

#[derive(Serialize, Deserialize)]
struct RangeRecord {
    start: Position,
    end: Position,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    deleted: bool,
}

impl From<RangeRecord> for TrackedRange {
    fn from(record: RangeRecord) -> Self {
        let mut range = Self::new(record.start, record.end);
        if record.deleted {
            range.state = RangeState::Deleted;
        }
        range
    }
}

impl From<TrackedRange> for RangeRecord {
    fn from(tracked: TrackedRange) -> Self {
        Self {
            start: tracked.start,
            end: tracked.end,
            deleted: tracked.is_deleted(),
        }
    }
}
