use crate::text::{Position, Range};

/// Positional relationship between an edit's change range and a tracked range.
///
/// Rows read "change starts {before, on, inside} our start" and columns
/// "change ends {inside, on, after} our end". In the `Before` and `On` rows,
/// ending on our end and ending after it collapse into one `EndAfter` variant.
/// Those two are the full-containment cases that delete a range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntersectionType {
    /// Change ends strictly before our start
    Before,
    /// Change starts strictly after our end
    After,
    /// Change ends exactly at our start (or an insertion sits on our start)
    TouchesStart,
    /// Change starts exactly at our end (or an insertion sits on our end)
    TouchesEnd,
    StartBeforeEndInside,
    StartBeforeEndAfter,
    StartOnEndInside,
    StartOnEndAfter,
    StartInsideEndInside,
    StartInsideEndOn,
    StartInsideEndAfter,
    /// Malformed input (reversed range); treated as a no-op
    Unknown,
}

impl IntersectionType {
    /// Change starts at-or-before our start and ends at-or-after our end.
    pub fn is_full_containment(self) -> bool {
        matches!(
            self,
            IntersectionType::StartBeforeEndAfter | IntersectionType::StartOnEndAfter
        )
    }
}

/// Classify `change` against the tracked interval `[start, end]`.
///
/// An empty `change` is an insertion point and is classified by where that
/// point falls. A non-empty `change` checks containment before touching, so
/// an empty tracked range swallowed by a deletion is contained rather than touched.
pub fn classify(change: &Range, start: Position, end: Position) -> IntersectionType {
    use IntersectionType::*;

    if start > end || change.start > change.end {
        return Unknown;
    }

    if change.is_empty() {
        let point = change.start;
        return if point < start {
            Before
        } else if point == start {
            TouchesStart
        } else if point < end {
            StartInsideEndInside
        } else if point == end {
            TouchesEnd
        } else {
            After
        };
    }

    let (cs, ce) = (change.start, change.end);

    if ce < start {
        return Before;
    }
    if cs > end {
        return After;
    }
    if cs <= start && ce >= end {
        return if cs < start {
            StartBeforeEndAfter
        } else {
            StartOnEndAfter
        };
    }
    if ce == start {
        return TouchesStart;
    }
    if cs == end {
        return TouchesEnd;
    }

    // From here the change overlaps us without covering us
    if cs < start {
        StartBeforeEndInside
    } else if cs == start {
        StartOnEndInside
    } else if ce < end {
        StartInsideEndInside
    } else if ce == end {
        StartInsideEndOn
    } else {
        StartInsideEndAfter
    }
}
