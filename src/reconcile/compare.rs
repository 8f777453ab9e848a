use super::similarity::similarity;
use crate::scope::LexicalNode;
use crate::text::{Position, Range};
use serde::Serialize;

/// Score a node must exceed to count as a modified version of another.
pub const SIMILARITY_THRESHOLD: f64 = 0.6;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CompareStatus {
    Same,
    Modified,
    Removed,
    Unknown,
}

impl CompareStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompareStatus::Same => "SAME",
            CompareStatus::Modified => "MODIFIED",
            CompareStatus::Removed => "REMOVED",
            CompareStatus::Unknown => "UNKNOWN",
        }
    }
}

/// Candidate minus historical, per coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionDelta {
    pub start_line: i64,
    pub start_character: i64,
    pub end_line: i64,
    pub end_character: i64,
}

impl PositionDelta {
    pub fn between(candidate: Range, historical: Range) -> Self {
        let diff = |a: u32, b: u32| i64::from(a) - i64::from(b);
        let (cs, ce): (Position, Position) = (candidate.start, candidate.end);
        let (hs, he) = (historical.start, historical.end);
        Self {
            start_line: diff(cs.line, hs.line),
            start_character: diff(cs.character, hs.character),
            end_line: diff(ce.line, he.line),
            end_character: diff(ce.character, he.character),
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareResult {
    pub status: CompareStatus,
    /// Id of the historical node this result refers to
    pub matched: Option<String>,
    pub score: f64,
    pub delta: PositionDelta,
}

impl CompareResult {
    /// Nothing in the searched tree was close enough.
    pub fn unknown() -> Self {
        Self {
            status: CompareStatus::Unknown,
            matched: None,
            score: 0.0,
            delta: PositionDelta::default(),
        }
    }

    /// `historical` has no counterpart in the current tree.
    pub fn removed(historical: &LexicalNode) -> Self {
        Self {
            status: CompareStatus::Removed,
            matched: Some(historical.id().to_string()),
            score: 0.0,
            delta: PositionDelta::default(),
        }
    }

    pub fn is_match(&self) -> bool {
        matches!(self.status, CompareStatus::Same | CompareStatus::Modified)
    }
}

/// Classify `candidate` against one `historical` node.
pub fn compare(candidate: &LexicalNode, historical: &LexicalNode) -> CompareResult {
    let score = similarity(candidate.content(), historical.content());
    let delta = PositionDelta::between(candidate.range(), historical.range());

    let status = if score >= 1.0
        && candidate.kind() == historical.kind()
        && candidate.name() == historical.name()
    {
        CompareStatus::Same
    } else if score > SIMILARITY_THRESHOLD {
        CompareStatus::Modified
    } else {
        CompareStatus::Unknown
    };

    log::trace!(
        target: "scopetrack::reconcile",
        "{} '{}' vs '{}': {} ({:.3})",
        candidate.kind(),
        candidate.name(),
        historical.name(),
        status.as_str(),
        score
    );

    CompareResult {
        matched: (status != CompareStatus::Unknown).then(|| historical.id().to_string()),
        status,
        score,
        delta,
    }
}
