//! Matching a scope tree against a historical snapshot of it.
//!
//! Each current node is looked up in the historical tree with
//! `ScopeTree::get_node_of_best_match`; historical nodes nobody matched are
//! then reported as removed.

pub mod compare;
pub mod similarity;

pub use compare::{CompareResult, CompareStatus, PositionDelta, SIMILARITY_THRESHOLD, compare};
pub use similarity::{levenshtein, similarity, token_text};

use crate::scope::{LexicalNode, ScopeKind, ScopeTree};
use serde::Serialize;
use std::collections::HashSet;

/// One line of a reconciliation: a node and how it fared.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeMatch {
    pub node_id: String,
    pub name: String,
    pub kind: ScopeKind,
    pub result: CompareResult,
}

impl NodeMatch {
    fn new(node: &LexicalNode, result: CompareResult) -> Self {
        Self {
            node_id: node.id().to_string(),
            name: node.name().to_string(),
            kind: node.kind(),
            result,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ReconcileReport {
    /// One entry per current node, in pre-order
    pub matches: Vec<NodeMatch>,
    /// Historical nodes with no current counterpart, in pre-order
    pub removed: Vec<NodeMatch>,
}

impl ReconcileReport {
    pub fn count(&self, status: CompareStatus) -> usize {
        self.matches
            .iter()
            .chain(&self.removed)
            .filter(|entry| entry.result.status == status)
            .count()
    }

    /// Matches first, then removals.
    pub fn entries(&self) -> impl Iterator<Item = &NodeMatch> {
        self.matches.iter().chain(&self.removed)
    }
}

pub fn reconcile(current: &ScopeTree, historical: &ScopeTree) -> ReconcileReport {
    let mut report = ReconcileReport::default();
    let mut claimed = HashSet::new();

    for tree in current.pre_order() {
        let result = historical.get_node_of_best_match(tree.data());
        if let Some(id) = &result.matched {
            claimed.insert(id.clone());
        }
        report.matches.push(NodeMatch::new(tree.data(), result));
    }

    for tree in historical.pre_order() {
        if !claimed.contains(tree.id()) {
            let result = CompareResult::removed(tree.data());
            report.removed.push(NodeMatch::new(tree.data(), result));
        }
    }

    log::debug!(
        target: "scopetrack::reconcile",
        "Reconciled {} nodes: {} same, {} modified, {} unknown, {} removed",
        report.matches.len(),
        report.count(CompareStatus::Same),
        report.count(CompareStatus::Modified),
        report.count(CompareStatus::Unknown),
        report.removed.len()
    );

    report
}
