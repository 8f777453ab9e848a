//! Flat persisted form of a scope tree.
//!
//! A tree is stored as a list of node records in `level_order`, each carrying
//! its parent's id and its depth. Loading does not require the list to be
//! topologically sorted: a record whose parent has not been seen yet is put
//! under the root and counted as orphaned.

use super::{LexicalNode, ScopeTree, SerializedNode};
use crate::context::TrackerContext;
use crate::error::{TrackerError, TrackerResult};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedScope {
    #[serde(flatten)]
    pub node: SerializedNode,
    pub parent: Option<String>,
    pub depth: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeserializeReport {
    /// Ids of records placed under the root because their parent was unknown
    pub orphaned: Vec<String>,
}

impl DeserializeReport {
    pub fn is_clean(&self) -> bool {
        self.orphaned.is_empty()
    }
}

impl ScopeTree {
    pub fn serialize(&self) -> Vec<SerializedScope> {
        self.level_order()
            .into_iter()
            .map(|tree| SerializedScope {
                node: tree.data().serialize(),
                parent: tree.parent_id().map(str::to_string),
                depth: tree.depth(),
            })
            .collect()
    }

    pub fn to_json(&self) -> TrackerResult<String> {
        Ok(serde_json::to_string_pretty(&self.serialize())?)
    }

    /// Rebuild a tree from records.
    ///
    /// The first parentless record is the root (the first record if none is).
    /// Depths are recomputed from where nodes end up; siblings are ordered by
    /// range start.
    pub fn deserialize(
        records: Vec<SerializedScope>,
        context: &TrackerContext,
    ) -> TrackerResult<(ScopeTree, DeserializeReport)> {
        if records.is_empty() {
            return Err(TrackerError::deserialize("scope tree without records"));
        }
        let root_index = records
            .iter()
            .position(|record| record.parent.is_none())
            .unwrap_or(0);

        let mut records: Vec<Option<SerializedScope>> = records.into_iter().map(Some).collect();
        let Some(root_record) = records[root_index].take() else {
            return Err(TrackerError::deserialize("scope tree without root"));
        };
        let mut tree = ScopeTree::new(LexicalNode::deserialize(root_record.node, context)?);
        let mut report = DeserializeReport::default();

        for record in records.into_iter().flatten() {
            let data = LexicalNode::deserialize(record.node, context)?;
            let parent = record
                .parent
                .as_deref()
                .and_then(|parent_id| tree.find_by_id_mut(parent_id));

            match parent {
                Some(parent) => {
                    parent.insert(data);
                }
                None => {
                    log::warn!(
                        target: "scopetrack::scope",
                        "Parent {:?} of scope {} not found; placing it under the root",
                        record.parent,
                        data.id()
                    );
                    report.orphaned.push(data.id().to_string());
                    tree.insert(data);
                }
            }
        }

        tree.sort_children_by_position();
        Ok((tree, report))
    }

    pub fn from_json(
        json: &str,
        context: &TrackerContext,
    ) -> TrackerResult<(ScopeTree, DeserializeReport)> {
        let records: Vec<SerializedScope> = serde_json::from_str(json)?;
        Self::deserialize(records, context)
    }
}
