use super::ScopeKind;
use crate::context::TrackerContext;
use crate::document::TextDocument;
use crate::error::{TrackerError, TrackerResult};
use crate::text::Range;
use crate::tracking::{SerializedLocation, TrackedLocation};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// One lexical scope: what kind it is, what it is called and where it lives.
///
/// The id is a ULID shared with the wrapped location.
#[derive(Debug, PartialEq)]
pub struct LexicalNode {
    kind: ScopeKind,
    location: TrackedLocation,
    id: String,
    name: String,
}

/// Persisted form of a `LexicalNode`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedNode {
    pub kind: ScopeKind,
    pub location: SerializedLocation,
    pub id: String,
    #[serde(default)]
    pub name: String,
}

impl LexicalNode {
    pub fn new(
        context: &TrackerContext,
        document: &TextDocument,
        range: Range,
        kind: ScopeKind,
        name: impl Into<String>,
    ) -> Self {
        let id = Ulid::new().to_string();
        let location = TrackedLocation::new(context, document, range);
        location.set_id(id.clone());
        Self {
            kind,
            location,
            id,
            name: name.into(),
        }
    }

    pub fn kind(&self) -> ScopeKind {
        self.kind
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> &TrackedLocation {
        &self.location
    }

    pub fn location_mut(&mut self) -> &mut TrackedLocation {
        &mut self.location
    }

    pub fn range(&self) -> Range {
        self.location.range()
    }

    pub fn content(&self) -> &str {
        self.location.content()
    }

    pub fn is_deleted(&self) -> bool {
        self.location.is_deleted()
    }

    pub fn serialize(&self) -> SerializedNode {
        SerializedNode {
            kind: self.kind,
            location: self.location.serialize(),
            id: self.id.clone(),
            name: self.name.clone(),
        }
    }

    pub fn deserialize(record: SerializedNode, context: &TrackerContext) -> TrackerResult<Self> {
        if record.id.is_empty() {
            return Err(TrackerError::deserialize("node record without id"));
        }
        let location = TrackedLocation::deserialize(record.location, context)?;
        if location.id().is_none() {
            location.set_id(record.id.clone());
        }
        Ok(Self {
            kind: record.kind,
            location,
            id: record.id,
            name: record.name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TrackerConfig;
    use url::Url;

    fn setup() -> (TrackerContext, TextDocument) {
        let context = TrackerContext::new(TrackerConfig::defaults().unwrap());
        let document = TextDocument::new(
            Url::parse("file:///test/lib.rs").unwrap(),
            "fn run() {\n    go();\n}\n",
        );
        (context, document)
    }

    #[test]
    fn test_new_node_shares_id_with_location() {
        let (context, document) = setup();
        let node = LexicalNode::new(
            &context,
            &document,
            Range::from_coords(0, 9, 2, 1),
            ScopeKind::Function,
            "run",
        );

        assert_eq!(node.id().len(), 26);
        assert_eq!(node.location().id(), Some(node.id()));
        assert_eq!(node.content(), "{\n    go();\n}");
    }

    #[test]
    fn test_serialized_shape() {
        let (context, document) = setup();
        let node = LexicalNode::new(
            &context,
            &document,
            Range::from_coords(0, 9, 2, 1),
            ScopeKind::Function,
            "run",
        );

        let json = serde_json::to_value(node.serialize()).unwrap();
        assert_eq!(json["kind"], "function");
        assert_eq!(json["name"], "run");
        assert_eq!(json["id"], node.id());
        assert_eq!(json["location"]["id"], node.id());
        assert_eq!(json["location"]["range"]["start"]["character"], 9);
    }

    #[test]
    fn test_deserialize_round_trip_and_missing_name() {
        let (context, document) = setup();
        let node = LexicalNode::new(
            &context,
            &document,
            Range::from_coords(0, 9, 2, 1),
            ScopeKind::Block,
            "",
        );

        let mut json = serde_json::to_value(node.serialize()).unwrap();
        json.as_object_mut().unwrap().remove("name");

        let record: SerializedNode = serde_json::from_value(json).unwrap();
        let restored = LexicalNode::deserialize(record, &context).unwrap();
        assert_eq!(restored, node);
    }

    #[test]
    fn test_deserialize_backfills_location_id() {
        let (context, document) = setup();
        let node = LexicalNode::new(
            &context,
            &document,
            Range::from_coords(0, 0, 0, 2),
            ScopeKind::Declaration,
            "fn",
        );
        let mut record = node.serialize();
        record.location.id = None;

        let restored = LexicalNode::deserialize(record, &context).unwrap();
        assert_eq!(restored.location().id(), Some(node.id()));
    }
}
