use super::range::{RangeUpdate, TrackedRange};
use crate::context::TrackerContext;
use crate::document::{DocumentProvider, TextDocument};
use crate::error::{TrackerError, TrackerResult};
use crate::events::{Delivery, Disposables, DocumentEvent, EventKind};
use crate::text::{ContentChange, Position, Range, Selection};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cell::OnceCell;
use url::Url;

/// Something observers of a location care about.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LocationEvent {
    /// The word-snapped range moved or resized
    Changed { previous: Range, current: Range },
    /// The primary selection's anchor landed inside the range
    Selected { anchor: Position },
    /// A deletion swallowed the range; the location is finished
    Deleted { last: Range },
    /// The document became active or visible; content was re-read
    Refreshed {
        range: Range,
        decoration: Option<String>,
    },
}

/// Persisted form of a `TrackedLocation`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedLocation {
    pub document_id: String,
    pub range: Range,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// A tracked range bound to one document and its event stream.
///
/// Not `Clone`: each location owns its subscriptions. Snapshot through
/// `serialize` instead.
#[derive(Debug)]
pub struct TrackedLocation {
    uri: Url,
    range: TrackedRange,
    content: String,
    id: OnceCell<String>,
    decoration: Option<String>,
    word_pattern: Regex,
    subscriptions: Disposables,
}

impl TrackedLocation {
    /// Track `range` in `document`, subscribing to its change, selection and
    /// visibility events.
    pub fn new(context: &TrackerContext, document: &TextDocument, range: Range) -> Self {
        let mut tracked = TrackedRange::from_range(range);
        tracked.set_cached_length(document.char_distance(tracked.range()));
        let content = document.text_in(tracked.range()).to_string();
        Self::assemble(context, document.uri().clone(), tracked, content, None)
    }

    fn assemble(
        context: &TrackerContext,
        uri: Url,
        range: TrackedRange,
        content: String,
        id: Option<String>,
    ) -> Self {
        let bus = context.bus();
        let mut subscriptions = Disposables::new();
        subscriptions.push(bus.subscribe(EventKind::ContentChanged, Some(&uri)));
        subscriptions.push(bus.subscribe(EventKind::SelectionChanged, Some(&uri)));
        subscriptions.push(bus.subscribe(EventKind::ActiveEditorChanged, None));
        subscriptions.push(bus.subscribe(EventKind::VisibleEditorsChanged, None));

        let id_cell = OnceCell::new();
        if let Some(id) = id {
            let _ = id_cell.set(id);
        }

        Self {
            uri,
            range,
            content,
            id: id_cell,
            decoration: context.config().decoration.clone(),
            word_pattern: context.word_pattern().clone(),
            subscriptions,
        }
    }

    pub fn uri(&self) -> &Url {
        &self.uri
    }

    pub fn range(&self) -> Range {
        self.range.range()
    }

    pub fn tracked_range(&self) -> &TrackedRange {
        &self.range
    }

    /// Cached text covered by the range.
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn id(&self) -> Option<&str> {
        self.id.get().map(String::as_str)
    }

    /// Assign the identifier.
    ///
    /// # Panics
    ///
    /// If an identifier was already assigned.
    pub fn set_id(&self, id: impl Into<String>) {
        let id = id.into();
        if let Err(rejected) = self.id.set(id) {
            panic!(
                "TrackedLocation id can only be set once (had {:?}, got {:?})",
                self.id.get(),
                rejected
            );
        }
    }

    pub fn decoration(&self) -> Option<&str> {
        self.decoration.as_deref()
    }

    pub fn is_deleted(&self) -> bool {
        self.range.is_deleted()
    }

    pub fn is_disposed(&self) -> bool {
        self.subscriptions.is_disposed()
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Release every subscription without reporting a deletion.
    pub fn dispose(&mut self) {
        self.subscriptions.dispose();
    }

    /// React to one bus delivery. Deliveries not addressed to this location
    /// are ignored.
    pub fn handle(
        &mut self,
        delivery: &Delivery,
        documents: &impl DocumentProvider,
    ) -> Option<LocationEvent> {
        if !self.subscriptions.receives(delivery) {
            return None;
        }

        match &delivery.event {
            DocumentEvent::ContentChanged { uri, change } if *uri == self.uri => {
                let document = documents.document(uri)?;
                self.on_content_changed(change, document)
            }
            DocumentEvent::SelectionChanged { uri, selections } if *uri == self.uri => {
                self.on_selection_changed(selections)
            }
            DocumentEvent::ActiveEditorChanged { uri: Some(uri) } if *uri == self.uri => {
                self.refresh(documents)
            }
            DocumentEvent::VisibleEditorsChanged { uris } if uris.contains(&self.uri) => {
                self.refresh(documents)
            }
            _ => None,
        }
    }

    fn on_content_changed(
        &mut self,
        change: &ContentChange,
        document: &TextDocument,
    ) -> Option<LocationEvent> {
        let before = self.range.range();

        match self.range.update(change) {
            RangeUpdate::Ignored => None,
            RangeUpdate::Deleted => {
                log::debug!(
                    target: "scopetrack::location",
                    "Location {} in {} deleted",
                    before,
                    self.uri
                );
                self.subscriptions.dispose();
                Some(LocationEvent::Deleted { last: before })
            }
            RangeUpdate::Unchanged => {
                self.content = document.text_in(before).to_string();
                None
            }
            RangeUpdate::Rebased { previous } => {
                let snapped = document.snap_to_words(self.range.range(), &self.word_pattern);
                self.range.set_bounds(snapped.start, snapped.end);
                self.range.set_cached_length(document.char_distance(snapped));
                self.content = document.text_in(snapped).to_string();

                let current = self.range.range();
                log::trace!(
                    target: "scopetrack::location",
                    "Location rebased {} -> {}",
                    previous,
                    current
                );
                (current != previous).then_some(LocationEvent::Changed { previous, current })
            }
        }
    }

    fn on_selection_changed(&self, selections: &[Selection]) -> Option<LocationEvent> {
        let primary = selections.first()?;
        self.range
            .range()
            .contains(primary.anchor)
            .then_some(LocationEvent::Selected {
                anchor: primary.anchor,
            })
    }

    fn refresh(&mut self, documents: &impl DocumentProvider) -> Option<LocationEvent> {
        if let Some(document) = documents.document(&self.uri) {
            self.content = document.text_in(self.range.range()).to_string();
        }
        Some(LocationEvent::Refreshed {
            range: self.range.range(),
            decoration: self.decoration.clone(),
        })
    }

    pub fn serialize(&self) -> SerializedLocation {
        SerializedLocation {
            document_id: self.uri.to_string(),
            range: self.range.range(),
            content: self.content.clone(),
            id: self.id.get().cloned(),
        }
    }

    /// Rebuild a location from its persisted form and subscribe it afresh.
    ///
    /// The range is not validated against any live document; `content` is
    /// trusted as a snapshot.
    pub fn deserialize(record: SerializedLocation, context: &TrackerContext) -> TrackerResult<Self> {
        let uri = Url::parse(&record.document_id).map_err(|e| {
            TrackerError::deserialize(format!("invalid documentId {:?}: {}", record.document_id, e))
        })?;
        let mut range = TrackedRange::from_range(record.range);
        if !range.is_single_line() {
            range.set_cached_length(crate::text::utf16_len(&record.content));
        }
        Ok(Self::assemble(context, uri, range, record.content, record.id))
    }
}

impl PartialEq for TrackedLocation {
    fn eq(&self, other: &Self) -> bool {
        self.uri == other.uri
            && self.range == other.range
            && self.content == other.content
            && self.id.get() == other.id.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TrackerConfig;
    use crate::document::DocumentStore;

    fn uri() -> Url {
        Url::parse("file:///test/main.rs").unwrap()
    }

    fn setup(text: &str) -> (TrackerContext, DocumentStore) {
        let context = TrackerContext::new(TrackerConfig::defaults().unwrap());
        let mut store = DocumentStore::new();
        store.insert(uri(), text);
        (context, store)
    }

    fn publish_change(
        context: &TrackerContext,
        store: &mut DocumentStore,
        change: ContentChange,
    ) -> Delivery {
        store.apply_change(&uri(), &change).unwrap();
        context.bus().publish(DocumentEvent::ContentChanged {
            uri: uri(),
            change,
        })
    }

    #[test]
    fn test_new_location_caches_content_and_subscribes() {
        let (context, store) = setup("let alpha = beta;\n");
        let location = TrackedLocation::new(
            &context,
            store.get(&uri()).unwrap(),
            Range::from_coords(0, 4, 0, 9),
        );

        assert_eq!(location.content(), "alpha");
        assert_eq!(location.tracked_range().cached_length(), 5);
        assert_eq!(location.subscription_count(), 4);
        assert_eq!(context.bus().subscriber_count(), 4);
    }

    #[test]
    fn test_change_snaps_to_words_and_emits_changed() {
        // Given "alpha" tracked in "let alpha = beta;"
        let (context, mut store) = setup("let alpha = beta;\n");
        let mut location = TrackedLocation::new(
            &context,
            store.get(&uri()).unwrap(),
            Range::from_coords(0, 4, 0, 9),
        );

        // When "x" is typed right before the range
        let delivery = publish_change(
            &context,
            &mut store,
            ContentChange::insert(Position::new(0, 4), "x"),
        );
        let event = location.handle(&delivery, &store);

        // Then the range moves, but snapping widens it back over "xalpha"
        assert_eq!(
            event,
            Some(LocationEvent::Changed {
                previous: Range::from_coords(0, 4, 0, 9),
                current: Range::from_coords(0, 4, 0, 10),
            })
        );
        assert_eq!(location.content(), "xalpha");
    }

    #[test]
    fn test_snap_back_to_previous_range_emits_nothing() {
        // Given "alpha" tracked at [4, 9)
        let (context, mut store) = setup("let alpha = beta;\n");
        let mut location = TrackedLocation::new(
            &context,
            store.get(&uri()).unwrap(),
            Range::from_coords(0, 4, 0, 9),
        );

        // When the first letter is replaced by its capital
        let delivery = publish_change(
            &context,
            &mut store,
            ContentChange::new(Range::from_coords(0, 4, 0, 5), "A"),
        );

        // Then rebasing moves the start, snapping restores it, and no event fires
        assert_eq!(location.handle(&delivery, &store), None);
        assert_eq!(location.range(), Range::from_coords(0, 4, 0, 9));
        assert_eq!(location.content(), "Alpha");
    }

    #[test]
    fn test_containing_deletion_emits_deleted_once_and_unsubscribes() {
        let (context, mut store) = setup("a\nfn f() {}\nb\n");
        let mut location = TrackedLocation::new(
            &context,
            store.get(&uri()).unwrap(),
            Range::from_coords(1, 0, 1, 9),
        );

        let delivery = publish_change(
            &context,
            &mut store,
            ContentChange::delete(Range::from_coords(0, 1, 2, 0)),
        );
        assert_eq!(
            location.handle(&delivery, &store),
            Some(LocationEvent::Deleted {
                last: Range::from_coords(1, 0, 1, 9)
            })
        );
        assert!(location.is_deleted());
        assert!(location.is_disposed());
        assert_eq!(context.bus().subscriber_count(), 0);

        // Replayed edits no longer reach the location
        let delivery = publish_change(
            &context,
            &mut store,
            ContentChange::insert(Position::new(0, 0), "z"),
        );
        assert_eq!(location.handle(&delivery, &store), None);
    }

    #[test]
    fn test_selection_anchor_inside_range_is_selected() {
        let (context, store) = setup("let alpha = beta;\n");
        let mut location = TrackedLocation::new(
            &context,
            store.get(&uri()).unwrap(),
            Range::from_coords(0, 4, 0, 9),
        );

        let on_end = context.bus().publish(DocumentEvent::SelectionChanged {
            uri: uri(),
            selections: vec![Selection::caret(Position::new(0, 9))],
        });
        assert_eq!(
            location.handle(&on_end, &store),
            Some(LocationEvent::Selected {
                anchor: Position::new(0, 9)
            })
        );

        // Only the primary selection counts
        let secondary_inside = context.bus().publish(DocumentEvent::SelectionChanged {
            uri: uri(),
            selections: vec![
                Selection::caret(Position::new(0, 14)),
                Selection::caret(Position::new(0, 5)),
            ],
        });
        assert_eq!(location.handle(&secondary_inside, &store), None);
    }

    #[test]
    fn test_visibility_refresh_carries_decoration() {
        let config = TrackerConfig {
            decoration: Some("outline".to_string()),
            ..TrackerConfig::defaults().unwrap()
        };
        let context = TrackerContext::new(config);
        let mut store = DocumentStore::new();
        store.insert(uri(), "fn a() {}\n");
        let mut location = TrackedLocation::new(
            &context,
            store.get(&uri()).unwrap(),
            Range::from_coords(0, 0, 0, 9),
        );

        let hidden = context.bus().publish(DocumentEvent::VisibleEditorsChanged {
            uris: vec![Url::parse("file:///test/other.rs").unwrap()],
        });
        assert_eq!(location.handle(&hidden, &store), None);

        let visible = context.bus().publish(DocumentEvent::VisibleEditorsChanged { uris: vec![uri()] });
        assert_eq!(
            location.handle(&visible, &store),
            Some(LocationEvent::Refreshed {
                range: Range::from_coords(0, 0, 0, 9),
                decoration: Some("outline".to_string()),
            })
        );
    }

    #[test]
    fn test_events_for_other_documents_are_ignored() {
        let (context, store) = setup("fn a() {}\n");
        let mut location = TrackedLocation::new(
            &context,
            store.get(&uri()).unwrap(),
            Range::from_coords(0, 0, 0, 9),
        );

        let other = context.bus().publish(DocumentEvent::ContentChanged {
            uri: Url::parse("file:///test/other.rs").unwrap(),
            change: ContentChange::insert(Position::new(0, 0), "x"),
        });
        assert_eq!(location.handle(&other, &store), None);
        assert_eq!(location.range(), Range::from_coords(0, 0, 0, 9));
    }

    #[test]
    #[should_panic(expected = "can only be set once")]
    fn test_set_id_twice_panics() {
        let (context, store) = setup("x\n");
        let location =
            TrackedLocation::new(&context, store.get(&uri()).unwrap(), Range::from_coords(0, 0, 0, 1));
        location.set_id("first");
        location.set_id("second");
    }

    #[test]
    fn test_serialize_round_trip_resubscribes() {
        let (context, store) = setup("fn a() {\n    1\n}\n");
        let location = TrackedLocation::new(
            &context,
            store.get(&uri()).unwrap(),
            Range::from_coords(0, 7, 2, 1),
        );
        location.set_id("01J0000000000000000000000");

        let record = location.serialize();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["documentId"], "file:///test/main.rs");
        assert_eq!(json["content"], "{\n    1\n}");

        let restored = TrackedLocation::deserialize(serde_json::from_value(json).unwrap(), &context)
            .unwrap();
        assert_eq!(restored, location);
        assert_eq!(restored.subscription_count(), 4);
        assert_eq!(restored.tracked_range().cached_length(), 9);
    }

    #[test]
    fn test_deserialize_rejects_bad_document_id() {
        let (context, _store) = setup("x\n");
        let record = SerializedLocation {
            document_id: "not a uri".to_string(),
            range: Range::default(),
            content: String::new(),
            id: None,
        };
        assert!(matches!(
            TrackedLocation::deserialize(record, &context),
            Err(TrackerError::Deserialize { .. })
        ));
    }

    #[test]
    fn test_dispose_and_drop_release_subscriptions() {
        let (context, store) = setup("x\n");
        let document = store.get(&uri()).unwrap();

        let mut disposed = TrackedLocation::new(&context, document, Range::from_coords(0, 0, 0, 1));
        disposed.dispose();
        assert!(!disposed.is_deleted());
        assert_eq!(context.bus().subscriber_count(), 0);

        let dropped = TrackedLocation::new(&context, document, Range::from_coords(0, 0, 0, 1));
        assert_eq!(context.bus().subscriber_count(), 4);
        drop(dropped);
        assert_eq!(context.bus().subscriber_count(), 0);
    }
}
