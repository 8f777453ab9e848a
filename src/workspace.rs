//! Open documents plus the editor state around them.
//!
//! The workspace is the single ordered event source: every mutation is
//! applied to the document store first and only then published, so a
//! location handling the resulting delivery always reads post-change text.

use crate::document::{DocumentProvider, DocumentStore, TextDocument};
use crate::error::{TrackerError, TrackerResult};
use crate::events::{Delivery, DocumentEvent, EventBus};
use crate::text::{ContentChange, Selection, reconstruct_change};
use std::collections::HashMap;
use url::Url;

#[derive(Debug)]
pub struct Workspace {
    documents: DocumentStore,
    bus: EventBus,
    active: Option<Url>,
    visible: Vec<Url>,
    selections: HashMap<Url, Vec<Selection>>,
}

impl Workspace {
    /// A workspace publishing on `bus`, usually a clone of the context's bus.
    pub fn new(bus: EventBus) -> Self {
        Self {
            documents: DocumentStore::new(),
            bus,
            active: None,
            visible: Vec::new(),
            selections: HashMap::new(),
        }
    }

    pub fn documents(&self) -> &DocumentStore {
        &self.documents
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// Open a document, replacing any previous one at its URI.
    pub fn open(&mut self, document: TextDocument) -> &TextDocument {
        self.documents.insert_document(document)
    }

    /// Forget a document and any editor state that refers to it.
    pub fn close(&mut self, uri: &Url) -> Option<TextDocument> {
        self.selections.remove(uri);
        self.visible.retain(|visible| visible != uri);
        if self.active.as_ref() == Some(uri) {
            self.active = None;
        }
        self.documents.remove(uri)
    }

    pub fn apply_change(&mut self, uri: &Url, change: ContentChange) -> TrackerResult<Delivery> {
        self.documents.apply_change(uri, &change)?;
        log::trace!(
            target: "scopetrack::events",
            "Applied change at {} to {}",
            change.range,
            uri
        );
        Ok(self.bus.publish(DocumentEvent::ContentChanged {
            uri: uri.clone(),
            change,
        }))
    }

    /// Replace the whole text of `uri`, publishing it as one merged change.
    /// Returns None when the text is unchanged.
    pub fn replace_text(&mut self, uri: &Url, text: &str) -> TrackerResult<Option<Delivery>> {
        let current = self
            .documents
            .get(uri)
            .ok_or_else(|| TrackerError::document_not_found(uri.as_str()))?;
        match reconstruct_change(current.text(), text) {
            Some(change) => self.apply_change(uri, change).map(Some),
            None => Ok(None),
        }
    }

    pub fn set_selections(
        &mut self,
        uri: &Url,
        selections: Vec<Selection>,
    ) -> TrackerResult<Delivery> {
        if !self.documents.contains(uri) {
            return Err(TrackerError::document_not_found(uri.as_str()));
        }
        self.selections.insert(uri.clone(), selections.clone());
        Ok(self.bus.publish(DocumentEvent::SelectionChanged {
            uri: uri.clone(),
            selections,
        }))
    }

    pub fn selections(&self, uri: &Url) -> &[Selection] {
        self.selections.get(uri).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn set_active_editor(&mut self, uri: Option<Url>) -> Delivery {
        self.active = uri.clone();
        self.bus.publish(DocumentEvent::ActiveEditorChanged { uri })
    }

    pub fn active_editor(&self) -> Option<&Url> {
        self.active.as_ref()
    }

    pub fn set_visible_editors(&mut self, uris: Vec<Url>) -> Delivery {
        self.visible = uris.clone();
        self.bus.publish(DocumentEvent::VisibleEditorsChanged { uris })
    }

    pub fn visible_editors(&self) -> &[Url] {
        &self.visible
    }
}

impl DocumentProvider for Workspace {
    fn document(&self, uri: &Url) -> Option<&TextDocument> {
        self.documents.get(uri)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;
    use crate::text::{Position, Range};

    fn uri() -> Url {
        Url::parse("file:///work/main.rs").unwrap()
    }

    #[test]
    fn test_change_is_applied_before_publishing() {
        let mut workspace = Workspace::new(EventBus::new());
        workspace.open(TextDocument::new(uri(), "fn main() {}\n"));
        let _subscription = workspace.bus().subscribe(EventKind::ContentChanged, Some(&uri()));

        let delivery = workspace
            .apply_change(&uri(), ContentChange::insert(Position::new(0, 0), "pub "))
            .unwrap();

        assert_eq!(delivery.recipient_count(), 1);
        assert_eq!(workspace.document(&uri()).unwrap().text(), "pub fn main() {}\n");
    }

    #[test]
    fn test_change_to_unknown_document_fails() {
        let mut workspace = Workspace::new(EventBus::new());
        let result = workspace.apply_change(&uri(), ContentChange::insert(Position::new(0, 0), "x"));
        assert!(matches!(result, Err(TrackerError::DocumentNotFound { .. })));
    }

    #[test]
    fn test_replace_text_publishes_merged_change() {
        let mut workspace = Workspace::new(EventBus::new());
        workspace.open(TextDocument::new(uri(), "let a = 1;\nlet b = 2;\n"));

        let delivery = workspace
            .replace_text(&uri(), "let a = 1;\nlet b = 42;\n")
            .unwrap()
            .unwrap();

        let DocumentEvent::ContentChanged { change, .. } = &delivery.event else {
            panic!("expected a content change, got {:?}", delivery.event);
        };
        assert_eq!(change.range, Range::from_coords(1, 8, 1, 8));
        assert_eq!(change.text, "4");
        assert!(workspace.replace_text(&uri(), "let a = 1;\nlet b = 42;\n").unwrap().is_none());
    }

    #[test]
    fn test_editor_state_is_tracked_and_cleared_on_close() {
        let mut workspace = Workspace::new(EventBus::new());
        workspace.open(TextDocument::new(uri(), "x"));
        workspace
            .set_selections(&uri(), vec![Selection::caret(Position::new(0, 1))])
            .unwrap();
        workspace.set_active_editor(Some(uri()));
        workspace.set_visible_editors(vec![uri()]);

        assert_eq!(workspace.selections(&uri()).len(), 1);
        assert_eq!(workspace.active_editor(), Some(&uri()));

        workspace.close(&uri());
        assert!(workspace.selections(&uri()).is_empty());
        assert_eq!(workspace.active_editor(), None);
        assert!(workspace.visible_editors().is_empty());
    }
}
