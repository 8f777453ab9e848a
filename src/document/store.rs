use super::{DocumentProvider, TextDocument};
use crate::error::{TrackerError, TrackerResult};
use crate::text::ContentChange;
use std::collections::HashMap;
use url::Url;

/// The central store for open documents.
#[derive(Debug, Default)]
pub struct DocumentStore {
    documents: HashMap<Url, TextDocument>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open (or reopen) a document, replacing any previous text.
    pub fn insert(&mut self, uri: Url, text: impl Into<String>) -> &TextDocument {
        self.insert_document(TextDocument::new(uri, text))
    }

    pub fn insert_document(&mut self, document: TextDocument) -> &TextDocument {
        let uri = document.uri().clone();
        self.documents.insert(uri.clone(), document);
        &self.documents[&uri]
    }

    pub fn get(&self, uri: &Url) -> Option<&TextDocument> {
        self.documents.get(uri)
    }

    pub fn contains(&self, uri: &Url) -> bool {
        self.documents.contains_key(uri)
    }

    /// Apply one change record to an open document.
    pub fn apply_change(&mut self, uri: &Url, change: &ContentChange) -> TrackerResult<()> {
        self.documents
            .get_mut(uri)
            .ok_or_else(|| TrackerError::document_not_found(uri.as_str()))?
            .apply_change(change)
    }

    pub fn remove(&mut self, uri: &Url) -> Option<TextDocument> {
        self.documents.remove(uri)
    }

    pub fn uris(&self) -> impl Iterator<Item = &Url> {
        self.documents.keys()
    }
}

impl DocumentProvider for DocumentStore {
    fn document(&self, uri: &Url) -> Option<&TextDocument> {
        self.get(uri)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::Position;

    fn uri(name: &str) -> Url {
        Url::parse(&format!("file:///test/{}.rs", name)).unwrap()
    }

    #[test]
    fn test_insert_and_get() {
        let mut store = DocumentStore::new();
        store.insert(uri("a"), "fn a() {}");
        assert!(store.contains(&uri("a")));
        assert_eq!(store.get(&uri("a")).map(|d| d.text()), Some("fn a() {}"));
        assert!(store.get(&uri("b")).is_none());
    }

    #[test]
    fn test_apply_change_to_missing_document() {
        let mut store = DocumentStore::new();
        let result = store.apply_change(&uri("missing"), &ContentChange::insert(Position::new(0, 0), "x"));
        assert!(matches!(result, Err(TrackerError::DocumentNotFound { .. })));
    }

    #[test]
    fn test_remove_closes_document() {
        let mut store = DocumentStore::new();
        store.insert(uri("a"), "x");
        assert!(store.remove(&uri("a")).is_some());
        assert!(!store.contains(&uri("a")));
    }
}
