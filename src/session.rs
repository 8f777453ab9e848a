//! Tracking session: one scope tree per open document, kept current by
//! dispatching every workspace event through the trees synchronously.

use crate::config::TrackerConfig;
use crate::context::TrackerContext;
use crate::document::TextDocument;
use crate::error::{TrackerError, TrackerResult};
use crate::events::Delivery;
use crate::reconcile::{ReconcileReport, reconcile};
use crate::scope::{DeserializeReport, ScopeTree, SerializedScope, TreeEvent, build_document_tree};
use crate::text::{ContentChange, Position, Selection};
use crate::workspace::Workspace;
use std::collections::BTreeMap;
use tree_sitter::Language;
use url::Url;

pub struct Tracker {
    context: TrackerContext,
    workspace: Workspace,
    trees: BTreeMap<Url, ScopeTree>,
    language: Language,
}

impl Tracker {
    pub fn new(config: TrackerConfig, language: Language) -> Self {
        let context = TrackerContext::new(config);
        let workspace = Workspace::new(context.bus().clone());
        Self {
            context,
            workspace,
            trees: BTreeMap::new(),
            language,
        }
    }

    /// A session parsing documents as Rust.
    pub fn rust(config: TrackerConfig) -> Self {
        Self::new(config, tree_sitter_rust::LANGUAGE.into())
    }

    pub fn context(&self) -> &TrackerContext {
        &self.context
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// Open (or reopen) `uri` and build its scope tree.
    ///
    /// The tree is built before the workspace sees the document, so a parse
    /// failure leaves any previous text and tree in place.
    pub fn open(&mut self, uri: Url, text: impl Into<String>) -> TrackerResult<&ScopeTree> {
        self.open_with(TextDocument::new(uri, text), build_document_tree)
    }

    pub fn tree(&self, uri: &Url) -> Option<&ScopeTree> {
        self.trees.get(uri)
    }

    pub fn uris(&self) -> impl Iterator<Item = &Url> {
        self.trees.keys()
    }

    pub fn apply_change(&mut self, uri: &Url, change: ContentChange) -> TrackerResult<Vec<TreeEvent>> {
        let delivery = self.workspace.apply_change(uri, change)?;
        self.dispatch(&delivery)
    }

    /// Full-document sync: diff against the current text and apply the result
    /// as one change.
    pub fn replace_text(&mut self, uri: &Url, text: &str) -> TrackerResult<Vec<TreeEvent>> {
        match self.workspace.replace_text(uri, text)? {
            Some(delivery) => self.dispatch(&delivery),
            None => Ok(Vec::new()),
        }
    }

    pub fn select(&mut self, uri: &Url, selections: Vec<Selection>) -> TrackerResult<Vec<TreeEvent>> {
        let delivery = self.workspace.set_selections(uri, selections)?;
        self.dispatch(&delivery)
    }

    pub fn set_active_editor(&mut self, uri: Option<Url>) -> TrackerResult<Vec<TreeEvent>> {
        let delivery = self.workspace.set_active_editor(uri);
        self.dispatch(&delivery)
    }

    pub fn set_visible_editors(&mut self, uris: Vec<Url>) -> TrackerResult<Vec<TreeEvent>> {
        let delivery = self.workspace.set_visible_editors(uris);
        self.dispatch(&delivery)
    }

    pub fn snapshot(&self, uri: &Url) -> TrackerResult<Vec<SerializedScope>> {
        Ok(self.require_tree(uri)?.serialize())
    }

    /// Load a snapshot as a detached tree. Its locations subscribe to this
    /// session's bus but are never dispatched to.
    pub fn restore(
        &self,
        records: Vec<SerializedScope>,
    ) -> TrackerResult<(ScopeTree, DeserializeReport)> {
        ScopeTree::deserialize(records, &self.context)
    }

    /// Match the live tree of `uri` against `historical`.
    pub fn reconcile(&self, uri: &Url, historical: &ScopeTree) -> TrackerResult<ReconcileReport> {
        Ok(reconcile(self.require_tree(uri)?, historical))
    }

    /// Innermost scope enclosing `position`.
    pub fn scope_at(&self, uri: &Url, position: Position) -> TrackerResult<Option<&ScopeTree>> {
        Ok(self
            .require_tree(uri)?
            .get_last_node_in_path(|node| node.range().contains(position)))
    }

    /// Close `uri`, dropping its tree and every subscription it held.
    pub fn close(&mut self, uri: &Url) -> bool {
        let had_tree = self.trees.remove(uri).is_some();
        self.workspace.close(uri).is_some() || had_tree
    }

    fn open_with<F>(&mut self, document: TextDocument, build: F) -> TrackerResult<&ScopeTree>
    where
        F: FnOnce(&TrackerContext, &TextDocument, &Language) -> TrackerResult<ScopeTree>,
    {
        let tree = build(&self.context, &document, &self.language)?;
        let uri = document.uri().clone();
        // Releases the old tree's subscriptions
        self.trees.remove(&uri);
        self.workspace.open(document);
        Ok(&*self.trees.entry(uri).or_insert(tree))
    }

    fn require_tree(&self, uri: &Url) -> TrackerResult<&ScopeTree> {
        self.trees
            .get(uri)
            .ok_or_else(|| TrackerError::document_not_found(uri.as_str()))
    }

    fn parse_tree(&self, uri: &Url) -> TrackerResult<ScopeTree> {
        let document = self
            .workspace
            .documents()
            .get(uri)
            .ok_or_else(|| TrackerError::document_not_found(uri.as_str()))?;
        build_document_tree(&self.context, document, &self.language)
    }

    fn dispatch(&mut self, delivery: &Delivery) -> TrackerResult<Vec<TreeEvent>> {
        let mut events = Vec::new();
        for tree in self.trees.values_mut() {
            events.extend(tree.dispatch(delivery, &self.workspace));
        }

        // A deleted root means the whole text went away at once; start over
        let stale: Vec<Url> = self
            .trees
            .iter()
            .filter(|(_, tree)| tree.data().is_deleted())
            .map(|(uri, _)| uri.clone())
            .collect();
        for uri in stale {
            log::debug!(
                target: "scopetrack::scope",
                "Root scope of {} deleted; rebuilding",
                uri
            );
            self.trees.remove(&uri);
            let tree = self.parse_tree(&uri)?;
            self.trees.insert(uri, tree);
        }

        Ok(events)
    }
}
