//! Scope tree construction from a syntax walk.
//!
//! The builder is a `SyntaxVisitor`: every node whose kind opens a scope is
//! labeled and pushed on enter, and popped on leave. Popped subtrees are
//! attached to whatever is open beneath them, so children end up in source
//! order.

use super::naming::{label_scope, root_label};
use super::{LexicalNode, ScopeKind, ScopeTree};
use crate::context::TrackerContext;
use crate::document::TextDocument;
use crate::error::TrackerResult;
use crate::syntax::{SyntaxNode, SyntaxVisitor, TraversalEvent, TsNode, parse_document, traverse};
use tree_sitter::Language;

/// Open scopes between the root and the node currently being visited.
#[derive(Debug)]
pub struct ScopeStack {
    root: ScopeTree,
    open: Vec<ScopeTree>,
}

impl ScopeStack {
    pub fn new(root: ScopeTree) -> Self {
        Self {
            root,
            open: Vec::new(),
        }
    }

    /// The innermost open scope.
    pub fn current(&self) -> &ScopeTree {
        self.open.last().unwrap_or(&self.root)
    }

    /// Open scopes above the root.
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    pub fn push(&mut self, data: LexicalNode) {
        let child = ScopeTree::child_of(self.current(), data);
        self.open.push(child);
    }

    /// Close the innermost scope and attach it to its parent.
    /// Returns false when only the root is left.
    pub fn pop(&mut self) -> bool {
        let Some(closed) = self.open.pop() else {
            return false;
        };
        match self.open.last_mut() {
            Some(parent) => parent.attach(closed),
            None => self.root.attach(closed),
        }
        true
    }

    /// Close everything still open and hand back the root.
    pub fn finish(mut self) -> ScopeTree {
        while self.pop() {}
        self.root
    }
}

pub struct ScopeTreeBuilder<'a> {
    context: &'a TrackerContext,
    document: &'a TextDocument,
    stack: ScopeStack,
}

impl<'a> ScopeTreeBuilder<'a> {
    /// Start a tree whose root spans all of `document`.
    pub fn new(context: &'a TrackerContext, document: &'a TextDocument) -> Self {
        let root = LexicalNode::new(
            context,
            document,
            document.full_range(),
            ScopeKind::Root,
            root_label(document.uri()),
        );
        Self {
            context,
            document,
            stack: ScopeStack::new(ScopeTree::new(root)),
        }
    }

    /// Replay one recorded traversal step.
    pub fn feed<N: SyntaxNode>(&mut self, event: &TraversalEvent<N>) {
        match event {
            TraversalEvent::Enter(node) => self.enter(node),
            TraversalEvent::Leave(node) => self.leave(node),
        }
    }

    pub fn finish(self) -> ScopeTree {
        if self.stack.depth() > 0 {
            log::warn!(
                target: "scopetrack::scope",
                "{} scopes still open at end of walk over {}",
                self.stack.depth(),
                self.document.uri()
            );
        }
        self.stack.finish()
    }
}

impl<N: SyntaxNode> SyntaxVisitor<N> for ScopeTreeBuilder<'_> {
    fn enter(&mut self, node: &N) {
        if !self.context.grammar().is_scope(node.kind()) {
            return;
        }
        let label = label_scope(node, self.context.config());
        log::trace!(
            target: "scopetrack::scope",
            "Open {} scope '{}' at {:?}",
            label.kind,
            label.name,
            node.range()
        );
        let data = LexicalNode::new(
            self.context,
            self.document,
            node.range(),
            label.kind,
            label.name,
        );
        self.stack.push(data);
    }

    fn leave(&mut self, node: &N) {
        if self.context.grammar().is_scope(node.kind()) {
            self.stack.pop();
        }
    }
}

/// Walk `syntax_root` and build the scope tree of `document`.
pub fn build_scope_tree<N: SyntaxNode>(
    context: &TrackerContext,
    document: &TextDocument,
    syntax_root: &N,
) -> ScopeTree {
    let mut builder = ScopeTreeBuilder::new(context, document);
    traverse(syntax_root, &mut builder);
    let tree = builder.finish();
    log::debug!(
        target: "scopetrack::scope",
        "Built scope tree for {} with {} nodes",
        document.uri(),
        tree.len()
    );
    tree
}

/// Parse `document` with tree-sitter and build its scope tree.
pub fn build_document_tree(
    context: &TrackerContext,
    document: &TextDocument,
    language: &Language,
) -> TrackerResult<ScopeTree> {
    let syntax = parse_document(document, language)?;
    let root = TsNode::root(&syntax, document);
    Ok(build_scope_tree(context, document, &root))
}
