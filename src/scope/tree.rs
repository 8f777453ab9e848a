use super::LexicalNode;
use crate::document::DocumentProvider;
use crate::events::Delivery;
use crate::reconcile::{CompareResult, compare};
use crate::tracking::LocationEvent;
use std::collections::VecDeque;

/// A location event raised by one node of a tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeEvent {
    pub node_id: String,
    pub event: LocationEvent,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// The tree's own root matched; only the owner can drop it
    Root,
    /// This many subtrees were detached
    Removed(usize),
    NotFound,
}

type Predicate<'p> = &'p dyn Fn(&LexicalNode) -> bool;

/// Hierarchy of lexical scopes for one document.
///
/// Children are owned; `parent` is the id of the enclosing node and is only
/// used for lookups.
#[derive(Debug)]
pub struct ScopeTree {
    data: LexicalNode,
    children: Vec<ScopeTree>,
    parent: Option<String>,
    depth: usize,
}

impl ScopeTree {
    /// A new root.
    pub fn new(data: LexicalNode) -> Self {
        Self {
            data,
            children: Vec::new(),
            parent: None,
            depth: 0,
        }
    }

    /// A detached node that will live under `parent`.
    pub(crate) fn child_of(parent: &ScopeTree, data: LexicalNode) -> Self {
        Self {
            data,
            children: Vec::new(),
            parent: Some(parent.id().to_string()),
            depth: parent.depth + 1,
        }
    }

    pub fn data(&self) -> &LexicalNode {
        &self.data
    }

    pub fn children(&self) -> &[ScopeTree] {
        &self.children
    }

    pub fn id(&self) -> &str {
        self.data.id()
    }

    pub fn parent_id(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Number of nodes in this subtree, itself included.
    pub fn len(&self) -> usize {
        1 + self.children.iter().map(ScopeTree::len).sum::<usize>()
    }

    /// Append `data` as the last child and return the new subtree.
    pub fn insert(&mut self, data: LexicalNode) -> &mut ScopeTree {
        let child = Self::child_of(self, data);
        let index = self.children.len();
        self.children.push(child);
        &mut self.children[index]
    }

    /// Append an existing subtree, rewriting its parent ids and depths.
    pub fn attach(&mut self, mut child: ScopeTree) {
        child.reparent(self.id().to_string(), self.depth + 1);
        self.children.push(child);
    }

    fn reparent(&mut self, parent_id: String, depth: usize) {
        self.parent = Some(parent_id);
        self.depth = depth;
        let own_id = self.id().to_string();
        for child in &mut self.children {
            child.reparent(own_id.clone(), depth + 1);
        }
    }

    pub(crate) fn sort_children_by_position(&mut self) {
        self.children.sort_by_key(|child| child.data.range().start);
        for child in &mut self.children {
            child.sort_children_by_position();
        }
    }

    // ---- traversals ----

    /// Self, then children left to right, recursively.
    pub fn pre_order(&self) -> Vec<&ScopeTree> {
        let mut visited = Vec::with_capacity(self.len());
        self.collect_pre_order(&mut visited);
        visited
    }

    fn collect_pre_order<'a>(&'a self, visited: &mut Vec<&'a ScopeTree>) {
        visited.push(self);
        for child in &self.children {
            child.collect_pre_order(visited);
        }
    }

    /// Children left to right, recursively, then self.
    pub fn post_order(&self) -> Vec<&ScopeTree> {
        let mut visited = Vec::with_capacity(self.len());
        self.collect_post_order(&mut visited);
        visited
    }

    fn collect_post_order<'a>(&'a self, visited: &mut Vec<&'a ScopeTree>) {
        for child in &self.children {
            child.collect_post_order(visited);
        }
        visited.push(self);
    }

    /// Queue-based walk that takes from the back and puts each node's children,
    /// in order, at the front.
    ///
    /// This is not breadth-first: root -> [A, B], A -> [A1, A2], B -> [B1, B2]
    /// visits root, B, A, B2, B1, A2, A1. Persisted trees rely on this order.
    pub fn level_order(&self) -> Vec<&ScopeTree> {
        let mut queue: VecDeque<&ScopeTree> = VecDeque::from([self]);
        let mut visited = Vec::with_capacity(self.len());

        while let Some(node) = queue.pop_back() {
            visited.push(node);
            for child in node.children.iter().rev() {
                queue.push_front(child);
            }
        }

        visited
    }

    // ---- search ----

    /// First node, depth-first, whose data satisfies `predicate`.
    pub fn search_tree(&self, predicate: impl Fn(&LexicalNode) -> bool) -> Option<&ScopeTree> {
        self.find_first(&predicate)
    }

    fn find_first(&self, predicate: Predicate<'_>) -> Option<&ScopeTree> {
        if predicate(&self.data) {
            return Some(self);
        }
        self.children
            .iter()
            .find_map(|child| child.find_first(predicate))
    }

    /// Chain of nodes from this root down to the first depth-first match.
    pub fn get_path_to_node(
        &self,
        predicate: impl Fn(&LexicalNode) -> bool,
    ) -> Option<Vec<&ScopeTree>> {
        let mut path = Vec::new();
        self.extend_path(&predicate, &mut path).then_some(path)
    }

    fn extend_path<'a>(&'a self, predicate: Predicate<'_>, path: &mut Vec<&'a ScopeTree>) -> bool {
        path.push(self);
        if predicate(&self.data) {
            return true;
        }
        for child in &self.children {
            if child.extend_path(predicate, path) {
                return true;
            }
        }
        path.pop();
        false
    }

    /// Chains from this root to every match, depth-first.
    pub fn get_all_paths_to_nodes(
        &self,
        predicate: impl Fn(&LexicalNode) -> bool,
    ) -> Vec<Vec<&ScopeTree>> {
        let mut paths = Vec::new();
        self.collect_paths(&predicate, &mut Vec::new(), &mut paths);
        paths
    }

    fn collect_paths<'a>(
        &'a self,
        predicate: Predicate<'_>,
        path: &mut Vec<&'a ScopeTree>,
        paths: &mut Vec<Vec<&'a ScopeTree>>,
    ) {
        path.push(self);
        if predicate(&self.data) {
            paths.push(path.clone());
        }
        for child in &self.children {
            child.collect_paths(predicate, path, paths);
        }
        path.pop();
    }

    /// Follow matching nodes downward from this root, entering the first
    /// matching child at each level, and return the deepest one reached.
    ///
    /// With a "contains position" predicate this is the innermost enclosing scope.
    pub fn get_last_node_in_path(
        &self,
        predicate: impl Fn(&LexicalNode) -> bool,
    ) -> Option<&ScopeTree> {
        if !predicate(&self.data) {
            return None;
        }
        let mut current = self;
        while let Some(next) = current
            .children
            .iter()
            .find(|child| predicate(&child.data))
        {
            current = next;
        }
        Some(current)
    }

    /// The first matching subtree, mutably.
    pub fn get_tree_with_value(
        &mut self,
        predicate: impl Fn(&LexicalNode) -> bool,
    ) -> Option<&mut ScopeTree> {
        let path = self.index_path(&predicate)?;
        self.at_path_mut(&path)
    }

    /// The first matching node's data, without its subtree.
    pub fn get_root_node_with_value(
        &self,
        predicate: impl Fn(&LexicalNode) -> bool,
    ) -> Option<&LexicalNode> {
        self.find_first(&predicate).map(|tree| &tree.data)
    }

    pub fn find_by_id(&self, id: &str) -> Option<&ScopeTree> {
        self.find_first(&|data| data.id() == id)
    }

    pub fn find_by_id_mut(&mut self, id: &str) -> Option<&mut ScopeTree> {
        let path = self.index_path(&|data| data.id() == id)?;
        self.at_path_mut(&path)
    }

    /// Resolve `node`'s parent reference within this tree.
    pub fn parent_of(&self, node: &ScopeTree) -> Option<&ScopeTree> {
        self.find_by_id(node.parent.as_deref()?)
    }

    fn index_path(&self, predicate: Predicate<'_>) -> Option<Vec<usize>> {
        if predicate(&self.data) {
            return Some(Vec::new());
        }
        self.children.iter().enumerate().find_map(|(index, child)| {
            child.index_path(predicate).map(|mut rest| {
                rest.insert(0, index);
                rest
            })
        })
    }

    fn at_path_mut(&mut self, path: &[usize]) -> Option<&mut ScopeTree> {
        let mut current = self;
        for &index in path {
            current = current.children.get_mut(index)?;
        }
        Some(current)
    }

    // ---- structural edits ----

    /// Replace the first node equal to `old` with `new`, keeping its children.
    /// Returns whether a swap happened.
    pub fn swap_nodes(&mut self, old: &LexicalNode, new: LexicalNode) -> bool {
        let Some(path) = self.index_path(&|data| data == old) else {
            return false;
        };
        let Some(target) = self.at_path_mut(&path) else {
            return false;
        };

        let new_id = new.id().to_string();
        target.data = new;
        for child in &mut target.children {
            child.parent = Some(new_id.clone());
        }
        true
    }

    /// Detach every direct child equal to `data`, then repeat inside each
    /// remaining child.
    pub fn remove(&mut self, data: &LexicalNode) -> RemoveOutcome {
        if self.data == *data {
            return RemoveOutcome::Root;
        }

        let before = self.children.len();
        self.children.retain(|child| child.data != *data);
        let mut removed = before - self.children.len();

        for child in &mut self.children {
            if let RemoveOutcome::Removed(count) = child.remove(data) {
                removed += count;
            }
        }

        if removed == 0 {
            RemoveOutcome::NotFound
        } else {
            RemoveOutcome::Removed(removed)
        }
    }

    // ---- events ----

    /// Hand `delivery` to every node's location in pre-order, then drop nodes
    /// whose location was deleted. Children of a dropped node move up to take
    /// its place. The root is never dropped.
    pub fn dispatch(
        &mut self,
        delivery: &Delivery,
        documents: &impl DocumentProvider,
    ) -> Vec<TreeEvent> {
        let mut events = Vec::new();
        self.dispatch_into(delivery, documents, &mut events);

        if events
            .iter()
            .any(|event| matches!(event.event, LocationEvent::Deleted { .. }))
        {
            let pruned = self.prune_deleted();
            log::debug!(
                target: "scopetrack::scope",
                "Pruned {} deleted scopes under {}",
                pruned,
                self.data.name()
            );
        }

        events
    }

    fn dispatch_into<D: DocumentProvider>(
        &mut self,
        delivery: &Delivery,
        documents: &D,
        events: &mut Vec<TreeEvent>,
    ) {
        if let Some(event) = self.data.location_mut().handle(delivery, documents) {
            events.push(TreeEvent {
                node_id: self.id().to_string(),
                event,
            });
        }
        for child in &mut self.children {
            child.dispatch_into(delivery, documents, events);
        }
    }

    /// Splice out deleted descendants. Returns how many were removed.
    pub fn prune_deleted(&mut self) -> usize {
        let mut pruned = 0;
        let mut kept = Vec::with_capacity(self.children.len());

        for mut child in std::mem::take(&mut self.children) {
            pruned += child.prune_deleted();
            if child.data.is_deleted() {
                pruned += 1;
                kept.append(&mut child.children);
            } else {
                kept.push(child);
            }
        }

        let own_id = self.id().to_string();
        for child in &mut kept {
            child.reparent(own_id.clone(), self.depth + 1);
        }
        self.children = kept;
        pruned
    }

    // ---- reconciliation ----

    /// First node, depth-first, that `candidate` compares SAME or MODIFIED
    /// against.
    ///
    /// Greedy: a later node with a higher score is never considered once an
    /// earlier one clears the threshold.
    pub fn get_node_of_best_match(&self, candidate: &LexicalNode) -> CompareResult {
        let mut pending = vec![self];

        while let Some(tree) = pending.pop() {
            let result = compare(candidate, &tree.data);
            if result.is_match() {
                return result;
            }
            pending.extend(tree.children.iter().rev());
        }

        CompareResult::unknown()
    }
}
