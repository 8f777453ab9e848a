//! Hand-built syntax trees for unit tests.

use super::SyntaxNode;
use crate::text::Range;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Debug)]
struct FakeData {
    kind: String,
    range: Range,
    fields: HashMap<String, String>,
    parent: Option<usize>,
    children: Vec<usize>,
}

type Arena = Rc<RefCell<Vec<FakeData>>>;

#[derive(Debug)]
pub(crate) struct FakeTree {
    arena: Arena,
}

impl FakeTree {
    pub(crate) fn new(kind: &str, span: (u32, u32, u32, u32)) -> Self {
        let tree = Self {
            arena: Rc::new(RefCell::new(Vec::new())),
        };
        tree.push(None, kind, span);
        tree
    }

    pub(crate) fn root(&self) -> usize {
        0
    }

    pub(crate) fn add(&mut self, parent: usize, kind: &str, span: (u32, u32, u32, u32)) -> usize {
        let index = self.push(Some(parent), kind, span);
        self.arena.borrow_mut()[parent].children.push(index);
        index
    }

    pub(crate) fn set_field(&mut self, index: usize, field: &str, text: &str) {
        self.arena.borrow_mut()[index]
            .fields
            .insert(field.to_string(), text.to_string());
    }

    pub(crate) fn node(&self, index: usize) -> FakeNode {
        let kind = self.arena.borrow()[index].kind.clone();
        FakeNode {
            arena: Rc::clone(&self.arena),
            index,
            kind,
        }
    }

    fn push(&self, parent: Option<usize>, kind: &str, span: (u32, u32, u32, u32)) -> usize {
        let mut arena = self.arena.borrow_mut();
        arena.push(FakeData {
            kind: kind.to_string(),
            range: Range::from_coords(span.0, span.1, span.2, span.3),
            fields: HashMap::new(),
            parent,
            children: Vec::new(),
        });
        arena.len() - 1
    }
}

#[derive(Clone, Debug)]
pub(crate) struct FakeNode {
    arena: Arena,
    index: usize,
    kind: String,
}

impl FakeNode {
    fn at(&self, index: usize) -> FakeNode {
        let kind = self.arena.borrow()[index].kind.clone();
        FakeNode {
            arena: Rc::clone(&self.arena),
            index,
            kind,
        }
    }
}

impl SyntaxNode for FakeNode {
    fn kind(&self) -> &str {
        &self.kind
    }

    fn range(&self) -> Range {
        self.arena.borrow()[self.index].range
    }

    fn parent(&self) -> Option<Self> {
        let parent = self.arena.borrow()[self.index].parent?;
        Some(self.at(parent))
    }

    fn children(&self) -> Vec<Self> {
        let children = self.arena.borrow()[self.index].children.clone();
        children.into_iter().map(|index| self.at(index)).collect()
    }

    fn field_text(&self, field: &str) -> Option<String> {
        self.arena.borrow()[self.index].fields.get(field).cloned()
    }
}
