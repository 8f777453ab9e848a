//! Parser front end seam.
//!
//! Scope building only needs a handful of questions answered about a syntax
//! node, so it is written against `SyntaxNode` instead of a concrete parser.
//! `TsNode` answers them for tree-sitter; tests use a hand-built tree.

pub mod traverse;
pub mod ts_node;

#[cfg(test)]
pub(crate) mod fake;

pub use traverse::{SyntaxVisitor, TraversalEvent, traverse};
pub use ts_node::{TsNode, parse_document};

use crate::text::Range;

/// A node of an external concrete syntax tree.
pub trait SyntaxNode: Clone {
    /// Grammar node kind, e.g. `function_item`
    fn kind(&self) -> &str;

    /// Exact text span in document coordinates.
    fn range(&self) -> Range;

    fn parent(&self) -> Option<Self>;

    /// Named children in source order.
    fn children(&self) -> Vec<Self>;

    /// Source text of the child stored under `field`, if present.
    fn field_text(&self, field: &str) -> Option<String>;
}
