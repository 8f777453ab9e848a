//! Lexical scope trees.
//!
//! A `ScopeTree` mirrors the nesting of block-like constructs in one document.
//! Each node wraps a `TrackedLocation`, so the tree follows edits without
//! being rebuilt; nodes whose text is deleted drop out of it.

pub mod builder;
pub mod grammar;
pub mod kind;
pub mod naming;
pub mod node;
pub mod serialize;
pub mod tree;

pub use builder::{ScopeStack, ScopeTreeBuilder, build_document_tree, build_scope_tree};
pub use grammar::ScopeGrammar;
pub use kind::ScopeKind;
pub use naming::{ScopeLabel, label_scope, root_label};
pub use node::{LexicalNode, SerializedNode};
pub use serialize::{DeserializeReport, SerializedScope};
pub use tree::{RemoveOutcome, ScopeTree, TreeEvent};
