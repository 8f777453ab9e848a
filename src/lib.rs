//! Edit-resilient tracking of lexical scopes in source documents.
//!
//! Ranges rebase themselves on every content change, locations bind them to
//! documents and emit events, and scope trees built from a tree-sitter parse
//! keep following the text without being rebuilt. Trees can be persisted and
//! later reconciled against a newer version of the document.

pub mod config;
pub mod context;
pub mod document;
pub mod error;
pub mod events;
pub mod reconcile;
pub mod scope;
pub mod session;
pub mod syntax;
pub mod text;
pub mod tracking;
pub mod workspace;

pub use config::{TrackerConfig, TrackerSettings};
pub use context::TrackerContext;
pub use document::{DocumentProvider, DocumentStore, TextDocument};
pub use error::{TrackerError, TrackerResult};
pub use events::{Delivery, Disposables, DocumentEvent, EventBus, EventKind, Subscription};
pub use reconcile::{CompareResult, CompareStatus, ReconcileReport, compare, reconcile};
pub use scope::{LexicalNode, ScopeKind, ScopeTree, TreeEvent};
pub use session::Tracker;
pub use text::{ContentChange, Position, Range, Selection};
pub use tracking::{IntersectionType, LocationEvent, TrackedLocation, TrackedRange};
pub use workspace::Workspace;
