//! Document text and storage.
//!
//! The tracking layer never owns document text: it borrows it through
//! `DocumentProvider` at the moment an event is handled.

pub mod store;
pub mod text;

pub use store::DocumentStore;
pub use text::TextDocument;

use url::Url;

/// Read access to open documents by URI.
pub trait DocumentProvider {
    fn document(&self, uri: &Url) -> Option<&TextDocument>;
}
