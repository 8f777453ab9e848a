//! Self-rebasing ranges and the locations that bind them to documents.
//!
//! `TrackedRange` is pure arithmetic over positions: classify the edit against
//! the range, pick a transform family, move the endpoints. `TrackedLocation`
//! adds the document and event plumbing around it.

pub mod intersection;
pub mod location;
pub mod range;
pub(crate) mod transform;

pub use intersection::{IntersectionType, classify};
pub use location::{LocationEvent, SerializedLocation, TrackedLocation};
pub use range::{RangeState, RangeUpdate, Rebase, TrackedRange};
