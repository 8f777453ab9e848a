//! Text coordinates and change records.
//!
//! This module provides the value types every other layer speaks in:
//! - `Position`/`Range`/`Selection` in LSP-style (line, UTF-16 character) coordinates
//! - `ContentChange`, one "replace range with text" record from an edit source
//! - Helpers for mapping between UTF-16 columns and byte offsets

pub mod edits;
pub mod position;

pub use edits::{ContentChange, EditKind, TextExtent, reconstruct_change, text_extent};
pub use position::{
    Position, Range, Selection, byte_to_position, compute_line_starts,
    convert_byte_to_utf16_in_line, convert_utf16_to_byte_in_line, utf16_len,
};
