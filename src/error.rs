//! Error handling types for scopetrack
//!
//! Ordinary edit processing never fails: rebasing, deletion and reconciliation
//! misses are modelled as outcomes. These errors cover the recoverable edges
//! around the core: unknown documents, malformed input, configuration and I/O.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackerError {
    /// Document is not open in the workspace
    #[error("Document not found: {uri}")]
    DocumentNotFound { uri: String },

    /// A change or query referenced a position outside the document
    #[error("Position {line}:{character} is out of bounds in {uri}")]
    PositionOutOfBounds {
        uri: String,
        line: u32,
        character: u32,
    },

    /// Configuration error
    #[error("Invalid configuration: {message}")]
    Config { message: String },

    /// The parser front end could not produce a tree
    #[error("Parse error: {message}")]
    Parse { message: String },

    /// Persisted data could not be turned back into a tree
    #[error("Deserialization error: {message}")]
    Deserialize { message: String },

    /// JSON (de)serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for tracker operations
pub type TrackerResult<T> = Result<T, TrackerError>;

/// Helper functions for common error patterns
impl TrackerError {
    /// Create a document not found error
    pub fn document_not_found(uri: impl Into<String>) -> Self {
        TrackerError::DocumentNotFound { uri: uri.into() }
    }

    /// Create an out-of-bounds error for a position in a document
    pub fn position_out_of_bounds(uri: impl Into<String>, line: u32, character: u32) -> Self {
        TrackerError::PositionOutOfBounds {
            uri: uri.into(),
            line,
            character,
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        TrackerError::Config {
            message: message.into(),
        }
    }

    /// Create a parse error
    pub fn parse(message: impl Into<String>) -> Self {
        TrackerError::Parse {
            message: message.into(),
        }
    }

    /// Create a deserialization error
    pub fn deserialize(message: impl Into<String>) -> Self {
        TrackerError::Deserialize {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_include_context() {
        let err = TrackerError::document_not_found("file:///a.rs");
        assert_eq!(err.to_string(), "Document not found: file:///a.rs");

        let err = TrackerError::position_out_of_bounds("file:///a.rs", 9, 2);
        assert_eq!(
            err.to_string(),
            "Position 9:2 is out of bounds in file:///a.rs"
        );
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: TrackerError = io.into();
        assert!(matches!(err, TrackerError::Io(_)));
    }
}
