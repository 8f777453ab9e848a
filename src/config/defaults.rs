//! Programmed defaults, the lowest settings layer.

use super::settings::TrackerSettings;

/// One identifier-like run of characters.
pub const DEFAULT_WORD_PATTERN: &str = r"[\w$]+";

pub const DEFAULT_ANONYMOUS_LABEL: &str = "Arrow Function";

pub const DEFAULT_MAX_LABEL_DEPTH: usize = 3;

pub const DEFAULT_LANGUAGE: &str = "rust";

pub fn default_settings() -> TrackerSettings {
    TrackerSettings {
        word_pattern: Some(DEFAULT_WORD_PATTERN.to_string()),
        anonymous_label: Some(DEFAULT_ANONYMOUS_LABEL.to_string()),
        max_label_depth: Some(DEFAULT_MAX_LABEL_DEPTH),
        decoration: None,
        language: Some(DEFAULT_LANGUAGE.to_string()),
        grammar: None,
    }
}
