use crate::scope::ScopeGrammar;
use serde::{Deserialize, Serialize};

/// One layer of `scopetrack.toml`. Every field is optional so layers can be
/// merged field-wise; `TrackerConfig::resolve` fills the gaps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerSettings {
    /// Regex matching one word; range endpoints never split a match
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word_pattern: Option<String>,

    /// Label for scopes no heuristic could name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anonymous_label: Option<String>,

    /// How many ancestors the naming heuristic inspects
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_label_depth: Option<usize>,

    /// Decoration handed to renderers on refresh
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decoration: Option<String>,

    /// Built-in grammar preset name (`rust`, `javascript`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    /// Explicit grammar tables; take precedence over `language`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grammar: Option<ScopeGrammar>,
}
