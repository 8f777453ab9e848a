pub mod defaults;
pub mod loader;
pub mod settings;
pub mod user;

pub use loader::{SettingsEvent, SettingsEventKind, SettingsLoadOutcome, load_settings};
pub use settings::TrackerSettings;
pub use user::{UserConfigError, UserConfigResult, load_user_config, user_config_path};

use crate::error::{TrackerError, TrackerResult};
use crate::scope::ScopeGrammar;
use defaults::{DEFAULT_ANONYMOUS_LABEL, DEFAULT_LANGUAGE, DEFAULT_MAX_LABEL_DEPTH, DEFAULT_WORD_PATTERN};
use regex::Regex;

/// Merge multiple settings layers in order.
/// Later layers have higher precedence: `merge_all(&[defaults, user, project, overrides])`
pub fn merge_all(configs: &[Option<TrackerSettings>]) -> Option<TrackerSettings> {
    configs.iter().cloned().reduce(merge_settings).flatten()
}

/// Merge two settings layers, preferring values from `primary` over `fallback`
pub fn merge_settings(
    fallback: Option<TrackerSettings>,
    primary: Option<TrackerSettings>,
) -> Option<TrackerSettings> {
    match (fallback, primary) {
        (None, None) => None,
        (Some(settings), None) | (None, Some(settings)) => Some(settings),
        (Some(fallback), Some(primary)) => Some(TrackerSettings {
            word_pattern: primary.word_pattern.or(fallback.word_pattern),
            anonymous_label: primary.anonymous_label.or(fallback.anonymous_label),
            max_label_depth: primary.max_label_depth.or(fallback.max_label_depth),
            decoration: primary.decoration.or(fallback.decoration),
            language: primary.language.or(fallback.language),
            // Grammar tables replace wholesale; a half-merged grammar reads neither language
            grammar: primary.grammar.or(fallback.grammar),
        }),
    }
}

/// Settings resolved into ready-to-use values.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    pub word_pattern: Regex,
    pub anonymous_label: String,
    pub max_label_depth: usize,
    pub decoration: Option<String>,
    pub grammar: ScopeGrammar,
}

impl TrackerConfig {
    /// Fill unset fields with defaults, compile the word pattern and pick the grammar.
    pub fn resolve(settings: &TrackerSettings) -> TrackerResult<Self> {
        let pattern = settings
            .word_pattern
            .as_deref()
            .unwrap_or(DEFAULT_WORD_PATTERN);
        let word_pattern = Regex::new(pattern).map_err(|e| {
            TrackerError::config(format!("invalid wordPattern {:?}: {}", pattern, e))
        })?;

        let grammar = match &settings.grammar {
            Some(grammar) => grammar.clone(),
            None => {
                let language = settings.language.as_deref().unwrap_or(DEFAULT_LANGUAGE);
                ScopeGrammar::preset(language).ok_or_else(|| {
                    TrackerError::config(format!("no built-in grammar for language {:?}", language))
                })?
            }
        };

        Ok(Self {
            word_pattern,
            anonymous_label: settings
                .anonymous_label
                .clone()
                .unwrap_or_else(|| DEFAULT_ANONYMOUS_LABEL.to_string()),
            max_label_depth: settings.max_label_depth.unwrap_or(DEFAULT_MAX_LABEL_DEPTH),
            decoration: settings.decoration.clone(),
            grammar,
        })
    }

    /// Configuration built from programmed defaults alone.
    pub fn defaults() -> TrackerResult<Self> {
        Self::resolve(&defaults::default_settings())
    }
}
