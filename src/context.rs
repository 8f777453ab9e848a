use crate::config::TrackerConfig;
use crate::events::EventBus;
use crate::scope::ScopeGrammar;
use regex::Regex;

/// Shared environment handed by reference to everything that tracks text:
/// resolved configuration plus the event bus locations subscribe to.
#[derive(Debug)]
pub struct TrackerContext {
    config: TrackerConfig,
    bus: EventBus,
}

impl TrackerContext {
    pub fn new(config: TrackerConfig) -> Self {
        Self::with_bus(config, EventBus::new())
    }

    pub fn with_bus(config: TrackerConfig, bus: EventBus) -> Self {
        Self { config, bus }
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn word_pattern(&self) -> &Regex {
        &self.config.word_pattern
    }

    pub fn grammar(&self) -> &ScopeGrammar {
        &self.config.grammar
    }
}
