//! Human-readable labels for scope nodes.
//!
//! A scope node is usually an anonymous block; what it belongs to is found by
//! looking at the ancestors just above it. The walk is nearest-first, bounded
//! by `max_label_depth`, and stops at the next enclosing scope node so a block
//! never borrows its outer function's name.

use super::ScopeKind;
use crate::config::TrackerConfig;
use crate::syntax::SyntaxNode;
use url::Url;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScopeLabel {
    pub name: String,
    pub kind: ScopeKind,
}

impl ScopeLabel {
    fn new(name: impl Into<String>, kind: ScopeKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Label the scope opened by `node`. Never fails; falls back to the
/// configured anonymous label with kind `Block`.
pub fn label_scope<N: SyntaxNode>(node: &N, config: &TrackerConfig) -> ScopeLabel {
    let grammar = &config.grammar;
    let mut ancestor = node.parent();
    let mut inspected = 0;

    while let Some(current) = ancestor {
        if inspected >= config.max_label_depth || grammar.is_scope(current.kind()) {
            break;
        }
        if let Some(label) = label_from_ancestor(&current, config) {
            return label;
        }
        ancestor = current.parent();
        inspected += 1;
    }

    ScopeLabel::new(config.anonymous_label.as_str(), ScopeKind::Block)
}

fn label_from_ancestor<N: SyntaxNode>(node: &N, config: &TrackerConfig) -> Option<ScopeLabel> {
    let grammar = &config.grammar;
    let kind = node.kind();

    if grammar.is_function(kind)
        && let Some(name) = node.field_text("name")
    {
        let scope_kind = if name == "constructor" {
            ScopeKind::Constructor
        } else {
            ScopeKind::Function
        };
        return Some(ScopeLabel::new(name, scope_kind));
    }

    if let Some(keyword) = grammar.control_keyword(kind) {
        let scope_kind = ScopeKind::for_keyword(keyword).unwrap_or(ScopeKind::Block);
        return Some(ScopeLabel::new(keyword, scope_kind));
    }

    if let Some(name) = grammar
        .name_fields
        .iter()
        .find_map(|field| node.field_text(field))
    {
        return Some(ScopeLabel::new(name, ScopeKind::Declaration));
    }

    if grammar.is_anonymous_function(kind) {
        // Only a binding directly around the function names it
        let bound = node.parent().and_then(|parent| {
            grammar
                .binding_field(parent.kind())
                .and_then(|field| parent.field_text(field))
        });
        let name = bound.unwrap_or_else(|| config.anonymous_label.clone());
        return Some(ScopeLabel::new(name, ScopeKind::Closure));
    }

    None
}

/// Name of a document's root scope: the last path segment of its URI.
pub fn root_label(uri: &Url) -> String {
    uri.path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| uri.to_string())
}
