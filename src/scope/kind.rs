use serde::{Deserialize, Serialize};
use std::fmt;

/// Syntactic category of a lexical scope.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeKind {
    Root,
    Function,
    Constructor,
    Closure,
    Conditional,
    Loop,
    Switch,
    Try,
    Catch,
    Declaration,
    Block,
}

impl ScopeKind {
    /// Kind for a control-construct keyword such as `if` or `match`.
    pub fn for_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "if" | "else" => Some(ScopeKind::Conditional),
            "for" | "while" | "do" | "loop" => Some(ScopeKind::Loop),
            "switch" | "match" => Some(ScopeKind::Switch),
            "try" => Some(ScopeKind::Try),
            "catch" => Some(ScopeKind::Catch),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScopeKind::Root => "root",
            ScopeKind::Function => "function",
            ScopeKind::Constructor => "constructor",
            ScopeKind::Closure => "closure",
            ScopeKind::Conditional => "conditional",
            ScopeKind::Loop => "loop",
            ScopeKind::Switch => "switch",
            ScopeKind::Try => "try",
            ScopeKind::Catch => "catch",
            ScopeKind::Declaration => "declaration",
            ScopeKind::Block => "block",
        }
    }
}

impl fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
