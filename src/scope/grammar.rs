use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Node-kind tables that tell the scope builder how to read one grammar.
///
/// Every table is optional in toml; a missing table is empty.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScopeGrammar {
    /// Kinds that open a new lexical scope (block-like constructs)
    pub scope_kinds: Vec<String>,
    /// Named function constructs; their `name` field labels the scope
    pub function_kinds: Vec<String>,
    /// Control constructs mapped to their keyword
    pub control_kinds: BTreeMap<String, String>,
    /// Function-like constructs that may have no name of their own
    pub anonymous_function_kinds: Vec<String>,
    /// Binding constructs mapped to the field holding the bound name
    pub binding_kinds: BTreeMap<String, String>,
    /// Fields checked, in order, for a declaration name
    pub name_fields: Vec<String>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

fn table(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

impl ScopeGrammar {
    /// Tables for tree-sitter-rust.
    pub fn rust() -> Self {
        Self {
            scope_kinds: strings(&[
                "block",
                "declaration_list",
                "field_declaration_list",
                "enum_variant_list",
                "match_block",
            ]),
            function_kinds: strings(&["function_item"]),
            control_kinds: table(&[
                ("if_expression", "if"),
                ("for_expression", "for"),
                ("while_expression", "while"),
                ("loop_expression", "loop"),
                ("match_expression", "match"),
            ]),
            anonymous_function_kinds: strings(&["closure_expression"]),
            binding_kinds: table(&[("let_declaration", "pattern")]),
            name_fields: strings(&["name", "type"]),
        }
    }

    /// Tables for tree-sitter-javascript.
    pub fn javascript() -> Self {
        Self {
            scope_kinds: strings(&["statement_block", "class_body", "switch_body"]),
            function_kinds: strings(&[
                "function_declaration",
                "generator_function_declaration",
                "function_expression",
                "method_definition",
            ]),
            control_kinds: table(&[
                ("if_statement", "if"),
                ("for_statement", "for"),
                ("for_in_statement", "for"),
                ("while_statement", "while"),
                ("do_statement", "do"),
                ("switch_statement", "switch"),
                ("try_statement", "try"),
                ("catch_clause", "catch"),
            ]),
            anonymous_function_kinds: strings(&[
                "arrow_function",
                "function_expression",
                "generator_function",
            ]),
            binding_kinds: table(&[
                ("variable_declarator", "name"),
                ("assignment_expression", "left"),
            ]),
            name_fields: strings(&["name"]),
        }
    }

    /// Built-in tables by language name.
    pub fn preset(language: &str) -> Option<Self> {
        match language {
            "rust" => Some(Self::rust()),
            "javascript" | "js" | "typescript" | "ts" => Some(Self::javascript()),
            _ => None,
        }
    }

    pub fn is_scope(&self, kind: &str) -> bool {
        self.scope_kinds.iter().any(|k| k == kind)
    }

    pub fn is_function(&self, kind: &str) -> bool {
        self.function_kinds.iter().any(|k| k == kind)
    }

    pub fn is_anonymous_function(&self, kind: &str) -> bool {
        self.anonymous_function_kinds.iter().any(|k| k == kind)
    }

    pub fn control_keyword(&self, kind: &str) -> Option<&str> {
        self.control_kinds.get(kind).map(String::as_str)
    }

    pub fn binding_field(&self, kind: &str) -> Option<&str> {
        self.binding_kinds.get(kind).map(String::as_str)
    }
}
