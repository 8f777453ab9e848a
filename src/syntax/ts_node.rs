use super::SyntaxNode;
use crate::document::TextDocument;
use crate::error::{TrackerError, TrackerResult};
use crate::text::Range;
use tree_sitter::{Language, Node, Parser, Tree};

/// A tree-sitter node paired with the document it was parsed from.
///
/// tree-sitter reports byte columns; the document maps them to UTF-16.
#[derive(Clone, Copy)]
pub struct TsNode<'a> {
    node: Node<'a>,
    document: &'a TextDocument,
}

impl<'a> TsNode<'a> {
    pub fn new(node: Node<'a>, document: &'a TextDocument) -> Self {
        Self { node, document }
    }

    pub fn root(tree: &'a Tree, document: &'a TextDocument) -> Self {
        Self::new(tree.root_node(), document)
    }

    pub fn inner(&self) -> Node<'a> {
        self.node
    }

    fn wrap(&self, node: Node<'a>) -> Self {
        Self::new(node, self.document)
    }
}

impl std::fmt::Debug for TsNode<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TsNode")
            .field("kind", &self.node.kind())
            .field("range", &self.range())
            .finish()
    }
}

impl SyntaxNode for TsNode<'_> {
    fn kind(&self) -> &str {
        self.node.kind()
    }

    fn range(&self) -> Range {
        Range::new(
            self.document.position_at(self.node.start_byte()),
            self.document.position_at(self.node.end_byte()),
        )
    }

    fn parent(&self) -> Option<Self> {
        self.node.parent().map(|node| self.wrap(node))
    }

    fn children(&self) -> Vec<Self> {
        let mut cursor = self.node.walk();
        self.node
            .named_children(&mut cursor)
            .map(|node| self.wrap(node))
            .collect()
    }

    fn field_text(&self, field: &str) -> Option<String> {
        let child = self.node.child_by_field_name(field)?;
        self.document
            .text()
            .get(child.byte_range())
            .map(str::to_string)
    }
}

/// Parse `document` with `language`.
pub fn parse_document(document: &TextDocument, language: &Language) -> TrackerResult<Tree> {
    let mut parser = Parser::new();
    parser
        .set_language(language)
        .map_err(|e| TrackerError::parse(format!("incompatible grammar: {}", e)))?;
    parser
        .parse(document.text(), None)
        .ok_or_else(|| TrackerError::parse(format!("no tree produced for {}", document.uri())))
}
