//! Tree-sitter binding of the syntax capability.

use tree_sitter::{Language, Node, Parser as TsParser, Tree};

use super::{Position, SyntaxNode};

/// A tree-sitter tree together with the source it was parsed from.
pub struct ParsedTree<'s> {
    tree: Tree,
    source: &'s str,
}

impl<'s> ParsedTree<'s> {
    /// Root node of the tree.
    pub fn root(&self) -> TsNode<'_> {
        TsNode {
            node: self.tree.root_node(),
            source: self.source,
        }
    }

    /// Whether tree-sitter had to insert ERROR or MISSING nodes.
    pub fn has_errors(&self) -> bool {
        self.tree.root_node().has_error()
    }
}

/// Parse source code with the given grammar.
///
/// Returns an error if the grammar cannot be loaded or the parser gives up.
/// Partial parse errors still produce a tree with ERROR nodes.
pub fn parse<'s>(language: &Language, source: &'s str) -> anyhow::Result<ParsedTree<'s>> {
    let mut parser = TsParser::new();
    parser.set_language(language)?;
    let tree = parser
        .parse(source, None)
        .ok_or_else(|| anyhow::anyhow!("failed to parse source"))?;
    Ok(ParsedTree { tree, source })
}

/// A borrowed tree-sitter node.
#[derive(Clone, Copy)]
pub struct TsNode<'a> {
    node: Node<'a>,
    source: &'a str,
}

impl<'a> TsNode<'a> {
    pub fn new(node: Node<'a>, source: &'a str) -> Self {
        Self { node, source }
    }

    /// The underlying tree-sitter node.
    pub fn raw(&self) -> Node<'a> {
        self.node
    }

    fn wrap(&self, node: Node<'a>) -> Self {
        Self {
            node,
            source: self.source,
        }
    }
}

impl<'a> SyntaxNode for TsNode<'a> {
    fn kind(&self) -> &str {
        self.node.kind()
    }

    fn start(&self) -> Position {
        let p = self.node.start_position();
        Position::new(p.row, p.column)
    }

    fn end(&self) -> Position {
        let p = self.node.end_position();
        Position::new(p.row, p.column)
    }

    fn children(&self) -> Vec<Self> {
        let mut cursor = self.node.walk();
        self.node
            .children(&mut cursor)
            .map(|n| self.wrap(n))
            .collect()
    }

    fn child_by_field(&self, field: &str) -> Option<Self> {
        self.node.child_by_field_name(field).map(|n| self.wrap(n))
    }

    fn text(&self) -> &str {
        self.node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }
}
