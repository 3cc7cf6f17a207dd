//! In-memory syntax tree.

use super::{Position, SyntaxNode};

/// An owned syntax tree node.
///
/// Useful for bindings that do not expose borrowed nodes, and for building
/// trees by hand in tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedNode {
    kind: String,
    start: Position,
    end: Position,
    text: String,
    children: Vec<OwnedNode>,
    /// Field name to child index.
    fields: Vec<(String, usize)>,
}

impl OwnedNode {
    /// Create a node spanning 0-indexed rows `start_row..=end_row`.
    pub fn new(kind: &str, start_row: usize, end_row: usize) -> Self {
        Self {
            kind: kind.to_string(),
            start: Position::new(start_row, 0),
            end: Position::new(end_row, 0),
            text: String::new(),
            children: Vec::new(),
            fields: Vec::new(),
        }
    }

    /// Create a leaf node carrying source text.
    pub fn leaf(kind: &str, row: usize, text: &str) -> Self {
        Self::new(kind, row, row).with_text(text)
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn with_columns(mut self, start_col: usize, end_col: usize) -> Self {
        self.start.column = start_col;
        self.end.column = end_col;
        self
    }

    /// Append an unnamed child.
    pub fn child(mut self, child: OwnedNode) -> Self {
        self.children.push(child);
        self
    }

    /// Append a child reachable through `field`.
    pub fn field(mut self, field: &str, child: OwnedNode) -> Self {
        self.fields.push((field.to_string(), self.children.len()));
        self.children.push(child);
        self
    }
}

impl SyntaxNode for OwnedNode {
    fn kind(&self) -> &str {
        &self.kind
    }

    fn start(&self) -> Position {
        self.start
    }

    fn end(&self) -> Position {
        self.end
    }

    fn children(&self) -> Vec<Self> {
        self.children.clone()
    }

    fn child_by_field(&self, field: &str) -> Option<Self> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .and_then(|(_, idx)| self.children.get(*idx))
            .cloned()
    }

    fn text(&self) -> &str {
        &self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_lookup() {
        let node = OwnedNode::new("function_definition", 0, 3)
            .child(OwnedNode::leaf("def", 0, "def"))
            .field("name", OwnedNode::leaf("identifier", 0, "main"));

        assert_eq!(node.children().len(), 2);
        let name = node.child_by_field("name").expect("name field");
        assert_eq!(name.text(), "main");
        assert!(node.child_by_field("body").is_none());
    }

    #[test]
    fn test_positions() {
        let node = OwnedNode::new("block", 4, 9).with_columns(2, 10);
        assert_eq!(node.start().line(), 5);
        assert_eq!(node.end().line(), 10);
        assert_eq!(node.start().to_string(), "5:3");
    }
}
