//! Abstract parse-tree capability consumed by the structural extractor.
//!
//! The extractor never talks to a grammar directly. Anything that can hand
//! out nodes with a type tag, positions, ordered children, named-field
//! lookup and source text can be explored:
//!
//! - `OwnedNode`: an in-memory tree, built by hand or by any external parser
//! - `TsNode`: a borrowed tree-sitter node (behind the `tree-sitter` feature)

mod owned;

#[cfg(feature = "tree-sitter")]
mod treesitter;

pub use owned::OwnedNode;

#[cfg(feature = "tree-sitter")]
pub use treesitter::{parse, ParsedTree, TsNode};

use std::fmt;

/// A position in source text. Both fields are 0-indexed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    pub row: usize,
    pub column: usize,
}

impl Position {
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }

    /// The 1-indexed line number for this position.
    pub fn line(&self) -> usize {
        self.row + 1
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.row + 1, self.column + 1)
    }
}

/// One node of a concrete or abstract syntax tree.
///
/// Positions are 0-indexed rows, matching what grammar runtimes report.
/// Callers convert to 1-indexed lines at the edge (see `Position::line`).
pub trait SyntaxNode: Clone {
    /// Grammar type tag (e.g. `function_definition`).
    fn kind(&self) -> &str;

    fn start(&self) -> Position;

    fn end(&self) -> Position;

    /// Ordered children, including anonymous tokens where the binding has them.
    fn children(&self) -> Vec<Self>;

    /// Child stored under a grammar field name (e.g. `name`, `parameters`).
    fn child_by_field(&self, field: &str) -> Option<Self>;

    /// Raw source text covered by this node.
    fn text(&self) -> &str;
}
