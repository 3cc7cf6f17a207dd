//! Declarative node-type mapping used by the extractor.

use std::collections::{BTreeMap, HashMap};

/// How an element's name is derived from its node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameSource {
    /// Look up the configured name fields, then identifier-like children.
    Field,
    /// Use the first line of the node's text (imports, includes).
    Text,
}

/// Placeholder name when a node has no usable name.
pub const ANONYMOUS: &str = "<anonymous>";

/// Default field names tried, in order, when naming an element.
pub const DEFAULT_NAME_FIELDS: &[&str] = &["name", "declarator"];

/// Category to grammar node-type mapping for one language.
#[derive(Debug, Clone)]
pub struct NodeTypeMap {
    /// Category -> node types, in declaration order.
    categories: BTreeMap<String, Vec<String>>,
    /// Node type -> categories it feeds.
    by_type: HashMap<String, Vec<String>>,
    naming: HashMap<String, NameSource>,
    name_fields: Vec<String>,
}

impl Default for NodeTypeMap {
    fn default() -> Self {
        Self {
            categories: BTreeMap::new(),
            by_type: HashMap::new(),
            naming: HashMap::new(),
            name_fields: DEFAULT_NAME_FIELDS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl NodeTypeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a map from a static category table.
    pub fn from_static(table: &phf::Map<&'static str, &'static [&'static str]>) -> Self {
        let mut map = Self::new();
        for (category, types) in table.entries() {
            map = map.category(category, types);
        }
        map
    }

    /// Add node types for a category.
    pub fn category(mut self, category: &str, node_types: &[&str]) -> Self {
        let entry = self.categories.entry(category.to_string()).or_default();
        for ty in node_types {
            if !entry.iter().any(|t| t == ty) {
                entry.push(ty.to_string());
            }
            let cats = self.by_type.entry(ty.to_string()).or_default();
            if !cats.iter().any(|c| c == category) {
                cats.push(category.to_string());
            }
        }
        self
    }

    /// Choose how elements of `category` are named.
    pub fn named_by(mut self, category: &str, source: NameSource) -> Self {
        self.naming.insert(category.to_string(), source);
        self
    }

    /// Replace the field names tried when naming elements.
    pub fn name_fields(mut self, fields: &[&str]) -> Self {
        self.name_fields = fields.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Categories the given node type feeds.
    pub fn categories_for(&self, node_type: &str) -> &[String] {
        self.by_type
            .get(node_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Node types mapped to a category. Unknown categories yield nothing.
    pub fn node_types(&self, category: &str) -> &[String] {
        self.categories
            .get(category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// All mapped category names.
    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    pub fn name_source(&self, category: &str) -> NameSource {
        self.naming.get(category).copied().unwrap_or(NameSource::Field)
    }

    pub fn name_field_list(&self) -> &[String] {
        &self.name_fields
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// Grammar node types that open a control-flow nesting level.
///
/// Conditionals, loops, try blocks and pattern-match/switch blocks across the
/// supported grammars. Clauses that continue a construct (`elif_clause`,
/// `else_clause`, `except_clause`, `case_clause`) are not listed so they do
/// not add a level of their own.
pub static NESTING_NODE_TYPES: phf::Set<&'static str> = phf::phf_set! {
    // conditionals
    "if_statement",
    "if_expression",
    "if_let_expression",
    "guard_statement",
    // loops
    "for_statement",
    "for_in_statement",
    "for_range_loop",
    "enhanced_for_statement",
    "for_expression",
    "while_statement",
    "while_expression",
    "loop_expression",
    "do_statement",
    "repeat_while_statement",
    // exception handling
    "try_statement",
    "try_expression",
    "try_with_resources_statement",
    // pattern matching / switching
    "match_statement",
    "match_expression",
    "switch_statement",
    "switch_expression",
    "expression_switch_statement",
    "type_switch_statement",
    "select_statement",
};

/// Whether a node type opens a nesting level.
pub fn is_nesting(node_type: &str) -> bool {
    NESTING_NODE_TYPES.contains(node_type)
}
