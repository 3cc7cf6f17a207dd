//! Language-agnostic structural extraction.
//!
//! Walks any `SyntaxNode` tree and sorts matching nodes into categories
//! according to a `NodeTypeMap`. Function-like elements additionally get a
//! signature and their maximum control-flow nesting depth.

use crate::syntax::SyntaxNode;

use super::element::category;
use super::node_map::{is_nesting, NameSource, ANONYMOUS};
use super::{Element, ElementCollection, NodeTypeMap};

/// Inclusive line window restricting which elements are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusRange {
    pub start: usize,
    pub end: usize,
}

impl FocusRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, line: usize) -> bool {
        line >= self.start && line <= self.end
    }
}

/// Node types whose text is usable as a name on its own.
const IDENTIFIER_KINDS: &[&str] = &[
    "identifier",
    "name",
    "type_identifier",
    "field_identifier",
    "simple_identifier",
    "property_identifier",
    "constant",
];

/// Field names holding a parameter list.
const PARAMETER_FIELDS: &[&str] = &["parameters"];

/// Field names holding a return type.
const RETURN_FIELDS: &[&str] = &["return_type", "result"];

/// How deep to follow declarator chains (`int *(*f)(void)` and friends).
const MAX_DECLARATOR_DEPTH: usize = 6;

/// Extract categorized elements from a parse tree.
///
/// Traversal is depth-first in source order, so every category list comes
/// out in source order. With a focus range, elements starting outside it
/// are dropped; their children are still visited.
pub fn extract<N: SyntaxNode>(
    root: &N,
    map: &NodeTypeMap,
    focus: Option<FocusRange>,
) -> ElementCollection {
    let mut collection = ElementCollection::new();
    for name in map.category_names() {
        collection.ensure_category(name);
    }

    if map.is_empty() {
        return collection;
    }

    let mut stack = vec![root.clone()];
    while let Some(node) = stack.pop() {
        let categories = map.categories_for(node.kind());
        if !categories.is_empty() {
            let line_start = node.start().line();
            let in_focus = focus.map_or(true, |f| f.contains(line_start));

            if in_focus {
                for cat in categories {
                    collection.push(build_element(&node, cat, map));
                }
            }
        }

        let mut children = node.children();
        children.reverse();
        stack.extend(children);
    }

    collection
}

/// Maximum nesting depth of control-flow constructs below `node`.
///
/// Each nesting node adds one level for its own subtree; sibling branches
/// do not add up. The node itself is not counted.
pub fn nesting_depth<N: SyntaxNode>(node: &N) -> usize {
    let mut max = 0;
    let mut stack: Vec<(N, usize)> = node.children().into_iter().map(|c| (c, 0)).collect();

    while let Some((current, above)) = stack.pop() {
        let depth = above + usize::from(is_nesting(current.kind()));
        max = max.max(depth);
        stack.extend(current.children().into_iter().map(|c| (c, depth)));
    }

    max
}

fn build_element<N: SyntaxNode>(node: &N, cat: &str, map: &NodeTypeMap) -> Element {
    let name = match map.name_source(cat) {
        NameSource::Field => field_name(node, map.name_field_list(), 0)
            .or_else(|| identifier_child(node))
            .unwrap_or_else(|| ANONYMOUS.to_string()),
        NameSource::Text => first_line(node.text())
            .map(str::to_string)
            .unwrap_or_else(|| ANONYMOUS.to_string()),
    };

    let mut element = Element::spanning(&name, cat, node.start().line(), node.end().line());

    if category::is_function_like(cat) {
        element.signature = signature(node);
        element.depth = Some(nesting_depth(node));
    }

    element
}

/// Resolve a name through the configured fields, descending into
/// declarator chains.
fn field_name<N: SyntaxNode>(node: &N, fields: &[String], depth: usize) -> Option<String> {
    if depth > MAX_DECLARATOR_DEPTH {
        return None;
    }

    for field in fields {
        let Some(child) = node.child_by_field(field) else {
            continue;
        };

        if child.kind().ends_with("declarator") {
            if let Some(name) = field_name(&child, fields, depth + 1) {
                return Some(name);
            }
            continue;
        }

        if let Some(text) = first_line(child.text()) {
            return Some(text.to_string());
        }
    }

    None
}

fn identifier_child<N: SyntaxNode>(node: &N) -> Option<String> {
    node.children()
        .into_iter()
        .find(|c| IDENTIFIER_KINDS.contains(&c.kind()))
        .and_then(|c| first_line(c.text()).map(str::to_string))
}

fn first_line(text: &str) -> Option<&str> {
    let line = text.lines().next()?.trim();
    (!line.is_empty()).then_some(line)
}

/// Build `(params) -> ret` from grammar fields, falling back to the
/// declaration's first line from the opening parenthesis.
fn signature<N: SyntaxNode>(node: &N) -> Option<String> {
    if let Some(params) = find_field_deep(node, PARAMETER_FIELDS, 0) {
        let params = collapse_whitespace(params.text());
        let ret = RETURN_FIELDS
            .iter()
            .find_map(|f| node.child_by_field(f))
            .map(|r| collapse_whitespace(r.text()))
            .map(|r| r.trim_start_matches(':').trim().to_string())
            .filter(|r| !r.is_empty());

        return Some(match ret {
            Some(ret) => format!("{} -> {}", params, ret),
            None => params,
        });
    }

    let line = first_line(node.text())?;
    let open = line.find('(')?;
    let sig = line[open..]
        .trim_end_matches('{')
        .trim_end_matches(':')
        .trim();
    (!sig.is_empty()).then(|| sig.to_string())
}

fn find_field_deep<N: SyntaxNode>(node: &N, fields: &[&str], depth: usize) -> Option<N> {
    if depth > MAX_DECLARATOR_DEPTH {
        return None;
    }
    if let Some(found) = fields.iter().find_map(|f| node.child_by_field(f)) {
        return Some(found);
    }
    let declarator = node.child_by_field("declarator")?;
    find_field_deep(&declarator, fields, depth + 1)
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::OwnedNode;

    fn python_map() -> NodeTypeMap {
        NodeTypeMap::new()
            .category("functions", &["function_definition"])
            .category("classes", &["class_definition"])
            .category("imports", &["import_statement"])
            .named_by("imports", NameSource::Text)
    }

    fn ident(row: usize, text: &str) -> OwnedNode {
        OwnedNode::leaf("identifier", row, text)
    }

    /// Function on lines 10-25: `if` > `for` > `if`, plus a shallow sibling.
    fn nested_function() -> OwnedNode {
        let inner_if = OwnedNode::new("if_statement", 13, 15)
            .child(OwnedNode::new("block", 14, 15).child(OwnedNode::new("expression_statement", 14, 14)));
        let for_loop = OwnedNode::new("for_statement", 12, 16)
            .child(OwnedNode::new("block", 13, 16).child(inner_if));
        let outer_if = OwnedNode::new("if_statement", 10, 20)
            .child(OwnedNode::new("block", 11, 20).child(for_loop));
        let sibling_while = OwnedNode::new("while_statement", 21, 24)
            .child(OwnedNode::new("block", 22, 24));

        OwnedNode::new("function_definition", 9, 24)
            .field("name", ident(9, "process"))
            .field("parameters", OwnedNode::leaf("parameters", 9, "(items,\n    limit)"))
            .field(
                "body",
                OwnedNode::new("block", 10, 24).child(outer_if).child(sibling_while),
            )
    }

    fn module() -> OwnedNode {
        OwnedNode::new("module", 0, 40)
            .child(OwnedNode::leaf("import_statement", 0, "import os"))
            .child(
                OwnedNode::new("class_definition", 2, 7)
                    .field("name", ident(2, "Config"))
                    .child(
                        OwnedNode::new("block", 3, 7).child(
                            OwnedNode::new("function_definition", 3, 7)
                                .field("name", ident(3, "load"))
                                .with_text("def load(self, path):\n    pass"),
                        ),
                    ),
            )
            .child(nested_function())
            .child(OwnedNode::new("function_definition", 30, 32))
    }

    #[test]
    fn test_extract_categories_in_source_order() {
        let elements = extract(&module(), &python_map(), None);

        let functions: Vec<_> = elements.get("functions").iter().map(|e| e.name.as_str()).collect();
        assert_eq!(functions, ["load", "process", ANONYMOUS]);
        assert_eq!(elements.get("classes")[0].name, "Config");
        assert_eq!(elements.get("imports")[0].name, "import os");
        assert!(elements.error.is_none());
    }

    #[test]
    fn test_lines_are_one_indexed() {
        let elements = extract(&module(), &python_map(), None);
        let config = &elements.get("classes")[0];
        assert_eq!(config.line_start, 3);
        assert_eq!(config.line_end, Some(8));
        assert_eq!(config.line_count, Some(6));
    }

    #[test]
    fn test_nesting_depth_ignores_siblings() {
        let elements = extract(&module(), &python_map(), None);
        let process = elements.find("functions", "process").unwrap();

        assert_eq!(process.line_start, 10);
        assert_eq!(process.line_end, Some(25));
        assert_eq!(process.depth, Some(3));
        assert_eq!(elements.find("functions", "load").unwrap().depth, Some(0));
    }

    #[test]
    fn test_depth_of_flat_branches() {
        let func = OwnedNode::new("function_item", 0, 10)
            .child(OwnedNode::new("if_expression", 1, 2))
            .child(OwnedNode::new("if_expression", 3, 4))
            .child(OwnedNode::new("match_expression", 5, 9));
        assert_eq!(nesting_depth(&func), 1);
    }

    #[test]
    fn test_depth_of_long_nesting_chain() {
        let mut node = OwnedNode::new("pass_statement", 0, 0);
        for row in 0..2_000 {
            node = OwnedNode::new("if_statement", row, row).child(node);
        }
        let func = OwnedNode::new("function_definition", 0, 2_000).child(node);
        assert_eq!(nesting_depth(&func), 2_000);
    }

    #[test]
    fn test_focus_range_filters_by_start_line() {
        let focus = FocusRange::new(4, 12);
        let elements = extract(&module(), &python_map(), Some(focus));

        for element in elements.all() {
            assert!(focus.contains(element.line_start), "{} outside focus", element);
        }
        // `load` starts on line 4, `process` on line 10; Config (line 3) is out.
        assert_eq!(elements.get("functions").len(), 2);
        assert!(elements.get("classes").is_empty());
        assert!(elements.get("imports").is_empty());
    }

    #[test]
    fn test_unmapped_category_is_empty() {
        let elements = extract(&module(), &python_map(), None);
        assert!(elements.get("structs").is_empty());
        assert!(elements.categories().any(|c| c == "classes"));
    }

    #[test]
    fn test_empty_map_yields_empty_collection() {
        let elements = extract(&module(), &NodeTypeMap::new(), None);
        assert!(elements.is_empty());
        assert!(!elements.is_failed());
    }

    #[test]
    fn test_signature_from_fields() {
        let elements = extract(&module(), &python_map(), None);
        let process = elements.find("functions", "process").unwrap();
        assert_eq!(process.signature.as_deref(), Some("(items, limit)"));

        let with_ret = OwnedNode::new("function_definition", 0, 1)
            .field("name", ident(0, "f"))
            .field("parameters", OwnedNode::leaf("parameters", 0, "(x: int)"))
            .field("return_type", OwnedNode::leaf("type", 0, "int"));
        let sig = signature(&with_ret);
        assert_eq!(sig.as_deref(), Some("(x: int) -> int"));
    }

    #[test]
    fn test_signature_falls_back_to_first_line() {
        let elements = extract(&module(), &python_map(), None);
        let load = elements.find("functions", "load").unwrap();
        assert_eq!(load.signature.as_deref(), Some("(self, path)"));
    }

    #[test]
    fn test_c_declarator_chain() {
        let map = NodeTypeMap::new().category("functions", &["function_definition"]);
        let func = OwnedNode::new("function_definition", 0, 3)
            .field("type", OwnedNode::leaf("primitive_type", 0, "int"))
            .field(
                "declarator",
                OwnedNode::new("pointer_declarator", 0, 0).field(
                    "declarator",
                    OwnedNode::new("function_declarator", 0, 0)
                        .field("declarator", ident(0, "make_buffer"))
                        .field("parameters", OwnedNode::leaf("parameter_list", 0, "(size_t n)")),
                ),
            );
        let root = OwnedNode::new("translation_unit", 0, 3).child(func);

        let elements = extract(&root, &map, None);
        let f = &elements.get("functions")[0];
        assert_eq!(f.name, "make_buffer");
        assert_eq!(f.signature.as_deref(), Some("(size_t n)"));
    }
}
