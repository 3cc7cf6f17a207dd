//! Rebuild nesting from flat, line-ranged elements.

use serde::Serialize;

use super::{Element, ElementCollection};

/// An element with the elements it encloses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HierarchyNode {
    #[serde(flatten)]
    pub element: Element,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<HierarchyNode>,
}

impl HierarchyNode {
    pub fn leaf(element: Element) -> Self {
        Self {
            element,
            children: Vec::new(),
        }
    }

    /// Number of nodes below this one.
    pub fn descendant_count(&self) -> usize {
        self.children
            .iter()
            .map(|c| 1 + c.descendant_count())
            .sum()
    }
}

/// Build a containment forest from flat elements.
///
/// Elements are ordered by start line (stable). Each element becomes a child
/// of the nearest already-placed element whose range strictly contains it:
/// it starts earlier and ends no earlier. When several candidates qualify,
/// the most recently placed one wins. Elements without an end line are
/// treated as single-line. Every input element appears exactly once.
pub fn build(elements: Vec<Element>) -> Vec<HierarchyNode> {
    let mut items = elements;
    items.sort_by_key(|e| e.line_start);

    let mut parents: Vec<Option<usize>> = Vec::with_capacity(items.len());
    for (idx, item) in items.iter().enumerate() {
        let parent = (0..idx).rev().find(|&c| encloses(&items[c], item));
        parents.push(parent);
    }

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); items.len()];
    let mut roots = Vec::new();
    for (idx, parent) in parents.iter().enumerate() {
        match parent {
            Some(p) => children[*p].push(idx),
            None => roots.push(idx),
        }
    }

    let mut slots: Vec<Option<Element>> = items.into_iter().map(Some).collect();
    roots
        .into_iter()
        .map(|r| assemble(r, &children, &mut slots))
        .collect()
}

/// Build a forest from every category of a collection.
pub fn build_collection(collection: &ElementCollection) -> Vec<HierarchyNode> {
    build(collection.all().cloned().collect())
}

/// Pre-order flattening of a forest.
pub fn flatten(roots: &[HierarchyNode]) -> Vec<&Element> {
    let mut out = Vec::new();
    let mut stack: Vec<&HierarchyNode> = roots.iter().rev().collect();
    while let Some(node) = stack.pop() {
        out.push(&node.element);
        stack.extend(node.children.iter().rev());
    }
    out
}

fn encloses(candidate: &Element, item: &Element) -> bool {
    candidate.line_start < item.line_start && candidate.last_line() >= item.last_line()
}

fn assemble(idx: usize, children: &[Vec<usize>], slots: &mut [Option<Element>]) -> HierarchyNode {
    // Parents always precede their children in sorted order, and each index
    // is visited once, so the slot is still filled here.
    let element = slots[idx].take().unwrap_or_else(|| Element::new("", "", 0));
    HierarchyNode {
        element,
        children: children[idx]
            .iter()
            .map(|&c| assemble(c, children, slots))
            .collect(),
    }
}
