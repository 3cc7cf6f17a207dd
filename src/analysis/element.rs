//! Structural elements extracted from source code.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Well-known category names used by the built-in language tables.
pub mod category {
    pub const IMPORTS: &str = "imports";
    pub const FUNCTIONS: &str = "functions";
    pub const METHODS: &str = "methods";
    pub const CLASSES: &str = "classes";
    pub const STRUCTS: &str = "structs";
    pub const TYPES: &str = "types";
    pub const MODULES: &str = "modules";

    /// Categories whose elements get a signature and a nesting depth.
    pub const FUNCTION_LIKE: &[&str] = &[FUNCTIONS, METHODS];

    pub fn is_function_like(name: &str) -> bool {
        FUNCTION_LIKE.contains(&name)
    }
}

/// One extracted structural unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    pub name: String,
    /// The category this element was extracted into.
    pub kind: String,
    /// First line (1-indexed).
    pub line_start: usize,
    /// Last line (1-indexed, inclusive).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_end: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_count: Option<usize>,
    /// Maximum control-flow nesting depth (function-like elements only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth: Option<usize>,
}

impl Element {
    /// Create an element covering a single line.
    pub fn new(name: &str, kind: &str, line_start: usize) -> Self {
        Self {
            name: name.to_string(),
            kind: kind.to_string(),
            line_start,
            line_end: None,
            signature: None,
            line_count: None,
            depth: None,
        }
    }

    /// Create an element spanning `line_start..=line_end`.
    ///
    /// Bounds given in the wrong order are swapped.
    pub fn spanning(name: &str, kind: &str, line_start: usize, line_end: usize) -> Self {
        let (start, end) = if line_start <= line_end {
            (line_start, line_end)
        } else {
            (line_end, line_start)
        };
        Self {
            line_end: Some(end),
            line_count: Some(end - start + 1),
            ..Self::new(name, kind, start)
        }
    }

    /// Last line, treating a missing end as a single-line element.
    pub fn last_line(&self) -> usize {
        self.line_end.unwrap_or(self.line_start)
    }

    /// Whether `line` falls inside this element.
    pub fn contains_line(&self, line: usize) -> bool {
        line >= self.line_start && line <= self.last_line()
    }

    /// Source lines covered by this element.
    ///
    /// Returns an empty string if the element lies outside `content`.
    pub fn source<'c>(&self, content: &'c str) -> &'c str {
        let mut offsets = content.match_indices('\n').map(|(i, _)| i + 1);
        let start_line = self.line_start.max(1);
        let start = if start_line == 1 {
            Some(0)
        } else {
            offsets.clone().nth(start_line - 2)
        };
        let Some(start) = start.filter(|&s| s <= content.len()) else {
            return "";
        };
        let end = offsets
            .nth(self.last_line().max(start_line) - 1)
            .map(|e| e - 1)
            .unwrap_or(content.len());
        content[start..end.max(start)].trim_end_matches('\r')
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line_end {
            Some(end) if end != self.line_start => {
                write!(f, "{} ({}, lines {}-{})", self.name, self.kind, self.line_start, end)
            }
            _ => write!(f, "{} ({}, line {})", self.name, self.kind, self.line_start),
        }
    }
}

/// Elements grouped by category, each list in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementCollection {
    #[serde(flatten)]
    categories: BTreeMap<String, Vec<Element>>,
    /// Set when the source could not be parsed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ElementCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty collection tagged with a parse failure.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            categories: BTreeMap::new(),
            error: Some(message.into()),
        }
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }

    /// Make sure `category` is present, even if no element lands in it.
    pub fn ensure_category(&mut self, category: &str) {
        self.categories.entry(category.to_string()).or_default();
    }

    /// Append an element to its category (taken from `element.kind`).
    pub fn push(&mut self, element: Element) {
        self.categories
            .entry(element.kind.clone())
            .or_default()
            .push(element);
    }

    /// Elements of a category. Unknown categories yield an empty slice.
    pub fn get(&self, category: &str) -> &[Element] {
        self.categories
            .get(category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Category names, sorted.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    /// Iterate `(category, elements)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Element])> {
        self.categories
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Every element of every category.
    pub fn all(&self) -> impl Iterator<Item = &Element> {
        self.categories.values().flatten()
    }

    /// Total number of elements.
    pub fn total(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }

    /// Whether no category holds any element.
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Find an element by category and name.
    pub fn find(&self, category: &str, name: &str) -> Option<&Element> {
        self.get(category).iter().find(|e| e.name == name)
    }

    /// Find an element by name in any category.
    pub fn find_any(&self, name: &str) -> Option<&Element> {
        self.all().find(|e| e.name == name)
    }

    /// Apply a navigation bound to every category independently.
    pub fn sliced(&self, bound: Option<super::Slice>) -> Self {
        Self {
            categories: self
                .categories
                .iter()
                .map(|(k, v)| (k.clone(), super::slice(v, bound)))
                .collect(),
            error: self.error.clone(),
        }
    }

    /// Drop categories that ended up empty.
    pub fn without_empty(mut self) -> Self {
        self.categories.retain(|_, v| !v.is_empty());
        self
    }
}
