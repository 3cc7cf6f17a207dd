//! Select/ignore filtering of rules.

use serde::{Deserialize, Serialize};

use super::{Category, RuleMeta};

/// Patterns deciding which rules are active.
///
/// A pattern matches a rule when it equals the rule's code, is a prefix of
/// it (`B` and `B0` both match `B001`), or equals its category tag. Empty
/// patterns are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    #[serde(default)]
    pub select: Vec<String>,
    #[serde(default)]
    pub ignore: Vec<String>,
}

impl Selection {
    /// Every enabled rule.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn new<S: AsRef<str>>(select: &[S], ignore: &[S]) -> Self {
        Self {
            select: select.iter().map(|s| s.as_ref().to_string()).collect(),
            ignore: ignore.iter().map(|s| s.as_ref().to_string()).collect(),
        }
    }

    pub fn select<S: AsRef<str>>(patterns: &[S]) -> Self {
        Self::new(patterns, &[])
    }

    pub fn ignore<S: AsRef<str>>(patterns: &[S]) -> Self {
        Self::new(&[], patterns)
    }

    /// Whether a rule with this metadata runs under the selection.
    pub fn is_active(&self, meta: &RuleMeta) -> bool {
        let selected =
            self.select.is_empty() || matches_any(&self.select, &meta.code, meta.category);
        let ignored =
            !self.ignore.is_empty() && matches_any(&self.ignore, &meta.code, meta.category);
        selected && !ignored && meta.enabled
    }
}

/// Whether any pattern matches `code` or `category`.
pub fn matches_any(patterns: &[String], code: &str, category: Category) -> bool {
    patterns
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .any(|p| code.starts_with(p) || p == category.as_str())
}
