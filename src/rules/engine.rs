//! Runs the active rules against one target.

use std::sync::Arc;

use crate::analysis::ElementCollection;

use super::{Detection, Rule, RuleRegistry, Selection};

/// Executes a fixed set of rules against targets.
///
/// The rule set is snapshotted from a registry at construction, so an
/// engine is unaffected by later registry changes and can be shared
/// across threads.
#[derive(Clone)]
pub struct Engine {
    rules: Vec<Arc<dyn Rule>>,
}

impl Engine {
    /// Create an engine running the rules `selection` activates.
    pub fn new(registry: &RuleRegistry, selection: &Selection) -> Self {
        Self::from_rules(registry.get_rules(selection))
    }

    /// Create an engine running exactly these rules.
    pub fn from_rules(rules: Vec<Arc<dyn Rule>>) -> Self {
        Self { rules }
    }

    /// Codes of the rules this engine runs.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|r| r.code())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Run every applicable rule against `target`.
    ///
    /// A rule that fails is logged and contributes nothing; the remaining
    /// rules still run. Detections come back in rule-code order, then in
    /// the order each rule reported them.
    pub fn check(
        &self,
        target: &str,
        structure: Option<&ElementCollection>,
        content: &str,
    ) -> Vec<Detection> {
        let mut detections = Vec::new();
        let mut ran = 0usize;

        for rule in self.rules.iter().filter(|r| r.applies_to(target)) {
            ran += 1;
            match rule.check(target, structure, content) {
                Ok(found) => detections.extend(found),
                Err(e) => {
                    tracing::error!(code = %rule.code(), path = %target, error = %e, "rule failed");
                }
            }
        }

        tracing::debug!(path = %target, rules = ran, detections = detections.len(), "checked target");
        detections
    }

    /// Run the rules over source text, extracting its structure first.
    ///
    /// Targets whose language is unsupported or fails to parse are still
    /// checked, with no structure.
    #[cfg(feature = "tree-sitter")]
    pub fn check_source(&self, target: &str, content: &str) -> Vec<Detection> {
        let structure = crate::languages::analyze_target(target, content, None);
        let structure = (!structure.is_failed()).then_some(&structure);
        self.check(target, structure, content)
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("rules", &self.codes().collect::<Vec<_>>())
            .finish()
    }
}
