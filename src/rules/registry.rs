//! Rule registry: discovery, indexing and lookup.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use super::builtin::{RuleSettings, BUILTIN_RULES};
use super::source::{load_dir, RuleLoadError, RuleSources};
use super::{Category, Rule, Selection, Severity};

/// An immutable snapshot of known rules, indexed by code and category.
///
/// Build it once with [`RuleRegistry::discover`] (or [`RuleRegistry::builtin`])
/// and share it; rebuilding produces a new snapshot.
#[derive(Clone, Default)]
pub struct RuleRegistry {
    by_code: BTreeMap<String, Arc<dyn Rule>>,
    by_category: BTreeMap<Category, Vec<String>>,
    skipped: Vec<Arc<RuleLoadError>>,
}

impl RuleRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Only the built-in rules.
    pub fn builtin(settings: &RuleSettings) -> Self {
        Self::discover(&RuleSources::builtin_only(), settings)
    }

    /// Load rules from every source, later sources overriding earlier ones
    /// by code. Rules that fail to load are logged and recorded in
    /// [`skipped`](Self::skipped); discovery carries on.
    pub fn discover(sources: &RuleSources, settings: &RuleSettings) -> Self {
        let mut registry = Self::new();

        if sources.builtin {
            for (code, factory) in BUILTIN_RULES {
                match factory(settings) {
                    Ok(rule) => {
                        registry.insert(Arc::from(rule));
                    }
                    Err(e) => registry.skip(RuleLoadError::Builtin {
                        code: code.to_string(),
                        message: e.to_string(),
                    }),
                }
            }
        }

        for (kind, dir) in sources.dirs() {
            let (rules, errors) = load_dir(dir);
            tracing::debug!(source = %kind, dir = %dir.display(), count = rules.len(), "scanned rule directory");

            for rule in rules {
                if let Some(previous) = registry.insert(Arc::new(rule)) {
                    tracing::info!(code = %previous.code(), source = %kind, "rule overridden");
                }
            }
            for error in errors {
                registry.skip(error);
            }
        }

        registry.reindex();
        tracing::info!(
            rules = registry.len(),
            categories = registry.by_category.len(),
            skipped = registry.skipped.len(),
            "discovered rules"
        );
        registry
    }

    /// Add a rule, replacing any rule with the same code.
    ///
    /// Returns the replaced rule.
    pub fn register(&mut self, rule: Arc<dyn Rule>) -> Option<Arc<dyn Rule>> {
        let previous = self.insert(rule);
        self.reindex();
        previous
    }

    fn insert(&mut self, rule: Arc<dyn Rule>) -> Option<Arc<dyn Rule>> {
        self.by_code.insert(rule.code().to_string(), rule)
    }

    fn skip(&mut self, error: RuleLoadError) {
        tracing::warn!(path = %error.path().display(), error = %error, "skipping rule");
        self.skipped.push(Arc::new(error));
    }

    fn reindex(&mut self) {
        self.by_category.clear();
        for (code, rule) in &self.by_code {
            self.by_category
                .entry(rule.meta().category)
                .or_default()
                .push(code.clone());
        }
    }

    /// Rules that failed to load.
    pub fn skipped(&self) -> impl Iterator<Item = &RuleLoadError> {
        self.skipped.iter().map(|e| &**e)
    }

    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }

    /// Look up a rule by exact code.
    pub fn get_rule(&self, code: &str) -> Option<&Arc<dyn Rule>> {
        self.by_code.get(code)
    }

    /// Every rule in a category, sorted by code.
    pub fn rules_in_category(&self, category: Category) -> Vec<&Arc<dyn Rule>> {
        self.by_category
            .get(&category)
            .into_iter()
            .flatten()
            .filter_map(|code| self.by_code.get(code))
            .collect()
    }

    /// Every rule, sorted by code.
    pub fn all(&self) -> impl Iterator<Item = &Arc<dyn Rule>> {
        self.by_code.values()
    }

    /// Rules active under `selection`, sorted by code.
    pub fn get_rules(&self, selection: &Selection) -> Vec<Arc<dyn Rule>> {
        self.by_code
            .values()
            .filter(|r| selection.is_active(r.meta()))
            .cloned()
            .collect()
    }

    /// Metadata of the active rules, optionally limited to one category.
    pub fn list_rules(&self, selection: &Selection, category: Option<Category>) -> Vec<RuleInfo> {
        self.get_rules(selection)
            .iter()
            .filter(|r| category.map_or(true, |c| r.meta().category == c))
            .map(|r| RuleInfo::from(&**r))
            .collect()
    }
}

impl std::fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("rules", &self.by_code.keys().collect::<Vec<_>>())
            .field("skipped", &self.skipped.len())
            .finish()
    }
}

/// Serializable summary of one rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleInfo {
    pub code: String,
    pub message: String,
    pub category: Category,
    pub severity: Severity,
    pub file_patterns: Vec<String>,
    pub uri_patterns: Vec<String>,
    pub version: String,
    pub enabled: bool,
}

impl From<&dyn Rule> for RuleInfo {
    fn from(rule: &dyn Rule) -> Self {
        let meta = rule.meta();
        Self {
            code: meta.code.clone(),
            message: meta.message.clone(),
            category: meta.category,
            severity: meta.severity,
            file_patterns: meta.applicability.file_patterns().to_vec(),
            uri_patterns: meta.applicability.uri_patterns().to_vec(),
            version: meta.version.clone(),
            enabled: meta.enabled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_rule(dir: &std::path::Path, rel: &str, content: &str) {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_builtin_registry() {
        let registry = RuleRegistry::builtin(&RuleSettings::default());
        assert_eq!(registry.len(), BUILTIN_RULES.len());
        assert_eq!(registry.skipped().count(), 0);

        assert_eq!(registry.get_rule("B001").unwrap().meta().severity, Severity::High);
        assert!(registry.get_rule("Z999").is_none());

        let complexity: Vec<_> = registry
            .rules_in_category(Category::C)
            .iter()
            .map(|r| r.code().to_string())
            .collect();
        assert_eq!(complexity, ["C901", "C902", "C905"]);
        assert!(registry.rules_in_category(Category::Perf).is_empty());
    }

    #[test]
    fn test_list_rules() {
        let registry = RuleRegistry::builtin(&RuleSettings::default());

        let infos = registry.list_rules(&Selection::all(), Some(Category::S));
        assert_eq!(infos.len(), 1);
        assert_eq!(infos[0].code, "S701");
        assert!(infos[0].file_patterns.contains(&"Dockerfile".to_string()));

        let infos = registry.list_rules(&Selection::ignore(&["C", "E"]), None);
        let codes: Vec<_> = infos.iter().map(|i| i.code.as_str()).collect();
        assert_eq!(codes, ["B001", "M501", "R913", "S701", "U501"]);

        let json = serde_json::to_value(&infos[0]).unwrap();
        assert_eq!(json["severity"], "high");
        assert_eq!(json["category"], "B");
    }

    #[test]
    fn test_later_source_overrides() {
        let user = TempDir::new().unwrap();
        let project = TempDir::new().unwrap();
        write_rule(
            user.path(),
            "errors/E501.yaml",
            "code: E501\nmessage: user override\npattern: '.{120,}'\n",
        );
        write_rule(
            project.path(),
            "errors/E501.yaml",
            "code: E501\nmessage: project override\npattern: '.{100,}'\nseverity: high\n",
        );
        write_rule(project.path(), "errors/E999.yaml", "code: E998\nmessage: m\npattern: x\n");

        let sources = RuleSources {
            builtin: true,
            user_dir: Some(user.path().to_path_buf()),
            project_dir: Some(project.path().to_path_buf()),
            extra_dirs: Vec::new(),
        };
        let registry = RuleRegistry::discover(&sources, &RuleSettings::default());

        let e501 = registry.get_rule("E501").unwrap();
        assert_eq!(e501.meta().message, "project override");
        assert_eq!(e501.meta().severity, Severity::High);
        assert_eq!(registry.len(), BUILTIN_RULES.len());

        let skipped: Vec<_> = registry.skipped().collect();
        assert_eq!(skipped.len(), 1);
        assert!(matches!(skipped[0], RuleLoadError::CodeMismatch { .. }));
    }

    #[test]
    fn test_registry_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RuleRegistry>();
    }
}
