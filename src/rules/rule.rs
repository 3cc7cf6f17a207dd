//! The rule interface and its metadata.

use std::path::Path;

use globset::{Glob, GlobSet, GlobSetBuilder};
use regex::Regex;

use crate::analysis::ElementCollection;

use super::{Category, Detection, Severity};

/// Universal file pattern.
pub const ANY_FILE: &str = "*";

/// Which targets a rule applies to.
///
/// File patterns are matched against the target's path:
/// - `*` matches every target
/// - an extension such as `.py` is compared to the lowercase suffix
/// - an exact file name such as `Dockerfile`
/// - any other glob (`*.test.js`, `Dockerfile.*`) against the file name
///
/// Target-identifier patterns are regexes anchored at the start of the
/// target, so `http://github\.com/.*` matches URIs but never local paths.
#[derive(Debug, Clone)]
pub struct Applicability {
    file_patterns: Vec<String>,
    uri_patterns: Vec<String>,
    uri_regexes: Vec<Regex>,
    globs: GlobSet,
}

impl Applicability {
    pub fn new(file_patterns: &[&str], uri_patterns: &[&str]) -> anyhow::Result<Self> {
        Self::from_owned(
            file_patterns.iter().map(|s| s.to_string()).collect(),
            uri_patterns.iter().map(|s| s.to_string()).collect(),
        )
    }

    /// Applies to every target.
    pub fn universal() -> Self {
        Self {
            file_patterns: vec![ANY_FILE.to_string()],
            uri_patterns: Vec::new(),
            uri_regexes: Vec::new(),
            globs: GlobSet::empty(),
        }
    }

    pub fn from_owned(file_patterns: Vec<String>, uri_patterns: Vec<String>) -> anyhow::Result<Self> {
        let uri_regexes = uri_patterns
            .iter()
            .map(|p| {
                Regex::new(&format!("^(?:{})", p))
                    .map_err(|e| anyhow::anyhow!("compiling target pattern {:?}: {}", p, e))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        let mut builder = GlobSetBuilder::new();
        for pattern in file_patterns.iter().filter(|p| is_glob(p)) {
            let glob = Glob::new(pattern)
                .map_err(|e| anyhow::anyhow!("compiling file pattern {:?}: {}", pattern, e))?;
            builder.add(glob);
        }
        let globs = builder.build()?;

        Ok(Self {
            file_patterns,
            uri_patterns,
            uri_regexes,
            globs,
        })
    }

    pub fn file_patterns(&self) -> &[String] {
        &self.file_patterns
    }

    pub fn uri_patterns(&self) -> &[String] {
        &self.uri_patterns
    }

    /// Whether the rule should check `target` (a file path or URI).
    pub fn matches(&self, target: &str) -> bool {
        if self.uri_regexes.iter().any(|r| r.is_match(target)) {
            return true;
        }

        if self.file_patterns.iter().any(|p| p == ANY_FILE) {
            return true;
        }

        let path = Path::new(target);
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(target);
        let suffix = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e.to_lowercase()));

        let literal = self
            .file_patterns
            .iter()
            .any(|p| suffix.as_deref() == Some(p.as_str()) || p == name);

        literal || self.globs.is_match(name)
    }
}

fn is_glob(pattern: &str) -> bool {
    pattern != ANY_FILE && pattern.contains(['*', '?', '[', '{'])
}

/// Immutable metadata shared by every rule.
#[derive(Debug, Clone)]
pub struct RuleMeta {
    /// Code such as `B001`; its leading tag names the category.
    pub code: String,
    /// Short description, the default detection message.
    pub message: String,
    pub category: Category,
    pub severity: Severity,
    pub applicability: Applicability,
    pub version: String,
    pub enabled: bool,
}

impl RuleMeta {
    pub fn new(code: &str, message: &str, category: Category, severity: Severity) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
            category,
            severity,
            applicability: Applicability::universal(),
            version: "1.0.0".to_string(),
            enabled: true,
        }
    }

    pub fn applies_to(mut self, applicability: Applicability) -> Self {
        self.applicability = applicability;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// One check for one pattern.
///
/// `structure` is the extracted structure of the target when one is
/// available (local source files), and `None` for URIs or unsupported
/// file types. Rules must not assume it is present.
///
/// Implementations must not panic. A failure is reported by returning
/// `Err`, which drops that rule's detections for the target while the
/// other rules still run.
pub trait Rule: Send + Sync {
    fn meta(&self) -> &RuleMeta;

    fn check(
        &self,
        target: &str,
        structure: Option<&ElementCollection>,
        content: &str,
    ) -> anyhow::Result<Vec<Detection>>;

    fn code(&self) -> &str {
        &self.meta().code
    }

    fn applies_to(&self, target: &str) -> bool {
        self.meta().applicability.matches(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_universal() {
        let a = Applicability::universal();
        assert!(a.matches("src/main.rs"));
        assert!(a.matches("https://example.com"));
    }

    #[test]
    fn test_extension_is_case_insensitive() {
        let a = Applicability::new(&[".py"], &[]).unwrap();
        assert!(a.matches("pkg/mod.py"));
        assert!(a.matches("pkg/MOD.PY"));
        assert!(!a.matches("pkg/mod.pyc"));
        assert!(!a.matches("py"));
    }

    #[test]
    fn test_exact_file_name() {
        let a = Applicability::new(&["Dockerfile", ".dockerfile"], &[]).unwrap();
        assert!(a.matches("deploy/Dockerfile"));
        assert!(a.matches("build.dockerfile"));
        assert!(!a.matches("Dockerfile.old"));
    }

    #[test]
    fn test_glob_file_pattern() {
        let a = Applicability::new(&["Dockerfile.*", "*.test.js"], &[]).unwrap();
        assert!(a.matches("deploy/Dockerfile.prod"));
        assert!(a.matches("web/app.test.js"));
        assert!(!a.matches("web/app.js"));
    }

    #[test]
    fn test_uri_patterns_are_anchored() {
        let a = Applicability::new(&[".md"], &[r"http://github\.com/.*"]).unwrap();
        assert!(a.matches("http://github.com/org/repo"));
        assert!(!a.matches("see http://github.com/org/repo"));
        assert!(a.matches("README.md"));
    }

    #[test]
    fn test_invalid_pattern_is_an_error() {
        assert!(Applicability::new(&["*"], &["(unclosed"]).is_err());
    }
}
