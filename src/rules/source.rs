//! Rule sources and declarative pattern rules.
//!
//! User and project rules live in category directories, one YAML file per
//! rule, named after the rule code:
//!
//! ```text
//! ~/.reveal/rules/
//!   security/
//!     S901.yaml
//!   _drafts/          <- skipped
//!     S999.yaml
//! ```
//!
//! ```yaml
//! code: S901
//! message: Hardcoded AWS access key
//! category: S
//! severity: critical
//! file_patterns: ["*"]
//! pattern: 'AKIA[0-9A-Z]{16}'
//! suggestion: Load credentials from the environment
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use walkdir::WalkDir;

use crate::analysis::ElementCollection;

use super::{Applicability, Category, Detection, Rule, RuleMeta, Severity};

/// Directory name, under a home or project root, holding rule sources.
pub const RULES_DIR: &str = ".reveal/rules";

/// Where rules come from, in precedence order.
///
/// Later sources override earlier ones: built-in, then user-level, then
/// project-level, then any extra directories in the order given.
#[derive(Debug, Clone, Default)]
pub struct RuleSources {
    pub builtin: bool,
    pub user_dir: Option<PathBuf>,
    pub project_dir: Option<PathBuf>,
    pub extra_dirs: Vec<PathBuf>,
}

impl RuleSources {
    /// Only the built-in rules.
    pub fn builtin_only() -> Self {
        Self {
            builtin: true,
            ..Self::default()
        }
    }

    /// Built-in, `~/.reveal/rules` and `<project_root>/.reveal/rules`.
    pub fn standard(project_root: &Path) -> Self {
        Self {
            builtin: true,
            user_dir: user_rules_dir(),
            project_dir: Some(project_root.join(RULES_DIR)),
            extra_dirs: Vec::new(),
        }
    }

    pub fn with_extra_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.extra_dirs.push(dir.into());
        self
    }

    /// Rule directories in precedence order.
    pub fn dirs(&self) -> impl Iterator<Item = (SourceKind, &Path)> {
        self.user_dir
            .iter()
            .map(|d| (SourceKind::User, d.as_path()))
            .chain(self.project_dir.iter().map(|d| (SourceKind::Project, d.as_path())))
            .chain(self.extra_dirs.iter().map(|d| (SourceKind::Extra, d.as_path())))
    }
}

/// The user-level rules directory, `~/.reveal/rules`.
pub fn user_rules_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|dirs| dirs.home_dir().join(RULES_DIR))
}

/// Kind of rule source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Builtin,
    User,
    Project,
    Extra,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceKind::Builtin => write!(f, "builtin"),
            SourceKind::User => write!(f, "user"),
            SourceKind::Project => write!(f, "project"),
            SourceKind::Extra => write!(f, "extra"),
        }
    }
}

/// Why a rule could not be loaded.
#[derive(Debug, Error)]
pub enum RuleLoadError {
    #[error("reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("walking {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("parsing {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("{path}: file name {stem:?} does not match rule code {code:?}")]
    CodeMismatch {
        path: PathBuf,
        stem: String,
        code: String,
    },

    #[error("{path}: invalid pattern: {message}")]
    InvalidPattern { path: PathBuf, message: String },

    #[error("built-in rule {code}: {message}")]
    Builtin { code: String, message: String },
}

impl RuleLoadError {
    /// The file (or pseudo-path for built-ins) that failed.
    pub fn path(&self) -> &Path {
        match self {
            RuleLoadError::Io { path, .. }
            | RuleLoadError::Walk { path, .. }
            | RuleLoadError::Parse { path, .. }
            | RuleLoadError::CodeMismatch { path, .. }
            | RuleLoadError::InvalidPattern { path, .. } => path,
            RuleLoadError::Builtin { .. } => Path::new("<builtin>"),
        }
    }
}

/// On-disk form of a pattern rule.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PatternRuleDef {
    pub code: String,
    pub message: String,
    /// Defaults to the tag the code starts with.
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default = "default_file_patterns")]
    pub file_patterns: Vec<String>,
    #[serde(default)]
    pub uri_patterns: Vec<String>,
    /// Regex searched on every line of the content.
    pub pattern: String,
    #[serde(default)]
    pub suggestion: Option<String>,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_file_patterns() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_version() -> String {
    "1.0.0".to_string()
}

fn default_enabled() -> bool {
    true
}

/// A rule reporting every line where a regex matches.
#[derive(Debug)]
pub struct PatternRule {
    meta: RuleMeta,
    regex: Regex,
    suggestion: Option<String>,
    source: PathBuf,
}

impl PatternRule {
    /// Build a rule from its definition. `path` is used in error messages.
    pub fn from_def(def: PatternRuleDef, path: &Path) -> Result<Self, RuleLoadError> {
        let invalid = |message: String| RuleLoadError::InvalidPattern {
            path: path.to_path_buf(),
            message,
        };

        let category = def
            .category
            .or_else(|| Category::from_code(&def.code))
            .ok_or_else(|| invalid(format!("cannot infer category from code {:?}", def.code)))?;
        let regex = Regex::new(&def.pattern).map_err(|e| invalid(e.to_string()))?;
        let applicability = Applicability::from_owned(def.file_patterns, def.uri_patterns)
            .map_err(|e| invalid(e.to_string()))?;

        let mut meta = RuleMeta::new(&def.code, &def.message, category, def.severity)
            .applies_to(applicability);
        meta.version = def.version;
        meta.enabled = def.enabled;

        Ok(Self {
            meta,
            regex,
            suggestion: def.suggestion,
            source: path.to_path_buf(),
        })
    }

    /// Load a rule file. The file stem must equal the declared code.
    pub fn load(path: &Path) -> Result<Self, RuleLoadError> {
        let content = fs::read_to_string(path).map_err(|source| RuleLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let def: PatternRuleDef =
            serde_yaml::from_str(&content).map_err(|source| RuleLoadError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        if stem != def.code {
            return Err(RuleLoadError::CodeMismatch {
                path: path.to_path_buf(),
                stem,
                code: def.code,
            });
        }

        Self::from_def(def, path)
    }

    /// File the rule was loaded from.
    pub fn source(&self) -> &Path {
        &self.source
    }
}

impl Rule for PatternRule {
    fn meta(&self) -> &RuleMeta {
        &self.meta
    }

    fn check(
        &self,
        target: &str,
        _structure: Option<&ElementCollection>,
        content: &str,
    ) -> anyhow::Result<Vec<Detection>> {
        let mut detections = Vec::new();

        for (idx, line) in content.lines().enumerate() {
            for mat in self.regex.find_iter(line) {
                let mut d = Detection::new(&self.meta, target, idx + 1)
                    .at_column(mat.start() + 1)
                    .with_context(line.trim());
                if let Some(s) = &self.suggestion {
                    d = d.with_suggestion(s.clone());
                }
                detections.push(d);
            }
        }

        Ok(detections)
    }
}

/// Load every rule file under `dir`.
///
/// Only `<dir>/<category>/<CODE>.yaml` (or `.yml`) files are read;
/// directories and files starting with `_` are skipped. A missing `dir`
/// yields nothing. Files are visited in name order.
pub fn load_dir(dir: &Path) -> (Vec<PatternRule>, Vec<RuleLoadError>) {
    let mut rules = Vec::new();
    let mut errors = Vec::new();

    if !dir.is_dir() {
        return (rules, errors);
    }

    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(2)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('_'));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(source) => {
                errors.push(RuleLoadError::Walk {
                    path: dir.to_path_buf(),
                    source,
                });
                continue;
            }
        };

        if entry.depth() != 2 || !entry.file_type().is_file() || !is_rule_file(entry.path()) {
            continue;
        }

        match PatternRule::load(entry.path()) {
            Ok(rule) => {
                tracing::debug!(code = %rule.meta.code, path = %entry.path().display(), "loaded rule");
                rules.push(rule);
            }
            Err(e) => errors.push(e),
        }
    }

    (rules, errors)
}

fn is_rule_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}
