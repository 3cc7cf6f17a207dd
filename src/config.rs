//! Configuration file definitions.
//!
//! ```yaml
//! rules:
//!   select: [B, C9]
//!   ignore: [C902]
//!   settings:
//!     max_line_length: 100
//!   user_rules: true
//!   project_rules: true
//!   extra_dirs: [tools/rules]
//! schema: schema.yaml
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::rules::{Engine, RuleRegistry, RuleSettings, RuleSources, Selection};
use crate::schema::Schema;

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub rules: RulesConfig,
    /// Schema file, relative to the project root. The built-in code schema
    /// is used when absent.
    #[serde(default)]
    pub schema: Option<PathBuf>,
}

/// The `rules` section.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RulesConfig {
    #[serde(default)]
    pub select: Vec<String>,
    #[serde(default)]
    pub ignore: Vec<String>,
    #[serde(default)]
    pub settings: RuleSettings,
    /// Load rules from `~/.reveal/rules` (default: true)
    #[serde(default = "default_true")]
    pub user_rules: bool,
    /// Load rules from `<root>/.reveal/rules` (default: true)
    #[serde(default = "default_true")]
    pub project_rules: bool,
    /// More rule directories, relative to the project root. These override
    /// every other source.
    #[serde(default)]
    pub extra_dirs: Vec<PathBuf>,
}

fn default_true() -> bool {
    true
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            select: Vec::new(),
            ignore: Vec::new(),
            settings: RuleSettings::default(),
            user_rules: true,
            project_rules: true,
            extra_dirs: Vec::new(),
        }
    }
}

impl Config {
    /// Parse a configuration from YAML text.
    pub fn from_yaml(content: &str) -> anyhow::Result<Self> {
        // An empty document is an empty configuration.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Config = serde_yaml::from_str(content)?;
        Ok(config)
    }

    /// Parse a configuration from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_yaml(&content).with_context(|| format!("parsing config {}", path.display()))
    }

    /// The configured select/ignore patterns.
    pub fn selection(&self) -> Selection {
        Selection::new(&self.rules.select, &self.rules.ignore)
    }

    /// Rule sources for a project rooted at `project_root`.
    pub fn rule_sources(&self, project_root: &Path) -> RuleSources {
        let mut sources = RuleSources::standard(project_root);
        if !self.rules.user_rules {
            sources.user_dir = None;
        }
        if !self.rules.project_rules {
            sources.project_dir = None;
        }
        for dir in &self.rules.extra_dirs {
            sources = sources.with_extra_dir(project_root.join(dir));
        }
        sources
    }

    /// Discover every configured rule.
    pub fn registry(&self, project_root: &Path) -> RuleRegistry {
        RuleRegistry::discover(&self.rule_sources(project_root), &self.rules.settings)
    }

    /// An engine running the selected rules.
    pub fn engine(&self, project_root: &Path) -> Engine {
        Engine::new(&self.registry(project_root), &self.selection())
    }

    /// Load the configured schema, or the built-in code schema.
    pub fn load_schema(&self, project_root: &Path) -> anyhow::Result<Schema> {
        match &self.schema {
            Some(path) => Schema::parse_file(project_root.join(path)),
            None => Ok(Schema::code()),
        }
    }
}
