//! Pattern rules and the engine that runs them.
//!
//! A rule checks a target (a file path or a URI) for one pattern and
//! reports [`Detection`]s. Rules come from three kinds of source:
//!
//! - built-in rules compiled into the crate ([`builtin::BUILTIN_RULES`])
//! - user rules under `~/.reveal/rules/<category>/<CODE>.yaml`
//! - project rules under `<root>/.reveal/rules/<category>/<CODE>.yaml`
//!
//! Later sources override earlier ones by code. [`RuleRegistry::discover`]
//! loads every source into an immutable snapshot; [`Engine`] runs the rules
//! a [`Selection`] activates.
//!
//! ```text
//! RuleSources ──discover──▶ RuleRegistry ──Selection──▶ Engine ──check──▶ Vec<Detection>
//! ```

pub mod builtin;
mod engine;
mod registry;
mod rule;
mod selection;
mod source;
mod types;

pub use builtin::{RuleFactory, RuleSettings, BUILTIN_RULES};
pub use engine::Engine;
pub use registry::{RuleInfo, RuleRegistry};
pub use rule::{Applicability, Rule, RuleMeta, ANY_FILE};
pub use selection::{matches_any, Selection};
pub use source::{
    load_dir, user_rules_dir, PatternRule, PatternRuleDef, RuleLoadError, RuleSources,
    SourceKind, RULES_DIR,
};
pub use types::{Category, Detection, Location, Severity};
