//! Built-in rules.
//!
//! Each rule lives in its own module and checks exactly one pattern.
//! Rules are registered through [`BUILTIN_RULES`], a static table of
//! `(code, factory)` pairs; factories receive the configured thresholds.

mod arguments;
mod bare_except;
mod complexity;
mod docker_tags;
mod function_length;
mod insecure_urls;
mod line_length;
mod nesting;
mod todos;

pub use arguments::TooManyArguments;
pub use bare_except::BareExcept;
pub use complexity::ComplexFunction;
pub use docker_tags::DockerLatestTag;
pub use function_length::LongFunction;
pub use insecure_urls::InsecureGithubUrl;
pub use line_length::LineTooLong;
pub use nesting::DeepNesting;
pub use todos::HollowTodo;

use serde::{Deserialize, Serialize};

use crate::analysis::{category, Element, ElementCollection};

use super::Rule;

/// Thresholds used by the built-in rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSettings {
    /// E501. 88 matches the Black formatter default.
    pub max_line_length: usize,
    /// C901, the standard McCabe threshold.
    pub max_complexity: usize,
    /// C902.
    pub max_function_lines: usize,
    /// C905.
    pub max_depth: usize,
    /// R913.
    pub max_args: usize,
}

impl Default for RuleSettings {
    fn default() -> Self {
        Self {
            max_line_length: 88,
            max_complexity: 10,
            max_function_lines: 50,
            max_depth: 4,
            max_args: 5,
        }
    }
}

/// Builds one rule from the configured thresholds.
pub type RuleFactory = fn(&RuleSettings) -> anyhow::Result<Box<dyn Rule>>;

/// Every built-in rule, sorted by code.
pub static BUILTIN_RULES: &[(&str, RuleFactory)] = &[
    ("B001", BareExcept::create),
    ("C901", ComplexFunction::create),
    ("C902", LongFunction::create),
    ("C905", DeepNesting::create),
    ("E501", LineTooLong::create),
    ("M501", HollowTodo::create),
    ("R913", TooManyArguments::create),
    ("S701", DockerLatestTag::create),
    ("U501", InsecureGithubUrl::create),
];

/// Function-like elements of a structure, in category then source order.
fn functions(structure: Option<&ElementCollection>) -> impl Iterator<Item = &Element> {
    structure.into_iter().flat_map(|s| {
        category::FUNCTION_LIKE
            .iter()
            .flat_map(move |cat| s.get(cat).iter())
    })
}

/// Shorten `line` to `max` characters, marking the cut.
fn truncate(line: &str, max: usize) -> String {
    if line.chars().count() > max {
        let cut: String = line.chars().take(max).collect();
        format!("{}...", cut)
    } else {
        line.to_string()
    }
}
