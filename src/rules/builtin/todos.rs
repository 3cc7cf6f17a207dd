//! M501: hollow TODO markers.
//!
//! Distinguishes between meaningful TODOs (with specific context) and
//! hollow TODOs (generic placeholders without useful information).
//!
//! # Good TODOs (not flagged):
//! - `// TODO: Use io_uring for zero-copy when kernel >= 5.19`
//! - `// TODO(jsmith): Optimize query performance per #1234`
//! - `# FIXME: Race condition when concurrent writes exceed buffer`
//!
//! # Hollow TODOs (flagged):
//! - `// TODO: Implement this function`
//! - `# TODO`
//! - `// FIXME: fix this`
//! - `// TODO: finish later`

use lazy_static::lazy_static;
use regex::Regex;

use crate::analysis::ElementCollection;
use crate::rules::{Category, Detection, Rule, RuleMeta, Severity};

use super::RuleSettings;

lazy_static! {
    /// TODO/FIXME markers, with an optional `(owner)` tag.
    static ref TODO_PATTERN: Regex = Regex::new(
        r"(?i)\b(TODO|FIXME|XXX|HACK)\b(\([^)]*\))?\s*:?\s*(.*)"
    ).unwrap();

    /// Generic placeholder text without technical specifics.
    static ref HOLLOW_PATTERNS: Vec<Regex> = [
        r"(?i)^\s*implement\s+(this|here|later|the)(\s+(function|method|code|logic|feature))?\s*$",
        r"(?i)^\s*implement\s*$",
        r"(?i)^\s*(finish|complete)\s+(this|here|later|the)(\s+(function|method|code|logic|feature|implementation))?\s*$",
        r"(?i)^\s*(finish|complete)\s+(implementation|later)\s*$",
        r"(?i)^\s*(finish|complete)\s*$",
        r"(?i)^\s*add\s+(this|here|later|the)(\s+(function|method|code|logic|feature|implementation))?\s*$",
        r"(?i)^\s*add\s+(code|implementation|logic)\s*$",
        r"(?i)^\s*add\s*$",
        r"(?i)^\s*fix\s+(this|here|it|later|the)(\s+(bug|issue|error|problem))?\s*$",
        r"(?i)^\s*fix\s+(bug|issue|error|problem|it|later)\s*$",
        r"(?i)^\s*fix\s*$",
        r"(?i)^\s*do\s+(this|something|later)\s*$",
        r"(?i)^\s*handle\s+(this|here|it|the)(\s+(error|case|exception))?\s*$",
        r"(?i)^\s*handle\s+(error|case|exception)\s*$",
        r"(?i)^\s*write\s+(this|here|the)(\s+(code|implementation|function|method))?\s*$",
        r"(?i)^\s*fill\s*(this\s*)?in\s*(later|here)?\s*$",
        r"(?i)^\s*(placeholder|stub|tbd|wip)\s*$",
        r"(?i)^\s*not\s+implemented\s*(yet)?\s*$",
        r"(?i)^\s*needs?\s+(implementation|work|to\s+be\s+done)\s*$",
        r"(?i)^\s*(change|remove|delete)\s+(this|me|later)\s*$",
        r"(?i)^\s*(update|refactor|cleanup|clean\s+up)\s+(this|here|later)\s*$",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect();

    /// A marker inside a string assignment or call argument.
    static ref STRING_CONTENT: Vec<Regex> = vec![
        Regex::new(r#"(?i)=\s*["'].*(?:TODO|FIXME|XXX|HACK).*["']"#).unwrap(),
        Regex::new(r#"(?i)\(\s*["'].*(?:TODO|FIXME|XXX|HACK).*["']\s*\)"#).unwrap(),
    ];
}

pub struct HollowTodo {
    meta: RuleMeta,
}

impl HollowTodo {
    pub const CODE: &'static str = "M501";

    pub fn create(_settings: &RuleSettings) -> anyhow::Result<Box<dyn Rule>> {
        let meta = RuleMeta::new(
            Self::CODE,
            "TODO marker without actionable context",
            Category::M,
            Severity::Low,
        );
        Ok(Box::new(Self { meta }))
    }
}

/// Whether the text after a marker says nothing actionable.
fn is_hollow(text: &str) -> bool {
    let trimmed = text
        .trim()
        .trim_end_matches("*/")
        .trim_end_matches("-->")
        .trim();
    trimmed.is_empty() || HOLLOW_PATTERNS.iter().any(|p| p.is_match(trimmed))
}

/// Heuristic for markers inside user-facing strings rather than comments.
fn is_likely_string_content(line: &str) -> bool {
    let trimmed = line.trim();
    if (trimmed.starts_with('"') || trimmed.starts_with('\''))
        && TODO_PATTERN.is_match(trimmed)
    {
        return true;
    }
    STRING_CONTENT.iter().any(|p| p.is_match(trimmed))
}

impl Rule for HollowTodo {
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
            if is_likely_string_content(line) {
                continue;
            }

            let Some(caps) = TODO_PATTERN.captures(line) else {
                continue;
            };
            let marker = caps.get(1).map_or("TODO", |m| m.as_str()).to_uppercase();
            let text = caps.get(3).map_or("", |m| m.as_str());

            if !is_hollow(text) {
                continue;
            }

            let message = if text.trim().is_empty() {
                format!("{} marker without context", marker)
            } else {
                format!("{} with hollow context: {:?}", marker, text.trim())
            };
            let column = caps.get(0).map_or(0, |m| line[..m.start()].chars().count()) + 1;

            detections.push(
                Detection::new(&self.meta, target, idx + 1)
                    .with_message(message)
                    .at_column(column)
                    .with_suggestion("Say what is missing and why, or link an issue")
                    .with_context(line.trim()),
            );
        }

        Ok(detections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_hollow() {
        assert!(is_hollow(""));
        assert!(is_hollow("implement"));
        assert!(is_hollow("Implement this function"));
        assert!(is_hollow("finish later"));
        assert!(is_hollow("fix this"));
        assert!(is_hollow("TBD"));
        assert!(is_hollow("not implemented"));
        assert!(is_hollow("add code */"));

        assert!(!is_hollow("Use io_uring for zero-copy when kernel >= 5.19"));
        assert!(!is_hollow("Optimize query performance per #1234"));
        assert!(!is_hollow("Add retry logic with exponential backoff"));
        assert!(!is_hollow("Fix memory leak in worker thread pool"));
    }

    #[test]
    fn test_detect_hollow_todos() {
        let source = r#"
fn main() {
    // TODO: implement this function
    let x = 1;

    // TODO: Use io_uring for zero-copy when kernel >= 5.19
    do_something();

    // FIXME
    broken_code();

    // TODO(jsmith): Optimize with batching per #456
    process();
}
"#;
        let rule = HollowTodo::create(&RuleSettings::default()).unwrap();
        let found = rule.check("main.rs", None, source).unwrap();

        assert_eq!(found.len(), 2);
        assert_eq!(found[0].location.line, 3);
        assert_eq!(found[0].location.column, 8);
        assert_eq!(found[0].message, "TODO with hollow context: \"implement this function\"");
        assert_eq!(found[1].location.line, 9);
        assert_eq!(found[1].message, "FIXME marker without context");
    }

    #[test]
    fn test_skip_string_content() {
        let source = "let msg = \"TODO: implement this\";\nprintln!(\"FIXME: fix this\");\n";
        let rule = HollowTodo::create(&RuleSettings::default()).unwrap();
        assert!(rule.check("main.rs", None, source).unwrap().is_empty());
    }
}
