//! C901: functions with too many decision points.
//!
//! Complexity is estimated as 1 plus the number of branching keywords and
//! boolean operators in the function's source lines:
//! - `if`, `elif`, `else`, `for`, `while`, `case`, `when`
//! - `try`, `except`, `catch`
//! - `and`, `or`, `&&`, `||`

use lazy_static::lazy_static;
use regex::Regex;

use crate::analysis::{Element, ElementCollection};
use crate::rules::{Category, Detection, Rule, RuleMeta, Severity};

use super::{functions, RuleSettings};

lazy_static! {
    static ref DECISION_POINT: Regex = Regex::new(
        r"\b(?:if|elif|else|for|while|case|when|try|except|catch|and|or)\b|&&|\|\|"
    ).unwrap();
}

pub struct ComplexFunction {
    meta: RuleMeta,
    threshold: usize,
}

impl ComplexFunction {
    pub const CODE: &'static str = "C901";

    pub fn create(settings: &RuleSettings) -> anyhow::Result<Box<dyn Rule>> {
        let meta = RuleMeta::new(
            Self::CODE,
            "Function is too complex",
            Category::C,
            Severity::Medium,
        );
        Ok(Box::new(Self {
            meta,
            threshold: settings.max_complexity,
        }))
    }
}

/// Estimated cyclomatic complexity of an element's source.
pub(crate) fn complexity(element: &Element, content: &str) -> usize {
    let body = element.source(content);
    1 + body
        .lines()
        .filter(|l| !is_comment(l))
        .map(|l| DECISION_POINT.find_iter(l).count())
        .sum::<usize>()
}

fn is_comment(line: &str) -> bool {
    let t = line.trim_start();
    t.starts_with('#') || t.starts_with("//") || t.starts_with("/*") || t.starts_with('*')
}

impl Rule for ComplexFunction {
    fn meta(&self) -> &RuleMeta {
        &self.meta
    }

    fn check(
        &self,
        target: &str,
        structure: Option<&ElementCollection>,
        content: &str,
    ) -> anyhow::Result<Vec<Detection>> {
        let mut detections = Vec::new();

        for func in functions(structure) {
            let score = complexity(func, content);
            if score <= self.threshold {
                continue;
            }

            detections.push(
                Detection::new(&self.meta, target, func.line_start)
                    .with_message(format!(
                        "{}: {} (complexity: {}, max: {})",
                        self.meta.message, func.name, score, self.threshold
                    ))
                    .with_suggestion("Break into smaller functions or reduce branching")
                    .with_context(format!("Function: {}", func.name)),
            );
        }

        Ok(detections)
    }
}
