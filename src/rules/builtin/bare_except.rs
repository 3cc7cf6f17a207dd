//! B001: bare `except:` clauses in Python.
//!
//! A bare `except:` also catches `SystemExit` and `KeyboardInterrupt`,
//! which is almost never what the author meant.

use lazy_static::lazy_static;
use regex::Regex;

use crate::analysis::ElementCollection;
use crate::rules::{Applicability, Category, Detection, Rule, RuleMeta, Severity};

use super::RuleSettings;

lazy_static! {
    static ref BARE_EXCEPT: Regex = Regex::new(r"^(\s*)except\s*:").unwrap();
    static ref TRIPLE_QUOTE: Regex = Regex::new(r#""""|'''"#).unwrap();
}

pub struct BareExcept {
    meta: RuleMeta,
}

impl BareExcept {
    pub const CODE: &'static str = "B001";

    pub fn create(_settings: &RuleSettings) -> anyhow::Result<Box<dyn Rule>> {
        let meta = RuleMeta::new(
            Self::CODE,
            "Bare except clause catches all exceptions including SystemExit",
            Category::B,
            Severity::High,
        )
        .applies_to(Applicability::new(&[".py"], &[])?);
        Ok(Box::new(Self { meta }))
    }
}

impl Rule for BareExcept {
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
        let mut in_docstring = false;

        for (idx, line) in content.lines().enumerate() {
            // An odd number of triple quotes opens or closes a string block.
            let quotes = TRIPLE_QUOTE.find_iter(line).count();
            let was_in_docstring = in_docstring;
            if quotes % 2 == 1 {
                in_docstring = !in_docstring;
            }
            if was_in_docstring || quotes > 0 {
                continue;
            }

            if let Some(caps) = BARE_EXCEPT.captures(line) {
                let indent = caps.get(1).map_or(0, |m| m.as_str().chars().count());
                detections.push(
                    Detection::new(&self.meta, target, idx + 1)
                        .at_column(indent + 1)
                        .with_suggestion(
                            "Use 'except Exception:' or specific exception types (ValueError, IOError, etc.)",
                        )
                        .with_context(line.trim()),
                );
            }
        }

        Ok(detections)
    }
}
