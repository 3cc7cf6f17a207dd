//! C902: functions that run too long.

use crate::analysis::ElementCollection;
use crate::rules::{Category, Detection, Rule, RuleMeta, Severity};

use super::{functions, RuleSettings};

pub struct LongFunction {
    meta: RuleMeta,
    max_lines: usize,
}

impl LongFunction {
    pub const CODE: &'static str = "C902";

    pub fn create(settings: &RuleSettings) -> anyhow::Result<Box<dyn Rule>> {
        let meta = RuleMeta::new(Self::CODE, "Function is too long", Category::C, Severity::Low);
        Ok(Box::new(Self {
            meta,
            max_lines: settings.max_function_lines,
        }))
    }
}

impl Rule for LongFunction {
    fn meta(&self) -> &RuleMeta {
        &self.meta
    }

    fn check(
        &self,
        target: &str,
        structure: Option<&ElementCollection>,
        _content: &str,
    ) -> anyhow::Result<Vec<Detection>> {
        Ok(functions(structure)
            .filter_map(|func| {
                let lines = func
                    .line_count
                    .unwrap_or(func.last_line() - func.line_start + 1);
                (lines > self.max_lines).then(|| {
                    Detection::new(&self.meta, target, func.line_start)
                        .with_message(format!(
                            "{}: {} ({} lines, max: {})",
                            self.meta.message, func.name, lines, self.max_lines
                        ))
                        .with_suggestion("Extract helper functions")
                        .with_context(format!("Function: {}", func.name))
                })
            })
            .collect())
    }
}
