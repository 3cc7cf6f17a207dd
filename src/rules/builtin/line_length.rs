//! E501: lines longer than the configured maximum.

use crate::analysis::ElementCollection;
use crate::rules::{Category, Detection, Rule, RuleMeta, Severity};

use super::{truncate, RuleSettings};

/// Lines containing any of these are never flagged.
const IGNORE_MARKERS: &[&str] = &["http://", "https://", "ftp://", "# noqa", "# type:"];

/// Context snippets are cut to this many characters.
const CONTEXT_WIDTH: usize = 80;

pub struct LineTooLong {
    meta: RuleMeta,
    max_length: usize,
}

impl LineTooLong {
    pub const CODE: &'static str = "E501";

    pub fn create(settings: &RuleSettings) -> anyhow::Result<Box<dyn Rule>> {
        let meta = RuleMeta::new(Self::CODE, "Line too long", Category::E, Severity::Low);
        Ok(Box::new(Self {
            meta,
            max_length: settings.max_line_length,
        }))
    }
}

impl Rule for LineTooLong {
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
            if IGNORE_MARKERS.iter().any(|m| line.contains(m)) {
                continue;
            }

            let length = line.trim_end().chars().count();
            if length <= self.max_length {
                continue;
            }

            detections.push(
                Detection::new(&self.meta, target, idx + 1)
                    .with_message(format!(
                        "{} ({} > {} characters, {} over)",
                        self.meta.message,
                        length,
                        self.max_length,
                        length - self.max_length
                    ))
                    .at_column(self.max_length + 1)
                    .with_suggestion("Break line into multiple lines or refactor")
                    .with_context(truncate(line, CONTEXT_WIDTH)),
            );
        }

        Ok(detections)
    }
}
