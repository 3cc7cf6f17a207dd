//! C905: functions with deeply nested control flow.

use crate::analysis::ElementCollection;
use crate::rules::{Category, Detection, Rule, RuleMeta, Severity};

use super::{functions, RuleSettings};

pub struct DeepNesting {
    meta: RuleMeta,
    max_depth: usize,
}

impl DeepNesting {
    pub const CODE: &'static str = "C905";

    pub fn create(settings: &RuleSettings) -> anyhow::Result<Box<dyn Rule>> {
        let meta = RuleMeta::new(
            Self::CODE,
            "Nesting depth too high",
            Category::C,
            Severity::Medium,
        );
        Ok(Box::new(Self {
            meta,
            max_depth: settings.max_depth,
        }))
    }
}

impl Rule for DeepNesting {
    fn meta(&self) -> &RuleMeta {
        &self.meta
    }

    fn check(
        &self,
        target: &str,
        structure: Option<&ElementCollection>,
        _content: &str,
    ) -> anyhow::Result<Vec<Detection>> {
        let mut detections = Vec::new();

        for func in functions(structure) {
            let Some(depth) = func.depth else {
                continue;
            };
            if depth > self.max_depth {
                detections.push(
                    Detection::new(&self.meta, target, func.line_start)
                        .with_message(format!(
                            "{}: {} (depth: {}, max: {})",
                            self.meta.message, func.name, depth, self.max_depth
                        ))
                        .with_suggestion("Use early returns or extract nested blocks into functions")
                        .with_context(format!("Function: {}", func.name)),
                );
            }
        }

        Ok(detections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Element;

    #[test]
    fn test_deep_nesting() {
        let mut deep = Element::spanning("deep", "functions", 1, 30);
        deep.depth = Some(6);
        let mut ok = Element::spanning("ok", "functions", 40, 50);
        ok.depth = Some(4);
        let unknown = Element::spanning("unknown", "functions", 60, 70);

        let mut s = ElementCollection::new();
        s.push(deep);
        s.push(ok);
        s.push(unknown);

        let rule = DeepNesting::create(&RuleSettings::default()).unwrap();
        let found = rule.check("x.go", Some(&s), "").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].message, "Nesting depth too high: deep (depth: 6, max: 4)");
    }
}
