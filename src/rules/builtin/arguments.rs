//! R913: functions taking too many parameters.
//!
//! Parameters are counted from the extracted signature. The receiver
//! (`self`, `cls`, `&self`, `this`) and variadic catch-alls (`*args`,
//! `**kwargs`, `...rest`) are not counted, nor are Python's bare `*` and
//! `/` separators.

use crate::analysis::ElementCollection;
use crate::rules::{Category, Detection, Rule, RuleMeta, Severity};

use super::{functions, RuleSettings};

pub struct TooManyArguments {
    meta: RuleMeta,
    max_args: usize,
}

impl TooManyArguments {
    pub const CODE: &'static str = "R913";

    pub fn create(settings: &RuleSettings) -> anyhow::Result<Box<dyn Rule>> {
        let meta = RuleMeta::new(
            Self::CODE,
            "Too many arguments to function",
            Category::R,
            Severity::Medium,
        );
        Ok(Box::new(Self {
            meta,
            max_args: settings.max_args,
        }))
    }
}

/// Number of counted parameters in a `(params) -> ret` signature.
pub(crate) fn count_parameters(signature: &str) -> usize {
    parameter_list(signature)
        .map(split_top_level)
        .unwrap_or_default()
        .into_iter()
        .filter(|p| counts_as_parameter(p))
        .count()
}

/// Text between the first `(` and its matching `)`.
fn parameter_list(signature: &str) -> Option<&str> {
    let open = signature.find('(')?;
    let mut depth = 0usize;
    for (i, c) in signature[open..].char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&signature[open + 1..open + i]);
                }
            }
            _ => {}
        }
    }
    // Unbalanced: take the rest.
    Some(&signature[open + 1..])
}

/// Split on commas that are not nested in brackets or generics.
fn split_top_level(params: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (i, c) in params.char_indices() {
        match c {
            '(' | '[' | '{' | '<' => depth += 1,
            ')' | ']' | '}' | '>' => depth -= 1,
            ',' if depth <= 0 => {
                parts.push(params[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(params[start..].trim());
    parts
}

fn counts_as_parameter(param: &str) -> bool {
    if param.is_empty() || param == "/" || param == "void" {
        return false;
    }
    if param.starts_with('*') || param.starts_with("...") {
        return false;
    }

    let name = param
        .trim_start_matches('&')
        .trim_start_matches("mut ")
        .split(|c: char| c == ':' || c == '=' || c.is_whitespace())
        .next()
        .unwrap_or("");
    !matches!(name, "self" | "cls" | "this")
}

impl Rule for TooManyArguments {
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
            let Some(signature) = func.signature.as_deref() else {
                continue;
            };
            let count = count_parameters(signature);
            if count <= self.max_args {
                continue;
            }

            detections.push(
                Detection::new(&self.meta, target, func.line_start)
                    .with_message(format!(
                        "{} ({} > {}): {}()",
                        self.meta.message, count, self.max_args, func.name
                    ))
                    .with_suggestion(format!(
                        "Reduce to {} or fewer arguments. Group related parameters into a \
                         config object, or split the function",
                        self.max_args
                    ))
                    .with_context(format!("{}{}", func.name, signature)),
            );
        }

        Ok(detections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Element;

    #[test]
    fn test_count_parameters() {
        assert_eq!(count_parameters("()"), 0);
        assert_eq!(count_parameters("(void)"), 0);
        assert_eq!(count_parameters("(self, a, b=1, *args, **kwargs)"), 2);
        assert_eq!(count_parameters("(cls, a, *, b, c)"), 3);
        assert_eq!(count_parameters("(&mut self, m: HashMap<K, V>, f: impl Fn(u8, u8))"), 2);
        assert_eq!(count_parameters("(a int, b int) -> (int, error)"), 2);
        assert_eq!(count_parameters("(a, ...rest)"), 1);
        assert_eq!(count_parameters("no parens"), 0);
    }

    #[test]
    fn test_too_many_arguments() {
        let mut wide = Element::spanning("connect", "functions", 3, 5);
        wide.signature = Some("(self, host, port, user, password, timeout, retries)".to_string());
        let mut narrow = Element::spanning("close", "methods", 7, 8);
        narrow.signature = Some("(self)".to_string());

        let mut s = ElementCollection::new();
        s.push(wide);
        s.push(narrow);

        let rule = TooManyArguments::create(&RuleSettings::default()).unwrap();
        let found = rule.check("db.py", Some(&s), "").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].message, "Too many arguments to function (6 > 5): connect()");
        assert_eq!(found[0].location.line, 3);
    }
}
