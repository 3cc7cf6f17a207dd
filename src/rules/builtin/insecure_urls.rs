//! U501: GitHub URLs over plain `http://`.

use lazy_static::lazy_static;
use regex::Regex;

use crate::analysis::ElementCollection;
use crate::rules::{Applicability, Category, Detection, Rule, RuleMeta, Severity};

use super::RuleSettings;

lazy_static! {
    static ref GITHUB_HTTP: Regex =
        Regex::new(r#"(?i)http://(?:[a-zA-Z0-9-]+\.)?github\.(?:com|io)/[^\s'"<>,]+"#).unwrap();
}

pub struct InsecureGithubUrl {
    meta: RuleMeta,
}

impl InsecureGithubUrl {
    pub const CODE: &'static str = "U501";

    pub fn create(_settings: &RuleSettings) -> anyhow::Result<Box<dyn Rule>> {
        let applicability = Applicability::new(
            &["*"],
            &[r"http://github\.com/.*", r"http://.*\.github\.com/.*"],
        )?;
        let meta = RuleMeta::new(
            Self::CODE,
            "GitHub URL uses insecure http:// protocol",
            Category::U,
            Severity::Low,
        )
        .applies_to(applicability);
        Ok(Box::new(Self { meta }))
    }
}

fn secure(url: &str) -> String {
    format!("https://{}", &url["http://".len()..])
}

impl Rule for InsecureGithubUrl {
    fn meta(&self) -> &RuleMeta {
        &self.meta
    }

    fn check(
        &self,
        target: &str,
        _structure: Option<&ElementCollection>,
        content: &str,
    ) -> anyhow::Result<Vec<Detection>> {
        if target.starts_with("http://") {
            if target.contains("github.com") || target.contains("github.io") {
                return Ok(vec![Detection::new(&self.meta, target, 0)
                    .at_column(0)
                    .with_message(format!("{}: {}", self.meta.message, target))
                    .with_suggestion(format!("Use HTTPS: {}", secure(target)))]);
            }
            return Ok(Vec::new());
        }

        let mut detections = Vec::new();
        for (idx, line) in content.lines().enumerate() {
            for mat in GITHUB_HTTP.find_iter(line) {
                let url = mat.as_str();
                detections.push(
                    Detection::new(&self.meta, target, idx + 1)
                        .with_message(format!("{}: {}", self.meta.message, url))
                        .at_column(line[..mat.start()].chars().count() + 1)
                        .with_suggestion(format!("Use HTTPS: {}", secure(url)))
                        .with_context(line.trim()),
                );
            }
        }

        Ok(detections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule() -> Box<dyn Rule> {
        InsecureGithubUrl::create(&RuleSettings::default()).unwrap()
    }

    #[test]
    fn test_file_content() {
        let content = "See http://github.com/org/repo and https://github.com/ok\n\
                       docs: http://www.github.com/org/x, http://org.github.io/site\n";
        let found = rule().check("README.md", None, content).unwrap();

        assert_eq!(found.len(), 3);
        assert_eq!(found[0].location.line, 1);
        assert_eq!(found[0].location.column, 5);
        assert_eq!(found[0].suggestion.as_deref(), Some("Use HTTPS: https://github.com/org/repo"));
        assert_eq!(found[1].message, "GitHub URL uses insecure http:// protocol: http://www.github.com/org/x");
        assert_eq!(found[2].location.line, 2);
    }

    #[test]
    fn test_uri_target() {
        let r = rule();
        let found = r.check("http://github.com/org/repo", None, "").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].location.line, 0);
        assert!(r.check("http://example.com", None, "").unwrap().is_empty());
    }
}
