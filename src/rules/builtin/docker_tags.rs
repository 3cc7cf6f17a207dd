//! S701: Docker images on `:latest` or with no tag at all.
//!
//! Checks `FROM` lines in Dockerfiles, and the body of Docker Hub tag
//! pages when the target is a URI.

use lazy_static::lazy_static;
use regex::Regex;

use crate::analysis::ElementCollection;
use crate::rules::{Applicability, Category, Detection, Rule, RuleMeta, Severity};

use super::RuleSettings;

lazy_static! {
    static ref LATEST_TAG: Regex = Regex::new(r"(?i)^\s*FROM\s+(\S+):latest\b").unwrap();
    static ref NO_TAG: Regex = Regex::new(r"(?i)^\s*FROM\s+([a-zA-Z0-9_/.-]+)\s*(?:#.*)?$").unwrap();
}

/// Base images that have no tags.
const UNTAGGED_IMAGES: &[&str] = &["scratch"];

pub struct DockerLatestTag {
    meta: RuleMeta,
}

impl DockerLatestTag {
    pub const CODE: &'static str = "S701";

    pub fn create(_settings: &RuleSettings) -> anyhow::Result<Box<dyn Rule>> {
        let applicability = Applicability::new(
            &["Dockerfile", ".dockerfile", "Dockerfile.*"],
            &[r"https?://hub\.docker\.com/r/.*/tags", r"docker\.io/.*"],
        )?;
        let meta = RuleMeta::new(
            Self::CODE,
            "Docker image uses :latest tag (pin to specific version)",
            Category::S,
            Severity::Medium,
        )
        .applies_to(applicability);
        Ok(Box::new(Self { meta }))
    }

    fn check_uri(&self, uri: &str, content: &str) -> Vec<Detection> {
        if content.contains(":latest") || content.to_lowercase().contains("latest tag") {
            vec![Detection::new(&self.meta, uri, 0)
                .at_column(0)
                .with_message("Docker Hub image uses :latest tag")
                .with_suggestion("Use a specific version tag")]
        } else {
            Vec::new()
        }
    }

    fn check_file(&self, target: &str, content: &str) -> Vec<Detection> {
        let mut detections = Vec::new();

        for (idx, line) in content.lines().enumerate() {
            let found = if let Some(caps) = LATEST_TAG.captures(line) {
                let image = &caps[1];
                Some((
                    format!("{}: {}:latest", self.meta.message, image),
                    image.to_string(),
                ))
            } else if let Some(caps) = NO_TAG.captures(line) {
                let image = &caps[1];
                (!UNTAGGED_IMAGES.contains(&image.to_lowercase().as_str())).then(|| {
                    (
                        format!("Docker image missing tag (defaults to :latest): {}", image),
                        image.to_string(),
                    )
                })
            } else {
                None
            };

            if let Some((message, image)) = found {
                detections.push(
                    Detection::new(&self.meta, target, idx + 1)
                        .with_message(message)
                        .with_suggestion(format!("Pin to specific version: FROM {}:1.0.0", image))
                        .with_context(line.trim()),
                );
            }
        }

        detections
    }
}

impl Rule for DockerLatestTag {
    fn meta(&self) -> &RuleMeta {
        &self.meta
    }

    fn check(
        &self,
        target: &str,
        _structure: Option<&ElementCollection>,
        content: &str,
    ) -> anyhow::Result<Vec<Detection>> {
        if target.starts_with("http://") || target.starts_with("https://") {
            Ok(self.check_uri(target, content))
        } else {
            Ok(self.check_file(target, content))
        }
    }
}
