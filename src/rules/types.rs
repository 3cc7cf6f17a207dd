//! Core types for detection results.

use serde::{Deserialize, Serialize};

use super::RuleMeta;

/// Severity levels for detections, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

impl Default for Severity {
    fn default() -> Self {
        Severity::Medium
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Severity::Low),
            "medium" => Ok(Severity::Medium),
            "high" => Ok(Severity::High),
            "critical" => Ok(Severity::Critical),
            _ => Err(format!("unknown severity: {}", s)),
        }
    }
}

/// Rule category, the leading tag of every rule code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Errors and style (`E501`).
    E,
    /// Security (`S701`).
    S,
    /// Complexity (`C901`).
    C,
    /// Likely bugs (`B001`).
    B,
    /// Performance anti-patterns.
    #[serde(rename = "PERF")]
    Perf,
    /// Maintainability (`M501`).
    M,
    /// Infrastructure and configuration files.
    I,
    /// URLs and URIs (`U501`).
    U,
    /// Refactoring opportunities (`R913`).
    R,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::E,
        Category::S,
        Category::C,
        Category::B,
        Category::Perf,
        Category::M,
        Category::I,
        Category::U,
        Category::R,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::E => "E",
            Category::S => "S",
            Category::C => "C",
            Category::B => "B",
            Category::Perf => "PERF",
            Category::M => "M",
            Category::I => "I",
            Category::U => "U",
            Category::R => "R",
        }
    }

    /// The category whose tag starts `code`, if any.
    ///
    /// `PERF` is tried before single-letter tags.
    pub fn from_code(code: &str) -> Option<Self> {
        if code.starts_with("PERF") {
            return Some(Category::Perf);
        }
        let first = code.get(..1)?;
        first.parse().ok()
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .find(|c| c.as_str() == s)
            .copied()
            .ok_or_else(|| format!("unknown rule category: {}", s))
    }
}

/// Where a detection was found. Lines and columns are 1-indexed; 0 means
/// the whole target (used for URI-level findings).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub target: String,
    pub line: usize,
    pub column: usize,
}

/// A single finding produced by a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Detection {
    #[serde(flatten)]
    pub location: Location,
    pub rule_code: String,
    pub message: String,
    pub severity: Severity,
    pub category: Category,
    pub suggestion: Option<String>,
    pub context: Option<String>,
}

impl Detection {
    /// A detection carrying the rule's code, message, severity and category.
    pub fn new(meta: &RuleMeta, target: &str, line: usize) -> Self {
        Self {
            location: Location {
                target: target.to_string(),
                line,
                column: 1,
            },
            rule_code: meta.code.clone(),
            message: meta.message.clone(),
            severity: meta.severity,
            category: meta.category,
            suggestion: None,
            context: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn at_column(mut self, column: usize) -> Self {
        self.location.column = column;
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn target(&self) -> &str {
        &self.location.target
    }

    pub fn line(&self) -> usize {
        self.location.line
    }

    /// Create a unique key for this detection (for deduplication/comparison).
    pub fn key(&self) -> String {
        format!(
            "{}|{}|{}|{}",
            self.rule_code, self.location.target, self.location.line, self.message
        )
    }
}

impl std::fmt::Display for Detection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{} {} {}",
            self.location.target,
            self.location.line,
            self.location.column,
            self.rule_code,
            self.message
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_round_trip() {
        assert_eq!("HIGH".parse::<Severity>().unwrap(), Severity::High);
        assert_eq!(Severity::Critical.to_string(), "critical");
        assert!("fatal".parse::<Severity>().is_err());
        assert!(Severity::Low < Severity::Critical);
    }

    #[test]
    fn test_category_from_code() {
        assert_eq!(Category::from_code("B001"), Some(Category::B));
        assert_eq!(Category::from_code("PERF102"), Some(Category::Perf));
        assert_eq!(Category::from_code("X999"), None);
        assert_eq!(Category::from_code(""), None);
        assert_eq!("PERF".parse::<Category>().unwrap(), Category::Perf);
        assert!("perf".parse::<Category>().is_err());
    }

    #[test]
    fn test_detection_serializes_flat() {
        let d = Detection {
            location: Location {
                target: "app.py".to_string(),
                line: 3,
                column: 5,
            },
            rule_code: "B001".to_string(),
            message: "Bare except".to_string(),
            severity: Severity::High,
            category: Category::B,
            suggestion: None,
            context: Some("except:".to_string()),
        };

        let json = serde_json::to_value(&d).unwrap();
        let mut keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        assert_eq!(
            keys,
            [
                "category",
                "column",
                "context",
                "line",
                "message",
                "rule_code",
                "severity",
                "suggestion",
                "target"
            ]
        );
        assert_eq!(json["severity"], "high");
        assert_eq!(json["category"], "B");
        assert!(json["suggestion"].is_null());
        assert_eq!(d.to_string(), "app.py:3:5 B001 Bare except");
    }
}
