//! Integration tests for rule discovery and execution.
//!
//! These tests run the built-in and file-based rules against the testdata
//! fixtures and against rule directories created on the fly.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tempfile::TempDir;

use reveal::config::Config;
use reveal::rules::{
    Detection, Engine, RuleLoadError, RuleRegistry, RuleSettings, RuleSources, Selection,
    RULES_DIR,
};

fn testdata_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata")
}

fn read_fixture(name: &str) -> String {
    fs::read_to_string(testdata_path().join(name)).expect("fixture should exist")
}

fn summary(detections: &[Detection]) -> Vec<(&str, usize)> {
    detections
        .iter()
        .map(|d| (d.rule_code.as_str(), d.line()))
        .collect()
}

fn write_rule(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

// =============================================================================
// Built-in rules
// =============================================================================

#[test]
#[cfg(feature = "tree-sitter")]
fn test_builtin_rules_on_python_fixture() {
    let source = read_fixture("sample.py");
    let registry = RuleRegistry::builtin(&RuleSettings::default());
    let engine = Engine::new(&registry, &Selection::all());

    let detections = engine.check_source("sample.py", &source);
    assert_eq!(
        summary(&detections),
        [
            ("B001", 17),
            ("C905", 21),
            ("M501", 29),
            ("R913", 14),
            ("U501", 34),
        ]
    );

    let r913 = &detections[3];
    assert_eq!(
        r913.message,
        "Too many arguments to function (6 > 5): restock()"
    );
}

#[test]
#[cfg(feature = "tree-sitter")]
fn test_selection_narrows_detections() {
    let source = read_fixture("sample.py");
    let registry = RuleRegistry::builtin(&RuleSettings::default());

    let engine = Engine::new(&registry, &Selection::new(&["C", "B0"], &["C905"]));
    assert_eq!(
        engine.codes().collect::<Vec<_>>(),
        ["B001", "C901", "C902"]
    );
    assert_eq!(summary(&engine.check_source("sample.py", &source)), [("B001", 17)]);
}

#[test]
fn test_dockerfile_fixture() {
    let source = read_fixture("Dockerfile");
    let registry = RuleRegistry::builtin(&RuleSettings::default());
    let engine = Engine::new(&registry, &Selection::all());

    // No language applies, so rules run without structure.
    let detections = engine.check("deploy/Dockerfile", None, &source);
    assert_eq!(summary(&detections), [("S701", 1), ("S701", 3)]);
    assert_eq!(detections[0].context.as_deref(), Some("FROM python:latest AS build"));
}

#[test]
fn test_detection_field_set() {
    let registry = RuleRegistry::builtin(&RuleSettings::default());
    let engine = Engine::new(&registry, &Selection::select(&["U501"]));
    let detections = engine.check("README.md", None, "see http://github.com/org/repo\n");
    assert_eq!(detections.len(), 1);

    let json = serde_json::to_value(&detections[0]).unwrap();
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
    assert_eq!(json["target"], "README.md");
    assert_eq!(json["category"], "U");
}

// =============================================================================
// Configuration-driven discovery
// =============================================================================

#[test]
#[cfg(feature = "tree-sitter")]
fn test_config_fixture() {
    let testdata = testdata_path();
    let config = Config::parse_file(testdata.join("config.yaml")).expect("should parse config");

    let registry = config.registry(&testdata);
    assert!(registry.get_rule("PERF401").is_some());
    // Rules under `_`-prefixed directories are never loaded.
    assert!(registry.get_rule("B999").is_none());
    assert_eq!(registry.skipped().count(), 0);

    let engine = config.engine(&testdata);
    let detections = engine.check_source("sample.py", &read_fixture("sample.py"));
    assert_eq!(
        summary(&detections),
        [
            ("B001", 17),
            ("C905", 21),
            ("PERF401", 36),
            ("R913", 14),
            ("U501", 34),
        ]
    );
    assert_eq!(detections[2].location.column, 17);
    assert_eq!(
        detections[2].suggestion.as_deref(),
        Some("Iterate over the file object line by line")
    );
    assert_eq!(
        detections[3].message,
        "Too many arguments to function (6 > 4): restock()"
    );

    let schema = config.load_schema(&testdata).expect("should load schema");
    assert!(schema.types().is_subtype_of("method", "symbol"));
}

#[test]
fn test_project_rules_override_and_skip() {
    let project = TempDir::new().unwrap();
    let rules = project.path().join(RULES_DIR);

    write_rule(
        &rules,
        "security/S900.yaml",
        "code: S900\nmessage: Hardcoded password\nseverity: critical\npattern: 'password\\s*=\\s*\"'\n",
    );
    write_rule(
        &rules,
        "errors/E501.yaml",
        "code: E501\nmessage: Project line limit\npattern: '.{40,}'\nfile_patterns: ['.cfg']\n",
    );
    write_rule(&rules, "errors/E502.yaml", "code: E502\nmessage: [unclosed\n");
    write_rule(&rules, "errors/E503.yaml", "code: E503\nmessage: m\npattern: '(unclosed'\n");
    write_rule(&rules, "errors/README.md", "not a rule");
    write_rule(&rules, "stray.yaml", "code: stray\nmessage: m\npattern: x\n");

    let sources = RuleSources {
        builtin: true,
        user_dir: None,
        project_dir: Some(rules.clone()),
        extra_dirs: Vec::new(),
    };
    let registry = RuleRegistry::discover(&sources, &RuleSettings::default());

    let skipped: Vec<_> = registry.skipped().collect();
    assert_eq!(skipped.len(), 2);
    assert!(skipped.iter().any(|e| matches!(e, RuleLoadError::Parse { .. })));
    assert!(skipped.iter().any(|e| matches!(e, RuleLoadError::InvalidPattern { .. })));

    let engine = Engine::new(&registry, &Selection::select(&["S9", "E"]));
    let content = "user = \"admin\"\npassword = \"hunter2\"\n";
    let detections = engine.check("app.cfg", None, content);
    assert_eq!(summary(&detections), [("S900", 2)]);
    assert_eq!(detections[0].severity.to_string(), "critical");

    let long = "x".repeat(45);
    let detections = engine.check("app.cfg", None, &long);
    assert_eq!(summary(&detections), [("E501", 1)]);
    assert_eq!(detections[0].message, "Project line limit");

    // The project E501 replaced the built-in one, which applied everywhere.
    assert!(engine.check("app.py", None, &long).is_empty());
}

// =============================================================================
// Sharing across threads
// =============================================================================

#[test]
fn test_engine_shared_across_threads() {
    let registry = RuleRegistry::builtin(&RuleSettings {
        max_line_length: 20,
        ..RuleSettings::default()
    });
    let engine = Engine::new(&registry, &Selection::select(&["E", "U", "S"]));

    let targets: Vec<(String, String)> = (0..32)
        .map(|i| {
            let content = format!(
                "FROM node\n{}\nshort\nhttp://github.com/org/r{}\n",
                "y".repeat(i),
                i
            );
            (format!("svc{}/Dockerfile", i), content)
        })
        .collect();

    let sequential: Vec<_> = targets
        .iter()
        .map(|(t, c)| engine.check(t, None, c))
        .collect();
    let parallel: Vec<_> = targets
        .par_iter()
        .map(|(t, c)| engine.check(t, None, c))
        .collect();

    assert_eq!(sequential, parallel);
    // Lines 21 characters and longer are flagged from i = 21 on.
    assert_eq!(parallel.iter().filter(|d| d.iter().any(|x| x.rule_code == "E501")).count(), 11);
}
