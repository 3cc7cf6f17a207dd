//! Reveal - structural exploration of source files.
//!
//! Reveal turns source files in many languages into a canonical structural
//! summary (imports, functions, classes, ...), rebuilds the nesting between
//! those elements, and runs pattern rules over them.
//!
//! # Architecture
//!
//! - `syntax`: the parse-tree abstraction, with a tree-sitter backend
//! - `languages`: per-language node-type mappings and grammars
//! - `analysis`: structural extraction, hierarchy building and slicing
//! - `rules`: rule discovery, selection and execution
//! - `schema`: typed entities and relationships over extracted elements
//! - `config`: YAML configuration
//!
//! # Example
//!
//! ```no_run
//! use reveal::{analysis, languages, rules};
//!
//! let source = std::fs::read_to_string("app.py").unwrap();
//! let structure = languages::analyze_target("app.py", &source, None);
//! let tree = analysis::build_collection(&structure);
//!
//! let registry = rules::RuleRegistry::builtin(&rules::RuleSettings::default());
//! let engine = rules::Engine::new(&registry, &rules::Selection::select(&["C", "B"]));
//! let detections = engine.check("app.py", Some(&structure), &source);
//! # let _ = (tree, detections);
//! ```
//!
//! # Adding a New Language
//!
//! See `src/languages/`. Write a node-type table for the grammar and add a
//! `language!` entry to `LANGUAGES`.

pub mod analysis;
pub mod config;
pub mod languages;
pub mod rules;
pub mod schema;
pub mod syntax;

pub use analysis::{
    build_hierarchy, extract, slice, Element, ElementCollection, FocusRange, HierarchyNode,
    NodeTypeMap, Slice,
};
pub use config::Config;
pub use rules::{Detection, Engine, Rule, RuleRegistry, Selection, Severity};
pub use schema::{Schema, SchemaError};
pub use syntax::{Position, SyntaxNode};
