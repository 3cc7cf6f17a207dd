//! Supported languages and their node-type tables.
//!
//! Each language module provides:
//! - A static category -> node-type map
//! - The file extensions it claims
//! - A grammar factory (behind the `tree-sitter` feature)

mod c;
mod cpp;
mod go;
mod java;
mod javascript;
mod python;
mod rust_lang;
mod scala;
mod swift;
mod typescript;

use std::collections::HashMap;
use std::path::Path;

use once_cell::sync::Lazy;

use crate::analysis::{category, ElementCollection, FocusRange, NameSource, NodeTypeMap};

type NodeTypeTable = phf::Map<&'static str, &'static [&'static str]>;

/// A supported language.
pub struct LanguageSpec {
    /// Stable identifier (`python`, `rust`, ...).
    pub id: &'static str,
    /// Extensions without the leading dot, lowercase.
    pub extensions: &'static [&'static str],
    node_types: &'static NodeTypeTable,
    #[cfg(feature = "tree-sitter")]
    grammar: fn() -> tree_sitter::Language,
}

impl LanguageSpec {
    /// The extractor mapping for this language.
    pub fn node_type_map(&self) -> &'static NodeTypeMap {
        // Every table entry has a map; the fallback is never hit.
        NODE_TYPE_MAPS.get(self.id).unwrap_or(&EMPTY_MAP)
    }

    /// The tree-sitter grammar for this language.
    #[cfg(feature = "tree-sitter")]
    pub fn grammar(&self) -> tree_sitter::Language {
        (self.grammar)()
    }
}

impl std::fmt::Debug for LanguageSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LanguageSpec")
            .field("id", &self.id)
            .field("extensions", &self.extensions)
            .finish()
    }
}

macro_rules! language {
    ($id:literal, $module:ident, $extensions:expr, $grammar:path) => {
        LanguageSpec {
            id: $id,
            extensions: $extensions,
            node_types: &$module::NODE_TYPES,
            #[cfg(feature = "tree-sitter")]
            grammar: $grammar,
        }
    };
}

/// All supported languages.
pub static LANGUAGES: &[LanguageSpec] = &[
    language!("c", c, c::EXTENSIONS, c::grammar),
    language!("cpp", cpp, cpp::EXTENSIONS, cpp::grammar),
    language!("go", go, go::EXTENSIONS, go::grammar),
    language!("java", java, java::EXTENSIONS, java::grammar),
    language!("javascript", javascript, javascript::EXTENSIONS, javascript::grammar),
    language!("python", python, python::EXTENSIONS, python::grammar),
    language!("rust", rust_lang, rust_lang::EXTENSIONS, rust_lang::grammar),
    language!("scala", scala, scala::EXTENSIONS, scala::grammar),
    language!("swift", swift, swift::EXTENSIONS, swift::grammar),
    language!("typescript", typescript, typescript::EXTENSIONS, typescript::grammar),
    language!("tsx", typescript, typescript::TSX_EXTENSIONS, typescript::tsx_grammar),
];

static EMPTY_MAP: Lazy<NodeTypeMap> = Lazy::new(NodeTypeMap::new);

static NODE_TYPE_MAPS: Lazy<HashMap<&'static str, NodeTypeMap>> = Lazy::new(|| {
    LANGUAGES
        .iter()
        .map(|lang| {
            let map = NodeTypeMap::from_static(lang.node_types)
                .named_by(category::IMPORTS, NameSource::Text);
            (lang.id, map)
        })
        .collect()
});

/// Look up a language by identifier.
pub fn by_id(id: &str) -> Option<&'static LanguageSpec> {
    LANGUAGES.iter().find(|l| l.id == id)
}

/// Look up a language by file extension, with or without the leading dot.
pub fn for_extension(ext: &str) -> Option<&'static LanguageSpec> {
    let ext = ext.trim_start_matches('.').to_ascii_lowercase();
    LANGUAGES
        .iter()
        .find(|l| l.extensions.contains(&ext.as_str()))
}

/// Look up the language of a file path or target identifier.
pub fn for_target(target: &str) -> Option<&'static LanguageSpec> {
    Path::new(target)
        .extension()
        .and_then(|e| e.to_str())
        .and_then(for_extension)
}

/// Every extension with a registered language.
pub fn registered_extensions() -> Vec<&'static str> {
    LANGUAGES
        .iter()
        .flat_map(|l| l.extensions.iter().copied())
        .collect()
}

/// Parse `source` as `language` and extract its structure.
///
/// Never fails: an unknown language or a parser failure yields an empty
/// collection carrying an error marker.
pub fn analyze(language: &str, source: &str, focus: Option<FocusRange>) -> ElementCollection {
    match by_id(language) {
        Some(lang) => analyze_with(lang, source, focus),
        None => {
            tracing::debug!(language, "unsupported language");
            ElementCollection::failed(format!("unsupported language: {}", language))
        }
    }
}

/// Like [`analyze`], choosing the language from the target's extension.
pub fn analyze_target(target: &str, source: &str, focus: Option<FocusRange>) -> ElementCollection {
    match for_target(target) {
        Some(lang) => analyze_with(lang, source, focus),
        None => {
            tracing::debug!(path = %target, "no language for target");
            ElementCollection::failed(format!("unsupported language: {}", target))
        }
    }
}

#[cfg(feature = "tree-sitter")]
fn analyze_with(lang: &LanguageSpec, source: &str, focus: Option<FocusRange>) -> ElementCollection {
    let parsed = match crate::syntax::parse(&lang.grammar(), source) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!(language = lang.id, error = %e, "parse failed");
            return ElementCollection::failed(format!("parse failed: {}", e));
        }
    };

    if parsed.has_errors() {
        tracing::debug!(language = lang.id, "source has syntax errors, extracting anyway");
    }

    crate::analysis::extract(&parsed.root(), lang.node_type_map(), focus)
}

#[cfg(not(feature = "tree-sitter"))]
fn analyze_with(lang: &LanguageSpec, _source: &str, _focus: Option<FocusRange>) -> ElementCollection {
    ElementCollection::failed(format!(
        "no parser available for {} (built without tree-sitter)",
        lang.id
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_extension() {
        assert_eq!(for_extension("py").unwrap().id, "python");
        assert_eq!(for_extension(".RS").unwrap().id, "rust");
        assert_eq!(for_extension("tsx").unwrap().id, "tsx");
        assert_eq!(for_extension("h").unwrap().id, "c");
        assert!(for_extension("cobol").is_none());
    }

    #[test]
    fn test_for_target() {
        assert_eq!(for_target("src/app/main.go").unwrap().id, "go");
        assert!(for_target("Dockerfile").is_none());
        assert!(for_target("docker://nginx:latest").is_none());
    }

    #[test]
    fn test_extensions_are_unique() {
        let mut exts = registered_extensions();
        let total = exts.len();
        exts.sort_unstable();
        exts.dedup();
        assert_eq!(exts.len(), total);
    }

    #[test]
    fn test_imports_are_text_named() {
        for lang in LANGUAGES {
            let map = lang.node_type_map();
            assert!(!map.is_empty(), "{} has no node types", lang.id);
            assert_eq!(map.name_source(category::IMPORTS), NameSource::Text);
        }
    }

    #[test]
    fn test_unknown_language_is_marked_failed() {
        let result = analyze("cobol", "IDENTIFICATION DIVISION.", None);
        assert!(result.is_failed());
        assert!(result.is_empty());

        let result = analyze_target("notes.txt", "hello", None);
        assert!(result.is_failed());
    }

    #[cfg(feature = "tree-sitter")]
    #[test]
    fn test_analyze_target_with_focus() {
        let source = "def a():\n    pass\n\ndef b():\n    pass\n";
        let result = analyze_target("mod.py", source, Some(FocusRange::new(3, 10)));
        assert!(!result.is_failed());

        let names: Vec<_> = result.get("functions").iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["b"]);
    }
}
