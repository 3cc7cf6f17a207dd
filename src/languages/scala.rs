//! Scala node types.

use phf::phf_map;

pub(super) static NODE_TYPES: phf::Map<&'static str, &'static [&'static str]> = phf_map! {
    "imports" => &["import_declaration"],
    "functions" => &["function_definition"],
    "classes" => &["class_definition", "object_definition", "trait_definition"],
};

pub(super) const EXTENSIONS: &[&str] = &["scala", "sc"];

#[cfg(feature = "tree-sitter")]
pub(super) fn grammar() -> tree_sitter::Language {
    tree_sitter_scala::LANGUAGE.into()
}
