//! Python node types.

use phf::phf_map;

pub(super) static NODE_TYPES: phf::Map<&'static str, &'static [&'static str]> = phf_map! {
    "imports" => &["import_statement", "import_from_statement"],
    "functions" => &["function_definition"],
    "classes" => &["class_definition"],
};

pub(super) const EXTENSIONS: &[&str] = &["py", "pyi"];

#[cfg(feature = "tree-sitter")]
pub(super) fn grammar() -> tree_sitter::Language {
    tree_sitter_python::LANGUAGE.into()
}
