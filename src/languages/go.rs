//! Go node types.

use phf::phf_map;

pub(super) static NODE_TYPES: phf::Map<&'static str, &'static [&'static str]> = phf_map! {
    "imports" => &["import_declaration"],
    "functions" => &["function_declaration"],
    "methods" => &["method_declaration"],
    "types" => &["type_spec"],
};

pub(super) const EXTENSIONS: &[&str] = &["go"];

#[cfg(feature = "tree-sitter")]
pub(super) fn grammar() -> tree_sitter::Language {
    tree_sitter_go::LANGUAGE.into()
}
