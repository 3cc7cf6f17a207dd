//! JavaScript node types.

use phf::phf_map;

pub(super) static NODE_TYPES: phf::Map<&'static str, &'static [&'static str]> = phf_map! {
    "imports" => &["import_statement"],
    "functions" => &["function_declaration", "generator_function_declaration"],
    "methods" => &["method_definition"],
    "classes" => &["class_declaration"],
};

pub(super) const EXTENSIONS: &[&str] = &["js", "jsx", "mjs", "cjs"];

#[cfg(feature = "tree-sitter")]
pub(super) fn grammar() -> tree_sitter::Language {
    tree_sitter_javascript::LANGUAGE.into()
}
