//! TypeScript and TSX node types.

use phf::phf_map;

pub(super) static NODE_TYPES: phf::Map<&'static str, &'static [&'static str]> = phf_map! {
    "imports" => &["import_statement"],
    "functions" => &["function_declaration", "generator_function_declaration"],
    "methods" => &["method_definition"],
    "classes" => &["class_declaration", "abstract_class_declaration"],
    "types" => &["interface_declaration", "type_alias_declaration", "enum_declaration"],
    "modules" => &["internal_module"],
};

pub(super) const EXTENSIONS: &[&str] = &["ts", "mts", "cts"];

pub(super) const TSX_EXTENSIONS: &[&str] = &["tsx"];

#[cfg(feature = "tree-sitter")]
pub(super) fn grammar() -> tree_sitter::Language {
    tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into()
}

#[cfg(feature = "tree-sitter")]
pub(super) fn tsx_grammar() -> tree_sitter::Language {
    tree_sitter_typescript::LANGUAGE_TSX.into()
}
