//! C node types.
//!
//! Function names live inside declarator chains, which the extractor
//! follows through the `declarator` field.

use phf::phf_map;

pub(super) static NODE_TYPES: phf::Map<&'static str, &'static [&'static str]> = phf_map! {
    "imports" => &["preproc_include"],
    "functions" => &["function_definition"],
    "structs" => &["struct_specifier"],
    "types" => &["type_definition", "enum_specifier"],
};

pub(super) const EXTENSIONS: &[&str] = &["c", "h"];

#[cfg(feature = "tree-sitter")]
pub(super) fn grammar() -> tree_sitter::Language {
    tree_sitter_c::LANGUAGE.into()
}
