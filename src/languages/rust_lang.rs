//! Rust node types.
//!
//! Structs are listed under both `classes` and `structs` so that tools
//! treating them as either see them.

use phf::phf_map;

pub(super) static NODE_TYPES: phf::Map<&'static str, &'static [&'static str]> = phf_map! {
    "imports" => &["use_declaration"],
    "functions" => &["function_item"],
    "classes" => &["struct_item"],
    "structs" => &["struct_item"],
    "types" => &["enum_item", "trait_item", "type_item"],
    "modules" => &["mod_item"],
};

pub(super) const EXTENSIONS: &[&str] = &["rs"];

#[cfg(feature = "tree-sitter")]
pub(super) fn grammar() -> tree_sitter::Language {
    tree_sitter_rust::LANGUAGE.into()
}
