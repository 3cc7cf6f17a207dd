//! Swift node types.
//!
//! The Swift grammar uses `class_declaration` for classes, structs and
//! enums alike.

use phf::phf_map;

pub(super) static NODE_TYPES: phf::Map<&'static str, &'static [&'static str]> = phf_map! {
    "imports" => &["import_declaration"],
    "functions" => &["function_declaration"],
    "classes" => &["class_declaration", "protocol_declaration"],
};

pub(super) const EXTENSIONS: &[&str] = &["swift"];

#[cfg(feature = "tree-sitter")]
pub(super) fn grammar() -> tree_sitter::Language {
    tree_sitter_swift::LANGUAGE.into()
}
