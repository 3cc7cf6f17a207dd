//! C++ node types.

use phf::phf_map;

pub(super) static NODE_TYPES: phf::Map<&'static str, &'static [&'static str]> = phf_map! {
    "imports" => &["preproc_include", "using_declaration"],
    "functions" => &["function_definition"],
    "classes" => &["class_specifier"],
    "structs" => &["struct_specifier"],
    "modules" => &["namespace_definition"],
};

pub(super) const EXTENSIONS: &[&str] = &["cpp", "cc", "cxx", "hpp", "hh", "hxx"];

#[cfg(feature = "tree-sitter")]
pub(super) fn grammar() -> tree_sitter::Language {
    tree_sitter_cpp::LANGUAGE.into()
}

#[cfg(all(test, feature = "tree-sitter"))]
mod tests {
    use crate::languages::analyze;

    const SOURCE: &str = r#"#include <vector>

namespace geo {

class Shape {
public:
    virtual double area() const = 0;
};

int sum(const std::vector<int>& xs) {
    int total = 0;
    for (int x : xs) {
        total += x;
    }
    return total;
}

}
"#;

    #[test]
    fn test_cpp_structure() {
        let result = analyze("cpp", SOURCE, None);
        assert!(result.error.is_none());

        assert!(result.find("modules", "geo").is_some());
        assert!(result.find("classes", "Shape").is_some());

        let sum = result.find("functions", "sum").unwrap();
        assert_eq!(sum.line_start, 10);
        assert_eq!(sum.depth, Some(1));
    }
}
