//! Java node types.

use phf::phf_map;

pub(super) static NODE_TYPES: phf::Map<&'static str, &'static [&'static str]> = phf_map! {
    "imports" => &["import_declaration"],
    "methods" => &["method_declaration", "constructor_declaration"],
    "classes" => &[
        "class_declaration",
        "interface_declaration",
        "enum_declaration",
        "record_declaration",
    ],
};

pub(super) const EXTENSIONS: &[&str] = &["java"];

#[cfg(feature = "tree-sitter")]
pub(super) fn grammar() -> tree_sitter::Language {
    tree_sitter_java::LANGUAGE.into()
}

#[cfg(all(test, feature = "tree-sitter"))]
mod tests {
    use crate::languages::analyze;

    const SOURCE: &str = r#"import java.util.List;

public class Service {
    public Service() {}

    public int count(List<String> items) {
        int n = 0;
        for (String s : items) {
            if (!s.isEmpty()) {
                n++;
            }
        }
        return n;
    }
}
"#;

    #[test]
    fn test_java_structure() {
        let result = analyze("java", SOURCE, None);
        assert!(result.error.is_none());

        assert_eq!(result.get("imports")[0].name, "import java.util.List;");
        assert_eq!(result.find("classes", "Service").unwrap().line_end, Some(15));

        let names: Vec<_> = result.get("methods").iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["Service", "count"]);

        let count = result.find("methods", "count").unwrap();
        assert_eq!(count.signature.as_deref(), Some("(List<String> items)"));
        assert_eq!(count.depth, Some(2));
    }
}
