//! Typed entity and relationship schema.
//!
//! An optional layer over extracted structure: entity types (with
//! inheritance) describe the kinds of element a language produces, and
//! relationships describe how instances connect. Relationships may be
//! bidirectional (reverse edges are derived) or transitive (chains are
//! followed).
//!
//! Schemas are declared in YAML:
//!
//! ```yaml
//! types:
//!   function:
//!     properties: { name: str, line: int, signature: str? }
//!     searchable: [name]
//!   method:
//!     inherits: function
//!     properties: { parent_class: str }
//! relationships:
//!   calls:
//!     from_types: [function]
//!     to_types: [function]
//!     bidirectional: true
//!     reverse_name: called_by
//! ```

mod kind;
mod relationships;
mod types;

pub use kind::{value_type_name, PropertyKind, ValueKind};
pub use relationships::{Edge, EdgeIndex, EntityRef, RelationshipDef, RelationshipRegistry};
pub use types::{EntityType, TypeRegistry};

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Errors that make a schema unusable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("circular inheritance: {}", chain.join(" -> "))]
    CircularInheritance { chain: Vec<String> },
}

#[derive(Debug, Default, Deserialize)]
struct SchemaFile {
    #[serde(default)]
    types: BTreeMap<String, EntityType>,
    #[serde(default)]
    relationships: BTreeMap<String, RelationshipDef>,
}

/// Entity types and relationships, resolved and ready to query.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    types: TypeRegistry,
    relationships: RelationshipRegistry,
}

impl Schema {
    /// Build a schema, resolving inheritance.
    pub fn new<T, R>(types: T, relationships: R) -> Result<Self, SchemaError>
    where
        T: IntoIterator<Item = (String, EntityType)>,
        R: IntoIterator<Item = (String, RelationshipDef)>,
    {
        let mut schema = Self::default();
        schema.types.register_types(types);
        schema.relationships.register_relationships(relationships);
        schema.types.resolve_inheritance()?;
        Ok(schema)
    }

    /// Parse a schema from YAML text.
    pub fn from_yaml(content: &str) -> anyhow::Result<Self> {
        let file: SchemaFile = serde_yaml::from_str(content)?;
        Ok(Self::new(file.types, file.relationships)?)
    }

    /// Parse a schema from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading schema {}", path.display()))?;
        Self::from_yaml(&content).with_context(|| format!("loading schema {}", path.display()))
    }

    /// The built-in schema for source code elements.
    pub fn code() -> Self {
        use PropertyKind::{List, Optional, Required};
        use ValueKind::{Int, Str};

        let name = || Required(vec![Str]);
        let line = || Required(vec![Int]);

        let types = [
            (
                "function",
                EntityType::new()
                    .property("name", name())
                    .property("line", line())
                    .property("line_end", Optional(vec![Int]))
                    .property("signature", Optional(vec![Str]))
                    .property("depth", Optional(vec![Int]))
                    .contains(&["variable"])
                    .searchable(&["name", "signature"])
                    .describe("A free function"),
            ),
            (
                "method",
                EntityType::new()
                    .inherits("function")
                    .property("parent_class", Optional(vec![Str]))
                    .property("decorators", List(Str))
                    .searchable(&["parent_class"])
                    .describe("A function defined on a class"),
            ),
            (
                "class",
                EntityType::new()
                    .property("name", name())
                    .property("line", line())
                    .property("line_end", Optional(vec![Int]))
                    .property("bases", List(Str))
                    .contains(&["method", "variable", "class"])
                    .searchable(&["name"])
                    .describe("A class, struct or other nominal type"),
            ),
            (
                "import",
                EntityType::new()
                    .property("name", name())
                    .property("line", line())
                    .property("module", Optional(vec![Str]))
                    .searchable(&["name", "module"])
                    .describe("An import statement"),
            ),
            (
                "variable",
                EntityType::new()
                    .property("name", name())
                    .property("line", line())
                    .property("value_type", Optional(vec![Str]))
                    .searchable(&["name"])
                    .describe("A variable or constant binding"),
            ),
        ];

        let relationships = [
            (
                "calls",
                RelationshipDef::new(&["function"], &["function"])
                    .reverse_name("called_by")
                    .property("line", Optional(vec![Int])),
            ),
            (
                "inherits_from",
                RelationshipDef::new(&["class"], &["class"]).transitive(),
            ),
            (
                "imports",
                RelationshipDef::new(&["import"], &["function", "class", "variable"])
                    .property("alias", Optional(vec![Str])),
            ),
        ];

        let mut schema = Self::default();
        schema.types.register_types(types);
        schema.relationships.register_relationships(relationships);
        schema
    }

    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    pub fn relationships(&self) -> &RelationshipRegistry {
        &self.relationships
    }

    pub fn get_type(&self, name: &str) -> Option<&EntityType> {
        self.types.get_type(name)
    }

    pub fn validate_entity(&self, type_name: &str, instance: &Value) -> Vec<String> {
        self.types.validate_entity(type_name, instance)
    }

    pub fn validate_edge(&self, relationship: &str, edge: &Edge) -> Vec<String> {
        self.relationships
            .validate_relationship(&self.types, relationship, edge)
    }

    pub fn build_index(&self, edges: &EdgeIndex) -> EdgeIndex {
        self.relationships.build_index(edges)
    }

    pub fn traverse_transitive(
        &self,
        relationship: &str,
        start: &EntityRef,
        edges: &EdgeIndex,
    ) -> Vec<EntityRef> {
        self.relationships
            .traverse_transitive(relationship, start, edges)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_yaml() {
        let schema = Schema::from_yaml(
            r#"
types:
  base:
    properties: { x: int }
  child:
    inherits: base
    properties: { y: 'str?' }
relationships:
  calls:
    from_types: [base]
    to_types: [base]
    bidirectional: true
"#,
        )
        .unwrap();

        let child = schema.get_type("child").unwrap();
        assert_eq!(child.properties.len(), 2);
        assert_eq!(child.properties["y"], PropertyKind::optional(ValueKind::Str));
        assert_eq!(
            schema.relationships().get("calls").unwrap().reverse_name.as_deref(),
            Some("calls_by")
        );
    }

    #[test]
    fn test_cycle_fails_to_load() {
        let err = Schema::from_yaml("types:\n  a: { inherits: b }\n  b: { inherits: a }\n")
            .unwrap_err();
        assert!(err.to_string().contains("circular inheritance"));
    }

    #[test]
    fn test_bad_property_kind_fails_to_load() {
        assert!(Schema::from_yaml("types:\n  a:\n    properties: { x: widget }\n").is_err());
    }

    #[test]
    fn test_code_schema() {
        let schema = Schema::code();
        schema.types().resolve_inheritance().unwrap();

        let method = schema.get_type("method").unwrap();
        assert!(method.properties.contains_key("name"));
        assert!(method.properties.contains_key("parent_class"));
        assert_eq!(method.searchable, ["name", "signature", "parent_class"]);
        assert!(schema.types().is_subtype_of("method", "function"));

        assert!(schema
            .validate_entity("method", &json!({"name": "run", "line": 3, "decorators": ["staticmethod"]}))
            .is_empty());

        let calls = schema.relationships().get("calls").unwrap();
        assert_eq!(calls.reverse_name.as_deref(), Some("called_by"));
        assert!(schema.relationships().get("inherits_from").unwrap().transitive);

        let edge = Edge::new(EntityRef::new("method", "run"), EntityRef::new("function", "helper"));
        assert!(schema.validate_edge("calls", &edge).is_empty());
    }
}
