//! Relationships between entities: definitions, reverse edges and
//! transitive traversal.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::kind::{value_type_name, PropertyKind};
use super::TypeRegistry;

/// A named, typed connection between entity types.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipDef {
    pub from_types: Vec<String>,
    pub to_types: Vec<String>,
    /// Every forward edge implies a reverse edge under `reverse_name`.
    #[serde(default)]
    pub bidirectional: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reverse_name: Option<String>,
    /// Chains are followed: A→B and B→C imply A reaches C.
    #[serde(default)]
    pub transitive: bool,
    /// Extra data carried on edges.
    #[serde(default)]
    pub properties: BTreeMap<String, PropertyKind>,
}

impl RelationshipDef {
    pub fn new(from_types: &[&str], to_types: &[&str]) -> Self {
        Self {
            from_types: from_types.iter().map(|s| s.to_string()).collect(),
            to_types: to_types.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn bidirectional(mut self) -> Self {
        self.bidirectional = true;
        self
    }

    pub fn reverse_name(mut self, name: &str) -> Self {
        self.bidirectional = true;
        self.reverse_name = Some(name.to_string());
        self
    }

    pub fn transitive(mut self) -> Self {
        self.transitive = true;
        self
    }

    pub fn property(mut self, name: &str, kind: PropertyKind) -> Self {
        self.properties.insert(name.to_string(), kind);
        self
    }
}

/// Identifies an entity instance by type and name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityRef {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
}

impl EntityRef {
    pub fn new(kind: &str, name: &str) -> Self {
        Self {
            kind: kind.to_string(),
            name: name.to_string(),
        }
    }
}

impl std::fmt::Display for EntityRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind, self.name)
    }
}

/// One recorded relationship instance.
///
/// Serialized as `{from, to, ...properties}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub from: EntityRef,
    pub to: EntityRef,
    #[serde(flatten)]
    pub properties: Map<String, Value>,
}

impl Edge {
    pub fn new(from: EntityRef, to: EntityRef) -> Self {
        Self {
            from,
            to,
            properties: Map::new(),
        }
    }

    pub fn with_property(mut self, name: &str, value: Value) -> Self {
        self.properties.insert(name.to_string(), value);
        self
    }

    /// The same edge pointing the other way.
    pub fn reversed(&self) -> Self {
        Self {
            from: self.to.clone(),
            to: self.from.clone(),
            properties: self.properties.clone(),
        }
    }
}

/// Edges grouped by relationship name.
pub type EdgeIndex = BTreeMap<String, Vec<Edge>>;

/// Registered relationship definitions.
#[derive(Debug, Clone, Default)]
pub struct RelationshipRegistry {
    relationships: BTreeMap<String, RelationshipDef>,
}

impl RelationshipRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) relationships. A bidirectional relationship
    /// without a reverse name gets `<name>_by`.
    pub fn register_relationships<I, S>(&mut self, relationships: I)
    where
        I: IntoIterator<Item = (S, RelationshipDef)>,
        S: Into<String>,
    {
        for (name, mut def) in relationships {
            let name = name.into();
            if def.bidirectional && def.reverse_name.is_none() {
                def.reverse_name = Some(format!("{}_by", name));
            }
            self.relationships.insert(name, def);
        }
    }

    pub fn get(&self, name: &str) -> Option<&RelationshipDef> {
        self.relationships.get(name)
    }

    pub fn len(&self) -> usize {
        self.relationships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relationships.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.relationships.keys().map(String::as_str)
    }

    /// Copy of `edges` with reverse edges added.
    ///
    /// Every edge of a bidirectional relationship gets exactly one reverse
    /// edge appended to its reverse relationship's list. Relationships
    /// without a definition pass through unchanged.
    pub fn build_index(&self, edges: &EdgeIndex) -> EdgeIndex {
        let mut index = edges.clone();

        for (name, forward) in edges {
            let Some(def) = self.relationships.get(name) else {
                continue;
            };
            let Some(reverse) = def.reverse_name.as_ref().filter(|_| def.bidirectional) else {
                continue;
            };
            index
                .entry(reverse.clone())
                .or_default()
                .extend(forward.iter().map(Edge::reversed));
        }

        index
    }

    /// Every entity reachable from `start` along forward edges of a
    /// transitive relationship, each once, in breadth-first order.
    ///
    /// `start` itself is never returned, even on a cycle. Unknown and
    /// non-transitive relationships reach nothing.
    pub fn traverse_transitive(
        &self,
        relationship: &str,
        start: &EntityRef,
        edges: &EdgeIndex,
    ) -> Vec<EntityRef> {
        match self.relationships.get(relationship) {
            Some(def) if def.transitive => {}
            _ => return Vec::new(),
        }
        let Some(edges) = edges.get(relationship) else {
            return Vec::new();
        };

        let mut successors: HashMap<&EntityRef, Vec<&EntityRef>> = HashMap::new();
        for edge in edges {
            successors.entry(&edge.from).or_default().push(&edge.to);
        }

        let mut visited: HashSet<&EntityRef> = HashSet::from([start]);
        let mut queue = VecDeque::from([start]);
        let mut reachable = Vec::new();

        while let Some(entity) = queue.pop_front() {
            for &next in successors.get(entity).into_iter().flatten() {
                if visited.insert(next) {
                    reachable.push(next.clone());
                    queue.push_back(next);
                }
            }
        }

        reachable
    }

    /// Check an edge's endpoint types (subtypes accepted) and properties.
    pub fn validate_relationship(
        &self,
        types: &TypeRegistry,
        relationship: &str,
        edge: &Edge,
    ) -> Vec<String> {
        let Some(def) = self.relationships.get(relationship) else {
            return vec![format!("Unknown relationship: {}", relationship)];
        };

        let mut errors = Vec::new();
        for (end, entity, allowed) in [
            ("from", &edge.from, &def.from_types),
            ("to", &edge.to, &def.to_types),
        ] {
            if !allowed.iter().any(|t| types.is_subtype_of(&entity.kind, t)) {
                errors.push(format!(
                    "Invalid '{}' type '{}' for relationship '{}'. Expected one of: {}",
                    end,
                    entity.kind,
                    relationship,
                    allowed.join(", ")
                ));
            }
        }

        for (prop, kind) in &def.properties {
            if let Some(value) = edge.properties.get(prop) {
                if !value.is_null() && !kind.matches(value) {
                    errors.push(format!(
                        "Property '{}' has invalid type: expected {}, got {}",
                        prop,
                        kind,
                        value_type_name(value)
                    ));
                }
            }
        }

        errors
    }
}
