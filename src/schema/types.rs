//! Entity types and inheritance resolution.

use std::collections::{BTreeMap, BTreeSet};

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::kind::{value_type_name, PropertyKind};
use super::SchemaError;

/// A kind of semantic element (function, class, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityType {
    #[serde(default)]
    pub properties: BTreeMap<String, PropertyKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inherits: Option<String>,
    /// Entity types this one may contain.
    #[serde(default)]
    pub contains: Vec<String>,
    /// Property names to index for search. Defaults to every own property.
    #[serde(default)]
    pub searchable: Vec<String>,
    #[serde(default)]
    pub description: String,
}

impl EntityType {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn property(mut self, name: &str, kind: PropertyKind) -> Self {
        self.properties.insert(name.to_string(), kind);
        self
    }

    pub fn inherits(mut self, parent: &str) -> Self {
        self.inherits = Some(parent.to_string());
        self
    }

    pub fn contains(mut self, types: &[&str]) -> Self {
        self.contains = types.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn searchable(mut self, properties: &[&str]) -> Self {
        self.searchable = properties.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn describe(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }
}

/// Registered entity types with lazily resolved inheritance.
///
/// Resolution merges each parent into its children: child properties
/// override the parent's, `contains` and `searchable` are unions with the
/// parent's entries first. It runs once and is cached until more types are
/// registered.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    declared: BTreeMap<String, EntityType>,
    resolved: OnceCell<BTreeMap<String, EntityType>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) entity types. Invalidates any resolution.
    pub fn register_types<I, S>(&mut self, types: I)
    where
        I: IntoIterator<Item = (S, EntityType)>,
        S: Into<String>,
    {
        for (name, mut entity) in types {
            if entity.searchable.is_empty() {
                entity.searchable = entity.properties.keys().cloned().collect();
            }
            self.declared.insert(name.into(), entity);
        }
        self.resolved = OnceCell::new();
    }

    /// Merge inherited definitions. Idempotent.
    pub fn resolve_inheritance(&self) -> Result<(), SchemaError> {
        self.resolved().map(|_| ())
    }

    fn resolved(&self) -> Result<&BTreeMap<String, EntityType>, SchemaError> {
        self.resolved.get_or_try_init(|| resolve_all(&self.declared))
    }

    /// Resolved definitions, or the declared ones if resolution fails.
    fn view(&self) -> &BTreeMap<String, EntityType> {
        match self.resolved() {
            Ok(types) => types,
            Err(e) => {
                tracing::warn!(error = %e, "using unresolved entity types");
                &self.declared
            }
        }
    }

    pub fn len(&self) -> usize {
        self.declared.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declared.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.declared.keys().map(String::as_str)
    }

    /// A type with inherited members merged in.
    pub fn get_type(&self, name: &str) -> Option<&EntityType> {
        self.view().get(name)
    }

    /// Every type inheriting from `name`, directly or transitively.
    pub fn get_subtypes(&self, name: &str) -> Vec<String> {
        let mut found = Vec::new();
        let mut seen = BTreeSet::new();
        self.collect_subtypes(name, &mut found, &mut seen);
        found
    }

    fn collect_subtypes(&self, name: &str, found: &mut Vec<String>, seen: &mut BTreeSet<String>) {
        for (child, entity) in &self.declared {
            if entity.inherits.as_deref() == Some(name) && seen.insert(child.clone()) {
                found.push(child.clone());
                self.collect_subtypes(child, found, seen);
            }
        }
    }

    /// Whether `child` is `parent` or inherits from it.
    pub fn is_subtype_of(&self, child: &str, parent: &str) -> bool {
        let mut current = child;
        let mut seen = BTreeSet::new();
        loop {
            if current == parent {
                return true;
            }
            if !seen.insert(current) {
                return false;
            }
            match self.declared.get(current).and_then(|e| e.inherits.as_deref()) {
                Some(next) => current = next,
                None => return false,
            }
        }
    }

    /// Check an instance against its type.
    ///
    /// Missing properties and null values are accepted. A value matching
    /// none of its declared alternatives is reported.
    pub fn validate_entity(&self, type_name: &str, instance: &Value) -> Vec<String> {
        let Some(entity) = self.get_type(type_name) else {
            return vec![format!("Unknown entity type: {}", type_name)];
        };
        let Some(fields) = instance.as_object() else {
            return vec![format!(
                "Entity instance must be a map, got {}",
                value_type_name(instance)
            )];
        };

        let mut errors = Vec::new();
        for (prop, kind) in &entity.properties {
            let Some(value) = fields.get(prop) else {
                if !kind.is_optional() {
                    tracing::debug!(entity = %type_name, property = %prop, "missing property");
                }
                continue;
            };
            if !value.is_null() && !kind.matches(value) {
                errors.push(format!(
                    "Property '{}' has invalid type: expected {}, got {}",
                    prop,
                    kind,
                    value_type_name(value)
                ));
            }
        }
        errors
    }
}

fn resolve_all(
    declared: &BTreeMap<String, EntityType>,
) -> Result<BTreeMap<String, EntityType>, SchemaError> {
    let mut resolved = BTreeMap::new();
    let mut chain = Vec::new();
    for name in declared.keys() {
        resolve_type(name, declared, &mut resolved, &mut chain)?;
    }
    Ok(resolved)
}

fn resolve_type(
    name: &str,
    declared: &BTreeMap<String, EntityType>,
    resolved: &mut BTreeMap<String, EntityType>,
    chain: &mut Vec<String>,
) -> Result<(), SchemaError> {
    if resolved.contains_key(name) {
        return Ok(());
    }
    if chain.iter().any(|n| n == name) {
        let mut cycle = chain.clone();
        cycle.push(name.to_string());
        return Err(SchemaError::CircularInheritance { chain: cycle });
    }

    let Some(entity) = declared.get(name) else {
        return Ok(());
    };
    let Some(parent_name) = entity.inherits.as_deref() else {
        resolved.insert(name.to_string(), entity.clone());
        return Ok(());
    };
    if !declared.contains_key(parent_name) {
        tracing::warn!(entity = %name, parent = %parent_name, "inherits from unknown type");
        resolved.insert(name.to_string(), entity.clone());
        return Ok(());
    }

    chain.push(name.to_string());
    resolve_type(parent_name, declared, resolved, chain)?;
    chain.pop();

    let parent = &resolved[parent_name];
    let mut merged = entity.clone();
    merged.properties = parent.properties.clone();
    merged.properties.extend(entity.properties.clone());
    merged.contains = union(&parent.contains, &entity.contains);
    merged.searchable = union(&parent.searchable, &entity.searchable);

    resolved.insert(name.to_string(), merged);
    Ok(())
}

/// `first` followed by the entries of `second` it lacks.
fn union(first: &[String], second: &[String]) -> Vec<String> {
    let mut out = first.to_vec();
    for item in second {
        if !out.contains(item) {
            out.push(item.clone());
        }
    }
    out
}
