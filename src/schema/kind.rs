//! Property kinds: the declared shape of an entity property.
//!
//! Written in schema files as:
//!
//! | text        | kind                          |
//! |-------------|-------------------------------|
//! | `int`       | `Required([Int])`             |
//! | `int\|str`  | `Required([Int, Str])`        |
//! | `str?`      | `Optional([Str])`             |
//! | `str\|null` | `Optional([Str])`             |
//! | `list[str]` | `List(Str)`                   |
//! | `map[int]`  | `Map(Int)`                    |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A primitive value type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Str,
    Int,
    Float,
    Bool,
    List,
    Map,
    Any,
}

impl ValueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Str => "str",
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::Bool => "bool",
            ValueKind::List => "list",
            ValueKind::Map => "map",
            ValueKind::Any => "any",
        }
    }

    /// Whether a non-null JSON value is of this kind.
    ///
    /// Integers are accepted where a float is expected.
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            ValueKind::Str => value.is_string(),
            ValueKind::Int => value.is_i64() || value.is_u64(),
            ValueKind::Float => value.is_number(),
            ValueKind::Bool => value.is_boolean(),
            ValueKind::List => value.is_array(),
            ValueKind::Map => value.is_object(),
            ValueKind::Any => true,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ValueKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "str" | "string" => Ok(ValueKind::Str),
            "int" | "integer" => Ok(ValueKind::Int),
            "float" | "number" => Ok(ValueKind::Float),
            "bool" | "boolean" => Ok(ValueKind::Bool),
            "list" | "array" => Ok(ValueKind::List),
            "map" | "dict" | "object" => Ok(ValueKind::Map),
            "any" => Ok(ValueKind::Any),
            other => Err(format!("unknown value type: {:?}", other)),
        }
    }
}

/// Name of a JSON value's type, as used in validation messages.
pub fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "map",
    }
}

/// The declared kind of a property, chosen when the schema is written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PropertyKind {
    /// One of the alternatives.
    Required(Vec<ValueKind>),
    /// One of the alternatives; instances may omit it.
    Optional(Vec<ValueKind>),
    /// A list whose items all have the given kind.
    List(ValueKind),
    /// A map whose values all have the given kind.
    Map(ValueKind),
}

impl PropertyKind {
    pub fn required(kind: ValueKind) -> Self {
        PropertyKind::Required(vec![kind])
    }

    pub fn optional(kind: ValueKind) -> Self {
        PropertyKind::Optional(vec![kind])
    }

    pub fn is_optional(&self) -> bool {
        matches!(self, PropertyKind::Optional(_))
    }

    /// Whether a non-null value satisfies this kind.
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            PropertyKind::Required(alts) | PropertyKind::Optional(alts) => {
                alts.iter().any(|k| k.matches(value))
            }
            PropertyKind::List(item) => value
                .as_array()
                .is_some_and(|items| items.iter().all(|v| v.is_null() || item.matches(v))),
            PropertyKind::Map(inner) => value
                .as_object()
                .is_some_and(|map| map.values().all(|v| v.is_null() || inner.matches(v))),
        }
    }
}

fn join(alts: &[ValueKind]) -> String {
    alts.iter()
        .map(ValueKind::as_str)
        .collect::<Vec<_>>()
        .join("|")
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyKind::Required(alts) => write!(f, "{}", join(alts)),
            PropertyKind::Optional(alts) => write!(f, "{}?", join(alts)),
            PropertyKind::List(item) => write!(f, "list[{}]", item),
            PropertyKind::Map(value) => write!(f, "map[{}]", value),
        }
    }
}

impl FromStr for PropertyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("empty property type".to_string());
        }

        if let Some(inner) = generic(s, "list") {
            return Ok(PropertyKind::List(inner.parse()?));
        }
        if let Some(inner) = generic(s, "map") {
            return Ok(PropertyKind::Map(inner.parse()?));
        }

        let (body, mut optional) = match s.strip_suffix('?') {
            Some(body) => (body, true),
            None => (s, false),
        };

        let mut alts = Vec::new();
        for part in body.split('|').map(str::trim) {
            match part.to_lowercase().as_str() {
                "null" | "none" => optional = true,
                _ => {
                    let kind: ValueKind = part.parse()?;
                    if !alts.contains(&kind) {
                        alts.push(kind);
                    }
                }
            }
        }
        if alts.is_empty() {
            return Err(format!("property type {:?} names no value type", s));
        }

        Ok(if optional {
            PropertyKind::Optional(alts)
        } else {
            PropertyKind::Required(alts)
        })
    }
}

/// The `T` in `name[T]`.
fn generic<'a>(s: &'a str, name: &str) -> Option<&'a str> {
    s.strip_prefix(name)?
        .trim_start()
        .strip_prefix('[')?
        .strip_suffix(']')
}

impl TryFrom<String> for PropertyKind {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<PropertyKind> for String {
    fn from(kind: PropertyKind) -> Self {
        kind.to_string()
    }
}
