//! Dynamic runtime values and resource links.
//!
//! [`Value`] is the runtime representation of a resolved (or being-resolved)
//! property. It mirrors the property type system: primitives, explicit null,
//! an absent marker for undefinable properties, arrays, structured maps, and
//! forward [`ResourceLink`]s to not-yet-created resources.

use core::fmt;

use indexmap::IndexMap;
use serde::ser::{Error as _, SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use crate::path::{PathSegment, PropertyPath};
use crate::state::StateId;

/// Ordered mapping from property name to runtime value.
pub type ValueMap = IndexMap<String, Value>;

/// A forward reference to another desired state's future output.
///
/// The link does not own its target: the target state lives in the overall
/// working list and is referred to by ID. The link resolves to the target's
/// output at `output_key` only once the target has been created.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceLink {
    /// ID of the desired state whose output is being referenced.
    pub target: StateId,
    /// Output key on the target resource.
    pub output_key: String,
}

impl ResourceLink {
    /// Creates a new link to `target`'s output at `output_key`.
    #[must_use]
    pub fn new(target: StateId, output_key: impl Into<String>) -> Self {
        Self {
            target,
            output_key: output_key.into(),
        }
    }
}

impl fmt::Display for ResourceLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.target, self.output_key)
    }
}

/// A dynamic runtime value.
///
/// `Absent` is the undefined-equivalent produced for undefinable properties;
/// it is distinct from explicit `Null`. Maps keep declaration order.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Explicit null.
    Null,
    /// Absent (undefined-equivalent) marker for undefinable properties.
    Absent,
    /// Boolean primitive.
    Bool(bool),
    /// Numeric primitive.
    Number(f64),
    /// String primitive.
    String(String),
    /// Ordered array of values.
    Array(Vec<Value>),
    /// Structured value with ordered fields.
    Map(ValueMap),
    /// Forward reference to another state's output.
    Link(ResourceLink),
}

impl Value {
    /// Returns true for the absent (undefined-equivalent) marker.
    #[must_use]
    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }

    /// Returns true for explicit null.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns true if this value is an unresolved resource link.
    #[must_use]
    pub fn is_link(&self) -> bool {
        matches!(self, Value::Link(_))
    }

    /// Returns the boolean payload, if any.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the numeric payload, if any.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the string payload, if any.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the link payload, if any.
    #[must_use]
    pub fn as_link(&self) -> Option<&ResourceLink> {
        match self {
            Value::Link(link) => Some(link),
            _ => None,
        }
    }

    /// Collects every [`ResourceLink`] appearing at any depth in this value.
    ///
    /// Used by the dependency graph builder to derive edges from resolved
    /// inputs.
    pub fn collect_links<'a>(&'a self, out: &mut Vec<&'a ResourceLink>) {
        match self {
            Value::Link(link) => out.push(link),
            Value::Array(items) => {
                for item in items {
                    item.collect_links(out);
                }
            }
            Value::Map(map) => {
                for value in map.values() {
                    value.collect_links(out);
                }
            }
            _ => {}
        }
    }

    /// Returns true if any [`ResourceLink`] appears at any depth.
    #[must_use]
    pub fn contains_links(&self) -> bool {
        let mut links = Vec::new();
        self.collect_links(&mut links);
        !links.is_empty()
    }

    /// Returns all values matched by `path`.
    ///
    /// `Field` segments descend into maps, `Index` into arrays, and
    /// `AnyIndex` fans out across every array element, so a path can match
    /// zero, one, or many values.
    #[must_use]
    pub fn at_path<'a>(&'a self, path: &PropertyPath) -> Vec<&'a Value> {
        let mut matched = vec![self];
        for segment in path.segments() {
            let mut next = Vec::new();
            for value in matched {
                match (segment, value) {
                    (PathSegment::Field(name), Value::Map(map)) => {
                        if let Some(v) = map.get(name.as_str()) {
                            next.push(v);
                        }
                    }
                    (PathSegment::Index(i), Value::Array(items)) => {
                        if let Some(v) = items.get(*i) {
                            next.push(v);
                        }
                    }
                    (PathSegment::AnyIndex, Value::Array(items)) => {
                        next.extend(items.iter());
                    }
                    _ => {}
                }
            }
            matched = next;
        }
        matched
    }
}

impl Serialize for Value {
    /// Serializes the value for consumption by outer layers.
    ///
    /// `Absent` entries are skipped inside maps and serialized as null at
    /// the top level. Unresolved links refuse to serialize: a fully resolved
    /// tree never contains them.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null | Value::Absent => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => serializer.serialize_f64(*n),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Map(map) => {
                let mut entries = serializer.serialize_map(None)?;
                for (key, value) in map {
                    if value.is_absent() {
                        continue;
                    }
                    entries.serialize_entry(key, value)?;
                }
                entries.end()
            }
            Value::Link(link) => Err(S::Error::custom(format!(
                "unresolved resource link to '{link}'"
            ))),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<ResourceLink> for Value {
    fn from(link: ResourceLink) -> Self {
        Value::Link(link)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: Vec<(&str, Value)>) -> Value {
        Value::Map(entries.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
    }

    #[test]
    fn collect_links_finds_nested_links() {
        let link = ResourceLink::new(StateId::from_string("target"), "out");
        let value = map(vec![
            ("plain", Value::from("text")),
            (
                "nested",
                Value::Array(vec![map(vec![("deep", Value::Link(link.clone()))])]),
            ),
        ]);

        let mut links = Vec::new();
        value.collect_links(&mut links);
        assert_eq!(links, vec![&link]);
        assert!(value.contains_links());
    }

    #[test]
    fn at_path_descends_fields_and_indices() {
        let value = map(vec![(
            "items",
            Value::Array(vec![Value::from(1.0), Value::from(2.0)]),
        )]);

        let path = PropertyPath::root().field("items").index(1);
        assert_eq!(value.at_path(&path), vec![&Value::Number(2.0)]);

        let all = PropertyPath::root().field("items").any_index();
        assert_eq!(value.at_path(&all).len(), 2);

        let missing = PropertyPath::root().field("nope");
        assert!(value.at_path(&missing).is_empty());
    }

    #[test]
    fn serialize_skips_absent_map_entries() {
        let value = map(vec![
            ("present", Value::from("yes")),
            ("gone", Value::Absent),
            ("null", Value::Null),
        ]);

        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, r#"{"present":"yes","null":null}"#);
    }

    #[test]
    fn serialize_rejects_unresolved_links() {
        let value = Value::Link(ResourceLink::new(StateId::from_string("x"), "out"));
        assert!(serde_json::to_string(&value).is_err());
    }
}
