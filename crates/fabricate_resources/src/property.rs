//! Property type declarations.
//!
//! [`PropertyType`] is the closed set of type variants a resource input or
//! output can declare. Wrapping order matters: `Nullable(Undefinable(T))`
//! and `Undefinable(Nullable(T))` are distinct and drive different
//! probability splits during synthesis.

use core::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::constraint::Constraint;
use crate::resource::Resource;

/// Ordered mapping from property name to its definition.
pub type PropertyMap = IndexMap<String, PropertyDefinition>;

/// Size bounds for synthesized arrays.
///
/// `min_items` defaults to 0 and `max_items` to 10 when unset. The count
/// draw is half-open: `max_items` itself is never produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArrayConstraint {
    /// Inclusive lower bound on element count.
    pub min_items: Option<usize>,
    /// Exclusive upper bound on element count.
    pub max_items: Option<usize>,
}

impl ArrayConstraint {
    /// Creates bounds with both limits set.
    #[must_use]
    pub fn between(min_items: usize, max_items: usize) -> Self {
        Self {
            min_items: Some(min_items),
            max_items: Some(max_items),
        }
    }
}

/// A link-typed property: its value references another resource's output.
///
/// Synthesis picks one candidate, spawns a desired state for it, and the
/// produced value resolves to that state's output at `output_key` once the
/// state has been created.
#[derive(Clone)]
pub struct LinkType {
    /// Candidate target resources; non-empty, one is picked at random.
    pub candidates: Vec<Arc<dyn Resource>>,
    /// Output key read from the created target.
    pub output_key: String,
    /// Whether the link must be satisfied. Optional links are wrapped in
    /// `Undefinable` with `required: false`.
    pub required: bool,
}

impl fmt::Debug for LinkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let candidates: Vec<&str> = self.candidates.iter().map(|r| r.name()).collect();
        f.debug_struct("LinkType")
            .field("candidates", &candidates)
            .field("output_key", &self.output_key)
            .field("required", &self.required)
            .finish()
    }
}

/// Closed set of property type variants.
#[derive(Debug, Clone)]
pub enum PropertyType {
    /// String primitive.
    String,
    /// Numeric primitive.
    Number,
    /// Boolean primitive.
    Boolean,
    /// Explicitly nullable wrapper.
    Nullable(Box<PropertyType>),
    /// May-be-absent (undefined-equivalent) wrapper.
    Undefinable(Box<PropertyType>),
    /// Ordered array of a single element type.
    Array {
        /// Element type.
        inner: Box<PropertyType>,
        /// Optional size bounds.
        constraint: Option<ArrayConstraint>,
    },
    /// Structured value with ordered, independently-typed fields.
    Structured(IndexMap<String, PropertyType>),
    /// Reference to another resource's output.
    Link(LinkType),
}

impl PropertyType {
    /// Wraps a type as nullable.
    #[must_use]
    pub fn nullable(inner: PropertyType) -> Self {
        PropertyType::Nullable(Box::new(inner))
    }

    /// Wraps a type as undefinable.
    #[must_use]
    pub fn undefinable(inner: PropertyType) -> Self {
        PropertyType::Undefinable(Box::new(inner))
    }

    /// An unbounded array of `inner` (synthesized count in `[0, 10)`).
    #[must_use]
    pub fn array(inner: PropertyType) -> Self {
        PropertyType::Array {
            inner: Box::new(inner),
            constraint: None,
        }
    }

    /// An array of `inner` with a half-open count range `[min, max)`.
    #[must_use]
    pub fn array_of(inner: PropertyType, min_items: usize, max_items: usize) -> Self {
        PropertyType::Array {
            inner: Box::new(inner),
            constraint: Some(ArrayConstraint::between(min_items, max_items)),
        }
    }

    /// A structured type from ordered `(name, type)` pairs.
    #[must_use]
    pub fn structured<K: Into<String>>(
        fields: impl IntoIterator<Item = (K, PropertyType)>,
    ) -> Self {
        PropertyType::Structured(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Returns true for bare `String`/`Number`/`Boolean`.
    #[must_use]
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            PropertyType::String | PropertyType::Number | PropertyType::Boolean
        )
    }

    /// Returns true for the nullable wrapper.
    #[must_use]
    pub fn is_nullable(&self) -> bool {
        matches!(self, PropertyType::Nullable(_))
    }

    /// Returns true for the undefinable wrapper.
    #[must_use]
    pub fn is_undefinable(&self) -> bool {
        matches!(self, PropertyType::Undefinable(_))
    }

    /// Returns true for array types.
    #[must_use]
    pub fn is_array(&self) -> bool {
        matches!(self, PropertyType::Array { .. })
    }

    /// Returns true for structured types.
    #[must_use]
    pub fn is_structured(&self) -> bool {
        matches!(self, PropertyType::Structured(_))
    }

    /// Returns the link payload for link types.
    #[must_use]
    pub fn as_link(&self) -> Option<&LinkType> {
        match self {
            PropertyType::Link(link) => Some(link),
            _ => None,
        }
    }
}

/// A property's type together with an optional constraint.
///
/// When a constraint is present, its `generate_constrained_value` takes
/// priority over generic synthesis for this property.
#[derive(Clone)]
pub struct PropertyDefinition {
    /// The declared type.
    pub kind: PropertyType,
    /// Optional validity + synthesis rule.
    pub constraint: Option<Arc<dyn Constraint>>,
}

impl PropertyDefinition {
    /// Creates an unconstrained definition.
    #[must_use]
    pub fn new(kind: PropertyType) -> Self {
        Self {
            kind,
            constraint: None,
        }
    }

    /// Attaches a constraint to the definition.
    #[must_use]
    pub fn with_constraint(mut self, constraint: Arc<dyn Constraint>) -> Self {
        self.constraint = Some(constraint);
        self
    }
}

impl From<PropertyType> for PropertyDefinition {
    fn from(kind: PropertyType) -> Self {
        Self::new(kind)
    }
}

impl fmt::Debug for PropertyDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyDefinition")
            .field("kind", &self.kind)
            .field("has_constraint", &self.constraint.is_some())
            .finish()
    }
}

/// A required link to `resource`'s output at `output_key`.
#[must_use]
pub fn link_to(resource: Arc<dyn Resource>, output_key: impl Into<String>) -> PropertyType {
    link_any(vec![resource], output_key)
}

/// A required link satisfied by any one of `candidates`.
///
/// Synthesis picks a candidate uniformly at random. `candidates` must be
/// non-empty.
#[must_use]
pub fn link_any(
    candidates: Vec<Arc<dyn Resource>>,
    output_key: impl Into<String>,
) -> PropertyType {
    debug_assert!(!candidates.is_empty(), "link requires at least one candidate");
    PropertyType::Link(LinkType {
        candidates,
        output_key: output_key.into(),
        required: true,
    })
}

/// An optional link: undefinable, and not required to be satisfied.
#[must_use]
pub fn optional_link(resource: Arc<dyn Resource>, output_key: impl Into<String>) -> PropertyType {
    PropertyType::undefinable(PropertyType::Link(LinkType {
        candidates: vec![resource],
        output_key: output_key.into(),
        required: false,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::{CreateError, Resource};
    use crate::value::ValueMap;
    use async_trait::async_trait;

    struct NullResource {
        properties: PropertyMap,
    }

    impl NullResource {
        fn new() -> Self {
            Self {
                properties: PropertyMap::new(),
            }
        }
    }

    #[async_trait]
    impl Resource for NullResource {
        fn name(&self) -> &str {
            "null"
        }

        fn inputs(&self) -> &PropertyMap {
            &self.properties
        }

        fn outputs(&self) -> &PropertyMap {
            &self.properties
        }

        async fn create(&self, _inputs: ValueMap) -> Result<ValueMap, CreateError> {
            Ok(ValueMap::new())
        }
    }

    #[test]
    fn predicates_classify_variants() {
        assert!(PropertyType::String.is_primitive());
        assert!(PropertyType::nullable(PropertyType::Number).is_nullable());
        assert!(PropertyType::undefinable(PropertyType::Boolean).is_undefinable());
        assert!(PropertyType::array(PropertyType::String).is_array());
        assert!(PropertyType::structured([("a", PropertyType::Number)]).is_structured());
        assert!(!PropertyType::String.is_array());
    }

    #[test]
    fn wrapping_order_is_preserved() {
        let nu = PropertyType::nullable(PropertyType::undefinable(PropertyType::String));
        let un = PropertyType::undefinable(PropertyType::nullable(PropertyType::String));

        match nu {
            PropertyType::Nullable(inner) => assert!(inner.is_undefinable()),
            _ => panic!("expected nullable"),
        }
        match un {
            PropertyType::Undefinable(inner) => assert!(inner.is_nullable()),
            _ => panic!("expected undefinable"),
        }
    }

    #[test]
    fn optional_link_is_undefinable_and_not_required() {
        let resource: Arc<dyn Resource> = Arc::new(NullResource::new());
        let ty = optional_link(resource, "id");

        let PropertyType::Undefinable(inner) = ty else {
            panic!("expected undefinable wrapper");
        };
        let link = inner.as_link().expect("expected link");
        assert!(!link.required);
        assert_eq!(link.output_key, "id");
    }

    #[test]
    fn link_to_declares_single_candidate() {
        let resource: Arc<dyn Resource> = Arc::new(NullResource::new());
        let ty = link_to(resource, "arn");
        let link = ty.as_link().expect("expected link");
        assert_eq!(link.candidates.len(), 1);
        assert!(link.required);
    }
}
