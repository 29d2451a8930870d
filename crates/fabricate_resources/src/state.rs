//! Desired-state model and state identifiers.
//!
//! A [`DesiredState`] describes one resource the caller wants created: which
//! [`Resource`] kind, a human-readable name, and a partially-filled input
//! map. States originate either from the caller or from link synthesis
//! spawning dependencies.

use core::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};

use crate::resource::Resource;
use crate::value::{Value, ValueMap};

/// Unique identifier for a desired state.
///
/// State IDs are generated using nanoid, providing globally unique
/// identifiers that don't require coordination between generation runs.
/// Links refer to their target state through this ID rather than owning it.
///
/// Internally uses `Arc<str>` for cheap cloning (reference count bump only).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StateId(Arc<str>);

impl StateId {
    /// Creates a new state ID with a unique nanoid.
    #[must_use]
    pub fn new() -> Self {
        Self(nanoid::nanoid!().into())
    }

    /// Creates a state ID from a specific string value.
    ///
    /// This is primarily useful for testing or when restoring serialized
    /// state.
    #[must_use]
    pub fn from_string(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    /// Returns the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for StateId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "state_{}", self.0)
    }
}

impl Serialize for StateId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// A resource the caller (or a link) wants created.
///
/// The `inputs` map is partial at construction time and only ever grows:
/// unset declared inputs are filled in by synthesis, and caller-supplied
/// values are never overwritten.
#[derive(Clone)]
pub struct DesiredState {
    /// Unique identifier, referenced by [`ResourceLink`](crate::ResourceLink)s.
    pub id: StateId,
    /// Human-readable name for reporting and error messages.
    pub name: String,
    /// The resource kind to create.
    pub resource: Arc<dyn Resource>,
    /// Partially-filled input values, keyed by declared input name.
    pub inputs: ValueMap,
}

impl DesiredState {
    /// Creates a named desired state with no pre-supplied inputs.
    #[must_use]
    pub fn new(name: impl Into<String>, resource: Arc<dyn Resource>) -> Self {
        Self {
            id: StateId::new(),
            name: name.into(),
            resource,
            inputs: ValueMap::new(),
        }
    }

    /// Creates an anonymous desired state, as spawned by link synthesis.
    ///
    /// The name is derived from the resource kind plus a short unique
    /// suffix so error messages stay readable.
    #[must_use]
    pub fn anonymous(resource: Arc<dyn Resource>) -> Self {
        let id = StateId::new();
        let name = format!("{}-{}", resource.name(), &id.as_str()[..8.min(id.as_str().len())]);
        Self {
            id,
            name,
            resource,
            inputs: ValueMap::new(),
        }
    }

    /// Sets pre-supplied input values.
    ///
    /// Supplied values are visible to sibling reads during synthesis and
    /// are never overwritten.
    #[must_use]
    pub fn with_inputs(mut self, inputs: impl IntoIterator<Item = (String, Value)>) -> Self {
        self.inputs.extend(inputs);
        self
    }

    /// Sets a single pre-supplied input value.
    #[must_use]
    pub fn with_input(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.inputs.insert(key.into(), value.into());
        self
    }
}

impl fmt::Debug for DesiredState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DesiredState")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("resource", &self.resource.name())
            .field("inputs", &self.inputs)
            .finish()
    }
}
