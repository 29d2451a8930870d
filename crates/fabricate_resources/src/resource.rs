//! The creation-provider trait and produced instances.
//!
//! A [`Resource`] describes one kind of creatable resource: its declared
//! input and output properties, an optional creation timeout, and the
//! side-effecting `create` call the scheduler drives.

use core::time::Duration;

use serde::Serialize;

use crate::property::PropertyMap;
use crate::state::StateId;
use crate::value::ValueMap;

/// Error returned by a creation provider.
///
/// Providers construct these from whatever failed on their side; the
/// scheduler wraps them with the originating desired state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct CreateError(pub String);

impl CreateError {
    /// Creates an error with the given message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl From<String> for CreateError {
    fn from(message: String) -> Self {
        Self(message)
    }
}

impl From<&str> for CreateError {
    fn from(message: &str) -> Self {
        Self(message.to_string())
    }
}

/// An external creation provider for one resource kind.
///
/// Implementations declare their typed inputs and outputs and perform the
/// actual (asynchronous, fallible) creation. The scheduler guarantees
/// `create` is only invoked once every dependency of the desired state has
/// been created.
#[async_trait::async_trait]
pub trait Resource: Send + Sync + 'static {
    /// The resource kind's name, used in reporting and error messages.
    fn name(&self) -> &str;

    /// Declared input properties, in declaration order.
    fn inputs(&self) -> &PropertyMap;

    /// Declared output properties, in declaration order.
    fn outputs(&self) -> &PropertyMap;

    /// Per-kind override of the scheduler's default creation timeout.
    fn create_timeout(&self) -> Option<Duration> {
        None
    }

    /// Creates the resource from fully-resolved inputs.
    ///
    /// Inputs contain no unresolved links: the scheduler materializes link
    /// values from dependency outputs before calling.
    ///
    /// # Errors
    ///
    /// Returns a [`CreateError`] when the provider cannot create the
    /// resource. The failure is isolated to this desired state.
    async fn create(&self, inputs: ValueMap) -> Result<ValueMap, CreateError>;
}

/// A created resource: the provider's outputs plus identity.
#[derive(Debug, Clone, Serialize)]
pub struct ResourceInstance {
    /// ID of the desired state this instance satisfies.
    pub state_id: StateId,
    /// Name of the desired state.
    pub name: String,
    /// Output values produced by the provider.
    pub outputs: ValueMap,
}

impl ResourceInstance {
    /// Creates an instance record.
    #[must_use]
    pub fn new(state_id: StateId, name: impl Into<String>, outputs: ValueMap) -> Self {
        Self {
            state_id,
            name: name.into(),
            outputs,
        }
    }

    /// Returns the output at `key`, if the provider produced one.
    #[must_use]
    pub fn output(&self, key: &str) -> Option<&crate::value::Value> {
        self.outputs.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn create_error_display() {
        let err = CreateError::new("bucket already exists");
        assert_eq!(format!("{err}"), "bucket already exists");
    }

    #[test]
    fn instance_output_lookup() {
        let mut outputs = ValueMap::new();
        outputs.insert("arn".to_string(), Value::from("arn:demo"));
        let instance = ResourceInstance::new(StateId::from_string("s"), "bucket-1", outputs);

        assert_eq!(instance.output("arn").and_then(Value::as_str), Some("arn:demo"));
        assert!(instance.output("missing").is_none());
    }

    #[test]
    fn instance_serializes_outputs() {
        let mut outputs = ValueMap::new();
        outputs.insert("id".to_string(), Value::from(7.0));
        let instance = ResourceInstance::new(StateId::from_string("abc"), "thing", outputs);

        let json = serde_json::to_string(&instance).unwrap();
        assert!(json.contains(r#""state_id":"abc""#));
        assert!(json.contains(r#""id":7.0"#));
    }
}
