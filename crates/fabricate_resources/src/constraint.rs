//! Pluggable constraints and the sibling-input seam.
//!
//! A [`Constraint`] attaches to a property definition and controls both
//! validity checking and domain-specific value synthesis. During synthesis
//! the constraint receives a [`SiblingInputs`] handle through which it can
//! read other inputs of the same resource, triggering their resolution on
//! demand.

use crate::value::Value;

/// Structural errors raised while resolving a resource's inputs.
///
/// Both variants indicate programmer error in resource or constraint
/// definitions. They abort the whole generation attempt before any
/// scheduling happens and are never retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// An input's synthesis requested the key currently being resolved.
    #[error("circular property generation from property '{key}' on resource '{resource}'")]
    Circular {
        /// Name of the resource whose input was being resolved.
        resource: String,
        /// The self-referential input key.
        key: String,
    },

    /// Synthesis requested a key the resource does not declare.
    #[error("property '{key}' does not exist on resource '{resource}'")]
    UnknownProperty {
        /// Name of the resource the key was requested on.
        resource: String,
        /// The undeclared key.
        key: String,
    },
}

/// Read access to sibling inputs of the resource being resolved.
///
/// Reading an unset key synthesizes it on the spot and memoizes the result,
/// so repeated reads observe the same value.
pub trait SiblingInputs {
    /// Resolves the sibling input named `key`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::Circular`] if `key` is the input currently
    /// being resolved, or [`ResolveError::UnknownProperty`] if the resource
    /// does not declare it.
    fn resolve(&mut self, key: &str) -> Result<Value, ResolveError>;
}

/// A pluggable rule controlling a property's validity and synthesis.
///
/// When present on a property definition, `generate_constrained_value`
/// takes priority over generic synthesis (including link handling).
pub trait Constraint: Send + Sync {
    /// Returns true if `value` satisfies the constraint.
    fn is_valid(&self, value: &Value) -> bool;

    /// Produces a value satisfying the constraint.
    ///
    /// The `inputs` handle reads sibling inputs of the same resource,
    /// synthesizing them on demand.
    ///
    /// # Errors
    ///
    /// Propagates any [`ResolveError`] raised by sibling reads.
    fn generate_constrained_value(
        &self,
        inputs: &mut dyn SiblingInputs,
    ) -> Result<Value, ResolveError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_error_display() {
        let err = ResolveError::Circular {
            resource: "bucket".into(),
            key: "name".into(),
        };
        assert_eq!(
            format!("{err}"),
            "circular property generation from property 'name' on resource 'bucket'"
        );

        let err = ResolveError::UnknownProperty {
            resource: "bucket".into(),
            key: "missing".into(),
        };
        assert_eq!(
            format!("{err}"),
            "property 'missing' does not exist on resource 'bucket'"
        );
    }
}
