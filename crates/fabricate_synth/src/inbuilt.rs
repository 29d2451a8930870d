//! Inbuilt constraints and sample resources.
//!
//! Ships a ready-made email constraint plus a small provider that exercises
//! it end to end. Both double as living documentation for implementing the
//! [`Constraint`] and [`Resource`] traits.

use std::sync::{Arc, LazyLock};

use fabricate_resources::property::{PropertyDefinition, PropertyMap, PropertyType};
use fabricate_resources::{
    Constraint, CreateError, Resource, ResolveError, SiblingInputs, Value, ValueMap,
};
use regex::Regex;

use crate::source::email_with;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$")
        .expect("email pattern is valid")
});

/// Constrains a string property to a plausible email address.
///
/// Generated addresses always land on the reserved `example.com` domain.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmailConstraint;

impl Constraint for EmailConstraint {
    fn is_valid(&self, value: &Value) -> bool {
        value.as_str().is_some_and(|s| EMAIL_PATTERN.is_match(s))
    }

    fn generate_constrained_value(
        &self,
        _inputs: &mut dyn SiblingInputs,
    ) -> Result<Value, ResolveError> {
        Ok(Value::String(email_with(&mut rand::rng())))
    }
}

/// Sample provider: an "email account" with a constrained address input.
pub struct EmailResource {
    inputs: PropertyMap,
    outputs: PropertyMap,
}

impl EmailResource {
    /// Creates the sample resource.
    #[must_use]
    pub fn new() -> Arc<Self> {
        let mut inputs = PropertyMap::new();
        inputs.insert(
            "address".to_string(),
            PropertyDefinition::new(PropertyType::String)
                .with_constraint(Arc::new(EmailConstraint)),
        );

        let mut outputs = PropertyMap::new();
        outputs.insert(
            "address".to_string(),
            PropertyDefinition::new(PropertyType::String),
        );

        Arc::new(Self { inputs, outputs })
    }
}

#[async_trait::async_trait]
impl Resource for EmailResource {
    fn name(&self) -> &str {
        "email-account"
    }

    fn inputs(&self) -> &PropertyMap {
        &self.inputs
    }

    fn outputs(&self) -> &PropertyMap {
        &self.outputs
    }

    async fn create(&self, inputs: ValueMap) -> Result<ValueMap, CreateError> {
        let address = inputs
            .get("address")
            .and_then(Value::as_str)
            .ok_or_else(|| CreateError::new("email account requires an address input"))?;

        let mut outputs = ValueMap::new();
        outputs.insert("address".to_string(), Value::from(address));
        Ok(outputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::fill_state_tree;
    use crate::source::RandomSource;
    use fabricate_resources::DesiredState;

    struct NoSiblings;

    impl SiblingInputs for NoSiblings {
        fn resolve(&mut self, key: &str) -> Result<Value, ResolveError> {
            Err(ResolveError::UnknownProperty {
                resource: "none".to_string(),
                key: key.to_string(),
            })
        }
    }

    #[test]
    fn generated_emails_satisfy_the_constraint() {
        let constraint = EmailConstraint;
        for _ in 0..100 {
            let value = constraint
                .generate_constrained_value(&mut NoSiblings)
                .unwrap();
            assert!(constraint.is_valid(&value), "invalid email {value:?}");
            assert!(value.as_str().unwrap().ends_with("@example.com"));
        }
    }

    #[test]
    fn validation_rejects_malformed_addresses() {
        let constraint = EmailConstraint;
        for bad in ["", "plain text", "missing@tld", "@example.com", "a b@example.com"] {
            assert!(!constraint.is_valid(&Value::from(bad)), "accepted {bad:?}");
        }
        assert!(!constraint.is_valid(&Value::Number(3.0)));
        assert!(constraint.is_valid(&Value::from("someone@example.com")));
    }

    #[test]
    fn synthesis_uses_the_constraint_for_the_address_input() {
        let mut states = vec![DesiredState::new("account-1", EmailResource::new())];
        let mut source = RandomSource::seeded(13);
        fill_state_tree(&mut states, &mut source).unwrap();

        let address = states[0].inputs["address"].as_str().unwrap();
        assert!(EMAIL_PATTERN.is_match(address));
    }

    #[tokio::test]
    async fn create_echoes_the_address_output() {
        let resource = EmailResource::new();
        let mut inputs = ValueMap::new();
        inputs.insert("address".to_string(), Value::from("test@example.com"));

        let outputs = resource.create(inputs).await.unwrap();
        assert_eq!(outputs["address"], Value::from("test@example.com"));
    }

    #[tokio::test]
    async fn create_without_address_fails() {
        let resource = EmailResource::new();
        let err = resource.create(ValueMap::new()).await.unwrap_err();
        assert!(format!("{err}").contains("address"));
    }
}
