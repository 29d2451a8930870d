//! In-memory demo providers.
//!
//! Both providers "create" resources by handing back generated IDs; a real
//! integration would call out to an API here.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use fabricate_resources::property::{PropertyDefinition, PropertyMap, PropertyType, link_to};
use fabricate_resources::{CreateError, Resource, Value, ValueMap};
use fabricate_synth::inbuilt::EmailConstraint;

/// A user account with a constrained email input.
pub struct UserResource {
    inputs: PropertyMap,
    outputs: PropertyMap,
    counter: AtomicU64,
}

impl UserResource {
    /// Declares the user resource.
    #[must_use]
    pub fn new() -> Arc<Self> {
        let mut inputs = PropertyMap::new();
        inputs.insert(
            "username".to_string(),
            PropertyDefinition::new(PropertyType::String),
        );
        inputs.insert(
            "email".to_string(),
            PropertyDefinition::new(PropertyType::String)
                .with_constraint(Arc::new(EmailConstraint)),
        );
        inputs.insert(
            "active".to_string(),
            PropertyDefinition::new(PropertyType::Boolean),
        );

        let mut outputs = PropertyMap::new();
        outputs.insert("id".to_string(), PropertyDefinition::new(PropertyType::String));

        Arc::new(Self {
            inputs,
            outputs,
            counter: AtomicU64::new(0),
        })
    }
}

#[async_trait]
impl Resource for UserResource {
    fn name(&self) -> &str {
        "user"
    }

    fn inputs(&self) -> &PropertyMap {
        &self.inputs
    }

    fn outputs(&self) -> &PropertyMap {
        &self.outputs
    }

    async fn create(&self, inputs: ValueMap) -> Result<ValueMap, CreateError> {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(user = n, ?inputs, "creating user");

        let mut outputs = ValueMap::new();
        outputs.insert("id".to_string(), Value::from(format!("user-{n}")));
        Ok(outputs)
    }
}

/// A team owned by a user; synthesis spawns the owner automatically.
pub struct TeamResource {
    inputs: PropertyMap,
    outputs: PropertyMap,
    counter: AtomicU64,
}

impl TeamResource {
    /// Declares the team resource, linking its owner to `user`'s ID.
    #[must_use]
    pub fn new(user: Arc<UserResource>) -> Arc<Self> {
        let mut inputs = PropertyMap::new();
        inputs.insert(
            "name".to_string(),
            PropertyDefinition::new(PropertyType::String),
        );
        inputs.insert(
            "owner".to_string(),
            PropertyDefinition::new(link_to(user, "id")),
        );
        inputs.insert(
            "tags".to_string(),
            PropertyDefinition::new(PropertyType::array_of(PropertyType::String, 1, 4)),
        );

        let mut outputs = PropertyMap::new();
        outputs.insert("id".to_string(), PropertyDefinition::new(PropertyType::String));

        Arc::new(Self {
            inputs,
            outputs,
            counter: AtomicU64::new(0),
        })
    }
}

#[async_trait]
impl Resource for TeamResource {
    fn name(&self) -> &str {
        "team"
    }

    fn inputs(&self) -> &PropertyMap {
        &self.inputs
    }

    fn outputs(&self) -> &PropertyMap {
        &self.outputs
    }

    async fn create(&self, inputs: ValueMap) -> Result<ValueMap, CreateError> {
        let owner = inputs
            .get("owner")
            .and_then(Value::as_str)
            .ok_or_else(|| CreateError::new("team requires a resolved owner"))?;
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(team = n, owner, "creating team");

        let mut outputs = ValueMap::new();
        outputs.insert("id".to_string(), Value::from(format!("team-{n}")));
        Ok(outputs)
    }
}
