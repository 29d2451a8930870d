//! Shared test utilities for `fabricate_graph` integration tests.
//!
//! Provides a configurable fake provider plus a shared creation log used
//! across test files. Import via `mod test_utils;` in test files.

#![allow(
    dead_code,
    missing_docs,
    reason = "shared test utilities — not all items used in every test binary"
)]

use core::time::Duration;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use fabricate_resources::property::{PropertyDefinition, PropertyMap, PropertyType};
use fabricate_resources::{CreateError, Resource, Value, ValueMap};

// ═══════════════════════════════════════════════════════════════════════════════
// CREATION LOG
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Default)]
struct LogInner {
    entries: Vec<(String, ValueMap)>,
    active: usize,
    max_active: usize,
}

/// Records every `create` call: which resource, with which materialized
/// inputs, and how many calls overlapped.
#[derive(Clone, Default)]
pub struct CreationLog {
    inner: Arc<Mutex<LogInner>>,
}

impl CreationLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn begin(&self, name: &str, inputs: &ValueMap) {
        let mut inner = self.inner.lock().unwrap();
        inner.entries.push((name.to_string(), inputs.clone()));
        inner.active += 1;
        inner.max_active = inner.max_active.max(inner.active);
    }

    fn end(&self) {
        self.inner.lock().unwrap().active -= 1;
    }

    /// Resource names in `create`-start order.
    pub fn names(&self) -> Vec<String> {
        self.inner
            .lock()
            .unwrap()
            .entries
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// The materialized inputs the first `create` call on `name` received.
    pub fn inputs_of(&self, name: &str) -> Option<ValueMap> {
        self.inner
            .lock()
            .unwrap()
            .entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, inputs)| inputs.clone())
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().entries.len()
    }

    /// Highest number of concurrently running `create` calls observed.
    pub fn max_concurrent(&self) -> usize {
        self.inner.lock().unwrap().max_active
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// CONFIGURABLE FAKE PROVIDER
// ═══════════════════════════════════════════════════════════════════════════════

/// Fake provider with configurable behavior.
///
/// Declared outputs are produced deterministically as
/// `"{resource}-{key}"` strings, so tests can assert exact materialized
/// link values.
pub struct TestResource {
    name: String,
    inputs: PropertyMap,
    outputs: PropertyMap,
    delay: Option<Duration>,
    fail_with: Option<String>,
    never_finishes: bool,
    withhold_outputs: bool,
    timeout_override: Option<Duration>,
    log: CreationLog,
}

impl TestResource {
    pub fn new(name: &str, log: &CreationLog) -> Self {
        Self {
            name: name.to_string(),
            inputs: PropertyMap::new(),
            outputs: PropertyMap::new(),
            delay: None,
            fail_with: None,
            never_finishes: false,
            withhold_outputs: false,
            timeout_override: None,
            log: log.clone(),
        }
    }

    pub fn with_input(mut self, key: &str, kind: PropertyType) -> Self {
        self.inputs
            .insert(key.to_string(), PropertyDefinition::new(kind));
        self
    }

    /// Declares a string output named `key`.
    pub fn with_output(mut self, key: &str) -> Self {
        self.outputs
            .insert(key.to_string(), PropertyDefinition::new(PropertyType::String));
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn failing(mut self, message: &str) -> Self {
        self.fail_with = Some(message.to_string());
        self
    }

    /// `create` never completes; only a timeout can settle the state.
    pub fn never_finishing(mut self) -> Self {
        self.never_finishes = true;
        self
    }

    /// Declares outputs but returns none from `create`.
    pub fn withholding_outputs(mut self) -> Self {
        self.withhold_outputs = true;
        self
    }

    pub fn with_create_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_override = Some(timeout);
        self
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }
}

#[async_trait]
impl Resource for TestResource {
    fn name(&self) -> &str {
        &self.name
    }

    fn inputs(&self) -> &PropertyMap {
        &self.inputs
    }

    fn outputs(&self) -> &PropertyMap {
        &self.outputs
    }

    fn create_timeout(&self) -> Option<Duration> {
        self.timeout_override
    }

    async fn create(&self, inputs: ValueMap) -> Result<ValueMap, CreateError> {
        self.log.begin(&self.name, &inputs);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.never_finishes {
            std::future::pending::<()>().await;
        }
        self.log.end();

        if let Some(message) = &self.fail_with {
            return Err(CreateError::new(message.clone()));
        }
        if self.withhold_outputs {
            return Ok(ValueMap::new());
        }

        let mut outputs = ValueMap::new();
        for key in self.outputs.keys() {
            outputs.insert(key.clone(), Value::from(format!("{}-{key}", self.name)));
        }
        Ok(outputs)
    }
}
