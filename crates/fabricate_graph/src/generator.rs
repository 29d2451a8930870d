//! Creation scheduler.
//!
//! The [`Generator`] drives a full generation run: synthesize every input,
//! derive the dependency graph, then create resources through their
//! providers with bounded concurrency. Dependency outputs are materialized
//! into link-typed inputs just before each `create` call.
//!
//! # Example
//!
//! ```ignore
//! use fabricate_graph::Generator;
//! use fabricate_resources::DesiredState;
//!
//! let mut generator = Generator::new().with_seed(42);
//! let instances = generator
//!     .generate(vec![DesiredState::new("bucket-1", bucket.clone())])
//!     .await?;
//! ```

use core::time::Duration;
use std::panic::{AssertUnwindSafe, catch_unwind};

use fabricate_resources::{DesiredState, ResourceInstance, Value, ValueMap};
use fabricate_synth::{RandomSource, ValueSource, fill_state_tree};
use futures::StreamExt;
use futures::stream::FuturesUnordered;

use crate::error::{CreationError, CreationErrorKind, GenerateError};
use crate::graph::DependencyGraph;
use crate::node::Outcome;

type CreatedHook = Box<dyn Fn(&ResourceInstance) + Send + Sync>;
type FailedHook = Box<dyn Fn(&CreationError) + Send + Sync>;

/// Schedules resource creation over a dependency graph.
///
/// Failures are isolated: a failed creation only blocks its transitive
/// dependents, and everything else keeps being created. The run's outcome
/// aggregates every failure.
pub struct Generator {
    concurrency: usize,
    default_timeout: Duration,
    source: Box<dyn ValueSource>,
    on_create: Option<CreatedHook>,
    on_error: Option<FailedHook>,
}

impl Default for Generator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator {
    /// Default bound on concurrently in-flight `create` calls.
    pub const DEFAULT_CONCURRENCY: usize = 10;

    /// Default per-creation timeout, overridable per resource kind.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Creates a generator with default limits and OS-seeded entropy.
    #[must_use]
    pub fn new() -> Self {
        Self {
            concurrency: Self::DEFAULT_CONCURRENCY,
            default_timeout: Self::DEFAULT_TIMEOUT,
            source: Box::new(RandomSource::new()),
            on_create: None,
            on_error: None,
        }
    }

    /// Sets the bound on concurrently in-flight creations. Clamped to 1.
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Sets the default per-creation timeout.
    ///
    /// A resource kind's own
    /// [`create_timeout`](fabricate_resources::Resource::create_timeout)
    /// takes precedence.
    #[must_use]
    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    /// Replaces the synthesis value source.
    #[must_use]
    pub fn with_source(mut self, source: impl ValueSource + 'static) -> Self {
        self.source = Box::new(source);
        self
    }

    /// Uses a reproducible seeded value source.
    #[must_use]
    pub fn with_seed(self, seed: u64) -> Self {
        self.with_source(RandomSource::seeded(seed))
    }

    /// Registers a callback invoked after each successful creation.
    ///
    /// Callbacks are sandboxed: a panicking callback is discarded and never
    /// affects the run.
    #[must_use]
    pub fn on_create(mut self, hook: impl Fn(&ResourceInstance) + Send + Sync + 'static) -> Self {
        self.on_create = Some(Box::new(hook));
        self
    }

    /// Registers a callback invoked after each creation failure.
    ///
    /// Sandboxed the same way as [`Generator::on_create`].
    #[must_use]
    pub fn on_error(mut self, hook: impl Fn(&CreationError) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Box::new(hook));
        self
    }

    /// Runs a full generation pass over `states`.
    ///
    /// Returns the created instances for the caller's states, in submission
    /// order. Link-spawned dependencies are created too; their outputs are
    /// visible through the materialized inputs of their dependents.
    ///
    /// # Errors
    ///
    /// - [`GenerateError::Synthesis`] if input resolution fails; nothing is
    ///   created.
    /// - [`GenerateError::UntrackedLinkTarget`] if a link points outside
    ///   the working list; nothing is created.
    /// - [`GenerateError::Failed`] aggregating every creation failure once
    ///   everything that could proceed has settled.
    /// - [`GenerateError::Stalled`] if no creation failed yet some states
    ///   could never be scheduled.
    pub async fn generate(
        &mut self,
        states: Vec<DesiredState>,
    ) -> Result<Vec<ResourceInstance>, GenerateError> {
        let requested = states.len();
        let mut states = states;
        fill_state_tree(&mut states, &mut *self.source)?;
        tracing::debug!(requested, total = states.len(), "input synthesis complete");

        let mut graph = DependencyGraph::build(states)?;
        let mut errors: Vec<CreationError> = Vec::new();
        let mut in_flight = FuturesUnordered::new();

        loop {
            for idx in graph.ready() {
                if in_flight.len() >= self.concurrency {
                    break;
                }
                match materialize_inputs(&graph, idx) {
                    Ok(inputs) => {
                        let node = graph.node(idx);
                        let resource = node.state.resource.clone();
                        let timeout = resource.create_timeout().unwrap_or(self.default_timeout);
                        tracing::debug!(state = %node.state.name, depth = node.depth, "creating");
                        graph.node_mut(idx).outcome = Outcome::InProgress;
                        in_flight.push(async move {
                            let result =
                                match tokio::time::timeout(timeout, resource.create(inputs)).await {
                                    Ok(Ok(outputs)) => Ok(outputs),
                                    Ok(Err(err)) => Err(CreationErrorKind::Provider(err)),
                                    Err(_) => Err(CreationErrorKind::Timeout(timeout)),
                                };
                            (idx, result)
                        });
                    }
                    Err(kind) => self.settle_failure(&mut graph, &mut errors, idx, kind),
                }
            }

            // Nothing in flight after admission means nothing left that can
            // proceed.
            let Some((idx, result)) = in_flight.next().await else {
                break;
            };

            match result {
                Ok(outputs) => {
                    let state = &graph.node(idx).state;
                    let instance =
                        ResourceInstance::new(state.id.clone(), state.name.clone(), outputs);
                    tracing::debug!(state = %instance.name, "created");
                    self.notify_created(&instance);
                    graph.node_mut(idx).outcome = Outcome::Succeeded(instance);
                }
                Err(kind) => self.settle_failure(&mut graph, &mut errors, idx, kind),
            }
        }

        if !errors.is_empty() {
            return Err(GenerateError::Failed(errors));
        }

        let mut instances = Vec::with_capacity(requested);
        for node in &graph.nodes()[..requested] {
            match node.outcome.instance() {
                Some(instance) => instances.push(instance.clone()),
                None => return Err(GenerateError::Stalled),
            }
        }
        if graph.nodes()[requested..]
            .iter()
            .any(|node| node.outcome.instance().is_none())
        {
            return Err(GenerateError::Stalled);
        }
        Ok(instances)
    }

    fn settle_failure(
        &self,
        graph: &mut DependencyGraph,
        errors: &mut Vec<CreationError>,
        idx: usize,
        kind: CreationErrorKind,
    ) {
        let state = &graph.node(idx).state;
        let error = CreationError {
            state_name: state.name.clone(),
            resource_name: state.resource.name().to_string(),
            kind,
        };
        tracing::warn!(state = %error.state_name, %error, "creation failed");
        self.notify_failed(&error);
        errors.push(error.clone());
        graph.node_mut(idx).outcome = Outcome::Failed(error);
    }

    fn notify_created(&self, instance: &ResourceInstance) {
        if let Some(hook) = &self.on_create
            && catch_unwind(AssertUnwindSafe(|| hook(instance))).is_err()
        {
            tracing::warn!(state = %instance.name, "creation callback panicked");
        }
    }

    fn notify_failed(&self, error: &CreationError) {
        if let Some(hook) = &self.on_error
            && catch_unwind(AssertUnwindSafe(|| hook(error))).is_err()
        {
            tracing::warn!(state = %error.state_name, "error callback panicked");
        }
    }
}

/// Deep-copies a state's inputs, replacing every link with the referenced
/// dependency output. Absent entries are dropped so providers see them as
/// missing keys.
fn materialize_inputs(
    graph: &DependencyGraph,
    idx: usize,
) -> Result<ValueMap, CreationErrorKind> {
    let state = &graph.node(idx).state;
    let mut inputs = ValueMap::with_capacity(state.inputs.len());
    for (key, value) in &state.inputs {
        if value.is_absent() {
            continue;
        }
        inputs.insert(key.clone(), materialize_value(graph, value)?);
    }
    Ok(inputs)
}

fn materialize_value(graph: &DependencyGraph, value: &Value) -> Result<Value, CreationErrorKind> {
    match value {
        Value::Link(link) => {
            let target = graph.index_of(&link.target);
            let output = target
                .and_then(|t| graph.node(t).outcome.instance())
                .and_then(|instance| instance.output(&link.output_key));
            match output {
                Some(resolved) => Ok(resolved.clone()),
                None => Err(CreationErrorKind::MissingLinkOutput {
                    target: target
                        .map_or_else(|| link.target.to_string(), |t| {
                            graph.node(t).state.name.clone()
                        }),
                    output_key: link.output_key.clone(),
                }),
            }
        }
        Value::Array(items) => items
            .iter()
            .map(|item| materialize_value(graph, item))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        Value::Map(map) => {
            let mut out = ValueMap::with_capacity(map.len());
            for (key, entry) in map {
                if entry.is_absent() {
                    continue;
                }
                out.insert(key.clone(), materialize_value(graph, entry)?);
            }
            Ok(Value::Map(out))
        }
        other => Ok(other.clone()),
    }
}
