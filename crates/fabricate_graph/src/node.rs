//! Graph nodes: one desired state plus its scheduling bookkeeping.

use fabricate_resources::{DesiredState, ResourceInstance};

use crate::error::CreationError;

/// Lifecycle of one desired state inside a generation run.
#[derive(Debug)]
pub enum Outcome {
    /// Not yet scheduled.
    Pending,
    /// The provider's `create` call is in flight.
    InProgress,
    /// Created; dependents may read the instance's outputs.
    Succeeded(ResourceInstance),
    /// Creation failed; dependents can never be scheduled.
    Failed(CreationError),
}

impl Outcome {
    /// Returns true once the node can never change state again.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        matches!(self, Outcome::Succeeded(_) | Outcome::Failed(_))
    }

    /// Returns the created instance, if the node succeeded.
    #[must_use]
    pub fn instance(&self) -> Option<&ResourceInstance> {
        match self {
            Outcome::Succeeded(instance) => Some(instance),
            _ => None,
        }
    }
}

/// One vertex of the dependency graph.
///
/// Edges are stored as indices into the owning graph's node list, derived
/// from the links found in the state's resolved inputs.
#[derive(Debug)]
pub struct StateNode {
    /// The desired state this node schedules.
    pub state: DesiredState,
    /// Longest dependency chain below this node; drives scheduling order.
    pub depth: usize,
    /// Indices of states this node's inputs link to.
    pub dependencies: Vec<usize>,
    /// Indices of states whose inputs link to this node.
    pub dependents: Vec<usize>,
    /// Current lifecycle state.
    pub outcome: Outcome,
}

impl StateNode {
    /// Wraps a desired state with empty edges.
    #[must_use]
    pub fn new(state: DesiredState) -> Self {
        Self {
            state,
            depth: 0,
            dependencies: Vec::new(),
            dependents: Vec::new(),
            outcome: Outcome::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fabricate_resources::{StateId, ValueMap};

    #[test]
    fn outcome_settlement() {
        assert!(!Outcome::Pending.is_settled());
        assert!(!Outcome::InProgress.is_settled());

        let instance = ResourceInstance::new(StateId::from_string("s"), "n", ValueMap::new());
        let succeeded = Outcome::Succeeded(instance);
        assert!(succeeded.is_settled());
        assert!(succeeded.instance().is_some());
        assert!(Outcome::Pending.instance().is_none());
    }
}
