//! Dependency graph derivation.
//!
//! The graph is built once per generation run, after synthesis: edges are
//! derived from the [`ResourceLink`](fabricate_resources::ResourceLink)s
//! found anywhere in each state's resolved inputs. Nodes keep the working
//! list's order, so looking a state up by ID or by index is cheap.

use fabricate_resources::{DesiredState, StateId};
use hashbrown::HashMap;

use crate::error::GenerateError;
use crate::node::{Outcome, StateNode};

/// Derived dependency graph over a fully-synthesized working list.
#[derive(Debug)]
pub struct DependencyGraph {
    nodes: Vec<StateNode>,
    index: HashMap<StateId, usize>,
}

impl DependencyGraph {
    /// Derives the graph from resolved desired states.
    ///
    /// Duplicate links between the same pair of states collapse into one
    /// edge. Node depth is the longest dependency chain below it; the
    /// scheduler uses it to prefer deep prerequisites first.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::UntrackedLinkTarget`] if any link points at
    /// a state that is not part of `states`.
    pub fn build(states: Vec<DesiredState>) -> Result<Self, GenerateError> {
        let mut index = HashMap::with_capacity(states.len());
        for (i, state) in states.iter().enumerate() {
            index.insert(state.id.clone(), i);
        }
        let mut nodes: Vec<StateNode> = states.into_iter().map(StateNode::new).collect();

        let mut edges: Vec<Vec<usize>> = Vec::with_capacity(nodes.len());
        for node in &nodes {
            let mut links = Vec::new();
            for value in node.state.inputs.values() {
                value.collect_links(&mut links);
            }
            let mut dependencies = Vec::new();
            for link in links {
                let Some(&target) = index.get(&link.target) else {
                    return Err(GenerateError::UntrackedLinkTarget {
                        state: node.state.name.clone(),
                        target: link.target.clone(),
                    });
                };
                if !dependencies.contains(&target) {
                    dependencies.push(target);
                }
            }
            edges.push(dependencies);
        }

        for (i, dependencies) in edges.into_iter().enumerate() {
            for &dep in &dependencies {
                nodes[dep].dependents.push(i);
            }
            nodes[i].dependencies = dependencies;
        }

        compute_depths(&mut nodes);

        Ok(Self { nodes, index })
    }

    /// Number of nodes (tracked states).
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes, in working-list order.
    #[must_use]
    pub fn nodes(&self) -> &[StateNode] {
        &self.nodes
    }

    /// The node at `index`.
    #[must_use]
    pub fn node(&self, index: usize) -> &StateNode {
        &self.nodes[index]
    }

    /// Mutable access to the node at `index`.
    pub fn node_mut(&mut self, index: usize) -> &mut StateNode {
        &mut self.nodes[index]
    }

    /// Looks a node up by its state ID.
    #[must_use]
    pub fn index_of(&self, id: &StateId) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Indices of pending nodes whose dependencies have all succeeded.
    ///
    /// Sorted shallow-first (stable on discovery order) so short chains
    /// finish early when concurrency is contended.
    #[must_use]
    pub fn ready(&self) -> Vec<usize> {
        let mut ready: Vec<usize> = self
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| {
                matches!(node.outcome, Outcome::Pending)
                    && node
                        .dependencies
                        .iter()
                        .all(|&dep| matches!(self.nodes[dep].outcome, Outcome::Succeeded(_)))
            })
            .map(|(i, _)| i)
            .collect();
        ready.sort_by_key(|&i| self.nodes[i].depth);
        ready
    }
}

fn compute_depths(nodes: &mut [StateNode]) {
    let mut memo = vec![None; nodes.len()];
    let mut on_stack = vec![false; nodes.len()];
    for i in 0..nodes.len() {
        let depth = depth_of(i, nodes, &mut memo, &mut on_stack);
        nodes[i].depth = depth;
    }
}

fn depth_of(
    i: usize,
    nodes: &[StateNode],
    memo: &mut [Option<usize>],
    on_stack: &mut [bool],
) -> usize {
    if let Some(depth) = memo[i] {
        return depth;
    }
    if on_stack[i] {
        // Dependency cycle: depth is meaningless, and the scheduler will
        // report the cycle as a stall.
        return 0;
    }
    on_stack[i] = true;
    let mut depth = 0;
    for &dep in &nodes[i].dependencies {
        depth = depth.max(1 + depth_of(dep, nodes, memo, on_stack));
    }
    on_stack[i] = false;
    memo[i] = Some(depth);
    depth
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use fabricate_resources::property::PropertyMap;
    use fabricate_resources::{
        CreateError, Resource, ResourceInstance, ResourceLink, Value, ValueMap,
    };
    use std::sync::Arc;

    struct NullResource {
        properties: PropertyMap,
    }

    impl NullResource {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                properties: PropertyMap::new(),
            })
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

    fn linked(name: &str, targets: &[&DesiredState]) -> DesiredState {
        let mut state = DesiredState::new(name, NullResource::new());
        for (i, target) in targets.iter().enumerate() {
            state = state.with_input(
                format!("ref{i}"),
                Value::Link(ResourceLink::new(target.id.clone(), "id")),
            );
        }
        state
    }

    #[test]
    fn edges_and_depths_follow_links() {
        let a = DesiredState::new("a", NullResource::new());
        let b = linked("b", &[&a]);
        let c = linked("c", &[&b, &a]);

        let graph = DependencyGraph::build(vec![c, b, a]).unwrap();

        assert_eq!(graph.len(), 3);
        let (c, b, a) = (graph.node(0), graph.node(1), graph.node(2));
        assert_eq!(c.dependencies, vec![1, 2]);
        assert_eq!(b.dependencies, vec![2]);
        assert!(a.dependencies.is_empty());
        assert_eq!(a.dependents, vec![0, 1]);

        assert_eq!(a.depth, 0);
        assert_eq!(b.depth, 1);
        assert_eq!(c.depth, 2);
    }

    #[test]
    fn duplicate_links_collapse_into_one_edge() {
        let a = DesiredState::new("a", NullResource::new());
        let b = linked("b", &[&a, &a, &a]);

        let graph = DependencyGraph::build(vec![a, b]).unwrap();
        assert_eq!(graph.node(1).dependencies, vec![0]);
        assert_eq!(graph.node(0).dependents, vec![1]);
    }

    #[test]
    fn untracked_link_target_is_rejected() {
        let elsewhere = DesiredState::new("elsewhere", NullResource::new());
        let b = linked("b", &[&elsewhere]);

        let err = DependencyGraph::build(vec![b]).unwrap_err();
        assert_eq!(
            err,
            GenerateError::UntrackedLinkTarget {
                state: "b".to_string(),
                target: elsewhere.id,
            }
        );
    }

    #[test]
    fn ready_excludes_unsatisfied_dependents() {
        let a = DesiredState::new("a", NullResource::new());
        let b = linked("b", &[&a]);
        let a_id = a.id.clone();

        let mut graph = DependencyGraph::build(vec![a, b]).unwrap();
        assert_eq!(graph.ready(), vec![0]);

        let idx = graph.index_of(&a_id).unwrap();
        graph.node_mut(idx).outcome = Outcome::Succeeded(ResourceInstance::new(
            a_id,
            "a",
            ValueMap::new(),
        ));
        assert_eq!(graph.ready(), vec![1]);
    }

    #[test]
    fn cyclic_links_never_become_ready() {
        let mut a = DesiredState::new("a", NullResource::new());
        let mut b = DesiredState::new("b", NullResource::new());
        let (a_id, b_id) = (a.id.clone(), b.id.clone());
        a.inputs.insert(
            "peer".to_string(),
            Value::Link(ResourceLink::new(b_id, "id")),
        );
        b.inputs.insert(
            "peer".to_string(),
            Value::Link(ResourceLink::new(a_id, "id")),
        );

        let graph = DependencyGraph::build(vec![a, b]).unwrap();
        assert!(graph.ready().is_empty());
    }

    #[test]
    fn ready_orders_shallow_nodes_first() {
        let base = DesiredState::new("base", NullResource::new());
        let mid = linked("mid", &[&base]);
        let shallow = DesiredState::new("shallow", NullResource::new());
        let base_id = base.id.clone();

        let mut graph = DependencyGraph::build(vec![mid, shallow, base]).unwrap();
        let idx = graph.index_of(&base_id).unwrap();
        graph.node_mut(idx).outcome = Outcome::Succeeded(ResourceInstance::new(
            base_id,
            "base",
            ValueMap::new(),
        ));

        // shallow (depth 0) schedules ahead of mid (depth 1).
        assert_eq!(graph.ready(), vec![1, 0]);
    }
}
