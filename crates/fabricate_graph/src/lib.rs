//! Dependency graph and creation scheduling for fabricate (Layer 2).
//!
//! `fabricate_graph` takes a fully-synthesized working list of desired
//! states, derives a dependency graph from the links in their inputs, and
//! creates every resource through its provider with bounded concurrency,
//! per-creation timeouts, and aggregated failure reporting.
//!
//! # Core Concepts
//!
//! - [`DependencyGraph`] - Link-derived graph over the working list
//! - [`StateNode`] - One desired state plus its scheduling bookkeeping
//! - [`Generator`] - End-to-end scheduler (synthesize, derive, create)
//! - [`GenerateError`] - Aggregated outcome of a non-successful run
//!
//! # Example
//!
//! ```ignore
//! use fabricate_graph::Generator;
//! use fabricate_resources::DesiredState;
//!
//! let mut generator = Generator::new();
//! let instances = generator
//!     .generate(vec![DesiredState::new("bucket-1", bucket.clone())])
//!     .await?;
//! ```
//!
//! # Architecture
//!
//! This crate is Layer 2 of the fabricate architecture:
//!
//! - **Layer 1** (`fabricate_resources`): data model
//! - **Layer 2** (`fabricate_synth`): value synthesis and input resolution
//! - **Layer 2** (`fabricate_graph`): dependency graph and generation
//!   (this crate)

/// Errors raised while building the graph and scheduling creation.
pub mod error;

/// Creation scheduler.
pub mod generator;

/// Dependency graph derivation.
pub mod graph;

/// Graph nodes and per-state outcomes.
pub mod node;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use crate::error::{CreationError, CreationErrorKind, GenerateError};
    pub use crate::generator::Generator;
    pub use crate::graph::DependencyGraph;
    pub use crate::node::{Outcome, StateNode};
}

pub use error::{CreationError, CreationErrorKind, GenerateError};
pub use generator::Generator;
pub use graph::DependencyGraph;
pub use node::{Outcome, StateNode};
