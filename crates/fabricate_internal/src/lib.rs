//! # Fabricate Internal Library
//!
//! Re-exports the core fabricate crates for convenience.

/// Layer 1: property type system and desired-state model.
pub use fabricate_resources;

/// Layer 2: value synthesis and lazy input resolution.
pub use fabricate_synth;

/// Layer 2: dependency graph and creation scheduling.
pub use fabricate_graph;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use fabricate_graph::prelude::*;
    pub use fabricate_resources::prelude::*;
    pub use fabricate_synth::prelude::*;
}
