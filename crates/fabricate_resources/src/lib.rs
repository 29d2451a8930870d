//! Property type system and desired-state model for fabricate (Layer 1).
//!
//! `fabricate_resources` defines the data model everything else builds on:
//! typed property declarations, dynamic runtime values, cross-resource
//! links, pluggable constraints, and the [`Resource`] trait implemented by
//! creation providers.
//!
//! # Core Concepts
//!
//! - [`PropertyType`] - Closed set of property type variants
//! - [`Value`] - Dynamic runtime value, including forward [`ResourceLink`]s
//! - [`Constraint`] - Pluggable validity + constrained-synthesis rule
//! - [`Resource`] - External creation provider for one resource kind
//! - [`DesiredState`] - A resource the caller (or a link) wants created
//!
//! # Architecture
//!
//! This crate is Layer 1 of the fabricate architecture:
//!
//! - **Layer 1** (`fabricate_resources`): data model (this crate)
//! - **Layer 2** (`fabricate_synth`): value synthesis and input resolution
//! - **Layer 2** (`fabricate_graph`): dependency graph and generation

/// Pluggable constraints and the sibling-input seam.
pub mod constraint;

/// Explicit property-path builder.
pub mod path;

/// Property type declarations.
pub mod property;

/// The creation-provider trait and produced instances.
pub mod resource;

/// Desired-state model and state identifiers.
pub mod state;

/// Dynamic runtime values and resource links.
pub mod value;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use crate::constraint::{Constraint, ResolveError, SiblingInputs};
    pub use crate::path::{PathSegment, PropertyPath};
    pub use crate::property::{
        ArrayConstraint, LinkType, PropertyDefinition, PropertyMap, PropertyType, link_any,
        link_to, optional_link,
    };
    pub use crate::resource::{CreateError, Resource, ResourceInstance};
    pub use crate::state::{DesiredState, StateId};
    pub use crate::value::{ResourceLink, Value, ValueMap};
}

pub use constraint::{Constraint, ResolveError, SiblingInputs};
pub use property::{PropertyDefinition, PropertyMap, PropertyType};
pub use resource::{CreateError, Resource, ResourceInstance};
pub use state::{DesiredState, StateId};
pub use value::{ResourceLink, Value, ValueMap};
