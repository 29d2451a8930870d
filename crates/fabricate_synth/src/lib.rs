//! Value synthesis and lazy input resolution for fabricate (Layer 2).
//!
//! `fabricate_synth` fills in the unset inputs of desired states: a
//! recursive, type-driven synthesizer produces concrete values (spawning
//! dependent states for link-typed properties), and a lazy memoizing
//! resolver lets one input's synthesis read sibling inputs of the same
//! resource.
//!
//! # Example
//!
//! ```ignore
//! use fabricate_resources::DesiredState;
//! use fabricate_synth::{RandomSource, fill_state_tree};
//!
//! let mut states = vec![DesiredState::new("bucket-1", bucket.clone())];
//! let mut source = RandomSource::seeded(42);
//! fill_state_tree(&mut states, &mut source)?;
//! // every declared input of every state (including link-spawned ones)
//! // is now present
//! ```

/// Inbuilt constraints and sample resources.
pub mod inbuilt;

/// Lazy input resolution and the recursive synthesizer.
pub mod resolver;

/// Injectable entropy and example-value source.
pub mod source;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use crate::inbuilt::{EmailConstraint, EmailResource};
    pub use crate::resolver::{InputResolver, fill_state_tree};
    pub use crate::source::{RandomSource, ValueSource};
}

pub use resolver::{InputResolver, fill_state_tree};
pub use source::{RandomSource, ValueSource};
