//! Typed synthetic-resource generation: declare desired resources, let
//! fabricate fill in plausible values, and create them through async
//! providers in dependency order.

pub use fabricate_internal::*;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use fabricate_internal::prelude::*;
}
