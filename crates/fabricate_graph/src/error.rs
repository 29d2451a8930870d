//! Errors raised while building the dependency graph and scheduling
//! creation.

use core::time::Duration;

use fabricate_resources::{CreateError, ResolveError, StateId};

/// Why one desired state's creation failed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CreationErrorKind {
    /// The provider's `create` call returned an error.
    #[error("{0}")]
    Provider(#[from] CreateError),

    /// The provider's `create` call did not finish within the timeout.
    #[error("creation timed out after {0:?}")]
    Timeout(Duration),

    /// A link resolved to a created dependency that did not produce the
    /// referenced output.
    #[error("dependency '{target}' produced no output '{output_key}'")]
    MissingLinkOutput {
        /// Name of the dependency state the link points at.
        target: String,
        /// The output key the link expected.
        output_key: String,
    },
}

/// A creation failure, attributed to the desired state it happened on.
///
/// One failure never aborts the run: independent states keep being created
/// and every failure is collected into the final [`GenerateError::Failed`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("failed to create '{state_name}' of resource '{resource_name}': {kind}")]
pub struct CreationError {
    /// Name of the desired state that failed.
    pub state_name: String,
    /// Resource kind of the failed state.
    pub resource_name: String,
    /// What went wrong.
    pub kind: CreationErrorKind,
}

/// Top-level outcome of a generation run that did not fully succeed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GenerateError {
    /// Input synthesis failed before any scheduling happened.
    #[error(transparent)]
    Synthesis(#[from] ResolveError),

    /// A link in a state's inputs points at a state outside the working
    /// list.
    #[error("state '{state}' links to untracked state {target}")]
    UntrackedLinkTarget {
        /// Name of the state holding the dangling link.
        state: String,
        /// The ID the link points at.
        target: StateId,
    },

    /// One or more creations failed; everything that could proceed did.
    #[error("generation finished with {} creation failure(s)", .0.len())]
    Failed(Vec<CreationError>),

    /// No creation failed, yet some states could never be scheduled.
    ///
    /// Caller-supplied links forming a dependency cycle are the usual
    /// cause.
    #[error("generation stalled: remaining states have unsatisfiable dependencies")]
    Stalled,
}
