//! Error types for host mutations.
//!
//! Event handling itself never fails from the host's point of view: every
//! entry or leave resolves to a definite outcome. The only fallible step is
//! asking the host to mutate an object, which is reported through
//! [`MutationError`] and absorbed by the trackers.

use crate::types::EntityId;

/// Failure of a host-provided mutation (quantity, value or position).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MutationError {
    /// The host cannot perform this kind of mutation at all
    #[error("Mutation not supported by host")]
    Unsupported,

    /// The target object is unknown to the host
    #[error("Unknown entity: {0}")]
    UnknownEntity(EntityId),

    /// The merged value does not fit the value type
    #[error("Merged value overflows")]
    ValueOverflow,

    /// The host refused the mutation for its own reasons
    #[error("Mutation rejected: {0}")]
    Rejected(String),
}
