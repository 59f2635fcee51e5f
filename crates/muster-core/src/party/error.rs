//! Party registry error types.

use thiserror::Error;

use crate::ids::{GroupId, PartyId};

/// Errors that can occur during party registry operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PartyError {
    /// The party does not exist for this account.
    #[error("party not found: {party_id}")]
    NotFound {
        /// The party id that was not found.
        party_id: PartyId,
    },

    /// The owning group referenced on create does not exist.
    #[error("group not found: {group_id}")]
    GroupNotFound {
        /// The group id that was not found.
        group_id: GroupId,
    },

    /// The owning group already holds the maximum number of parties.
    #[error("group {group_id} already holds {limit} parties")]
    GroupFull {
        /// The group that is at capacity.
        group_id: GroupId,
        /// The per-group party cap.
        limit: usize,
    },

    /// A supplied slot vector exceeds the fixed slot count.
    #[error("slot vector has {provided} entries, limit is {limit}")]
    TooManySlots {
        /// Number of entries supplied.
        provided: usize,
        /// The fixed slot count.
        limit: usize,
    },
}
