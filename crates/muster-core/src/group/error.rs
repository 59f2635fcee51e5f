//! Group registry error types.

use thiserror::Error;

use crate::ids::GroupId;
use crate::party::PartyError;

/// Errors that can occur during group registry operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GroupError {
    /// The group does not exist for this account.
    #[error("group not found: {group_id}")]
    NotFound {
        /// The group id that was not found.
        group_id: GroupId,
    },

    /// A cascading party deletion failed.
    #[error("cascade into party registry failed: {0}")]
    Cascade(#[from] PartyError),
}
