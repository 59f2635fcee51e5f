//! Assignment engine error types.

use thiserror::Error;

use crate::activity::ActivityType;
use crate::ids::{MemberId, PartyId};

/// Errors that can occur during assignment engine operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AssignError {
    /// The target party does not exist for this account.
    #[error("party not found: {party_id}")]
    PartyNotFound {
        /// The party id that was not found.
        party_id: PartyId,
    },

    /// The member has no directory record.
    #[error("member not found: {member_id}")]
    MemberNotFound {
        /// The member id that was not found.
        member_id: MemberId,
    },

    /// The member does not occupy a slot in the named party.
    #[error("member {member_id} is not in party {party_id}")]
    MemberNotInParty {
        /// The member that was expected in the party.
        member_id: MemberId,
        /// The party that does not hold the member.
        party_id: PartyId,
    },

    /// The member occupies no slot in any party of the activity type.
    #[error("member {member_id} holds no {activity} slot")]
    MemberNotPlaced {
        /// The unplaced member.
        member_id: MemberId,
        /// The activity type scanned.
        activity: ActivityType,
    },

    /// No empty non-leader slot remains in the target party.
    #[error("party {party_id} has no open slot")]
    PartyFull {
        /// The full party.
        party_id: PartyId,
    },

    /// An explicit slot index is outside the fixed slot array.
    #[error("slot index {slot} out of range, limit is {limit}")]
    SlotOutOfRange {
        /// The requested index.
        slot: usize,
        /// The fixed slot count.
        limit: usize,
    },

    /// The target party belongs to a different activity type than the
    /// request.
    #[error("party {party_id} is a {party_activity} party, request was for {requested}")]
    ActivityMismatch {
        /// The target party.
        party_id: PartyId,
        /// The party's actual activity type.
        party_activity: ActivityType,
        /// The activity type named by the request.
        requested: ActivityType,
    },

    /// A declared swap position disagrees with the member's discovered
    /// position. The caller's view of the roster is stale.
    #[error(
        "stale position for member {member_id}: declared {declared_party}[{declared_slot}], \
         actual {actual_party}[{actual_slot}]"
    )]
    PositionConflict {
        /// The member whose position was declared.
        member_id: MemberId,
        /// The declared party.
        declared_party: PartyId,
        /// The declared slot index.
        declared_slot: usize,
        /// The discovered party.
        actual_party: PartyId,
        /// The discovered slot index.
        actual_slot: usize,
    },
}
