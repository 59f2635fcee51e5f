//! Member-directory synchronization helpers.
//!
//! Slot arrays are the source of truth; these helpers rewrite the
//! member-centric `assignments` view from them after slot mutation. Member
//! records are weak targets: a slot may reference an id with no directory
//! record, in which case there is nothing to rewrite.

use crate::activity::ActivityType;
use crate::ids::{MemberId, PartyId};
use crate::member::AssignmentRef;
use crate::snapshot::RosterSnapshot;

/// Clears `member_id` from every party of `activity` except `keep`,
/// returning the positions that were cleared. This is the enforcement point
/// for the one-slot-per-activity-type invariant.
pub(crate) fn sweep_other_parties(
    snapshot: &mut RosterSnapshot,
    member_id: &MemberId,
    activity: ActivityType,
    keep: &PartyId,
) -> Vec<(PartyId, usize)> {
    let mut cleared = Vec::new();
    for party in snapshot.parties.values_mut() {
        if party.activity != activity || party.id == *keep {
            continue;
        }
        if let Some(slot) = party.clear_member(member_id) {
            cleared.push((party.id.clone(), slot));
        }
    }
    cleared
}

/// Recomputes one member's back-reference for one activity type from the
/// authoritative slot arrays: sets it to the discovered position, or clears
/// it when the member occupies no slot.
pub(crate) fn rewrite_back_reference(
    snapshot: &mut RosterSnapshot,
    member_id: &MemberId,
    activity: ActivityType,
) {
    let position = snapshot.position_of(member_id, activity);
    let Some(member) = snapshot.members.get_mut(member_id) else {
        return;
    };
    match position {
        Some((party_id, slot)) => member.set_assignment(
            activity,
            AssignmentRef {
                party_id,
                is_leader: slot == 0,
            },
        ),
        None => {
            member.clear_assignment(activity);
        }
    }
}
