//! Engine operations over the roster snapshot.

use serde::{Deserialize, Serialize};

use crate::activity::ActivityType;
use crate::ids::{MemberId, PartyId};
use crate::party::{LEADER_SLOT, SLOT_COUNT};
use crate::snapshot::RosterSnapshot;

use super::error::AssignError;
use super::sync;

/// Request to place a member into a party slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignRequest {
    pub member_id: MemberId,

    pub party_id: PartyId,

    pub activity: ActivityType,

    /// Explicit target slot. When absent, slot 0 is used for leader
    /// placements and otherwise the first empty non-leader slot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot: Option<usize>,

    /// Place into the leader slot when no explicit slot is given.
    #[serde(default)]
    pub as_leader: bool,
}

/// Result of a completed placement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignOutcome {
    /// The party written to.
    pub party_id: PartyId,

    /// The slot the member now occupies.
    pub slot: usize,

    /// Whether the member now leads the party (slot 0).
    pub is_leader: bool,

    /// The previous occupant of the slot, when the placement overwrote one.
    /// Overwrites are successful outcomes, not errors; this field is how
    /// callers learn about the displacement.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub displaced: Option<MemberId>,
}

/// Places a member into a party slot.
///
/// The member is first cleared from every other party of the activity type,
/// so a completed assign never leaves a duplicate placement. Assigning into
/// an occupied slot displaces the previous occupant (reported in the
/// outcome). Back-references of every touched member are rewritten before
/// returning.
///
/// # Errors
///
/// - `MemberNotFound` / `PartyNotFound` for unknown ids.
/// - `ActivityMismatch` when the party belongs to a different scheme.
/// - `SlotOutOfRange` for an explicit slot index ≥ the slot count.
/// - `PartyFull` when no explicit slot is given, the placement is not a
///   leader placement, and no empty non-leader slot remains.
pub fn assign(
    snapshot: &mut RosterSnapshot,
    request: AssignRequest,
) -> Result<AssignOutcome, AssignError> {
    let AssignRequest {
        member_id,
        party_id,
        activity,
        slot,
        as_leader,
    } = request;

    let party = snapshot
        .parties
        .get(&party_id)
        .ok_or_else(|| AssignError::PartyNotFound {
            party_id: party_id.clone(),
        })?;
    if party.activity != activity {
        return Err(AssignError::ActivityMismatch {
            party_id: party_id.clone(),
            party_activity: party.activity,
            requested: activity,
        });
    }
    if !snapshot.members.contains_key(&member_id) {
        return Err(AssignError::MemberNotFound { member_id });
    }

    sync::sweep_other_parties(snapshot, &member_id, activity, &party_id);

    let Some(party) = snapshot.parties.get_mut(&party_id) else {
        return Err(AssignError::PartyNotFound { party_id });
    };
    let target = match slot {
        Some(index) if index >= SLOT_COUNT => {
            return Err(AssignError::SlotOutOfRange {
                slot: index,
                limit: SLOT_COUNT,
            });
        }
        Some(index) => index,
        None if as_leader => LEADER_SLOT,
        None => party
            .first_open_slot()
            .ok_or_else(|| AssignError::PartyFull {
                party_id: party_id.clone(),
            })?,
    };

    // Re-seating within the same party: vacate the old slot first.
    if let Some(current) = party.slot_of(&member_id) {
        if current != target {
            party.clear_slot(current);
        }
    }
    let displaced = party.set_slot(target, member_id.clone());

    sync::rewrite_back_reference(snapshot, &member_id, activity);
    if let Some(displaced_id) = &displaced {
        sync::rewrite_back_reference(snapshot, displaced_id, activity);
    }

    Ok(AssignOutcome {
        party_id,
        slot: target,
        is_leader: target == LEADER_SLOT,
        displaced,
    })
}

/// Removes a member from a party, clearing its slot and assignment entry.
///
/// # Errors
///
/// - `PartyNotFound` for an unknown party id.
/// - `ActivityMismatch` when the party belongs to a different scheme.
/// - `MemberNotInParty` when the member holds no slot in the party.
pub fn remove(
    snapshot: &mut RosterSnapshot,
    member_id: &MemberId,
    party_id: &PartyId,
    activity: ActivityType,
) -> Result<(), AssignError> {
    let party = snapshot
        .parties
        .get_mut(party_id)
        .ok_or_else(|| AssignError::PartyNotFound {
            party_id: party_id.clone(),
        })?;
    if party.activity != activity {
        return Err(AssignError::ActivityMismatch {
            party_id: party_id.clone(),
            party_activity: party.activity,
            requested: activity,
        });
    }
    if party.clear_member(member_id).is_none() {
        return Err(AssignError::MemberNotInParty {
            member_id: member_id.clone(),
            party_id: party_id.clone(),
        });
    }

    sync::rewrite_back_reference(snapshot, member_id, activity);
    Ok(())
}

/// A member's position as declared by the caller of a swap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclaredPosition {
    pub member_id: MemberId,
    pub party_id: PartyId,
    pub slot: usize,
}

/// Request to exchange two members' slots within one activity type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapRequest {
    pub first: DeclaredPosition,
    pub second: DeclaredPosition,
    pub activity: ActivityType,
}

/// A member's position after a completed mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub member_id: MemberId,
    pub party_id: PartyId,
    pub slot: usize,
    pub is_leader: bool,
}

/// Result of a completed swap.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapOutcome {
    /// Final position of the first member.
    pub first: Placement,

    /// Final position of the second member.
    pub second: Placement,
}

/// Exchanges two members' slots. Applying the same swap twice returns both
/// members to their original positions.
///
/// Each member's actual position is discovered by scanning the slot arrays;
/// a declared position that disagrees with the discovered one fails loudly
/// instead of being silently corrected, since it means the caller acted on
/// a stale view. Leadership is derived from final slot-0 occupancy, never
/// carried across the exchange.
///
/// # Errors
///
/// - `MemberNotPlaced` when a member is in no party of the activity type.
/// - `PositionConflict` when a declared position is stale.
pub fn swap(
    snapshot: &mut RosterSnapshot,
    request: SwapRequest,
) -> Result<SwapOutcome, AssignError> {
    let SwapRequest {
        first,
        second,
        activity,
    } = request;

    let actual_first = discover(snapshot, &first, activity)?;
    let actual_second = discover(snapshot, &second, activity)?;

    let (first_party, first_slot) = actual_first;
    let (second_party, second_slot) = actual_second;

    write_slot(snapshot, &first_party, first_slot, second.member_id.clone())?;
    write_slot(snapshot, &second_party, second_slot, first.member_id.clone())?;

    sync::rewrite_back_reference(snapshot, &first.member_id, activity);
    sync::rewrite_back_reference(snapshot, &second.member_id, activity);

    Ok(SwapOutcome {
        first: Placement {
            member_id: first.member_id,
            party_id: second_party.clone(),
            slot: second_slot,
            is_leader: second_slot == LEADER_SLOT,
        },
        second: Placement {
            member_id: second.member_id,
            party_id: first_party,
            slot: first_slot,
            is_leader: first_slot == LEADER_SLOT,
        },
    })
}

/// Zeroes every slot of every party of one activity type and drops the
/// matching assignment entry from every member. Returns the number of
/// cleared placements.
pub fn clear_all(snapshot: &mut RosterSnapshot, activity: ActivityType) -> usize {
    let mut cleared = 0;
    for party in snapshot.parties.values_mut() {
        if party.activity != activity {
            continue;
        }
        let mut changed = false;
        for slot in &mut party.slots {
            if slot.take().is_some() {
                cleared += 1;
                changed = true;
            }
        }
        if changed {
            party.touch();
        }
    }

    // Full directory sweep, so even a stale entry with no backing slot is
    // dropped.
    for member in snapshot.members.values_mut() {
        member.clear_assignment(activity);
    }

    cleared
}

fn discover(
    snapshot: &RosterSnapshot,
    declared: &DeclaredPosition,
    activity: ActivityType,
) -> Result<(PartyId, usize), AssignError> {
    let (party_id, slot) = snapshot
        .position_of(&declared.member_id, activity)
        .ok_or_else(|| AssignError::MemberNotPlaced {
            member_id: declared.member_id.clone(),
            activity,
        })?;
    if party_id != declared.party_id || slot != declared.slot {
        return Err(AssignError::PositionConflict {
            member_id: declared.member_id.clone(),
            declared_party: declared.party_id.clone(),
            declared_slot: declared.slot,
            actual_party: party_id,
            actual_slot: slot,
        });
    }
    Ok((party_id, slot))
}

fn write_slot(
    snapshot: &mut RosterSnapshot,
    party_id: &PartyId,
    slot: usize,
    member_id: MemberId,
) -> Result<(), AssignError> {
    let party = snapshot
        .parties
        .get_mut(party_id)
        .ok_or_else(|| AssignError::PartyNotFound {
            party_id: party_id.clone(),
        })?;
    party.slots[slot] = Some(member_id);
    party.touch();
    Ok(())
}
