//! Party CRUD over the roster snapshot.
//!
//! Create and update accept optional slot vectors; occupied entries are
//! treated as placements and run the same uniqueness sweep and
//! back-reference rewrite as the assignment engine, so a bulk import can
//! never leave a member in two parties of one activity type.

use chrono::Utc;
use serde::Serialize;

use crate::assignment::sync;
use crate::ids::{MemberId, PartyId};
use crate::member::Member;
use crate::snapshot::RosterSnapshot;

use super::error::PartyError;
use super::state::{validate_slots, NewParty, Party, PartyPatch, SLOT_COUNT};

/// Creates a party and returns its id.
///
/// # Errors
///
/// - `GroupNotFound` when `group_id` names an unknown group.
/// - `GroupFull` when the owning group already holds its party cap.
/// - `TooManySlots` when a supplied slot vector exceeds the slot count.
pub fn create(snapshot: &mut RosterSnapshot, spec: NewParty) -> Result<PartyId, PartyError> {
    let slots = dedupe(validate_slots(spec.slots.unwrap_or_default())?);

    if let Some(group_id) = &spec.group_id {
        let group = snapshot
            .groups
            .get(group_id)
            .ok_or_else(|| PartyError::GroupNotFound {
                group_id: group_id.clone(),
            })?;
        if group.is_full() {
            return Err(PartyError::GroupFull {
                group_id: group_id.clone(),
                limit: crate::group::MAX_PARTIES_PER_GROUP,
            });
        }
    }

    let now = Utc::now();
    let party = Party {
        id: spec.id.unwrap_or_else(PartyId::generate),
        name: spec.name,
        activity: spec.activity,
        group_id: spec.group_id.clone(),
        slots,
        created_at: now,
        updated_at: now,
    };
    let party_id = party.id.clone();
    let activity = party.activity;
    let placed: Vec<MemberId> = party.occupied().map(|(_, m)| m.clone()).collect();

    snapshot.parties.insert(party_id.clone(), party);
    if let Some(group_id) = &spec.group_id {
        if let Some(group) = snapshot.groups.get_mut(group_id) {
            group.party_ids.push(party_id.clone());
            group.touch();
        }
    }

    for member_id in &placed {
        sync::sweep_other_parties(snapshot, member_id, activity, &party_id);
        sync::rewrite_back_reference(snapshot, member_id, activity);
    }

    Ok(party_id)
}

/// Applies a patch to a party. A supplied slot vector replaces the
/// occupancy wholesale with placement semantics; members dropped by the
/// replacement get their assignment entries cleared.
///
/// # Errors
///
/// - `NotFound` when the id is unknown.
/// - `TooManySlots` when the slot vector exceeds the slot count.
pub fn update(
    snapshot: &mut RosterSnapshot,
    party_id: &PartyId,
    patch: PartyPatch,
) -> Result<(), PartyError> {
    let replacement = match patch.slots {
        Some(supplied) => Some(dedupe(validate_slots(supplied)?)),
        None => None,
    };

    let party = snapshot
        .parties
        .get_mut(party_id)
        .ok_or_else(|| PartyError::NotFound {
            party_id: party_id.clone(),
        })?;
    if let Some(name) = patch.name {
        party.name = name;
        party.touch();
    }

    let activity = party.activity;
    let mut old_occupants: Vec<MemberId> = Vec::new();
    let mut new_occupants: Vec<MemberId> = Vec::new();
    if let Some(slots) = replacement {
        old_occupants = party.occupied().map(|(_, m)| m.clone()).collect();
        party.slots = slots;
        party.touch();
        new_occupants = party.occupied().map(|(_, m)| m.clone()).collect();
    }

    for member_id in &new_occupants {
        sync::sweep_other_parties(snapshot, member_id, activity, party_id);
    }
    let mut touched = old_occupants;
    touched.extend(new_occupants);
    touched.sort();
    touched.dedup();
    for member_id in &touched {
        sync::rewrite_back_reference(snapshot, member_id, activity);
    }

    Ok(())
}

/// Deletes a party: unlinks it from its owning group and clears the
/// assignment entry of every member it held.
///
/// # Errors
///
/// `NotFound` when the id is unknown.
pub fn delete(snapshot: &mut RosterSnapshot, party_id: &PartyId) -> Result<(), PartyError> {
    let party = snapshot
        .parties
        .remove(party_id)
        .ok_or_else(|| PartyError::NotFound {
            party_id: party_id.clone(),
        })?;

    if let Some(group_id) = &party.group_id {
        if let Some(group) = snapshot.groups.get_mut(group_id) {
            group.party_ids.retain(|id| id != party_id);
            group.touch();
        }
    }

    for (_, member_id) in party.occupied() {
        if let Some(member) = snapshot.members.get_mut(member_id) {
            member.clear_assignment(party.activity);
        }
    }

    Ok(())
}

/// A party with its occupied slots and leader resolved to full member
/// records.
#[derive(Debug, Clone, Serialize)]
pub struct PartyWithMembers {
    /// The party itself.
    pub party: Party,

    /// Resolved record per slot; `None` for empty slots and for member ids
    /// with no directory record (slot references are weak).
    pub members: [Option<Member>; SLOT_COUNT],

    /// Resolved leader record, derived from slot-0 occupancy.
    pub leader: Option<Member>,
}

/// A single resolved slot, for callers that prefer a flat listing.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedSlot {
    /// Slot index within the party.
    pub index: usize,

    /// The occupying member's id.
    pub member_id: MemberId,

    /// The directory record, when one exists.
    pub member: Option<Member>,
}

impl PartyWithMembers {
    /// Occupied slots in index order.
    #[must_use]
    pub fn resolved_slots(&self) -> Vec<ResolvedSlot> {
        self.party
            .occupied()
            .map(|(index, member_id)| ResolvedSlot {
                index,
                member_id: member_id.clone(),
                member: self.members[index].clone(),
            })
            .collect()
    }
}

/// Resolves a party and its members.
///
/// # Errors
///
/// `NotFound` when the id is unknown.
pub fn get_with_members(
    snapshot: &RosterSnapshot,
    party_id: &PartyId,
) -> Result<PartyWithMembers, PartyError> {
    let party = snapshot
        .parties
        .get(party_id)
        .ok_or_else(|| PartyError::NotFound {
            party_id: party_id.clone(),
        })?
        .clone();

    let mut members: [Option<Member>; SLOT_COUNT] = Default::default();
    for (index, member_id) in party.occupied() {
        members[index] = snapshot.members.get(member_id).cloned();
    }
    let leader = party
        .leader()
        .and_then(|id| snapshot.members.get(id).cloned());

    Ok(PartyWithMembers {
        party,
        members,
        leader,
    })
}

/// Drops duplicate member ids from a slot array, keeping the lowest index.
fn dedupe(mut slots: [Option<MemberId>; SLOT_COUNT]) -> [Option<MemberId>; SLOT_COUNT] {
    for i in 0..SLOT_COUNT {
        let Some(current) = slots[i].clone() else {
            continue;
        };
        for slot in slots.iter_mut().skip(i + 1) {
            if slot.as_ref() == Some(&current) {
                *slot = None;
            }
        }
    }
    slots
}
