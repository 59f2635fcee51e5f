//! Party data type and slot-array primitives.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::activity::ActivityType;
use crate::ids::{GroupId, MemberId, PartyId};

use super::error::PartyError;

/// Number of slots in every party. The slot array is fixed-length at the
/// type level; no operation can change its size.
pub const SLOT_COUNT: usize = 5;

/// Index of the leader slot.
pub const LEADER_SLOT: usize = 0;

/// A fixed five-slot roster scoped to one activity type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    /// Stable party id.
    pub id: PartyId,

    /// Display name.
    pub name: String,

    /// The partition scheme this party belongs to.
    pub activity: ActivityType,

    /// Owning group, when the party is linked to one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<GroupId>,

    /// Member occupancy by slot index. Slot 0 is the leader slot.
    pub slots: [Option<MemberId>; SLOT_COUNT],

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Party {
    /// The party leader, derived from slot-0 occupancy.
    #[must_use]
    pub fn leader(&self) -> Option<&MemberId> {
        self.slots[LEADER_SLOT].as_ref()
    }

    /// The slot index currently holding `member_id`, if any.
    #[must_use]
    pub fn slot_of(&self, member_id: &MemberId) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| slot.as_ref() == Some(member_id))
    }

    /// First empty non-leader slot, if one remains.
    #[must_use]
    pub fn first_open_slot(&self) -> Option<usize> {
        self.slots
            .iter()
            .enumerate()
            .skip(1)
            .find(|(_, slot)| slot.is_none())
            .map(|(index, _)| index)
    }

    /// Occupied slots as `(index, member)` pairs.
    pub fn occupied(&self) -> impl Iterator<Item = (usize, &MemberId)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|member| (index, member)))
    }

    /// Number of occupied slots.
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Clears whichever slot holds `member_id`, returning its index.
    pub fn clear_member(&mut self, member_id: &MemberId) -> Option<usize> {
        let index = self.slot_of(member_id)?;
        self.slots[index] = None;
        self.touch();
        Some(index)
    }

    /// Empties a slot, returning the previous occupant.
    pub fn clear_slot(&mut self, index: usize) -> Option<MemberId> {
        let previous = self.slots[index].take();
        if previous.is_some() {
            self.touch();
        }
        previous
    }

    /// Writes a member into a slot, returning the displaced occupant when
    /// the slot was held by a different member.
    pub fn set_slot(&mut self, index: usize, member_id: MemberId) -> Option<MemberId> {
        let displaced = self.slots[index].take().filter(|prev| *prev != member_id);
        self.slots[index] = Some(member_id);
        self.touch();
        displaced
    }

    pub(crate) fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Creation request for a party.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewParty {
    pub name: String,

    pub activity: ActivityType,

    /// Owning group; the registry enforces the per-group party cap.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<GroupId>,

    /// Initial occupancy, at most [`SLOT_COUNT`] entries; shorter vectors
    /// are padded with empties. Occupied entries are treated as placements.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slots: Option<Vec<Option<MemberId>>>,

    /// Caller-supplied id; generated when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<PartyId>,
}

impl NewParty {
    /// Bare request with just a name and activity type.
    #[must_use]
    pub fn named(name: impl Into<String>, activity: ActivityType) -> Self {
        Self {
            name: name.into(),
            activity,
            group_id: None,
            slots: None,
            id: None,
        }
    }
}

/// Partial update to a party.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PartyPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Replacement occupancy; same length rule and placement semantics as
    /// on create.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slots: Option<Vec<Option<MemberId>>>,
}

/// Validates a supplied slot vector against the fixed slot count, padding
/// short vectors with empties.
///
/// # Errors
///
/// `TooManySlots` when more than [`SLOT_COUNT`] entries are supplied.
pub fn validate_slots(
    supplied: Vec<Option<MemberId>>,
) -> Result<[Option<MemberId>; SLOT_COUNT], PartyError> {
    if supplied.len() > SLOT_COUNT {
        return Err(PartyError::TooManySlots {
            provided: supplied.len(),
            limit: SLOT_COUNT,
        });
    }
    let mut slots: [Option<MemberId>; SLOT_COUNT] = Default::default();
    for (index, entry) in supplied.into_iter().enumerate() {
        slots[index] = entry;
    }
    Ok(slots)
}
