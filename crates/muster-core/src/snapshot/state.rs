//! Snapshot state and lookup helpers.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::activity::ActivityType;
use crate::group::{Group, MAX_PARTIES_PER_GROUP};
use crate::ids::{GroupId, MemberId, PartyId};
use crate::member::Member;
use crate::party::Party;

/// The complete in-memory roster of one account: groups, parties, and
/// members, loaded fresh at operation start and persisted whole at
/// operation end.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RosterSnapshot {
    /// Groups by id.
    pub groups: BTreeMap<GroupId, Group>,

    /// Parties by id.
    pub parties: BTreeMap<PartyId, Party>,

    /// Members by id.
    pub members: BTreeMap<MemberId, Member>,
}

impl RosterSnapshot {
    /// Creates an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a snapshot from the store's flat lists.
    #[must_use]
    pub fn from_parts(groups: Vec<Group>, parties: Vec<Party>, members: Vec<Member>) -> Self {
        Self {
            groups: groups.into_iter().map(|g| (g.id.clone(), g)).collect(),
            parties: parties.into_iter().map(|p| (p.id.clone(), p)).collect(),
            members: members.into_iter().map(|m| (m.id.clone(), m)).collect(),
        }
    }

    /// Flattens the snapshot back into the store's list layout, ordered by
    /// creation time for stable output.
    #[must_use]
    pub fn to_parts(&self) -> (Vec<Group>, Vec<Party>, Vec<Member>) {
        let mut groups: Vec<Group> = self.groups.values().cloned().collect();
        let mut parties: Vec<Party> = self.parties.values().cloned().collect();
        let mut members: Vec<Member> = self.members.values().cloned().collect();
        groups.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        parties.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        members.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        (groups, parties, members)
    }

    /// Parties of one activity type, in creation order.
    #[must_use]
    pub fn parties_of(&self, activity: ActivityType) -> Vec<&Party> {
        let mut parties: Vec<&Party> = self
            .parties
            .values()
            .filter(|p| p.activity == activity)
            .collect();
        parties.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        parties
    }

    /// Ids of all parties of one activity type.
    #[must_use]
    pub fn party_ids_of(&self, activity: ActivityType) -> Vec<PartyId> {
        self.parties_of(activity)
            .into_iter()
            .map(|p| p.id.clone())
            .collect()
    }

    /// The party and slot currently holding a member within one activity
    /// type, discovered by scanning the authoritative slot arrays.
    #[must_use]
    pub fn position_of(&self, member_id: &MemberId, activity: ActivityType) -> Option<(PartyId, usize)> {
        self.parties
            .values()
            .filter(|p| p.activity == activity)
            .find_map(|p| p.slot_of(member_id).map(|slot| (p.id.clone(), slot)))
    }

    /// Verifies the roster invariants. Used by tests and debug assertions;
    /// production mutations are written to preserve these by construction.
    ///
    /// # Errors
    ///
    /// The first violation found, if any.
    pub fn verify_invariants(&self) -> Result<(), InvariantViolation> {
        for group in self.groups.values() {
            if group.party_ids.len() > MAX_PARTIES_PER_GROUP {
                return Err(InvariantViolation::GroupOverCapacity {
                    group_id: group.id.clone(),
                    count: group.party_ids.len(),
                });
            }
            for party_id in &group.party_ids {
                match self.parties.get(party_id) {
                    None => {
                        return Err(InvariantViolation::DanglingPartyRef {
                            group_id: group.id.clone(),
                            party_id: party_id.clone(),
                        });
                    }
                    Some(party) if party.group_id.as_ref() != Some(&group.id) => {
                        return Err(InvariantViolation::GroupLinkMismatch {
                            group_id: group.id.clone(),
                            party_id: party_id.clone(),
                        });
                    }
                    Some(_) => {}
                }
            }
        }

        for activity in ActivityType::ALL {
            let mut seen: HashSet<&MemberId> = HashSet::new();
            for party in self.parties.values().filter(|p| p.activity == activity) {
                for (_, member_id) in party.occupied() {
                    if !seen.insert(member_id) {
                        return Err(InvariantViolation::DuplicatePlacement {
                            member_id: member_id.clone(),
                            activity,
                        });
                    }
                }
            }
        }

        for member in self.members.values() {
            for activity in ActivityType::ALL {
                let placed = self.position_of(&member.id, activity);
                match (member.assignment(activity), placed) {
                    (None, None) => {}
                    (Some(_), None) => {
                        return Err(InvariantViolation::BackReferenceWithoutSlot {
                            member_id: member.id.clone(),
                            activity,
                        });
                    }
                    (None, Some(_)) => {
                        return Err(InvariantViolation::SlotWithoutBackReference {
                            member_id: member.id.clone(),
                            activity,
                        });
                    }
                    (Some(assignment), Some((party_id, slot))) => {
                        if assignment.party_id != party_id
                            || assignment.is_leader != (slot == 0)
                        {
                            return Err(InvariantViolation::BackReferenceMismatch {
                                member_id: member.id.clone(),
                                activity,
                            });
                        }
                    }
                }
            }
        }

        Ok(())
    }
}

/// A broken roster invariant, as reported by
/// [`RosterSnapshot::verify_invariants`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum InvariantViolation {
    /// A group owns more parties than the cap allows.
    #[error("group {group_id} owns {count} parties")]
    GroupOverCapacity {
        /// The offending group.
        group_id: GroupId,
        /// Number of owned parties.
        count: usize,
    },

    /// A group references a party that does not exist.
    #[error("group {group_id} references missing party {party_id}")]
    DanglingPartyRef {
        /// The referencing group.
        group_id: GroupId,
        /// The missing party.
        party_id: PartyId,
    },

    /// A party does not point back at the group that owns it.
    #[error("party {party_id} does not link back to group {group_id}")]
    GroupLinkMismatch {
        /// The owning group.
        group_id: GroupId,
        /// The mislinked party.
        party_id: PartyId,
    },

    /// A member occupies more than one slot within one activity type.
    #[error("member {member_id} occupies multiple {activity} slots")]
    DuplicatePlacement {
        /// The duplicated member.
        member_id: MemberId,
        /// The activity type scanned.
        activity: ActivityType,
    },

    /// A member carries an assignment entry but occupies no slot.
    #[error("member {member_id} has a {activity} assignment but no slot")]
    BackReferenceWithoutSlot {
        /// The inconsistent member.
        member_id: MemberId,
        /// The activity type scanned.
        activity: ActivityType,
    },

    /// A member occupies a slot but carries no assignment entry.
    #[error("member {member_id} occupies a {activity} slot but has no assignment")]
    SlotWithoutBackReference {
        /// The inconsistent member.
        member_id: MemberId,
        /// The activity type scanned.
        activity: ActivityType,
    },

    /// A member's assignment entry disagrees with its discovered position.
    #[error("member {member_id} has a stale {activity} assignment")]
    BackReferenceMismatch {
        /// The inconsistent member.
        member_id: MemberId,
        /// The activity type scanned.
        activity: ActivityType,
    },
}
