//! Group CRUD over the roster snapshot.

use chrono::Utc;

use crate::activity::ActivityType;
use crate::ids::GroupId;
use crate::party;
use crate::snapshot::RosterSnapshot;

use super::error::GroupError;
use super::state::{Group, GroupPatch, NewGroup};

/// Creates a group with an empty party list and returns its id.
pub fn create(snapshot: &mut RosterSnapshot, spec: NewGroup) -> GroupId {
    let now = Utc::now();
    let group = Group {
        id: spec.id.unwrap_or_else(GroupId::generate),
        name: spec.name,
        activity: spec.activity,
        description: spec.description,
        party_ids: Vec::new(),
        created_at: now,
        updated_at: now,
    };
    let id = group.id.clone();
    snapshot.groups.insert(id.clone(), group);
    id
}

/// Looks up a group by id.
#[must_use]
pub fn get<'a>(snapshot: &'a RosterSnapshot, group_id: &GroupId) -> Option<&'a Group> {
    snapshot.groups.get(group_id)
}

/// Lists groups, optionally restricted to one activity type, in creation
/// order.
#[must_use]
pub fn list(snapshot: &RosterSnapshot, activity: Option<ActivityType>) -> Vec<&Group> {
    let mut groups: Vec<&Group> = snapshot
        .groups
        .values()
        .filter(|g| activity.map_or(true, |a| g.activity == a))
        .collect();
    groups.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
    groups
}

/// Applies a patch to a group.
///
/// # Errors
///
/// `NotFound` when the id is unknown.
pub fn update<'a>(
    snapshot: &'a mut RosterSnapshot,
    group_id: &GroupId,
    patch: GroupPatch,
) -> Result<&'a Group, GroupError> {
    let group = snapshot
        .groups
        .get_mut(group_id)
        .ok_or_else(|| GroupError::NotFound {
            group_id: group_id.clone(),
        })?;
    if let Some(name) = patch.name {
        group.name = name;
    }
    if let Some(description) = patch.description {
        group.description = Some(description);
    }
    group.touch();
    Ok(&*group)
}

/// Deletes a group, cascading through its parties first: every contained
/// party is deleted via the party registry, which clears the displaced
/// members' assignment entries, and only then is the group removed.
///
/// # Errors
///
/// `NotFound` when the id is unknown.
pub fn delete(snapshot: &mut RosterSnapshot, group_id: &GroupId) -> Result<(), GroupError> {
    let party_ids = snapshot
        .groups
        .get(group_id)
        .ok_or_else(|| GroupError::NotFound {
            group_id: group_id.clone(),
        })?
        .party_ids
        .clone();

    for party_id in &party_ids {
        party::delete(snapshot, party_id)?;
    }
    snapshot.groups.remove(group_id);
    Ok(())
}
