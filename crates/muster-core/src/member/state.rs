//! Member record and assignment back-reference types.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::activity::ActivityType;
use crate::ids::{MemberId, PartyId};

/// A member's placement within one activity scheme.
///
/// Always derived from the authoritative slot arrays: `party_id` names the
/// single party of that activity type holding the member, and `is_leader` is
/// true iff the member occupies the party's leader slot (slot 0).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentRef {
    /// The party holding this member.
    pub party_id: PartyId,

    /// Whether the member occupies the leader slot.
    pub is_leader: bool,
}

/// A guild member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Stable member id.
    pub id: MemberId,

    /// Display name.
    pub name: String,

    /// In-game level, when known (ingestion may not capture it).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,

    /// Free-form operator note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,

    /// Current placement per activity type. At most one entry per type.
    #[serde(default)]
    pub assignments: BTreeMap<ActivityType, AssignmentRef>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Member {
    /// Creates a member record from a registration request.
    #[must_use]
    pub fn new(spec: NewMember) -> Self {
        let now = Utc::now();
        Self {
            id: spec.id.unwrap_or_else(MemberId::generate),
            name: spec.name,
            level: spec.level,
            note: spec.note,
            assignments: BTreeMap::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns the member's placement for an activity type, if any.
    #[must_use]
    pub fn assignment(&self, activity: ActivityType) -> Option<&AssignmentRef> {
        self.assignments.get(&activity)
    }

    /// Rewrites the placement back-reference for an activity type.
    pub fn set_assignment(&mut self, activity: ActivityType, assignment: AssignmentRef) {
        self.assignments.insert(activity, assignment);
        self.updated_at = Utc::now();
    }

    /// Drops the placement back-reference for an activity type, returning
    /// the previous value when one existed.
    pub fn clear_assignment(&mut self, activity: ActivityType) -> Option<AssignmentRef> {
        let previous = self.assignments.remove(&activity);
        if previous.is_some() {
            self.updated_at = Utc::now();
        }
        previous
    }

    /// Applies a directory patch to the identity fields. Assignments are
    /// owned by the engine and never patched here.
    pub fn apply_patch(&mut self, patch: MemberPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(level) = patch.level {
            self.level = Some(level);
        }
        if let Some(note) = patch.note {
            self.note = Some(note);
        }
        self.updated_at = Utc::now();
    }
}

/// Registration request for a new member.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewMember {
    /// Display name.
    pub name: String,

    /// Caller-supplied id; generated when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<MemberId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Partial update to a member's identity fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemberPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}
