//! Group data type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::activity::ActivityType;
use crate::ids::{GroupId, PartyId};

/// Maximum number of parties a group may own.
pub const MAX_PARTIES_PER_GROUP: usize = 5;

/// A named collection of parties under one activity type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Stable group id.
    pub id: GroupId,

    /// Display name.
    pub name: String,

    /// The partition scheme this group belongs to.
    pub activity: ActivityType,

    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Owned parties, in insertion order. At most
    /// [`MAX_PARTIES_PER_GROUP`] entries.
    #[serde(default)]
    pub party_ids: Vec<PartyId>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Group {
    /// Whether the group is at its party cap.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.party_ids.len() >= MAX_PARTIES_PER_GROUP
    }

    pub(crate) fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Creation request for a group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewGroup {
    pub name: String,

    pub activity: ActivityType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Caller-supplied id; generated when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<GroupId>,
}

impl NewGroup {
    /// Bare request with just a name and activity type.
    #[must_use]
    pub fn named(name: impl Into<String>, activity: ActivityType) -> Self {
        Self {
            name: name.into(),
            activity,
            description: None,
            id: None,
        }
    }
}

/// Partial update to a group.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroupPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
