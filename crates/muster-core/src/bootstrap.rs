//! One-time default roster seeding.
//!
//! A fresh account historically starts with 40 parties spread across the
//! two activity partitions. With the five-parties-per-group cap that is
//! four groups of five parties per activity type; the counts are
//! configurable through [`BootstrapLayout`], which also parses from TOML
//! for deployments that override the defaults.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::activity::ActivityType;
use crate::group::{self, NewGroup, MAX_PARTIES_PER_GROUP};
use crate::party::{self, NewParty, PartyError};
use crate::snapshot::RosterSnapshot;

/// Shape of the default roster created for a fresh account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BootstrapLayout {
    /// Groups created per activity type.
    #[serde(default = "default_groups_per_activity")]
    pub groups_per_activity: usize,

    /// Parties created per group. Capped by the per-group party limit.
    #[serde(default = "default_parties_per_group")]
    pub parties_per_group: usize,
}

const fn default_groups_per_activity() -> usize {
    4
}

const fn default_parties_per_group() -> usize {
    MAX_PARTIES_PER_GROUP
}

impl Default for BootstrapLayout {
    fn default() -> Self {
        Self {
            groups_per_activity: default_groups_per_activity(),
            parties_per_group: default_parties_per_group(),
        }
    }
}

impl BootstrapLayout {
    /// Parses a layout from a TOML string and validates it.
    ///
    /// # Errors
    ///
    /// Parse failure or an invalid layout.
    pub fn from_toml(content: &str) -> Result<Self, BootstrapError> {
        let layout: Self = toml::from_str(content)?;
        layout.validate()?;
        Ok(layout)
    }

    /// Validates the counts.
    ///
    /// # Errors
    ///
    /// `InvalidLayout` when a count is zero or exceeds the per-group cap.
    pub fn validate(&self) -> Result<(), BootstrapError> {
        if self.groups_per_activity == 0 || self.parties_per_group == 0 {
            return Err(BootstrapError::InvalidLayout {
                reason: "counts must be at least 1".to_string(),
            });
        }
        if self.parties_per_group > MAX_PARTIES_PER_GROUP {
            return Err(BootstrapError::InvalidLayout {
                reason: format!(
                    "parties_per_group {} exceeds the per-group cap {MAX_PARTIES_PER_GROUP}",
                    self.parties_per_group
                ),
            });
        }
        Ok(())
    }
}

/// What a completed bootstrap created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootstrapReport {
    pub groups_created: usize,
    pub parties_created: usize,
}

/// Errors that can occur during bootstrap.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BootstrapError {
    /// The account already has groups; bootstrap is one-time only.
    #[error("account already bootstrapped ({existing_groups} groups present)")]
    AlreadyBootstrapped {
        /// Number of groups already present.
        existing_groups: usize,
    },

    /// The layout counts are unusable.
    #[error("invalid bootstrap layout: {reason}")]
    InvalidLayout {
        /// Why the layout was rejected.
        reason: String,
    },

    /// The layout TOML could not be parsed.
    #[error("bootstrap layout parse failure: {0}")]
    Parse(#[from] toml::de::Error),

    /// Party creation failed while seeding.
    #[error("bootstrap party creation failed: {0}")]
    Party(#[from] PartyError),
}

/// Seeds the default groups and parties into an empty snapshot.
///
/// # Errors
///
/// - `AlreadyBootstrapped` when the account already has any group.
/// - `InvalidLayout` for unusable counts.
pub fn bootstrap_defaults(
    snapshot: &mut RosterSnapshot,
    layout: &BootstrapLayout,
) -> Result<BootstrapReport, BootstrapError> {
    layout.validate()?;
    if !snapshot.groups.is_empty() {
        return Err(BootstrapError::AlreadyBootstrapped {
            existing_groups: snapshot.groups.len(),
        });
    }

    let mut report = BootstrapReport {
        groups_created: 0,
        parties_created: 0,
    };
    for activity in ActivityType::ALL {
        for group_index in 1..=layout.groups_per_activity {
            let group_id = group::create(
                snapshot,
                NewGroup::named(format!("{activity} group {group_index}"), activity),
            );
            report.groups_created += 1;

            for party_index in 1..=layout.parties_per_group {
                let mut spec = NewParty::named(
                    format!("{activity} party {group_index}-{party_index}"),
                    activity,
                );
                spec.group_id = Some(group_id.clone());
                party::create(snapshot, spec)?;
                report.parties_created += 1;
            }
        }
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::{bootstrap_defaults, BootstrapError, BootstrapLayout};
    use crate::snapshot::RosterSnapshot;

    #[test]
    fn default_layout_seeds_forty_parties() {
        let mut snapshot = RosterSnapshot::new();
        let report = bootstrap_defaults(&mut snapshot, &BootstrapLayout::default())
            .expect("bootstrap empty account");
        assert_eq!(report.groups_created, 8);
        assert_eq!(report.parties_created, 40);
        assert_eq!(snapshot.parties.len(), 40);
        snapshot.verify_invariants().expect("invariants hold");
    }

    #[test]
    fn bootstrap_is_one_time() {
        let mut snapshot = RosterSnapshot::new();
        bootstrap_defaults(&mut snapshot, &BootstrapLayout::default()).expect("first run");
        let err = bootstrap_defaults(&mut snapshot, &BootstrapLayout::default())
            .expect_err("second run must refuse");
        assert!(matches!(
            err,
            BootstrapError::AlreadyBootstrapped { existing_groups: 8 }
        ));
    }

    #[test]
    fn layout_rejects_over_cap() {
        let err = BootstrapLayout {
            groups_per_activity: 1,
            parties_per_group: 6,
        }
        .validate()
        .expect_err("over cap");
        assert!(matches!(err, BootstrapError::InvalidLayout { .. }));
    }

    #[test]
    fn layout_parses_from_toml_with_defaults() {
        let layout = BootstrapLayout::from_toml("groups_per_activity = 2\n").expect("parse");
        assert_eq!(layout.groups_per_activity, 2);
        assert_eq!(layout.parties_per_group, 5);
    }
}
