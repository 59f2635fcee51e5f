//! The public roster service.
//!
//! [`RosterService`] is the entry point a request layer calls after it has
//! authenticated the caller and checked per-resource permissions (neither
//! concern lives in this crate). Every mutation runs the same bracket:
//! acquire the account's guard, load the snapshot fresh from the store,
//! mutate it through the registries or the assignment engine, persist it
//! whole, release. The per-account guard serializes concurrent writers to
//! one account, so two racing mutations compose instead of overwriting one
//! another; operations on different accounts proceed in parallel.
//!
//! Reads load the last committed snapshot without taking the guard.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use thiserror::Error;
use tracing::{debug, info};

use crate::activity::ActivityType;
use crate::assignment::{
    self, AssignError, AssignOutcome, AssignRequest, SwapOutcome, SwapRequest,
};
use crate::bootstrap::{self, BootstrapError, BootstrapLayout, BootstrapReport};
use crate::group::{self, Group, GroupError, GroupPatch, NewGroup};
use crate::ids::{AccountId, GroupId, MemberId, PartyId};
use crate::member::{Member, MemberPatch, NewMember};
use crate::party::{self, NewParty, Party, PartyError, PartyPatch, PartyWithMembers};
use crate::snapshot::RosterSnapshot;
use crate::store::{RosterStore, StoreError};

/// Service-level error: the union of every failure an operation can
/// surface. Authorization failures are the request layer's concern and
/// never originate here.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RosterError {
    #[error(transparent)]
    Group(#[from] GroupError),

    #[error(transparent)]
    Party(#[from] PartyError),

    #[error(transparent)]
    Assign(#[from] AssignError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Bootstrap(#[from] BootstrapError),

    /// A member directory operation named an unknown member.
    #[error("member not found: {member_id}")]
    MemberNotFound {
        /// The member id that was not found.
        member_id: MemberId,
    },
}

/// Roster operations over a store, with per-account mutual exclusion.
#[derive(Debug)]
pub struct RosterService<S> {
    store: S,
    locks: Mutex<HashMap<AccountId, Arc<Mutex<()>>>>,
}

impl<S: RosterStore> RosterService<S> {
    /// Creates a service over a store backend.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self {
            store,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    fn account_guard(&self, account_id: &AccountId) -> Result<Arc<Mutex<()>>, RosterError> {
        let mut locks = self
            .locks
            .lock()
            .map_err(|_| StoreError::Backend("account lock map poisoned".to_string()))?;
        Ok(Arc::clone(
            locks.entry(account_id.clone()).or_default(),
        ))
    }

    /// Load → mutate → persist bracket under the account guard. The store
    /// is left untouched when the mutation fails.
    fn with_account<T>(
        &self,
        account_id: &AccountId,
        mutate: impl FnOnce(&mut RosterSnapshot) -> Result<T, RosterError>,
    ) -> Result<T, RosterError> {
        let guard = self.account_guard(account_id)?;
        let _held = guard
            .lock()
            .map_err(|_| StoreError::Backend("account guard poisoned".to_string()))?;
        let mut snapshot = self.store.load_snapshot(account_id)?;
        let result = mutate(&mut snapshot)?;
        self.store.save_snapshot(account_id, &snapshot)?;
        Ok(result)
    }

    fn read_snapshot(&self, account_id: &AccountId) -> Result<RosterSnapshot, RosterError> {
        Ok(self.store.load_snapshot(account_id)?)
    }

    // ---- groups ----

    /// Creates a group with an empty party list.
    ///
    /// # Errors
    ///
    /// Store failure.
    pub fn create_group(
        &self,
        account_id: &AccountId,
        spec: NewGroup,
    ) -> Result<Group, RosterError> {
        self.with_account(account_id, |snapshot| {
            let group_id = group::create(snapshot, spec);
            info!(account = %account_id, group = %group_id, "group created");
            lookup_group(snapshot, &group_id)
        })
    }

    /// Looks up a group.
    ///
    /// # Errors
    ///
    /// `Group(NotFound)` or store failure.
    pub fn get_group(
        &self,
        account_id: &AccountId,
        group_id: &GroupId,
    ) -> Result<Group, RosterError> {
        let snapshot = self.read_snapshot(account_id)?;
        lookup_group(&snapshot, group_id)
    }

    /// Lists groups, optionally restricted to one activity type, in
    /// creation order.
    ///
    /// # Errors
    ///
    /// Store failure.
    pub fn list_groups(
        &self,
        account_id: &AccountId,
        activity: Option<ActivityType>,
    ) -> Result<Vec<Group>, RosterError> {
        let snapshot = self.read_snapshot(account_id)?;
        Ok(group::list(&snapshot, activity)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Applies a patch to a group.
    ///
    /// # Errors
    ///
    /// `Group(NotFound)` or store failure.
    pub fn update_group(
        &self,
        account_id: &AccountId,
        group_id: &GroupId,
        patch: GroupPatch,
    ) -> Result<Group, RosterError> {
        self.with_account(account_id, |snapshot| {
            let group = group::update(snapshot, group_id, patch)?.clone();
            info!(account = %account_id, group = %group_id, "group updated");
            Ok(group)
        })
    }

    /// Deletes a group, cascading through its parties and their members'
    /// assignment entries.
    ///
    /// # Errors
    ///
    /// `Group(NotFound)` or store failure.
    pub fn delete_group(
        &self,
        account_id: &AccountId,
        group_id: &GroupId,
    ) -> Result<(), RosterError> {
        self.with_account(account_id, |snapshot| {
            group::delete(snapshot, group_id)?;
            info!(account = %account_id, group = %group_id, "group deleted");
            Ok(())
        })
    }

    // ---- parties ----

    /// Creates a party, optionally under a group and with initial
    /// occupancy.
    ///
    /// # Errors
    ///
    /// `Party(GroupNotFound | GroupFull | TooManySlots)` or store failure.
    pub fn create_party(
        &self,
        account_id: &AccountId,
        spec: NewParty,
    ) -> Result<Party, RosterError> {
        self.with_account(account_id, |snapshot| {
            let party_id = party::create(snapshot, spec)?;
            info!(account = %account_id, party = %party_id, "party created");
            lookup_party(snapshot, &party_id)
        })
    }

    /// Applies a patch to a party.
    ///
    /// # Errors
    ///
    /// `Party(NotFound | TooManySlots)` or store failure.
    pub fn update_party(
        &self,
        account_id: &AccountId,
        party_id: &PartyId,
        patch: PartyPatch,
    ) -> Result<Party, RosterError> {
        self.with_account(account_id, |snapshot| {
            party::update(snapshot, party_id, patch)?;
            info!(account = %account_id, party = %party_id, "party updated");
            lookup_party(snapshot, party_id)
        })
    }

    /// Deletes a party, clearing every held member's assignment entry.
    ///
    /// # Errors
    ///
    /// `Party(NotFound)` or store failure.
    pub fn delete_party(
        &self,
        account_id: &AccountId,
        party_id: &PartyId,
    ) -> Result<(), RosterError> {
        self.with_account(account_id, |snapshot| {
            party::delete(snapshot, party_id)?;
            info!(account = %account_id, party = %party_id, "party deleted");
            Ok(())
        })
    }

    /// Resolves a party and its occupied slots to full member records.
    ///
    /// # Errors
    ///
    /// `Party(NotFound)` or store failure.
    pub fn get_party_with_members(
        &self,
        account_id: &AccountId,
        party_id: &PartyId,
    ) -> Result<PartyWithMembers, RosterError> {
        let snapshot = self.read_snapshot(account_id)?;
        Ok(party::get_with_members(&snapshot, party_id)?)
    }

    // ---- members ----

    /// Registers a member in the directory.
    ///
    /// # Errors
    ///
    /// Store failure.
    pub fn register_member(
        &self,
        account_id: &AccountId,
        spec: NewMember,
    ) -> Result<Member, RosterError> {
        self.with_account(account_id, |snapshot| {
            let member = Member::new(spec);
            let member_id = member.id.clone();
            snapshot.members.insert(member_id.clone(), member.clone());
            info!(account = %account_id, member = %member_id, "member registered");
            Ok(member)
        })
    }

    /// Applies a patch to a member's identity fields.
    ///
    /// # Errors
    ///
    /// `MemberNotFound` or store failure.
    pub fn update_member(
        &self,
        account_id: &AccountId,
        member_id: &MemberId,
        patch: MemberPatch,
    ) -> Result<Member, RosterError> {
        self.with_account(account_id, |snapshot| {
            let member = snapshot
                .members
                .get_mut(member_id)
                .ok_or_else(|| RosterError::MemberNotFound {
                    member_id: member_id.clone(),
                })?;
            member.apply_patch(patch);
            let member = member.clone();
            info!(account = %account_id, member = %member_id, "member updated");
            Ok(member)
        })
    }

    /// Removes a member: clears its slots across both activity types, then
    /// deletes the directory record.
    ///
    /// # Errors
    ///
    /// `MemberNotFound` or store failure.
    pub fn remove_member(
        &self,
        account_id: &AccountId,
        member_id: &MemberId,
    ) -> Result<(), RosterError> {
        self.with_account(account_id, |snapshot| {
            if !snapshot.members.contains_key(member_id) {
                return Err(RosterError::MemberNotFound {
                    member_id: member_id.clone(),
                });
            }
            for activity in ActivityType::ALL {
                if let Some((party_id, _)) = snapshot.position_of(member_id, activity) {
                    if let Some(party) = snapshot.parties.get_mut(&party_id) {
                        party.clear_member(member_id);
                    }
                }
            }
            snapshot.members.remove(member_id);
            info!(account = %account_id, member = %member_id, "member removed");
            Ok(())
        })
    }

    /// Lists members in creation order.
    ///
    /// # Errors
    ///
    /// Store failure.
    pub fn list_members(&self, account_id: &AccountId) -> Result<Vec<Member>, RosterError> {
        let snapshot = self.read_snapshot(account_id)?;
        let (_, _, members) = snapshot.to_parts();
        Ok(members)
    }

    // ---- assignment engine ----

    /// Places a member into a party slot. See
    /// [`assignment::assign`](crate::assignment::assign) for the placement
    /// rules.
    ///
    /// # Errors
    ///
    /// `Assign(..)` or store failure.
    pub fn assign(
        &self,
        account_id: &AccountId,
        request: AssignRequest,
    ) -> Result<AssignOutcome, RosterError> {
        self.with_account(account_id, |snapshot| {
            let outcome = assignment::assign(snapshot, request)?;
            info!(
                account = %account_id,
                party = %outcome.party_id,
                slot = outcome.slot,
                leader = outcome.is_leader,
                displaced = ?outcome.displaced,
                "member assigned"
            );
            Ok(outcome)
        })
    }

    /// Removes a member from a party.
    ///
    /// # Errors
    ///
    /// `Assign(..)` or store failure.
    pub fn remove_assignment(
        &self,
        account_id: &AccountId,
        member_id: &MemberId,
        party_id: &PartyId,
        activity: ActivityType,
    ) -> Result<(), RosterError> {
        self.with_account(account_id, |snapshot| {
            assignment::remove(snapshot, member_id, party_id, activity)?;
            info!(account = %account_id, member = %member_id, party = %party_id, "member unassigned");
            Ok(())
        })
    }

    /// Exchanges two members' slots. The snapshot is loaded fresh under the
    /// account guard, so the positions checked are the committed ones.
    ///
    /// # Errors
    ///
    /// `Assign(MemberNotPlaced | PositionConflict)` or store failure.
    pub fn swap(
        &self,
        account_id: &AccountId,
        request: SwapRequest,
    ) -> Result<SwapOutcome, RosterError> {
        self.with_account(account_id, |snapshot| {
            let outcome = assignment::swap(snapshot, request)?;
            info!(
                account = %account_id,
                first = %outcome.first.member_id,
                second = %outcome.second.member_id,
                "members swapped"
            );
            Ok(outcome)
        })
    }

    /// Clears every placement of one activity type.
    ///
    /// # Errors
    ///
    /// Store failure.
    pub fn clear_all(
        &self,
        account_id: &AccountId,
        activity: ActivityType,
    ) -> Result<usize, RosterError> {
        self.with_account(account_id, |snapshot| {
            let cleared = assignment::clear_all(snapshot, activity);
            info!(account = %account_id, %activity, cleared, "activity cleared");
            Ok(cleared)
        })
    }

    // ---- bootstrap ----

    /// Seeds the default groups and parties for a fresh account.
    ///
    /// # Errors
    ///
    /// `Bootstrap(AlreadyBootstrapped | InvalidLayout)` or store failure.
    pub fn bootstrap_defaults(
        &self,
        account_id: &AccountId,
        layout: &BootstrapLayout,
    ) -> Result<BootstrapReport, RosterError> {
        self.with_account(account_id, |snapshot| {
            let report = bootstrap::bootstrap_defaults(snapshot, layout)?;
            info!(
                account = %account_id,
                groups = report.groups_created,
                parties = report.parties_created,
                "account bootstrapped"
            );
            Ok(report)
        })
    }
}

fn lookup_group(snapshot: &RosterSnapshot, group_id: &GroupId) -> Result<Group, RosterError> {
    group::get(snapshot, group_id)
        .cloned()
        .ok_or_else(|| {
            debug!(group = %group_id, "group lookup missed");
            GroupError::NotFound {
                group_id: group_id.clone(),
            }
            .into()
        })
}

fn lookup_party(snapshot: &RosterSnapshot, party_id: &PartyId) -> Result<Party, RosterError> {
    snapshot
        .parties
        .get(party_id)
        .cloned()
        .ok_or_else(|| {
            PartyError::NotFound {
                party_id: party_id.clone(),
            }
            .into()
        })
}
