//! The persistence port.
//!
//! The engine treats storage as a pure load/save boundary with no business
//! rules: per account, one list of groups, one of parties, one of members.
//! [`MemoryStore`] is the in-process reference backend used by tests;
//! durable backends implement [`RosterStore`] in sibling crates.

mod error;
mod memory;

#[cfg(test)]
mod tests;

pub use error::StoreError;
pub use memory::MemoryStore;

use crate::group::Group;
use crate::ids::AccountId;
use crate::member::Member;
use crate::party::Party;
use crate::snapshot::RosterSnapshot;

/// Load/save adapter for one account's roster.
///
/// Implementations persist whole lists per kind; there is no per-entity
/// update surface, matching the engine's snapshot-in, snapshot-out unit of
/// work. An account with no stored data loads as empty lists.
pub trait RosterStore: Send + Sync {
    /// Loads all groups of an account.
    ///
    /// # Errors
    ///
    /// Backend or deserialization failure.
    fn load_groups(&self, account_id: &AccountId) -> Result<Vec<Group>, StoreError>;

    /// Replaces all groups of an account.
    ///
    /// # Errors
    ///
    /// Backend or serialization failure.
    fn save_groups(&self, account_id: &AccountId, groups: &[Group]) -> Result<(), StoreError>;

    /// Loads all parties of an account.
    ///
    /// # Errors
    ///
    /// Backend or deserialization failure.
    fn load_parties(&self, account_id: &AccountId) -> Result<Vec<Party>, StoreError>;

    /// Replaces all parties of an account.
    ///
    /// # Errors
    ///
    /// Backend or serialization failure.
    fn save_parties(&self, account_id: &AccountId, parties: &[Party]) -> Result<(), StoreError>;

    /// Loads all members of an account.
    ///
    /// # Errors
    ///
    /// Backend or deserialization failure.
    fn load_members(&self, account_id: &AccountId) -> Result<Vec<Member>, StoreError>;

    /// Replaces all members of an account.
    ///
    /// # Errors
    ///
    /// Backend or serialization failure.
    fn save_members(&self, account_id: &AccountId, members: &[Member]) -> Result<(), StoreError>;

    /// Loads the complete account snapshot.
    ///
    /// # Errors
    ///
    /// Backend or deserialization failure.
    fn load_snapshot(&self, account_id: &AccountId) -> Result<RosterSnapshot, StoreError> {
        Ok(RosterSnapshot::from_parts(
            self.load_groups(account_id)?,
            self.load_parties(account_id)?,
            self.load_members(account_id)?,
        ))
    }

    /// Persists the complete account snapshot.
    ///
    /// # Errors
    ///
    /// Backend or serialization failure. A failure between kind writes can
    /// leave the kinds from different units of work; the service surfaces
    /// the error unchanged and performs no compensating rollback.
    fn save_snapshot(
        &self,
        account_id: &AccountId,
        snapshot: &RosterSnapshot,
    ) -> Result<(), StoreError> {
        let (groups, parties, members) = snapshot.to_parts();
        self.save_groups(account_id, &groups)?;
        self.save_parties(account_id, &parties)?;
        self.save_members(account_id, &members)
    }
}
