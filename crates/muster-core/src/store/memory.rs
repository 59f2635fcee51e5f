//! In-memory store backend.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::group::Group;
use crate::ids::AccountId;
use crate::member::Member;
use crate::party::Party;

use super::error::StoreError;
use super::RosterStore;

#[derive(Debug, Default, Clone)]
struct StoredAccount {
    groups: Vec<Group>,
    parties: Vec<Party>,
    members: Vec<Member>,
}

/// `HashMap`-backed store. The reference backend for tests and ephemeral
/// deployments; accounts with no stored data load as empty lists.
#[derive(Debug, Default)]
pub struct MemoryStore {
    accounts: Mutex<HashMap<AccountId, StoredAccount>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read<T>(
        &self,
        account_id: &AccountId,
        pick: impl FnOnce(&StoredAccount) -> Vec<T>,
    ) -> Result<Vec<T>, StoreError> {
        let accounts = self
            .accounts
            .lock()
            .map_err(|_| StoreError::Backend("memory store lock poisoned".to_string()))?;
        Ok(accounts.get(account_id).map(pick).unwrap_or_default())
    }

    fn write(
        &self,
        account_id: &AccountId,
        apply: impl FnOnce(&mut StoredAccount),
    ) -> Result<(), StoreError> {
        let mut accounts = self
            .accounts
            .lock()
            .map_err(|_| StoreError::Backend("memory store lock poisoned".to_string()))?;
        apply(accounts.entry(account_id.clone()).or_default());
        Ok(())
    }
}

impl RosterStore for MemoryStore {
    fn load_groups(&self, account_id: &AccountId) -> Result<Vec<Group>, StoreError> {
        self.read(account_id, |stored| stored.groups.clone())
    }

    fn save_groups(&self, account_id: &AccountId, groups: &[Group]) -> Result<(), StoreError> {
        self.write(account_id, |stored| stored.groups = groups.to_vec())
    }

    fn load_parties(&self, account_id: &AccountId) -> Result<Vec<Party>, StoreError> {
        self.read(account_id, |stored| stored.parties.clone())
    }

    fn save_parties(&self, account_id: &AccountId, parties: &[Party]) -> Result<(), StoreError> {
        self.write(account_id, |stored| stored.parties = parties.to_vec())
    }

    fn load_members(&self, account_id: &AccountId) -> Result<Vec<Member>, StoreError> {
        self.read(account_id, |stored| stored.members.clone())
    }

    fn save_members(&self, account_id: &AccountId, members: &[Member]) -> Result<(), StoreError> {
        self.write(account_id, |stored| stored.members = members.to_vec())
    }
}
