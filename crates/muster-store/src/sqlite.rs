//! SQLite-backed roster store.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use muster_core::group::Group;
use muster_core::member::Member;
use muster_core::party::Party;
use muster_core::{AccountId, RosterStore, StoreError};

const KIND_GROUPS: &str = "groups";
const KIND_PARTIES: &str = "parties";
const KIND_MEMBERS: &str = "members";

/// Durable store keyed by `(account_id, kind)`, one JSON list per kind.
///
/// The connection is serialized behind a mutex; the engine's unit of work
/// is a handful of point reads and upserts, so contention is bounded by
/// the per-account guard held above this layer.
#[derive(Debug)]
pub struct SqliteRosterStore {
    conn: Mutex<Connection>,
}

impl SqliteRosterStore {
    /// Opens (creating if needed) a store at `path` and initializes the
    /// schema.
    ///
    /// # Errors
    ///
    /// Backend failure opening the database or applying the schema.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(backend)?;
        Self::with_connection(conn)
    }

    /// Opens an in-memory store, for tests and ephemeral use.
    ///
    /// # Errors
    ///
    /// Backend failure applying the schema.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(backend)?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(backend)?;
        conn.pragma_update(None, "synchronous", "NORMAL")
            .map_err(backend)?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS roster_blobs (
                 account_id TEXT NOT NULL,
                 kind       TEXT NOT NULL,
                 payload    TEXT NOT NULL,
                 PRIMARY KEY (account_id, kind)
             )",
            [],
        )
        .map_err(backend)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn load_kind<T: DeserializeOwned>(
        &self,
        account_id: &AccountId,
        kind: &str,
    ) -> Result<Vec<T>, StoreError> {
        let conn = self.lock()?;
        let payload: Option<String> = conn
            .query_row(
                "SELECT payload FROM roster_blobs WHERE account_id = ?1 AND kind = ?2",
                params![account_id.as_str(), kind],
                |row| row.get(0),
            )
            .optional()
            .map_err(backend)?;
        match payload {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Vec::new()),
        }
    }

    fn save_kind<T: Serialize>(
        &self,
        account_id: &AccountId,
        kind: &str,
        items: &[T],
    ) -> Result<(), StoreError> {
        let json = serde_json::to_string(items)?;
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO roster_blobs (account_id, kind, payload)
             VALUES (?1, ?2, ?3)
             ON CONFLICT (account_id, kind) DO UPDATE SET payload = excluded.payload",
            params![account_id.as_str(), kind, json],
        )
        .map_err(backend)?;
        debug!(account = %account_id, kind, bytes = json.len(), "roster kind saved");
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Backend("sqlite connection lock poisoned".to_string()))
    }
}

impl RosterStore for SqliteRosterStore {
    fn load_groups(&self, account_id: &AccountId) -> Result<Vec<Group>, StoreError> {
        self.load_kind(account_id, KIND_GROUPS)
    }

    fn save_groups(&self, account_id: &AccountId, groups: &[Group]) -> Result<(), StoreError> {
        self.save_kind(account_id, KIND_GROUPS, groups)
    }

    fn load_parties(&self, account_id: &AccountId) -> Result<Vec<Party>, StoreError> {
        self.load_kind(account_id, KIND_PARTIES)
    }

    fn save_parties(&self, account_id: &AccountId, parties: &[Party]) -> Result<(), StoreError> {
        self.save_kind(account_id, KIND_PARTIES, parties)
    }

    fn load_members(&self, account_id: &AccountId) -> Result<Vec<Member>, StoreError> {
        self.load_kind(account_id, KIND_MEMBERS)
    }

    fn save_members(&self, account_id: &AccountId, members: &[Member]) -> Result<(), StoreError> {
        self.save_kind(account_id, KIND_MEMBERS, members)
    }
}

fn backend(err: rusqlite::Error) -> StoreError {
    StoreError::Backend(err.to_string())
}
