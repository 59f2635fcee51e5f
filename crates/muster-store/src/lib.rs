//! Durable [`RosterStore`](muster_core::RosterStore) backend on SQLite.
//!
//! Persists each account's roster as three serialized lists (groups,
//! parties, members) in one keyed blob table, matching the store port's
//! whole-list unit of work. WAL mode keeps writes restart-safe for the
//! single-process deployments this serves.

mod sqlite;


pub use sqlite::SqliteRosterStore;
