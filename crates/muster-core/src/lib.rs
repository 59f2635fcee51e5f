//! Guild roster management core: registries, the assignment engine, and the
//! member-directory synchronization contract.
//!
//! # Overview
//!
//! A guild ("account") organizes its members into fixed five-slot rosters
//! ("parties"), grouped under named collections of at most five parties
//! ("groups"), independently for each [`ActivityType`]. This crate owns the
//! rules of that arrangement:
//!
//! - [`group`] and [`party`] — CRUD registries over the per-account
//!   [`RosterSnapshot`], including cascade semantics on delete.
//! - [`assignment`] — the engine that places, removes, and swaps members
//!   across slots while holding the roster invariants.
//! - [`member`] — member identity and the per-activity back-reference that
//!   mirrors slot occupancy.
//! - [`store`] — the persistence port (`RosterStore`) plus an in-memory
//!   backend; durable backends live in sibling crates.
//! - [`service`] — the public entry point: per-account mutual exclusion
//!   around a load / mutate / persist bracket.
//!
//! # Invariants
//!
//! After every completed mutation:
//!
//! - Every party has exactly [`party::SLOT_COUNT`] slots (structural).
//! - A member occupies at most one slot across all parties of one activity
//!   type.
//! - Party leadership is derived from slot-0 occupancy; there is no stored
//!   leader field to drift.
//! - `Member::assignments` mirrors slot occupancy exactly; slot arrays are
//!   the source of truth and back-references are rewritten after every slot
//!   mutation.

pub mod activity;
pub mod assignment;
pub mod bootstrap;
pub mod group;
pub mod ids;
pub mod member;
pub mod party;
pub mod service;
pub mod snapshot;
pub mod store;

pub use activity::ActivityType;
pub use assignment::{
    AssignOutcome, AssignRequest, DeclaredPosition, Placement, SwapOutcome, SwapRequest,
};
pub use ids::{AccountId, GroupId, MemberId, PartyId};
pub use service::{RosterError, RosterService};
pub use snapshot::RosterSnapshot;
pub use store::{MemoryStore, RosterStore, StoreError};
