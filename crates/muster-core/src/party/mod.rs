//! Fixed five-slot party rosters and their registry.
//!
//! A party is a fixed array of [`SLOT_COUNT`] member slots scoped to one
//! activity type. Slot 0 is the leader slot; leadership is derived from its
//! occupancy and never stored separately. Registry operations run over the
//! per-account [`RosterSnapshot`](crate::RosterSnapshot) and keep member
//! back-references synchronized on every slot change.

mod error;
mod registry;
mod state;

#[cfg(test)]
mod tests;

pub use error::PartyError;
pub use registry::{create, delete, get_with_members, update, PartyWithMembers, ResolvedSlot};
pub use state::{validate_slots, NewParty, Party, PartyPatch, LEADER_SLOT, SLOT_COUNT};
