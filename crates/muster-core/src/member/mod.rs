//! Member identity and the per-activity assignment back-reference.
//!
//! The member directory is the member-centric view of the roster: each
//! member carries an `assignments` map mirroring which party slot it holds
//! per [`ActivityType`](crate::ActivityType). Slot arrays are authoritative;
//! the assignment engine rewrites these back-references after every slot
//! mutation so the two views never diverge under independent reads.

mod state;

#[cfg(test)]
mod tests;

pub use state::{AssignmentRef, Member, MemberPatch, NewMember};
