//! The assignment engine: slot placement, removal, swaps, and bulk clears.
//!
//! # Architecture
//!
//! ```text
//! assign  --> uniqueness sweep --> target slot --> overwrite? --> write slot
//! remove  --> clear slot
//! swap    --> discover positions --> conflict check --> exchange slots
//! clear   --> zero every slot of one activity type
//!                                                   |
//!                                                   v
//!                       rewrite member back-references (always last)
//! ```
//!
//! # Key concepts
//!
//! - **Uniqueness sweep**: before a placement, the member is cleared from
//!   every other party of the activity type, so no member ever occupies two
//!   slots within one scheme.
//! - **Overwrite**: assigning into an occupied slot displaces the previous
//!   occupant; the outcome reports who was displaced.
//! - **Derived leadership**: slot 0 is the leader slot; leader status is
//!   computed from final occupancy, never carried through a mutation.
//! - **Back-reference rewrite**: after every slot mutation the affected
//!   members' `assignments` entries are recomputed from the slot arrays
//!   within the same unit of work.

mod engine;
mod error;
pub(crate) mod sync;


pub use engine::{
    assign, clear_all, remove, swap, AssignOutcome, AssignRequest, DeclaredPosition, Placement,
    SwapOutcome, SwapRequest,
};
pub use error::AssignError;
