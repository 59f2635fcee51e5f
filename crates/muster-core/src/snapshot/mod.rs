//! The per-account roster snapshot.
//!
//! Every service operation loads a fresh [`RosterSnapshot`], mutates it
//! through the registries or the assignment engine, and persists it whole.
//! Nothing in this crate holds roster state across operations, so there is
//! no hidden shared cache between concurrent requests for different
//! accounts.

mod state;


pub use state::{InvariantViolation, RosterSnapshot};
