//! Named collections of parties and their registry.
//!
//! A group owns up to [`MAX_PARTIES_PER_GROUP`] parties of one activity
//! type. Ownership is real: deleting a group deletes its parties first,
//! which in turn clears the displaced members' assignment entries.

mod error;
mod registry;
mod state;


pub use error::GroupError;
pub use registry::{create, delete, get, list, update};
pub use state::{Group, GroupPatch, NewGroup, MAX_PARTIES_PER_GROUP};
