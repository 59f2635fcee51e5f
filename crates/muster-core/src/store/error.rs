//! Store adapter error types.

use thiserror::Error;

/// Errors that can occur at the persistence boundary.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StoreError {
    /// The backend failed (I/O, database, poisoned lock).
    #[error("store backend failure: {0}")]
    Backend(String),

    /// A stored payload could not be (de)serialized.
    #[error("store serialization failure: {0}")]
    Serialize(#[from] serde_json::Error),
}
