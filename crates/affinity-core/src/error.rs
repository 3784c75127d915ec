use thiserror::Error;

use crate::EntityId;

/// Workspace-wide error types for affinity ratings.
#[derive(Debug, Error, PartialEq)]
pub enum AffinityError {
    /// Missing default value or invalid tuning parameters.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A cursor observed a structural change to its sequence.
    #[error("Concurrent modification: expected generation {expected}, found {found}")]
    ConcurrentMutation { expected: u64, found: u64 },

    /// No ledger is registered for the given entity id.
    #[error("Unknown entity: {0}")]
    UnknownEntity(EntityId),

    /// Malformed ledger or script input.
    #[error("Codec error: {0}")]
    Codec(String),

    /// Reading or writing a ledger or script file failed.
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for AffinityError {
    fn from(e: std::io::Error) -> Self {
        AffinityError::Io(e.to_string())
    }
}
