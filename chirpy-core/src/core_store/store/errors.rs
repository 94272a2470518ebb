/*
    errors.rs - Error types for the store subsystem

    I/O and codec failures are fatal to the operation that hit them.
    NotFound, Conflict and AuthFailed are ordinary outcomes the caller maps
    to its own responses. None of them leave a partial write behind.
*/

use thiserror::Error;

/// Errors that can occur in the store subsystem
#[derive(Debug, Error)]
pub enum StoreError {
    /// Backing file could not be created, read or written
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Backing file holds malformed content
    #[error("Deserialization error: {0}")]
    Decode(#[source] serde_json::Error),

    /// In-memory document could not be serialized
    #[error("Serialization error: {0}")]
    Encode(#[source] serde_json::Error),

    /// Referenced record is absent
    #[error("Not found: {0}")]
    NotFound(String),

    /// Duplicate key on creation
    #[error("Conflict: {0}")]
    Conflict(String),

    /// No user matches the supplied credentials
    #[error("Authentication failed")]
    AuthFailed,

    /// A thread panicked while holding the document lock
    #[error("Lock poisoned: a thread panicked while holding the lock")]
    LockPoisoned,
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}
