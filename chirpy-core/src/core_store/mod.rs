/*
    core_store - Durable state for the chirp service

    Handles:
    - Data models (users, chirps, revoked tokens)
    - The single-file JSON document and its locking discipline
    - Record-level CRUD over the document
*/

pub mod model;
pub mod store;

#[cfg(test)]
pub mod tests;

// Re-export commonly used types
pub use model::{Chirp, ChirpId, Document, RevokedToken, UpgradeEvent, User, UserId, UserView};
pub use store::{Store, StoreError, StoreResult, StoreStats};
