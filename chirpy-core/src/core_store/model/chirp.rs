/*
    chirp.rs - Posts ("chirps")

    Immutable once created; the only lifecycle step after creation is
    deletion by the author.
*/

use super::types::{ChirpId, UserId};
use serde::{Deserialize, Serialize};

/// Stored chirp record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chirp {
    /// Author reference. Not checked against the user collection.
    pub author_id: UserId,
    pub body: String,
    pub id: ChirpId,
}

impl Chirp {
    pub fn new(id: ChirpId, author_id: UserId, body: impl Into<String>) -> Self {
        Chirp {
            author_id,
            body: body.into(),
            id,
        }
    }
}
