/*
    types.rs - Identifier types shared by the document collections

    Identifiers are plain positive integers scoped to their own collection.
    They serialize transparently so the on-disk maps are keyed "1", "2", ...
*/

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a user account
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

/// Identifier of a chirp (post)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChirpId(pub u64);

/// Bookkeeping key of a revocation entry. Never surfaced to callers.
pub type RevocationKey = u64;

impl UserId {
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl ChirpId {
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl From<u64> for UserId {
    fn from(id: u64) -> Self {
        UserId(id)
    }
}

impl From<u64> for ChirpId {
    fn from(id: u64) -> Self {
        ChirpId(id)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ChirpId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Next identifier for a collection currently holding `len` records.
///
/// This is `len + 1`, not a persistent counter: after a deletion the value
/// can coincide with an identifier that was handed out before.
pub fn next_id(len: usize) -> u64 {
    len as u64 + 1
}
