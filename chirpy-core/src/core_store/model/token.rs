/*
    token.rs - Revocation entries

    The raw token string doubles as the record id. Entries are only ever
    appended.
*/

use chrono::Utc;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevokedToken {
    /// The revoked token, verbatim
    pub id: String,

    /// Revocation instant (RFC 3339)
    #[serde(rename = "revokeTime")]
    pub revoke_time: String,
}

impl RevokedToken {
    /// Revocation of `token` stamped with the current instant
    pub fn now(token: impl Into<String>) -> Self {
        RevokedToken {
            id: token.into(),
            revoke_time: Utc::now().to_rfc3339(),
        }
    }
}
