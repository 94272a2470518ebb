/*
    tokens.rs - Revocation bookkeeping

    Persistence half of token revocation; signing and verification live in
    core_auth. The list only grows.
*/

use crate::core_store::model::{next_id, RevokedToken};
use crate::core_store::store::errors::StoreResult;
use crate::core_store::store::file_store::Store;
use tracing::info;

impl Store {
    /// Record `token` as revoked at the current instant
    pub fn revoke(&self, token: &str) -> StoreResult<()> {
        self.mutate(|doc| {
            let key = next_id(doc.tokens.len());
            doc.tokens.insert(key, RevokedToken::now(token));

            info!(revoked = doc.tokens.len(), "Revoked token");
            Ok(())
        })
    }

    /// Whether `token` has ever been revoked (exact match)
    pub fn is_revoked(&self, token: &str) -> StoreResult<bool> {
        self.read(|doc| Ok(doc.tokens.values().any(|t| t.id == token)))
    }
}
