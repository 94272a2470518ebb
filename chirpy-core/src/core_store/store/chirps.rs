/*
    chirps.rs - Chirp (post) operations on the store
*/

use crate::core_store::model::{next_id, Chirp, ChirpId, UserId};
use crate::core_store::store::errors::{StoreError, StoreResult};
use crate::core_store::store::file_store::{ascending, Store};
use tracing::{info, warn};

fn chirp_not_found(id: ChirpId) -> StoreError {
    StoreError::NotFound(format!("chirp {}", id))
}

impl Store {
    /// Store a chirp under the next identifier. The author is not checked
    /// against the user collection.
    pub fn create_chirp(&self, body: &str, author_id: UserId) -> StoreResult<Chirp> {
        self.mutate(|doc| {
            let id = ChirpId(next_id(doc.chirps.len()));
            let chirp = Chirp::new(id, author_id, body);
            if doc.chirps.insert(id, chirp.clone()).is_some() {
                warn!(chirp_id = %id, "Reassigned identifier replaced an existing chirp");
            }

            info!(chirp_id = %id, author_id = %author_id, "Created chirp");
            Ok(chirp)
        })
    }

    /// Delete a chirp on behalf of `requester`.
    ///
    /// A chirp owned by someone else is reported as `NotFound`, exactly like
    /// a chirp that does not exist.
    pub fn delete_chirp(&self, id: ChirpId, requester: UserId) -> StoreResult<()> {
        self.mutate(|doc| {
            match doc.chirps.get(&id) {
                Some(chirp) if chirp.author_id == requester => {}
                _ => return Err(chirp_not_found(id)),
            }
            doc.chirps.remove(&id);

            info!(chirp_id = %id, author_id = %requester, "Deleted chirp");
            Ok(())
        })
    }

    pub fn get_chirp(&self, id: ChirpId) -> StoreResult<Chirp> {
        self.read(|doc| doc.chirps.get(&id).cloned().ok_or_else(|| chirp_not_found(id)))
    }

    /// All chirps, or only those by `author`, ascending by id
    pub fn list_chirps(&self, author: Option<UserId>) -> StoreResult<Vec<Chirp>> {
        self.read(|doc| {
            let matching = doc
                .chirps
                .values()
                .filter(|c| author.map_or(true, |a| c.author_id == a))
                .cloned();
            Ok(ascending(matching, |c| c.id))
        })
    }
}
