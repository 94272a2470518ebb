/*
    file_store.rs - Whole-document JSON store

    The backing file holds the entire document. Every operation reads the
    full file; every mutation rewrites it in full. A single reader/writer
    lock scoped to the document serializes writers against each other and
    against readers:

    - readers hold the shared lock for one `read_document`
    - writers hold the exclusive lock across read -> mutate -> write, so two
      concurrent creates can never be handed the same identifier

    Writes go to a sibling temp file which is then renamed over the backing
    file, so a failed write never leaves a truncated document behind.
*/

use crate::core_store::model::{Document, UserId};
use crate::core_store::store::errors::{StoreError, StoreResult};
use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use tracing::{debug, error, info};

/// Contents written when the backing file does not exist yet
const EMPTY_DOCUMENT: &[u8] = b"{}";

/// Helper to convert poison errors into StoreError
fn handle_poison<T>(_err: PoisonError<T>) -> StoreError {
    StoreError::LockPoisoned
}

/// File-backed document store.
///
/// Construct once with [`Store::open`] and share by handle
/// (`Arc<Store>`) between callers; the lock lives inside the value.
#[derive(Debug)]
pub struct Store {
    path: PathBuf,
    lock: RwLock<()>,
}

/// Collection sizes at a point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    pub users_count: usize,
    pub chirps_count: usize,
    pub revoked_tokens_count: usize,
}

impl Store {
    /// Open the store at `path`, creating an empty document if needed
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let store = Store {
            path: path.into(),
            lock: RwLock::new(()),
        };
        store.ensure()?;
        Ok(store)
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the backing file with an empty document if it is missing.
    ///
    /// Idempotent: an existing file is left untouched.
    pub fn ensure(&self) -> StoreResult<()> {
        let _guard = self.lock.write().map_err(handle_poison)?;

        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
        {
            Ok(mut file) => {
                file.write_all(EMPTY_DOCUMENT)?;
                file.sync_all()?;
                info!(path = %self.path.display(), "Created empty database file");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(()),
            Err(e) => {
                error!(path = %self.path.display(), error = %e, "Failed to create database file");
                Err(e.into())
            }
        }
    }

    /// Read the full document under the shared lock
    pub fn load(&self) -> StoreResult<Document> {
        let _guard = self.lock.read().map_err(handle_poison)?;
        self.read_document()
    }

    /// Replace the full document under the exclusive lock
    pub fn persist(&self, document: &Document) -> StoreResult<()> {
        let _guard = self.lock.write().map_err(handle_poison)?;
        self.write_document(document)
    }

    /// Collection sizes
    pub fn stats(&self) -> StoreResult<StoreStats> {
        self.read(|doc| {
            Ok(StoreStats {
                users_count: doc.users.len(),
                chirps_count: doc.chirps.len(),
                revoked_tokens_count: doc.tokens.len(),
            })
        })
    }

    /// Run a read-only query against a consistent snapshot
    pub(crate) fn read<T>(&self, query: impl FnOnce(&Document) -> StoreResult<T>) -> StoreResult<T> {
        let _guard = self.lock.read().map_err(handle_poison)?;
        let document = self.read_document()?;
        query(&document)
    }

    /// Run a load -> mutate -> persist cycle as one exclusive section.
    ///
    /// If `change` fails nothing is written.
    pub(crate) fn mutate<T>(
        &self,
        change: impl FnOnce(&mut Document) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let _guard = self.lock.write().map_err(handle_poison)?;
        let mut document = self.read_document()?;
        let out = change(&mut document)?;
        self.write_document(&document)?;
        Ok(out)
    }

    /// Caller must hold the lock (either mode)
    fn read_document(&self) -> StoreResult<Document> {
        let data = fs::read(&self.path).map_err(|e| {
            error!(path = %self.path.display(), error = %e, "Failed to read database file");
            StoreError::Io(e)
        })?;
        let document: Document = serde_json::from_slice(&data).map_err(StoreError::Decode)?;

        debug!(
            bytes = data.len(),
            users = document.users.len(),
            chirps = document.chirps.len(),
            tokens = document.tokens.len(),
            "Loaded document"
        );
        Ok(document)
    }

    /// Caller must hold the exclusive lock
    fn write_document(&self, document: &Document) -> StoreResult<()> {
        let data = serde_json::to_vec(document).map_err(StoreError::Encode)?;

        let temp_path = self.temp_path();
        let result = fs::write(&temp_path, &data).and_then(|_| fs::rename(&temp_path, &self.path));
        if let Err(e) = result {
            error!(path = %self.path.display(), error = %e, "Failed to write database file");
            let _ = fs::remove_file(&temp_path);
            return Err(StoreError::Io(e));
        }

        debug!(bytes = data.len(), "Persisted document");
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

/// Collect `items` ordered by ascending `key`. Map iteration order is
/// unspecified, so every listing goes through here.
pub(crate) fn ascending<T, K: Ord>(items: impl Iterator<Item = T>, key: impl FnMut(&T) -> K) -> Vec<T> {
    let mut out: Vec<T> = items.collect();
    out.sort_by_key(key);
    out
}

/// `NotFound` for a user id
pub(crate) fn user_not_found(id: UserId) -> StoreError {
    StoreError::NotFound(format!("user {}", id))
}
