/*
    persistence_tests.rs - Durability and identifier tests for the store

    Every scenario reopens the backing file through a fresh Store to make
    sure nothing is served from memory.
*/

use crate::core_store::model::{ChirpId, Document, UserId};
use crate::core_store::store::{Store, StoreError};
use std::fs;
use tempfile::tempdir;

#[test]
fn test_identifiers_follow_creation_order() {
    let dir = tempdir().unwrap();
    let store = Store::open(dir.path().join("database.json")).unwrap();

    let users: Vec<u64> = (0..6)
        .map(|n| store.create_user(&format!("u{}@x.com", n), "pw").unwrap().id.0)
        .collect();
    let chirps: Vec<u64> = (0..6)
        .map(|_| store.create_chirp("body", UserId(1)).unwrap().id.0)
        .collect();

    assert_eq!(users, vec![1, 2, 3, 4, 5, 6]);
    assert_eq!(chirps, vec![1, 2, 3, 4, 5, 6]);
}

/// Identifiers are size + 1, so a freed number comes back.
#[test]
fn test_identifier_reuse_after_delete() {
    let dir = tempdir().unwrap();
    let store = Store::open(dir.path().join("database.json")).unwrap();

    let author = store.create_user("a@b.com", "pw").unwrap().id;
    let first = store.create_chirp("one", author).unwrap();
    let second = store.create_chirp("two", author).unwrap();
    assert_eq!(second.id, ChirpId(2));

    store.delete_chirp(second.id, author).unwrap();
    let count = store.list_chirps(None).unwrap().len() as u64;
    let replacement = store.create_chirp("three", author).unwrap();

    assert_eq!(replacement.id, ChirpId(count + 1));
    assert_eq!(replacement.id, second.id);
    assert_ne!(replacement.id, first.id);
}

#[test]
fn test_state_survives_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("database.json");

    let (user, chirp) = {
        let store = Store::open(&path).unwrap();
        let user = store.create_user("a@b.com", "pw").unwrap();
        store.upgrade_user(user.id).unwrap();
        let chirp = store.create_chirp("persisted", user.id).unwrap();
        store.revoke("old-refresh").unwrap();
        (user, chirp)
    };

    let store = Store::open(&path).unwrap();
    let reloaded = store.get_user(user.id).unwrap();
    assert_eq!(reloaded.email, "a@b.com");
    assert!(reloaded.is_chirpy_red);
    assert_eq!(store.get_chirp(chirp.id).unwrap(), chirp);
    assert!(store.is_revoked("old-refresh").unwrap());
}

#[test]
fn test_reads_existing_file_written_elsewhere() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("database.json");
    fs::write(
        &path,
        r#"{
            "chirps": {"1": {"author_id": 2, "body": "hi", "id": 1}},
            "users": {"2": {"email": "b@c.com", "password": "pw", "is_chirpy_red": true, "id": 2}},
            "tokens": {"1": {"id": "tok", "revokeTime": "2024-05-01 10:00:00 +0000 UTC"}}
        }"#,
    )
    .unwrap();

    let store = Store::open(&path).unwrap();
    assert_eq!(store.get_chirp(ChirpId(1)).unwrap().author_id, UserId(2));
    assert!(store.get_user(UserId(2)).unwrap().is_chirpy_red);
    assert!(store.is_revoked("tok").unwrap());
    assert_eq!(store.login("b@c.com", "pw").unwrap().id, UserId(2));
}

#[test]
fn test_corrupt_file_fails_reads_and_writes_without_clobbering() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("database.json");
    fs::write(&path, b"[1, 2").unwrap();

    let store = Store::open(&path).unwrap();
    assert!(matches!(store.list_users(), Err(StoreError::Decode(_))));
    assert!(matches!(store.create_chirp("x", UserId(1)), Err(StoreError::Decode(_))));
    assert_eq!(fs::read(&path).unwrap(), b"[1, 2");
}

#[test]
fn test_rejected_operations_leave_file_unchanged() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("database.json");
    let store = Store::open(&path).unwrap();
    store.create_user("a@b.com", "pw").unwrap();
    store.create_chirp("keep", UserId(1)).unwrap();
    let before = fs::read(&path).unwrap();

    assert!(store.create_user("a@b.com", "pw").is_err());
    assert!(store.update_user(UserId(5), "x@y.com", "pw").is_err());
    assert!(store.delete_chirp(ChirpId(1), UserId(2)).is_err());
    assert!(store.upgrade_user(UserId(5)).is_err());

    assert_eq!(fs::read(&path).unwrap(), before);
}

#[test]
fn test_full_document_round_trip_through_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("database.json");
    let store = Store::open(&path).unwrap();
    store.create_user("a@b.com", "pw").unwrap();
    store.create_chirp("x", UserId(1)).unwrap();
    store.revoke("t").unwrap();

    let snapshot: Document = store.load().unwrap();
    store.persist(&snapshot).unwrap();

    let other = Store::open(&path).unwrap();
    assert_eq!(other.load().unwrap(), snapshot);
}
