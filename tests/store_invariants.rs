//! Post Store Invariant Tests
//!
//! - Identifiers are unique and assigned as max + 1
//! - created_at is immutable, updated_at never moves backwards
//! - Missing identifiers never cause a write
//! - Concurrent mutations never lose updates

use std::collections::HashSet;
use std::fs;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use chrono::Utc;
use postfile::store::{FilePostStore, NewPost, Post, PostStore, Snapshot, StoreErrorCode};
use tempfile::TempDir;

// =============================================================================
// Test Utilities
// =============================================================================

fn open_store() -> (TempDir, FilePostStore) {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let store = FilePostStore::open(temp.path()).expect("Failed to open store");
    (temp, store)
}

fn post_with_id(id: u64) -> Post {
    let now = Utc::now();
    Post {
        id,
        created_at: now,
        updated_at: now,
        deleted_at: None,
        title: format!("post {}", id),
        body: "body".to_string(),
    }
}

fn ids(store: &FilePostStore) -> Vec<u64> {
    store.get_all().unwrap().iter().map(|p| p.id).collect()
}

// =============================================================================
// Identifier assignment
// =============================================================================

#[test]
fn test_empty_store_assigns_one_then_two() {
    let (_temp, store) = open_store();

    let first = store.create(NewPost::new("A", "B")).unwrap();
    assert_eq!(first.id, 1);
    assert_eq!(first.created_at, first.updated_at);

    let second = store.create(NewPost::new("A", "B")).unwrap();
    assert_eq!(second.id, 2);
}

#[test]
fn test_sequential_ids_strictly_increase() {
    let (_temp, store) = open_store();

    let mut last = 0;
    for i in 0..20 {
        let post = store.create(NewPost::new(format!("t{}", i), "b")).unwrap();
        assert!(post.id > last, "id {} not greater than {}", post.id, last);
        last = post.id;
    }

    let unique: HashSet<u64> = ids(&store).into_iter().collect();
    assert_eq!(unique.len(), 20);
}

#[test]
fn test_gap_is_not_reused() {
    let (_temp, store) = open_store();
    store.save(&Snapshot::new(vec![post_with_id(1), post_with_id(3)])).unwrap();

    let created = store.create(NewPost::new("new", "post")).unwrap();
    assert_eq!(created.id, 4);
    assert_eq!(ids(&store), vec![1, 3, 4]);
}

#[test]
fn test_deleting_max_then_creating() {
    let (_temp, store) = open_store();
    for _ in 0..3 {
        store.create(NewPost::new("t", "b")).unwrap();
    }
    store.delete(2).unwrap();

    let created = store.create(NewPost::new("t", "b")).unwrap();
    assert_eq!(created.id, 4);
}

#[test]
fn test_exhausted_id_space_rejects_create() {
    let (_temp, store) = open_store();
    store.save(&Snapshot::new(vec![post_with_id(u64::MAX)])).unwrap();
    let before = fs::read(store.path()).unwrap();

    let err = store.create(NewPost::new("t", "b")).unwrap_err();
    assert_eq!(err.code(), StoreErrorCode::WriteFailed);
    assert_eq!(fs::read(store.path()).unwrap(), before);
}

// =============================================================================
// Round-trip and idempotent reads
// =============================================================================

#[test]
fn test_save_then_load_round_trip() {
    let (_temp, store) = open_store();
    let mut soft_deleted = post_with_id(5);
    soft_deleted.deleted_at = Some(Utc::now());
    let snapshot = Snapshot::new(vec![post_with_id(2), soft_deleted, post_with_id(1)]);

    store.save(&snapshot).unwrap();

    assert_eq!(store.load().unwrap(), snapshot);
}

#[test]
fn test_repeated_reads_are_identical() {
    let (_temp, store) = open_store();
    store.create(NewPost::new("A", "B")).unwrap();
    store.create(NewPost::new("C", "D")).unwrap();

    assert_eq!(store.get_all().unwrap(), store.get_all().unwrap());
    assert_eq!(store.get_by_id(2).unwrap(), store.get_by_id(2).unwrap());
}

#[test]
fn test_reopen_sees_persisted_posts() {
    let temp = TempDir::new().unwrap();
    let created = {
        let store = FilePostStore::open(temp.path()).unwrap();
        store.create(NewPost::new("durable", "post")).unwrap()
    };

    let reopened = FilePostStore::open(temp.path()).unwrap();
    assert_eq!(reopened.get_by_id(created.id).unwrap(), created);
}

// =============================================================================
// Update and delete
// =============================================================================

#[test]
fn test_update_preserves_created_and_advances_updated() {
    let (_temp, store) = open_store();
    let original = store.create(NewPost::new("A", "B")).unwrap();
    let neighbour = store.create(NewPost::new("C", "D")).unwrap();

    thread::sleep(Duration::from_millis(5));

    let mut changed = original.clone();
    changed.title = "A2".to_string();
    let updated = store.update(changed).unwrap();

    assert_eq!(updated.created_at, original.created_at);
    assert!(updated.updated_at > original.updated_at);
    assert!(updated.created_at <= updated.updated_at);

    let stored = store.get_by_id(original.id).unwrap();
    assert_eq!(stored, updated);
    assert_eq!(store.get_by_id(neighbour.id).unwrap(), neighbour);
    assert_eq!(ids(&store), vec![1, 2]);
}

#[test]
fn test_update_ignores_caller_timestamps() {
    let (_temp, store) = open_store();
    let original = store.create(NewPost::new("A", "B")).unwrap();

    let mut forged = original.clone();
    forged.created_at = original.created_at + chrono::Duration::days(30);
    forged.updated_at = original.created_at - chrono::Duration::days(30);

    let updated = store.update(forged).unwrap();
    assert_eq!(updated.created_at, original.created_at);
    assert!(updated.updated_at >= original.updated_at);
}

#[test]
fn test_update_missing_returns_not_found_without_write() {
    let (_temp, store) = open_store();
    store.create(NewPost::new("A", "B")).unwrap();
    let before = fs::read(store.path()).unwrap();

    let err = store.update(post_with_id(42)).unwrap_err();

    assert_eq!(err.code(), StoreErrorCode::NotFound);
    assert_eq!(fs::read(store.path()).unwrap(), before);
}

#[test]
fn test_delete_preserves_order_of_remaining() {
    let (_temp, store) = open_store();
    for _ in 0..3 {
        store.create(NewPost::new("t", "b")).unwrap();
    }

    store.delete(1).unwrap();
    assert_eq!(ids(&store), vec![2, 3]);
}

#[test]
fn test_delete_missing_leaves_file_untouched() {
    let (_temp, store) = open_store();
    store.create(NewPost::new("A", "B")).unwrap();
    let before = fs::read(store.path()).unwrap();

    let err = store.delete(99).unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(fs::read(store.path()).unwrap(), before);
}

#[test]
fn test_get_by_id_missing() {
    let (_temp, store) = open_store();
    let err = store.get_by_id(99).unwrap_err();
    assert_eq!(err.code(), StoreErrorCode::NotFound);
    assert_eq!(err.status_code(), 404);
}

// =============================================================================
// Corruption
// =============================================================================

#[test]
fn test_corrupt_file_is_reported_not_repaired() {
    let (_temp, store) = open_store();
    fs::write(store.path(), "{\"posts\": [").unwrap();

    let err = store.get_all().unwrap_err();
    assert_eq!(err.code(), StoreErrorCode::ParseFailed);

    let err = store.create(NewPost::new("A", "B")).unwrap_err();
    assert_eq!(err.code(), StoreErrorCode::ParseFailed);
    assert_eq!(fs::read_to_string(store.path()).unwrap(), "{\"posts\": [");
}

#[test]
fn test_missing_file_after_open_is_read_error() {
    let (_temp, store) = open_store();
    fs::remove_file(store.path()).unwrap();

    let err = store.get_all().unwrap_err();
    assert_eq!(err.code(), StoreErrorCode::ReadFailed);
}

// =============================================================================
// Concurrency
// =============================================================================

#[test]
fn test_concurrent_creates_never_duplicate_ids() {
    let (_temp, store) = open_store();
    let store = Arc::new(store);

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                (0..10)
                    .map(|i| {
                        store
                            .create(NewPost::new(format!("t{}-{}", t, i), "body"))
                            .unwrap()
                            .id
                    })
                    .collect::<Vec<u64>>()
            })
        })
        .collect();

    let mut assigned = Vec::new();
    for handle in handles {
        assigned.extend(handle.join().unwrap());
    }

    let unique: HashSet<u64> = assigned.iter().copied().collect();
    assert_eq!(unique.len(), 80, "duplicate identifiers assigned");

    let mut persisted = ids(&store);
    assert_eq!(persisted.len(), 80, "lost update detected");
    persisted.sort_unstable();
    assert_eq!(persisted, (1..=80).collect::<Vec<u64>>());
}

#[test]
fn test_concurrent_readers_and_writers() {
    let (_temp, store) = open_store();
    let store = Arc::new(store);
    for _ in 0..5 {
        store.create(NewPost::new("seed", "post")).unwrap();
    }

    let writer = {
        let store = Arc::clone(&store);
        thread::spawn(move || {
            for i in 0..20 {
                store.create(NewPost::new(format!("w{}", i), "b")).unwrap();
            }
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for _ in 0..20 {
                    // Every read observes a complete, parseable snapshot
                    let posts = store.get_all().unwrap();
                    assert!(posts.len() >= 5);
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }

    assert_eq!(store.get_all().unwrap().len(), 25);
}
