//! # JSON File Post Store
//!
//! Every operation reads the whole backing file; every mutation rewrites it.
//! A single reader-writer lock per store serializes access:
//!
//! - reads hold the shared lock while the file is loaded
//! - mutations hold the exclusive lock across load, modify and save, so two
//!   concurrent creates never see the same snapshot

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;

use super::errors::{StoreError, StoreResult};
use super::post::{NewPost, Post};
use super::snapshot::{read_snapshot, write_snapshot, Snapshot};

/// Name of the backing file inside the data directory
pub const POSTS_FILE: &str = "posts.json";

/// Persistence operations on posts
pub trait PostStore: Send + Sync + std::fmt::Debug {
    /// All posts in insertion order
    fn get_all(&self) -> StoreResult<Vec<Post>>;

    /// The post with the given identifier
    fn get_by_id(&self, id: u64) -> StoreResult<Post>;

    /// Assign an identifier and timestamps, append, persist
    fn create(&self, new_post: NewPost) -> StoreResult<Post>;

    /// Replace the post with `post.id`, keeping its creation time
    fn update(&self, post: Post) -> StoreResult<Post>;

    /// Remove the post with the given identifier
    fn delete(&self, id: u64) -> StoreResult<()>;
}

/// Post store backed by `<data_dir>/posts.json`
#[derive(Debug)]
pub struct FilePostStore {
    path: PathBuf,
    // Guards the backing file, not any in-memory state.
    lock: RwLock<()>,
}

impl FilePostStore {
    /// Opens the store, creating the data directory and an empty
    /// snapshot file if they are missing.
    ///
    /// # Errors
    ///
    /// Returns an `InitFailed` error if the directory or file cannot be
    /// created. Callers treat this as fatal.
    pub fn open(data_dir: impl AsRef<Path>) -> StoreResult<Self> {
        let data_dir = data_dir.as_ref();

        if !data_dir.exists() {
            fs::create_dir_all(data_dir).map_err(|e| {
                StoreError::init_failed("failed to create data directory", e)
                    .with_details(format!("path: {}", data_dir.display()))
            })?;
        }

        let path = data_dir.join(POSTS_FILE);
        if !path.exists() {
            write_snapshot(&path, &Snapshot::default()).map_err(StoreError::into_init_failure)?;
        }

        Ok(Self {
            path,
            lock: RwLock::new(()),
        })
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the current snapshot under the shared lock
    pub fn load(&self) -> StoreResult<Snapshot> {
        let _guard = self.read_lock();
        read_snapshot(&self.path)
    }

    /// Replace the backing file under the exclusive lock
    pub fn save(&self, snapshot: &Snapshot) -> StoreResult<()> {
        let _guard = self.write_lock();
        write_snapshot(&self.path, snapshot)
    }

    // A panic while holding the lock leaves nothing half-updated in memory,
    // and the file is only ever replaced atomically, so poisoning is ignored.
    fn read_lock(&self) -> RwLockReadGuard<'_, ()> {
        self.lock.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_lock(&self) -> RwLockWriteGuard<'_, ()> {
        self.lock.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl PostStore for FilePostStore {
    fn get_all(&self) -> StoreResult<Vec<Post>> {
        Ok(self.load()?.posts)
    }

    fn get_by_id(&self, id: u64) -> StoreResult<Post> {
        self.load()?
            .posts
            .into_iter()
            .find(|p| p.id == id)
            .ok_or_else(|| StoreError::not_found(id))
    }

    fn create(&self, new_post: NewPost) -> StoreResult<Post> {
        let _guard = self.write_lock();
        let mut snapshot = read_snapshot(&self.path)?;

        let id = snapshot
            .next_id()
            .ok_or_else(|| StoreError::write_failed_no_source("post identifier space exhausted"))?;
        let post = new_post.into_post(id, Utc::now());

        snapshot.posts.push(post.clone());
        write_snapshot(&self.path, &snapshot)?;

        Ok(post)
    }

    fn update(&self, mut post: Post) -> StoreResult<Post> {
        let _guard = self.write_lock();
        let mut snapshot = read_snapshot(&self.path)?;

        let idx = snapshot
            .position(post.id)
            .ok_or_else(|| StoreError::not_found(post.id))?;
        let existing = &snapshot.posts[idx];

        post.created_at = existing.created_at;
        post.updated_at = Utc::now().max(existing.updated_at);
        snapshot.posts[idx] = post.clone();

        write_snapshot(&self.path, &snapshot)?;

        Ok(post)
    }

    fn delete(&self, id: u64) -> StoreResult<()> {
        let _guard = self.write_lock();
        let mut snapshot = read_snapshot(&self.path)?;

        let before = snapshot.posts.len();
        snapshot.posts.retain(|p| p.id != id);
        if snapshot.posts.len() == before {
            return Err(StoreError::not_found(id));
        }

        write_snapshot(&self.path, &snapshot)
    }
}
