//! Snapshot file format and raw file access
//!
//! The backing file holds one JSON object with a single `posts` array.
//! Functions here perform no locking; `FilePostStore` holds its lock
//! around every call.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::errors::{StoreError, StoreResult};
use super::post::Post;

/// Full contents of the backing file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub posts: Vec<Post>,
}

impl Snapshot {
    pub fn new(posts: Vec<Post>) -> Self {
        Self { posts }
    }

    /// Identifier for the next created post: max + 1, or 1 when empty
    pub fn next_id(&self) -> Option<u64> {
        let max = self.posts.iter().map(|p| p.id).max().unwrap_or(0);
        max.checked_add(1)
    }

    /// Position of the post with the given identifier
    pub fn position(&self, id: u64) -> Option<usize> {
        self.posts.iter().position(|p| p.id == id)
    }
}

/// Read and parse the whole backing file
pub(crate) fn read_snapshot(path: &Path) -> StoreResult<Snapshot> {
    let content = fs::read(path).map_err(|e| {
        StoreError::read_failed("failed to read posts file", e)
            .with_details(format!("path: {}", path.display()))
    })?;

    serde_json::from_slice(&content).map_err(|e| {
        StoreError::parse_failed("failed to parse posts file", e)
            .with_details(format!("path: {}", path.display()))
    })
}

/// Replace the backing file with the given snapshot.
///
/// 1. Serialize pretty-printed
/// 2. Write and fsync a sibling temp file
/// 3. Rename temp over the target
pub(crate) fn write_snapshot(path: &Path, snapshot: &Snapshot) -> StoreResult<()> {
    let content = serde_json::to_vec_pretty(snapshot)
        .map_err(|e| StoreError::serialize_failed("failed to serialize posts", e))?;

    let temp_path = temp_path_for(path);
    let with_path = |e: StoreError| e.with_details(format!("path: {}", path.display()));

    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp_path)
        .map_err(|e| with_path(StoreError::write_failed("failed to create temp posts file", e)))?;

    file.write_all(&content)
        .map_err(|e| with_path(StoreError::write_failed("failed to write posts data", e)))?;

    file.sync_all()
        .map_err(|e| with_path(StoreError::write_failed("failed to fsync posts file", e)))?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        with_path(StoreError::write_failed("failed to replace posts file", e))
    })?;

    // Best effort: make the rename itself durable
    if let Some(parent) = path.parent() {
        if let Ok(dir) = File::open(parent) {
            let _ = dir.sync_all();
        }
    }

    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
