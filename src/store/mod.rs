//! Post persistence for postfile
//!
//! Posts live in a single pretty-printed JSON document on disk. There is no
//! in-memory cache: each call reads the current file, and each mutation
//! writes a complete replacement.
//!
//! # Guarantees
//!
//! - Identifiers are unique and assigned as max + 1; gaps are never refilled
//! - `created_at` never changes after create; `updated_at >= created_at`
//! - The file is replaced atomically and always holds a parseable snapshot
//! - A missing identifier never causes a write

mod errors;
mod file_store;
mod post;
mod snapshot;

pub use errors::{Severity, StoreError, StoreErrorCode, StoreResult};
pub use file_store::{FilePostStore, PostStore, POSTS_FILE};
pub use post::{NewPost, Post};
pub use snapshot::Snapshot;
