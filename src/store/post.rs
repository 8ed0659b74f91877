//! Post record types
//!
//! A post is the only entity the service persists. The store assigns `id`
//! and both timestamps; callers only ever choose `title` and `body`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Store-assigned identifier, unique within the store
    pub id: u64,
    /// Set once on create
    pub created_at: DateTime<Utc>,
    /// Refreshed on every update, never earlier than `created_at`
    pub updated_at: DateTime<Utc>,
    /// Reserved for soft delete; no operation sets it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
    pub title: String,
    pub body: String,
}

impl Post {
    /// Replace the caller-controlled content of this post
    pub fn set_content(&mut self, content: NewPost) {
        self.title = content.title;
        self.body = content.body;
    }
}

/// Caller-supplied content for a new or updated post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPost {
    pub title: String,
    pub body: String,
}

impl NewPost {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }

    /// Finalize into a record with the given identifier and timestamp
    pub(crate) fn into_post(self, id: u64, now: DateTime<Utc>) -> Post {
        Post {
            id,
            created_at: now,
            updated_at: now,
            deleted_at: None,
            title: self.title,
            body: self.body,
        }
    }
}
