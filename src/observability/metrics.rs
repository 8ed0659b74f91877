//! Metrics registry for postfile
//!
//! Counters only, monotonic, reset on process start.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Operational counters shared by all request handlers
///
/// Relaxed ordering is enough: counters are read for reporting only.
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    requests: AtomicU64,
    requests_failed: AtomicU64,
    posts_created: AtomicU64,
    posts_updated: AtomicU64,
    posts_deleted: AtomicU64,
    store_errors: AtomicU64,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a served request; `failed` for 5xx responses
    pub fn record_request(&self, failed: bool) {
        self.requests.fetch_add(1, Ordering::Relaxed);
        if failed {
            self.requests_failed.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn increment_posts_created(&self) {
        self.posts_created.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_posts_updated(&self) {
        self.posts_updated.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_posts_deleted(&self) {
        self.posts_deleted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_store_errors(&self) {
        self.store_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Point-in-time copy of all counters
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            requests: self.requests.load(Ordering::Relaxed),
            requests_failed: self.requests_failed.load(Ordering::Relaxed),
            posts_created: self.posts_created.load(Ordering::Relaxed),
            posts_updated: self.posts_updated.load(Ordering::Relaxed),
            posts_deleted: self.posts_deleted.load(Ordering::Relaxed),
            store_errors: self.store_errors.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time snapshot of all metrics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub requests: u64,
    pub requests_failed: u64,
    pub posts_created: u64,
    pub posts_updated: u64,
    pub posts_deleted: u64,
    pub store_errors: u64,
}
