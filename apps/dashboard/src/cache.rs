//! # Page Cache
//!
//! Rendered page data keyed by request path and query string.
//!
//! ```text
//! GET /dashboard/invoices?query=lee&page=2
//!        │
//!        ├── hit  → cached JSON
//!        └── miss → run the queries, store under the full key
//!
//! create / update / delete invoice
//!        └── revalidate_path("/dashboard/invoices")
//!              drops "/dashboard/invoices" and every "/dashboard/invoices?…"
//! ```

use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Shared, clonable handle to the process-wide page cache.
#[derive(Debug, Clone, Default)]
pub struct PageCache {
    entries: Arc<RwLock<HashMap<String, Value>>>,
}

impl PageCache {
    pub fn new() -> Self {
        PageCache::default()
    }

    /// Returns the cached page for `key`, if any.
    pub async fn get(&self, key: &str) -> Option<Value> {
        self.entries.read().await.get(key).cloned()
    }

    /// Stores a page under `key`, replacing any previous entry.
    pub async fn insert(&self, key: impl Into<String>, page: Value) {
        self.entries.write().await.insert(key.into(), page);
    }

    /// Drops `path` and all of its query-string variants.
    ///
    /// `/dashboard/invoices` never matches `/dashboard/invoices/create`.
    pub async fn revalidate_path(&self, path: &str) {
        let prefix = format!("{}?", path);

        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|key, _| key != path && !key.starts_with(&prefix));

        debug!(path = %path, dropped = before - entries.len(), "Revalidated path");
    }

    /// Number of cached pages.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
