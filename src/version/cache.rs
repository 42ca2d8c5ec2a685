//! Process-scoped cache of resolved API versions

use crate::types::{ApiVersion, ServiceType};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Cache key: one entry per (service, base URL, server id)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub service: ServiceType,
    pub base_url: String,
    pub server_id: u32,
}

impl CacheKey {
    /// Create a cache key. Trailing slashes on the URL are ignored.
    pub fn new(service: ServiceType, base_url: &str, server_id: u32) -> Self {
        Self {
            service,
            base_url: base_url.trim_end_matches('/').to_string(),
            server_id,
        }
    }
}

/// Concurrent map of resolved versions.
///
/// Cloning is cheap and every clone shares the same storage. Created once at
/// startup and handed to every client through the
/// [`ClientContext`](crate::client::ClientContext).
#[derive(Debug, Clone, Default)]
pub struct VersionCache {
    entries: Arc<RwLock<HashMap<CacheKey, ApiVersion>>>,
}

impl VersionCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a resolved version
    pub async fn get(&self, key: &CacheKey) -> Option<ApiVersion> {
        self.entries.read().await.get(key).copied()
    }

    /// Record a resolved version. Concurrent inserts for the same key keep
    /// whichever lands last.
    pub async fn insert(&self, key: CacheKey, version: ApiVersion) {
        self.entries.write().await.insert(key, version);
    }

    /// Drop one entry so the next resolution probes again
    pub async fn remove(&self, key: &CacheKey) -> Option<ApiVersion> {
        self.entries.write().await.remove(key)
    }

    /// Drop every entry
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    /// Number of cached entries
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the cache is empty
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
