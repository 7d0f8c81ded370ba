use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;

/// In-memory hot cache of extracted document text, backed by moka.
///
/// Tender documents are large and several listings often point at the same
/// file, so text is shared as `Arc<str>`. Entries are evicted after TTL.
pub struct MemoryCache {
    inner: Cache<String, Arc<str>>,
}

impl MemoryCache {
    pub fn new(max_capacity: u64, ttl: Duration) -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(max_capacity)
                .time_to_live(ttl)
                .build(),
        }
    }

    pub async fn get(&self, link: &str) -> Option<Arc<str>> {
        self.inner.get(link).await
    }

    pub async fn insert(&self, link: String, text: Arc<str>) {
        self.inner.insert(link, text).await;
    }

    pub async fn invalidate(&self, link: &str) {
        self.inner.invalidate(link).await;
    }
}
