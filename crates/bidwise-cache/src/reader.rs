use std::sync::{Arc, Mutex};
use std::time::Duration;

use bidwise_models::document_schema::document_key;
use tracing::debug;

use crate::error::CacheError;
use crate::memory::MemoryCache;
use crate::sqlite::DocumentStore;

/// Read-through document cache: checks moka (hot) → SQLite (shared) → None.
///
/// On SQLite hit, promotes the text to the moka hot cache for subsequent fast access.
/// SQLite access is synchronized via `Mutex` since `rusqlite::Connection` is not `Sync`.
pub struct DocumentCache {
    memory: MemoryCache,
    store: Mutex<DocumentStore>,
}

impl DocumentCache {
    pub fn new(store: DocumentStore, max_capacity: u64, memory_ttl: Duration) -> Self {
        Self {
            memory: MemoryCache::new(max_capacity, memory_ttl),
            store: Mutex::new(store),
        }
    }

    /// Get the extracted text for a document link.
    pub async fn get_text(&self, link: &str) -> Result<Option<Arc<str>>, CacheError> {
        let key = document_key(link);

        if let Some(text) = self.memory.get(&key).await {
            debug!(link = %key, "Document served from memory");
            return Ok(Some(text));
        }

        // TTL filtering happens in the query
        let row = {
            let store = self
                .store
                .lock()
                .map_err(|e| CacheError::Unavailable(format!("SQLite mutex poisoned: {e}")))?;
            store.get(&key)?
        };

        match row {
            Some(row) => {
                debug!(link = %key, source = %row.source, bytes = row.text.len(), "Document loaded from store");
                let text: Arc<str> = Arc::from(row.text);
                self.memory.insert(key, Arc::clone(&text)).await;
                Ok(Some(text))
            }
            None => Ok(None),
        }
    }

    /// Drop a document from the hot cache so the next read goes to SQLite.
    pub async fn invalidate(&self, link: &str) {
        self.memory.invalidate(&document_key(link)).await;
    }
}
