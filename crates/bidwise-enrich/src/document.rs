use std::sync::Arc;

use async_trait::async_trait;
use bidwise_cache::DocumentCache;

use crate::error::EnrichError;

/// Supplies the extracted text of a listing's attached document.
/// Mockable for testing.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    fn name(&self) -> &str;

    async fn fetch_text(&self, link: &str) -> Result<String, EnrichError>;
}

/// Document source backed by the shared document store.
pub struct CachedDocumentSource {
    cache: Arc<DocumentCache>,
}

impl CachedDocumentSource {
    pub fn new(cache: Arc<DocumentCache>) -> Self {
        Self { cache }
    }
}

#[async_trait]
impl DocumentSource for CachedDocumentSource {
    fn name(&self) -> &str {
        "document_store"
    }

    async fn fetch_text(&self, link: &str) -> Result<String, EnrichError> {
        match self.cache.get_text(link).await? {
            Some(text) => Ok(text.to_string()),
            None => Err(EnrichError::DocumentNotFound(link.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bidwise_cache::DocumentStore;
    use bidwise_models::DocumentRow;
    use chrono::{Duration as ChronoDuration, Utc};
    use std::time::Duration;

    fn source_with(link: &str, text: &str) -> CachedDocumentSource {
        let store = DocumentStore::open_in_memory().unwrap();
        let now = Utc::now();
        store
            .insert(&DocumentRow {
                link: link.to_string(),
                text: text.to_string(),
                source: "pdf".to_string(),
                fetched_at: now.to_rfc3339(),
                expires_at: (now + ChronoDuration::hours(1)).to_rfc3339(),
            })
            .unwrap();
        CachedDocumentSource::new(Arc::new(DocumentCache::new(
            store,
            10,
            Duration::from_secs(60),
        )))
    }

    #[tokio::test]
    async fn fetches_stored_text() {
        let source = source_with("https://example.gov.il/t.pdf", "קיים עיקול");
        let text = source
            .fetch_text("https://example.gov.il/t.pdf")
            .await
            .unwrap();
        assert_eq!(text, "קיים עיקול");
        assert_eq!(source.name(), "document_store");
    }

    #[tokio::test]
    async fn missing_document_is_an_error() {
        let source = source_with("https://example.gov.il/t.pdf", "text");
        let result = source.fetch_text("https://example.gov.il/other.pdf").await;
        assert!(matches!(result, Err(EnrichError::DocumentNotFound(_))));
    }
}
