//! Test support: in-process document sources and raw deal builders.
//!
//! The document sources stand in for the SQLite-backed store so enrichment
//! can be exercised against fixed text, missing documents and slow fetches.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use bidwise_models::{Deal, DealCategory};

use crate::document::DocumentSource;
use crate::error::EnrichError;

/// Serves document text from a fixed map. Unknown links are not found.
#[derive(Default)]
pub struct StaticDocumentSource {
    documents: HashMap<String, String>,
}

impl StaticDocumentSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(mut self, link: &str, text: &str) -> Self {
        self.documents.insert(link.to_string(), text.to_string());
        self
    }
}

#[async_trait]
impl DocumentSource for StaticDocumentSource {
    fn name(&self) -> &str {
        "static"
    }

    async fn fetch_text(&self, link: &str) -> Result<String, EnrichError> {
        self.documents
            .get(link)
            .cloned()
            .ok_or_else(|| EnrichError::DocumentNotFound(link.to_string()))
    }
}

/// Fails every fetch.
pub struct FailingDocumentSource;

#[async_trait]
impl DocumentSource for FailingDocumentSource {
    fn name(&self) -> &str {
        "failing"
    }

    async fn fetch_text(&self, link: &str) -> Result<String, EnrichError> {
        Err(EnrichError::Document(format!("unreadable document {link}")))
    }
}

/// Sleeps before answering with empty text.
pub struct SlowDocumentSource {
    delay: Duration,
}

impl SlowDocumentSource {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl DocumentSource for SlowDocumentSource {
    fn name(&self) -> &str {
        "slow"
    }

    async fn fetch_text(&self, _link: &str) -> Result<String, EnrichError> {
        tokio::time::sleep(self.delay).await;
        Ok(String::new())
    }
}

/// A deal as acquisition hands it over: only id, category and title set.
pub fn raw_deal(id: &str, category: DealCategory, title: &str) -> Deal {
    let mut deal = Deal::new(id, category, title);
    deal.source = "test".to_string();
    deal
}

/// A raw deal whose tender document lives at `document_link`.
pub fn raw_deal_with_document(
    id: &str,
    category: DealCategory,
    title: &str,
    document_link: &str,
) -> Deal {
    let mut deal = raw_deal(id, category, title);
    deal.document_link = Some(document_link.to_string());
    deal
}
