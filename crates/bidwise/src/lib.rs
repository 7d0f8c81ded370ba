//! Bidwise - auction deal enrichment
//!
//! Takes raw auction listings (cars, real estate, equipment) and fills in
//! title-derived attributes, risk flags from the tender document, an estimated
//! market value and an illustrative bid history.
//!
//! # Library Usage
//!
//! ```rust,no_run
//! use bidwise::models::{BidwiseConfig, Deal, DealCategory};
//! use bidwise::enrich::{enrich_batch, Enricher, RiskScanner};
//! use bidwise::cache::{DocumentCache, DocumentStore};
//! ```

pub use bidwise_cache as cache;
pub use bidwise_enrich as enrich;
pub use bidwise_models as models;

use std::sync::Arc;
use std::time::Duration;

use bidwise_cache::{DocumentCache, DocumentStore};
use bidwise_enrich::{BatchSummary, CachedDocumentSource, Enricher, RiskScanner};
use bidwise_models::{BidwiseConfig, Deal};
use tracing::{info, warn};

/// Build an Enricher from configuration.
pub fn build_enricher(config: &BidwiseConfig) -> Result<Enricher, anyhow::Error> {
    let risk = RiskScanner::new(&config.risk.extra_keywords)?;
    let mut enricher = Enricher::new(risk, config.valuation.resolved_reference_year())
        .with_seed(config.valuation.seed);

    if let Some(path) = &config.documents.sqlite_path {
        let store = DocumentStore::open(path)?;
        info!(path = %path, documents = store.live_count()?, "Document store opened");
        let cache = Arc::new(DocumentCache::new(
            store,
            config.documents.memory_max_capacity,
            Duration::from_secs(config.documents.memory_ttl_seconds),
        ));
        enricher = enricher.with_documents(
            Arc::new(CachedDocumentSource::new(cache)),
            Duration::from_secs(config.documents.fetch_timeout_seconds),
        );
    }

    Ok(enricher)
}

/// Parse a JSON array of raw deals. Only a malformed array is an error;
/// records that do not deserialize are logged and skipped.
pub fn parse_deals(json: &str) -> Result<Vec<Deal>, serde_json::Error> {
    let records: Vec<serde_json::Value> = serde_json::from_str(json)?;

    let mut deals = Vec::with_capacity(records.len());
    for (index, record) in records.into_iter().enumerate() {
        match serde_json::from_value::<Deal>(record) {
            Ok(deal) => deals.push(deal),
            Err(e) => warn!(index, error = %e, "Skipping malformed deal record"),
        }
    }
    Ok(deals)
}

/// Enrich a batch of deals using the given enricher, preserving order.
pub async fn enrich(enricher: &Enricher, deals: Vec<Deal>) -> (Vec<Deal>, BatchSummary) {
    bidwise_enrich::enrich_batch(enricher, deals).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use bidwise_models::{DealCategory, DocumentRow};

    #[tokio::test]
    async fn builds_without_document_store() {
        let mut config = BidwiseConfig::default();
        config.valuation.reference_year = Some(2026);
        config.valuation.seed = Some(1);

        let enricher = build_enricher(&config).unwrap();
        assert_eq!(enricher.reference_year(), 2026);

        let deals = parse_deals(r#"[{"id":"merkava_1","type":"car","title":"רכב שברולט ספארק שנת 2019"}]"#)
            .unwrap();
        let (deals, summary) = enrich(&enricher, deals).await;
        assert_eq!(summary.deals, 1);
        assert_eq!(deals[0].category, DealCategory::Car);
        assert_eq!(deals[0].market_value.to_string(), "49041");
    }

    #[tokio::test]
    async fn builds_with_document_store_and_extra_keywords() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("documents.db");
        let path = path.to_str().unwrap().to_string();
        {
            let store = DocumentStore::open_writable(&path).unwrap();
            store
                .insert(&DocumentRow {
                    link: "https://example.gov.il/t.pdf".to_string(),
                    text: "רשומה הערת אזהרה על הנכס".to_string(),
                    source: "pdf".to_string(),
                    fetched_at: "2026-01-01T00:00:00+00:00".to_string(),
                    expires_at: "2999-01-01T00:00:00+00:00".to_string(),
                })
                .unwrap();
        }

        let mut config = BidwiseConfig::default();
        config.valuation.reference_year = Some(2026);
        config.documents.sqlite_path = Some(path);
        config.risk.extra_keywords = vec!["הערת אזהרה".to_string()];

        let enricher = build_enricher(&config).unwrap();
        let deals = parse_deals(
            r#"[{"id":"r1","type":"real_estate","title":"דירת 3 חדרים","pdf_link":"https://example.gov.il/t.pdf"}]"#,
        )
        .unwrap();
        let (deals, _) = enrich(&enricher, deals).await;
        assert_eq!(deals[0].risk_flags, vec!["הערת אזהרה"]);
    }

    #[test]
    fn malformed_records_are_skipped() {
        let json = r#"[
            {"id":"a","type":"car","title":"רכב קיה 2018"},
            {"id":"b","type":"boat","title":"סירה"},
            {"id":"c","type":"car","title":"רכב","openingPrice":null},
            {"id":"d","type":"equipment"},
            {"id":"e","type":"real_estate","title":"דירת 3 חדרים"}
        ]"#;

        let deals = parse_deals(json).unwrap();
        let ids: Vec<&str> = deals.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "e"]);
    }

    #[test]
    fn non_array_input_is_an_error() {
        assert!(parse_deals(r#"{"id":"a"}"#).is_err());
        assert!(parse_deals("not json").is_err());
    }

    #[test]
    fn missing_document_store_is_an_error() {
        let mut config = BidwiseConfig::default();
        config.documents.sqlite_path = Some("/nonexistent/dir/documents.db".to_string());
        assert!(build_enricher(&config).is_err());
    }
}
