use std::sync::Arc;
use std::time::{Duration, Instant};

use bidwise_models::{Deal, Stage, StageReport};
use rust_decimal::Decimal;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::document::DocumentSource;
use crate::error::EnrichError;
use crate::extractor::extract;
use crate::risk::RiskScanner;
use crate::sampler::deal_rng;
use crate::valuation::estimate;

/// Default per-document fetch timeout.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// The enricher runs extraction, risk scanning and valuation over one deal
/// at a time. A failing stage is logged and leaves its fields at their
/// defaults; enrichment itself never fails.
pub struct Enricher {
    risk: RiskScanner,
    documents: Option<Arc<dyn DocumentSource>>,
    reference_year: i32,
    seed: Option<u64>,
    fetch_timeout: Duration,
}

impl Enricher {
    pub fn new(risk: RiskScanner, reference_year: i32) -> Self {
        Self {
            risk,
            documents: None,
            reference_year,
            seed: None,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }

    /// Attach the document source used for risk extraction.
    pub fn with_documents(mut self, documents: Arc<dyn DocumentSource>, timeout: Duration) -> Self {
        self.documents = Some(documents);
        self.fetch_timeout = timeout;
        self
    }

    /// Derive each deal's random source from `seed` and the deal id.
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn reference_year(&self) -> i32 {
        self.reference_year
    }

    /// Enrich a single raw deal.
    pub async fn enrich(&self, deal: Deal) -> Deal {
        self.enrich_with_report(deal).await.0
    }

    /// Enrich a single raw deal and report what each stage did.
    pub async fn enrich_with_report(&self, mut deal: Deal) -> (Deal, Vec<StageReport>) {
        let start = Instant::now();
        let mut reports = Vec::with_capacity(3);
        deal.reset_derived();

        // 1. Title extraction (valuation reads what it sets)
        reports.push(self.extract_stage(&mut deal));

        // 2. Risk flags from the attached document
        reports.push(self.risk_stage(&mut deal).await);

        // 3. Valuation
        reports.push(self.valuation_stage(&mut deal));

        let failed = reports.iter().filter(|r| r.is_failure()).count();
        debug!(
            deal_id = %deal.id,
            category = %deal.category,
            market_value = %deal.market_value,
            risk_flags = deal.risk_flags.len(),
            failed_stages = failed,
            elapsed_ms = start.elapsed().as_millis(),
            "Deal enriched"
        );

        (deal, reports)
    }

    fn extract_stage(&self, deal: &mut Deal) -> StageReport {
        let start = Instant::now();
        let patch = extract(deal.category, &deal.title);
        let fields = patch.field_count();
        deal.apply_patch(patch);

        debug!(deal_id = %deal.id, fields, "Title attributes extracted");
        let mut report = StageReport::applied(Stage::Extract, elapsed_ms(start));
        report.detail = Some(format!("{fields} fields"));
        report
    }

    async fn risk_stage(&self, deal: &mut Deal) -> StageReport {
        deal.risk_flags = Vec::new();
        let Some(link) = deal.document_reference().map(str::to_string) else {
            return StageReport::skipped(Stage::Risk, "no document reference");
        };
        let Some(documents) = &self.documents else {
            return StageReport::skipped(Stage::Risk, "no document source configured");
        };

        let start = Instant::now();
        match self.fetch_document(documents.as_ref(), &link).await {
            Ok(text) => {
                deal.risk_flags = self.risk.scan(&text);
                if !deal.risk_flags.is_empty() {
                    info!(deal_id = %deal.id, flags = ?deal.risk_flags, "Risk flags identified");
                }
                StageReport::applied(Stage::Risk, elapsed_ms(start))
            }
            Err(e) => {
                warn!(deal_id = %deal.id, stage = %Stage::Risk, source = documents.name(), link = %link, error = %e, "Stage failed");
                deal.risk_flags = Vec::new();
                StageReport::failed(Stage::Risk, e.to_string(), elapsed_ms(start))
            }
        }
    }

    async fn fetch_document(
        &self,
        documents: &dyn DocumentSource,
        link: &str,
    ) -> Result<String, EnrichError> {
        tokio::time::timeout(self.fetch_timeout, documents.fetch_text(link))
            .await
            .map_err(|_| EnrichError::Timeout(self.fetch_timeout.as_millis() as u64))?
    }

    fn valuation_stage(&self, deal: &mut Deal) -> StageReport {
        let start = Instant::now();
        let mut rng = deal_rng(self.seed, &deal.id);

        match estimate(deal, self.reference_year, &mut rng) {
            Ok(valuation) => {
                deal.apply_valuation(valuation);
                StageReport::applied(Stage::Valuation, elapsed_ms(start))
            }
            Err(e) => {
                warn!(deal_id = %deal.id, stage = %Stage::Valuation, error = %e, "Stage failed");
                deal.historical_bids = Vec::new();
                deal.recommended_bid = deal.opening_price.max(Decimal::ZERO);
                StageReport::failed(Stage::Valuation, e.to_string(), elapsed_ms(start))
            }
        }
    }
}

/// Counts from one batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub deals: usize,
    pub stage_failures: usize,
    pub with_risk_flags: usize,
    pub with_bid_history: usize,
}

/// Enrich deals strictly one after another, in input order.
pub async fn enrich_batch(enricher: &Enricher, deals: Vec<Deal>) -> (Vec<Deal>, BatchSummary) {
    let run_id = Uuid::new_v4();
    let span = info_span!("enrich_batch", %run_id);

    async move {
        let start = Instant::now();
        info!(deals = deals.len(), reference_year = enricher.reference_year, "Starting enrichment run");

        let mut summary = BatchSummary {
            deals: deals.len(),
            ..BatchSummary::default()
        };
        let mut enriched = Vec::with_capacity(deals.len());

        for deal in deals {
            let (deal, reports) = enricher.enrich_with_report(deal).await;
            summary.stage_failures += reports.iter().filter(|r| r.is_failure()).count();
            if !deal.risk_flags.is_empty() {
                summary.with_risk_flags += 1;
            }
            if !deal.historical_bids.is_empty() {
                summary.with_bid_history += 1;
            }
            enriched.push(deal);
        }

        info!(
            deals = summary.deals,
            stage_failures = summary.stage_failures,
            with_risk_flags = summary.with_risk_flags,
            with_bid_history = summary.with_bid_history,
            elapsed_ms = start.elapsed().as_millis(),
            "Enrichment run complete"
        );

        (enriched, summary)
    }
    .instrument(span)
    .await
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}
