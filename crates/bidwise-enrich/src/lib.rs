pub mod document;
pub mod error;
pub mod extractor;
pub mod orchestrator;
pub mod risk;
pub mod sampler;
pub mod valuation;

pub mod test_support;

pub use document::{CachedDocumentSource, DocumentSource};
pub use error::EnrichError;
pub use orchestrator::{enrich_batch, BatchSummary, Enricher, DEFAULT_FETCH_TIMEOUT};
pub use risk::RiskScanner;
