use chrono::Datelike;
use serde::{Deserialize, Serialize};

/// Top-level configuration for Bidwise.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BidwiseConfig {
    pub valuation: ValuationConfig,
    pub documents: DocumentsConfig,
    pub risk: RiskConfig,
}

/// Configuration for the valuation estimator.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ValuationConfig {
    /// Year car ages are measured against. None = current UTC year.
    pub reference_year: Option<i32>,
    /// Fixes the per-deal random source used for historical bid synthesis.
    /// Each deal's generator is derived from this seed and the deal id.
    pub seed: Option<u64>,
}

impl ValuationConfig {
    pub fn resolved_reference_year(&self) -> i32 {
        self.reference_year
            .unwrap_or_else(|| chrono::Utc::now().year())
    }
}

/// Configuration for the document text source used by risk extraction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DocumentsConfig {
    /// Path to the SQLite document store written by the extraction pipeline.
    /// None = no documents available; risk flags stay empty.
    pub sqlite_path: Option<String>,
    /// Maximum number of documents held in the in-memory moka cache.
    pub memory_max_capacity: u64,
    /// TTL in seconds for in-memory document entries.
    pub memory_ttl_seconds: u64,
    /// Per-document fetch timeout in seconds.
    pub fetch_timeout_seconds: u64,
}

impl Default for DocumentsConfig {
    fn default() -> Self {
        Self {
            sqlite_path: None,
            memory_max_capacity: 1_000,
            memory_ttl_seconds: 300,
            fetch_timeout_seconds: 10,
        }
    }
}

/// Configuration for the risk keyword scanner.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RiskConfig {
    /// Keywords matched in addition to the built-in risk phrases.
    pub extra_keywords: Vec<String>,
}
