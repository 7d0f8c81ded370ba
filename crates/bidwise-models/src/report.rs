use serde::{Deserialize, Serialize};

/// A stage of the enrichment pipeline.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Extract,
    Risk,
    Valuation,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Extract => "extract",
            Self::Risk => "risk",
            Self::Valuation => "valuation",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StageOutcome {
    /// The stage ran and its output was merged into the deal.
    Applied,
    /// The stage had nothing to work on (e.g. no document reference).
    Skipped,
    /// The stage faulted; the deal keeps its previous values for this stage.
    Failed,
}

/// What happened to one stage while enriching one deal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StageReport {
    pub stage: Stage,
    pub outcome: StageOutcome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    pub elapsed_ms: u64,
}

impl StageReport {
    pub fn applied(stage: Stage, elapsed_ms: u64) -> Self {
        Self {
            stage,
            outcome: StageOutcome::Applied,
            detail: None,
            elapsed_ms,
        }
    }

    pub fn skipped(stage: Stage, detail: impl Into<String>) -> Self {
        Self {
            stage,
            outcome: StageOutcome::Skipped,
            detail: Some(detail.into()),
            elapsed_ms: 0,
        }
    }

    pub fn failed(stage: Stage, detail: impl Into<String>, elapsed_ms: u64) -> Self {
        Self {
            stage,
            outcome: StageOutcome::Failed,
            detail: Some(detail.into()),
            elapsed_ms,
        }
    }

    pub fn is_failure(&self) -> bool {
        self.outcome == StageOutcome::Failed
    }
}
