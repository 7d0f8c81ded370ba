pub mod attributes;
pub mod config;
pub mod deal;
pub mod document_schema;
pub mod report;
pub mod valuation;

pub use attributes::{AttributePatch, CarAttributes, EquipmentAttributes, RealEstateAttributes};
pub use config::{BidwiseConfig, DocumentsConfig, RiskConfig, ValuationConfig};
pub use deal::{Deal, DealCategory};
pub use document_schema::DocumentRow;
pub use report::{Stage, StageOutcome, StageReport};
pub use valuation::{LocationTier, Valuation};
