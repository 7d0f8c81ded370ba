use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::deal::DealCategory;

/// Attributes pulled from a car listing title.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CarAttributes {
    pub year: Option<i32>,
    /// Brand, optionally followed by the next title token (e.g. "שברולט ספארק").
    pub model: Option<String>,
}

/// Attributes pulled from a real-estate listing title.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RealEstateAttributes {
    pub rooms: Option<Decimal>,
    pub area_sqm: Option<Decimal>,
}

/// Attributes pulled from an equipment listing title.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EquipmentAttributes {
    /// Taxonomy label (e.g. "forklift").
    pub category: Option<String>,
    pub brand: Option<String>,
}

/// A partial update produced by title extraction, tagged with the category
/// it belongs to. `None` fields mean "not extracted" and never clear a value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AttributePatch {
    Car(CarAttributes),
    RealEstate(RealEstateAttributes),
    Equipment(EquipmentAttributes),
}

impl AttributePatch {
    pub fn category(&self) -> DealCategory {
        match self {
            Self::Car(_) => DealCategory::Car,
            Self::RealEstate(_) => DealCategory::RealEstate,
            Self::Equipment(_) => DealCategory::Equipment,
        }
    }

    /// An empty patch for the given category.
    pub fn empty(category: DealCategory) -> Self {
        match category {
            DealCategory::Car => Self::Car(CarAttributes::default()),
            DealCategory::RealEstate => Self::RealEstate(RealEstateAttributes::default()),
            DealCategory::Equipment => Self::Equipment(EquipmentAttributes::default()),
        }
    }

    /// Number of fields this patch would set.
    pub fn field_count(&self) -> usize {
        match self {
            Self::Car(c) => c.year.is_some() as usize + c.model.is_some() as usize,
            Self::RealEstate(r) => r.rooms.is_some() as usize + r.area_sqm.is_some() as usize,
            Self::Equipment(e) => e.category.is_some() as usize + e.brand.is_some() as usize,
        }
    }
}
