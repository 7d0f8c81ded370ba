use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::attributes::AttributePatch;
use crate::valuation::Valuation;

/// Asset category of an auction listing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DealCategory {
    Car,
    RealEstate,
    Equipment,
}

impl DealCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Car => "car",
            Self::RealEstate => "real_estate",
            Self::Equipment => "equipment",
        }
    }
}

impl std::fmt::Display for DealCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An auction listing, as supplied by acquisition and completed by enrichment.
///
/// Price fields use `0` for "unknown". Category-specific attributes are
/// `None` until extracted and are omitted from the JSON output while absent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Deal {
    pub id: String,
    #[serde(alias = "type")]
    pub category: DealCategory,
    pub title: String,
    #[serde(default)]
    pub source: String,
    /// Detail page or document URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    /// Explicit reference to the listing's tender document.
    #[serde(default, alias = "pdf_link", skip_serializing_if = "Option::is_none")]
    pub document_link: Option<String>,
    /// Free-text time/location field from the listing page.
    #[serde(default, alias = "timeLeft", skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(default)]
    pub opening_price: Decimal,
    #[serde(default)]
    pub market_value: Decimal,

    // car
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    // real_estate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rooms: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area_sqm: Option<Decimal>,

    // equipment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equipment_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,

    #[serde(default)]
    pub risk_flags: Vec<String>,
    #[serde(default)]
    pub historical_bids: Vec<Decimal>,
    #[serde(default)]
    pub recommended_bid: Decimal,
}

impl Deal {
    /// A bare listing with zeroed price fields, as acquisition produces it.
    pub fn new(id: impl Into<String>, category: DealCategory, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            category,
            title: title.into(),
            source: String::new(),
            link: None,
            document_link: None,
            location: None,
            opening_price: Decimal::ZERO,
            market_value: Decimal::ZERO,
            year: None,
            model: None,
            rooms: None,
            area_sqm: None,
            equipment_category: None,
            brand: None,
            risk_flags: Vec::new(),
            historical_bids: Vec::new(),
            recommended_bid: Decimal::ZERO,
        }
    }

    /// The document to scan for risks: the explicit document link, or the
    /// listing link when it points straight at a PDF.
    pub fn document_reference(&self) -> Option<&str> {
        if let Some(doc) = self.document_link.as_deref().filter(|d| !d.trim().is_empty()) {
            return Some(doc);
        }
        self.link
            .as_deref()
            .filter(|l| l.trim().to_ascii_lowercase().ends_with(".pdf"))
    }

    /// Merge extracted attributes. Only present fields are written, and a
    /// patch for a different category is ignored. Returns whether the patch
    /// matched this deal's category.
    pub fn apply_patch(&mut self, patch: AttributePatch) -> bool {
        if patch.category() != self.category {
            return false;
        }

        match patch {
            AttributePatch::Car(car) => {
                if let Some(year) = car.year {
                    self.year = Some(year);
                }
                if let Some(model) = car.model {
                    self.model = Some(model);
                }
            }
            AttributePatch::RealEstate(re) => {
                if let Some(rooms) = re.rooms {
                    self.rooms = Some(rooms);
                }
                if let Some(area) = re.area_sqm {
                    self.area_sqm = Some(area);
                }
            }
            AttributePatch::Equipment(eq) => {
                if let Some(category) = eq.category {
                    self.equipment_category = Some(category);
                }
                if let Some(brand) = eq.brand {
                    self.brand = Some(brand);
                }
            }
        }
        true
    }

    /// Clear everything enrichment derives: risk flags, bid history,
    /// recommended bid and the attributes of other categories. Attributes
    /// of the deal's own category are kept as supplied.
    pub fn reset_derived(&mut self) {
        self.risk_flags.clear();
        self.historical_bids.clear();
        self.recommended_bid = Decimal::ZERO;

        if self.category != DealCategory::Car {
            self.year = None;
            self.model = None;
        }
        if self.category != DealCategory::RealEstate {
            self.rooms = None;
            self.area_sqm = None;
        }
        if self.category != DealCategory::Equipment {
            self.equipment_category = None;
            self.brand = None;
        }
    }

    /// Attach the four valuation outputs.
    pub fn apply_valuation(&mut self, valuation: Valuation) {
        self.market_value = valuation.market_value;
        self.opening_price = valuation.opening_price;
        self.historical_bids = valuation.historical_bids;
        self.recommended_bid = valuation.recommended_bid;
    }
}
