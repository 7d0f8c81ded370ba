use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Output of the valuation estimator for a single deal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Valuation {
    pub market_value: Decimal,
    /// Unchanged unless the incoming opening price was exactly zero.
    pub opening_price: Decimal,
    /// Synthetic comparable winning bids, ascending. Empty when the deal has
    /// no usable opening price/market value spread.
    pub historical_bids: Vec<Decimal>,
    pub recommended_bid: Decimal,
}

/// Price tier for real-estate valuation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LocationTier {
    /// Major metropolitan cities.
    Center,
    Periphery,
}
