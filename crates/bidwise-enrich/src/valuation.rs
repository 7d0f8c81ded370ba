//! Market value estimation and historical bid synthesis.
//!
//! Amounts are whole currency units; intermediate products are truncated the
//! same way at every step. Arithmetic is checked so an absurd input becomes a
//! valuation error instead of a panic.

use bidwise_models::{Deal, DealCategory, LocationTier, Valuation};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;

use crate::error::EnrichError;
use crate::sampler::{triangular, BidSampler};

/// New-vehicle base price by brand, searched in order against the model.
pub const CAR_BASE_PRICES: &[(&str, i64)] = &[
    ("שברולט", 120_000),
    ("יונדאי", 135_000),
    ("מאזדה", 140_000),
    ("טויוטה", 150_000),
    ("קיה", 130_000),
    ("סקודה", 145_000),
    ("טסלה", 200_000),
];

pub const DEFAULT_CAR_BASE_PRICE: i64 = 100_000;
pub const CAR_VALUE_FLOOR: i64 = 15_000;

/// Title tokens that put a property in the center price tier.
pub const CENTER_CITY_TOKENS: &[&str] = &["תל אביב", "ת\"א", "רמת גן", "הרצליה", "גבעתיים", "ירושלים"];

pub const CENTER_PRICE_PER_ROOM: i64 = 800_000;
pub const PERIPHERY_PRICE_PER_ROOM: i64 = 450_000;
pub const SQM_PER_ROOM: i64 = 25;
pub const DEFAULT_REAL_ESTATE_VALUE: i64 = 1_500_000;

/// No equipment model exists; every item gets this value.
pub const EQUIPMENT_FALLBACK_VALUE: i64 = 25_000;

pub const MIN_HISTORICAL_BIDS: usize = 5;
pub const MAX_HISTORICAL_BIDS: usize = 8;
pub const BID_ROUNDING: i64 = 500;
pub const MIN_BID_WINDOW: i64 = 1_000;

/// Estimate market value, opening price and the synthetic bid history.
pub fn estimate<S: BidSampler + ?Sized>(
    deal: &Deal,
    reference_year: i32,
    sampler: &mut S,
) -> Result<Valuation, EnrichError> {
    let market_value = match deal.category {
        DealCategory::Car => estimate_car_value(deal.model.as_deref(), deal.year, reference_year)?,
        DealCategory::RealEstate => {
            estimate_real_estate_value(&deal.title, deal.rooms, deal.area_sqm)?
        }
        DealCategory::Equipment => Decimal::from(EQUIPMENT_FALLBACK_VALUE),
    }
    .max(Decimal::ZERO);

    let opening_price = infer_opening_price(deal.opening_price, market_value);
    let historical_bids = synthesize_bids(opening_price, market_value, sampler)?;
    let recommended_bid = if historical_bids.is_empty() {
        opening_price
    } else {
        mean(&historical_bids)
    };

    Ok(Valuation {
        market_value,
        opening_price,
        historical_bids,
        recommended_bid,
    })
}

pub fn car_base_price(model: Option<&str>) -> Decimal {
    let price = model
        .and_then(|m| CAR_BASE_PRICES.iter().find(|(brand, _)| m.contains(brand)))
        .map(|(_, price)| *price)
        .unwrap_or(DEFAULT_CAR_BASE_PRICE);
    Decimal::from(price)
}

/// 12% compounding depreciation per year of age, floored at 15000.
/// Without a year the value is a flat 70% of the base price.
pub fn estimate_car_value(
    model: Option<&str>,
    year: Option<i32>,
    reference_year: i32,
) -> Result<Decimal, EnrichError> {
    let base = car_base_price(model);
    let floor = Decimal::from(CAR_VALUE_FLOOR);

    let Some(year) = year else {
        return Ok((base * Decimal::new(7, 1)).trunc().max(floor));
    };

    let age = reference_year.saturating_sub(year).max(0);
    let rate = Decimal::new(88, 2);
    let mut value = base;
    for _ in 0..age {
        value = value
            .checked_mul(rate)
            .ok_or_else(|| EnrichError::Valuation("car depreciation overflow".to_string()))?;
        if value < floor {
            break;
        }
    }

    Ok(value.trunc().max(floor))
}

pub fn location_tier(title: &str) -> LocationTier {
    if CENTER_CITY_TOKENS.iter().any(|city| title.contains(city)) {
        LocationTier::Center
    } else {
        LocationTier::Periphery
    }
}

pub fn price_per_room(tier: LocationTier) -> Decimal {
    match tier {
        LocationTier::Center => Decimal::from(CENTER_PRICE_PER_ROOM),
        LocationTier::Periphery => Decimal::from(PERIPHERY_PRICE_PER_ROOM),
    }
}

/// Rooms × tier price; failing that, area at 25 sqm per room; failing that,
/// a flat default.
pub fn estimate_real_estate_value(
    title: &str,
    rooms: Option<Decimal>,
    area_sqm: Option<Decimal>,
) -> Result<Decimal, EnrichError> {
    let per_room = price_per_room(location_tier(title));
    let overflow = || EnrichError::Valuation("real estate value overflow".to_string());

    let value = if let Some(rooms) = rooms.filter(|r| r.is_sign_positive() && !r.is_zero()) {
        rooms.checked_mul(per_room).ok_or_else(overflow)?
    } else if let Some(area) = area_sqm.filter(|a| a.is_sign_positive() && !a.is_zero()) {
        (area / Decimal::from(SQM_PER_ROOM))
            .checked_mul(per_room)
            .ok_or_else(overflow)?
    } else {
        Decimal::from(DEFAULT_REAL_ESTATE_VALUE)
    };

    Ok(value.trunc())
}

/// A missing (zero) opening price is replaced with 65% of the market value.
/// Negative prices are invalid input and are treated as missing.
pub fn infer_opening_price(opening_price: Decimal, market_value: Decimal) -> Decimal {
    if opening_price <= Decimal::ZERO {
        (market_value * Decimal::new(65, 2)).trunc()
    } else {
        opening_price
    }
}

/// Bounds every synthetic bid falls in: 10% of the way from the opening
/// price to the market value, up to 85% of market value, at least 1000 wide.
pub fn bid_window(opening_price: Decimal, market_value: Decimal) -> (Decimal, Decimal) {
    let low = opening_price + (market_value - opening_price) * Decimal::new(10, 2);
    let high = (market_value * Decimal::new(85, 2)).max(low + Decimal::from(MIN_BID_WINDOW));
    (low, high)
}

/// Illustrative past winning bids: 5 to 8 triangular draws skewed toward the
/// lower part of the window, rounded to 500 and sorted ascending. Empty
/// unless there is a positive opening price below the market value.
pub fn synthesize_bids<S: BidSampler + ?Sized>(
    opening_price: Decimal,
    market_value: Decimal,
    sampler: &mut S,
) -> Result<Vec<Decimal>, EnrichError> {
    if opening_price <= Decimal::ZERO || market_value <= opening_price {
        return Ok(Vec::new());
    }

    let (low, high) = bid_window(opening_price, market_value);
    let mode = low + (high - low) * Decimal::new(40, 2);
    let (low_f, high_f, mode_f) = match (low.to_f64(), high.to_f64(), mode.to_f64()) {
        (Some(l), Some(h), Some(m)) => (l, h, m),
        _ => {
            return Err(EnrichError::Valuation(
                "bid window out of float range".to_string(),
            ))
        }
    };

    let count = sampler.sample_count(MIN_HISTORICAL_BIDS, MAX_HISTORICAL_BIDS);
    let mut bids = Vec::with_capacity(count);
    for _ in 0..count {
        let draw = triangular(sampler, low_f, high_f, mode_f);
        let draw = Decimal::from_f64(draw)
            .ok_or_else(|| EnrichError::Valuation(format!("unrepresentable bid {draw}")))?;
        bids.push(round_into_window(draw, low, high));
    }
    bids.sort();
    Ok(bids)
}

/// Round to the nearest 500, stepping back inside `[low, high]` if the
/// rounding crossed a bound. The window is at least 1000 wide, so one
/// step is always enough.
fn round_into_window(value: Decimal, low: Decimal, high: Decimal) -> Decimal {
    let step = Decimal::from(BID_ROUNDING);
    let rounded = (value / step).round() * step;
    if rounded < low {
        rounded + step
    } else if rounded > high {
        rounded - step
    } else {
        rounded
    }
}

/// Arithmetic mean to two decimal places.
pub fn mean(values: &[Decimal]) -> Decimal {
    if values.is_empty() {
        return Decimal::ZERO;
    }
    let sum: Decimal = values.iter().sum();
    (sum / Decimal::from(values.len())).round_dp(2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rust_decimal_macros::dec;

    fn car(model: Option<&str>, year: Option<i32>, opening: Decimal) -> Deal {
        let mut deal = Deal::new("car-1", DealCategory::Car, "רכב");
        deal.model = model.map(str::to_string);
        deal.year = year;
        deal.opening_price = opening;
        deal
    }

    #[test]
    fn car_base_price_table_order() {
        assert_eq!(car_base_price(Some("שברולט ספארק")), dec!(120000));
        assert_eq!(car_base_price(Some("טסלה 3")), dec!(200000));
        assert_eq!(car_base_price(Some("פורד פוקוס")), dec!(100000));
        assert_eq!(car_base_price(None), dec!(100000));
    }

    #[test]
    fn car_value_seven_years_old() {
        let value = estimate_car_value(Some("שברולט ספארק"), Some(2019), 2026).unwrap();
        // trunc(120000 * 0.88^7)
        assert_eq!(value, dec!(49041));
    }

    #[test]
    fn car_value_unknown_year_is_seventy_percent() {
        assert_eq!(
            estimate_car_value(Some("טויוטה"), None, 2026).unwrap(),
            dec!(105000)
        );
        assert_eq!(estimate_car_value(None, None, 2026).unwrap(), dec!(70000));
    }

    #[test]
    fn car_value_future_year_has_no_depreciation() {
        assert_eq!(
            estimate_car_value(Some("קיה"), Some(2028), 2026).unwrap(),
            dec!(130000)
        );
    }

    #[test]
    fn car_value_non_increasing_with_age_and_floored() {
        let mut previous = Decimal::MAX;
        for year in (1990..=2026).rev() {
            let value = estimate_car_value(Some("מאזדה"), Some(year), 2026).unwrap();
            assert!(value <= previous, "value rose at year {year}");
            assert!(value >= dec!(15000));
            previous = value;
        }
        assert_eq!(
            estimate_car_value(Some("מאזדה"), Some(1990), 2026).unwrap(),
            dec!(15000)
        );
    }

    #[test]
    fn real_estate_by_rooms_center() {
        let value = estimate_real_estate_value("דירת 4 חדרים בתל אביב", Some(dec!(4)), None).unwrap();
        assert_eq!(value, dec!(3200000));
    }

    #[test]
    fn real_estate_by_area_periphery() {
        let value = estimate_real_estate_value("מגרש בבאר שבע", None, Some(dec!(100))).unwrap();
        assert_eq!(value, dec!(1800000));
    }

    #[test]
    fn real_estate_rooms_take_precedence_over_area() {
        let value =
            estimate_real_estate_value("דירה בירושלים", Some(dec!(3.5)), Some(dec!(200))).unwrap();
        assert_eq!(value, dec!(2800000));
    }

    #[test]
    fn real_estate_default() {
        assert_eq!(
            estimate_real_estate_value("נכס", None, None).unwrap(),
            dec!(1500000)
        );
        assert_eq!(
            estimate_real_estate_value("נכס", Some(Decimal::ZERO), None).unwrap(),
            dec!(1500000)
        );
    }

    #[test]
    fn real_estate_overflow_is_an_error() {
        let result = estimate_real_estate_value("נכס", Some(Decimal::MAX), None);
        assert!(matches!(result, Err(EnrichError::Valuation(_))));
    }

    #[test]
    fn tier_detection() {
        assert_eq!(location_tier("דירה ברמת גן"), LocationTier::Center);
        assert_eq!(location_tier("דירה בת\"א"), LocationTier::Center);
        assert_eq!(location_tier("דירה בחיפה"), LocationTier::Periphery);
    }

    #[test]
    fn opening_price_only_replaced_when_zero() {
        assert_eq!(infer_opening_price(Decimal::ZERO, dec!(49041)), dec!(31876));
        assert_eq!(infer_opening_price(dec!(40000), dec!(49041)), dec!(40000));
    }

    #[test]
    fn negative_opening_price_is_treated_as_missing() {
        assert_eq!(infer_opening_price(dec!(-5000), dec!(49041)), dec!(31876));

        let deal = car(Some("שברולט ספארק"), Some(2019), dec!(-1));
        let mut rng = StdRng::seed_from_u64(7);
        let valuation = estimate(&deal, 2026, &mut rng).unwrap();
        assert_eq!(valuation.opening_price, dec!(31876));
        assert!(valuation.recommended_bid > Decimal::ZERO);
        assert!(valuation.historical_bids.iter().all(|b| *b > Decimal::ZERO));
    }

    #[test]
    fn bid_window_widens_narrow_spread() {
        let (low, high) = bid_window(dec!(10000), dec!(10500));
        assert_eq!(low, dec!(10050));
        assert_eq!(high, dec!(11050));
    }

    #[test]
    fn bids_sorted_counted_and_bounded() {
        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            let bids = synthesize_bids(dec!(31876), dec!(49041), &mut rng).unwrap();
            let (low, high) = bid_window(dec!(31876), dec!(49041));

            assert!((5..=8).contains(&bids.len()));
            assert!(bids.windows(2).all(|w| w[0] <= w[1]));
            for bid in &bids {
                assert!(*bid >= low && *bid <= high, "bid {bid} outside [{low}, {high}]");
                assert!((*bid % dec!(500)).is_zero());
            }
        }
    }

    #[test]
    fn bids_stay_inside_narrow_window() {
        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            let bids = synthesize_bids(dec!(10000), dec!(10500), &mut rng).unwrap();
            let (low, high) = bid_window(dec!(10000), dec!(10500));
            assert!(bids.iter().all(|b| *b >= low && *b <= high));
        }
    }

    #[test]
    fn no_bids_without_spread() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(synthesize_bids(Decimal::ZERO, dec!(50000), &mut rng)
            .unwrap()
            .is_empty());
        assert!(synthesize_bids(dec!(60000), dec!(50000), &mut rng)
            .unwrap()
            .is_empty());
        assert!(synthesize_bids(dec!(50000), dec!(50000), &mut rng)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn estimate_car_end_to_end() {
        let deal = car(Some("שברולט ספארק"), Some(2019), Decimal::ZERO);
        let mut rng = StdRng::seed_from_u64(7);
        let valuation = estimate(&deal, 2026, &mut rng).unwrap();

        assert_eq!(valuation.market_value, dec!(49041));
        assert_eq!(valuation.opening_price, dec!(31876));
        assert!((5..=8).contains(&valuation.historical_bids.len()));
        assert_eq!(valuation.recommended_bid, mean(&valuation.historical_bids));
    }

    #[test]
    fn estimate_keeps_supplied_opening_price() {
        let deal = car(Some("טויוטה"), Some(2024), dec!(90000));
        let mut rng = StdRng::seed_from_u64(7);
        let valuation = estimate(&deal, 2026, &mut rng).unwrap();
        assert_eq!(valuation.opening_price, dec!(90000));
    }

    #[test]
    fn estimate_without_spread_recommends_opening_price() {
        // supplied opening price above the estimate: no bid history
        let deal = car(None, Some(2010), dec!(80000));
        let mut rng = StdRng::seed_from_u64(7);
        let valuation = estimate(&deal, 2026, &mut rng).unwrap();
        assert!(valuation.historical_bids.is_empty());
        assert_eq!(valuation.recommended_bid, dec!(80000));
    }

    #[test]
    fn estimate_equipment_uses_fallback() {
        let deal = Deal::new("eq-1", DealCategory::Equipment, "מלגזה");
        let mut rng = StdRng::seed_from_u64(7);
        let valuation = estimate(&deal, 2026, &mut rng).unwrap();
        assert_eq!(valuation.market_value, dec!(25000));
        assert_eq!(valuation.opening_price, dec!(16250));
    }

    #[test]
    fn mean_rounds_to_cents() {
        assert_eq!(mean(&[dec!(500), dec!(1000), dec!(1000)]), dec!(833.33));
        assert_eq!(mean(&[]), Decimal::ZERO);
    }
}
