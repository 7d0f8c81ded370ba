//! Title-to-attribute extraction.
//!
//! Every lookup table here is an ordered slice and is searched first-match
//! in table order. A title that mentions two known brands yields the one
//! listed first, regardless of where each appears in the title.

use std::str::FromStr;
use std::sync::LazyLock;

use bidwise_models::attributes::{
    AttributePatch, CarAttributes, EquipmentAttributes, RealEstateAttributes,
};
use bidwise_models::DealCategory;
use regex::Regex;
use rust_decimal::Decimal;

/// Car brands as they appear in Hebrew listing titles, in priority order.
pub const CAR_BRANDS: &[&str] = &[
    "שברולט",
    "יונדאי",
    "מאזדה",
    "טויוטה",
    "קיה",
    "רנו",
    "פיג'ו",
    "סיטרואן",
    "פורד",
    "סובארו",
    "סוזוקי",
    "מיצובישי",
    "ניסאן",
    "הונדה",
    "פולקסווגן",
    "סקודה",
    "סיאט",
    "אאודי",
    "מזראטי",
    "ב.מ.וו",
    "מרצדס",
    "טסלה",
];

/// Equipment keyword → taxonomy label. More specific keywords come before
/// the keywords they contain (מחפרון before מחפר).
pub const EQUIPMENT_CATEGORIES: &[(&str, &str)] = &[
    ("מלגזה", "forklift"),
    ("forklift", "forklift"),
    ("מחפרון", "backhoe_loader"),
    ("backhoe", "backhoe_loader"),
    ("באגר", "excavator"),
    ("מחפר", "excavator"),
    ("excavator", "excavator"),
    ("טרקטור", "tractor"),
    ("tractor", "tractor"),
    ("מנוף", "crane"),
    ("crane", "crane"),
    ("גנרטור", "generator"),
    ("generator", "generator"),
    ("מדחס", "compressor"),
    ("compressor", "compressor"),
    ("משאית", "truck"),
    ("truck", "truck"),
    ("נגרר", "trailer"),
    ("trailer", "trailer"),
    ("מכונת", "machinery"),
    ("ציוד", "general_equipment"),
];

/// Equipment brand needle → canonical brand name, in priority order.
pub const EQUIPMENT_BRANDS: &[(&str, &str)] = &[
    ("caterpillar", "Caterpillar"),
    ("קטרפילר", "Caterpillar"),
    ("john deere", "John Deere"),
    ("ג'ון דיר", "John Deere"),
    ("komatsu", "Komatsu"),
    ("קומטסו", "Komatsu"),
    ("jcb", "JCB"),
    ("bobcat", "Bobcat"),
    ("בובקט", "Bobcat"),
    ("hitachi", "Hitachi"),
    ("היטאצ'י", "Hitachi"),
    ("volvo", "Volvo"),
    ("וולוו", "Volvo"),
    ("doosan", "Doosan"),
    ("liebherr", "Liebherr"),
    ("manitou", "Manitou"),
    ("linde", "Linde"),
    ("toyota", "Toyota"),
    ("טויוטה", "Toyota"),
    ("hyundai", "Hyundai"),
    ("יונדאי", "Hyundai"),
    ("atlas copco", "Atlas Copco"),
];

static YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(199\d|20[0-2]\d)\b").expect("year regex"));

static BRAND_MODEL_RES: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    CAR_BRANDS
        .iter()
        .map(|brand| {
            let pattern = format!(r"{}\s+([א-ת0-9A-Za-z]+)", regex::escape(brand));
            (*brand, Regex::new(&pattern).expect("brand model regex"))
        })
        .collect()
});

static ROOMS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(\d+(?:[.,]\d)?)\s*(?:חדרים|חד'|חד׳)"#).expect("rooms regex")
});

static AREA_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(\d+(?:[.,]\d)?)\s*(?:מ"ר|מטר|מ׳|מ'ר)"#).expect("area regex")
});

/// Extract category-specific attributes from a listing title.
/// Never fails: anything that cannot be resolved is left as `None`.
pub fn extract(category: DealCategory, title: &str) -> AttributePatch {
    match category {
        DealCategory::Car => AttributePatch::Car(extract_car(title)),
        DealCategory::RealEstate => AttributePatch::RealEstate(extract_real_estate(title)),
        DealCategory::Equipment => AttributePatch::Equipment(extract_equipment(title)),
    }
}

pub fn extract_car(title: &str) -> CarAttributes {
    let year = YEAR_RE
        .captures(title)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<i32>().ok());

    let model = BRAND_MODEL_RES
        .iter()
        .find(|(brand, _)| title.contains(brand))
        .map(|(brand, re)| match re.captures(title).and_then(|caps| caps.get(1)) {
            Some(token) => format!("{brand} {}", token.as_str()),
            None => (*brand).to_string(),
        });

    CarAttributes { year, model }
}

/// City is deliberately not extracted; location arrives with the listing.
pub fn extract_real_estate(title: &str) -> RealEstateAttributes {
    RealEstateAttributes {
        rooms: first_number(&ROOMS_RE, title),
        area_sqm: first_number(&AREA_RE, title),
    }
}

pub fn extract_equipment(title: &str) -> EquipmentAttributes {
    let lowered = title.to_lowercase();

    let category = EQUIPMENT_CATEGORIES
        .iter()
        .find(|(keyword, _)| lowered.contains(&keyword.to_lowercase()))
        .map(|(_, label)| (*label).to_string());

    let brand = EQUIPMENT_BRANDS
        .iter()
        .find(|(needle, _)| lowered.contains(&needle.to_lowercase()))
        .map(|(_, name)| (*name).to_string());

    EquipmentAttributes { category, brand }
}

/// First captured number for `re`. A match that is not a plain decimal
/// (e.g. "3,5") is treated as no match.
fn first_number(re: &Regex, title: &str) -> Option<Decimal> {
    let caps = re.captures(title)?;
    Decimal::from_str(caps.get(1)?.as_str()).ok()
}
