use regex::Regex;
use tracing::debug;

use crate::error::EnrichError;

/// Phrases in tender documents that signal a problem with the asset:
/// structural or mechanical damage, occupancy, illegal construction and
/// legal encumbrances.
pub const RISK_KEYWORDS: &[&str] = &[
    "פגיעת שלדה",
    "שאסי",
    "אובדן להלכה",
    "טוטאל לוס",
    "עבר תאונה",
    "נזילת שמן",
    "מנוע רועש",
    "בעיה בגיר",
    "פולש",
    "חריגות בניה",
    "צו הריסה",
    "ללא היתר",
    "מושכר",
    "בעיות רטיבות",
    "שריפה",
    "שעבוד",
    "עיקול",
];

/// Whole-word keyword matcher over extracted document text.
pub struct RiskScanner {
    patterns: Vec<(String, Regex)>,
}

impl RiskScanner {
    /// Build a scanner for the built-in keywords followed by `extra_keywords`.
    /// Blank and repeated keywords are skipped.
    pub fn new(extra_keywords: &[String]) -> Result<Self, EnrichError> {
        let mut patterns: Vec<(String, Regex)> = Vec::new();
        let keywords = RISK_KEYWORDS
            .iter()
            .map(|k| k.to_string())
            .chain(extra_keywords.iter().map(|k| k.trim().to_string()));

        for keyword in keywords {
            if keyword.is_empty() || patterns.iter().any(|(k, _)| *k == keyword) {
                continue;
            }
            let re = Regex::new(&keyword_pattern(&keyword))?;
            patterns.push((keyword, re));
        }

        Ok(Self { patterns })
    }

    /// Every keyword found in `text`, in keyword order. Empty text yields
    /// no flags.
    pub fn scan(&self, text: &str) -> Vec<String> {
        if text.trim().is_empty() {
            debug!("Empty document text, no risk flags");
            return Vec::new();
        }

        self.patterns
            .iter()
            .filter(|(_, re)| re.is_match(text))
            .map(|(keyword, _)| keyword.clone())
            .collect()
    }

    pub fn keyword_count(&self) -> usize {
        self.patterns.len()
    }
}

/// Escaped keyword with a word boundary on each side that starts or ends
/// with a word character. A boundary next to punctuation could never match.
fn keyword_pattern(keyword: &str) -> String {
    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    let lead = if keyword.starts_with(is_word) { r"\b" } else { "" };
    let trail = if keyword.ends_with(is_word) { r"\b" } else { "" };
    format!("{lead}{}{trail}", regex::escape(keyword))
}
