//! Monetary amount normalization and category extraction.
//!
//! Bureau reports quote amounts with Indian magnitude units (crore,
//! lakh, thousand) in a mix of spellings, or with no unit at all.
//! Normalization produces one canonical rendering: `₹` + two-decimal
//! value + a single unit suffix, the suffix omitted only below 1,000.

use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;

use super::{extract_ranked, patterns};
use crate::models::{AmountCategory, ExtractionResult, FieldKind};

/// Magnitude unit of a normalized amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Magnitude {
    Crore,
    Lakh,
    Thousand,
    Unit,
}

impl Magnitude {
    /// Canonical suffix, empty for sub-thousand values.
    pub fn suffix(self) -> &'static str {
        match self {
            Magnitude::Crore => "Cr",
            Magnitude::Lakh => "L",
            Magnitude::Thousand => "K",
            Magnitude::Unit => "",
        }
    }

    fn divisor(self) -> Decimal {
        match self {
            Magnitude::Crore => Decimal::from(10_000_000u64),
            Magnitude::Lakh => Decimal::from(100_000u64),
            Magnitude::Thousand => Decimal::from(1_000u64),
            Magnitude::Unit => Decimal::ONE,
        }
    }

    /// Pick a magnitude from a raw (unsuffixed) value using the fixed
    /// size thresholds.
    fn for_value(value: Decimal) -> Self {
        if value >= Decimal::from(10_000_000u64) {
            Magnitude::Crore
        } else if value >= Decimal::from(100_000u64) {
            Magnitude::Lakh
        } else if value >= Decimal::from(1_000u64) {
            Magnitude::Thousand
        } else {
            Magnitude::Unit
        }
    }

    fn from_token(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().trim_end_matches('.') {
            "cr" | "crore" | "crores" => Some(Magnitude::Crore),
            "l" | "lakh" | "lakhs" => Some(Magnitude::Lakh),
            "k" | "thousand" => Some(Magnitude::Thousand),
            _ => None,
        }
    }
}

lazy_static! {
    static ref AMOUNT_SHAPE: Regex = Regex::new(
        r"(?i)^(?:rs\.?|inr|₹)?\s*([0-9][0-9,]*(?:\.[0-9]+)?)\s*(crores?|cr\.?|lakhs?|l|thousand|k)?\s*$"
    )
    .unwrap();
    static ref AMOUNT_ANYWHERE: Regex = Regex::new(
        r"(?i)(?:rs\.?\s*|inr\s*|₹\s*)?[0-9][0-9,]*(?:\.[0-9]+)?(?:\s*(?:crores?|cr|lakhs?|l|thousand|k)\b)?"
    )
    .unwrap();
}

/// Normalize a raw amount string to the canonical rendering.
///
/// Returns `None` for anything that does not contain a parseable
/// numeric amount; callers treat that as "amount not found". The
/// operation is idempotent: normalizing an already-canonical amount
/// reproduces it.
pub fn normalize_amount(raw: &str) -> Option<String> {
    let caps = AMOUNT_SHAPE.captures(raw.trim())?;

    let digits = caps[1].replace(',', "");
    let value = Decimal::from_str(&digits).ok()?;

    let (scaled, magnitude) = match caps.get(2) {
        Some(token) => {
            let magnitude = Magnitude::from_token(token.as_str())?;
            (value, magnitude)
        }
        None => {
            let magnitude = Magnitude::for_value(value);
            (value / magnitude.divisor(), magnitude)
        }
    };

    let suffix = magnitude.suffix();
    if suffix.is_empty() {
        Some(format!("₹{:.2}", scaled))
    } else {
        Some(format!("₹{:.2} {}", scaled, suffix))
    }
}

/// Find the first amount-shaped substring in noisy text and normalize
/// it. Used by the validation layer to re-derive amounts the patterns
/// captured with surrounding noise.
pub fn find_amount(text: &str) -> Option<String> {
    AMOUNT_ANYWHERE
        .find(text)
        .and_then(|m| normalize_amount(m.as_str()))
}

/// Extract one amount category from report text.
///
/// The winning candidate is stored in normalized form, so every amount
/// in a result carries exactly one magnitude suffix.
pub fn extract_amount(category: AmountCategory, text: &str) -> ExtractionResult {
    let mut result = extract_ranked(
        FieldKind::Amount(category),
        patterns::amount_rules(category),
        text,
    );

    if !result.is_empty() {
        // Structural validity guarantees the raw match normalizes.
        if let Some(normalized) = normalize_amount(&result.value) {
            result.value = normalized;
        }
    }

    result
}
