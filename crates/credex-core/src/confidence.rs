//! Bounded confidence scores for extraction results.
//!
//! Per-field confidence lives on a 0.0–1.0 scale; the aggregate report
//! quality score lives on a 0–100 scale. Keeping the per-field scale
//! behind a newtype stops the two from being mixed at call sites.

use serde::{Deserialize, Serialize};

/// A confidence score clamped to the range [0.0, 1.0].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Confidence(f32);

impl Confidence {
    /// No confidence at all (extraction failed or value rejected).
    pub const ZERO: Confidence = Confidence(0.0);

    /// Full confidence.
    pub const FULL: Confidence = Confidence(1.0);

    /// Create a confidence score, clamping out-of-range input.
    pub fn new(value: f32) -> Self {
        Self(value.clamp(0.0, 1.0))
    }

    /// The raw score.
    pub fn value(self) -> f32 {
        self.0
    }

    /// Multiply by a correction penalty factor, staying in range.
    pub fn penalize(self, factor: f32) -> Self {
        Self::new(self.0 * factor)
    }

    /// Add a weight contribution, saturating at 1.0.
    pub fn boost(self, amount: f32) -> Self {
        Self::new(self.0 + amount)
    }

    /// The larger of two scores.
    pub fn max(self, other: Confidence) -> Self {
        if other.0 > self.0 { other } else { self }
    }
}

impl Default for Confidence {
    fn default() -> Self {
        Self::ZERO
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Named confidence tiers.
///
/// Every tier states where on the label-proximity ladder a match came
/// from, so tests assert on tiers instead of loose floats.
pub mod tier {
    /// The field's own label appeared immediately before the value
    /// ("CIBIL Score: 698").
    pub const EXACT_LABEL: f32 = 0.95;

    /// A strong but less specific label matched ("credit score", "number
    /// of accounts").
    pub const STRONG_LABEL: f32 = 0.9;

    /// The label and value were related but not adjacent, or the label
    /// was generic ("score").
    pub const CONTEXTUAL: f32 = 0.8;

    /// Value found by shape alone, with no label nearby.
    pub const STANDALONE: f32 = 0.7;

    /// Upper bound for any fallback heuristic; a guess derived from
    /// document structure must never outrank a pattern match.
    pub const STRUCTURAL_FALLBACK: f32 = 0.6;

    /// Counting long digit runs as a loan-count proxy.
    pub const DIGIT_SEQUENCE_FALLBACK: f32 = 0.5;

    /// Counting distinct bank mentions as a loan-count proxy; weakest
    /// heuristic, consulted last.
    pub const BANK_MENTION_FALLBACK: f32 = 0.4;

    /// Minimum confidence a retried extraction must reach to replace a
    /// failed one.
    pub const RETRY_ACCEPT: f32 = 0.5;

    /// Confidence assigned to a caller-supplied fallback value.
    pub const FALLBACK_VALUE: f32 = 0.3;

    /// Confidence for an optional field that was simply absent.
    pub const MISSING_OPTIONAL: f32 = 0.3;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamping() {
        assert_eq!(Confidence::new(1.5).value(), 1.0);
        assert_eq!(Confidence::new(-0.2).value(), 0.0);
        assert_eq!(Confidence::new(0.75).value(), 0.75);
    }

    #[test]
    fn test_penalize_stays_in_range() {
        let c = Confidence::new(0.9).penalize(0.8);
        assert!((c.value() - 0.72).abs() < 1e-6);
        assert_eq!(Confidence::ZERO.penalize(0.5), Confidence::ZERO);
    }

    #[test]
    fn test_boost_saturates() {
        assert_eq!(Confidence::new(0.9).boost(0.4), Confidence::FULL);
    }

    #[test]
    fn test_max() {
        let a = Confidence::new(0.6);
        let b = Confidence::new(0.9);
        assert_eq!(a.max(b), b);
        assert_eq!(b.max(a), b);
    }

    #[test]
    fn test_fallback_tiers_below_pattern_tiers() {
        assert!(tier::DIGIT_SEQUENCE_FALLBACK <= tier::STRUCTURAL_FALLBACK);
        assert!(tier::BANK_MENTION_FALLBACK < tier::DIGIT_SEQUENCE_FALLBACK);
        assert!(tier::STRUCTURAL_FALLBACK < tier::STANDALONE);
    }
}
