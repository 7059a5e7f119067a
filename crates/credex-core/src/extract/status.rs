//! Legal, default, and settlement status detection.
//!
//! Unlike scalar fields, status extraction keeps every matching
//! indicator: a report can be simultaneously written-off and settled.
//! The set's confidence is the maximum of the contributing indicator
//! weights, so one strong indicator is not diluted by weak ones.

use tracing::debug;

use super::patterns;
use crate::confidence::Confidence;
use crate::models::StatusSet;

/// Evaluate every status indicator against the text.
pub fn extract_legal_status(text: &str) -> StatusSet {
    let mut set = StatusSet::default();

    for (status, rule) in patterns::STATUS_INDICATORS.iter() {
        if rule.pattern.is_match(text) {
            debug!(status = %status, rule = rule.description, "status indicator matched");
            set.insert(*status, Confidence::new(rule.weight));
        }
    }

    set
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LegalStatus;

    #[test]
    fn test_suit_filed_detected_at_high_confidence() {
        let set = extract_legal_status("Suit filed: Yes");
        assert!(set.contains(LegalStatus::SuitFiled));
        assert!(set.confidence.value() >= 0.9);
    }

    #[test]
    fn test_multiple_indicators_retained() {
        let set = extract_legal_status("account written-off and later settled");
        assert!(set.contains(LegalStatus::WrittenOff));
        assert!(set.contains(LegalStatus::Settled));
    }

    #[test]
    fn test_confidence_is_max_not_average() {
        // Settled (0.85) plus suit filed (0.95): one strong indicator
        // must not be averaged down.
        let set = extract_legal_status("settled after suit filed");
        assert_eq!(set.confidence, Confidence::new(0.95));
    }

    #[test]
    fn test_wilful_default_also_flags_default() {
        let set = extract_legal_status("declared wilful default");
        assert!(set.contains(LegalStatus::WilfulDefault));
        assert!(set.contains(LegalStatus::Defaulted));
    }

    #[test]
    fn test_clean_text_yields_empty_set() {
        let set = extract_legal_status("all accounts active and regular");
        assert!(set.is_empty());
        assert_eq!(set.confidence, Confidence::ZERO);
    }
}
