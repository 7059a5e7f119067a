//! Credit score extraction.

use super::{extract_ranked, patterns};
use crate::models::{ExtractionResult, FieldKind};

/// Extract the bureau credit score.
///
/// Only values in the 300–900 bureau range can surface; a labelled
/// out-of-range number is discarded, not corrected.
pub fn extract_credit_score(text: &str) -> ExtractionResult {
    extract_ranked(FieldKind::CreditScore, &patterns::SCORE_RULES, text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labelled_score() {
        let result = extract_credit_score("Your CIBIL Score: 698");
        assert_eq!(result.value, "698");
        assert!(result.confidence.value() >= 0.85);
    }

    #[test]
    fn test_score_keyword_after_value() {
        let result = extract_credit_score("698 CIBIL rating as of today");
        assert_eq!(result.value, "698");
    }

    #[test]
    fn test_out_of_range_score_rejected() {
        let result = extract_credit_score("Score: 950");
        assert!(result.is_empty());
        assert_eq!(result.confidence.value(), 0.0);
    }

    #[test]
    fn test_boundary_scores_accepted() {
        assert_eq!(extract_credit_score("score: 300").value, "300");
        assert_eq!(extract_credit_score("score: 900").value, "900");
    }
}
