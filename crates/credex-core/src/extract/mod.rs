//! Rule-based field extractors for bureau report text.
//!
//! Each field owns an ordered list of `PatternRule`s. Extraction
//! evaluates every rule against the full text (multi-line context to
//! labels is tolerated), discards structurally invalid candidates, and
//! keeps the match whose rule carries the highest static confidence
//! weight. Ties keep the first match found.

pub mod amount;
pub mod identity;
pub mod loans;
pub mod patterns;
pub mod score;
pub mod status;

pub use patterns::PatternRule;

use tracing::debug;

use crate::confidence::Confidence;
use crate::models::{ExtractionMethod, ExtractionResult, FieldKind, PatternMetadata};

/// Characters of surrounding text recorded with each match.
const CONTEXT_RADIUS: usize = 50;

/// A candidate match before ranking.
#[derive(Debug, Clone)]
struct Candidate {
    value: String,
    weight: f32,
    description: &'static str,
    start: usize,
    end: usize,
}

/// Evaluate a field's rules and keep the best structurally valid match.
pub fn extract_ranked(kind: FieldKind, rules: &[PatternRule], text: &str) -> ExtractionResult {
    let mut best: Option<Candidate> = None;

    for rule in rules {
        for caps in rule.pattern.captures_iter(text) {
            let group = caps.get(1).or_else(|| caps.get(0));
            let Some(group) = group else { continue };
            let value = group.as_str().trim();

            if !kind.is_structurally_valid(value) {
                continue;
            }

            // Strictly-greater keeps the first match on ties.
            if best.as_ref().is_none_or(|b| rule.weight > b.weight) {
                best = Some(Candidate {
                    value: value.to_string(),
                    weight: rule.weight,
                    description: rule.description,
                    start: group.start(),
                    end: group.end(),
                });
            }
        }
    }

    match best {
        Some(candidate) => {
            debug!(
                field = kind.name(),
                rule = candidate.description,
                confidence = candidate.weight,
                "field extracted"
            );
            ExtractionResult {
                value: candidate.value,
                confidence: Confidence::new(candidate.weight),
                method: ExtractionMethod::PatternMatch,
                metadata: PatternMetadata {
                    pattern: Some(candidate.description.to_string()),
                    position: Some(candidate.start),
                    context: Some(surrounding(text, candidate.start, candidate.end)),
                    ..Default::default()
                },
            }
        }
        None => ExtractionResult::empty(),
    }
}

/// Collect every structurally valid match across a field's rules,
/// deduplicated, in document order. Returns the values and the highest
/// contributing rule weight.
pub fn extract_all(kind: FieldKind, rules: &[PatternRule], text: &str) -> (Vec<String>, Confidence) {
    let mut values: Vec<String> = Vec::new();
    let mut confidence = Confidence::ZERO;

    for rule in rules {
        for caps in rule.pattern.captures_iter(text) {
            let Some(group) = caps.get(1).or_else(|| caps.get(0)) else {
                continue;
            };
            let value = group.as_str().trim();
            if !kind.is_structurally_valid(value) {
                continue;
            }
            if !values.iter().any(|v| v == value) {
                values.push(value.to_string());
            }
            confidence = confidence.max(Confidence::new(rule.weight));
        }
    }

    (values, confidence)
}

/// Slice up to `CONTEXT_RADIUS` characters either side of a match,
/// staying on char boundaries.
pub(crate) fn surrounding(text: &str, start: usize, end: usize) -> String {
    let from = floor_boundary(text, start.saturating_sub(CONTEXT_RADIUS));
    let to = ceil_boundary(text, (end + CONTEXT_RADIUS).min(text.len()));
    text[from..to].to_string()
}

fn floor_boundary(text: &str, mut idx: usize) -> usize {
    while idx > 0 && !text.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

fn ceil_boundary(text: &str, mut idx: usize) -> usize {
    while idx < text.len() && !text.is_char_boundary(idx) {
        idx += 1;
    }
    idx
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AmountCategory;

    #[test]
    fn test_higher_weight_rule_wins() {
        // Both the exact CIBIL label and the generic score label match;
        // the exact label's value must win.
        let text = "score: 640 and CIBIL Score: 710";
        let result = extract_ranked(FieldKind::CreditScore, &patterns::SCORE_RULES, text);
        assert_eq!(result.value, "710");
        assert!(result.confidence.value() >= 0.9);
    }

    #[test]
    fn test_invalid_candidates_never_surface() {
        let result =
            extract_ranked(FieldKind::CreditScore, &patterns::SCORE_RULES, "Score: 950");
        assert!(result.is_empty());
        assert_eq!(result.confidence, Confidence::ZERO);
    }

    #[test]
    fn test_no_match_returns_empty() {
        let result = extract_ranked(
            FieldKind::CreditScore,
            &patterns::SCORE_RULES,
            "nothing resembling the field",
        );
        assert!(result.is_empty());
        assert_eq!(result.method, ExtractionMethod::Failed);
    }

    #[test]
    fn test_context_recorded_around_match() {
        let text = "Your CIBIL Score: 698 as of March 2024";
        let result = extract_ranked(FieldKind::CreditScore, &patterns::SCORE_RULES, text);
        let context = result.metadata.context.as_deref().unwrap();
        assert!(context.contains("CIBIL Score"));
        assert!(context.contains("698"));
    }

    #[test]
    fn test_surrounding_respects_multibyte_boundaries() {
        let text = "₹₹₹₹ overdue amount: ₹5,000 ₹₹₹₹";
        // Positions chosen to land inside multi-byte characters.
        let slice = surrounding(text, 2, text.len() - 2);
        assert!(!slice.is_empty());
    }

    #[test]
    fn test_extract_all_dedups() {
        let text = "Account Number: HDFC00123456 ... account number: HDFC00123456";
        let (values, confidence) = extract_all(
            FieldKind::AccountNumber,
            &patterns::ACCOUNT_NUMBER_RULES,
            text,
        );
        assert_eq!(values, vec!["HDFC00123456".to_string()]);
        assert!(confidence.value() > 0.0);
    }

    #[test]
    fn test_amount_field_requires_parseable_value() {
        let result = extract_ranked(
            FieldKind::Amount(AmountCategory::Overdue),
            patterns::amount_rules(AmountCategory::Overdue),
            "Overdue amount: unknown",
        );
        assert!(result.is_empty());
    }
}
