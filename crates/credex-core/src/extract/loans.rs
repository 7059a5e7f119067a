//! Loan count extraction with structural fallbacks.

use std::collections::BTreeSet;

use tracing::debug;

use super::{extract_ranked, patterns};
use crate::confidence::{Confidence, tier};
use crate::models::{ExtractionMethod, ExtractionResult, FieldKind, PatternMetadata};

/// Extract the number of loans in the report.
///
/// Precedence is fixed: a named-label match wins outright; otherwise the
/// count of distinct long digit runs (account-number proxy) is used;
/// distinct bank mentions are consulted only when no digit runs exist.
/// A fallback-derived count never carries more than the structural
/// fallback tier.
pub fn extract_loan_count(text: &str) -> ExtractionResult {
    let labelled = extract_ranked(FieldKind::LoanCount, &patterns::LOAN_COUNT_RULES, text);
    if !labelled.is_empty() {
        return labelled;
    }

    if let Some(result) = digit_run_fallback(text) {
        return result;
    }

    bank_mention_fallback(text).unwrap_or_else(ExtractionResult::empty)
}

/// Count distinct long digit runs as a loan-count proxy.
fn digit_run_fallback(text: &str) -> Option<ExtractionResult> {
    let runs: BTreeSet<&str> = patterns::LONG_DIGIT_RUN
        .find_iter(text)
        .map(|m| m.as_str())
        .collect();

    let count = runs.len();
    if count == 0 || count > 50 {
        return None;
    }

    debug!(count, "loan count derived from distinct digit runs");
    Some(fallback_result(
        count,
        tier::DIGIT_SEQUENCE_FALLBACK,
        "distinct long digit runs",
    ))
}

/// Count distinct bank mentions as a loan-per-bank proxy.
fn bank_mention_fallback(text: &str) -> Option<ExtractionResult> {
    let mut banks: Vec<String> = Vec::new();
    for rule in patterns::BANK_NAME_RULES.iter() {
        for caps in rule.pattern.captures_iter(text) {
            if let Some(group) = caps.get(1) {
                let name = group.as_str().trim().to_lowercase();
                if !banks.contains(&name) {
                    banks.push(name);
                }
            }
        }
    }

    let count = banks.len();
    if count == 0 || count > 50 {
        return None;
    }

    debug!(count, "loan count derived from distinct bank mentions");
    Some(fallback_result(
        count,
        tier::BANK_MENTION_FALLBACK,
        "distinct bank mentions",
    ))
}

fn fallback_result(count: usize, weight: f32, source: &str) -> ExtractionResult {
    ExtractionResult {
        value: count.to_string(),
        confidence: Confidence::new(weight),
        method: ExtractionMethod::PatternMatch,
        metadata: PatternMetadata {
            pattern: Some(format!("count of {source}")),
            fallback: true,
            ..Default::default()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labelled_count_wins() {
        let text = "Number of loans in report: 3. Accounts: 1234567890123 9876543210987";
        let result = extract_loan_count(text);
        assert_eq!(result.value, "3");
        assert!(result.confidence.value() >= 0.9);
        assert!(!result.metadata.fallback);
    }

    #[test]
    fn test_digit_run_fallback() {
        let text = "a/c 1234567890123 and a/c 9876543210987 listed";
        let result = extract_loan_count(text);
        assert_eq!(result.value, "2");
        assert_eq!(result.confidence, Confidence::new(tier::DIGIT_SEQUENCE_FALLBACK));
        assert!(result.metadata.fallback);
    }

    #[test]
    fn test_digit_runs_deduplicated() {
        let text = "1234567890123 appears twice: 1234567890123";
        let result = extract_loan_count(text);
        assert_eq!(result.value, "1");
    }

    #[test]
    fn test_bank_mention_fallback_is_last() {
        let text = "Facilities from State Bank and HDFC Bank";
        let result = extract_loan_count(text);
        assert_eq!(result.value, "2");
        assert_eq!(result.confidence, Confidence::new(tier::BANK_MENTION_FALLBACK));
        assert!(result.metadata.fallback);
    }

    #[test]
    fn test_digit_runs_beat_bank_mentions() {
        let text = "HDFC Bank account 1234567890123";
        let result = extract_loan_count(text);
        assert_eq!(result.value, "1");
        assert_eq!(result.confidence, Confidence::new(tier::DIGIT_SEQUENCE_FALLBACK));
    }

    #[test]
    fn test_nothing_found_is_empty() {
        let result = extract_loan_count("no loan information at all");
        assert!(result.is_empty());
    }

    #[test]
    fn test_fallback_confidence_capped() {
        let text = "a/c 1234567890123";
        let result = extract_loan_count(text);
        assert!(result.confidence.value() <= tier::STRUCTURAL_FALLBACK);
    }
}
