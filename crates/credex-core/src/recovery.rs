//! Error recovery and batch error reporting.
//!
//! `handle_extraction_error` is the boundary past which extraction
//! failures never propagate: it always returns an `ExtractionResult`,
//! possibly empty at zero confidence with the failure diagnostics
//! attached.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::confidence::{Confidence, tier};
use crate::error::ExtractionError;
use crate::models::{ExtractionResult, FieldKind, Severity};

/// Resolve a failed extraction.
///
/// Recovery order: a supplied retry closure runs once if the error is
/// recoverable, and its result is accepted only above the retry-accept
/// threshold; otherwise a supplied fallback value is used at low
/// confidence if it passes the field's structural check; otherwise an
/// empty result carries the failure reason and the derived recovery
/// strategies as diagnostics.
pub fn handle_extraction_error(
    error: ExtractionError,
    fallback_value: Option<&str>,
    retry: Option<&dyn Fn() -> ExtractionResult>,
) -> ExtractionResult {
    if error.is_recoverable() {
        if let Some(retry_fn) = retry {
            let mut retried = retry_fn();
            if retried.confidence.value() > tier::RETRY_ACCEPT {
                debug!(field = %error.field, "retry recovered the field");
                retried.metadata.recovered = true;
                return retried;
            }
        }
    }

    if let Some(fallback) = fallback_value {
        let structurally_valid = FieldKind::from_name(&error.field)
            .map(|kind| kind.is_structurally_valid(fallback))
            .unwrap_or(false);

        if structurally_valid {
            debug!(field = %error.field, fallback, "using fallback value");
            let mut result =
                ExtractionResult::found(fallback, Confidence::new(tier::FALLBACK_VALUE));
            result.metadata.fallback = true;
            return result;
        }
    }

    warn!(field = %error.field, reason = %error.reason, "field extraction unrecoverable");

    let mut result = ExtractionResult::empty().with_note(error.reason.clone());
    for strategy in error.recovery_strategies() {
        result = result.with_note(strategy.description());
    }
    result
}

/// Aggregated view over a batch of extraction errors.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorReport {
    pub total_errors: usize,
    pub warnings: usize,
    pub errors: usize,
    pub recoverable: usize,
    /// Error counts keyed by field name.
    pub by_field: BTreeMap<String, usize>,
    pub recommendations: Vec<String>,
}

/// Summarize a batch of extraction errors into counts and textual
/// recommendations.
pub fn summarize_errors(errors: &[ExtractionError]) -> ErrorReport {
    let mut report = ErrorReport {
        total_errors: errors.len(),
        ..Default::default()
    };

    for error in errors {
        match error.severity {
            Severity::Warning => report.warnings += 1,
            Severity::Error => report.errors += 1,
        }
        if error.is_recoverable() {
            report.recoverable += 1;
        }
        *report.by_field.entry(error.field.clone()).or_insert(0) += 1;
    }

    if report.errors > report.warnings {
        report
            .recommendations
            .push("document quality may be poor; consider OCR enhancement".to_string());
    }
    if report.recoverable > 0 {
        report.recommendations.push(format!(
            "{} error(s) may be recoverable by retrying with an alternate extraction method",
            report.recoverable
        ));
    }
    if let Some((field, count)) = report.by_field.iter().max_by_key(|(_, count)| **count) {
        if *count > 1 {
            report.recommendations.push(format!(
                "field '{field}' failed {count} times; manual review recommended"
            ));
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorContext;
    use crate::models::ExtractionMethod;

    fn warning_error(field: &str) -> ExtractionError {
        ExtractionError::new(field, "no pattern matched", Severity::Warning)
    }

    #[test]
    fn test_retry_accepted_above_threshold() {
        let retry = || ExtractionResult::found("705", Confidence::new(0.8));
        let result = handle_extraction_error(warning_error("credit_score"), None, Some(&retry));
        assert_eq!(result.value, "705");
        assert!(result.metadata.recovered);
    }

    #[test]
    fn test_weak_retry_rejected() {
        let retry = || ExtractionResult::found("705", Confidence::new(0.4));
        let result = handle_extraction_error(warning_error("credit_score"), None, Some(&retry));
        assert!(result.value.is_empty());
    }

    #[test]
    fn test_retry_skipped_for_unrecoverable_error() {
        let error = ExtractionError::new("pan", "malformed", Severity::Error);
        let retry = || ExtractionResult::found("ABCDE1234F", Confidence::new(0.9));
        // Unrecoverable, no fallback: the retry closure must not rescue it.
        let result = handle_extraction_error(error, None, Some(&retry));
        assert!(result.value.is_empty());
    }

    #[test]
    fn test_fallback_validated_structurally() {
        let result = handle_extraction_error(warning_error("credit_score"), Some("720"), None);
        assert_eq!(result.value, "720");
        assert_eq!(result.confidence, Confidence::new(tier::FALLBACK_VALUE));
        assert!(result.metadata.fallback);
    }

    #[test]
    fn test_invalid_fallback_rejected() {
        let result = handle_extraction_error(warning_error("credit_score"), Some("950"), None);
        assert!(result.value.is_empty());
        assert_eq!(result.confidence, Confidence::ZERO);
    }

    #[test]
    fn test_empty_result_carries_diagnostics() {
        let error = ExtractionError::new("pan", "no pattern matched", Severity::Error)
            .with_context(ErrorContext {
                method: Some(ExtractionMethod::Ocr),
                ..Default::default()
            });
        let result = handle_extraction_error(error, None, None);
        assert!(result.value.is_empty());
        assert!(
            result
                .metadata
                .notes
                .iter()
                .any(|n| n.contains("no pattern matched"))
        );
        assert!(
            result
                .metadata
                .notes
                .iter()
                .any(|n| n.contains("text-layer"))
        );
    }

    #[test]
    fn test_never_panics_for_any_combination() {
        let combos: Vec<(Option<&str>, bool)> = vec![
            (None, false),
            (None, true),
            (Some("720"), false),
            (Some("garbage"), true),
        ];
        for (fallback, with_retry) in combos {
            for severity in [Severity::Warning, Severity::Error] {
                let error = ExtractionError::new("credit_score", "failure", severity);
                let retry = || ExtractionResult::found("705", Confidence::new(0.9));
                let retry_ref: Option<&dyn Fn() -> ExtractionResult> =
                    if with_retry { Some(&retry) } else { None };
                let result = handle_extraction_error(error, fallback, retry_ref);
                assert!(result.confidence.value() >= 0.0);
            }
        }
    }

    #[test]
    fn test_summary_counts_and_recommendations() {
        let errors = vec![
            ExtractionError::new("credit_score", "out of range", Severity::Error),
            ExtractionError::new("pan", "malformed", Severity::Error),
            ExtractionError::new("pan", "malformed again", Severity::Error),
            warning_error("loan_count"),
        ];
        let report = summarize_errors(&errors);

        assert_eq!(report.total_errors, 4);
        assert_eq!(report.errors, 3);
        assert_eq!(report.warnings, 1);
        assert_eq!(report.by_field["pan"], 2);
        assert!(
            report
                .recommendations
                .iter()
                .any(|r| r.contains("document quality may be poor"))
        );
        assert!(report.recommendations.iter().any(|r| r.contains("'pan'")));
    }

    #[test]
    fn test_empty_batch_summary() {
        let report = summarize_errors(&[]);
        assert_eq!(report.total_errors, 0);
        assert!(report.recommendations.is_empty());
    }
}
