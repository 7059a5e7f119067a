//! Error types for the extraction engine.
//!
//! `ExtractionError` is an internal carrier: it is created at the point a
//! field extraction fails and is consumed entirely by the recovery layer
//! before a field result is finalized. Public entry points return
//! result-with-diagnostics values, never `Err`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{ExtractionMethod, Severity, ValidationFlag};

/// Context captured at the point an extraction failed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorContext {
    /// The method that was being attempted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<ExtractionMethod>,

    /// Description of the rule in play, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    /// Byte offset where the failure occurred.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,

    /// Surrounding text for diagnostics.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surrounding_text: Option<String>,

    /// How many attempts have been made for this field.
    #[serde(default)]
    pub attempts: u32,

    /// Whether an alternate extraction method is known to exist.
    #[serde(default)]
    pub fallback_available: bool,
}

/// A failed field extraction, carried to the recovery layer.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
#[error("extraction of {field} failed: {reason}")]
pub struct ExtractionError {
    /// Stable field name.
    pub field: String,
    /// Why extraction failed.
    pub reason: String,
    /// Whether the failure is a hard constraint violation or recoverable.
    pub severity: Severity,
    /// The raw value that triggered the failure, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_value: Option<String>,
    /// When the failure occurred.
    pub timestamp: DateTime<Utc>,
    /// Failure-site context.
    pub context: ErrorContext,
}

impl ExtractionError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>, severity: Severity) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
            severity,
            original_value: None,
            timestamp: Utc::now(),
            context: ErrorContext::default(),
        }
    }

    pub fn with_original_value(mut self, value: impl Into<String>) -> Self {
        self.original_value = Some(value.into());
        self
    }

    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = context;
        self
    }

    /// Derive recovery strategies from the failure context.
    ///
    /// An OCR-origin failure suggests the text layer; a text-layer
    /// failure suggests OCR or hybrid; a named pattern suggests trying
    /// the other rules for the field; with no contextual hint at all,
    /// only manual verification remains.
    pub fn recovery_strategies(&self) -> Vec<RecoveryStrategy> {
        let mut strategies = Vec::new();

        match self.context.method {
            Some(ExtractionMethod::Ocr) => strategies.push(RecoveryStrategy::TextLayerExtraction),
            Some(ExtractionMethod::TextLayer) => {
                strategies.push(RecoveryStrategy::OcrExtraction);
                strategies.push(RecoveryStrategy::HybridExtraction);
            }
            _ => {}
        }

        if self.context.pattern.is_some() {
            strategies.push(RecoveryStrategy::AlternativePatterns);
        }

        if strategies.is_empty() {
            strategies.push(RecoveryStrategy::ManualVerification);
        }

        strategies
    }

    /// Whether the recovery layer may retry this failure.
    pub fn is_recoverable(&self) -> bool {
        self.severity == Severity::Warning
            || self.context.fallback_available
            || self.recovery_strategies().len() > 1
    }

    /// Convert into a validation flag for the final result.
    pub fn into_flag(self) -> ValidationFlag {
        let strategies = self.recovery_strategies();
        let mut flag = ValidationFlag {
            field: self.field,
            issue: self.reason,
            severity: self.severity,
            suggestion: None,
        };
        if let Some(strategy) = strategies.first() {
            flag.suggestion = Some(strategy.description().to_string());
        }
        flag
    }
}

/// A proposed way to recover from an extraction failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryStrategy {
    /// Re-run extraction against the PDF text layer.
    TextLayerExtraction,
    /// Re-run extraction against OCR output.
    OcrExtraction,
    /// Combine text layer and OCR output.
    HybridExtraction,
    /// Evaluate the field's remaining rules.
    AlternativePatterns,
    /// No automated path; a human has to look.
    ManualVerification,
}

impl RecoveryStrategy {
    pub fn description(self) -> &'static str {
        match self {
            RecoveryStrategy::TextLayerExtraction => "retry using text-layer extraction",
            RecoveryStrategy::OcrExtraction => "retry using OCR extraction",
            RecoveryStrategy::HybridExtraction => "retry combining text layer and OCR",
            RecoveryStrategy::AlternativePatterns => "try alternative extraction patterns",
            RecoveryStrategy::ManualVerification => "manual verification required",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ocr_failure_suggests_text_layer() {
        let error = ExtractionError::new("credit_score", "no pattern matched", Severity::Warning)
            .with_context(ErrorContext {
                method: Some(ExtractionMethod::Ocr),
                ..Default::default()
            });
        let strategies = error.recovery_strategies();
        assert!(strategies.contains(&RecoveryStrategy::TextLayerExtraction));
    }

    #[test]
    fn test_text_layer_failure_suggests_ocr_and_hybrid() {
        let error = ExtractionError::new("pan", "no pattern matched", Severity::Warning)
            .with_context(ErrorContext {
                method: Some(ExtractionMethod::TextLayer),
                ..Default::default()
            });
        let strategies = error.recovery_strategies();
        assert!(strategies.contains(&RecoveryStrategy::OcrExtraction));
        assert!(strategies.contains(&RecoveryStrategy::HybridExtraction));
    }

    #[test]
    fn test_named_pattern_suggests_alternatives() {
        let error = ExtractionError::new("credit_score", "match rejected", Severity::Error)
            .with_context(ErrorContext {
                pattern: Some("CIBIL score label".to_string()),
                ..Default::default()
            });
        assert!(
            error
                .recovery_strategies()
                .contains(&RecoveryStrategy::AlternativePatterns)
        );
    }

    #[test]
    fn test_no_context_requires_manual_verification() {
        let error = ExtractionError::new("pan", "empty input", Severity::Error);
        assert_eq!(
            error.recovery_strategies(),
            vec![RecoveryStrategy::ManualVerification]
        );
    }

    #[test]
    fn test_warning_severity_is_recoverable() {
        let error = ExtractionError::new("loan_count", "noisy value", Severity::Warning);
        assert!(error.is_recoverable());
    }

    #[test]
    fn test_error_without_hints_is_not_recoverable() {
        let error = ExtractionError::new("pan", "malformed", Severity::Error);
        assert!(!error.is_recoverable());
    }

    #[test]
    fn test_multiple_strategies_make_error_recoverable() {
        let error = ExtractionError::new("pan", "malformed", Severity::Error).with_context(
            ErrorContext {
                method: Some(ExtractionMethod::TextLayer),
                ..Default::default()
            },
        );
        assert!(error.is_recoverable());
    }
}
