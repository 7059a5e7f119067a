//! Result types produced by the extraction engine.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::confidence::Confidence;
use crate::models::field::StatusSet;

/// How a field value was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    /// Regex rule matched against the document text.
    PatternMatch,
    /// Value came from the PDF text layer upstream.
    TextLayer,
    /// Value came from OCR upstream.
    Ocr,
    /// Combination of text layer and OCR.
    Hybrid,
    /// Extraction did not produce a value.
    Failed,
}

/// Diagnostic metadata attached to every extraction result.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatternMetadata {
    /// Human description of the rule that matched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    /// Byte offset of the match in the source text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,

    /// Surrounding text around the match, for diagnostics.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,

    /// The value was produced by a successful retry after a failure.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub recovered: bool,

    /// The value is a caller-supplied fallback, not an extraction.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub fallback: bool,

    /// Free-form diagnostic notes (e.g. suggested recovery strategies).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

/// One extracted field value with its provenance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// The extracted text value; empty when extraction failed.
    pub value: String,
    /// Confidence in the value.
    pub confidence: Confidence,
    /// How the value was obtained.
    pub method: ExtractionMethod,
    /// Diagnostic metadata.
    pub metadata: PatternMetadata,
}

impl ExtractionResult {
    /// A successful pattern-match result.
    pub fn found(value: impl Into<String>, confidence: Confidence) -> Self {
        Self {
            value: value.into(),
            confidence,
            method: ExtractionMethod::PatternMatch,
            metadata: PatternMetadata::default(),
        }
    }

    /// An empty result at zero confidence.
    pub fn empty() -> Self {
        Self {
            value: String::new(),
            confidence: Confidence::ZERO,
            method: ExtractionMethod::Failed,
            metadata: PatternMetadata::default(),
        }
    }

    /// Attach a diagnostic note.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.metadata.notes.push(note.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

/// How serious a data-quality issue is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    /// Value was recoverable by mechanical correction.
    Warning,
    /// Value violates a hard domain constraint.
    Error,
}

/// A structured note about a data-quality concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationFlag {
    /// The field the issue concerns.
    pub field: String,
    /// What is wrong.
    pub issue: String,
    /// How serious it is.
    pub severity: Severity,
    /// Optional remediation hint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl ValidationFlag {
    pub fn warning(field: impl Into<String>, issue: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            issue: issue.into(),
            severity: Severity::Warning,
            suggestion: None,
        }
    }

    pub fn error(field: impl Into<String>, issue: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            issue: issue.into(),
            severity: Severity::Error,
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

/// Outcome of validating and correcting one field value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Whether the (corrected) value satisfies the field's hard rules.
    pub is_valid: bool,
    /// The corrected value; on hard failure this is the original value,
    /// kept for audit.
    pub corrected_value: String,
    /// Confidence after correction penalties.
    pub confidence: Confidence,
    /// Issues found during validation.
    pub flags: Vec<ValidationFlag>,
    /// Remediation suggestions.
    pub suggestions: Vec<String>,
}

impl ValidationResult {
    /// A clean pass with no corrections.
    pub fn valid(value: impl Into<String>, confidence: Confidence) -> Self {
        Self {
            is_valid: true,
            corrected_value: value.into(),
            confidence,
            flags: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    /// A hard failure: confidence zeroed, original value kept.
    pub fn invalid(original: impl Into<String>, flag: ValidationFlag) -> Self {
        Self {
            is_valid: false,
            corrected_value: original.into(),
            confidence: Confidence::ZERO,
            flags: vec![flag],
            suggestions: Vec::new(),
        }
    }
}

/// Aggregate quality level for a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum QualityLevel {
    High,
    Medium,
    Low,
}

impl QualityLevel {
    /// Level thresholds on the 0–100 quality score.
    pub fn from_score(score: f32) -> Self {
        if score >= 80.0 {
            QualityLevel::High
        } else if score >= 60.0 {
            QualityLevel::Medium
        } else {
            QualityLevel::Low
        }
    }
}

/// Aggregate extraction quality for one document.
///
/// `overall_score` is on a 0–100 scale; per-field confidences are 0–1.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionQuality {
    pub overall_score: f32,
    pub fields_extracted: usize,
    pub total_fields: usize,
    pub quality_level: QualityLevel,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub validation_flags: Vec<ValidationFlag>,
}

/// Bureau-report format families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FormatFamily {
    /// Full report with account and enquiry sections.
    Detailed,
    /// Condensed summary report.
    Summary,
    /// Recognized report without a distinguishing family.
    Standard,
    /// Not recognized as a bureau report.
    Unknown,
}

/// Whether and how a document was recognized as a bureau report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub is_report: bool,
    pub confidence: Confidence,
    pub format: FormatFamily,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub matched_sections: Vec<String>,
}

impl ClassificationResult {
    /// A rejection: not a bureau report.
    pub fn rejected() -> Self {
        Self {
            is_report: false,
            confidence: Confidence::ZERO,
            format: FormatFamily::Unknown,
            version: None,
            matched_sections: Vec::new(),
        }
    }
}

/// Metadata supplied by the upstream text-acquisition pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcquisitionMetadata {
    pub total_pages: u32,
    pub pages_with_text: u32,
    #[serde(default)]
    pub ocr_pages_processed: u32,
    /// Upstream extraction confidence, 0–1.
    pub confidence: f32,
    pub extraction_method: AcquisitionMethod,
}

/// Which upstream acquisition path produced the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AcquisitionMethod {
    Text,
    Ocr,
    Both,
}

/// Per-field confidence scores, keyed by stable field name.
pub type FieldConfidenceMap = BTreeMap<String, Confidence>;

/// The extracted and corrected field values of one report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credit_score: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loan_count: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applicant_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pan: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_date: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub account_numbers: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bank_names: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub loan_types: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_loan_amount: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overdue_amount: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settled_amount: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sanctioned_amount: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outstanding_amount: Option<String>,
    #[serde(default)]
    pub legal_status: StatusSet,
}

/// The complete structured result for one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportExtraction {
    pub classification: ClassificationResult,
    pub fields: ReportFields,
    pub field_confidence: FieldConfidenceMap,
    pub quality: ExtractionQuality,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<ValidationFlag>,
    /// Which acquisition/extraction methods contributed.
    pub methods: Vec<ExtractionMethod>,
    /// Quality-driven processing recommendations.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recommendations: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quality_level_thresholds() {
        assert_eq!(QualityLevel::from_score(92.0), QualityLevel::High);
        assert_eq!(QualityLevel::from_score(80.0), QualityLevel::High);
        assert_eq!(QualityLevel::from_score(79.9), QualityLevel::Medium);
        assert_eq!(QualityLevel::from_score(60.0), QualityLevel::Medium);
        assert_eq!(QualityLevel::from_score(30.0), QualityLevel::Low);
    }

    #[test]
    fn test_empty_result() {
        let result = ExtractionResult::empty();
        assert!(result.is_empty());
        assert_eq!(result.confidence, Confidence::ZERO);
        assert_eq!(result.method, ExtractionMethod::Failed);
    }

    #[test]
    fn test_invalid_keeps_original_value() {
        let flag = ValidationFlag::error("credit_score", "score 950 outside 300-900");
        let result = ValidationResult::invalid("950", flag);
        assert!(!result.is_valid);
        assert_eq!(result.corrected_value, "950");
        assert_eq!(result.confidence, Confidence::ZERO);
    }

    #[test]
    fn test_serialization_round_trip() {
        let classification = ClassificationResult {
            is_report: true,
            confidence: Confidence::new(0.9),
            format: FormatFamily::Detailed,
            version: Some("2.0".to_string()),
            matched_sections: vec!["account summary".to_string()],
        };
        let json = serde_json::to_string(&classification).unwrap();
        let back: ClassificationResult = serde_json::from_str(&json).unwrap();
        assert!(back.is_report);
        assert_eq!(back.format, FormatFamily::Detailed);
    }
}
