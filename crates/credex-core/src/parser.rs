//! Top-level report parsing: classification gate, field extraction,
//! validation, and quality scoring.

use tracing::{debug, info};

use crate::classify::classify;
use crate::confidence::{Confidence, tier};
use crate::error::{ErrorContext, ExtractionError};
use crate::extract::{amount, identity, loans, score, status};
use crate::models::{
    AcquisitionMetadata, AcquisitionMethod, AmountCategory, ExtractionMethod, ExtractionQuality,
    ExtractionResult, FieldConfidenceMap, FieldKind, QualityLevel, ReportExtraction, ReportFields,
    Severity, ValidationFlag,
};
use crate::pages::{self, PageText};
use crate::recovery::{handle_extraction_error, summarize_errors};
use crate::validate::validate_and_correct;

/// Weight of average field confidence in the overall quality score; the
/// remainder comes from field completeness.
const QUALITY_CONFIDENCE_WEIGHT: f32 = 0.6;

/// Parser for credit-bureau report text.
pub struct ReportParser {
    /// Whether to repair OCR artifacts and normalize currency spellings
    /// before extraction.
    preprocess: bool,
    /// Whether a negative classification short-circuits field
    /// extraction.
    gate_on_classification: bool,
}

impl ReportParser {
    /// Create a parser with default settings.
    pub fn new() -> Self {
        Self {
            preprocess: true,
            gate_on_classification: true,
        }
    }

    /// Set text preprocessing.
    pub fn with_preprocessing(mut self, preprocess: bool) -> Self {
        self.preprocess = preprocess;
        self
    }

    /// Set whether classification gates extraction.
    pub fn with_classification_gate(mut self, gate: bool) -> Self {
        self.gate_on_classification = gate;
        self
    }

    /// Parse report text without acquisition metadata.
    pub fn parse(&self, text: &str) -> ReportExtraction {
        self.parse_with_metadata(text, None)
    }

    /// Parse report text with metadata from the acquisition pipeline.
    pub fn parse_with_metadata(
        &self,
        text: &str,
        metadata: Option<&AcquisitionMetadata>,
    ) -> ReportExtraction {
        let prepared;
        let text = if self.preprocess {
            prepared = pages::preprocess_text(text);
            prepared.as_str()
        } else {
            text
        };

        info!(chars = text.len(), "parsing report text");

        let classification = classify(text);
        let methods = derive_methods(metadata);

        if self.gate_on_classification && !classification.is_report {
            // A recognized non-report must not yield field values at all.
            debug!("classification rejected the document; skipping extraction");
            return rejected_extraction(classification, methods);
        }

        let mut fields = ReportFields::default();
        let mut confidence_map = FieldConfidenceMap::new();
        let mut flags: Vec<ValidationFlag> = Vec::new();
        let mut errors: Vec<ExtractionError> = Vec::new();

        let scalar_results: Vec<(FieldKind, ExtractionResult)> = {
            let mut results = vec![
                (FieldKind::CreditScore, score::extract_credit_score(text)),
                (FieldKind::LoanCount, loans::extract_loan_count(text)),
                (FieldKind::ApplicantName, identity::extract_applicant_name(text)),
                (FieldKind::Pan, identity::extract_pan(text)),
                (FieldKind::ReportDate, identity::extract_report_date(text)),
            ];
            for category in AmountCategory::ALL {
                results.push((
                    FieldKind::Amount(category),
                    amount::extract_amount(category, text),
                ));
            }
            results
        };

        for (kind, result) in scalar_results {
            let (value, confidence) =
                self.finalize_field(kind, result, metadata, &mut flags, &mut errors);
            confidence_map.insert(kind.name().to_string(), confidence);
            assign_field(&mut fields, kind, value);
        }

        // List fields.
        let (account_numbers, account_confidence) = identity::extract_account_numbers(text);
        confidence_map.insert("account_number".to_string(), account_confidence);
        fields.account_numbers = account_numbers;

        let (bank_names, bank_confidence) = identity::extract_bank_names(text);
        confidence_map.insert("bank_name".to_string(), bank_confidence);
        fields.bank_names = bank_names;

        let loan_types = identity::extract_loan_types(text);
        let loan_type_confidence = if loan_types.is_empty() {
            Confidence::ZERO
        } else {
            Confidence::new(tier::CONTEXTUAL)
        };
        confidence_map.insert("loan_type".to_string(), loan_type_confidence);
        fields.loan_types = loan_types;

        // Status indicators.
        let status_set = status::extract_legal_status(text);
        let status_confidence = if status_set.is_empty() {
            Confidence::new(tier::MISSING_OPTIONAL)
        } else {
            status_set.confidence
        };
        confidence_map.insert("legal_status".to_string(), status_confidence);
        fields.legal_status = status_set;

        let quality = compute_quality(&confidence_map, &flags);
        let mut recommendations = derive_recommendations(&quality, metadata);
        recommendations.extend(summarize_errors(&errors).recommendations);

        debug!(
            score = quality.overall_score,
            fields = quality.fields_extracted,
            flags = flags.len(),
            "report parsed"
        );

        ReportExtraction {
            classification,
            fields,
            field_confidence: confidence_map,
            quality,
            flags,
            methods,
            recommendations,
        }
    }

    /// Parse a multi-page report, consolidating data across pages.
    pub fn parse_pages(
        &self,
        pages: &[PageText],
        metadata: Option<&AcquisitionMetadata>,
    ) -> ReportExtraction {
        let aggregated = pages::aggregate_pages(pages);
        let mut extraction = self.parse_with_metadata(&aggregated.combined_text, metadata);

        // Per-page account extraction can see numbers the stitched text
        // extraction missed at page seams.
        for number in aggregated.account_numbers {
            if !extraction.fields.account_numbers.contains(&number) {
                extraction.fields.account_numbers.push(number);
            }
        }

        extraction
    }

    /// Validate an extraction result and fold diagnostics into the
    /// running flag and error lists.
    fn finalize_field(
        &self,
        kind: FieldKind,
        result: ExtractionResult,
        metadata: Option<&AcquisitionMetadata>,
        flags: &mut Vec<ValidationFlag>,
        errors: &mut Vec<ExtractionError>,
    ) -> (Option<String>, Confidence) {
        if result.is_empty() {
            if kind.is_optional() {
                // Absence of an optional field is accepted with its
                // default value at the missing-optional tier.
                let validation = validate_and_correct(kind, "", Confidence::ZERO);
                return (Some(validation.corrected_value), validation.confidence);
            }

            let error = ExtractionError::new(kind.name(), "no pattern matched", Severity::Warning)
                .with_context(ErrorContext {
                    method: Some(primary_method(metadata)),
                    ..Default::default()
                });
            errors.push(error.clone());

            let diagnostic = handle_extraction_error(error.clone(), None, None);
            flags.push(error.into_flag());
            return (None, diagnostic.confidence);
        }

        let validation = validate_and_correct(kind, &result.value, result.confidence);
        flags.extend(validation.flags.clone());

        if validation.is_valid {
            (Some(validation.corrected_value), validation.confidence)
        } else {
            errors.push(
                ExtractionError::new(
                    kind.name(),
                    validation
                        .flags
                        .first()
                        .map(|f| f.issue.clone())
                        .unwrap_or_else(|| "validation failed".to_string()),
                    Severity::Error,
                )
                .with_original_value(result.value),
            );
            (None, Confidence::ZERO)
        }
    }
}

impl Default for ReportParser {
    fn default() -> Self {
        Self::new()
    }
}

fn assign_field(fields: &mut ReportFields, kind: FieldKind, value: Option<String>) {
    match kind {
        FieldKind::CreditScore => fields.credit_score = value,
        FieldKind::LoanCount => fields.loan_count = value,
        FieldKind::ApplicantName => fields.applicant_name = value,
        FieldKind::Pan => fields.pan = value,
        FieldKind::ReportDate => fields.report_date = value,
        FieldKind::Amount(AmountCategory::TotalLoan) => fields.total_loan_amount = value,
        FieldKind::Amount(AmountCategory::Overdue) => fields.overdue_amount = value,
        FieldKind::Amount(AmountCategory::Settled) => fields.settled_amount = value,
        FieldKind::Amount(AmountCategory::Sanctioned) => fields.sanctioned_amount = value,
        FieldKind::Amount(AmountCategory::Outstanding) => fields.outstanding_amount = value,
        FieldKind::AccountNumber | FieldKind::LegalStatus => {}
    }
}

/// Which upstream methods contributed, derived from the acquisition
/// metadata. Pattern matching always contributes.
fn derive_methods(metadata: Option<&AcquisitionMetadata>) -> Vec<ExtractionMethod> {
    match metadata.map(|m| m.extraction_method) {
        None => vec![ExtractionMethod::PatternMatch],
        Some(AcquisitionMethod::Text) => {
            vec![ExtractionMethod::TextLayer, ExtractionMethod::PatternMatch]
        }
        Some(AcquisitionMethod::Ocr) => {
            vec![ExtractionMethod::Ocr, ExtractionMethod::PatternMatch]
        }
        Some(AcquisitionMethod::Both) => vec![
            ExtractionMethod::TextLayer,
            ExtractionMethod::Ocr,
            ExtractionMethod::Hybrid,
            ExtractionMethod::PatternMatch,
        ],
    }
}

fn primary_method(metadata: Option<&AcquisitionMetadata>) -> ExtractionMethod {
    match metadata.map(|m| m.extraction_method) {
        Some(AcquisitionMethod::Ocr) => ExtractionMethod::Ocr,
        Some(AcquisitionMethod::Both) => ExtractionMethod::Hybrid,
        _ => ExtractionMethod::TextLayer,
    }
}

/// Overall quality: average field confidence weighted with field
/// completeness, projected onto the 0–100 scale.
fn compute_quality(
    confidence_map: &FieldConfidenceMap,
    flags: &[ValidationFlag],
) -> ExtractionQuality {
    let total_fields = confidence_map.len();
    let fields_extracted = confidence_map
        .values()
        .filter(|confidence| confidence.value() > tier::MISSING_OPTIONAL)
        .count();

    let (average, completeness) = if total_fields == 0 {
        (0.0, 0.0)
    } else {
        let sum: f32 = confidence_map.values().map(|c| c.value()).sum();
        (
            sum / total_fields as f32,
            fields_extracted as f32 / total_fields as f32,
        )
    };

    let overall_score =
        (average * QUALITY_CONFIDENCE_WEIGHT + completeness * (1.0 - QUALITY_CONFIDENCE_WEIGHT))
            * 100.0;

    ExtractionQuality {
        overall_score,
        fields_extracted,
        total_fields,
        quality_level: QualityLevel::from_score(overall_score),
        validation_flags: flags.to_vec(),
    }
}

fn derive_recommendations(
    quality: &ExtractionQuality,
    metadata: Option<&AcquisitionMetadata>,
) -> Vec<String> {
    let mut recommendations = Vec::new();

    if quality.overall_score < 70.0 {
        recommendations
            .push("consider OCR enhancement for better text recognition".to_string());
    }

    if let Some(meta) = metadata {
        if meta.total_pages > 0 {
            let coverage = meta.pages_with_text as f32 / meta.total_pages as f32;
            if coverage < 0.8 {
                recommendations
                    .push("some pages may be image-based; OCR processing recommended".to_string());
            }
        }
    }

    if quality.total_fields > 0 {
        let completeness = quality.fields_extracted as f32 / quality.total_fields as f32;
        if completeness < 0.7 {
            recommendations
                .push("manual review recommended for missing data fields".to_string());
        }
    }

    recommendations
}

fn rejected_extraction(
    classification: crate::models::ClassificationResult,
    methods: Vec<ExtractionMethod>,
) -> ReportExtraction {
    let flag = ValidationFlag::warning(
        "document",
        "text was not recognized as a credit bureau report; extraction skipped",
    );

    ReportExtraction {
        classification,
        fields: ReportFields::default(),
        field_confidence: FieldConfidenceMap::new(),
        quality: ExtractionQuality {
            overall_score: 0.0,
            fields_extracted: 0,
            total_fields: 0,
            quality_level: QualityLevel::Low,
            validation_flags: vec![flag.clone()],
        },
        flags: vec![flag],
        methods,
        recommendations: vec![
            "document may not be a standard credit bureau report".to_string(),
        ],
    }
}
