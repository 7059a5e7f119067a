//! Core library for credit-bureau report analysis.
//!
//! This crate provides:
//! - Document classification (is this text a bureau report, which
//!   format family and version)
//! - Rule-based field extraction with calibrated confidence (credit
//!   score, loan counts, amounts, identity fields, legal status)
//! - Amount normalization with Indian magnitude units (crore, lakh,
//!   thousand)
//! - Field validation and mechanical correction with quality flags
//! - Error recovery and extraction-quality reporting
//!
//! The engine consumes already-extracted text; PDF parsing and OCR live
//! in the upstream acquisition pipeline, which hands over raw text plus
//! optional per-page metadata.

pub mod classify;
pub mod confidence;
pub mod error;
pub mod extract;
pub mod models;
pub mod pages;
pub mod parser;
pub mod recovery;
pub mod validate;

pub use classify::classify;
pub use confidence::{Confidence, tier};
pub use error::{ErrorContext, ExtractionError, RecoveryStrategy};
pub use extract::amount::normalize_amount;
pub use models::{
    AcquisitionMetadata, AcquisitionMethod, AmountCategory, ClassificationResult,
    ExtractionMethod, ExtractionQuality, ExtractionResult, FieldConfidenceMap, FieldKind,
    FormatFamily, LegalStatus, PatternMetadata, QualityLevel, ReportExtraction, ReportFields,
    Severity, StatusSet, ValidationFlag, ValidationResult,
};
pub use pages::{AggregatedReport, PageText, aggregate_pages, preprocess_text};
pub use parser::ReportParser;
pub use recovery::{ErrorReport, handle_extraction_error, summarize_errors};
pub use validate::validate_and_correct;
