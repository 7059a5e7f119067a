//! Data models for report extraction results.

pub mod field;
pub mod report;

pub use field::{AmountCategory, FieldKind, LegalStatus, StatusSet};
pub use report::{
    AcquisitionMetadata, AcquisitionMethod, ClassificationResult, ExtractionMethod,
    ExtractionQuality, ExtractionResult, FieldConfidenceMap, FormatFamily, PatternMetadata,
    QualityLevel, ReportExtraction, ReportFields, Severity, ValidationFlag, ValidationResult,
};
