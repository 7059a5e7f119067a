//! Document classification: is this text a credit-bureau report, and if
//! so, which format family and version.
//!
//! Scoring is built from three pattern groups: identification patterns
//! (the single best match sets the base score), structural sections
//! (each adds to the base, never replaces it), and exclusion patterns
//! (any match forces rejection, whatever else matched). OCR-degraded
//! text falls back to a reduced-confidence pattern group when the
//! primary patterns find nothing.

use tracing::debug;

use crate::confidence::Confidence;
use crate::extract::patterns;
use crate::models::{ClassificationResult, FormatFamily};

/// Minimum overall score for a positive classification.
const MIN_REPORT_CONFIDENCE: f32 = 0.5;

/// Minimum distinguishing-phrase matches before a format family is
/// assigned; one incidental phrase must not decide the family.
const MIN_FAMILY_MARKERS: usize = 2;

/// Classify report text.
pub fn classify(text: &str) -> ClassificationResult {
    // Exclusions dominate: a salary slip that happens to mention a
    // credit score is still a salary slip.
    for rule in patterns::EXCLUSION_RULES.iter() {
        if rule.pattern.is_match(text) {
            debug!(matched = rule.description, "exclusion pattern fired");
            return ClassificationResult::rejected();
        }
    }

    // Base score: the strongest identification match.
    let mut base = 0.0f32;
    for rule in patterns::IDENTIFICATION_RULES.iter() {
        if rule.weight > base && rule.pattern.is_match(text) {
            base = rule.weight;
        }
    }

    // Degraded/legacy text: reduced-confidence fallback group.
    if base == 0.0 {
        for rule in patterns::OCR_FALLBACK_RULES.iter() {
            if rule.weight > base && rule.pattern.is_match(text) {
                debug!(matched = rule.description, "fallback identification matched");
                base = rule.weight;
            }
        }
    }

    if base == 0.0 {
        return ClassificationResult::rejected();
    }

    // Structural sections only add to the base.
    let mut matched_sections = Vec::new();
    let mut section_bonus = 0.0f32;
    for rule in patterns::SECTION_RULES.iter() {
        if rule.pattern.is_match(text) {
            matched_sections.push(rule.description.to_string());
            section_bonus += rule.weight;
        }
    }

    let confidence = Confidence::new(base + section_bonus);
    let is_report = confidence.value() >= MIN_REPORT_CONFIDENCE;

    let format = if is_report {
        detect_format(text)
    } else {
        FormatFamily::Unknown
    };

    let version = is_report.then(|| detect_version(text)).flatten();

    debug!(
        is_report,
        confidence = confidence.value(),
        ?format,
        sections = matched_sections.len(),
        "document classified"
    );

    ClassificationResult {
        is_report,
        confidence,
        format,
        version,
        matched_sections,
    }
}

fn detect_format(text: &str) -> FormatFamily {
    let detailed = patterns::DETAILED_MARKERS
        .iter()
        .filter(|rule| rule.pattern.is_match(text))
        .count();
    if detailed >= MIN_FAMILY_MARKERS {
        return FormatFamily::Detailed;
    }

    let summary = patterns::SUMMARY_MARKERS
        .iter()
        .filter(|rule| rule.pattern.is_match(text))
        .count();
    if summary >= MIN_FAMILY_MARKERS {
        return FormatFamily::Summary;
    }

    FormatFamily::Standard
}

fn detect_version(text: &str) -> Option<String> {
    for rule in patterns::VERSION_RULES.iter() {
        if let Some(caps) = rule.pattern.captures(text) {
            return Some(caps[1].to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recognizes_cibil_report() {
        let result = classify("CIBIL TransUnion Credit Information Report. Account Summary follows.");
        assert!(result.is_report);
        assert!(result.confidence.value() >= 0.9);
        assert!(
            result
                .matched_sections
                .contains(&"account summary section".to_string())
        );
    }

    #[test]
    fn test_sections_add_to_base_score() {
        let plain = classify("cibil score details");
        let sectioned =
            classify("cibil score details. Account Summary. Enquiry Summary. Payment History.");
        assert!(sectioned.confidence.value() > plain.confidence.value());
    }

    #[test]
    fn test_exclusion_dominates_identification() {
        let result = classify("Salary slip for March. cibil score: 700");
        assert!(!result.is_report);
        assert_eq!(result.confidence, Confidence::ZERO);
    }

    #[test]
    fn test_unrelated_text_rejected() {
        let result = classify("minutes of the annual general meeting");
        assert!(!result.is_report);
        assert_eq!(result.format, FormatFamily::Unknown);
    }

    #[test]
    fn test_ocr_degraded_text_reduced_confidence() {
        let result = classify("c1b1l report for consumer, account summary");
        assert!(result.is_report);
        assert!(result.confidence.value() <= 0.9);
    }

    #[test]
    fn test_detailed_family_needs_two_markers() {
        let one = classify("CIBIL report. Payment History.");
        assert_eq!(one.format, FormatFamily::Standard);

        let two = classify("CIBIL report. Payment History. Personal Information. Account Information.");
        assert_eq!(two.format, FormatFamily::Detailed);
    }

    #[test]
    fn test_summary_family() {
        let result = classify("CIBIL Report Summary. Score Summary for the consumer.");
        assert_eq!(result.format, FormatFamily::Summary);
    }

    #[test]
    fn test_version_detected() {
        let result = classify("CIBIL Credit Information Report version: 2.0");
        assert_eq!(result.version.as_deref(), Some("2.0"));
    }
}
