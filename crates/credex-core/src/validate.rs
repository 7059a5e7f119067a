//! Field validation and correction.
//!
//! Each field kind gets its own rule: mechanical format fixes produce a
//! corrected value, a penalized confidence, and a WARNING flag naming
//! the before/after values; hard constraint violations zero the
//! confidence and return the original value for audit. Corrections are
//! idempotent: a canonical value passes through untouched.

use tracing::debug;

use crate::confidence::{Confidence, tier};
use crate::extract::amount::{find_amount, normalize_amount};
use crate::models::field::{is_valid_account_number, is_valid_pan};
use crate::models::{FieldKind, ValidationFlag, ValidationResult};

/// Penalty for collapsing stray whitespace or digit noise.
pub const PENALTY_RESHAPE: f32 = 0.9;
/// Penalty for re-deriving an amount's unit or numeric core.
pub const PENALTY_UNIT_RENORMALIZE: f32 = 0.85;
/// Penalty for re-deriving an identifier's fixed shape.
pub const PENALTY_IDENTIFIER_RESHAPE: f32 = 0.85;
/// Penalty for reordering date components or expanding a two-digit year.
pub const PENALTY_DATE_REORDER: f32 = 0.8;
/// Penalty for dropping document-structure words out of a name.
pub const PENALTY_NAME_STOPLIST: f32 = 0.7;

/// Document-structure words that indicate a false name match.
const NAME_STOPLIST: [&str; 18] = [
    "report",
    "summary",
    "cibil",
    "consumer",
    "credit",
    "account",
    "bank",
    "score",
    "information",
    "member",
    "details",
    "date",
    "birth",
    "gender",
    "address",
    "enquiry",
    "history",
    "transunion",
];

/// Validate one field value and correct it where mechanically possible.
pub fn validate_and_correct(
    kind: FieldKind,
    value: &str,
    confidence: Confidence,
) -> ValidationResult {
    let trimmed = value.trim();

    if trimmed.is_empty() {
        if kind.is_optional() {
            // Absence of an optional field is not an error.
            return ValidationResult::valid(
                default_value(kind),
                Confidence::new(tier::MISSING_OPTIONAL),
            );
        }
        return ValidationResult::invalid(
            value,
            ValidationFlag::error(kind.name(), "value missing")
                .with_suggestion("manual verification required"),
        );
    }

    match kind {
        FieldKind::CreditScore => validate_numeric(kind, trimmed, confidence, 300, 900),
        FieldKind::LoanCount => validate_numeric(kind, trimmed, confidence, 0, 50),
        FieldKind::Amount(_) => validate_amount(kind, trimmed, confidence),
        FieldKind::Pan => validate_shaped(kind, trimmed, confidence, is_valid_pan, "PAN"),
        FieldKind::AccountNumber => validate_shaped(
            kind,
            trimmed,
            confidence,
            is_valid_account_number,
            "account number",
        ),
        FieldKind::ReportDate => validate_date(kind, trimmed, confidence),
        FieldKind::ApplicantName => validate_name(kind, trimmed, confidence),
        FieldKind::LegalStatus => ValidationResult::valid(trimmed, confidence),
    }
}

fn default_value(kind: FieldKind) -> &'static str {
    match kind {
        FieldKind::LoanCount => "0",
        FieldKind::Amount(_) => "₹0.00",
        _ => "",
    }
}

fn corrected(
    kind: FieldKind,
    original: &str,
    value: String,
    confidence: Confidence,
    penalty: f32,
) -> ValidationResult {
    debug!(field = kind.name(), original, corrected = %value, "value corrected");
    let flag = ValidationFlag::warning(
        kind.name(),
        format!("corrected '{original}' to '{value}'"),
    );
    ValidationResult {
        is_valid: true,
        corrected_value: value,
        confidence: confidence.penalize(penalty),
        flags: vec![flag],
        suggestions: Vec::new(),
    }
}

fn validate_numeric(
    kind: FieldKind,
    value: &str,
    confidence: Confidence,
    min: u32,
    max: u32,
) -> ValidationResult {
    if kind.is_structurally_valid(value) {
        return ValidationResult::valid(value, confidence);
    }

    // Noise around the number is recoverable; re-derive the digit run
    // and re-check the range.
    if let Some(digits) = first_digit_run(value) {
        if kind.is_structurally_valid(&digits) {
            return corrected(kind, value, digits, confidence, PENALTY_RESHAPE);
        }
        return ValidationResult::invalid(
            value,
            ValidationFlag::error(
                kind.name(),
                format!("value {digits} outside valid range {min}-{max}"),
            ),
        );
    }

    ValidationResult::invalid(
        value,
        ValidationFlag::error(kind.name(), format!("'{value}' has no numeric content")),
    )
}

fn first_digit_run(value: &str) -> Option<String> {
    let start = value.find(|c: char| c.is_ascii_digit())?;
    let digits: String = value[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    Some(digits)
}

fn validate_amount(kind: FieldKind, value: &str, confidence: Confidence) -> ValidationResult {
    match normalize_amount(value) {
        Some(normalized) if normalized == value => ValidationResult::valid(value, confidence),
        Some(normalized) => corrected(kind, value, normalized, confidence, PENALTY_UNIT_RENORMALIZE),
        None => {
            // Amount buried in noise: search for an amount-shaped
            // substring and normalize that.
            if let Some(normalized) = find_amount(value) {
                return corrected(kind, value, normalized, confidence, PENALTY_UNIT_RENORMALIZE);
            }
            ValidationResult::invalid(
                value,
                ValidationFlag::error(kind.name(), format!("'{value}' is not a parseable amount")),
            )
        }
    }
}

fn validate_shaped(
    kind: FieldKind,
    value: &str,
    confidence: Confidence,
    shape: fn(&str) -> bool,
    label: &str,
) -> ValidationResult {
    if shape(value) {
        return ValidationResult::valid(value, confidence);
    }

    let reshaped: String = value
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .collect();

    if shape(&reshaped) {
        return corrected(kind, value, reshaped, confidence, PENALTY_IDENTIFIER_RESHAPE);
    }

    ValidationResult::invalid(
        value,
        ValidationFlag::error(kind.name(), format!("'{value}' does not match the {label} shape")),
    )
}

fn validate_date(kind: FieldKind, value: &str, confidence: Confidence) -> ValidationResult {
    let parts: Vec<&str> = value.split(['/', '-', '.']).map(str::trim).collect();
    if parts.len() != 3 || parts.iter().any(|p| p.is_empty() || !p.chars().all(|c| c.is_ascii_digit())) {
        return ValidationResult::invalid(
            value,
            ValidationFlag::error(kind.name(), format!("'{value}' is not a recognizable date")),
        );
    }

    let numbers: Vec<u32> = parts.iter().map(|p| p.parse().unwrap_or(0)).collect();

    // Year-first inputs are reordered; otherwise the year is last.
    let (mut day, mut month, mut year) = if numbers[0] >= 1000 {
        (numbers[2], numbers[1], numbers[0])
    } else {
        (numbers[0], numbers[1], numbers[2])
    };

    if year < 100 {
        // Two-digit year: 00-50 are 2000s, 51-99 are 1900s.
        year = if year <= 50 { 2000 + year } else { 1900 + year };
    }

    // Month/day reordering, attempted only when the month is impossible.
    if month > 12 && day <= 12 {
        std::mem::swap(&mut day, &mut month);
    }

    if chrono::NaiveDate::from_ymd_opt(year as i32, month, day).is_none() {
        return ValidationResult::invalid(
            value,
            ValidationFlag::error(kind.name(), format!("'{value}' is not a calendar date")),
        );
    }

    let canonical = format!("{day:02}/{month:02}/{year:04}");
    if canonical == value {
        ValidationResult::valid(value, confidence)
    } else {
        corrected(kind, value, canonical, confidence, PENALTY_DATE_REORDER)
    }
}

fn validate_name(kind: FieldKind, value: &str, confidence: Confidence) -> ValidationResult {
    let tokens: Vec<&str> = value.split_whitespace().collect();
    let kept: Vec<&str> = tokens
        .iter()
        .copied()
        .filter(|token| {
            let bare = token.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase();
            !NAME_STOPLIST.contains(&bare.as_str())
        })
        .collect();

    if kept.is_empty() {
        return ValidationResult::invalid(
            value,
            ValidationFlag::error(
                kind.name(),
                format!("'{value}' consists of document-structure words, not a name"),
            ),
        );
    }

    let cleaned = kept.join(" ");
    if cleaned == value {
        ValidationResult::valid(value, confidence)
    } else if kept.len() < tokens.len() {
        corrected(kind, value, cleaned, confidence, PENALTY_NAME_STOPLIST)
    } else {
        // Only whitespace changed.
        corrected(kind, value, cleaned, confidence, PENALTY_RESHAPE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AmountCategory, Severity};
    use pretty_assertions::assert_eq;

    fn conf() -> Confidence {
        Confidence::new(0.9)
    }

    #[test]
    fn test_clean_score_passes_through() {
        let result = validate_and_correct(FieldKind::CreditScore, "698", conf());
        assert!(result.is_valid);
        assert_eq!(result.corrected_value, "698");
        assert_eq!(result.confidence, conf());
        assert!(result.flags.is_empty());
    }

    #[test]
    fn test_noisy_score_rederived_with_warning() {
        let result = validate_and_correct(FieldKind::CreditScore, "698*", conf());
        assert!(result.is_valid);
        assert_eq!(result.corrected_value, "698");
        assert_eq!(result.flags.len(), 1);
        assert_eq!(result.flags[0].severity, Severity::Warning);
        assert!(result.confidence < conf());
    }

    #[test]
    fn test_out_of_range_score_is_hard_error() {
        let result = validate_and_correct(FieldKind::CreditScore, "950", conf());
        assert!(!result.is_valid);
        assert_eq!(result.corrected_value, "950");
        assert_eq!(result.confidence, Confidence::ZERO);
        assert_eq!(result.flags[0].severity, Severity::Error);
    }

    #[test]
    fn test_missing_optional_amount_accepted_with_default() {
        let result =
            validate_and_correct(FieldKind::Amount(AmountCategory::Overdue), "", conf());
        assert!(result.is_valid);
        assert_eq!(result.corrected_value, "₹0.00");
        assert_eq!(result.confidence, Confidence::new(tier::MISSING_OPTIONAL));
        assert!(result.flags.is_empty());
    }

    #[test]
    fn test_missing_required_field_is_error() {
        let result = validate_and_correct(FieldKind::Pan, "", conf());
        assert!(!result.is_valid);
        assert_eq!(result.flags[0].severity, Severity::Error);
    }

    #[test]
    fn test_amount_renormalized_with_penalty() {
        let result = validate_and_correct(
            FieldKind::Amount(AmountCategory::TotalLoan),
            "Rs. 50,000",
            conf(),
        );
        assert!(result.is_valid);
        assert_eq!(result.corrected_value, "₹0.50 L");
        assert_eq!(result.flags[0].severity, Severity::Warning);
    }

    #[test]
    fn test_amount_correction_idempotent() {
        let first = validate_and_correct(
            FieldKind::Amount(AmountCategory::TotalLoan),
            "Rs. 50,000",
            conf(),
        );
        let second = validate_and_correct(
            FieldKind::Amount(AmountCategory::TotalLoan),
            &first.corrected_value,
            first.confidence,
        );
        assert_eq!(second.corrected_value, first.corrected_value);
        assert!(second.flags.is_empty());
    }

    #[test]
    fn test_pan_reshaped() {
        let result = validate_and_correct(FieldKind::Pan, "abcde 1234 f", conf());
        assert!(result.is_valid);
        assert_eq!(result.corrected_value, "ABCDE1234F");
        assert_eq!(result.flags[0].severity, Severity::Warning);
    }

    #[test]
    fn test_pan_correction_idempotent() {
        let first = validate_and_correct(FieldKind::Pan, "abcde 1234 f", conf());
        let second = validate_and_correct(FieldKind::Pan, &first.corrected_value, first.confidence);
        assert_eq!(second.corrected_value, first.corrected_value);
        assert!(second.flags.is_empty());
    }

    #[test]
    fn test_malformed_pan_is_hard_error() {
        let result = validate_and_correct(FieldKind::Pan, "AB123", conf());
        assert!(!result.is_valid);
        assert_eq!(result.corrected_value, "AB123");
        assert_eq!(result.confidence, Confidence::ZERO);
    }

    #[test]
    fn test_year_first_date_reordered() {
        let result = validate_and_correct(FieldKind::ReportDate, "2024/3/5", conf());
        assert!(result.is_valid);
        assert_eq!(result.corrected_value, "05/03/2024");
        assert_eq!(result.flags.len(), 1);
        assert_eq!(result.flags[0].severity, Severity::Warning);
        assert!(result.flags[0].issue.contains("2024/3/5"));
    }

    #[test]
    fn test_month_day_swap_when_month_impossible() {
        let result = validate_and_correct(FieldKind::ReportDate, "03/15/2024", conf());
        assert_eq!(result.corrected_value, "15/03/2024");
    }

    #[test]
    fn test_two_digit_year_expanded() {
        let result = validate_and_correct(FieldKind::ReportDate, "15/01/24", conf());
        assert_eq!(result.corrected_value, "15/01/2024");

        let result = validate_and_correct(FieldKind::ReportDate, "15/01/99", conf());
        assert_eq!(result.corrected_value, "15/01/1999");
    }

    #[test]
    fn test_date_correction_idempotent() {
        let first = validate_and_correct(FieldKind::ReportDate, "2024/3/5", conf());
        let second =
            validate_and_correct(FieldKind::ReportDate, &first.corrected_value, first.confidence);
        assert_eq!(second.corrected_value, first.corrected_value);
        assert!(second.flags.is_empty());
        assert_eq!(second.confidence, first.confidence);
    }

    #[test]
    fn test_impossible_date_is_error() {
        let result = validate_and_correct(FieldKind::ReportDate, "31/02/2024", conf());
        assert!(!result.is_valid);
        assert_eq!(result.confidence, Confidence::ZERO);
    }

    #[test]
    fn test_structure_word_as_name_rejected() {
        let result = validate_and_correct(FieldKind::ApplicantName, "Credit Report", conf());
        assert!(!result.is_valid);
        assert_eq!(result.flags[0].severity, Severity::Error);
    }

    #[test]
    fn test_name_stoplist_filtering() {
        let result = validate_and_correct(FieldKind::ApplicantName, "Rahul Sharma Report", conf());
        assert!(result.is_valid);
        assert_eq!(result.corrected_value, "Rahul Sharma");
        assert_eq!(result.flags[0].severity, Severity::Warning);
        assert!((result.confidence.value() - 0.9 * PENALTY_NAME_STOPLIST).abs() < 1e-6);
    }

    #[test]
    fn test_clean_name_passes_through() {
        let result = validate_and_correct(FieldKind::ApplicantName, "Rahul Sharma", conf());
        assert!(result.is_valid);
        assert!(result.flags.is_empty());
    }
}
