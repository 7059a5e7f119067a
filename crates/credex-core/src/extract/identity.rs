//! Identity and account fields: applicant name, PAN, report date,
//! account numbers, bank names, and loan types.

use super::{extract_all, extract_ranked, patterns};
use crate::confidence::Confidence;
use crate::models::{ExtractionResult, FieldKind};

/// Extract the applicant's name.
///
/// Raw extraction only; the stoplist filtering that catches structure
/// words masquerading as names happens in the validation layer.
pub fn extract_applicant_name(text: &str) -> ExtractionResult {
    extract_ranked(FieldKind::ApplicantName, &patterns::NAME_RULES, text)
}

/// Extract the PAN identifier.
pub fn extract_pan(text: &str) -> ExtractionResult {
    extract_ranked(FieldKind::Pan, &patterns::PAN_RULES, text)
}

/// Extract the report date, preferring explicit report-date labels over
/// the first standalone date.
pub fn extract_report_date(text: &str) -> ExtractionResult {
    extract_ranked(FieldKind::ReportDate, &patterns::REPORT_DATE_RULES, text)
}

/// Extract all account numbers, deduplicated in document order.
pub fn extract_account_numbers(text: &str) -> (Vec<String>, Confidence) {
    extract_all(FieldKind::AccountNumber, &patterns::ACCOUNT_NUMBER_RULES, text)
}

/// Extract distinct lender/institution names.
pub fn extract_bank_names(text: &str) -> (Vec<String>, Confidence) {
    let mut names: Vec<String> = Vec::new();
    let mut confidence = Confidence::ZERO;

    for rule in patterns::BANK_NAME_RULES.iter() {
        for caps in rule.pattern.captures_iter(text) {
            let Some(group) = caps.get(1) else { continue };
            let name = normalize_spaces(group.as_str());
            if name.len() < 4 {
                continue;
            }
            if !names.iter().any(|n| n.eq_ignore_ascii_case(&name)) {
                names.push(name);
            }
            confidence = confidence.max(Confidence::new(rule.weight));
        }
    }

    (names, confidence)
}

/// Detect which loan products the report mentions.
pub fn extract_loan_types(text: &str) -> Vec<String> {
    patterns::LOAN_TYPE_KEYWORDS
        .iter()
        .filter(|(pattern, _)| pattern.is_match(text))
        .map(|(_, name)| (*name).to_string())
        .collect()
}

fn normalize_spaces(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}
