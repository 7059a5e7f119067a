//! Field kinds and their structural validity rules.
//!
//! Every extractable field is a variant here, carrying its own hard
//! domain constraint. Extractors, validators, and the recovery layer all
//! dispatch on this enum, so adding a field means the compiler points at
//! every place that needs to handle it.

use serde::{Deserialize, Serialize};

use crate::confidence::Confidence;

/// Amount categories recognized in a bureau report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmountCategory {
    /// Total amount of loans in the report.
    TotalLoan,
    /// Overdue / past-due amount.
    Overdue,
    /// Settled amount.
    Settled,
    /// Sanctioned amount or credit limit.
    Sanctioned,
    /// Outstanding / current balance.
    Outstanding,
}

impl AmountCategory {
    /// All categories, in report order.
    pub const ALL: [AmountCategory; 5] = [
        AmountCategory::TotalLoan,
        AmountCategory::Overdue,
        AmountCategory::Settled,
        AmountCategory::Sanctioned,
        AmountCategory::Outstanding,
    ];

    /// Stable field name used in confidence maps and flags.
    pub fn name(self) -> &'static str {
        match self {
            AmountCategory::TotalLoan => "total_loan_amount",
            AmountCategory::Overdue => "overdue_amount",
            AmountCategory::Settled => "settled_amount",
            AmountCategory::Sanctioned => "sanctioned_amount",
            AmountCategory::Outstanding => "outstanding_amount",
        }
    }
}

/// The closed set of extractable fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Bureau credit score, 300–900.
    CreditScore,
    /// Number of loans/accounts in the report, 0–50.
    LoanCount,
    /// Applicant name.
    ApplicantName,
    /// PAN identifier (AAAAA9999A).
    Pan,
    /// Report generation date.
    ReportDate,
    /// Loan/credit account number.
    AccountNumber,
    /// A monetary amount of the given category.
    Amount(AmountCategory),
    /// Legal / default / settlement status indicators.
    LegalStatus,
}

impl FieldKind {
    /// Stable field name used in confidence maps and flags.
    pub fn name(self) -> &'static str {
        match self {
            FieldKind::CreditScore => "credit_score",
            FieldKind::LoanCount => "loan_count",
            FieldKind::ApplicantName => "applicant_name",
            FieldKind::Pan => "pan",
            FieldKind::ReportDate => "report_date",
            FieldKind::AccountNumber => "account_number",
            FieldKind::Amount(category) => category.name(),
            FieldKind::LegalStatus => "legal_status",
        }
    }

    /// Resolve a stable field name back to its kind.
    pub fn from_name(name: &str) -> Option<FieldKind> {
        match name {
            "credit_score" => Some(FieldKind::CreditScore),
            "loan_count" => Some(FieldKind::LoanCount),
            "applicant_name" => Some(FieldKind::ApplicantName),
            "pan" => Some(FieldKind::Pan),
            "report_date" => Some(FieldKind::ReportDate),
            "account_number" => Some(FieldKind::AccountNumber),
            "total_loan_amount" => Some(FieldKind::Amount(AmountCategory::TotalLoan)),
            "overdue_amount" => Some(FieldKind::Amount(AmountCategory::Overdue)),
            "settled_amount" => Some(FieldKind::Amount(AmountCategory::Settled)),
            "sanctioned_amount" => Some(FieldKind::Amount(AmountCategory::Sanctioned)),
            "outstanding_amount" => Some(FieldKind::Amount(AmountCategory::Outstanding)),
            "legal_status" => Some(FieldKind::LegalStatus),
            _ => None,
        }
    }

    /// Whether absence of this field is acceptable at low confidence
    /// rather than a failure.
    pub fn is_optional(self) -> bool {
        matches!(
            self,
            FieldKind::LoanCount | FieldKind::Amount(_) | FieldKind::LegalStatus
        )
    }

    /// Hard structural validity for a candidate value.
    ///
    /// Candidates failing this are discarded during extraction and force
    /// confidence to zero during validation; they are never surfaced as
    /// extracted values.
    pub fn is_structurally_valid(self, value: &str) -> bool {
        let value = value.trim();
        if value.is_empty() {
            return false;
        }
        match self {
            FieldKind::CreditScore => value
                .parse::<u32>()
                .is_ok_and(|score| (300..=900).contains(&score)),
            FieldKind::LoanCount => value.parse::<u32>().is_ok_and(|count| count <= 50),
            FieldKind::ApplicantName => {
                value.len() >= 2 && value.chars().any(|c| c.is_alphabetic())
            }
            FieldKind::Pan => is_valid_pan(value),
            FieldKind::ReportDate => has_three_date_components(value),
            FieldKind::AccountNumber => is_valid_account_number(value),
            FieldKind::Amount(_) => crate::extract::amount::normalize_amount(value).is_some(),
            FieldKind::LegalStatus => !value.is_empty(),
        }
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// PAN shape: five letters, four digits, one letter.
pub fn is_valid_pan(value: &str) -> bool {
    let chars: Vec<char> = value.chars().collect();
    chars.len() == 10
        && chars[..5].iter().all(|c| c.is_ascii_uppercase())
        && chars[5..9].iter().all(|c| c.is_ascii_digit())
        && chars[9].is_ascii_uppercase()
}

/// Account numbers are 8–25 uppercase alphanumerics containing at least
/// one digit.
pub fn is_valid_account_number(value: &str) -> bool {
    (8..=25).contains(&value.len())
        && value
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        && value.chars().any(|c| c.is_ascii_digit())
}

fn has_three_date_components(value: &str) -> bool {
    let parts: Vec<&str> = value
        .split(['/', '-', '.'])
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();
    parts.len() == 3 && parts.iter().all(|p| p.chars().all(|c| c.is_ascii_digit()))
}

/// Legal / default / settlement statuses flagged in bureau reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LegalStatus {
    SuitFiled,
    WilfulDefault,
    WrittenOff,
    Settled,
    Npa,
    Defaulted,
    Foreclosed,
    Restructured,
}

impl LegalStatus {
    /// Canonical token, as consumed by downstream risk logic.
    pub fn as_str(self) -> &'static str {
        match self {
            LegalStatus::SuitFiled => "SUIT_FILED",
            LegalStatus::WilfulDefault => "WILFUL_DEFAULT",
            LegalStatus::WrittenOff => "WRITTEN_OFF",
            LegalStatus::Settled => "SETTLED",
            LegalStatus::Npa => "NPA",
            LegalStatus::Defaulted => "DEFAULTED",
            LegalStatus::Foreclosed => "FORECLOSED",
            LegalStatus::Restructured => "RESTRUCTURED",
        }
    }
}

impl std::fmt::Display for LegalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Deduplicated set of status indicators found in a document.
///
/// Confidence is the maximum of the contributing indicator weights: one
/// strong indicator is not diluted by many weak ones.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusSet {
    pub statuses: Vec<LegalStatus>,
    pub confidence: Confidence,
}

impl StatusSet {
    /// Record an indicator match, deduplicating and keeping the maximum
    /// contributing confidence.
    pub fn insert(&mut self, status: LegalStatus, confidence: Confidence) {
        if !self.statuses.contains(&status) {
            self.statuses.push(status);
        }
        self.confidence = self.confidence.max(confidence);
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }

    pub fn contains(&self, status: LegalStatus) -> bool {
        self.statuses.contains(&status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_range() {
        assert!(FieldKind::CreditScore.is_structurally_valid("300"));
        assert!(FieldKind::CreditScore.is_structurally_valid("900"));
        assert!(!FieldKind::CreditScore.is_structurally_valid("299"));
        assert!(!FieldKind::CreditScore.is_structurally_valid("950"));
        assert!(!FieldKind::CreditScore.is_structurally_valid("abc"));
    }

    #[test]
    fn test_loan_count_range() {
        assert!(FieldKind::LoanCount.is_structurally_valid("0"));
        assert!(FieldKind::LoanCount.is_structurally_valid("50"));
        assert!(!FieldKind::LoanCount.is_structurally_valid("51"));
    }

    #[test]
    fn test_pan_shape() {
        assert!(is_valid_pan("ABCDE1234F"));
        assert!(!is_valid_pan("ABCD1234F"));
        assert!(!is_valid_pan("ABCDE12345"));
        assert!(!is_valid_pan("abcde1234f"));
    }

    #[test]
    fn test_account_number_shape() {
        assert!(is_valid_account_number("HDFC00123456"));
        assert!(is_valid_account_number("1234567890"));
        assert!(!is_valid_account_number("SHORT1"));
        assert!(!is_valid_account_number("ONLYLETTERS"));
    }

    #[test]
    fn test_status_set_keeps_max_confidence() {
        let mut set = StatusSet::default();
        set.insert(LegalStatus::Settled, Confidence::new(0.85));
        set.insert(LegalStatus::SuitFiled, Confidence::new(0.95));
        set.insert(LegalStatus::Settled, Confidence::new(0.5));

        assert_eq!(set.statuses.len(), 2);
        assert_eq!(set.confidence, Confidence::new(0.95));
    }

    #[test]
    fn test_field_names() {
        assert_eq!(FieldKind::CreditScore.name(), "credit_score");
        assert_eq!(
            FieldKind::Amount(AmountCategory::Overdue).name(),
            "overdue_amount"
        );
    }
}
