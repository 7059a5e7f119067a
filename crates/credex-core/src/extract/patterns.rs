//! Static pattern rule sets for bureau report fields.
//!
//! Rules are ordered within each table, but ranking is by confidence
//! weight: the weight states how specific the label is (see
//! `confidence::tier`), and the highest-weight structurally valid match
//! wins. The tables are read-only after initialization and shared across
//! concurrent extractions.

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::{AmountCategory, LegalStatus};

/// One candidate pattern for a field.
pub struct PatternRule {
    /// The compiled pattern; capture group 1 holds the value.
    pub pattern: Regex,
    /// Static author-assigned confidence weight.
    pub weight: f32,
    /// Human description, recorded in result metadata.
    pub description: &'static str,
}

fn rule(pattern: &str, weight: f32, description: &'static str) -> PatternRule {
    PatternRule {
        pattern: Regex::new(pattern).expect("invalid field pattern"),
        weight,
        description,
    }
}

/// Monetary value with optional currency prefix and magnitude suffix.
const AMOUNT_VALUE: &str =
    r"((?:rs\.?\s*|inr\s*|₹\s*)?[0-9][0-9,]*(?:\.[0-9]{1,2})?(?:\s*(?:crores?|cr|lakhs?|l|thousand|k)\b)?)";

fn amount_rule(label: &str, weight: f32, description: &'static str) -> PatternRule {
    rule(&format!(r"(?i){label}\s*[:\-]?\s*{AMOUNT_VALUE}"), weight, description)
}

lazy_static! {
    // Credit score. Valid range is enforced by the structural validator,
    // not the pattern, so a labelled out-of-range value is rejected
    // rather than matched by a weaker rule.
    pub static ref SCORE_RULES: Vec<PatternRule> = vec![
        rule(r"(?i)cibil\s*score\s*(?:is)?\s*[:\-]?\s*([0-9]{3})\b", 0.95, "CIBIL score label"),
        rule(r"(?i)(?:credit|bureau)\s*score\s*(?:is)?\s*[:\-]?\s*([0-9]{3})\b", 0.9, "credit score label"),
        rule(r"(?i)\bscore\s*(?:is)?\s*[:\-]?\s*([0-9]{3})\b", 0.8, "generic score label"),
        rule(r"(?i)\b([0-9]{3})\s*(?:cibil|credit\s*score)", 0.7, "score preceding keyword"),
    ];

    pub static ref LOAN_COUNT_RULES: Vec<PatternRule> = vec![
        rule(r"(?i)number\s*of\s*loans?\s*(?:in\s*(?:the\s*)?report)?\s*[:\-]?\s*([0-9]{1,2})\b", 0.95, "number-of-loans label"),
        rule(r"(?i)(?:total|active)\s*(?:number\s*of\s*)?(?:loans?|accounts?)\s*[:\-]?\s*([0-9]{1,2})\b", 0.85, "total accounts label"),
        rule(r"(?i)\b([0-9]{1,2})\s*(?:active\s*)?(?:loans?|accounts?)\s*(?:found|reported)", 0.75, "count preceding keyword"),
    ];

    pub static ref NAME_RULES: Vec<PatternRule> = vec![
        rule(r"(?i:(?:consumer|applicant|customer)\s*name\s*[:\-]\s*)([A-Z][A-Za-z]*(?:\s+[A-Z][A-Za-z]*){0,3})", 0.95, "labelled applicant name"),
        rule(r"(?i:\bname\s*[:\-]\s*)([A-Z][A-Za-z]*(?:\s+[A-Z][A-Za-z]*){0,3})", 0.8, "generic name label"),
    ];

    pub static ref PAN_RULES: Vec<PatternRule> = vec![
        rule(r"(?i:pan\s*(?:no\.?|number|card)?\s*[:\-]?\s*)([A-Z]{5}[0-9]{4}[A-Z])\b", 0.95, "labelled PAN"),
        rule(r"\b([A-Z]{5}[0-9]{4}[A-Z])\b", 0.7, "standalone PAN shape"),
    ];

    pub static ref REPORT_DATE_RULES: Vec<PatternRule> = vec![
        rule(r"(?i)(?:report\s*(?:generated|created)\s*(?:on|date)?|date\s*of\s*report|report\s*date|as\s*on)\s*[:\-]?\s*([0-9]{1,4}[/\-.][0-9]{1,2}[/\-.][0-9]{1,4})", 0.9, "report date label"),
        rule(r"(?i)\bdate\s*[:\-]\s*([0-9]{1,4}[/\-.][0-9]{1,2}[/\-.][0-9]{1,4})", 0.7, "generic date label"),
        rule(r"\b([0-9]{1,2}[/\-.][0-9]{1,2}[/\-.][0-9]{4})\b", 0.6, "first standalone date"),
    ];

    pub static ref ACCOUNT_NUMBER_RULES: Vec<PatternRule> = vec![
        rule(r"(?i:(?:account|a/c)\s*(?:no\.?|number)\s*[:\-]?\s*)([A-Z0-9]{8,25})\b", 0.9, "account number label"),
        rule(r"(?i:(?:loan|card)\s*(?:no\.?|number)\s*[:\-]?\s*)([A-Z0-9]{8,25})\b", 0.85, "loan or card number label"),
    ];

    pub static ref BANK_NAME_RULES: Vec<PatternRule> = vec![
        rule(r"(?i:(?:bank|lender|institution|member)\s*(?:name)?\s*[:\-]\s*)([A-Z][A-Za-z&. ]+?(?:Bank|Financial|NBFC|Ltd|Limited))\b", 0.85, "labelled institution name"),
        rule(r"\b([A-Z][A-Za-z&.]*(?:\s+[A-Z][A-Za-z&.]*){0,3}\s+Bank)\b", 0.6, "standalone bank mention"),
    ];

    /// Loan products looked up as plain keywords.
    pub static ref LOAN_TYPE_KEYWORDS: Vec<(Regex, &'static str)> = [
        ("personal loan", r"(?i)personal\s*loan"),
        ("home loan", r"(?i)home\s*loan"),
        ("car loan", r"(?i)(?:car|auto)\s*loan"),
        ("credit card", r"(?i)credit\s*card"),
        ("business loan", r"(?i)business\s*loan"),
        ("education loan", r"(?i)education\s*loan"),
        ("gold loan", r"(?i)gold\s*loan"),
        ("overdraft", r"(?i)overdraft"),
    ]
    .into_iter()
    .map(|(name, pattern)| (Regex::new(pattern).expect("invalid loan type pattern"), name))
    .collect();

    /// Long digit runs used as an account-count proxy when no loan-count
    /// label matches.
    pub static ref LONG_DIGIT_RUN: Regex = Regex::new(r"\b[0-9]{10,18}\b").unwrap();

    // Amount categories.
    pub static ref TOTAL_LOAN_RULES: Vec<PatternRule> = vec![
        amount_rule(r"total\s*(?:amount\s*of\s*)?loans?(?:\s*amount)?", 0.95, "total loan amount label"),
        amount_rule(r"total\s*(?:credit|exposure)", 0.8, "total credit exposure label"),
    ];

    pub static ref OVERDUE_RULES: Vec<PatternRule> = vec![
        amount_rule(r"(?:total\s*)?overdue(?:\s*amount)?", 0.95, "overdue amount label"),
        amount_rule(r"(?:past\s*due|arrears)(?:\s*amount)?", 0.85, "past due label"),
    ];

    pub static ref SETTLED_RULES: Vec<PatternRule> = vec![
        amount_rule(r"settle(?:d|ment)\s*(?:amount)?", 0.9, "settled amount label"),
    ];

    pub static ref SANCTIONED_RULES: Vec<PatternRule> = vec![
        amount_rule(r"(?:sanctioned|approved)\s*(?:amount|limit)?", 0.95, "sanctioned amount label"),
        amount_rule(r"(?:credit|card)\s*limit", 0.85, "credit limit label"),
        amount_rule(r"disbursed\s*(?:amount)?", 0.8, "disbursed amount label"),
    ];

    pub static ref OUTSTANDING_RULES: Vec<PatternRule> = vec![
        amount_rule(r"(?:current\s*balance|outstanding(?:\s*(?:balance|amount))?)", 0.9, "outstanding balance label"),
        amount_rule(r"\bbalance", 0.7, "generic balance label"),
    ];

    /// Independent boolean indicators for legal/default/settlement
    /// status. All matches are retained; confidence is the maximum of
    /// the contributing weights.
    pub static ref STATUS_INDICATORS: Vec<(LegalStatus, PatternRule)> = vec![
        (LegalStatus::SuitFiled, rule(r"(?i)suit\s*filed", 0.95, "suit filed indicator")),
        (LegalStatus::WilfulDefault, rule(r"(?i)wil(?:l)?ful\s*default", 0.95, "wilful default indicator")),
        (LegalStatus::WrittenOff, rule(r"(?i)written\s*-?\s*off", 0.9, "written off indicator")),
        (LegalStatus::Npa, rule(r"(?i)\bnpa\b|non\s*-?\s*performing\s*asset", 0.9, "NPA indicator")),
        (LegalStatus::Settled, rule(r"(?i)\bsettled\b", 0.85, "settled indicator")),
        (LegalStatus::Defaulted, rule(r"(?i)\bdefault(?:ed)?\b", 0.8, "default indicator")),
        (LegalStatus::Foreclosed, rule(r"(?i)foreclos(?:ed|ure)", 0.8, "foreclosure indicator")),
        (LegalStatus::Restructured, rule(r"(?i)restructur(?:ed|ing)", 0.75, "restructured indicator")),
    ];

    // Document classification.

    /// Identification patterns; the single highest-weight match sets the
    /// classifier's base score.
    pub static ref IDENTIFICATION_RULES: Vec<PatternRule> = vec![
        rule(r"(?i)cibil\s*(?:trans\s*union|transunion)", 0.95, "CIBIL TransUnion letterhead"),
        rule(r"(?i)credit\s*information\s*(?:bureau|report)", 0.9, "credit information report heading"),
        rule(r"(?i)cibil\s*score", 0.9, "CIBIL score mention"),
        rule(r"(?i)consumer\s*credit\s*report", 0.85, "consumer credit report heading"),
        rule(r"(?i)\bcibil\b", 0.8, "CIBIL mention"),
        rule(r"(?i)credit\s*bureau", 0.7, "credit bureau mention"),
        rule(r"(?i)credit\s*score", 0.5, "credit score mention"),
    ];

    /// Structural sections; each match adds its weight to the base score.
    pub static ref SECTION_RULES: Vec<PatternRule> = vec![
        rule(r"(?i)account\s*summary", 0.2, "account summary section"),
        rule(r"(?i)enquiry\s*summary", 0.15, "enquiry summary section"),
        rule(r"(?i)payment\s*history", 0.15, "payment history section"),
        rule(r"(?i)personal\s*information", 0.1, "personal information section"),
        rule(r"(?i)account\s*information", 0.1, "account information section"),
        rule(r"(?i)contact\s*information", 0.05, "contact information section"),
        rule(r"(?i)employment\s*information", 0.05, "employment information section"),
    ];

    /// Exclusion patterns; any match forces `is_report = false`.
    pub static ref EXCLUSION_RULES: Vec<PatternRule> = vec![
        rule(r"(?i)bank\s*statement", 1.0, "bank statement"),
        rule(r"(?i)(?:salary|pay)\s*slip", 1.0, "salary slip"),
        rule(r"(?i)income\s*tax\s*return", 1.0, "income tax return"),
        rule(r"(?i)form\s*(?:no\.?\s*)?16\b", 1.0, "form 16"),
        rule(r"(?i)tax\s*invoice", 1.0, "invoice"),
    ];

    /// Fallback identification for OCR-degraded or legacy text, matched
    /// at reduced confidence when the primary patterns fail.
    pub static ref OCR_FALLBACK_RULES: Vec<PatternRule> = vec![
        rule(r"(?i)c[il1]b[il1]l", 0.65, "degraded CIBIL spelling"),
        rule(r"(?i)cred[il1]t\s*rep[o0]rt", 0.6, "degraded credit report spelling"),
        rule(r"(?i)cred[il1]t\s*sc[o0]re", 0.55, "degraded credit score spelling"),
        rule(r"(?i)credit\s*information\s*co(?:mpany|rp)", 0.5, "legacy bureau heading"),
    ];

    /// Phrases unique to the detailed report family.
    pub static ref DETAILED_MARKERS: Vec<PatternRule> = vec![
        rule(r"(?i)account\s*information", 0.0, "account information"),
        rule(r"(?i)enquiry\s*information", 0.0, "enquiry information"),
        rule(r"(?i)payment\s*history", 0.0, "payment history"),
        rule(r"(?i)personal\s*information", 0.0, "personal information"),
        rule(r"(?i)employment\s*information", 0.0, "employment information"),
    ];

    /// Phrases unique to the summary report family.
    pub static ref SUMMARY_MARKERS: Vec<PatternRule> = vec![
        rule(r"(?i)credit\s*profile\s*summary", 0.0, "credit profile summary"),
        rule(r"(?i)report\s*summary", 0.0, "report summary"),
        rule(r"(?i)score\s*summary", 0.0, "score summary"),
        rule(r"(?i)summary\s*of\s*accounts", 0.0, "summary of accounts"),
    ];

    pub static ref VERSION_RULES: Vec<PatternRule> = vec![
        rule(r"(?i)(?:cir|report)\s*version\s*[:\-]?\s*([0-9]+(?:\.[0-9]+)?)", 0.9, "report version label"),
        rule(r"(?i)\bversion\s*[:\-]\s*([0-9]+(?:\.[0-9]+)?)", 0.7, "generic version label"),
    ];
}

/// Rule table for one amount category.
pub fn amount_rules(category: AmountCategory) -> &'static [PatternRule] {
    match category {
        AmountCategory::TotalLoan => &TOTAL_LOAN_RULES,
        AmountCategory::Overdue => &OVERDUE_RULES,
        AmountCategory::Settled => &SETTLED_RULES,
        AmountCategory::Sanctioned => &SANCTIONED_RULES,
        AmountCategory::Outstanding => &OUTSTANDING_RULES,
    }
}
