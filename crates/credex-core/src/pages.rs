//! Page-level text preparation and multi-page aggregation.
//!
//! The acquisition pipeline hands over one text block per page. Before
//! extraction the text gets bureau-specific repair: OCR artifacts in the
//! financial keywords, currency spellings, and separator spacing all
//! normalize to one form. Multi-page reports are stitched into a single
//! document with sections identified per page and account numbers
//! consolidated across pages.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::confidence::Confidence;
use crate::extract::identity;

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
    // OCR routinely confuses i/l/1 and o/0 in the report keywords.
    static ref OCR_CIBIL: Regex = Regex::new(r"(?i)c[il1]b[il1]l").unwrap();
    static ref OCR_CREDIT: Regex = Regex::new(r"(?i)cr[e3]d[il1]t").unwrap();
    static ref OCR_ACCOUNT: Regex = Regex::new(r"(?i)acc[o0]unt").unwrap();
    static ref RUPEE_SPELLING: Regex = Regex::new(r"\b(?:Rs\.?|INR)\s*").unwrap();
    static ref TABLE_SEPARATOR: Regex = Regex::new(r"\s*\|\s*").unwrap();
    static ref COLON_SPACING: Regex = Regex::new(r"\s*:\s*").unwrap();
    static ref PAYMENT_INDICATOR: Regex =
        Regex::new(r"\b(0|30|60|90|120|150|180|XXX|STD|SMA|SUB|DBT|LSS)\b").unwrap();
    static ref ENQUIRY_COUNT: Regex =
        Regex::new(r"(?i)(?:total\s*)?(?:number\s*of\s*)?enquir(?:y|ies)\s*[:\-]?\s*([0-9]+)\b")
            .unwrap();

    static ref SUMMARY_SECTION: Vec<Regex> = compile(&[
        r"(?i)(?:credit\s*)?(?:report\s*)?summary",
        r"(?i)consumer\s*credit\s*report",
        r"(?i)credit\s*profile\s*summary",
    ]);
    static ref ACCOUNT_SECTION: Vec<Regex> = compile(&[
        r"(?i)account\s*(?:details|information|summary)",
        r"(?i)credit\s*(?:accounts|facilities)",
        r"(?i)loan\s*(?:details|accounts)",
    ]);
    static ref ENQUIRY_SECTION: Vec<Regex> = compile(&[
        r"(?i)enquir(?:y|ies)\s*summary",
        r"(?i)credit\s*enquir(?:y|ies)",
        r"(?i)recent\s*enquir(?:y|ies)",
    ]);
    static ref PAYMENT_SECTION: Vec<Regex> = compile(&[
        r"(?i)payment\s*history",
        r"(?i)repayment\s*(?:history|track\s*record)",
    ]);
}

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|pattern| Regex::new(pattern).expect("invalid section pattern"))
        .collect()
}

/// One page of already-extracted report text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageText {
    pub number: u32,
    pub text: String,
}

/// Normalize report text before classification and extraction.
pub fn preprocess_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let text = WHITESPACE.replace_all(text, " ");
    let text = OCR_CIBIL.replace_all(&text, "CIBIL");
    let text = OCR_CREDIT.replace_all(&text, "credit");
    let text = OCR_ACCOUNT.replace_all(&text, "account");
    let text = RUPEE_SPELLING.replace_all(&text, "₹");
    let text = TABLE_SEPARATOR.replace_all(&text, " | ");
    let text = COLON_SPACING.replace_all(&text, ": ");

    text.trim().to_string()
}

/// Report section kinds recognized across pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Summary,
    AccountDetails,
    EnquirySummary,
    PaymentHistory,
}

impl SectionKind {
    const ALL: [SectionKind; 4] = [
        SectionKind::Summary,
        SectionKind::AccountDetails,
        SectionKind::EnquirySummary,
        SectionKind::PaymentHistory,
    ];

    fn patterns(self) -> &'static [Regex] {
        match self {
            SectionKind::Summary => &SUMMARY_SECTION,
            SectionKind::AccountDetails => &ACCOUNT_SECTION,
            SectionKind::EnquirySummary => &ENQUIRY_SECTION,
            SectionKind::PaymentHistory => &PAYMENT_SECTION,
        }
    }

    fn keywords(self) -> &'static [&'static str] {
        match self {
            SectionKind::Summary => &["score", "total", "summary", "overview"],
            SectionKind::AccountDetails => &["account", "loan", "bank", "amount"],
            SectionKind::EnquirySummary => &["enquiry", "inquiry", "recent", "last"],
            SectionKind::PaymentHistory => &["payment", "history", "months", "delay"],
        }
    }
}

/// A section located on one page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSection {
    pub kind: SectionKind,
    pub page: u32,
    pub confidence: Confidence,
}

/// Identify sections present on each page.
pub fn identify_sections(pages: &[PageText]) -> Vec<ReportSection> {
    let mut sections = Vec::new();

    for page in pages {
        for kind in SectionKind::ALL {
            let matched = kind
                .patterns()
                .iter()
                .any(|pattern| pattern.is_match(&page.text));
            if !matched {
                continue;
            }

            sections.push(ReportSection {
                kind,
                page: page.number,
                confidence: section_confidence(&page.text, kind),
            });
        }
    }

    debug!(count = sections.len(), "sections identified");
    sections
}

/// Confidence in a section identification, from content length and
/// section-specific keyword density.
fn section_confidence(content: &str, kind: SectionKind) -> Confidence {
    let mut confidence = 0.3f32;

    if content.len() > 200 {
        confidence += 0.2;
    } else if content.len() > 100 {
        confidence += 0.1;
    }

    let lower = content.to_lowercase();
    let keyword_hits = kind
        .keywords()
        .iter()
        .filter(|keyword| lower.contains(**keyword))
        .count();
    confidence += (keyword_hits as f32 * 0.1).min(0.4);

    Confidence::new(confidence)
}

/// Payment punctuality summary over the DPD / asset-class indicators.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaymentHistorySummary {
    pub on_time: usize,
    pub late_30: usize,
    pub late_60: usize,
    pub late_90: usize,
    pub late_120_plus: usize,
    pub delay_instances: usize,
    /// Share of on-time payments, 0–100.
    pub behavior_score: u32,
}

/// Bucket the standard payment indicators found in the text.
pub fn summarize_payment_history(text: &str) -> PaymentHistorySummary {
    let mut summary = PaymentHistorySummary::default();

    for caps in PAYMENT_INDICATOR.captures_iter(text) {
        match &caps[1] {
            "0" => summary.on_time += 1,
            "30" => {
                summary.late_30 += 1;
                summary.delay_instances += 1;
            }
            "60" => {
                summary.late_60 += 1;
                summary.delay_instances += 1;
            }
            "90" => {
                summary.late_90 += 1;
                summary.delay_instances += 1;
            }
            _ => {
                // 120/150/180 plus the asset-class codes all count as
                // severe delinquency.
                summary.late_120_plus += 1;
                summary.delay_instances += 1;
            }
        }
    }

    let total = summary.on_time + summary.delay_instances;
    if total > 0 {
        summary.behavior_score = (summary.on_time * 100 / total) as u32;
    }

    summary
}

/// Enquiry activity summary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnquirySummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_enquiries: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub institutions: Vec<String>,
}

/// Extract the enquiry count and the enquiring institutions.
pub fn summarize_enquiries(text: &str) -> EnquirySummary {
    let total_enquiries = ENQUIRY_COUNT
        .captures(text)
        .and_then(|caps| caps[1].parse().ok());

    let (institutions, _) = identity::extract_bank_names(text);

    EnquirySummary {
        total_enquiries,
        institutions,
    }
}

/// A multi-page report stitched into one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatedReport {
    /// Preprocessed page texts joined for whole-document extraction.
    pub combined_text: String,
    pub total_pages: u32,
    pub pages_with_text: u32,
    pub sections: Vec<ReportSection>,
    /// Account numbers consolidated across pages, deduplicated.
    pub account_numbers: Vec<String>,
    pub payment_history: PaymentHistorySummary,
    pub enquiries: EnquirySummary,
}

/// Aggregate per-page text into a single document view.
pub fn aggregate_pages(pages: &[PageText]) -> AggregatedReport {
    let prepared: Vec<PageText> = pages
        .iter()
        .map(|page| PageText {
            number: page.number,
            text: preprocess_text(&page.text),
        })
        .collect();

    let pages_with_text = prepared.iter().filter(|p| !p.text.is_empty()).count() as u32;
    let combined_text = prepared
        .iter()
        .map(|p| p.text.as_str())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    let sections = identify_sections(&prepared);

    let mut account_numbers: Vec<String> = Vec::new();
    for page in &prepared {
        let (numbers, _) = identity::extract_account_numbers(&page.text);
        for number in numbers {
            if !account_numbers.contains(&number) {
                account_numbers.push(number);
            }
        }
    }

    let payment_history = summarize_payment_history(&combined_text);
    let enquiries = summarize_enquiries(&combined_text);

    debug!(
        pages = pages.len(),
        pages_with_text,
        accounts = account_numbers.len(),
        "pages aggregated"
    );

    AggregatedReport {
        combined_text,
        total_pages: pages.len() as u32,
        pages_with_text,
        sections,
        account_numbers,
        payment_history,
        enquiries,
    }
}
