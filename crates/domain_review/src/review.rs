//! Review aggregate

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::ReviewId;
use crate::decision_issue::DecisionIssue;
use crate::end_product::EndProductEstablishment;
use crate::error::ReviewError;

/// First day decision reviews could be filed under the Appeals Modernization Act
pub fn ama_begin_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2018, 4, 17).unwrap_or(NaiveDate::MIN)
}

const HLR_END_PRODUCT_MODIFIERS: [&str; 10] =
    ["030", "031", "032", "033", "034", "035", "036", "037", "038", "039"];
const SC_END_PRODUCT_MODIFIERS: [&str; 10] =
    ["040", "041", "042", "043", "044", "045", "046", "047", "048", "049"];

/// Kind of decision review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewKind {
    /// New decision by a senior reviewer without new evidence
    HigherLevelReview,
    /// New decision with new and relevant evidence
    SupplementalClaim,
}

impl ReviewKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewKind::HigherLevelReview => "higher_level_review",
            ReviewKind::SupplementalClaim => "supplemental_claim",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "higher_level_review" => Some(ReviewKind::HigherLevelReview),
            "supplemental_claim" => Some(ReviewKind::SupplementalClaim),
            _ => None,
        }
    }

    /// Prefix for status API type names, e.g. `hlr_decision`
    pub fn status_prefix(&self) -> &'static str {
        match self {
            ReviewKind::HigherLevelReview => "hlr",
            ReviewKind::SupplementalClaim => "sc",
        }
    }

    /// Prefix for status API identifiers, e.g. `HLR<id>`
    pub fn status_id_prefix(&self) -> &'static str {
        match self {
            ReviewKind::HigherLevelReview => "HLR",
            ReviewKind::SupplementalClaim => "SC",
        }
    }

    /// Entry type in the status API envelope
    pub fn api_type(&self) -> &'static str {
        match self {
            ReviewKind::HigherLevelReview => "higherLevelReview",
            ReviewKind::SupplementalClaim => "supplementalClaim",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ReviewKind::HigherLevelReview => "Higher-Level Review",
            ReviewKind::SupplementalClaim => "Supplemental Claim",
        }
    }

    /// End product modifiers reserved for this review kind
    pub fn end_product_modifiers(&self) -> &'static [&'static str] {
        match self {
            ReviewKind::HigherLevelReview => &HLR_END_PRODUCT_MODIFIERS,
            ReviewKind::SupplementalClaim => &SC_END_PRODUCT_MODIFIERS,
        }
    }
}

/// Benefit line a review is filed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BenefitType {
    Compensation,
    Pension,
    Fiduciary,
    Education,
    Insurance,
    LoanGuaranty,
    Vha,
    VocRehab,
    Nca,
}

impl BenefitType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BenefitType::Compensation => "compensation",
            BenefitType::Pension => "pension",
            BenefitType::Fiduciary => "fiduciary",
            BenefitType::Education => "education",
            BenefitType::Insurance => "insurance",
            BenefitType::LoanGuaranty => "loan_guaranty",
            BenefitType::Vha => "vha",
            BenefitType::VocRehab => "voc_rehab",
            BenefitType::Nca => "nca",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "compensation" => Some(BenefitType::Compensation),
            "pension" => Some(BenefitType::Pension),
            "fiduciary" => Some(BenefitType::Fiduciary),
            "education" => Some(BenefitType::Education),
            "insurance" => Some(BenefitType::Insurance),
            "loan_guaranty" => Some(BenefitType::LoanGuaranty),
            "vha" => Some(BenefitType::Vha),
            "voc_rehab" => Some(BenefitType::VocRehab),
            "nca" => Some(BenefitType::Nca),
            _ => None,
        }
    }

    /// Compensation and pension are worked in the external claims system;
    /// every other benefit line is worked here through a decision review task.
    pub fn processed_in_house(&self) -> bool {
        !matches!(self, BenefitType::Compensation | BenefitType::Pension)
    }

    /// Program area reported by the status API
    pub fn program_area(&self) -> &'static str {
        match self {
            BenefitType::VocRehab => "vre",
            BenefitType::Vha => "medical",
            BenefitType::Nca => "burial",
            other => other.as_str(),
        }
    }

    /// Business line that owns decision review tasks for this benefit type
    pub fn business_line(&self) -> &'static str {
        match self {
            BenefitType::Compensation => "Compensation",
            BenefitType::Pension => "Pension",
            BenefitType::Fiduciary => "Fiduciary",
            BenefitType::Education => "Education",
            BenefitType::Insurance => "Insurance",
            BenefitType::LoanGuaranty => "Loan Guaranty",
            BenefitType::Vha => "Veterans Health Administration",
            BenefitType::VocRehab => "Veterans Readiness and Employment",
            BenefitType::Nca => "National Cemetery Administration",
        }
    }
}

/// Claimant on a review when it is not (only) the veteran
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claimant {
    pub participant_id: String,
    pub payee_code: Option<String>,
}

/// Why a receipt date was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReceiptDateError {
    BeforeAma,
    InFuture,
}

impl ReceiptDateError {
    pub fn code(&self) -> &'static str {
        match self {
            ReceiptDateError::BeforeAma => "before_ama",
            ReceiptDateError::InFuture => "in_future",
        }
    }
}

impl std::fmt::Display for ReceiptDateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// A single intake validation failure, e.g. `receipt_date: blank`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub code: &'static str,
}

/// A Higher-Level Review or Supplemental Claim
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    /// Unique identifier
    pub id: ReviewId,
    /// Review kind
    pub kind: ReviewKind,
    /// Veteran's claims file number
    pub veteran_file_number: String,
    /// Date the review request was received
    pub receipt_date: Option<NaiveDate>,
    /// Benefit line
    pub benefit_type: BenefitType,
    /// Veteran opted legacy appeal issues into this review
    pub legacy_opt_in_approved: bool,
    /// Someone other than the veteran is the claimant
    pub veteran_is_not_claimant: bool,
    /// Claimant details
    pub claimant: Option<Claimant>,
    /// HLR only: informal conference requested
    pub informal_conference: Option<bool>,
    /// HLR only: same regional office requested
    pub same_office: Option<bool>,
    /// Review this claim was created to remand (DTA claims only)
    pub decision_review_remanded: Option<ReviewId>,
    /// Submitted for end product establishment
    pub establishment_submitted_at: Option<DateTime<Utc>>,
    /// End product establishment completed
    pub establishment_processed_at: Option<DateTime<Utc>>,
    /// Decisions synced from the claims system
    pub decision_issues: Vec<DecisionIssue>,
    /// End products established for this review
    pub end_product_establishments: Vec<EndProductEstablishment>,
    /// Remand claim created for DTA errors, when loaded
    pub dta_claim: Option<Box<Review>>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl Review {
    fn new(kind: ReviewKind, veteran_file_number: impl Into<String>, benefit_type: BenefitType) -> Self {
        let now = Utc::now();
        Self {
            id: ReviewId::new_v7(),
            kind,
            veteran_file_number: veteran_file_number.into(),
            receipt_date: None,
            benefit_type,
            legacy_opt_in_approved: false,
            veteran_is_not_claimant: false,
            claimant: None,
            informal_conference: None,
            same_office: None,
            decision_review_remanded: None,
            establishment_submitted_at: None,
            establishment_processed_at: None,
            decision_issues: Vec::new(),
            end_product_establishments: Vec::new(),
            dta_claim: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Creates a new Higher-Level Review at intake
    pub fn higher_level_review(veteran_file_number: impl Into<String>, benefit_type: BenefitType) -> Self {
        Self::new(ReviewKind::HigherLevelReview, veteran_file_number, benefit_type)
    }

    /// Creates a new Supplemental Claim at intake
    pub fn supplemental_claim(veteran_file_number: impl Into<String>, benefit_type: BenefitType) -> Self {
        Self::new(ReviewKind::SupplementalClaim, veteran_file_number, benefit_type)
    }

    pub fn with_receipt_date(mut self, receipt_date: NaiveDate) -> Self {
        self.receipt_date = Some(receipt_date);
        self
    }

    pub fn with_claimant(mut self, participant_id: impl Into<String>, payee_code: Option<String>) -> Self {
        self.claimant = Some(Claimant {
            participant_id: participant_id.into(),
            payee_code,
        });
        self
    }

    pub fn with_hlr_options(mut self, informal_conference: bool, same_office: bool) -> Self {
        self.informal_conference = Some(informal_conference);
        self.same_office = Some(same_office);
        self
    }

    pub fn with_legacy_opt_in_approved(mut self, approved: bool) -> Self {
        self.legacy_opt_in_approved = approved;
        self
    }

    /// Checks the receipt date against the AMA start date and `today`
    ///
    /// An absent receipt date passes; presence is only required at intake.
    pub fn validate_receipt_date(&self, today: NaiveDate) -> Result<(), ReviewError> {
        match self.receipt_date {
            Some(date) if date < ama_begin_date() => {
                Err(ReviewError::InvalidReceiptDate(ReceiptDateError::BeforeAma))
            }
            Some(date) if date > today => {
                Err(ReviewError::InvalidReceiptDate(ReceiptDateError::InFuture))
            }
            _ => Ok(()),
        }
    }

    /// Validates the review for saving at intake
    pub fn start_review(&self, today: NaiveDate) -> Result<(), ReviewError> {
        let mut errors = Vec::new();

        match self.validate_receipt_date(today) {
            Err(ReviewError::InvalidReceiptDate(reason)) => errors.push(FieldError {
                field: "receipt_date",
                code: reason.code(),
            }),
            Err(other) => return Err(other),
            Ok(()) => {}
        }
        if self.receipt_date.is_none() {
            errors.push(FieldError { field: "receipt_date", code: "blank" });
        }

        if self.kind == ReviewKind::HigherLevelReview {
            if self.informal_conference.is_none() {
                errors.push(FieldError { field: "informal_conference", code: "blank" });
            }
            if self.same_office.is_none() {
                errors.push(FieldError { field: "same_office", code: "blank" });
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ReviewError::Validation(errors))
        }
    }

    /// Identifier used by the status API
    pub fn review_status_id(&self) -> String {
        format!("{}{}", self.kind.status_id_prefix(), self.id.as_uuid())
    }

    pub fn linked_review_ids(&self) -> Vec<String> {
        vec![self.review_status_id()]
    }

    /// Reviews are never reported with an incomplete history
    pub fn incomplete_history(&self) -> bool {
        false
    }

    /// True when this review is itself a DTA remand claim
    pub fn is_dta_claim(&self) -> bool {
        self.decision_review_remanded.is_some()
    }

    /// Any of this review's own end products still open
    pub fn end_product_active(&self) -> bool {
        self.end_product_establishments.iter().any(|ep| ep.is_active())
    }

    pub fn dta_claim(&self) -> Option<&Review> {
        self.dta_claim.as_deref()
    }

    pub fn dta_claim_active(&self) -> bool {
        self.dta_claim().map_or(false, |claim| claim.is_active())
    }

    /// Active while any own end product is open or the DTA claim is active
    pub fn is_active(&self) -> bool {
        self.end_product_active() || self.dta_claim_active()
    }

    pub fn add_decision_issue(&mut self, issue: DecisionIssue) {
        self.decision_issues.push(issue);
        self.updated_at = Utc::now();
    }

    pub fn add_end_product(&mut self, end_product: EndProductEstablishment) {
        self.end_product_establishments.push(end_product);
        self.updated_at = Utc::now();
    }

    /// Attaches a loaded DTA claim
    pub fn attach_dta_claim(&mut self, claim: Review) {
        self.dta_claim = Some(Box::new(claim));
    }

    /// First modifier for this review kind not already used by an end product
    pub fn next_end_product_modifier(&self) -> Option<&'static str> {
        self.kind.end_product_modifiers().iter().copied().find(|modifier| {
            !self
                .end_product_establishments
                .iter()
                .any(|ep| ep.modifier.as_deref() == Some(*modifier))
        })
    }

    /// Review lanes available to contest this review's decision
    ///
    /// Fiduciary decisions can only be appealed. This departs from the
    /// previous status service, which offered `supplemental_claim` and
    /// `appeal` for every benefit type, so fiduciary reviews report fewer
    /// options than clients of that service have seen.
    pub fn available_review_options(&self) -> Vec<&'static str> {
        if self.benefit_type == BenefitType::Fiduciary {
            return vec!["appeal"];
        }
        vec!["supplemental_claim", "appeal"]
    }

    pub fn program_area(&self) -> &'static str {
        self.benefit_type.program_area()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_receipt_date_on_ama_start_is_valid() {
        let review = Review::supplemental_claim("123456789", BenefitType::Compensation)
            .with_receipt_date(ama_begin_date());
        assert!(review.validate_receipt_date(date(2024, 1, 1)).is_ok());
    }

    #[test]
    fn test_receipt_date_before_ama_rejected() {
        let review = Review::supplemental_claim("123456789", BenefitType::Compensation)
            .with_receipt_date(date(2018, 4, 16));
        assert!(matches!(
            review.validate_receipt_date(date(2024, 1, 1)),
            Err(ReviewError::InvalidReceiptDate(ReceiptDateError::BeforeAma))
        ));
    }

    #[test]
    fn test_receipt_date_today_valid_tomorrow_rejected() {
        let today = date(2024, 6, 1);
        let review = Review::higher_level_review("123456789", BenefitType::Pension)
            .with_receipt_date(today);
        assert!(review.validate_receipt_date(today).is_ok());

        let future = review.with_receipt_date(date(2024, 6, 2));
        assert!(matches!(
            future.validate_receipt_date(today),
            Err(ReviewError::InvalidReceiptDate(ReceiptDateError::InFuture))
        ));
    }

    #[test]
    fn test_start_review_requires_hlr_options_and_receipt_date() {
        let review = Review::higher_level_review("123456789", BenefitType::Compensation);
        let Err(ReviewError::Validation(errors)) = review.start_review(date(2024, 1, 1)) else {
            panic!("expected validation errors");
        };
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(&FieldError { field: "receipt_date", code: "blank" }));
        assert!(errors.contains(&FieldError { field: "same_office", code: "blank" }));
    }

    #[test]
    fn test_start_review_supplemental_claim_ignores_hlr_options() {
        let review = Review::supplemental_claim("123456789", BenefitType::Education)
            .with_receipt_date(date(2023, 3, 3));
        assert!(review.start_review(date(2024, 1, 1)).is_ok());
    }

    #[test]
    fn test_review_status_id_prefix() {
        let hlr = Review::higher_level_review("1", BenefitType::Compensation);
        let sc = Review::supplemental_claim("1", BenefitType::Compensation);
        assert!(hlr.review_status_id().starts_with("HLR"));
        assert!(sc.review_status_id().starts_with("SC"));
        assert_eq!(hlr.linked_review_ids(), vec![hlr.review_status_id()]);
    }

    #[test]
    fn test_available_review_options() {
        let fiduciary = Review::higher_level_review("1", BenefitType::Fiduciary);
        let comp = Review::higher_level_review("1", BenefitType::Compensation);
        // fiduciary narrows the lanes even though both used to be offered
        assert_eq!(fiduciary.available_review_options(), vec!["appeal"]);
        assert_eq!(comp.available_review_options(), vec!["supplemental_claim", "appeal"]);
    }

    #[test]
    fn test_next_end_product_modifier_skips_taken() {
        let mut hlr = Review::higher_level_review("1", BenefitType::Compensation);
        assert_eq!(hlr.next_end_product_modifier(), Some("030"));

        hlr.add_end_product(EndProductEstablishment::new(hlr.id, "030HLRR").with_modifier("030"));
        assert_eq!(hlr.next_end_product_modifier(), Some("031"));
    }

    #[test]
    fn test_benefit_type_round_trip_and_program_area() {
        for value in ["compensation", "vha", "voc_rehab", "nca", "loan_guaranty"] {
            let parsed = BenefitType::parse(value).unwrap();
            assert_eq!(parsed.as_str(), value);
        }
        assert_eq!(BenefitType::Vha.program_area(), "medical");
        assert!(!BenefitType::Compensation.processed_in_house());
        assert!(BenefitType::Education.processed_in_house());
    }
}
