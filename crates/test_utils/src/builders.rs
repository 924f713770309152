//! Test Data Builders
//!
//! Builders for reviews with sensible defaults, so tests only state the
//! parts of the lifecycle they care about.

use chrono::{DateTime, NaiveDate, Utc};

use core_kernel::ReviewId;
use domain_review::{
    BenefitType, DecisionIssue, EndProductEstablishment, EndProductStatus, Review, ReviewKind,
};

use crate::fixtures::{DateFixtures, VeteranFixtures};

/// Builder for reviews in any lifecycle state
pub struct ReviewBuilder {
    kind: ReviewKind,
    id: Option<ReviewId>,
    file_number: String,
    benefit_type: BenefitType,
    receipt_date: Option<NaiveDate>,
    end_products: Vec<(Option<EndProductStatus>, DateTime<Utc>)>,
    decisions: Vec<PendingIssue>,
    dta_claim: Option<Review>,
}

struct PendingIssue {
    disposition: String,
    description: Option<String>,
    approx_decision_date: Option<NaiveDate>,
    promulgation_date: Option<NaiveDate>,
}

impl ReviewBuilder {
    fn new(kind: ReviewKind) -> Self {
        Self {
            kind,
            id: None,
            file_number: VeteranFixtures::file_number().to_string(),
            benefit_type: BenefitType::Compensation,
            receipt_date: Some(DateFixtures::receipt_date()),
            end_products: Vec::new(),
            decisions: Vec::new(),
            dta_claim: None,
        }
    }

    pub fn higher_level_review() -> Self {
        Self::new(ReviewKind::HigherLevelReview)
    }

    pub fn supplemental_claim() -> Self {
        Self::new(ReviewKind::SupplementalClaim)
    }

    pub fn with_id(mut self, id: ReviewId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_file_number(mut self, file_number: impl Into<String>) -> Self {
        self.file_number = file_number.into();
        self
    }

    pub fn with_benefit_type(mut self, benefit_type: BenefitType) -> Self {
        self.benefit_type = benefit_type;
        self
    }

    pub fn with_receipt_date(mut self, receipt_date: Option<NaiveDate>) -> Self {
        self.receipt_date = receipt_date;
        self
    }

    /// End product established but never synced
    pub fn with_pending_end_product(mut self) -> Self {
        self.end_products.push((None, DateFixtures::now()));
        self
    }

    pub fn with_cleared_end_product(mut self) -> Self {
        self.end_products
            .push((Some(EndProductStatus::Cleared), DateFixtures::now()));
        self
    }

    pub fn with_canceled_end_product(mut self) -> Self {
        self.end_products
            .push((Some(EndProductStatus::Canceled), DateFixtures::now()));
        self
    }

    /// Decided issue dated on the promulgation fixture date
    pub fn with_decision(mut self, disposition: &str, description: &str) -> Self {
        self.decisions.push(PendingIssue {
            disposition: disposition.to_string(),
            description: Some(description.to_string()),
            approx_decision_date: Some(DateFixtures::approx_decision_date()),
            promulgation_date: Some(DateFixtures::promulgation_date()),
        });
        self
    }

    /// Issue returned for a duty-to-assist error
    pub fn with_dta_error(mut self, disposition: &str) -> Self {
        self.decisions.push(PendingIssue {
            disposition: disposition.to_string(),
            description: None,
            approx_decision_date: Some(DateFixtures::approx_decision_date()),
            promulgation_date: None,
        });
        self
    }

    /// Attaches a dependent claim; its remand link is set on build
    pub fn with_dta_claim(mut self, claim: Review) -> Self {
        self.dta_claim = Some(claim);
        self
    }

    pub fn build(self) -> Review {
        let mut review = match self.kind {
            ReviewKind::HigherLevelReview => {
                Review::higher_level_review(self.file_number, self.benefit_type).with_hlr_options(false, false)
            }
            ReviewKind::SupplementalClaim => Review::supplemental_claim(self.file_number, self.benefit_type),
        };
        if let Some(id) = self.id {
            review.id = id;
        }
        review.receipt_date = self.receipt_date;

        for (index, (status, synced_at)) in self.end_products.into_iter().enumerate() {
            let modifier = review
                .next_end_product_modifier()
                .unwrap_or("000")
                .to_string();
            let mut end_product = EndProductEstablishment::new(review.id, "030HLRR")
                .with_modifier(modifier)
                .with_reference_id(format!("EP-{index}"));
            if let Some(status) = status {
                end_product.record_sync(status, synced_at);
            }
            review.add_end_product(end_product);
        }

        for pending in self.decisions {
            let mut issue = DecisionIssue::new(review.id, review.benefit_type, pending.disposition);
            if let Some(description) = pending.description {
                issue = issue.with_description(description);
            }
            if let Some(date) = pending.approx_decision_date {
                issue = issue.with_approx_decision_date(date);
            }
            if let Some(date) = pending.promulgation_date {
                issue = issue.with_promulgation_date(date);
            }
            review.add_decision_issue(issue);
        }

        if let Some(mut claim) = self.dta_claim {
            claim.decision_review_remanded = Some(review.id);
            review.attach_dta_claim(claim);
        }
        review
    }
}
