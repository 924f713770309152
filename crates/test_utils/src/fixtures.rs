//! Pre-built Test Fixtures
//!
//! Ready-to-use test data for reviews, veterans and activity rows.
//! Values are fixed so assertions can be written against them.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use once_cell::sync::Lazy;
use uuid::Uuid;

use core_kernel::ReviewId;
use domain_review::{BenefitType, DecisionIssue, LegacyAppealStatus, Review};
use domain_stats::ReviewActivity;

use crate::builders::ReviewBuilder;

/// Review a fixed-id HLR is created with
pub static FIXED_REVIEW_ID: Lazy<ReviewId> = Lazy::new(|| {
    ReviewId::from_uuid(Uuid::from_u128(0x0190_0000_0000_7000_8000_0000_0000_0001))
});

/// Veteran identity test data
pub struct VeteranFixtures;

impl VeteranFixtures {
    pub fn ssn() -> &'static str {
        "123456789"
    }

    /// Nine-digit file number; its VACOLS id carries the `S` suffix
    pub fn file_number() -> &'static str {
        "123456789"
    }

    pub fn vbms_id() -> &'static str {
        "123456789S"
    }

    /// Short claim-number style file number
    pub fn claim_number() -> &'static str {
        "1234567"
    }

    pub fn claim_number_vbms_id() -> &'static str {
        "1234567C"
    }
}

/// Dates used across review tests
pub struct DateFixtures;

impl DateFixtures {
    /// First day decision reviews could be filed
    pub fn ama_begin() -> NaiveDate {
        domain_review::ama_begin_date()
    }

    pub fn receipt_date() -> NaiveDate {
        date(2024, 1, 5)
    }

    pub fn approx_decision_date() -> NaiveDate {
        date(2024, 2, 1)
    }

    pub fn promulgation_date() -> NaiveDate {
        date(2024, 3, 1)
    }

    /// A fixed "today" well after every fixture date
    pub fn today() -> NaiveDate {
        date(2024, 6, 1)
    }

    /// Noon UTC on a fixed Wednesday
    pub fn now() -> DateTime<Utc> {
        at(2024, 6, 5, 12)
    }
}

/// Reviews in well-known lifecycle states
pub struct ReviewFixtures;

impl ReviewFixtures {
    /// Compensation HLR received, no end product yet
    pub fn received_hlr() -> Review {
        ReviewBuilder::higher_level_review().build()
    }

    /// HLR with the fixed id, for tests that compare persisted ids
    pub fn fixed_id_hlr() -> Review {
        ReviewBuilder::higher_level_review().with_id(*FIXED_REVIEW_ID).build()
    }

    /// HLR whose end product is still pending
    pub fn pending_hlr() -> Review {
        ReviewBuilder::higher_level_review().with_pending_end_product().build()
    }

    /// HLR decided with a grant; no end product on file
    pub fn decided_hlr() -> Review {
        ReviewBuilder::higher_level_review()
            .with_decision("Granted", "Service connection for tinnitus")
            .build()
    }

    /// HLR whose cleared end product came back with a DTA error
    pub fn hlr_with_dta_error() -> Review {
        ReviewBuilder::higher_level_review()
            .with_cleared_end_product()
            .with_dta_error("DTA Error - PMRs")
            .build()
    }

    /// HLR with a DTA error whose decision date was never recorded
    pub fn hlr_with_undated_dta_error() -> Review {
        let mut review = ReviewBuilder::higher_level_review().build();
        review.add_decision_issue(DecisionIssue::new(review.id, review.benefit_type, "DTA Error - Exam/MO"));
        review
    }

    /// Supplemental Claim closed without a decision
    pub fn canceled_sc() -> Review {
        ReviewBuilder::supplemental_claim().with_canceled_end_product().build()
    }
}

/// Legacy appeal statuses
pub struct LegacyAppealFixtures;

impl LegacyAppealFixtures {
    pub fn pending(id: &str, aoj: &str) -> LegacyAppealStatus {
        LegacyAppealStatus {
            id: id.to_string(),
            appeal_ids: vec![format!("{id}-1")],
            status_type: "pending_hearing_scheduling".to_string(),
            active: true,
            aoj: aoj.to_string(),
            program_area: "compensation".to_string(),
            description: "Service connection for knee".to_string(),
            updated: at(2024, 5, 1, 9),
        }
    }

    pub fn vba(id: &str) -> LegacyAppealStatus {
        Self::pending(id, "vba")
    }
}

/// Activity rows the stats batch is computed over
pub struct ActivityFixtures;

impl ActivityFixtures {
    /// Received at `received_at`, established and decided after the given hours
    pub fn hlr(
        received_at: DateTime<Utc>,
        established_after_hours: Option<i64>,
        decided_after_hours: Option<i64>,
    ) -> ReviewActivity {
        ReviewActivity {
            review_id: ReviewId::new_v7(),
            kind: domain_review::ReviewKind::HigherLevelReview,
            veteran_file_number: VeteranFixtures::file_number().to_string(),
            benefit_type: BenefitType::Compensation,
            is_dta_claim: false,
            received_at,
            established_at: established_after_hours.map(|h| received_at + chrono::Duration::hours(h)),
            decided_at: decided_after_hours.map(|h| received_at + chrono::Duration::hours(h)),
        }
    }
}

/// Calendar date; panics on an invalid date
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid fixture date")
}

/// UTC timestamp on the hour; panics on an invalid time
pub fn at(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, 0, 0)
        .single()
        .expect("valid fixture timestamp")
}
