//! Property-Based Test Generators
//!
//! Proptest strategies for identity values and review lifecycle state, plus
//! `fake`-backed helpers for free text.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use fake::faker::lorem::en::Sentence;
use fake::Fake;
use proptest::prelude::*;

use domain_review::{BenefitType, StatusSnapshot, DTA_ERRORS};
use domain_stats::ReviewActivity;

use crate::fixtures::DateFixtures;

/// Nine ASCII digits
pub fn ssn_strategy() -> impl Strategy<Value = String> {
    "[0-9]{9}"
}

/// Anything that is not exactly nine ASCII digits
pub fn invalid_ssn_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[0-9]{0,8}",
        "[0-9]{10,12}",
        "[0-9]{3}-[0-9]{2}-[0-9]{4}",
        "[0-9]{8}[a-zA-Z]",
    ]
}

/// Claims file numbers: nine-digit SSN style or shorter claim numbers
pub fn file_number_strategy() -> impl Strategy<Value = String> {
    prop_oneof!["[0-9]{9}", "[1-9][0-9]{0,7}"]
}

pub fn benefit_type_strategy() -> impl Strategy<Value = BenefitType> {
    prop_oneof![
        Just(BenefitType::Compensation),
        Just(BenefitType::Pension),
        Just(BenefitType::Fiduciary),
        Just(BenefitType::Education),
        Just(BenefitType::Insurance),
        Just(BenefitType::LoanGuaranty),
        Just(BenefitType::Vha),
        Just(BenefitType::VocRehab),
        Just(BenefitType::Nca),
    ]
}

/// Dispositions mixing DTA errors with ordinary outcomes
pub fn disposition_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        proptest::sample::select(DTA_ERRORS.to_vec()).prop_map(str::to_string),
        proptest::sample::select(vec!["Granted", "Denied", "Dismissed", "Withdrawn"])
            .prop_map(str::to_string),
    ]
}

/// Receipt dates from the AMA start through the fixture "today"
pub fn receipt_date_strategy() -> impl Strategy<Value = NaiveDate> {
    let start = DateFixtures::ama_begin();
    let days = (DateFixtures::today() - start).num_days();
    (0..=days).prop_map(move |offset| start + Duration::days(offset))
}

/// Status snapshots up to `depth` dependent claims deep
pub fn status_snapshot_strategy(depth: u32) -> impl Strategy<Value = StatusSnapshot> {
    let leaf = (any::<bool>(), any::<bool>()).prop_map(|(end_product_active, has_decision_issues)| {
        StatusSnapshot {
            end_product_active,
            dependent_claim: None,
            has_decision_issues,
        }
    });
    leaf.prop_recursive(depth, depth * 2, 1, |inner| {
        (any::<bool>(), proptest::option::of(inner), any::<bool>()).prop_map(
            |(end_product_active, dependent, has_decision_issues)| StatusSnapshot {
                end_product_active,
                dependent_claim: dependent.map(Box::new),
                has_decision_issues,
            },
        )
    })
}

/// Activity rows received within `days` before `now`
pub fn activity_strategy(now: DateTime<Utc>, days: i64) -> impl Strategy<Value = ReviewActivity> {
    (
        0..days * 24 * 60,
        proptest::option::of(0i64..10_000),
        proptest::option::of(0i64..100_000),
        any::<bool>(),
    )
        .prop_map(move |(minutes_ago, established, decided, is_dta_claim)| {
            let received_at = now - Duration::minutes(minutes_ago);
            ReviewActivity {
                review_id: core_kernel::ReviewId::new_v7(),
                kind: if is_dta_claim {
                    domain_review::ReviewKind::SupplementalClaim
                } else {
                    domain_review::ReviewKind::HigherLevelReview
                },
                veteran_file_number: format!("{:09}", minutes_ago % 1_000),
                benefit_type: BenefitType::Compensation,
                is_dta_claim,
                received_at,
                established_at: established.map(|m| received_at + Duration::minutes(m)),
                decided_at: decided.map(|m| received_at + Duration::minutes(m)),
            }
        })
}

/// A plausible free-text issue description
pub fn fake_issue_description() -> String {
    Sentence(3..10).fake()
}

/// A random moment within the fixture year
pub fn fake_timestamp_in_2024() -> DateTime<Utc> {
    let seconds: i64 = (0..365 * 24 * 60 * 60).fake();
    Utc.timestamp_opt(1_704_067_200 + seconds, 0)
        .single()
        .unwrap_or_else(DateFixtures::now)
}
