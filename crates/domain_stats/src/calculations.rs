//! The named metrics computed for every interval

use domain_review::ReviewKind;

use crate::metric::{ActivityField, ActivityFilter, Aggregation, Measure, MetricDefinition};

const fn count(name: &'static str, field: ActivityField, filter: ActivityFilter) -> MetricDefinition {
    MetricDefinition { name, field, filter, aggregation: Aggregation::Count }
}

const fn percentile(name: &'static str, field: ActivityField, measure: Measure, pct: u8) -> MetricDefinition {
    MetricDefinition {
        name,
        field,
        filter: ActivityFilter::All,
        aggregation: Aggregation::Percentile { measure, pct },
    }
}

pub const REVIEW_CALCULATIONS: &[MetricDefinition] = &[
    count("reviews_received", ActivityField::Received, ActivityFilter::All),
    count(
        "higher_level_reviews_received",
        ActivityField::Received,
        ActivityFilter::Kind(ReviewKind::HigherLevelReview),
    ),
    count(
        "supplemental_claims_received",
        ActivityField::Received,
        ActivityFilter::Kind(ReviewKind::SupplementalClaim),
    ),
    count("dta_supplemental_claims_created", ActivityField::Received, ActivityFilter::DtaClaims),
    count("reviews_established", ActivityField::Established, ActivityFilter::All),
    count("reviews_decided", ActivityField::Decided, ActivityFilter::All),
    MetricDefinition {
        name: "distinct_veterans_with_decisions",
        field: ActivityField::Decided,
        filter: ActivityFilter::All,
        aggregation: Aggregation::DistinctVeterans,
    },
    percentile("time_to_establish", ActivityField::Established, Measure::TimeToEstablish, 95),
    percentile("median_time_to_establish", ActivityField::Established, Measure::TimeToEstablish, 50),
    percentile("time_to_decision", ActivityField::Decided, Measure::TimeToDecision, 95),
    percentile("median_time_to_decision", ActivityField::Decided, Measure::TimeToDecision, 50),
];
