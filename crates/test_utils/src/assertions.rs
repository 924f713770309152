//! Custom Test Assertions
//!
//! Assertion helpers for review and stats types that give more meaningful
//! failure messages than plain `assert_eq!`.

use serde_json::Value;

use domain_review::{DerivedStatus, Review, ReviewEvent};
use domain_stats::StatsSnapshot;

/// Asserts the derived status of a review
pub fn assert_status(review: &Review, expected: DerivedStatus) {
    let actual = review.derived_status();
    assert_eq!(
        actual, expected,
        "Review {} has status {}, expected {}",
        review.id, actual, expected
    );
}

/// Asserts that `claim` is the DTA follow-up of `parent`
pub fn assert_dta_claim_of(claim: &Review, parent: &Review) {
    assert_eq!(
        claim.decision_review_remanded,
        Some(parent.id),
        "Review {} is not a DTA claim of {}",
        claim.id,
        parent.id
    );
    assert_eq!(claim.veteran_file_number, parent.veteran_file_number, "DTA claim veteran differs");
    assert_eq!(claim.benefit_type, parent.benefit_type, "DTA claim benefit type differs");
}

/// Asserts event types in order, ignoring dates
pub fn assert_event_types(events: &[ReviewEvent], expected: &[&str]) {
    let actual: Vec<&str> = events.iter().map(|e| e.event_type.as_str()).collect();
    assert_eq!(actual, expected, "Unexpected event sequence");
}

/// Asserts a metric value within a small tolerance
pub fn assert_metric(snapshot: &StatsSnapshot, name: &str, expected: Option<f64>) {
    let actual = snapshot.value(name);
    match (actual, expected) {
        (Some(a), Some(e)) => assert!(
            (a - e).abs() < 1e-9,
            "Metric {name} for {:?} is {a}, expected {e}",
            snapshot.interval
        ),
        (a, e) => assert_eq!(a, e, "Metric {name} for {:?}", snapshot.interval),
    }
}

/// Asserts a v2 appeals error body: `{"errors": [{status, title, detail}]}`
pub fn assert_appeals_error(body: &Value, status: u16, title: &str) {
    let error = &body["errors"][0];
    assert_eq!(error["status"], status.to_string(), "Unexpected error status in {body}");
    assert_eq!(error["title"], title, "Unexpected error title in {body}");
    assert!(error["detail"].is_string(), "Missing error detail in {body}");
}

/// Asserts a `{error, message}` body with the given error code
pub fn assert_error_code(body: &Value, code: &str) {
    assert_eq!(body["error"], code, "Unexpected error body {body}");
    assert!(body["message"].is_string(), "Missing message in {body}");
}
