//! HTTP tests for interface_api over in-memory adapters

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::{NaiveDate, Utc};
use serde_json::{json, Value};
use tower::util::ServiceExt;

use domain_review::{
    BenefitType, DecisionIssue, InMemoryReviewStore, LegacyAppealStatus, MockLegacyAppeals,
    MockVeteranLookup, Review, ReviewPort, StatusStrategy,
};
use domain_stats::{InMemoryActivitySource, InMemoryStatsStore};
use interface_api::{
    auth::{create_token, permissions},
    config::ApiConfig,
    create_router, Adapters, AppState,
};

const SSN: &str = "123456789";
const FILE_NUMBER: &str = "123456789";

struct TestApp {
    router: Router,
    config: ApiConfig,
    reviews: InMemoryReviewStore,
    veterans: MockVeteranLookup,
    legacy: MockLegacyAppeals,
}

impl TestApp {
    fn new(config: ApiConfig) -> Self {
        let reviews = InMemoryReviewStore::new();
        let veterans = MockVeteranLookup::new();
        let legacy = MockLegacyAppeals::new();
        let adapters = Adapters {
            reviews: Arc::new(reviews.clone()),
            intake: Arc::new(reviews.clone()),
            veterans: Arc::new(veterans.clone()),
            legacy_appeals: Arc::new(legacy.clone()),
            activity: Arc::new(InMemoryActivitySource::new()),
            stats_store: Arc::new(InMemoryStatsStore::new()),
        };
        let router = create_router(AppState::new(config.clone(), adapters));
        Self { router, config, reviews, veterans, legacy }
    }

    fn token(&self, roles: &[&str]) -> String {
        let roles = roles.iter().map(|r| r.to_string()).collect();
        create_token("vets-api", roles, &self.config.jwt_secret, 3600).unwrap()
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    async fn get_appeals(&self, ssn: &str, query: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .uri(format!("/api/v2/appeals{query}"))
            .header("Authorization", format!("Bearer {}", self.token(&[permissions::APPEALS_READ])))
            .header("ssn", ssn)
            .header("source", "va.gov")
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    async fn post_json(&self, uri: &str, roles: &[&str], body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("Authorization", format!("Bearer {}", self.token(roles)))
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    async fn get(&self, uri: &str, roles: &[&str]) -> (StatusCode, Value) {
        let request = Request::builder()
            .uri(uri)
            .header("Authorization", format!("Bearer {}", self.token(roles)))
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn decided_hlr() -> Review {
    let mut review = Review::higher_level_review(FILE_NUMBER, BenefitType::Compensation)
        .with_receipt_date(date(2024, 1, 5))
        .with_hlr_options(false, false);
    review.add_decision_issue(
        DecisionIssue::new(review.id, BenefitType::Compensation, "Granted")
            .with_description("Service connection for tinnitus")
            .with_promulgation_date(date(2024, 3, 1)),
    );
    review
}

fn legacy_appeal(id: &str, aoj: &str) -> LegacyAppealStatus {
    LegacyAppealStatus {
        id: id.to_string(),
        appeal_ids: vec!["1234567".to_string()],
        status_type: "pending_hearing_scheduling".to_string(),
        active: true,
        aoj: aoj.to_string(),
        program_area: "compensation".to_string(),
        description: "Service connection for knee".to_string(),
        updated: Utc::now(),
    }
}

mod health {
    use super::*;

    #[tokio::test]
    async fn test_health_requires_no_auth() {
        let app = TestApp::new(ApiConfig::default());
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();

        let (status, body) = app.send(request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_readiness_reports_unhealthy_lookup() {
        let app = TestApp::new(ApiConfig::default());
        app.veterans.set_timeout(true).await;
        let request = Request::builder().uri("/health/ready").body(Body::empty()).unwrap();

        let (status, body) = app.send(request).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "unavailable");
    }
}

mod appeals {
    use super::*;

    #[tokio::test]
    async fn test_missing_token_is_unauthorized() {
        let app = TestApp::new(ApiConfig::default());
        let request = Request::builder()
            .uri("/api/v2/appeals")
            .header("ssn", SSN)
            .body(Body::empty())
            .unwrap();

        let (status, _) = app.send(request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_malformed_ssn_is_unprocessable() {
        let app = TestApp::new(ApiConfig::default());

        for ssn in ["12345678", "12345678a", "1234567890"] {
            let (status, body) = app.get_appeals(ssn, "").await;
            assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
            assert_eq!(
                body,
                json!({"errors": [{
                    "status": "422",
                    "title": "Invalid SSN",
                    "detail": "Please enter a valid 9 digit SSN in the 'ssn' header"
                }]})
            );
        }
        assert_eq!(app.veterans.calls(), 0);
    }

    #[tokio::test]
    async fn test_unknown_veteran_is_not_found() {
        let app = TestApp::new(ApiConfig::default());

        let (status, body) = app.get_appeals(SSN, "").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["errors"][0]["title"], "Veteran not found");
        assert_eq!(body["errors"][0]["detail"], "A veteran with that SSN was not found in our systems.");
    }

    #[tokio::test]
    async fn test_lookup_timeout_is_gateway_timeout() {
        let app = TestApp::new(ApiConfig::default());
        app.veterans.set_timeout(true).await;

        let (status, body) = app.get_appeals(SSN, "").await;

        assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(body["errors"][0]["status"], "504");
        assert_eq!(body["errors"][0]["detail"], "Upstream service timed out");
    }

    #[tokio::test]
    async fn test_lists_reviews_and_vba_legacy_appeals() {
        let app = TestApp::new(ApiConfig::default());
        app.veterans.add_veteran(SSN, FILE_NUMBER).await;
        let review = decided_hlr();
        app.reviews.insert(review.clone()).await;
        app.legacy.add_appeal("123456789S", legacy_appeal("A100", "vba")).await;
        app.legacy.add_appeal("123456789S", legacy_appeal("A200", "vha")).await;

        let (status, body) = app.get_appeals(SSN, "").await;

        assert_eq!(status, StatusCode::OK);
        let data = body["data"].as_array().unwrap();
        assert_eq!(data.len(), 2);

        let entry = &data[0];
        assert_eq!(entry["type"], "higherLevelReview");
        assert_eq!(entry["id"], review.review_status_id());
        assert_eq!(entry["attributes"]["status"]["type"], "hlr_decision");
        assert_eq!(entry["attributes"]["programArea"], "compensation");
        assert_eq!(entry["attributes"]["incompleteHistory"], false);
        assert_eq!(entry["attributes"]["alerts"][0]["type"], "ama_post_decision");
        assert_eq!(entry["attributes"]["alerts"][0]["details"]["dueDate"], "2025-03-01");

        assert_eq!(data[1]["id"], "A100");
        assert_eq!(data[1]["type"], "legacyAppeal");
    }

    #[tokio::test]
    async fn test_legacy_only_strategy_omits_reviews() {
        let config = ApiConfig {
            appeal_status_strategy: StatusStrategy::LegacyOnly,
            ..Default::default()
        };
        let app = TestApp::new(config);
        app.veterans.add_veteran(SSN, FILE_NUMBER).await;
        app.reviews.insert(decided_hlr()).await;
        app.legacy.add_appeal("123456789S", legacy_appeal("A100", "vba")).await;

        let (status, body) = app.get_appeals(SSN, "").await;

        assert_eq!(status, StatusCode::OK);
        let data = body["data"].as_array().unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data[0]["type"], "legacyAppeal");
    }

    #[tokio::test]
    async fn test_second_call_is_served_from_cache() {
        let app = TestApp::new(ApiConfig::default());
        app.veterans.add_veteran(SSN, FILE_NUMBER).await;
        app.reviews.insert(decided_hlr()).await;

        let (_, first) = app.get_appeals(SSN, "").await;
        app.reviews.insert(decided_hlr()).await;
        let (_, second) = app.get_appeals(SSN, "").await;

        assert_eq!(first, second);
        assert_eq!(second["data"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_reload_bypasses_cache_outside_production() {
        let app = TestApp::new(ApiConfig::default());
        app.veterans.add_veteran(SSN, FILE_NUMBER).await;
        app.reviews.insert(decided_hlr()).await;

        app.get_appeals(SSN, "").await;
        app.reviews.insert(decided_hlr()).await;
        let (_, reloaded) = app.get_appeals(SSN, "?reload=true").await;

        assert_eq!(reloaded["data"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_reload_is_ignored_in_production() {
        let config = ApiConfig {
            deploy_env: "prod".to_string(),
            ..Default::default()
        };
        let app = TestApp::new(config);
        app.veterans.add_veteran(SSN, FILE_NUMBER).await;
        app.reviews.insert(decided_hlr()).await;

        app.get_appeals(SSN, "").await;
        app.reviews.insert(decided_hlr()).await;
        let (_, reloaded) = app.get_appeals(SSN, "?reload=true").await;

        assert_eq!(reloaded["data"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_role_is_forbidden() {
        let app = TestApp::new(ApiConfig::default());
        let request = Request::builder()
            .uri("/api/v2/appeals")
            .header("Authorization", format!("Bearer {}", app.token(&[permissions::STATS_READ])))
            .header("ssn", SSN)
            .body(Body::empty())
            .unwrap();

        let (status, body) = app.send(request).await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "forbidden");
    }
}

mod reviews {
    use super::*;

    fn sync_uri(review: &Review) -> String {
        format!("/api/v1/reviews/{}/decision-issues/sync", review.id.as_uuid())
    }

    async fn hlr_in(app: &TestApp) -> Review {
        let review = Review::higher_level_review(FILE_NUMBER, BenefitType::Compensation)
            .with_receipt_date(date(2024, 1, 5))
            .with_hlr_options(false, false);
        app.reviews.insert(review.clone()).await;
        review
    }

    #[tokio::test]
    async fn test_dta_sync_creates_follow_up_claim_once() {
        let app = TestApp::new(ApiConfig::default());
        let review = hlr_in(&app).await;
        let body = json!({"decision_issues": [{
            "disposition": "DTA Error - PMRs",
            "benefit_type": "compensation",
            "approx_decision_date": "2024-02-01"
        }]});

        let (status, first) = app
            .post_json(&sync_uri(&review), &[permissions::REVIEWS_SYNC], body.clone())
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(first["outcome"], "created");
        assert_eq!(first["issue_count"], 1);

        let (status, second) = app
            .post_json(&sync_uri(&review), &[permissions::REVIEWS_SYNC], body)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(second["outcome"], "already_exists");
        assert_eq!(app.reviews.dependent_claims_of(review.id).await.len(), 1);
    }

    #[tokio::test]
    async fn test_resync_keeps_decision_contested_by_follow_up_claim() {
        let app = TestApp::new(ApiConfig::default());
        let review = hlr_in(&app).await;
        let dta = json!({
            "disposition": "DTA Error - Fed Recs",
            "benefit_type": "compensation",
            "description": "Hearing loss",
            "approx_decision_date": "2024-02-01"
        });

        let (status, _) = app
            .post_json(&sync_uri(&review), &[permissions::REVIEWS_SYNC], json!({"decision_issues": [dta.clone()]}))
            .await;
        assert_eq!(status, StatusCode::OK);
        let claim_id = app.reviews.dependent_claims_of(review.id).await[0].id;
        let contested = app.reviews.request_issues(claim_id).await[0].contested_decision_issue_id;

        let resync = json!({"decision_issues": [
            {"disposition": "Granted", "benefit_type": "compensation", "description": "Tinnitus"},
            dta
        ]});
        let (status, outcome) = app
            .post_json(&sync_uri(&review), &[permissions::REVIEWS_SYNC], resync)
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(outcome["outcome"], "already_exists");
        let parent = app.reviews.get_review(review.id).await.unwrap();
        assert_eq!(parent.decision_issues.len(), 2);
        assert_eq!(Some(parent.decision_issues[1].id), contested);
    }

    #[tokio::test]
    async fn test_sync_without_dta_errors_creates_nothing() {
        let app = TestApp::new(ApiConfig::default());
        let review = hlr_in(&app).await;
        let body = json!({"decision_issues": [{"disposition": "Granted", "benefit_type": "compensation"}]});

        let (status, outcome) = app
            .post_json(&sync_uri(&review), &[permissions::REVIEWS_SYNC], body)
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(outcome["outcome"], "not_needed");
        assert_eq!(app.reviews.review_count().await, 1);
    }

    #[tokio::test]
    async fn test_missing_approx_decision_date_is_internal_error() {
        let app = TestApp::new(ApiConfig::default());
        let review = hlr_in(&app).await;
        let body = json!({"decision_issues": [{"disposition": "DTA Error - Exam/MO", "benefit_type": "compensation"}]});

        let (status, error) = app
            .post_json(&sync_uri(&review), &[permissions::REVIEWS_SYNC], body)
            .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error["error"], "internal_error");
        assert!(app.reviews.dependent_claims_of(review.id).await.is_empty());
    }

    #[tokio::test]
    async fn test_blank_disposition_is_rejected() {
        let app = TestApp::new(ApiConfig::default());
        let review = hlr_in(&app).await;
        let body = json!({"decision_issues": [{"disposition": "", "benefit_type": "compensation"}]});

        let (status, error) = app
            .post_json(&sync_uri(&review), &[permissions::REVIEWS_SYNC], body)
            .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(error["error"], "validation_error");
    }

    #[tokio::test]
    async fn test_sync_for_unknown_review_is_not_found() {
        let app = TestApp::new(ApiConfig::default());
        let review = Review::higher_level_review(FILE_NUMBER, BenefitType::Compensation);

        let (status, _) = app
            .post_json(&sync_uri(&review), &[permissions::REVIEWS_SYNC], json!({"decision_issues": []}))
            .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_status_of_decided_review() {
        let app = TestApp::new(ApiConfig::default());
        let review = decided_hlr();
        app.reviews.insert(review.clone()).await;

        let (status, body) = app
            .get(&format!("/api/v1/reviews/{}/status", review.id.as_uuid()), &[permissions::REVIEWS_READ])
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "decision");
        assert_eq!(body["active"], false);
        assert_eq!(body["apiStatus"]["type"], "hlr_decision");
    }
}

mod stats {
    use super::*;

    #[tokio::test]
    async fn test_snapshot_missing_before_first_calculation() {
        let app = TestApp::new(ApiConfig::default());

        let (status, _) = app.get("/api/v1/stats/daily", &[permissions::STATS_READ]).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unknown_interval_is_not_found() {
        let app = TestApp::new(ApiConfig::default());

        let (status, _) = app.get("/api/v1/stats/yearly", &[permissions::STATS_READ]).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_recalculate_is_throttled() {
        let app = TestApp::new(ApiConfig::default());
        let roles = [permissions::STATS_READ, permissions::STATS_WRITE];

        let (status, first) = app.post_json("/api/v1/stats/recalculate", &roles, json!({})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(first["outcome"], "calculated");

        let (_, second) = app.post_json("/api/v1/stats/recalculate", &roles, json!({})).await;
        assert_eq!(second["outcome"], "skipped");

        let (status, snapshot) = app.get("/api/v1/stats/daily", &roles).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(snapshot["interval"], "daily");
        assert_eq!(snapshot["values"]["reviews_received"], 0.0);
    }
}
