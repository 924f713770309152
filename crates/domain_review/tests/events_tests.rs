//! Status API events and alerts tests for domain_review

use std::sync::Arc;

use chrono::{NaiveDate, TimeZone, Utc};

use domain_review::{
    AppealStatusService, BenefitType, DecisionIssue, EndProductEstablishment, EndProductStatus,
    InMemoryReviewStore, LegacyAppealStatus, MockLegacyAppeals, MockVeteranLookup, Review,
    ReviewError, Ssn, StatusStrategy,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn closed_ep(review: &Review, status: EndProductStatus, synced: NaiveDate) -> EndProductEstablishment {
    let mut ep = EndProductEstablishment::new(review.id, "030HLRR");
    let at = Utc.from_utc_datetime(&synced.and_hms_opt(12, 0, 0).unwrap());
    ep.record_sync(status, at);
    ep
}

/// HLR decided with one granted issue and one DTA error, remanded to a decided SC
fn remanded_hlr() -> Review {
    let mut hlr = Review::higher_level_review("123456789", BenefitType::Compensation)
        .with_receipt_date(date(2019, 1, 5));
    let ep = closed_ep(&hlr, EndProductStatus::Cleared, date(2019, 4, 1));
    hlr.add_end_product(ep);
    hlr.add_decision_issue(
        DecisionIssue::new(hlr.id, BenefitType::Compensation, "granted")
            .with_description("Hearing loss")
            .with_approx_decision_date(date(2019, 3, 1)),
    );
    hlr.add_decision_issue(
        DecisionIssue::new(hlr.id, BenefitType::Compensation, "DTA Error - PMRs")
            .with_description("Back strain")
            .with_approx_decision_date(date(2019, 3, 2)),
    );

    let mut dta = Review::supplemental_claim("123456789", BenefitType::Compensation)
        .with_receipt_date(date(2019, 3, 2));
    dta.decision_review_remanded = Some(hlr.id);
    let ep = closed_ep(&dta, EndProductStatus::Cleared, date(2019, 9, 1));
    dta.add_end_product(ep);
    dta.add_decision_issue(
        DecisionIssue::new(dta.id, BenefitType::Compensation, "denied")
            .with_description("Back strain")
            .with_approx_decision_date(date(2019, 8, 15)),
    );
    hlr.attach_dta_claim(dta);
    hlr
}

mod events {
    use super::*;

    #[test]
    fn test_decided_review_events() {
        let mut hlr = Review::higher_level_review("123456789", BenefitType::Compensation)
            .with_receipt_date(date(2019, 1, 5));
        let ep = closed_ep(&hlr, EndProductStatus::Cleared, date(2019, 4, 1));
        hlr.add_end_product(ep);
        hlr.add_decision_issue(
            DecisionIssue::new(hlr.id, BenefitType::Compensation, "granted")
                .with_approx_decision_date(date(2019, 3, 1))
                .with_promulgation_date(date(2019, 3, 10)),
        );

        let types: Vec<(String, NaiveDate)> = hlr
            .events()
            .into_iter()
            .map(|event| (event.event_type, event.date))
            .collect();
        assert_eq!(
            types,
            vec![
                ("hlr_request".to_string(), date(2019, 1, 5)),
                ("hlr_decision".to_string(), date(2019, 3, 1)),
            ]
        );
    }

    #[test]
    fn test_decision_date_uses_promulgation_without_end_products() {
        let mut sc = Review::supplemental_claim("123456789", BenefitType::Education);
        sc.add_decision_issue(
            DecisionIssue::new(sc.id, BenefitType::Education, "granted")
                .with_approx_decision_date(date(2020, 1, 1))
                .with_promulgation_date(date(2020, 1, 20)),
        );
        assert_eq!(sc.decision_event_date(), Some(date(2020, 1, 20)));
    }

    #[test]
    fn test_remanded_review_events() {
        let hlr = remanded_hlr();

        assert_eq!(hlr.decision_event_date(), None);
        assert_eq!(hlr.dta_error_event_date(), Some(date(2019, 3, 2)));
        assert_eq!(hlr.dta_decision_event_date(), Some(date(2019, 8, 15)));
        assert_eq!(hlr.other_close_event_date(), None);

        let types: Vec<String> = hlr.events().into_iter().map(|event| event.event_type).collect();
        assert_eq!(types, vec!["hlr_request", "hlr_dta_error", "dta_decision"]);
    }

    #[test]
    fn test_canceled_review_has_other_close_event() {
        let mut sc = Review::supplemental_claim("123456789", BenefitType::Compensation)
            .with_receipt_date(date(2019, 6, 1));
        let ep = closed_ep(&sc, EndProductStatus::Canceled, date(2019, 6, 20));
        sc.add_end_product(ep);

        assert_eq!(sc.other_close_event_date(), Some(date(2019, 6, 20)));
        let types: Vec<String> = sc.events().into_iter().map(|event| event.event_type).collect();
        assert_eq!(types, vec!["sc_request", "sc_other_close"]);
    }
}

mod alerts {
    use super::*;

    #[test]
    fn test_due_date_follows_dta_decision() {
        let hlr = remanded_hlr();
        assert_eq!(hlr.decision_date_for_api_alert(), Some(date(2019, 8, 15)));
        assert_eq!(hlr.due_date_to_appeal_decision(), Some(date(2020, 8, 14)));
    }

    #[test]
    fn test_decided_review_has_post_decision_alert() {
        let hlr = remanded_hlr();
        let alerts = hlr.alerts();

        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].alert_type, "ama_post_decision");
        assert_eq!(alerts[0].details.decision_date, Some(date(2019, 8, 15)));
        assert_eq!(
            alerts[0].details.available_options,
            vec!["supplemental_claim".to_string(), "appeal".to_string()]
        );
    }

    #[test]
    fn test_open_review_has_no_alerts() {
        let mut hlr = Review::higher_level_review("123456789", BenefitType::Compensation);
        hlr.add_end_product(EndProductEstablishment::new(hlr.id, "030HLRR"));
        assert!(hlr.alerts().is_empty());
    }

    #[test]
    fn test_decision_details_replace_dta_errors_with_remand_decisions() {
        let hlr = remanded_hlr();
        let status = hlr.api_status();

        assert_eq!(status.status_type, "hlr_decision");
        let issues = status.details.issues.unwrap();
        let summary: Vec<(String, Option<String>)> = issues
            .into_iter()
            .map(|issue| (issue.description, issue.disposition))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("Hearing loss".to_string(), Some("granted".to_string())),
                ("Back strain".to_string(), Some("denied".to_string())),
            ]
        );
    }

    #[test]
    fn test_status_serializes_with_type_key() {
        let hlr = remanded_hlr();
        let json = serde_json::to_value(hlr.api_status()).unwrap();
        assert_eq!(json["type"], "hlr_decision");
        assert_eq!(json["details"]["issues"][0]["description"], "Hearing loss");

        let mut open = Review::supplemental_claim("1", BenefitType::Compensation);
        open.add_end_product(EndProductEstablishment::new(open.id, "040SCR"));
        let json = serde_json::to_value(open.api_status()).unwrap();
        assert_eq!(json["details"], serde_json::json!({}));
    }
}

mod lookup {
    use super::*;

    fn legacy(id: &str, aoj: &str) -> LegacyAppealStatus {
        LegacyAppealStatus {
            id: id.to_string(),
            appeal_ids: vec![id.to_string()],
            status_type: "pending_soc".to_string(),
            active: true,
            aoj: aoj.to_string(),
            program_area: "compensation".to_string(),
            description: "Service connection".to_string(),
            updated: Utc::now(),
        }
    }

    async fn fixture() -> (AppealStatusService, MockVeteranLookup) {
        let veterans = MockVeteranLookup::new();
        veterans.add_veteran("123456789", "123456789").await;

        let reviews = InMemoryReviewStore::new();
        reviews.insert(remanded_hlr()).await;
        reviews
            .insert(Review::supplemental_claim("987654321", BenefitType::Compensation))
            .await;

        let legacy_appeals = MockLegacyAppeals::new();
        legacy_appeals.add_appeal("123456789S", legacy("1001", "vba")).await;
        legacy_appeals.add_appeal("123456789S", legacy("1002", "vha")).await;

        let service = AppealStatusService::new(
            Arc::new(veterans.clone()),
            Arc::new(reviews),
            Arc::new(legacy_appeals),
        );
        (service, veterans)
    }

    #[tokio::test]
    async fn test_all_reviews_strategy() {
        let (service, _) = fixture().await;
        let ssn = Ssn::parse("123456789").unwrap();

        let statuses = service.lookup(&ssn, StatusStrategy::AllReviews).await.unwrap();

        assert_eq!(statuses.vbms_id, "123456789S");
        assert_eq!(statuses.higher_level_reviews.len(), 1);
        // the remand claim belongs to the same veteran
        assert_eq!(statuses.supplemental_claims.len(), 1);
        assert_eq!(statuses.legacy_appeals.len(), 1);
        assert_eq!(statuses.legacy_appeals[0].id, "1001");
    }

    #[tokio::test]
    async fn test_legacy_only_strategy_skips_reviews() {
        let (service, _) = fixture().await;
        let ssn = Ssn::parse("123456789").unwrap();

        let statuses = service.lookup(&ssn, StatusStrategy::LegacyOnly).await.unwrap();

        assert!(statuses.higher_level_reviews.is_empty());
        assert!(statuses.supplemental_claims.is_empty());
        assert_eq!(statuses.legacy_appeals.len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_veteran() {
        let (service, _) = fixture().await;
        let ssn = Ssn::parse("111223333").unwrap();

        let result = service.lookup(&ssn, StatusStrategy::AllReviews).await;
        assert!(matches!(result, Err(ReviewError::VeteranNotFound)));
    }

    #[tokio::test]
    async fn test_lookup_timeout() {
        let (service, veterans) = fixture().await;
        veterans.set_timeout(true).await;
        let ssn = Ssn::parse("123456789").unwrap();

        let err = service.lookup(&ssn, StatusStrategy::AllReviews).await.unwrap_err();
        assert!(err.is_upstream_timeout());
    }
}
