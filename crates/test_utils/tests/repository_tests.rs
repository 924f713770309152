//! PostgreSQL adapter tests
//!
//! Run with `cargo test -p test_utils -- --ignored` on a machine with Docker.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Duration;

use core_kernel::{TimeRange, Timezone};
use domain_review::{
    plan_dta_follow_up, DecisionIssue, DecisionReviewTask, DependentClaimCreation, DtaFollowUpOutcome,
    DtaFollowUpService, IntakeProcessingPort, LegacyAppealPort, ReviewKind, ReviewPort, Ssn,
    VeteranLookupPort,
};
use domain_stats::{ActivityField, ActivitySource, StatsInterval, StatsSnapshot, StatsStore};
use infra_db::repositories::veterans::LegacyAppealRow;
use infra_db::{PostgresReviewAdapter, PostgresStatsAdapter, PostgresVeteranAdapter};
use test_utils::{
    assert_dta_claim_of, db_test, DateFixtures, ReviewBuilder, ReviewFixtures, VeteranFixtures,
};

db_test!(test_review_round_trips_with_issues_and_end_products, |pool| {
    let adapter = PostgresReviewAdapter::new(pool);
    let review = ReviewBuilder::higher_level_review()
        .with_cleared_end_product()
        .with_decision("Granted", "Service connection for tinnitus")
        .build();

    adapter.save_review(&review).await.unwrap();
    let loaded = adapter.get_review(review.id).await.unwrap();

    assert_eq!(loaded.id, review.id);
    assert_eq!(loaded.kind, ReviewKind::HigherLevelReview);
    assert_eq!(loaded.receipt_date, review.receipt_date);
    assert_eq!(loaded.decision_issues.len(), 1);
    assert_eq!(loaded.decision_issues[0].disposition.as_deref(), Some("Granted"));
    assert_eq!(loaded.end_product_establishments.len(), 1);
    assert!(!loaded.end_product_active());
    assert_eq!(loaded.derived_status(), review.derived_status());
});

db_test!(test_unknown_review_is_not_found, |pool| {
    let adapter = PostgresReviewAdapter::new(pool);

    let error = adapter.get_review(core_kernel::ReviewId::new()).await.unwrap_err();

    assert!(error.is_not_found());
});

db_test!(test_dta_claim_is_created_once_per_parent, |pool| {
    let adapter = PostgresReviewAdapter::new(pool);
    let parent = ReviewFixtures::hlr_with_dta_error();
    adapter.save_review(&parent).await.unwrap();

    let claim = || {
        let mut claim = ReviewBuilder::supplemental_claim().build();
        claim.decision_review_remanded = Some(parent.id);
        claim
    };

    let first = adapter.create_dta_claim(claim()).await.unwrap();
    let second = adapter.create_dta_claim(claim()).await.unwrap();

    let DependentClaimCreation::Created(created) = first else {
        panic!("first insert should create the claim");
    };
    let DependentClaimCreation::AlreadyExists(existing) = second else {
        panic!("second insert should find the existing claim");
    };
    assert_eq!(created.id, existing.id);

    let reloaded = adapter.get_review(parent.id).await.unwrap();
    let attached = reloaded.dta_claim().unwrap();
    assert_eq!(attached.id, created.id);
    assert_dta_claim_of(attached, &reloaded);
});

db_test!(test_record_decision_issues_replaces_previous_sync, |pool| {
    let adapter = PostgresReviewAdapter::new(pool);
    let review = ReviewFixtures::decided_hlr();
    adapter.save_review(&review).await.unwrap();

    let replacement = ReviewBuilder::higher_level_review()
        .with_id(review.id)
        .with_dta_error("DTA Error - Fed Recs")
        .with_decision("Denied", "Hearing loss")
        .build()
        .decision_issues;
    adapter.record_decision_issues(review.id, replacement).await.unwrap();

    let loaded = adapter.get_review(review.id).await.unwrap();
    let dispositions: Vec<_> = loaded
        .decision_issues
        .iter()
        .map(|issue| issue.disposition.clone().unwrap_or_default())
        .collect();
    assert_eq!(dispositions, vec!["DTA Error - Fed Recs", "Denied"]);
});

db_test!(test_resync_after_dta_claim_keeps_contested_issue, |pool| {
    let adapter = Arc::new(PostgresReviewAdapter::new(pool));
    let parent = ReviewFixtures::received_hlr();
    adapter.save_review(&parent).await.unwrap();
    let service = DtaFollowUpService::new(adapter.clone(), adapter.clone(), Timezone::default());
    let synced = || {
        vec![
            DecisionIssue::new(parent.id, parent.benefit_type, "DTA Error - PMRs")
                .with_description("Knee strain")
                .with_approx_decision_date(DateFixtures::approx_decision_date()),
            DecisionIssue::new(parent.id, parent.benefit_type, "Denied"),
        ]
    };

    let DtaFollowUpOutcome::Created { claim_id, .. } =
        service.sync_decision_issues(parent.id, synced()).await.unwrap()
    else {
        panic!("first sync should create the DTA claim");
    };
    let contested = adapter.request_issues(claim_id).await.unwrap()[0].contested_decision_issue_id;

    let again = service.sync_decision_issues(parent.id, synced()).await.unwrap();
    assert_eq!(again, DtaFollowUpOutcome::AlreadyExists { claim_id });
    let reloaded = adapter.get_review(parent.id).await.unwrap();
    assert_eq!(Some(reloaded.decision_issues[0].id), contested);

    let corrected = vec![DecisionIssue::new(parent.id, parent.benefit_type, "Granted")];
    adapter.record_decision_issues(parent.id, corrected).await.unwrap();

    let reloaded = adapter.get_review(parent.id).await.unwrap();
    let dispositions: Vec<_> = reloaded
        .decision_issues
        .iter()
        .map(|issue| issue.disposition.clone().unwrap_or_default())
        .collect();
    assert_eq!(dispositions, vec!["Granted", "DTA Error - PMRs"]);
    assert_eq!(Some(reloaded.decision_issues[1].id), contested);
    assert_eq!(adapter.request_issues(claim_id).await.unwrap().len(), 1);
});

db_test!(test_intake_steps_can_be_repeated, |pool| {
    let adapter = PostgresReviewAdapter::new(pool);
    let parent = ReviewFixtures::hlr_with_dta_error();
    adapter.save_review(&parent).await.unwrap();
    let plan = plan_dta_follow_up(&parent, DateFixtures::today()).unwrap().unwrap();
    let claim = adapter.create_dta_claim(plan.claim).await.unwrap().claim().clone();

    assert_eq!(adapter.processing_job_for(claim.id).await.unwrap(), None);
    let mut jobs = Vec::new();
    for _ in 0..2 {
        adapter.create_issues(claim.id, plan.issues.clone()).await.unwrap();
        adapter
            .create_task(DecisionReviewTask::new(claim.id, "Education"))
            .await
            .unwrap();
        adapter.submit_for_processing(claim.id).await.unwrap();
        jobs.push(adapter.start_processing_job(claim.id).await.unwrap());
    }

    assert_eq!(adapter.request_issues(claim.id).await.unwrap().len(), plan.issues.len());
    assert_eq!(adapter.repository().tasks_for(claim.id.into()).await.unwrap().len(), 1);
    assert_eq!(jobs[0], jobs[1]);
    assert_eq!(adapter.processing_job_for(claim.id).await.unwrap(), Some(jobs[0]));
});

db_test!(test_find_by_veteran_filters_kind, |pool| {
    let adapter = PostgresReviewAdapter::new(pool);
    adapter.save_review(&ReviewFixtures::decided_hlr()).await.unwrap();
    adapter.save_review(&ReviewFixtures::canceled_sc()).await.unwrap();

    let hlrs = adapter
        .find_by_veteran(VeteranFixtures::file_number(), ReviewKind::HigherLevelReview)
        .await
        .unwrap();
    let scs = adapter
        .find_by_veteran(VeteranFixtures::file_number(), ReviewKind::SupplementalClaim)
        .await
        .unwrap();

    assert_eq!(hlrs.len(), 1);
    assert_eq!(scs.len(), 1);
    assert_eq!(scs[0].kind, ReviewKind::SupplementalClaim);
});

db_test!(test_veteran_lookup_and_legacy_appeals, |pool| {
    let adapter = PostgresVeteranAdapter::new(pool);
    adapter
        .repository()
        .upsert_veteran(VeteranFixtures::ssn(), VeteranFixtures::file_number())
        .await
        .unwrap();
    adapter
        .repository()
        .upsert_legacy_appeal(&LegacyAppealRow {
            appeal_series_id: "A100".to_string(),
            vbms_id: VeteranFixtures::vbms_id().to_string(),
            appeal_ids: vec!["1234567".to_string()],
            status_type: "pending_hearing_scheduling".to_string(),
            active: true,
            aoj: "vba".to_string(),
            program_area: "compensation".to_string(),
            description: "Service connection for knee".to_string(),
            updated_at: DateFixtures::now(),
        })
        .await
        .unwrap();

    let ssn = Ssn::parse(VeteranFixtures::ssn()).unwrap();
    let file_number = adapter.fetch_file_number_by_ssn(&ssn).await.unwrap();
    assert_eq!(file_number.as_deref(), Some(VeteranFixtures::file_number()));

    let unknown = Ssn::parse("987654321").unwrap();
    assert_eq!(adapter.fetch_file_number_by_ssn(&unknown).await.unwrap(), None);

    let appeals = adapter.appeals_for(VeteranFixtures::vbms_id()).await.unwrap();
    assert_eq!(appeals.len(), 1);
    assert_eq!(appeals[0].id, "A100");
});

db_test!(test_stats_store_round_trip, |pool| {
    let adapter = PostgresStatsAdapter::new(pool);
    let now = DateFixtures::now();
    let timezone = Timezone::default();
    let range = StatsInterval::Daily.range_ending(now, &timezone).unwrap();

    assert_eq!(adapter.read_timestamp("DecisionReviewStats").await.unwrap(), None);
    adapter.write_timestamp("DecisionReviewStats", now.timestamp()).await.unwrap();
    assert_eq!(
        adapter.read_timestamp("DecisionReviewStats").await.unwrap(),
        Some(now.timestamp())
    );

    let snapshot = StatsSnapshot {
        interval: StatsInterval::Daily,
        range,
        calculated_at: now,
        values: BTreeMap::from([
            ("reviews_received".to_string(), Some(3.0)),
            ("time_to_decision".to_string(), None),
        ]),
    };
    adapter.write_snapshot(&snapshot).await.unwrap();

    let loaded = adapter.read_snapshot(StatsInterval::Daily).await.unwrap().unwrap();
    assert_eq!(loaded.value("reviews_received"), Some(3.0));
    assert_eq!(loaded.value("time_to_decision"), None);
    assert_eq!(adapter.read_snapshot(StatsInterval::Weekly).await.unwrap(), None);
});

db_test!(test_activity_reports_reviews_received_in_range, |pool| {
    let reviews = PostgresReviewAdapter::new(pool.clone());
    let stats = PostgresStatsAdapter::new(pool);
    let review = ReviewFixtures::decided_hlr();
    reviews.save_review(&review).await.unwrap();

    let range = TimeRange::new(review.created_at - Duration::hours(1), review.created_at + Duration::hours(1))
        .unwrap();
    let activity = stats.activity_between(ActivityField::Received, range).await.unwrap();

    assert_eq!(activity.len(), 1);
    assert_eq!(activity[0].review_id, review.id);
    assert!(activity[0].decided_at.is_some());
});
