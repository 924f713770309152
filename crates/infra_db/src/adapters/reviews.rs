//! PostgreSQL Review Adapter
//!
//! Implements `ReviewPort` and `IntakeProcessingPort` over `ReviewRepository`,
//! converting rows to domain models and database errors to `PortError`.
//!
//! ```rust,ignore
//! use infra_db::adapters::PostgresReviewAdapter;
//! use domain_review::ReviewPort;
//!
//! let adapter = PostgresReviewAdapter::new(pool);
//! let review = adapter.get_review(review_id).await?;
//! ```

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use core_kernel::{
    AdapterHealth, DomainPort, HealthCheckResult, HealthCheckable, PortError, ProcessingJobId, ReviewId,
};
use domain_review::{
    BenefitType, Claimant, DecisionIssue, DecisionReviewTask, DependentClaimCreation,
    EndProductEstablishment, EndProductStatus, IntakeProcessingPort, RequestIssue, Review, ReviewKind,
    ReviewPort,
};

use crate::error::DatabaseError;
use crate::repositories::reviews::{
    DecisionIssueRow, EndProductRow, RequestIssueRow, ReviewRepository, ReviewRow, TaskRow,
};

/// PostgreSQL-backed review storage and intake steps
#[derive(Debug, Clone)]
pub struct PostgresReviewAdapter {
    repository: ReviewRepository,
    pool: PgPool,
}

impl PostgresReviewAdapter {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: ReviewRepository::new(pool.clone()),
            pool,
        }
    }

    pub fn repository(&self) -> &ReviewRepository {
        &self.repository
    }

    /// Stores a review with its issues and end products; an attached DTA
    /// claim chain is stored as well
    #[instrument(skip(self, review), fields(review_id = %review.id))]
    pub async fn save_review(&self, review: &Review) -> Result<(), PortError> {
        let mut current = Some(review);
        while let Some(review) = current {
            self.repository.insert(&review_to_row(review)).await?;
            if !review.decision_issues.is_empty() {
                let rows: Vec<DecisionIssueRow> = review.decision_issues.iter().map(issue_to_row).collect();
                self.repository
                    .sync_decision_issues(Uuid::from(review.id), &rows)
                    .await?;
            }
            for end_product in &review.end_product_establishments {
                self.repository.insert_end_product(&end_product_to_row(end_product)).await?;
            }
            current = review.dta_claim();
        }
        Ok(())
    }

    /// Loads a review row's collections, without its DTA claim
    async fn load_flat(&self, row: ReviewRow) -> Result<Review, DatabaseError> {
        let review_id = row.review_id;
        let mut review = review_from_row(row)?;
        review.decision_issues = self
            .repository
            .decision_issues(review_id)
            .await?
            .into_iter()
            .map(issue_from_row)
            .collect::<Result<_, _>>()?;
        review.end_product_establishments = self
            .repository
            .end_products(review_id)
            .await?
            .into_iter()
            .map(end_product_from_row)
            .collect();
        Ok(review)
    }

    /// Loads a review and walks its DTA claim chain
    async fn load(&self, row: ReviewRow) -> Result<Review, DatabaseError> {
        let mut chain = vec![self.load_flat(row).await?];
        loop {
            let parent_id = chain.last().map(|review| Uuid::from(review.id));
            let Some(parent_id) = parent_id else { break };
            match self.repository.find_dta_claim(parent_id).await? {
                Some(claim_row) => chain.push(self.load_flat(claim_row).await?),
                None => break,
            }
        }

        let mut assembled = chain.pop();
        while let Some(mut parent) = chain.pop() {
            if let Some(claim) = assembled.take() {
                parent.attach_dta_claim(claim);
            }
            assembled = Some(parent);
        }
        assembled.ok_or_else(|| DatabaseError::QueryFailed("empty review chain".to_string()))
    }

    pub async fn request_issues(&self, review_id: ReviewId) -> Result<Vec<RequestIssue>, PortError> {
        let rows = self.repository.request_issues(Uuid::from(review_id)).await?;
        Ok(rows.into_iter().map(request_issue_from_row).collect::<Result<_, _>>()?)
    }
}

impl DomainPort for PostgresReviewAdapter {}

#[async_trait]
impl HealthCheckable for PostgresReviewAdapter {
    async fn health_check(&self) -> HealthCheckResult {
        let start = std::time::Instant::now();
        let result = sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(&self.pool).await;
        let latency_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(_) => HealthCheckResult::new("postgres-review-adapter", AdapterHealth::Healthy, latency_ms, None),
            Err(e) => HealthCheckResult::new(
                "postgres-review-adapter",
                AdapterHealth::Unhealthy,
                latency_ms,
                Some(format!("Database error: {e}")),
            ),
        }
    }
}

#[async_trait]
impl ReviewPort for PostgresReviewAdapter {
    #[instrument(skip(self), fields(review_id = %id))]
    async fn get_review(&self, id: ReviewId) -> Result<Review, PortError> {
        debug!("Fetching review by ID");
        let row = self.repository.get_by_id(Uuid::from(id)).await?;
        Ok(self.load(row).await?)
    }

    #[instrument(skip(self, veteran_file_number), fields(kind = kind.as_str()))]
    async fn find_by_veteran(
        &self,
        veteran_file_number: &str,
        kind: ReviewKind,
    ) -> Result<Vec<Review>, PortError> {
        let rows = self
            .repository
            .find_by_veteran(veteran_file_number, kind.as_str())
            .await?;

        let mut reviews = Vec::with_capacity(rows.len());
        for row in rows {
            reviews.push(self.load(row).await?);
        }
        debug!(count = reviews.len(), "Loaded reviews for veteran");
        Ok(reviews)
    }

    #[instrument(skip(self, issues), fields(review_id = %review_id, count = issues.len()))]
    async fn record_decision_issues(
        &self,
        review_id: ReviewId,
        issues: Vec<DecisionIssue>,
    ) -> Result<(), PortError> {
        let rows: Vec<DecisionIssueRow> = issues.iter().map(issue_to_row).collect();
        self.repository
            .sync_decision_issues(Uuid::from(review_id), &rows)
            .await?;
        Ok(())
    }

    #[instrument(skip(self, claim), fields(claim_id = %claim.id))]
    async fn create_dta_claim(&self, claim: Review) -> Result<DependentClaimCreation, PortError> {
        if claim.decision_review_remanded.is_none() {
            return Err(PortError::validation_field(
                "DTA claim has no parent review",
                "decision_review_remanded",
            ));
        }

        let (row, inserted) = self.repository.insert_dta_claim(&review_to_row(&claim)).await?;
        if inserted {
            info!("Inserted DTA claim");
            Ok(DependentClaimCreation::Created(claim))
        } else {
            debug!(existing_id = %row.review_id, "Parent already has a DTA claim");
            Ok(DependentClaimCreation::AlreadyExists(self.load(row).await?))
        }
    }
}

#[async_trait]
impl IntakeProcessingPort for PostgresReviewAdapter {
    #[instrument(skip(self, issues), fields(review_id = %review_id, count = issues.len()))]
    async fn create_issues(&self, review_id: ReviewId, issues: Vec<RequestIssue>) -> Result<(), PortError> {
        let rows: Vec<RequestIssueRow> = issues.iter().map(request_issue_to_row).collect();
        self.repository.insert_request_issues(&rows).await?;
        Ok(())
    }

    #[instrument(skip(self, task), fields(review_id = %task.review_id))]
    async fn create_task(&self, task: DecisionReviewTask) -> Result<(), PortError> {
        let row = TaskRow {
            task_id: Uuid::from(task.id),
            review_id: Uuid::from(task.review_id),
            assigned_to: task.assigned_to,
            status: task.status.as_str().to_string(),
            created_at: task.created_at,
            completed_at: task.completed_at,
        };
        self.repository.insert_task(&row).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn submit_for_processing(&self, review_id: ReviewId) -> Result<(), PortError> {
        self.repository.mark_submitted(Uuid::from(review_id)).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn start_processing_job(&self, review_id: ReviewId) -> Result<ProcessingJobId, PortError> {
        let job_id = self
            .repository
            .enqueue_processing_job(Uuid::from(ProcessingJobId::new_v7()), Uuid::from(review_id))
            .await
            .map(ProcessingJobId::from_uuid)?;
        info!(job_id = %job_id, "Queued end product establishment job");
        Ok(job_id)
    }

    #[instrument(skip(self))]
    async fn processing_job_for(&self, review_id: ReviewId) -> Result<Option<ProcessingJobId>, PortError> {
        let job_id = self.repository.processing_job_for(Uuid::from(review_id)).await?;
        Ok(job_id.map(ProcessingJobId::from_uuid))
    }
}

// ============================================================================
// Row conversions
// ============================================================================

fn review_from_row(row: ReviewRow) -> Result<Review, DatabaseError> {
    let kind = ReviewKind::parse(&row.review_kind)
        .ok_or_else(|| DatabaseError::unknown_value("review_kind", &row.review_kind))?;
    let benefit_type = parse_benefit_type(&row.benefit_type)?;
    let claimant = row.claimant_participant_id.map(|participant_id| Claimant {
        participant_id,
        payee_code: row.claimant_payee_code,
    });

    Ok(Review {
        id: ReviewId::from_uuid(row.review_id),
        kind,
        veteran_file_number: row.veteran_file_number,
        receipt_date: row.receipt_date,
        benefit_type,
        legacy_opt_in_approved: row.legacy_opt_in_approved,
        veteran_is_not_claimant: row.veteran_is_not_claimant,
        claimant,
        informal_conference: row.informal_conference,
        same_office: row.same_office,
        decision_review_remanded: row.decision_review_remanded_id.map(ReviewId::from_uuid),
        establishment_submitted_at: row.establishment_submitted_at,
        establishment_processed_at: row.establishment_processed_at,
        decision_issues: Vec::new(),
        end_product_establishments: Vec::new(),
        dta_claim: None,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn review_to_row(review: &Review) -> ReviewRow {
    ReviewRow {
        review_id: Uuid::from(review.id),
        review_kind: review.kind.as_str().to_string(),
        veteran_file_number: review.veteran_file_number.clone(),
        receipt_date: review.receipt_date,
        benefit_type: review.benefit_type.as_str().to_string(),
        legacy_opt_in_approved: review.legacy_opt_in_approved,
        veteran_is_not_claimant: review.veteran_is_not_claimant,
        claimant_participant_id: review.claimant.as_ref().map(|c| c.participant_id.clone()),
        claimant_payee_code: review.claimant.as_ref().and_then(|c| c.payee_code.clone()),
        informal_conference: review.informal_conference,
        same_office: review.same_office,
        decision_review_remanded_id: review.decision_review_remanded.map(Uuid::from),
        establishment_submitted_at: review.establishment_submitted_at,
        establishment_processed_at: review.establishment_processed_at,
        created_at: review.created_at,
        updated_at: review.updated_at,
    }
}

fn parse_benefit_type(value: &str) -> Result<BenefitType, DatabaseError> {
    BenefitType::parse(value).ok_or_else(|| DatabaseError::unknown_value("benefit_type", value))
}

fn issue_from_row(row: DecisionIssueRow) -> Result<DecisionIssue, DatabaseError> {
    Ok(DecisionIssue {
        id: row.decision_issue_id.into(),
        review_id: ReviewId::from_uuid(row.review_id),
        disposition: row.disposition,
        description: row.description,
        rating_issue_reference_id: row.rating_issue_reference_id,
        profile_date: row.profile_date,
        approx_decision_date: row.approx_decision_date,
        promulgation_date: row.promulgation_date,
        benefit_type: parse_benefit_type(&row.benefit_type)?,
        issue_category: row.issue_category,
    })
}

fn issue_to_row(issue: &DecisionIssue) -> DecisionIssueRow {
    DecisionIssueRow {
        decision_issue_id: Uuid::from(issue.id),
        review_id: Uuid::from(issue.review_id),
        disposition: issue.disposition.clone(),
        description: issue.description.clone(),
        rating_issue_reference_id: issue.rating_issue_reference_id.clone(),
        profile_date: issue.profile_date,
        approx_decision_date: issue.approx_decision_date,
        promulgation_date: issue.promulgation_date,
        benefit_type: issue.benefit_type.as_str().to_string(),
        issue_category: issue.issue_category.clone(),
    }
}

fn end_product_from_row(row: EndProductRow) -> EndProductEstablishment {
    EndProductEstablishment {
        id: row.end_product_establishment_id.into(),
        review_id: ReviewId::from_uuid(row.review_id),
        reference_id: row.reference_id,
        code: row.code,
        modifier: row.modifier,
        synced_status: row.synced_status.as_deref().map(EndProductStatus::from_code),
        last_synced_at: row.last_synced_at,
    }
}

fn end_product_to_row(end_product: &EndProductEstablishment) -> EndProductRow {
    EndProductRow {
        end_product_establishment_id: Uuid::from(end_product.id),
        review_id: Uuid::from(end_product.review_id),
        reference_id: end_product.reference_id.clone(),
        code: end_product.code.clone(),
        modifier: end_product.modifier.clone(),
        synced_status: end_product.synced_status.as_ref().map(|s| s.code().to_string()),
        last_synced_at: end_product.last_synced_at,
    }
}

fn request_issue_to_row(issue: &RequestIssue) -> RequestIssueRow {
    RequestIssueRow {
        request_issue_id: Uuid::from(issue.id),
        review_id: Uuid::from(issue.review_id),
        contested_decision_issue_id: issue.contested_decision_issue_id.map(Uuid::from),
        rating_issue_reference_id: issue.rating_issue_reference_id.clone(),
        rating_issue_profile_date: issue.rating_issue_profile_date.clone(),
        contested_rating_issue_reference_id: issue.contested_rating_issue_reference_id.clone(),
        contested_rating_issue_profile_date: issue.contested_rating_issue_profile_date.clone(),
        contested_issue_description: issue.contested_issue_description.clone(),
        issue_category: issue.issue_category.clone(),
        benefit_type: issue.benefit_type.as_str().to_string(),
        decision_date: issue.decision_date,
        end_product_establishment_id: issue.end_product_establishment_id.map(Uuid::from),
        prior_review_id: issue.prior_review_id.map(Uuid::from),
        removed_at: if issue.removed { Some(chrono::Utc::now()) } else { None },
        disposition: issue.disposition.clone(),
    }
}

fn request_issue_from_row(row: RequestIssueRow) -> Result<RequestIssue, DatabaseError> {
    Ok(RequestIssue {
        id: row.request_issue_id.into(),
        review_id: ReviewId::from_uuid(row.review_id),
        contested_decision_issue_id: row.contested_decision_issue_id.map(Into::into),
        rating_issue_reference_id: row.rating_issue_reference_id,
        rating_issue_profile_date: row.rating_issue_profile_date,
        contested_rating_issue_reference_id: row.contested_rating_issue_reference_id,
        contested_rating_issue_profile_date: row.contested_rating_issue_profile_date,
        contested_issue_description: row.contested_issue_description,
        issue_category: row.issue_category,
        benefit_type: parse_benefit_type(&row.benefit_type)?,
        decision_date: row.decision_date,
        end_product_establishment_id: row.end_product_establishment_id.map(Into::into),
        prior_review_id: row.prior_review_id.map(ReviewId::from_uuid),
        removed: row.removed_at.is_some(),
        disposition: row.disposition,
    })
}
