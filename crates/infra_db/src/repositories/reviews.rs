//! Review repository implementation
//!
//! Database access for reviews and the collections synced onto them:
//! decision issues, end product establishments, request issues, tasks and
//! processing jobs.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::error::DatabaseError;

const REVIEW_COLUMNS: &str = r#"
    review_id, review_kind, veteran_file_number, receipt_date, benefit_type,
    legacy_opt_in_approved, veteran_is_not_claimant, claimant_participant_id,
    claimant_payee_code, informal_conference, same_office,
    decision_review_remanded_id, establishment_submitted_at,
    establishment_processed_at, created_at, updated_at
"#;

/// Repository for reviews and their synced collections
#[derive(Debug, Clone)]
pub struct ReviewRepository {
    pool: PgPool,
}

impl ReviewRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Retrieves a review row by identifier
    pub async fn get_by_id(&self, review_id: Uuid) -> Result<ReviewRow, DatabaseError> {
        sqlx::query_as::<_, ReviewRow>(&format!(
            "SELECT {REVIEW_COLUMNS} FROM reviews WHERE review_id = $1"
        ))
        .bind(review_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::not_found("Review", review_id))
    }

    /// The DTA claim created for a parent review, if any
    pub async fn find_dta_claim(&self, parent_id: Uuid) -> Result<Option<ReviewRow>, DatabaseError> {
        let row = sqlx::query_as::<_, ReviewRow>(&format!(
            "SELECT {REVIEW_COLUMNS} FROM reviews WHERE decision_review_remanded_id = $1"
        ))
        .bind(parent_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn find_by_veteran(
        &self,
        veteran_file_number: &str,
        review_kind: &str,
    ) -> Result<Vec<ReviewRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, ReviewRow>(&format!(
            r#"
            SELECT {REVIEW_COLUMNS} FROM reviews
            WHERE veteran_file_number = $1 AND review_kind = $2
            ORDER BY created_at
            "#
        ))
        .bind(veteran_file_number)
        .bind(review_kind)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn decision_issues(&self, review_id: Uuid) -> Result<Vec<DecisionIssueRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, DecisionIssueRow>(
            r#"
            SELECT
                decision_issue_id, review_id, disposition, description,
                rating_issue_reference_id, profile_date, approx_decision_date,
                promulgation_date, benefit_type, issue_category
            FROM decision_issues
            WHERE review_id = $1
            ORDER BY position, created_at
            "#,
        )
        .bind(review_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn end_products(&self, review_id: Uuid) -> Result<Vec<EndProductRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, EndProductRow>(
            r#"
            SELECT
                end_product_establishment_id, review_id, reference_id, code,
                modifier, synced_status, last_synced_at
            FROM end_product_establishments
            WHERE review_id = $1
            ORDER BY created_at, end_product_establishment_id
            "#,
        )
        .bind(review_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Inserts a review row
    pub async fn insert(&self, review: &ReviewRow) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;
        insert_review(&mut tx, review).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Inserts a DTA claim unless its parent already has one
    ///
    /// Returns the inserted row, or the existing claim with `false`. The unique
    /// constraint on `decision_review_remanded_id` makes concurrent callers
    /// agree on a single winner.
    pub async fn insert_dta_claim(&self, claim: &ReviewRow) -> Result<(ReviewRow, bool), DatabaseError> {
        let parent_id = claim.decision_review_remanded_id.ok_or_else(|| {
            DatabaseError::ConstraintViolation("DTA claim requires decision_review_remanded_id".to_string())
        })?;

        let mut tx = self.pool.begin().await?;
        let inserted = sqlx::query_scalar::<_, Uuid>(&format!(
            r#"
            INSERT INTO reviews ({REVIEW_COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            ON CONFLICT (decision_review_remanded_id) DO NOTHING
            RETURNING review_id
            "#
        ))
        .bind(claim.review_id)
        .bind(&claim.review_kind)
        .bind(&claim.veteran_file_number)
        .bind(claim.receipt_date)
        .bind(&claim.benefit_type)
        .bind(claim.legacy_opt_in_approved)
        .bind(claim.veteran_is_not_claimant)
        .bind(&claim.claimant_participant_id)
        .bind(&claim.claimant_payee_code)
        .bind(claim.informal_conference)
        .bind(claim.same_office)
        .bind(claim.decision_review_remanded_id)
        .bind(claim.establishment_submitted_at)
        .bind(claim.establishment_processed_at)
        .bind(claim.created_at)
        .bind(claim.updated_at)
        .fetch_optional(&mut *tx)
        .await?;

        if inserted.is_some() {
            tx.commit().await?;
            return Ok((claim.clone(), true));
        }

        let existing = sqlx::query_as::<_, ReviewRow>(&format!(
            "SELECT {REVIEW_COLUMNS} FROM reviews WHERE decision_review_remanded_id = $1"
        ))
        .bind(parent_id)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok((existing, false))
    }

    /// Records a decision issue sync in one transaction
    ///
    /// Rows are upserted by id. An incoming row with an unknown id takes the
    /// id of an existing row recording the same decision. Existing rows left
    /// out of the sync are deleted unless a request issue contests them;
    /// contested rows are kept and moved after the synced ones.
    pub async fn sync_decision_issues(
        &self,
        review_id: Uuid,
        issues: &[DecisionIssueRow],
    ) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let exists = sqlx::query_scalar::<_, Uuid>("SELECT review_id FROM reviews WHERE review_id = $1 FOR UPDATE")
            .bind(review_id)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            return Err(DatabaseError::not_found("Review", review_id));
        }

        let existing = sqlx::query_as::<_, DecisionIssueRow>(
            r#"
            SELECT
                decision_issue_id, review_id, disposition, description,
                rating_issue_reference_id, profile_date, approx_decision_date,
                promulgation_date, benefit_type, issue_category
            FROM decision_issues
            WHERE review_id = $1
            ORDER BY position, created_at
            "#,
        )
        .bind(review_id)
        .fetch_all(&mut *tx)
        .await?;

        let issues = carry_over_ids(&existing, issues);
        for (position, issue) in issues.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO decision_issues (
                    decision_issue_id, review_id, position, disposition, description,
                    rating_issue_reference_id, profile_date, approx_decision_date,
                    promulgation_date, benefit_type, issue_category
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
                ON CONFLICT (decision_issue_id) DO UPDATE SET
                    position = EXCLUDED.position,
                    disposition = EXCLUDED.disposition,
                    description = EXCLUDED.description,
                    rating_issue_reference_id = EXCLUDED.rating_issue_reference_id,
                    profile_date = EXCLUDED.profile_date,
                    approx_decision_date = EXCLUDED.approx_decision_date,
                    promulgation_date = EXCLUDED.promulgation_date,
                    benefit_type = EXCLUDED.benefit_type,
                    issue_category = EXCLUDED.issue_category
                WHERE decision_issues.review_id = EXCLUDED.review_id
                "#,
            )
            .bind(issue.decision_issue_id)
            .bind(review_id)
            .bind(position as i32)
            .bind(&issue.disposition)
            .bind(&issue.description)
            .bind(&issue.rating_issue_reference_id)
            .bind(issue.profile_date)
            .bind(issue.approx_decision_date)
            .bind(issue.promulgation_date)
            .bind(&issue.benefit_type)
            .bind(&issue.issue_category)
            .execute(&mut *tx)
            .await?;
        }

        let synced: Vec<Uuid> = issues.iter().map(|issue| issue.decision_issue_id).collect();
        sqlx::query(
            r#"
            DELETE FROM decision_issues d
            WHERE d.review_id = $1
              AND d.decision_issue_id <> ALL($2)
              AND NOT EXISTS (
                  SELECT 1 FROM request_issues r
                  WHERE r.contested_decision_issue_id = d.decision_issue_id
              )
            "#,
        )
        .bind(review_id)
        .bind(&synced)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            UPDATE decision_issues
            SET position = position + $3
            WHERE review_id = $1 AND decision_issue_id <> ALL($2)
            "#,
        )
        .bind(review_id)
        .bind(&synced)
        .bind(synced.len() as i32)
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE reviews SET updated_at = now() WHERE review_id = $1")
            .bind(review_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    pub async fn insert_end_product(&self, end_product: &EndProductRow) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO end_product_establishments (
                end_product_establishment_id, review_id, reference_id, code,
                modifier, synced_status, last_synced_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(end_product.end_product_establishment_id)
        .bind(end_product.review_id)
        .bind(&end_product.reference_id)
        .bind(&end_product.code)
        .bind(&end_product.modifier)
        .bind(&end_product.synced_status)
        .bind(end_product.last_synced_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Inserts request issues, skipping any whose contested decision issue is
    /// already contested on the same review
    pub async fn insert_request_issues(&self, issues: &[RequestIssueRow]) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;
        for issue in issues {
            sqlx::query(
                r#"
                INSERT INTO request_issues (
                    request_issue_id, review_id, contested_decision_issue_id,
                    rating_issue_reference_id, rating_issue_profile_date,
                    contested_rating_issue_reference_id, contested_rating_issue_profile_date,
                    contested_issue_description, issue_category, benefit_type,
                    decision_date, end_product_establishment_id, prior_review_id,
                    removed_at, disposition
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(issue.request_issue_id)
            .bind(issue.review_id)
            .bind(issue.contested_decision_issue_id)
            .bind(&issue.rating_issue_reference_id)
            .bind(&issue.rating_issue_profile_date)
            .bind(&issue.contested_rating_issue_reference_id)
            .bind(&issue.contested_rating_issue_profile_date)
            .bind(&issue.contested_issue_description)
            .bind(&issue.issue_category)
            .bind(&issue.benefit_type)
            .bind(issue.decision_date)
            .bind(issue.end_product_establishment_id)
            .bind(issue.prior_review_id)
            .bind(issue.removed_at)
            .bind(&issue.disposition)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    pub async fn request_issues(&self, review_id: Uuid) -> Result<Vec<RequestIssueRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, RequestIssueRow>(
            r#"
            SELECT
                request_issue_id, review_id, contested_decision_issue_id,
                rating_issue_reference_id, rating_issue_profile_date,
                contested_rating_issue_reference_id, contested_rating_issue_profile_date,
                contested_issue_description, issue_category, benefit_type,
                decision_date, end_product_establishment_id, prior_review_id,
                removed_at, disposition
            FROM request_issues
            WHERE review_id = $1
            ORDER BY created_at, request_issue_id
            "#,
        )
        .bind(review_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Inserts a task unless the review already has one for the same assignee
    pub async fn insert_task(&self, task: &TaskRow) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO tasks (task_id, review_id, assigned_to, status, created_at, completed_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(task.task_id)
        .bind(task.review_id)
        .bind(&task.assigned_to)
        .bind(&task.status)
        .bind(task.created_at)
        .bind(task.completed_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn tasks_for(&self, review_id: Uuid) -> Result<Vec<TaskRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, TaskRow>(
            r#"
            SELECT task_id, review_id, assigned_to, status, created_at, completed_at
            FROM tasks WHERE review_id = $1 ORDER BY created_at
            "#,
        )
        .bind(review_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Stamps the review as submitted for end product establishment
    pub async fn mark_submitted(&self, review_id: Uuid) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            r#"
            UPDATE reviews
            SET establishment_submitted_at = COALESCE(establishment_submitted_at, now()),
                updated_at = now()
            WHERE review_id = $1
            "#,
        )
        .bind(review_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Review", review_id));
        }
        Ok(())
    }

    /// Queues a processing job for the review and returns its id; an already
    /// queued job is returned instead of a second one
    pub async fn enqueue_processing_job(&self, job_id: Uuid, review_id: Uuid) -> Result<Uuid, DatabaseError> {
        let mut tx = self.pool.begin().await?;
        let inserted = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO processing_jobs (job_id, review_id) VALUES ($1, $2)
            ON CONFLICT (review_id) DO NOTHING
            RETURNING job_id
            "#,
        )
        .bind(job_id)
        .bind(review_id)
        .fetch_optional(&mut *tx)
        .await?;

        let job_id = match inserted {
            Some(job_id) => job_id,
            None => {
                sqlx::query_scalar::<_, Uuid>("SELECT job_id FROM processing_jobs WHERE review_id = $1")
                    .bind(review_id)
                    .fetch_one(&mut *tx)
                    .await?
            }
        };
        tx.commit().await?;
        Ok(job_id)
    }

    pub async fn processing_job_for(&self, review_id: Uuid) -> Result<Option<Uuid>, DatabaseError> {
        let job_id = sqlx::query_scalar::<_, Uuid>("SELECT job_id FROM processing_jobs WHERE review_id = $1")
            .bind(review_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(job_id)
    }

    /// Review milestones where `milestone` falls in `[start, end)`
    pub async fn activity_between(
        &self,
        milestone: Milestone,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<ActivityRow>, DatabaseError> {
        let column = milestone.column();
        let rows = sqlx::query_as::<_, ActivityRow>(&format!(
            r#"
            SELECT
                r.review_id,
                r.review_kind,
                r.veteran_file_number,
                r.benefit_type,
                (r.decision_review_remanded_id IS NOT NULL) AS is_dta_claim,
                r.created_at AS received_at,
                r.establishment_processed_at AS established_at,
                d.decided_at
            FROM reviews r
            LEFT JOIN (
                SELECT review_id, MIN(created_at) AS decided_at
                FROM decision_issues
                GROUP BY review_id
            ) d ON d.review_id = r.review_id
            WHERE {column} >= $1 AND {column} < $2
            "#
        ))
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

async fn insert_review(tx: &mut Transaction<'_, Postgres>, review: &ReviewRow) -> Result<(), DatabaseError> {
    sqlx::query(&format!(
        r#"
        INSERT INTO reviews ({REVIEW_COLUMNS})
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
        "#
    ))
    .bind(review.review_id)
    .bind(&review.review_kind)
    .bind(&review.veteran_file_number)
    .bind(review.receipt_date)
    .bind(&review.benefit_type)
    .bind(review.legacy_opt_in_approved)
    .bind(review.veteran_is_not_claimant)
    .bind(&review.claimant_participant_id)
    .bind(&review.claimant_payee_code)
    .bind(review.informal_conference)
    .bind(review.same_office)
    .bind(review.decision_review_remanded_id)
    .bind(review.establishment_submitted_at)
    .bind(review.establishment_processed_at)
    .bind(review.created_at)
    .bind(review.updated_at)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

/// Gives incoming rows with an unknown id the id of an unclaimed existing
/// row recording the same decision
fn carry_over_ids(existing: &[DecisionIssueRow], issues: &[DecisionIssueRow]) -> Vec<DecisionIssueRow> {
    let is_known = |id: Uuid| existing.iter().any(|row| row.decision_issue_id == id);
    let mut unclaimed: Vec<&DecisionIssueRow> = existing
        .iter()
        .filter(|row| !issues.iter().any(|issue| issue.decision_issue_id == row.decision_issue_id))
        .collect();

    issues
        .iter()
        .map(|issue| {
            let mut issue = issue.clone();
            if !is_known(issue.decision_issue_id) {
                if let Some(index) = unclaimed.iter().position(|row| row.records_same_decision(&issue)) {
                    issue.decision_issue_id = unclaimed.remove(index).decision_issue_id;
                }
            }
            issue
        })
        .collect()
}

/// Timestamp column an activity query filters on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Milestone {
    Received,
    Established,
    Decided,
}

impl Milestone {
    fn column(&self) -> &'static str {
        match self {
            Milestone::Received => "r.created_at",
            Milestone::Established => "r.establishment_processed_at",
            Milestone::Decided => "d.decided_at",
        }
    }
}

/// Review database row
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ReviewRow {
    pub review_id: Uuid,
    pub review_kind: String,
    pub veteran_file_number: String,
    pub receipt_date: Option<NaiveDate>,
    pub benefit_type: String,
    pub legacy_opt_in_approved: bool,
    pub veteran_is_not_claimant: bool,
    pub claimant_participant_id: Option<String>,
    pub claimant_payee_code: Option<String>,
    pub informal_conference: Option<bool>,
    pub same_office: Option<bool>,
    pub decision_review_remanded_id: Option<Uuid>,
    pub establishment_submitted_at: Option<DateTime<Utc>>,
    pub establishment_processed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Decision issue database row
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DecisionIssueRow {
    pub decision_issue_id: Uuid,
    pub review_id: Uuid,
    pub disposition: Option<String>,
    pub description: Option<String>,
    pub rating_issue_reference_id: Option<String>,
    pub profile_date: Option<NaiveDate>,
    pub approx_decision_date: Option<NaiveDate>,
    pub promulgation_date: Option<NaiveDate>,
    pub benefit_type: String,
    pub issue_category: Option<String>,
}

impl DecisionIssueRow {
    fn records_same_decision(&self, other: &DecisionIssueRow) -> bool {
        self.disposition == other.disposition
            && self.rating_issue_reference_id == other.rating_issue_reference_id
            && self.description == other.description
            && self.benefit_type == other.benefit_type
    }
}

/// End product establishment database row
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EndProductRow {
    pub end_product_establishment_id: Uuid,
    pub review_id: Uuid,
    pub reference_id: Option<String>,
    pub code: String,
    pub modifier: Option<String>,
    pub synced_status: Option<String>,
    pub last_synced_at: Option<DateTime<Utc>>,
}

/// Request issue database row
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RequestIssueRow {
    pub request_issue_id: Uuid,
    pub review_id: Uuid,
    pub contested_decision_issue_id: Option<Uuid>,
    pub rating_issue_reference_id: Option<String>,
    pub rating_issue_profile_date: Option<String>,
    pub contested_rating_issue_reference_id: Option<String>,
    pub contested_rating_issue_profile_date: Option<String>,
    pub contested_issue_description: Option<String>,
    pub issue_category: Option<String>,
    pub benefit_type: String,
    pub decision_date: Option<NaiveDate>,
    pub end_product_establishment_id: Option<Uuid>,
    pub prior_review_id: Option<Uuid>,
    pub removed_at: Option<DateTime<Utc>>,
    pub disposition: Option<String>,
}

/// Decision review task database row
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TaskRow {
    pub task_id: Uuid,
    pub review_id: Uuid,
    pub assigned_to: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Review milestones for statistics
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ActivityRow {
    pub review_id: Uuid,
    pub review_kind: String,
    pub veteran_file_number: String,
    pub benefit_type: String,
    pub is_dta_claim: bool,
    pub received_at: DateTime<Utc>,
    pub established_at: Option<DateTime<Utc>>,
    pub decided_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(review_id: Uuid, disposition: &str) -> DecisionIssueRow {
        DecisionIssueRow {
            decision_issue_id: Uuid::now_v7(),
            review_id,
            disposition: Some(disposition.to_string()),
            description: Some("Knee".to_string()),
            rating_issue_reference_id: None,
            profile_date: None,
            approx_decision_date: None,
            promulgation_date: None,
            benefit_type: "compensation".to_string(),
            issue_category: None,
        }
    }

    #[test]
    fn test_resent_decision_keeps_stored_id() {
        let review_id = Uuid::now_v7();
        let stored = vec![row(review_id, "DTA Error - PMRs"), row(review_id, "denied")];
        let resent = vec![row(review_id, "denied"), row(review_id, "DTA Error - PMRs")];

        let carried = carry_over_ids(&stored, &resent);

        assert_eq!(carried[0].decision_issue_id, stored[1].decision_issue_id);
        assert_eq!(carried[1].decision_issue_id, stored[0].decision_issue_id);
    }

    #[test]
    fn test_new_decision_keeps_its_own_id() {
        let review_id = Uuid::now_v7();
        let stored = vec![row(review_id, "denied")];
        let incoming = vec![row(review_id, "granted")];

        let carried = carry_over_ids(&stored, &incoming);

        assert_eq!(carried[0].decision_issue_id, incoming[0].decision_issue_id);
    }

    #[test]
    fn test_duplicate_decisions_claim_distinct_ids() {
        let review_id = Uuid::now_v7();
        let stored = vec![row(review_id, "denied"), row(review_id, "denied")];
        let incoming = vec![row(review_id, "denied"), row(review_id, "denied")];

        let carried = carry_over_ids(&stored, &incoming);

        assert_eq!(carried[0].decision_issue_id, stored[0].decision_issue_id);
        assert_eq!(carried[1].decision_issue_id, stored[1].decision_issue_id);
    }
}
