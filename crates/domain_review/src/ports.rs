//! Decision Review Ports
//!
//! Port interfaces the review services depend on. Adapters provide the
//! implementations:
//!
//! - **PostgreSQL adapters** (`infra_db`): reviews, intake steps, and local
//!   mirrors of the identity and legacy appeals systems
//! - **Mock adapters** (`mock` feature): in-memory stores for tests
//!
//! ```rust,ignore
//! let service = DtaFollowUpService::new(
//!     Arc::new(PostgresReviewAdapter::new(pool.clone())),
//!     Arc::new(PostgresReviewAdapter::new(pool)),
//!     Timezone::default(),
//! );
//! service.on_decision_issues_sync_processed(review_id).await?;
//! ```

use async_trait::async_trait;

use core_kernel::{DomainPort, HealthCheckable, PortError, ProcessingJobId, ReviewId};

use crate::decision_issue::DecisionIssue;
use crate::request_issue::RequestIssue;
use crate::review::{Review, ReviewKind};
use crate::veteran::{LegacyAppealStatus, Ssn};
use crate::workflow::DecisionReviewTask;

/// Result of inserting a dependent DTA claim
#[derive(Debug, Clone)]
pub enum DependentClaimCreation {
    /// The claim was inserted
    Created(Review),
    /// The parent already had a dependent claim; nothing was inserted
    AlreadyExists(Review),
}

impl DependentClaimCreation {
    pub fn claim(&self) -> &Review {
        match self {
            DependentClaimCreation::Created(claim) | DependentClaimCreation::AlreadyExists(claim) => claim,
        }
    }
}

/// Storage of reviews and their synced collections
#[async_trait]
pub trait ReviewPort: DomainPort + HealthCheckable {
    /// Loads a review with its decision issues, end products and DTA claim chain
    ///
    /// Returns `PortError::NotFound` for an unknown id.
    async fn get_review(&self, id: ReviewId) -> Result<Review, PortError>;

    /// All reviews of one kind for a veteran, fully loaded
    async fn find_by_veteran(
        &self,
        veteran_file_number: &str,
        kind: ReviewKind,
    ) -> Result<Vec<Review>, PortError>;

    /// Records the synced decision issues of a review
    ///
    /// Issues recording the same decision as a previous sync keep their ids,
    /// and issues contested by a request issue are never removed. See
    /// [`merge_synced_decision_issues`](crate::decision_issue::merge_synced_decision_issues).
    async fn record_decision_issues(
        &self,
        review_id: ReviewId,
        issues: Vec<DecisionIssue>,
    ) -> Result<(), PortError>;

    /// Inserts a dependent DTA claim unless its parent already has one
    ///
    /// Must be atomic: of two concurrent callers for the same parent, exactly
    /// one observes `Created`.
    async fn create_dta_claim(&self, claim: Review) -> Result<DependentClaimCreation, PortError>;
}

/// Intake steps a newly created review is advanced through
///
/// Every step is idempotent so an interrupted intake can be run again.
#[async_trait]
pub trait IntakeProcessingPort: DomainPort {
    /// Adds request issues, skipping any whose contested decision issue is
    /// already contested on the review
    async fn create_issues(
        &self,
        review_id: ReviewId,
        issues: Vec<RequestIssue>,
    ) -> Result<(), PortError>;

    /// Adds a task unless the review already has one for the business line
    async fn create_task(&self, task: DecisionReviewTask) -> Result<(), PortError>;

    /// Marks the review as submitted for end product establishment
    async fn submit_for_processing(&self, review_id: ReviewId) -> Result<(), PortError>;

    /// Queues the job that establishes the review's end products
    ///
    /// Returns the already queued job when there is one.
    async fn start_processing_job(&self, review_id: ReviewId) -> Result<ProcessingJobId, PortError>;

    /// The job queued for a review, if any
    async fn processing_job_for(&self, review_id: ReviewId) -> Result<Option<ProcessingJobId>, PortError>;
}

/// Veteran identity lookup
#[async_trait]
pub trait VeteranLookupPort: DomainPort + HealthCheckable {
    /// Resolves an SSN to a claims file number; `None` when unknown
    async fn fetch_file_number_by_ssn(&self, ssn: &Ssn) -> Result<Option<String>, PortError>;
}

/// Legacy appeal status source
#[async_trait]
pub trait LegacyAppealPort: DomainPort {
    async fn appeals_for(&self, vbms_id: &str) -> Result<Vec<LegacyAppealStatus>, PortError>;
}

#[cfg(any(test, feature = "mock"))]
pub mod mock {
    //! In-memory adapters for tests

    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Instant;
    use tokio::sync::RwLock;

    use core_kernel::{AdapterHealth, DecisionIssueId, HealthCheckResult};

    use crate::decision_issue::merge_synced_decision_issues;

    #[derive(Debug, Default)]
    struct StoreState {
        reviews: HashMap<ReviewId, Review>,
        request_issues: HashMap<ReviewId, Vec<RequestIssue>>,
        tasks: Vec<DecisionReviewTask>,
        submitted: Vec<ReviewId>,
        jobs: Vec<(ProcessingJobId, ReviewId)>,
    }

    impl StoreState {
        fn dta_claim_of(&self, parent: ReviewId) -> Option<&Review> {
            self.reviews
                .values()
                .find(|review| review.decision_review_remanded == Some(parent))
        }

        fn is_contested(&self, id: DecisionIssueId) -> bool {
            self.request_issues
                .values()
                .flatten()
                .any(|issue| issue.contested_decision_issue_id == Some(id))
        }

        fn assemble(&self, id: ReviewId) -> Option<Review> {
            let mut review = self.reviews.get(&id)?.clone();
            if let Some(claim) = self.dta_claim_of(id) {
                if let Some(loaded) = self.assemble(claim.id) {
                    review.attach_dta_claim(loaded);
                }
            }
            Some(review)
        }
    }

    /// In-memory review store that also records intake steps
    #[derive(Debug, Clone, Default)]
    pub struct InMemoryReviewStore {
        state: Arc<RwLock<StoreState>>,
        fail_with: Arc<RwLock<Option<String>>>,
    }

    impl InMemoryReviewStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// Stores a review; an attached DTA claim is stored as its own row
        pub async fn insert(&self, mut review: Review) {
            let mut state = self.state.write().await;
            let mut pending = review.dta_claim.take().map(|claim| *claim);
            state.reviews.insert(review.id, review);
            while let Some(mut claim) = pending {
                pending = claim.dta_claim.take().map(|inner| *inner);
                state.reviews.insert(claim.id, claim);
            }
        }

        /// Makes every subsequent call fail with an internal error
        pub async fn fail_with(&self, message: impl Into<String>) {
            *self.fail_with.write().await = Some(message.into());
        }

        async fn check_failure(&self) -> Result<(), PortError> {
            match self.fail_with.read().await.as_ref() {
                Some(message) => Err(PortError::internal(message.clone())),
                None => Ok(()),
            }
        }

        pub async fn review_count(&self) -> usize {
            self.state.read().await.reviews.len()
        }

        pub async fn dependent_claims_of(&self, parent: ReviewId) -> Vec<Review> {
            self.state
                .read()
                .await
                .reviews
                .values()
                .filter(|review| review.decision_review_remanded == Some(parent))
                .cloned()
                .collect()
        }

        pub async fn request_issues(&self, review_id: ReviewId) -> Vec<RequestIssue> {
            self.state
                .read()
                .await
                .request_issues
                .get(&review_id)
                .cloned()
                .unwrap_or_default()
        }

        pub async fn tasks(&self) -> Vec<DecisionReviewTask> {
            self.state.read().await.tasks.clone()
        }

        pub async fn submitted(&self) -> Vec<ReviewId> {
            self.state.read().await.submitted.clone()
        }

        pub async fn jobs_started(&self) -> Vec<ReviewId> {
            self.state.read().await.jobs.iter().map(|(_, review)| *review).collect()
        }
    }

    impl DomainPort for InMemoryReviewStore {}

    #[async_trait]
    impl HealthCheckable for InMemoryReviewStore {
        async fn health_check(&self) -> HealthCheckResult {
            HealthCheckResult::new("in_memory_reviews", AdapterHealth::Healthy, 0, None)
        }
    }

    #[async_trait]
    impl ReviewPort for InMemoryReviewStore {
        async fn get_review(&self, id: ReviewId) -> Result<Review, PortError> {
            self.check_failure().await?;
            self.state
                .read()
                .await
                .assemble(id)
                .ok_or_else(|| PortError::not_found("Review", id))
        }

        async fn find_by_veteran(
            &self,
            veteran_file_number: &str,
            kind: ReviewKind,
        ) -> Result<Vec<Review>, PortError> {
            self.check_failure().await?;
            let state = self.state.read().await;
            let mut reviews: Vec<Review> = state
                .reviews
                .values()
                .filter(|review| review.veteran_file_number == veteran_file_number && review.kind == kind)
                .filter_map(|review| state.assemble(review.id))
                .collect();
            reviews.sort_by_key(|review| review.created_at);
            Ok(reviews)
        }

        async fn record_decision_issues(
            &self,
            review_id: ReviewId,
            issues: Vec<DecisionIssue>,
        ) -> Result<(), PortError> {
            self.check_failure().await?;
            let mut state = self.state.write().await;
            let existing = state
                .reviews
                .get_mut(&review_id)
                .map(|review| std::mem::take(&mut review.decision_issues))
                .ok_or_else(|| PortError::not_found("Review", review_id))?;

            let merged = merge_synced_decision_issues(existing, issues, |id| state.is_contested(id));
            if let Some(review) = state.reviews.get_mut(&review_id) {
                review.decision_issues = merged;
            }
            Ok(())
        }

        async fn create_dta_claim(&self, claim: Review) -> Result<DependentClaimCreation, PortError> {
            self.check_failure().await?;
            let parent = claim
                .decision_review_remanded
                .ok_or_else(|| PortError::validation_field("DTA claim has no parent review", "decision_review_remanded"))?;

            let mut state = self.state.write().await;
            if let Some(existing) = state.dta_claim_of(parent) {
                return Ok(DependentClaimCreation::AlreadyExists(existing.clone()));
            }
            state.reviews.insert(claim.id, claim.clone());
            Ok(DependentClaimCreation::Created(claim))
        }
    }

    #[async_trait]
    impl IntakeProcessingPort for InMemoryReviewStore {
        async fn create_issues(
            &self,
            review_id: ReviewId,
            issues: Vec<RequestIssue>,
        ) -> Result<(), PortError> {
            self.check_failure().await?;
            let mut state = self.state.write().await;
            let recorded = state.request_issues.entry(review_id).or_default();
            for issue in issues {
                let contested = issue.contested_decision_issue_id;
                let duplicate = contested.is_some()
                    && recorded.iter().any(|r| r.contested_decision_issue_id == contested);
                if !duplicate {
                    recorded.push(issue);
                }
            }
            Ok(())
        }

        async fn create_task(&self, task: DecisionReviewTask) -> Result<(), PortError> {
            self.check_failure().await?;
            let mut state = self.state.write().await;
            let exists = state
                .tasks
                .iter()
                .any(|t| t.review_id == task.review_id && t.assigned_to == task.assigned_to);
            if !exists {
                state.tasks.push(task);
            }
            Ok(())
        }

        async fn submit_for_processing(&self, review_id: ReviewId) -> Result<(), PortError> {
            self.check_failure().await?;
            let mut state = self.state.write().await;
            let review = state
                .reviews
                .get_mut(&review_id)
                .ok_or_else(|| PortError::not_found("Review", review_id))?;
            if review.establishment_submitted_at.is_none() {
                review.establishment_submitted_at = Some(chrono::Utc::now());
                state.submitted.push(review_id);
            }
            Ok(())
        }

        async fn start_processing_job(&self, review_id: ReviewId) -> Result<ProcessingJobId, PortError> {
            self.check_failure().await?;
            let mut state = self.state.write().await;
            if let Some((job_id, _)) = state.jobs.iter().find(|(_, review)| *review == review_id) {
                return Ok(*job_id);
            }
            let job_id = ProcessingJobId::new_v7();
            state.jobs.push((job_id, review_id));
            Ok(job_id)
        }

        async fn processing_job_for(&self, review_id: ReviewId) -> Result<Option<ProcessingJobId>, PortError> {
            self.check_failure().await?;
            Ok(self
                .state
                .read()
                .await
                .jobs
                .iter()
                .find(|(_, review)| *review == review_id)
                .map(|(job_id, _)| *job_id))
        }
    }

    /// Identity lookup over a fixed SSN table
    #[derive(Debug, Clone, Default)]
    pub struct MockVeteranLookup {
        file_numbers: Arc<RwLock<HashMap<String, String>>>,
        timeout: Arc<RwLock<bool>>,
        calls: Arc<AtomicUsize>,
    }

    impl MockVeteranLookup {
        pub fn new() -> Self {
            Self::default()
        }

        pub async fn add_veteran(&self, ssn: impl Into<String>, file_number: impl Into<String>) {
            self.file_numbers.write().await.insert(ssn.into(), file_number.into());
        }

        /// Makes subsequent lookups time out
        pub async fn set_timeout(&self, timeout: bool) {
            *self.timeout.write().await = timeout;
        }

        /// Number of lookups performed
        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl DomainPort for MockVeteranLookup {}

    #[async_trait]
    impl HealthCheckable for MockVeteranLookup {
        async fn health_check(&self) -> HealthCheckResult {
            let started = Instant::now();
            let status = if *self.timeout.read().await {
                AdapterHealth::Unhealthy
            } else {
                AdapterHealth::Healthy
            };
            HealthCheckResult::new("mock_veteran_lookup", status, started.elapsed().as_millis() as u64, None)
        }
    }

    #[async_trait]
    impl VeteranLookupPort for MockVeteranLookup {
        async fn fetch_file_number_by_ssn(&self, ssn: &Ssn) -> Result<Option<String>, PortError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if *self.timeout.read().await {
                return Err(PortError::timeout("fetch_file_number_by_ssn", 0));
            }
            Ok(self.file_numbers.read().await.get(ssn.as_str()).cloned())
        }
    }

    /// Legacy appeal statuses keyed by VACOLS id
    #[derive(Debug, Clone, Default)]
    pub struct MockLegacyAppeals {
        appeals: Arc<RwLock<HashMap<String, Vec<LegacyAppealStatus>>>>,
    }

    impl MockLegacyAppeals {
        pub fn new() -> Self {
            Self::default()
        }

        pub async fn add_appeal(&self, vbms_id: impl Into<String>, appeal: LegacyAppealStatus) {
            self.appeals.write().await.entry(vbms_id.into()).or_default().push(appeal);
        }
    }

    impl DomainPort for MockLegacyAppeals {}

    #[async_trait]
    impl LegacyAppealPort for MockLegacyAppeals {
        async fn appeals_for(&self, vbms_id: &str) -> Result<Vec<LegacyAppealStatus>, PortError> {
            Ok(self.appeals.read().await.get(vbms_id).cloned().unwrap_or_default())
        }
    }
}
