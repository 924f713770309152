//! Appeal status lookup for a veteran

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::error::ReviewError;
use crate::ports::{LegacyAppealPort, ReviewPort, VeteranLookupPort};
use crate::review::{Review, ReviewKind};
use crate::status::StatusStrategy;
use crate::veteran::{vacols_id_for_file_number, LegacyAppealStatus, Ssn};

/// Everything the status API reports for one veteran
#[derive(Debug, Clone, Default)]
pub struct VeteranAppealStatuses {
    pub file_number: String,
    pub vbms_id: String,
    pub higher_level_reviews: Vec<Review>,
    pub supplemental_claims: Vec<Review>,
    pub legacy_appeals: Vec<LegacyAppealStatus>,
}

/// Resolves a veteran and gathers their decision reviews and legacy appeals
#[derive(Clone)]
pub struct AppealStatusService {
    veterans: Arc<dyn VeteranLookupPort>,
    reviews: Arc<dyn ReviewPort>,
    legacy: Arc<dyn LegacyAppealPort>,
}

impl AppealStatusService {
    pub fn new(
        veterans: Arc<dyn VeteranLookupPort>,
        reviews: Arc<dyn ReviewPort>,
        legacy: Arc<dyn LegacyAppealPort>,
    ) -> Self {
        Self { veterans, reviews, legacy }
    }

    /// Resolves the SSN to a file number
    pub async fn file_number_for(&self, ssn: &Ssn) -> Result<String, ReviewError> {
        self.veterans
            .fetch_file_number_by_ssn(ssn)
            .await?
            .ok_or(ReviewError::VeteranNotFound)
    }

    /// Looks up all statuses for the veteran with this SSN
    ///
    /// Reviews are only loaded under [`StatusStrategy::AllReviews`].
    #[instrument(skip(self, ssn))]
    pub async fn lookup(
        &self,
        ssn: &Ssn,
        strategy: StatusStrategy,
    ) -> Result<VeteranAppealStatuses, ReviewError> {
        let file_number = self.file_number_for(ssn).await?;
        self.statuses_for(file_number, strategy).await
    }

    /// Gathers statuses for an already resolved file number
    #[instrument(skip(self, file_number))]
    pub async fn statuses_for(
        &self,
        file_number: String,
        strategy: StatusStrategy,
    ) -> Result<VeteranAppealStatuses, ReviewError> {
        let vbms_id = vacols_id_for_file_number(&file_number)?;

        let legacy_appeals: Vec<LegacyAppealStatus> = self
            .legacy
            .appeals_for(&vbms_id)
            .await?
            .into_iter()
            .filter(LegacyAppealStatus::is_vba)
            .collect();

        let mut statuses = VeteranAppealStatuses {
            file_number,
            vbms_id,
            legacy_appeals,
            ..Default::default()
        };

        if strategy.includes_reviews() {
            statuses.higher_level_reviews = self
                .reviews
                .find_by_veteran(&statuses.file_number, ReviewKind::HigherLevelReview)
                .await?;
            statuses.supplemental_claims = self
                .reviews
                .find_by_veteran(&statuses.file_number, ReviewKind::SupplementalClaim)
                .await?;
        }

        debug!(
            hlr_count = statuses.higher_level_reviews.len(),
            sc_count = statuses.supplemental_claims.len(),
            legacy_count = statuses.legacy_appeals.len(),
            "Loaded appeal statuses"
        );
        Ok(statuses)
    }
}
