//! Decision Review Domain
//!
//! This crate implements the review side of the benefits appeals process:
//! Higher-Level Reviews (HLR) and Supplemental Claims (SC), the derivation of
//! their lifecycle status for the status API, and the "Duty to Assist" (DTA)
//! follow-up that spawns a remand Supplemental Claim.
//!
//! # Review Lifecycle
//!
//! ```text
//! Intake -> End product established (received)
//!        -> Decision issues synced -> decision | closed
//!                                  -> DTA errors -> remand SC (dta_error) -> decision | closed
//! ```

pub mod review;
pub mod decision_issue;
pub mod end_product;
pub mod request_issue;
pub mod status;
pub mod events;
pub mod dta;
pub mod workflow;
pub mod veteran;
pub mod services;
pub mod ports;
pub mod error;

pub use review::{Review, ReviewKind, BenefitType, Claimant, FieldError, ReceiptDateError, ama_begin_date};
pub use decision_issue::{DecisionIssue, DTA_ERRORS, is_dta_error, merge_synced_decision_issues};
pub use end_product::{EndProductEstablishment, EndProductStatus};
pub use request_issue::RequestIssue;
pub use status::{DerivedStatus, StatusSnapshot, StatusStrategy, derive_status};
pub use events::{ReviewEvent, EventKind, ReviewAlert, AlertDetails, StatusDetails, StatusIssue, ApiStatus};
pub use dta::{
    DtaFollowUpPlan, DtaFollowUpService, DtaFollowUpOutcome, plan_dta_follow_up,
    dta_issues_needing_follow_up,
};
pub use workflow::{DecisionReviewTask, TaskStatus, decision_review_task_for};
pub use veteran::{Ssn, LegacyAppealStatus, vacols_id_for_file_number};
pub use services::{AppealStatusService, VeteranAppealStatuses};
pub use ports::{
    ReviewPort, IntakeProcessingPort, VeteranLookupPort, LegacyAppealPort,
    DependentClaimCreation,
};
#[cfg(any(test, feature = "mock"))]
pub use ports::mock::{InMemoryReviewStore, MockVeteranLookup, MockLegacyAppeals};
pub use error::ReviewError;
