//! Decision review tasks for benefit lines worked in this system

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{ReviewId, TaskId};
use crate::review::Review;

/// A task assigned to a business line to decide a review
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionReviewTask {
    pub id: TaskId,
    pub review_id: ReviewId,
    pub assigned_to: String,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Task status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Assigned,
    InProgress,
    Completed,
    Cancelled,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Assigned => "assigned",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
            TaskStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "assigned" => Some(TaskStatus::Assigned),
            "in_progress" => Some(TaskStatus::InProgress),
            "completed" => Some(TaskStatus::Completed),
            "cancelled" => Some(TaskStatus::Cancelled),
            _ => None,
        }
    }
}

impl DecisionReviewTask {
    /// Creates a new task
    pub fn new(review_id: ReviewId, assigned_to: impl Into<String>) -> Self {
        Self {
            id: TaskId::new_v7(),
            review_id,
            assigned_to: assigned_to.into(),
            status: TaskStatus::Assigned,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    /// Marks task as completed
    pub fn complete(&mut self) {
        self.status = TaskStatus::Completed;
        self.completed_at = Some(Utc::now());
    }
}

/// Builds the decision review task a review needs, if any
///
/// Compensation and pension reviews are decided in the claims system and
/// get no task.
pub fn decision_review_task_for(review: &Review) -> Option<DecisionReviewTask> {
    review
        .benefit_type
        .processed_in_house()
        .then(|| DecisionReviewTask::new(review.id, review.benefit_type.business_line()))
}
