use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::models::workflow::WorkflowStatus;
use crate::types::{TrainingAllocationId, TrainingId};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Training {
    #[schema(value_type = String)]
    pub id: TrainingId,
    pub name: String,
    /// Relative importance used when ranking assigned trainings.
    pub weight: i32,
    pub duration_days: i32,
    pub created_at: DateTime<Utc>,
}

impl Training {
    pub fn new(name: String, weight: i32, duration_days: i32) -> Self {
        Self {
            id: TrainingId::new(),
            name,
            weight,
            duration_days,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema, Default)]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TrainingStatus {
    #[default]
    Pending,
    Completed,
}

impl WorkflowStatus for TrainingStatus {
    const ALL: &'static [Self] = &[TrainingStatus::Pending, TrainingStatus::Completed];

    fn db_value(&self) -> &'static str {
        match self {
            TrainingStatus::Pending => "pending",
            TrainingStatus::Completed => "completed",
        }
    }

    fn allowed_next(&self) -> &'static [Self] {
        match self {
            TrainingStatus::Pending => &[TrainingStatus::Completed],
            TrainingStatus::Completed => &[],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct TrainingAllocation {
    #[schema(value_type = String)]
    pub id: TrainingAllocationId,
    #[schema(value_type = String)]
    pub training_id: TrainingId,
    pub emp_id: String,
    pub finish_by: NaiveDate,
    pub status: TrainingStatus,
    pub reminder: bool,
    pub allocated_by: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TrainingAllocation {
    pub fn new(
        training_id: TrainingId,
        emp_id: String,
        finish_by: NaiveDate,
        allocated_by: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: TrainingAllocationId::new(),
            training_id,
            emp_id,
            finish_by,
            status: TrainingStatus::Pending,
            reminder: false,
            allocated_by: Some(allocated_by),
            completed_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Training allocation joined with the training and employee names.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct TrainingAllocationView {
    #[schema(value_type = String)]
    pub id: TrainingAllocationId,
    #[schema(value_type = String)]
    pub training_id: TrainingId,
    pub training_name: String,
    pub weight: i32,
    pub duration_days: i32,
    pub emp_id: String,
    pub employee_name: String,
    pub finish_by: NaiveDate,
    pub status: TrainingStatus,
    pub reminder: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateTraining {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(range(min = 0, max = 100))]
    pub weight: i32,
    #[validate(range(min = 1, max = 3650))]
    pub duration_days: i32,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct AllocateTraining {
    #[validate(length(min = 1, max = 32))]
    pub emp_id: String,
    pub finish_by: NaiveDate,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReminderFlagPayload {
    pub reminder: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completed_training_cannot_go_back_to_pending() {
        assert!(TrainingStatus::Pending.can_transition_to(TrainingStatus::Completed));
        assert!(!TrainingStatus::Completed.can_transition_to(TrainingStatus::Pending));
        assert!(!TrainingStatus::Completed.can_transition_to(TrainingStatus::Completed));
    }

    #[test]
    fn training_status_parses_from_db_value() {
        assert_eq!(TrainingStatus::parse("Completed"), Some(TrainingStatus::Completed));
        assert_eq!(TrainingStatus::parse("done"), None);
    }
}
