use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::types::{ReminderId, ResourceAllocationId, TrainingAllocationId};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Reminder {
    #[schema(value_type = String)]
    pub id: ReminderId,
    pub emp_id: String,
    pub remind_on: NaiveDate,
    pub subject: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl Reminder {
    pub fn new(emp_id: String, remind_on: NaiveDate, subject: String, body: String) -> Self {
        Self {
            id: ReminderId::new(),
            emp_id,
            remind_on,
            subject,
            body,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateReminder {
    /// Defaults to today in the configured time zone.
    pub remind_on: Option<NaiveDate>,
    #[validate(length(min = 1, max = 200))]
    pub subject: String,
    #[validate(length(min = 1, max = 2000))]
    pub body: String,
}

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct ReminderQuery {
    pub date: Option<NaiveDate>,
    pub subject: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AllocationAlert {
    #[schema(value_type = String)]
    pub allocation_id: ResourceAllocationId,
    pub resource_name: String,
    pub quantity: i32,
    pub due_on: NaiveDate,
    pub allocated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct TrainingReminder {
    #[schema(value_type = String)]
    pub allocation_id: TrainingAllocationId,
    pub training_name: String,
    pub finish_by: NaiveDate,
}

/// Everything the client shows on its notification poll.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NotificationFeed {
    pub allocation_alerts: Vec<AllocationAlert>,
    pub training_reminders: Vec<TrainingReminder>,
    pub reminders: Vec<Reminder>,
    pub total: usize,
}

impl NotificationFeed {
    pub fn new(
        allocation_alerts: Vec<AllocationAlert>,
        training_reminders: Vec<TrainingReminder>,
        reminders: Vec<Reminder>,
    ) -> Self {
        let total = allocation_alerts.len() + training_reminders.len() + reminders.len();
        Self {
            allocation_alerts,
            training_reminders,
            reminders,
            total,
        }
    }
}
