//! Personal reminders plus the flag-driven notification queries.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;

use crate::error::AppError;
use crate::models::reminder::{AllocationAlert, Reminder, TrainingReminder};

const REMINDER_COLUMNS: &str = "id, emp_id, remind_on, subject, body, created_at";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReminderRepositoryTrait: Send + Sync {
    async fn create(&self, db: &PgPool, reminder: &Reminder) -> Result<Reminder, AppError>;

    /// Reminders due on `date`, optionally narrowed to a subject substring.
    async fn list_for_date(
        &self,
        db: &PgPool,
        emp_id: &str,
        date: NaiveDate,
        subject: Option<String>,
    ) -> Result<Vec<Reminder>, AppError>;

    /// Outstanding allocations an approver has flagged for return.
    async fn allocation_alerts(
        &self,
        db: &PgPool,
        emp_id: &str,
    ) -> Result<Vec<AllocationAlert>, AppError>;

    /// Pending trainings flagged with a reminder.
    async fn training_reminders(
        &self,
        db: &PgPool,
        emp_id: &str,
    ) -> Result<Vec<TrainingReminder>, AppError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ReminderRepository;

impl ReminderRepository {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ReminderRepositoryTrait for ReminderRepository {
    async fn create(&self, db: &PgPool, reminder: &Reminder) -> Result<Reminder, AppError> {
        let query = format!(
            "INSERT INTO reminders ({cols}) VALUES ($1, $2, $3, $4, $5, $6) RETURNING {cols}",
            cols = REMINDER_COLUMNS
        );
        let row = sqlx::query_as::<_, Reminder>(&query)
            .bind(reminder.id)
            .bind(&reminder.emp_id)
            .bind(reminder.remind_on)
            .bind(&reminder.subject)
            .bind(&reminder.body)
            .bind(reminder.created_at)
            .fetch_one(db)
            .await?;
        Ok(row)
    }

    async fn list_for_date(
        &self,
        db: &PgPool,
        emp_id: &str,
        date: NaiveDate,
        subject: Option<String>,
    ) -> Result<Vec<Reminder>, AppError> {
        let pattern = subject
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(contains_pattern);
        let query = format!(
            "SELECT {} FROM reminders WHERE emp_id = $1 AND remind_on = $2 \
             AND ($3::TEXT IS NULL OR subject ILIKE $3 ESCAPE '\\') ORDER BY created_at",
            REMINDER_COLUMNS
        );
        let rows = sqlx::query_as::<_, Reminder>(&query)
            .bind(emp_id)
            .bind(date)
            .bind(pattern)
            .fetch_all(db)
            .await?;
        Ok(rows)
    }

    async fn allocation_alerts(
        &self,
        db: &PgPool,
        emp_id: &str,
    ) -> Result<Vec<AllocationAlert>, AppError> {
        let rows = sqlx::query_as::<_, AllocationAlert>(
            "SELECT a.id AS allocation_id, r.name AS resource_name, a.quantity, a.due_on, \
             a.created_at AS allocated_at \
             FROM resource_allocations a JOIN resources r ON r.id = a.resource_id \
             WHERE a.emp_id = $1 AND a.alert AND a.status = 'not_returned' \
             ORDER BY a.created_at",
        )
        .bind(emp_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    async fn training_reminders(
        &self,
        db: &PgPool,
        emp_id: &str,
    ) -> Result<Vec<TrainingReminder>, AppError> {
        let rows = sqlx::query_as::<_, TrainingReminder>(
            "SELECT a.id AS allocation_id, t.name AS training_name, a.finish_by \
             FROM training_allocations a JOIN trainings t ON t.id = a.training_id \
             WHERE a.emp_id = $1 AND a.reminder AND a.status = 'pending' \
             ORDER BY a.finish_by",
        )
        .bind(emp_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }
}

/// `ILIKE` pattern matching `needle` literally anywhere in the column.
fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for ch in needle.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_pattern_escapes_like_wildcards() {
        assert_eq!(contains_pattern("payroll"), "%payroll%");
        assert_eq!(contains_pattern("50%_off"), r"%50\%\_off%");
        assert_eq!(contains_pattern(r"a\b"), r"%a\\b%");
    }

    #[test]
    fn mock_reminder_repository_is_send_sync() {
        fn check_send_sync<T: Send + Sync>() {}
        check_send_sync::<MockReminderRepositoryTrait>();
    }
}
