//! Training catalogue and training allocation repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::error::AppError;
use crate::models::training::{
    Training, TrainingAllocation, TrainingAllocationView, TrainingStatus,
};
use crate::models::workflow::WorkflowStatus;
use crate::repositories::common::lock_and_check_transition;
use crate::repositories::transaction::{begin_transaction, commit_transaction};
use crate::types::{TrainingAllocationId, TrainingId};

const TRAINING_COLUMNS: &str = "id, name, weight, duration_days, created_at";

const TRAINING_ALLOCATION_COLUMNS: &str = "id, training_id, emp_id, finish_by, status, reminder, \
     allocated_by, completed_at, created_at, updated_at";

const TRAINING_VIEW_SELECT: &str = "SELECT a.id, a.training_id, t.name AS training_name, \
     t.weight, t.duration_days, a.emp_id, e.full_name AS employee_name, a.finish_by, a.status, \
     a.reminder, a.completed_at, a.created_at \
     FROM training_allocations a \
     JOIN trainings t ON t.id = a.training_id \
     JOIN employees e ON e.emp_id = a.emp_id";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TrainingRepositoryTrait: Send + Sync {
    async fn create(&self, db: &PgPool, training: &Training) -> Result<Training, AppError>;

    async fn list(&self, db: &PgPool) -> Result<Vec<Training>, AppError>;

    async fn find_by_id(&self, db: &PgPool, id: TrainingId) -> Result<Training, AppError>;

    async fn allocate(
        &self,
        db: &PgPool,
        allocation: &TrainingAllocation,
    ) -> Result<TrainingAllocation, AppError>;

    async fn list_allocations(
        &self,
        db: &PgPool,
        status: Option<TrainingStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<TrainingAllocationView>, i64), AppError>;

    /// Highest-weight trainings first, then nearest deadline.
    async fn list_allocations_for_employee(
        &self,
        db: &PgPool,
        emp_id: &str,
    ) -> Result<Vec<TrainingAllocationView>, AppError>;

    async fn update_status(
        &self,
        db: &PgPool,
        id: TrainingAllocationId,
        next: TrainingStatus,
        timestamp: DateTime<Utc>,
    ) -> Result<TrainingAllocation, AppError>;

    async fn set_reminder(
        &self,
        db: &PgPool,
        id: TrainingAllocationId,
        reminder: bool,
    ) -> Result<TrainingAllocation, AppError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TrainingRepository;

impl TrainingRepository {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TrainingRepositoryTrait for TrainingRepository {
    async fn create(&self, db: &PgPool, training: &Training) -> Result<Training, AppError> {
        let query = format!(
            "INSERT INTO trainings ({cols}) VALUES ($1, $2, $3, $4, $5) RETURNING {cols}",
            cols = TRAINING_COLUMNS
        );
        let row = sqlx::query_as::<_, Training>(&query)
            .bind(training.id)
            .bind(&training.name)
            .bind(training.weight)
            .bind(training.duration_days)
            .bind(training.created_at)
            .fetch_one(db)
            .await?;
        Ok(row)
    }

    async fn list(&self, db: &PgPool) -> Result<Vec<Training>, AppError> {
        let query = format!(
            "SELECT {} FROM trainings ORDER BY weight DESC, name",
            TRAINING_COLUMNS
        );
        let rows = sqlx::query_as::<_, Training>(&query).fetch_all(db).await?;
        Ok(rows)
    }

    async fn find_by_id(&self, db: &PgPool, id: TrainingId) -> Result<Training, AppError> {
        let query = format!("SELECT {} FROM trainings WHERE id = $1", TRAINING_COLUMNS);
        sqlx::query_as::<_, Training>(&query)
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::NotFound("Training not found".into()))
    }

    async fn allocate(
        &self,
        db: &PgPool,
        allocation: &TrainingAllocation,
    ) -> Result<TrainingAllocation, AppError> {
        let query = format!(
            "INSERT INTO training_allocations ({cols}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING {cols}",
            cols = TRAINING_ALLOCATION_COLUMNS
        );
        let row = sqlx::query_as::<_, TrainingAllocation>(&query)
            .bind(allocation.id)
            .bind(allocation.training_id)
            .bind(&allocation.emp_id)
            .bind(allocation.finish_by)
            .bind(allocation.status.db_value())
            .bind(allocation.reminder)
            .bind(&allocation.allocated_by)
            .bind(allocation.completed_at)
            .bind(allocation.created_at)
            .bind(allocation.updated_at)
            .fetch_one(db)
            .await?;
        Ok(row)
    }

    async fn list_allocations(
        &self,
        db: &PgPool,
        status: Option<TrainingStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<TrainingAllocationView>, i64), AppError> {
        let status = status.map(|s| s.db_value());
        let query = format!(
            "{} WHERE ($1::TEXT IS NULL OR a.status = $1) \
             ORDER BY a.finish_by, a.created_at DESC LIMIT $2 OFFSET $3",
            TRAINING_VIEW_SELECT
        );
        let rows = sqlx::query_as::<_, TrainingAllocationView>(&query)
            .bind(status)
            .bind(limit)
            .bind(offset)
            .fetch_all(db)
            .await?;
        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM training_allocations WHERE ($1::TEXT IS NULL OR status = $1)",
        )
        .bind(status)
        .fetch_one(db)
        .await?;
        Ok((rows, total))
    }

    async fn list_allocations_for_employee(
        &self,
        db: &PgPool,
        emp_id: &str,
    ) -> Result<Vec<TrainingAllocationView>, AppError> {
        let query = format!(
            "{} WHERE a.emp_id = $1 ORDER BY t.weight DESC, a.finish_by",
            TRAINING_VIEW_SELECT
        );
        let rows = sqlx::query_as::<_, TrainingAllocationView>(&query)
            .bind(emp_id)
            .fetch_all(db)
            .await?;
        Ok(rows)
    }

    async fn update_status(
        &self,
        db: &PgPool,
        id: TrainingAllocationId,
        next: TrainingStatus,
        timestamp: DateTime<Utc>,
    ) -> Result<TrainingAllocation, AppError> {
        let mut tx = begin_transaction(db).await?;
        lock_and_check_transition(
            tx.as_mut(),
            "training_allocations",
            &id.to_string(),
            next,
            "Training allocation not found",
        )
        .await?;

        let completed_at = (next == TrainingStatus::Completed).then_some(timestamp);
        let query = format!(
            "UPDATE training_allocations SET status = $1, completed_at = $2, reminder = FALSE, \
             updated_at = $3 WHERE id = $4 RETURNING {}",
            TRAINING_ALLOCATION_COLUMNS
        );
        let row = sqlx::query_as::<_, TrainingAllocation>(&query)
            .bind(next.db_value())
            .bind(completed_at)
            .bind(timestamp)
            .bind(id)
            .fetch_one(tx.as_mut())
            .await?;
        commit_transaction(tx).await?;
        Ok(row)
    }

    async fn set_reminder(
        &self,
        db: &PgPool,
        id: TrainingAllocationId,
        reminder: bool,
    ) -> Result<TrainingAllocation, AppError> {
        let query = format!(
            "UPDATE training_allocations SET reminder = $1, updated_at = $2 WHERE id = $3 \
             RETURNING {}",
            TRAINING_ALLOCATION_COLUMNS
        );
        sqlx::query_as::<_, TrainingAllocation>(&query)
            .bind(reminder)
            .bind(Utc::now())
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::NotFound("Training allocation not found".into()))
    }
}
