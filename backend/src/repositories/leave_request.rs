//! Leave request repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::error::AppError;
use crate::models::leave_request::{LeaveRequest, LeaveStatus};
use crate::models::workflow::WorkflowStatus;
use crate::repositories::common::{lock_and_check_transition, push_clause};
use crate::repositories::transaction::{begin_transaction, commit_transaction};
use crate::types::LeaveRequestId;

const LEAVE_COLUMNS: &str = "id, emp_id, leave_type, date_from, date_to, time_from, time_to, \
     reason, status, decided_by, decided_at, created_at, updated_at";

/// Filters for the approver's leave list.
#[derive(Debug, Clone, Default)]
pub struct LeaveListFilters {
    pub status: Option<LeaveStatus>,
    pub emp_id: Option<String>,
}

/// Outcome of an owner's delete attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveDeleteOutcome {
    Deleted,
    NotFound,
    NotPending,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LeaveRequestRepositoryTrait: Send + Sync {
    async fn create(&self, db: &PgPool, item: &LeaveRequest) -> Result<LeaveRequest, AppError>;

    async fn find_by_id(&self, db: &PgPool, id: LeaveRequestId) -> Result<LeaveRequest, AppError>;

    async fn find_by_employee(&self, db: &PgPool, emp_id: &str)
        -> Result<Vec<LeaveRequest>, AppError>;

    async fn list(
        &self,
        db: &PgPool,
        filters: &LeaveListFilters,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<LeaveRequest>, i64), AppError>;

    /// Removes the owner's leave while it is still pending.
    async fn delete_pending(
        &self,
        db: &PgPool,
        id: LeaveRequestId,
        emp_id: &str,
    ) -> Result<LeaveDeleteOutcome, AppError>;

    async fn update_status(
        &self,
        db: &PgPool,
        id: LeaveRequestId,
        next: LeaveStatus,
        decided_by: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<LeaveRequest, AppError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LeaveRequestRepository;

impl LeaveRequestRepository {
    pub fn new() -> Self {
        Self
    }
}

fn apply_leave_filters(builder: &mut QueryBuilder<'_, Postgres>, filters: &LeaveListFilters) {
    let mut has_clause = false;
    if let Some(status) = filters.status {
        push_clause(builder, &mut has_clause);
        builder.push("status = ").push_bind(status.db_value());
    }
    if let Some(emp_id) = filters.emp_id.clone() {
        push_clause(builder, &mut has_clause);
        builder.push("emp_id = ").push_bind(emp_id);
    }
}

#[async_trait]
impl LeaveRequestRepositoryTrait for LeaveRequestRepository {
    async fn create(&self, db: &PgPool, item: &LeaveRequest) -> Result<LeaveRequest, AppError> {
        let query = format!(
            "INSERT INTO leave_requests ({cols}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) \
             RETURNING {cols}",
            cols = LEAVE_COLUMNS
        );
        let row = sqlx::query_as::<_, LeaveRequest>(&query)
            .bind(item.id)
            .bind(&item.emp_id)
            .bind(item.leave_type.db_value())
            .bind(item.date_from)
            .bind(item.date_to)
            .bind(item.time_from)
            .bind(item.time_to)
            .bind(&item.reason)
            .bind(item.status.db_value())
            .bind(&item.decided_by)
            .bind(item.decided_at)
            .bind(item.created_at)
            .bind(item.updated_at)
            .fetch_one(db)
            .await?;
        Ok(row)
    }

    async fn find_by_id(&self, db: &PgPool, id: LeaveRequestId) -> Result<LeaveRequest, AppError> {
        let query = format!("SELECT {} FROM leave_requests WHERE id = $1", LEAVE_COLUMNS);
        let row = sqlx::query_as::<_, LeaveRequest>(&query)
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::NotFound("Leave request not found".into()))?;
        Ok(row)
    }

    async fn find_by_employee(
        &self,
        db: &PgPool,
        emp_id: &str,
    ) -> Result<Vec<LeaveRequest>, AppError> {
        let query = format!(
            "SELECT {} FROM leave_requests WHERE emp_id = $1 ORDER BY created_at DESC",
            LEAVE_COLUMNS
        );
        let rows = sqlx::query_as::<_, LeaveRequest>(&query)
            .bind(emp_id)
            .fetch_all(db)
            .await?;
        Ok(rows)
    }

    async fn list(
        &self,
        db: &PgPool,
        filters: &LeaveListFilters,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<LeaveRequest>, i64), AppError> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {} FROM leave_requests", LEAVE_COLUMNS));
        apply_leave_filters(&mut builder, filters);
        builder
            .push(" ORDER BY created_at DESC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);
        let rows = builder
            .build_query_as::<LeaveRequest>()
            .fetch_all(db)
            .await?;

        let mut count_builder: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM leave_requests");
        apply_leave_filters(&mut count_builder, filters);
        let total = count_builder
            .build_query_scalar::<i64>()
            .fetch_one(db)
            .await?;

        Ok((rows, total))
    }

    async fn delete_pending(
        &self,
        db: &PgPool,
        id: LeaveRequestId,
        emp_id: &str,
    ) -> Result<LeaveDeleteOutcome, AppError> {
        let deleted = sqlx::query(
            "DELETE FROM leave_requests WHERE id = $1 AND emp_id = $2 AND status = 'pending'",
        )
        .bind(id)
        .bind(emp_id)
        .execute(db)
        .await?
        .rows_affected();
        if deleted > 0 {
            return Ok(LeaveDeleteOutcome::Deleted);
        }

        let still_there = sqlx::query_scalar::<_, i32>(
            "SELECT 1 FROM leave_requests WHERE id = $1 AND emp_id = $2",
        )
        .bind(id)
        .bind(emp_id)
        .fetch_optional(db)
        .await?
        .is_some();

        Ok(if still_there {
            LeaveDeleteOutcome::NotPending
        } else {
            LeaveDeleteOutcome::NotFound
        })
    }

    async fn update_status(
        &self,
        db: &PgPool,
        id: LeaveRequestId,
        next: LeaveStatus,
        decided_by: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<LeaveRequest, AppError> {
        let mut tx = begin_transaction(db).await?;
        lock_and_check_transition(
            tx.as_mut(),
            "leave_requests",
            &id.to_string(),
            next,
            "Leave request not found",
        )
        .await?;

        let query = format!(
            "UPDATE leave_requests SET status = $1, decided_by = $2, decided_at = $3, \
             updated_at = $3 WHERE id = $4 RETURNING {}",
            LEAVE_COLUMNS
        );
        let row = sqlx::query_as::<_, LeaveRequest>(&query)
            .bind(next.db_value())
            .bind(decided_by)
            .bind(timestamp)
            .bind(id)
            .fetch_one(tx.as_mut())
            .await?;
        commit_transaction(tx).await?;
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_render_where_clause_in_order() {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("SELECT 1 FROM leave_requests");
        apply_leave_filters(
            &mut builder,
            &LeaveListFilters {
                status: Some(LeaveStatus::Pending),
                emp_id: Some("E-1".into()),
            },
        );
        assert_eq!(
            builder.sql(),
            "SELECT 1 FROM leave_requests WHERE status = $1 AND emp_id = $2"
        );
    }

    #[test]
    fn mock_leave_request_repository_is_send_sync() {
        fn check_send_sync<T: Send + Sync>() {}
        check_send_sync::<MockLeaveRequestRepositoryTrait>();
    }
}
