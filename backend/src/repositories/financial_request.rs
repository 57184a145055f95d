//! Loan and salary advance repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::error::AppError;
use crate::models::financial_request::{
    FinancialRequest, FinancialRequestType, FinancialStatus, UpdateFinancialRequest,
};
use crate::models::workflow::WorkflowStatus;
use crate::repositories::common::{lock_and_check_transition, push_clause};
use crate::repositories::transaction::{begin_transaction, commit_transaction};
use crate::types::FinancialRequestId;

const FINANCIAL_COLUMNS: &str = "id, emp_id, request_type, amount, reason, attachment_url, \
     status, decided_by, decided_at, created_at, updated_at";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FinancialRequestRepositoryTrait: Send + Sync {
    async fn create(
        &self,
        db: &PgPool,
        item: &FinancialRequest,
    ) -> Result<FinancialRequest, AppError>;

    async fn find_by_employee(
        &self,
        db: &PgPool,
        emp_id: &str,
        request_type: Option<FinancialRequestType>,
    ) -> Result<Vec<FinancialRequest>, AppError>;

    async fn list(
        &self,
        db: &PgPool,
        status: Option<FinancialStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<FinancialRequest>, i64), AppError>;

    /// Applies an owner's edit. Only pending requests can change.
    async fn update_pending(
        &self,
        db: &PgPool,
        id: FinancialRequestId,
        emp_id: &str,
        changes: UpdateFinancialRequest,
    ) -> Result<FinancialRequest, AppError>;

    async fn update_status(
        &self,
        db: &PgPool,
        id: FinancialRequestId,
        next: FinancialStatus,
        decided_by: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<FinancialRequest, AppError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FinancialRequestRepository;

impl FinancialRequestRepository {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FinancialRequestRepositoryTrait for FinancialRequestRepository {
    async fn create(
        &self,
        db: &PgPool,
        item: &FinancialRequest,
    ) -> Result<FinancialRequest, AppError> {
        let query = format!(
            "INSERT INTO financial_requests ({cols}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) RETURNING {cols}",
            cols = FINANCIAL_COLUMNS
        );
        let row = sqlx::query_as::<_, FinancialRequest>(&query)
            .bind(item.id)
            .bind(&item.emp_id)
            .bind(item.request_type.db_value())
            .bind(item.amount)
            .bind(&item.reason)
            .bind(&item.attachment_url)
            .bind(item.status.db_value())
            .bind(&item.decided_by)
            .bind(item.decided_at)
            .bind(item.created_at)
            .bind(item.updated_at)
            .fetch_one(db)
            .await?;
        Ok(row)
    }

    async fn find_by_employee(
        &self,
        db: &PgPool,
        emp_id: &str,
        request_type: Option<FinancialRequestType>,
    ) -> Result<Vec<FinancialRequest>, AppError> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(format!(
            "SELECT {} FROM financial_requests WHERE emp_id = ",
            FINANCIAL_COLUMNS
        ));
        builder.push_bind(emp_id.to_string());
        if let Some(request_type) = request_type {
            builder
                .push(" AND request_type = ")
                .push_bind(request_type.db_value());
        }
        builder.push(" ORDER BY created_at DESC");
        let rows = builder
            .build_query_as::<FinancialRequest>()
            .fetch_all(db)
            .await?;
        Ok(rows)
    }

    async fn list(
        &self,
        db: &PgPool,
        status: Option<FinancialStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<FinancialRequest>, i64), AppError> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {} FROM financial_requests", FINANCIAL_COLUMNS));
        let mut count_builder: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM financial_requests");
        if let Some(status) = status {
            let mut has_clause = false;
            push_clause(&mut builder, &mut has_clause);
            builder.push("status = ").push_bind(status.db_value());
            let mut has_clause = false;
            push_clause(&mut count_builder, &mut has_clause);
            count_builder.push("status = ").push_bind(status.db_value());
        }
        builder
            .push(" ORDER BY created_at DESC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);

        let rows = builder
            .build_query_as::<FinancialRequest>()
            .fetch_all(db)
            .await?;
        let total = count_builder
            .build_query_scalar::<i64>()
            .fetch_one(db)
            .await?;
        Ok((rows, total))
    }

    async fn update_pending(
        &self,
        db: &PgPool,
        id: FinancialRequestId,
        emp_id: &str,
        changes: UpdateFinancialRequest,
    ) -> Result<FinancialRequest, AppError> {
        let mut tx = begin_transaction(db).await?;
        let select = format!(
            "SELECT {} FROM financial_requests WHERE id = $1 AND emp_id = $2 FOR UPDATE",
            FINANCIAL_COLUMNS
        );
        let mut current = sqlx::query_as::<_, FinancialRequest>(&select)
            .bind(id)
            .bind(emp_id)
            .fetch_optional(tx.as_mut())
            .await?
            .ok_or_else(|| AppError::NotFound("Financial request not found".into()))?;
        if !current.is_pending() {
            return Err(AppError::Conflict(
                "Only pending requests can be edited".into(),
            ));
        }

        changes.apply_to(&mut current);
        let update = format!(
            "UPDATE financial_requests SET request_type = $1, amount = $2, reason = $3, \
             attachment_url = $4, updated_at = $5 WHERE id = $6 RETURNING {}",
            FINANCIAL_COLUMNS
        );
        let row = sqlx::query_as::<_, FinancialRequest>(&update)
            .bind(current.request_type.db_value())
            .bind(current.amount)
            .bind(&current.reason)
            .bind(&current.attachment_url)
            .bind(current.updated_at)
            .bind(id)
            .fetch_one(tx.as_mut())
            .await?;
        commit_transaction(tx).await?;
        Ok(row)
    }

    async fn update_status(
        &self,
        db: &PgPool,
        id: FinancialRequestId,
        next: FinancialStatus,
        decided_by: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<FinancialRequest, AppError> {
        let mut tx = begin_transaction(db).await?;
        lock_and_check_transition(
            tx.as_mut(),
            "financial_requests",
            &id.to_string(),
            next,
            "Financial request not found",
        )
        .await?;

        let query = format!(
            "UPDATE financial_requests SET status = $1, decided_by = $2, decided_at = $3, \
             updated_at = $3 WHERE id = $4 RETURNING {}",
            FINANCIAL_COLUMNS
        );
        let row = sqlx::query_as::<_, FinancialRequest>(&query)
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
    fn mock_financial_request_repository_is_send_sync() {
        fn check_send_sync<T: Send + Sync>() {}
        check_send_sync::<MockFinancialRequestRepositoryTrait>();
    }
}
