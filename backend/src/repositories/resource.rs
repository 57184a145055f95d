//! Resource stock and allocation repository.
//!
//! Stock changes go through the connection-level functions at the bottom of
//! this module so the allocation service can run them inside one transaction
//! with the resource row locked.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};

use crate::error::AppError;
use crate::models::resource::{AllocationStatus, AllocationView, Resource, ResourceAllocation};
use crate::models::workflow::WorkflowStatus;
use crate::types::{ResourceAllocationId, ResourceId};

const RESOURCE_COLUMNS: &str =
    "id, name, kind, total_quantity, available_quantity, created_at, updated_at";

const ALLOCATION_COLUMNS: &str = "id, resource_id, emp_id, quantity, status, due_on, alert, \
     allocated_by, returned_at, created_at, updated_at";

const ALLOCATION_VIEW_SELECT: &str = "SELECT a.id, a.resource_id, r.name AS resource_name, \
     r.kind AS resource_kind, a.emp_id, e.full_name AS employee_name, a.quantity, a.status, \
     a.due_on, a.alert, a.returned_at, a.created_at \
     FROM resource_allocations a \
     JOIN resources r ON r.id = a.resource_id \
     JOIN employees e ON e.emp_id = a.emp_id";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResourceRepositoryTrait: Send + Sync {
    async fn create(&self, db: &PgPool, resource: &Resource) -> Result<Resource, AppError>;

    async fn list(&self, db: &PgPool) -> Result<Vec<Resource>, AppError>;

    async fn find_by_id(&self, db: &PgPool, id: ResourceId) -> Result<Resource, AppError>;

    /// Allocations in `status`, or every allocation when `status` is `None`.
    async fn list_allocations(
        &self,
        db: &PgPool,
        status: Option<AllocationStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<AllocationView>, i64), AppError>;

    async fn list_allocations_for_employee(
        &self,
        db: &PgPool,
        emp_id: &str,
    ) -> Result<Vec<AllocationView>, AppError>;

    async fn set_alert(
        &self,
        db: &PgPool,
        id: ResourceAllocationId,
        alert: bool,
    ) -> Result<ResourceAllocation, AppError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ResourceRepository;

impl ResourceRepository {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ResourceRepositoryTrait for ResourceRepository {
    async fn create(&self, db: &PgPool, resource: &Resource) -> Result<Resource, AppError> {
        let query = format!(
            "INSERT INTO resources ({cols}) VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {cols}",
            cols = RESOURCE_COLUMNS
        );
        let row = sqlx::query_as::<_, Resource>(&query)
            .bind(resource.id)
            .bind(&resource.name)
            .bind(&resource.kind)
            .bind(resource.total_quantity)
            .bind(resource.available_quantity)
            .bind(resource.created_at)
            .bind(resource.updated_at)
            .fetch_one(db)
            .await?;
        Ok(row)
    }

    async fn list(&self, db: &PgPool) -> Result<Vec<Resource>, AppError> {
        let query = format!("SELECT {} FROM resources ORDER BY name", RESOURCE_COLUMNS);
        let rows = sqlx::query_as::<_, Resource>(&query).fetch_all(db).await?;
        Ok(rows)
    }

    async fn find_by_id(&self, db: &PgPool, id: ResourceId) -> Result<Resource, AppError> {
        let query = format!("SELECT {} FROM resources WHERE id = $1", RESOURCE_COLUMNS);
        sqlx::query_as::<_, Resource>(&query)
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::NotFound("Resource not found".into()))
    }

    async fn list_allocations(
        &self,
        db: &PgPool,
        status: Option<AllocationStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<AllocationView>, i64), AppError> {
        let status = status.map(|s| s.db_value());
        let query = format!(
            "{} WHERE ($1::TEXT IS NULL OR a.status = $1) \
             ORDER BY a.created_at DESC LIMIT $2 OFFSET $3",
            ALLOCATION_VIEW_SELECT
        );
        let rows = sqlx::query_as::<_, AllocationView>(&query)
            .bind(status)
            .bind(limit)
            .bind(offset)
            .fetch_all(db)
            .await?;
        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM resource_allocations WHERE ($1::TEXT IS NULL OR status = $1)",
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
    ) -> Result<Vec<AllocationView>, AppError> {
        let query = format!(
            "{} WHERE a.emp_id = $1 ORDER BY a.created_at DESC",
            ALLOCATION_VIEW_SELECT
        );
        let rows = sqlx::query_as::<_, AllocationView>(&query)
            .bind(emp_id)
            .fetch_all(db)
            .await?;
        Ok(rows)
    }

    async fn set_alert(
        &self,
        db: &PgPool,
        id: ResourceAllocationId,
        alert: bool,
    ) -> Result<ResourceAllocation, AppError> {
        let query = format!(
            "UPDATE resource_allocations SET alert = $1, updated_at = $2 WHERE id = $3 \
             RETURNING {}",
            ALLOCATION_COLUMNS
        );
        sqlx::query_as::<_, ResourceAllocation>(&query)
            .bind(alert)
            .bind(Utc::now())
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::NotFound("Allocation not found".into()))
    }
}

/// Loads the resource row and holds its lock until the transaction ends.
pub async fn lock_resource(
    conn: &mut PgConnection,
    id: ResourceId,
) -> Result<Option<Resource>, sqlx::Error> {
    let query = format!(
        "SELECT {} FROM resources WHERE id = $1 FOR UPDATE",
        RESOURCE_COLUMNS
    );
    sqlx::query_as::<_, Resource>(&query)
        .bind(id)
        .fetch_optional(conn)
        .await
}

pub async fn update_stock(
    conn: &mut PgConnection,
    id: ResourceId,
    total_quantity: i32,
    available_quantity: i32,
    now: DateTime<Utc>,
) -> Result<Resource, sqlx::Error> {
    let query = format!(
        "UPDATE resources SET total_quantity = $1, available_quantity = $2, updated_at = $3 \
         WHERE id = $4 RETURNING {}",
        RESOURCE_COLUMNS
    );
    sqlx::query_as::<_, Resource>(&query)
        .bind(total_quantity)
        .bind(available_quantity)
        .bind(now)
        .bind(id)
        .fetch_one(conn)
        .await
}

pub async fn insert_allocation(
    conn: &mut PgConnection,
    allocation: &ResourceAllocation,
) -> Result<ResourceAllocation, sqlx::Error> {
    let query = format!(
        "INSERT INTO resource_allocations ({cols}) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) RETURNING {cols}",
        cols = ALLOCATION_COLUMNS
    );
    sqlx::query_as::<_, ResourceAllocation>(&query)
        .bind(allocation.id)
        .bind(allocation.resource_id)
        .bind(&allocation.emp_id)
        .bind(allocation.quantity)
        .bind(allocation.status.db_value())
        .bind(allocation.due_on)
        .bind(allocation.alert)
        .bind(&allocation.allocated_by)
        .bind(allocation.returned_at)
        .bind(allocation.created_at)
        .bind(allocation.updated_at)
        .fetch_one(conn)
        .await
}

/// Loads the allocation row and holds its lock until the transaction ends.
pub async fn lock_allocation(
    conn: &mut PgConnection,
    id: ResourceAllocationId,
) -> Result<Option<ResourceAllocation>, sqlx::Error> {
    let query = format!(
        "SELECT {} FROM resource_allocations WHERE id = $1 FOR UPDATE",
        ALLOCATION_COLUMNS
    );
    sqlx::query_as::<_, ResourceAllocation>(&query)
        .bind(id)
        .fetch_optional(conn)
        .await
}

pub async fn mark_returned(
    conn: &mut PgConnection,
    id: ResourceAllocationId,
    now: DateTime<Utc>,
) -> Result<ResourceAllocation, sqlx::Error> {
    let query = format!(
        "UPDATE resource_allocations SET status = 'returned', alert = FALSE, returned_at = $1, \
         updated_at = $1 WHERE id = $2 RETURNING {}",
        ALLOCATION_COLUMNS
    );
    sqlx::query_as::<_, ResourceAllocation>(&query)
        .bind(now)
        .bind(id)
        .fetch_one(conn)
        .await
}
