//! Stock-changing resource operations.
//!
//! Every operation here locks the resource row first, so concurrent
//! allocations against the same resource are serialised and
//! `available_quantity` never drops below zero.

use chrono::{NaiveDate, Utc};
use sqlx::PgPool;
use thiserror::Error;

use crate::error::AppError;
use crate::models::resource::{
    AllocationStatus, Resource, ResourceAllocation, ReturnOutcome,
};
use crate::models::workflow::WorkflowStatus;
use crate::repositories::resource as resource_repo;
use crate::repositories::transaction::{begin_transaction, commit_transaction, rollback_transaction};
use crate::types::{ResourceAllocationId, ResourceId};

#[derive(Debug, Error)]
pub enum AllocationError {
    #[error("Resource not found")]
    ResourceNotFound,
    #[error("Allocation not found")]
    AllocationNotFound,
    #[error("Employee not found")]
    EmployeeNotFound,
    #[error("Requested {requested} but only {available} available")]
    InsufficientQuantity { requested: i32, available: i32 },
    #[error("Total {requested} is below the {outstanding} units currently allocated")]
    BelowOutstanding { requested: i32, outstanding: i32 },
    #[error("Allocation has already been returned")]
    AlreadyReturned,
    #[error(transparent)]
    App(#[from] AppError),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl From<AllocationError> for AppError {
    fn from(err: AllocationError) -> Self {
        match err {
            AllocationError::ResourceNotFound
            | AllocationError::AllocationNotFound
            | AllocationError::EmployeeNotFound => AppError::NotFound(err.to_string()),
            AllocationError::InsufficientQuantity { .. }
            | AllocationError::BelowOutstanding { .. }
            | AllocationError::AlreadyReturned => AppError::Conflict(err.to_string()),
            AllocationError::App(inner) => inner,
            AllocationError::Database(inner) => AppError::from(inner),
        }
    }
}

#[derive(Clone)]
pub struct AllocationService {
    pool: PgPool,
}

impl AllocationService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Hands `quantity` units of the resource to `emp_id`.
    pub async fn allocate(
        &self,
        resource_id: ResourceId,
        emp_id: &str,
        quantity: i32,
        due_on: NaiveDate,
        allocated_by: &str,
    ) -> Result<(ResourceAllocation, Resource), AllocationError> {
        if !self.employee_exists(emp_id).await? {
            return Err(AllocationError::EmployeeNotFound);
        }

        let mut tx = begin_transaction(&self.pool).await?;
        let Some(resource) = resource_repo::lock_resource(tx.as_mut(), resource_id).await? else {
            rollback_transaction(tx).await?;
            return Err(AllocationError::ResourceNotFound);
        };
        if resource.available_quantity < quantity {
            rollback_transaction(tx).await?;
            return Err(AllocationError::InsufficientQuantity {
                requested: quantity,
                available: resource.available_quantity,
            });
        }

        let now = Utc::now();
        let updated = resource_repo::update_stock(
            tx.as_mut(),
            resource_id,
            resource.total_quantity,
            resource.available_quantity - quantity,
            now,
        )
        .await?;
        let allocation = ResourceAllocation::new(
            resource_id,
            emp_id.to_string(),
            quantity,
            due_on,
            allocated_by.to_string(),
        );
        let allocation = resource_repo::insert_allocation(tx.as_mut(), &allocation).await?;
        commit_transaction(tx).await?;

        tracing::info!(
            resource_id = %resource_id,
            emp_id = %emp_id,
            quantity,
            due_on = %due_on,
            available = updated.available_quantity,
            "resource allocated"
        );
        Ok((allocation, updated))
    }

    /// Marks the allocation returned and puts its units back in stock.
    pub async fn return_allocation(
        &self,
        id: ResourceAllocationId,
    ) -> Result<ReturnOutcome, AllocationError> {
        let mut tx = begin_transaction(&self.pool).await?;
        let Some(allocation) = resource_repo::lock_allocation(tx.as_mut(), id).await? else {
            rollback_transaction(tx).await?;
            return Err(AllocationError::AllocationNotFound);
        };
        if !allocation.status.can_transition_to(AllocationStatus::Returned) {
            rollback_transaction(tx).await?;
            return Err(AllocationError::AlreadyReturned);
        }
        let Some(resource) =
            resource_repo::lock_resource(tx.as_mut(), allocation.resource_id).await?
        else {
            rollback_transaction(tx).await?;
            return Err(AllocationError::ResourceNotFound);
        };

        let now = Utc::now();
        let restored = (resource.available_quantity + allocation.quantity).min(resource.total_quantity);
        let updated = resource_repo::update_stock(
            tx.as_mut(),
            resource.id,
            resource.total_quantity,
            restored,
            now,
        )
        .await?;
        let returned = resource_repo::mark_returned(tx.as_mut(), id, now).await?;
        commit_transaction(tx).await?;

        tracing::info!(
            allocation_id = %id,
            resource_id = %resource.id,
            available = updated.available_quantity,
            "allocation returned"
        );
        Ok(ReturnOutcome {
            allocation: returned,
            previous_available: resource.available_quantity,
            available_quantity: updated.available_quantity,
        })
    }

    /// Sets a new stock level, keeping every outstanding unit accounted for.
    pub async fn set_total_quantity(
        &self,
        id: ResourceId,
        total_quantity: i32,
    ) -> Result<Resource, AllocationError> {
        let mut tx = begin_transaction(&self.pool).await?;
        let Some(resource) = resource_repo::lock_resource(tx.as_mut(), id).await? else {
            rollback_transaction(tx).await?;
            return Err(AllocationError::ResourceNotFound);
        };
        let outstanding = resource.outstanding();
        if total_quantity < outstanding {
            rollback_transaction(tx).await?;
            return Err(AllocationError::BelowOutstanding {
                requested: total_quantity,
                outstanding,
            });
        }

        let updated = resource_repo::update_stock(
            tx.as_mut(),
            id,
            total_quantity,
            total_quantity - outstanding,
            Utc::now(),
        )
        .await?;
        commit_transaction(tx).await?;
        Ok(updated)
    }
}

impl AllocationService {
    async fn employee_exists(&self, emp_id: &str) -> Result<bool, AllocationError> {
        let exists = sqlx::query_scalar::<_, i32>("SELECT 1 FROM employees WHERE emp_id = $1")
            .bind(emp_id)
            .fetch_optional(&self.pool)
            .await?
            .is_some();
        Ok(exists)
    }
}
