//! Medical claim repository and the organisation-wide claim cap.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::error::AppError;
use crate::models::medical_claim::{AcceptedClaim, ClaimLimit, ClaimStatus, MedicalClaim};
use crate::models::workflow::WorkflowStatus;
use crate::repositories::common::lock_and_check_transition;
use crate::repositories::transaction::{begin_transaction, commit_transaction};
use crate::types::MedicalClaimId;

const CLAIM_COLUMNS: &str =
    "id, emp_id, amount, attachments, status, decided_by, decided_at, created_at, updated_at";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MedicalClaimRepositoryTrait: Send + Sync {
    async fn create(&self, db: &PgPool, claim: &MedicalClaim) -> Result<MedicalClaim, AppError>;

    async fn find_by_employee(&self, db: &PgPool, emp_id: &str)
        -> Result<Vec<MedicalClaim>, AppError>;

    async fn list_pending(&self, db: &PgPool) -> Result<Vec<MedicalClaim>, AppError>;

    async fn update_status(
        &self,
        db: &PgPool,
        id: MedicalClaimId,
        next: ClaimStatus,
        decided_by: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<MedicalClaim, AppError>;

    async fn get_limit(&self, db: &PgPool) -> Result<Option<ClaimLimit>, AppError>;

    async fn upsert_limit(
        &self,
        db: &PgPool,
        max_amount: f64,
        updated_by: &str,
    ) -> Result<ClaimLimit, AppError>;

    /// Sum of accepted claim amounts for one employee.
    async fn total_accepted_for(&self, db: &PgPool, emp_id: &str) -> Result<f64, AppError>;

    /// Every accepted claim with the claimant's name, newest first.
    async fn list_accepted(&self, db: &PgPool) -> Result<Vec<AcceptedClaim>, AppError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct MedicalClaimRepository;

impl MedicalClaimRepository {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl MedicalClaimRepositoryTrait for MedicalClaimRepository {
    async fn create(&self, db: &PgPool, claim: &MedicalClaim) -> Result<MedicalClaim, AppError> {
        let query = format!(
            "INSERT INTO medical_claims ({cols}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING {cols}",
            cols = CLAIM_COLUMNS
        );
        let row = sqlx::query_as::<_, MedicalClaim>(&query)
            .bind(claim.id)
            .bind(&claim.emp_id)
            .bind(claim.amount)
            .bind(&claim.attachments)
            .bind(claim.status.db_value())
            .bind(&claim.decided_by)
            .bind(claim.decided_at)
            .bind(claim.created_at)
            .bind(claim.updated_at)
            .fetch_one(db)
            .await?;
        Ok(row)
    }

    async fn find_by_employee(
        &self,
        db: &PgPool,
        emp_id: &str,
    ) -> Result<Vec<MedicalClaim>, AppError> {
        let query = format!(
            "SELECT {} FROM medical_claims WHERE emp_id = $1 ORDER BY created_at DESC",
            CLAIM_COLUMNS
        );
        let rows = sqlx::query_as::<_, MedicalClaim>(&query)
            .bind(emp_id)
            .fetch_all(db)
            .await?;
        Ok(rows)
    }

    async fn list_pending(&self, db: &PgPool) -> Result<Vec<MedicalClaim>, AppError> {
        let query = format!(
            "SELECT {} FROM medical_claims WHERE status = 'pending' ORDER BY created_at",
            CLAIM_COLUMNS
        );
        let rows = sqlx::query_as::<_, MedicalClaim>(&query)
            .fetch_all(db)
            .await?;
        Ok(rows)
    }

    async fn update_status(
        &self,
        db: &PgPool,
        id: MedicalClaimId,
        next: ClaimStatus,
        decided_by: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<MedicalClaim, AppError> {
        let mut tx = begin_transaction(db).await?;
        lock_and_check_transition(
            tx.as_mut(),
            "medical_claims",
            &id.to_string(),
            next,
            "Medical claim not found",
        )
        .await?;

        let query = format!(
            "UPDATE medical_claims SET status = $1, decided_by = $2, decided_at = $3, \
             updated_at = $3 WHERE id = $4 RETURNING {}",
            CLAIM_COLUMNS
        );
        let row = sqlx::query_as::<_, MedicalClaim>(&query)
            .bind(next.db_value())
            .bind(decided_by)
            .bind(timestamp)
            .bind(id)
            .fetch_one(tx.as_mut())
            .await?;
        commit_transaction(tx).await?;
        Ok(row)
    }

    async fn get_limit(&self, db: &PgPool) -> Result<Option<ClaimLimit>, AppError> {
        let row = sqlx::query_as::<_, ClaimLimit>(
            "SELECT max_amount, updated_by, updated_at FROM medical_claim_limits WHERE id = 1",
        )
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    async fn upsert_limit(
        &self,
        db: &PgPool,
        max_amount: f64,
        updated_by: &str,
    ) -> Result<ClaimLimit, AppError> {
        let row = sqlx::query_as::<_, ClaimLimit>(
            "INSERT INTO medical_claim_limits (id, max_amount, updated_by, updated_at) \
             VALUES (1, $1, $2, $3) \
             ON CONFLICT (id) DO UPDATE SET max_amount = EXCLUDED.max_amount, \
             updated_by = EXCLUDED.updated_by, updated_at = EXCLUDED.updated_at \
             RETURNING max_amount, updated_by, updated_at",
        )
        .bind(max_amount)
        .bind(updated_by)
        .bind(Utc::now())
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    async fn total_accepted_for(&self, db: &PgPool, emp_id: &str) -> Result<f64, AppError> {
        let total = sqlx::query_scalar::<_, f64>(
            "SELECT COALESCE(SUM(amount), 0)::DOUBLE PRECISION FROM medical_claims \
             WHERE emp_id = $1 AND status = 'accepted'",
        )
        .bind(emp_id)
        .fetch_one(db)
        .await?;
        Ok(total)
    }

    async fn list_accepted(&self, db: &PgPool) -> Result<Vec<AcceptedClaim>, AppError> {
        let rows = sqlx::query_as::<_, AcceptedClaim>(
            "SELECT c.id, c.emp_id, e.full_name AS employee_name, c.amount, \
             c.created_at, c.decided_at \
             FROM medical_claims c JOIN employees e ON e.emp_id = c.emp_id \
             WHERE c.status = 'accepted' \
             ORDER BY c.created_at DESC, c.id",
        )
        .fetch_all(db)
        .await?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_medical_claim_repository_is_send_sync() {
        fn check_send_sync<T: Send + Sync>() {}
        check_send_sync::<MockMedicalClaimRepositoryTrait>();
    }
}
