use axum::{
    extract::{Extension, Path, State},
    Json,
};
use chrono::Utc;
use validator::Validate;

use crate::{
    error::AppError,
    handlers::common::parse_id,
    models::{
        employee::Employee,
        medical_claim::{ClaimLimit, ClaimOverview, ClaimStatus, MedicalClaim, UpdateClaimLimit},
        workflow::parse_status,
        StatusChange,
    },
    repositories::medical_claim::{MedicalClaimRepository, MedicalClaimRepositoryTrait},
    state::AppState,
    types::MedicalClaimId,
};

pub async fn list_pending_claims(
    State(state): State<AppState>,
) -> Result<Json<Vec<MedicalClaim>>, AppError> {
    let claims = MedicalClaimRepository::new()
        .list_pending(&state.pool)
        .await?;
    Ok(Json(claims))
}

pub async fn update_claim_status(
    State(state): State<AppState>,
    Extension(approver): Extension<Employee>,
    Path(claim_id): Path<String>,
    Json(body): Json<StatusChange>,
) -> Result<Json<MedicalClaim>, AppError> {
    let id: MedicalClaimId = parse_id(&claim_id, "medical claim")?;
    let next: ClaimStatus = parse_status(&body.status)?;
    let updated = MedicalClaimRepository::new()
        .update_status(&state.pool, id, next, &approver.emp_id, Utc::now())
        .await?;
    Ok(Json(updated))
}

pub async fn set_claim_limit(
    State(state): State<AppState>,
    Extension(approver): Extension<Employee>,
    Json(payload): Json<UpdateClaimLimit>,
) -> Result<Json<ClaimLimit>, AppError> {
    payload.validate()?;
    let limit = MedicalClaimRepository::new()
        .upsert_limit(&state.pool, payload.max_amount, &approver.emp_id)
        .await?;
    tracing::info!(
        max_amount = limit.max_amount,
        updated_by = %approver.emp_id,
        "medical claim limit updated"
    );
    Ok(Json(limit))
}

pub async fn claim_overview(
    State(state): State<AppState>,
) -> Result<Json<ClaimOverview>, AppError> {
    let repo = MedicalClaimRepository::new();
    let limit = repo.get_limit(&state.pool).await?;
    let claims = repo.list_accepted(&state.pool).await?;
    Ok(Json(ClaimOverview::new(limit.map(|l| l.max_amount), claims)))
}
