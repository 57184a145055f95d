use axum::{
    extract::{Extension, State},
    Json,
};
use validator::Validate;

use crate::{
    error::AppError,
    models::{
        employee::Employee,
        medical_claim::{ClaimSummary, CreateMedicalClaim, MedicalClaim},
    },
    repositories::medical_claim::{MedicalClaimRepository, MedicalClaimRepositoryTrait},
    state::AppState,
};

pub async fn create_medical_claim(
    State(state): State<AppState>,
    Extension(employee): Extension<Employee>,
    Json(payload): Json<CreateMedicalClaim>,
) -> Result<Json<MedicalClaim>, AppError> {
    payload.validate()?;
    let attachments = payload
        .attachments
        .into_iter()
        .map(|url| url.trim().to_string())
        .collect();
    let claim = MedicalClaim::new(employee.emp_id.clone(), payload.amount, attachments);
    let created = MedicalClaimRepository::new()
        .create(&state.pool, &claim)
        .await?;
    tracing::info!(
        claim_id = %created.id,
        emp_id = %created.emp_id,
        amount = created.amount,
        attachments = created.attachments.len(),
        "medical claim submitted"
    );
    Ok(Json(created))
}

pub async fn my_medical_claims(
    State(state): State<AppState>,
    Extension(employee): Extension<Employee>,
) -> Result<Json<Vec<MedicalClaim>>, AppError> {
    let claims = MedicalClaimRepository::new()
        .find_by_employee(&state.pool, &employee.emp_id)
        .await?;
    Ok(Json(claims))
}

/// Cap and accepted spend for the caller. The cap is informational.
pub async fn my_claim_summary(
    State(state): State<AppState>,
    Extension(employee): Extension<Employee>,
) -> Result<Json<ClaimSummary>, AppError> {
    let repo = MedicalClaimRepository::new();
    let limit = repo.get_limit(&state.pool).await?;
    let total_spent = repo
        .total_accepted_for(&state.pool, &employee.emp_id)
        .await?;
    Ok(Json(ClaimSummary::new(
        limit.map(|l| l.max_amount),
        total_spent,
    )))
}
