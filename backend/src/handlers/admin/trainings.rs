use axum::{
    extract::{Extension, Path, Query, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::{
    error::AppError,
    handlers::common::{normalize_filter, parse_id},
    models::{
        employee::Employee,
        training::{
            AllocateTraining, CreateTraining, ReminderFlagPayload, Training, TrainingAllocation,
            TrainingAllocationView, TrainingStatus,
        },
        workflow::parse_status,
        PaginatedResponse, PaginationQuery, StatusChange,
    },
    repositories::{
        employee::{EmployeeRepository, EmployeeRepositoryTrait},
        training::{TrainingRepository, TrainingRepositoryTrait},
    },
    state::AppState,
    types::{TrainingAllocationId, TrainingId},
};

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct TrainingAllocationListQuery {
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

pub async fn create_training(
    State(state): State<AppState>,
    Json(payload): Json<CreateTraining>,
) -> Result<Json<Training>, AppError> {
    payload.validate()?;
    let training = Training::new(
        payload.name.trim().to_string(),
        payload.weight,
        payload.duration_days,
    );
    let created = TrainingRepository::new()
        .create(&state.pool, &training)
        .await?;
    Ok(Json(created))
}

pub async fn allocate_training(
    State(state): State<AppState>,
    Extension(approver): Extension<Employee>,
    Path(training_id): Path<String>,
    Json(payload): Json<AllocateTraining>,
) -> Result<Json<TrainingAllocation>, AppError> {
    payload.validate()?;
    let id: TrainingId = parse_id(&training_id, "training")?;
    let repo = TrainingRepository::new();
    repo.find_by_id(&state.pool, id).await?;
    let emp_id = payload.emp_id.trim();
    if !EmployeeRepository::new().exists(&state.pool, emp_id).await? {
        return Err(AppError::NotFound("Employee not found".into()));
    }

    let allocation = TrainingAllocation::new(
        id,
        emp_id.to_string(),
        payload.finish_by,
        approver.emp_id.clone(),
    );
    let created = repo.allocate(&state.pool, &allocation).await?;
    tracing::info!(
        allocation_id = %created.id,
        training_id = %id,
        emp_id = %created.emp_id,
        finish_by = %created.finish_by,
        "training allocated"
    );
    Ok(Json(created))
}

pub async fn list_training_allocations(
    State(state): State<AppState>,
    Query(query): Query<TrainingAllocationListQuery>,
) -> Result<Json<PaginatedResponse<TrainingAllocationView>>, AppError> {
    let status = normalize_filter(query.status.as_deref())
        .map(parse_status::<TrainingStatus>)
        .transpose()?;
    let pagination = PaginationQuery::from_parts(query.limit, query.offset);
    let (limit, offset) = (pagination.limit(), pagination.offset());
    let (items, total) = TrainingRepository::new()
        .list_allocations(&state.pool, status, limit, offset)
        .await?;
    Ok(Json(PaginatedResponse::new(items, total, limit, offset)))
}

pub async fn update_training_status(
    State(state): State<AppState>,
    Path(allocation_id): Path<String>,
    Json(body): Json<StatusChange>,
) -> Result<Json<TrainingAllocation>, AppError> {
    let id: TrainingAllocationId = parse_id(&allocation_id, "training allocation")?;
    let next: TrainingStatus = parse_status(&body.status)?;
    let updated = TrainingRepository::new()
        .update_status(&state.pool, id, next, Utc::now())
        .await?;
    Ok(Json(updated))
}

pub async fn set_training_reminder(
    State(state): State<AppState>,
    Path(allocation_id): Path<String>,
    Json(payload): Json<ReminderFlagPayload>,
) -> Result<Json<TrainingAllocation>, AppError> {
    let id: TrainingAllocationId = parse_id(&allocation_id, "training allocation")?;
    let updated = TrainingRepository::new()
        .set_reminder(&state.pool, id, payload.reminder)
        .await?;
    Ok(Json(updated))
}
