use axum::{
    extract::{Extension, Path, State},
    Json,
};
use serde_json::{json, Value};
use validator::Validate;

use crate::{
    error::AppError,
    handlers::common::parse_id,
    models::{
        employee::Employee,
        leave_request::{
            summarize_leaves, validate_leave_window, CreateLeaveRequest, LeaveRequest,
            LeaveTypeSummary,
        },
    },
    repositories::leave_request::{
        LeaveDeleteOutcome, LeaveRequestRepository, LeaveRequestRepositoryTrait,
    },
    state::AppState,
    types::LeaveRequestId,
};

pub async fn create_leave(
    State(state): State<AppState>,
    Extension(employee): Extension<Employee>,
    Json(payload): Json<CreateLeaveRequest>,
) -> Result<Json<LeaveRequest>, AppError> {
    payload.validate()?;
    validate_leave_window(
        payload.date_from,
        payload.date_to,
        payload.time_from,
        payload.time_to,
    )
    .map_err(|msg| AppError::BadRequest(msg.into()))?;

    let leave = LeaveRequest::new(employee.emp_id.clone(), payload);
    let created = LeaveRequestRepository::new()
        .create(&state.pool, &leave)
        .await?;
    tracing::info!(
        leave_id = %created.id,
        emp_id = %created.emp_id,
        leave_type = created.leave_type.db_value(),
        "leave request submitted"
    );
    Ok(Json(created))
}

pub async fn my_leaves(
    State(state): State<AppState>,
    Extension(employee): Extension<Employee>,
) -> Result<Json<Vec<LeaveRequest>>, AppError> {
    let leaves = LeaveRequestRepository::new()
        .find_by_employee(&state.pool, &employee.emp_id)
        .await?;
    Ok(Json(leaves))
}

/// Per leave type totals. An employee with no leaves gets an empty list.
pub async fn my_leave_analysis(
    State(state): State<AppState>,
    Extension(employee): Extension<Employee>,
) -> Result<Json<Vec<LeaveTypeSummary>>, AppError> {
    let leaves = LeaveRequestRepository::new()
        .find_by_employee(&state.pool, &employee.emp_id)
        .await?;
    Ok(Json(summarize_leaves(&leaves)))
}

pub async fn delete_leave(
    State(state): State<AppState>,
    Extension(employee): Extension<Employee>,
    Path(leave_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let id: LeaveRequestId = parse_id(&leave_id, "leave request")?;
    match LeaveRequestRepository::new()
        .delete_pending(&state.pool, id, &employee.emp_id)
        .await?
    {
        LeaveDeleteOutcome::Deleted => {
            tracing::info!(leave_id = %id, emp_id = %employee.emp_id, "leave request deleted");
            Ok(Json(json!({"message": "Leave request deleted", "id": id})))
        }
        LeaveDeleteOutcome::NotFound => Err(AppError::NotFound("Leave request not found".into())),
        LeaveDeleteOutcome::NotPending => Err(AppError::Conflict(
            "Only pending leave requests can be deleted".into(),
        )),
    }
}
