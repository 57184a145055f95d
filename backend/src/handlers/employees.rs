use axum::{
    extract::{Extension, State},
    Json,
};

use crate::{
    error::AppError,
    models::employee::{Employee, EmployeeResponse},
    repositories::employee::{EmployeeRepository, EmployeeRepositoryTrait},
    state::AppState,
};

/// Employees who report to the caller.
pub async fn my_reports(
    State(state): State<AppState>,
    Extension(employee): Extension<Employee>,
) -> Result<Json<Vec<EmployeeResponse>>, AppError> {
    let reports = EmployeeRepository::new()
        .list_reports(&state.pool, &employee.emp_id)
        .await?;
    Ok(Json(
        reports.into_iter().map(EmployeeResponse::from).collect(),
    ))
}
