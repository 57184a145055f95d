use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::{
    error::AppError,
    handlers::attendance::list_attendance,
    models::attendance::{AttendanceRangeQuery, AttendanceResponse},
    repositories::employee::{EmployeeRepository, EmployeeRepositoryTrait},
    state::AppState,
};

pub async fn employee_attendance(
    State(state): State<AppState>,
    Path(emp_id): Path<String>,
    Query(query): Query<AttendanceRangeQuery>,
) -> Result<Json<Vec<AttendanceResponse>>, AppError> {
    if !EmployeeRepository::new().exists(&state.pool, &emp_id).await? {
        return Err(AppError::NotFound("Employee not found".into()));
    }
    list_attendance(&state, &emp_id, &query).await.map(Json)
}
