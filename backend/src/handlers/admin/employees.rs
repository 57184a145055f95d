use axum::{
    extract::{Extension, Query, State},
    Json,
};
use validator::Validate;

use crate::{
    error::AppError,
    models::{
        employee::{CreateEmployee, Employee, EmployeeResponse},
        PaginatedResponse, PaginationQuery,
    },
    repositories::employee::{EmployeeRepository, EmployeeRepositoryTrait},
    state::AppState,
    utils::password::hash_password,
};

pub async fn create_employee(
    State(state): State<AppState>,
    Extension(approver): Extension<Employee>,
    Json(payload): Json<CreateEmployee>,
) -> Result<Json<EmployeeResponse>, AppError> {
    payload.validate()?;

    let repo = EmployeeRepository::new();
    if let Some(supervisor_id) = payload.supervisor_id.as_deref() {
        if !repo.exists(&state.pool, supervisor_id).await? {
            return Err(AppError::BadRequest("Supervisor not found".into()));
        }
    }
    if repo.exists(&state.pool, payload.emp_id.trim()).await? {
        return Err(AppError::Conflict("Employee ID already registered".into()));
    }

    let password_hash = hash_password(&payload.password).map_err(AppError::InternalServerError)?;
    let mut employee = Employee::new(
        payload.emp_id.trim().to_string(),
        payload.email.trim().to_ascii_lowercase(),
        password_hash,
        payload.full_name.trim().to_string(),
        payload.role,
    );
    employee.department = payload.department;
    employee.designation = payload.designation;
    employee.supervisor_id = payload.supervisor_id;

    let created = repo.create(&state.pool, &employee).await?;
    tracing::info!(
        emp_id = %created.emp_id,
        role = created.role.as_str(),
        created_by = %approver.emp_id,
        "employee credentials created"
    );
    Ok(Json(EmployeeResponse::from(created)))
}

pub async fn list_employees(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<PaginatedResponse<EmployeeResponse>>, AppError> {
    let repo = EmployeeRepository::new();
    let (limit, offset) = (pagination.limit(), pagination.offset());
    let employees = repo.list(&state.pool, limit, offset).await?;
    let total = repo.count(&state.pool).await?;
    Ok(Json(PaginatedResponse::new(
        employees.into_iter().map(EmployeeResponse::from).collect(),
        total,
        limit,
        offset,
    )))
}
