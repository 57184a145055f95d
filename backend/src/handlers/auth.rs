use axum::{
    extract::{Extension, State},
    Json,
};
use validator::Validate;

use crate::{
    error::AppError,
    models::employee::{Employee, EmployeeResponse, LoginRequest, LoginResponse},
    repositories::employee::{EmployeeRepository, EmployeeRepositoryTrait},
    state::AppState,
    utils::{jwt::create_access_token, password::verify_password},
};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    payload.validate()?;

    let repo = EmployeeRepository::new();
    let employee = repo
        .find_by_email(&state.pool, &payload.email)
        .await?
        .ok_or_else(|| AppError::Unauthorized(INVALID_CREDENTIALS.into()))?;

    let matches = verify_password(&payload.password, &employee.password_hash)
        .map_err(AppError::InternalServerError)?;
    if !matches {
        tracing::warn!(emp_id = %employee.emp_id, "login failed: bad password");
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
    }

    let access_token = create_access_token(
        employee.emp_id.clone(),
        employee.email.clone(),
        employee.role.as_str().to_string(),
        &state.config.jwt_secret,
        state.config.jwt_expiration_hours,
    )
    .map_err(AppError::InternalServerError)?;

    tracing::info!(emp_id = %employee.emp_id, role = employee.role.as_str(), "login succeeded");
    Ok(Json(LoginResponse {
        access_token,
        token_type: "Bearer".to_string(),
        expires_in: state.config.jwt_expiration_hours * 3600,
        employee: EmployeeResponse::from(employee),
    }))
}

pub async fn me(Extension(employee): Extension<Employee>) -> Json<EmployeeResponse> {
    Json(EmployeeResponse::from(employee))
}
