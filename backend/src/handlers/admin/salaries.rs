use axum::{
    extract::{Path, State},
    Json,
};
use validator::Validate;

use crate::{
    error::AppError,
    models::salary::{CreateSalary, Salary, SalaryResponse, UpdateDeductions, UpdateEarnings},
    repositories::{
        employee::{EmployeeRepository, EmployeeRepositoryTrait},
        salary::{AmountColumn, SalaryRepository, SalaryRepositoryTrait},
    },
    state::AppState,
};

async fn ensure_employee(state: &AppState, emp_id: &str) -> Result<(), AppError> {
    if EmployeeRepository::new().exists(&state.pool, emp_id).await? {
        Ok(())
    } else {
        Err(AppError::NotFound("Employee not found".into()))
    }
}

fn owned_entries(entries: Vec<(&'static str, f64)>) -> Result<Vec<(String, f64)>, AppError> {
    if entries.is_empty() {
        return Err(AppError::BadRequest("No amounts to update".into()));
    }
    Ok(entries
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect())
}

pub async fn create_salary(
    State(state): State<AppState>,
    Path(emp_id): Path<String>,
    Json(payload): Json<CreateSalary>,
) -> Result<Json<SalaryResponse>, AppError> {
    payload.validate()?;
    ensure_employee(&state, &emp_id).await?;
    let salary = Salary::new(emp_id, payload);
    let created = SalaryRepository::new()
        .create(&state.pool, &salary)
        .await?;
    tracing::info!(
        salary_id = %created.id,
        emp_id = %created.emp_id,
        pay_date = %created.pay_date,
        "salary record added"
    );
    Ok(Json(SalaryResponse::from(created)))
}

pub async fn employee_salaries(
    State(state): State<AppState>,
    Path(emp_id): Path<String>,
) -> Result<Json<Vec<SalaryResponse>>, AppError> {
    ensure_employee(&state, &emp_id).await?;
    let salaries = SalaryRepository::new()
        .find_by_employee(&state.pool, &emp_id)
        .await?;
    Ok(Json(
        salaries.into_iter().map(SalaryResponse::from).collect(),
    ))
}

pub async fn update_earnings(
    State(state): State<AppState>,
    Path(emp_id): Path<String>,
    Json(payload): Json<UpdateEarnings>,
) -> Result<Json<SalaryResponse>, AppError> {
    payload.validate()?;
    let entries = owned_entries(payload.entries())?;
    let updated = SalaryRepository::new()
        .update_latest_amounts(&state.pool, &emp_id, AmountColumn::Earnings, entries)
        .await?;
    Ok(Json(SalaryResponse::from(updated)))
}

pub async fn update_deductions(
    State(state): State<AppState>,
    Path(emp_id): Path<String>,
    Json(payload): Json<UpdateDeductions>,
) -> Result<Json<SalaryResponse>, AppError> {
    payload.validate()?;
    let entries = owned_entries(payload.entries())?;
    let updated = SalaryRepository::new()
        .update_latest_amounts(&state.pool, &emp_id, AmountColumn::Deductions, entries)
        .await?;
    Ok(Json(SalaryResponse::from(updated)))
}
