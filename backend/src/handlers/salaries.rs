use axum::{
    extract::{Extension, State},
    Json,
};

use crate::{
    error::AppError,
    models::{employee::Employee, salary::SalaryResponse},
    repositories::salary::{SalaryRepository, SalaryRepositoryTrait},
    state::AppState,
};

/// The caller's payslips, newest first.
pub async fn my_salaries(
    State(state): State<AppState>,
    Extension(employee): Extension<Employee>,
) -> Result<Json<Vec<SalaryResponse>>, AppError> {
    let salaries = SalaryRepository::new()
        .find_by_employee(&state.pool, &employee.emp_id)
        .await?;
    Ok(Json(
        salaries.into_iter().map(SalaryResponse::from).collect(),
    ))
}
