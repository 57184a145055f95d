use axum::{
    extract::{Extension, State},
    Json,
};

use crate::{
    error::AppError,
    models::{
        employee::Employee,
        resource::{AllocationView, Resource},
    },
    repositories::resource::{ResourceRepository, ResourceRepositoryTrait},
    state::AppState,
};

pub async fn list_resources(
    State(state): State<AppState>,
) -> Result<Json<Vec<Resource>>, AppError> {
    let resources = ResourceRepository::new().list(&state.pool).await?;
    Ok(Json(resources))
}

pub async fn my_allocations(
    State(state): State<AppState>,
    Extension(employee): Extension<Employee>,
) -> Result<Json<Vec<AllocationView>>, AppError> {
    let allocations = ResourceRepository::new()
        .list_allocations_for_employee(&state.pool, &employee.emp_id)
        .await?;
    Ok(Json(allocations))
}
