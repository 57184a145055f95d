use axum::{
    extract::{Extension, State},
    Json,
};

use crate::{
    error::AppError,
    models::{
        employee::Employee,
        training::{Training, TrainingAllocationView},
    },
    repositories::training::{TrainingRepository, TrainingRepositoryTrait},
    state::AppState,
};

pub async fn list_trainings(
    State(state): State<AppState>,
) -> Result<Json<Vec<Training>>, AppError> {
    let trainings = TrainingRepository::new().list(&state.pool).await?;
    Ok(Json(trainings))
}

pub async fn my_training_allocations(
    State(state): State<AppState>,
    Extension(employee): Extension<Employee>,
) -> Result<Json<Vec<TrainingAllocationView>>, AppError> {
    let allocations = TrainingRepository::new()
        .list_allocations_for_employee(&state.pool, &employee.emp_id)
        .await?;
    Ok(Json(allocations))
}
