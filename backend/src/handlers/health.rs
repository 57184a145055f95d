use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::{db::connection::ping, error::AppError, state::AppState};

pub async fn health(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    ping(&state.pool)
        .await
        .map_err(|e| AppError::InternalServerError(e.into()))?;
    Ok(Json(json!({"status": "ok"})))
}
