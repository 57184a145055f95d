use axum::{
    extract::{Extension, Query, State},
    Json,
};
use validator::Validate;

use crate::{
    error::AppError,
    models::{
        employee::Employee,
        reminder::{CreateReminder, NotificationFeed, Reminder, ReminderQuery},
    },
    repositories::reminder::{ReminderRepository, ReminderRepositoryTrait},
    state::AppState,
    utils::time::today_local,
};

pub async fn create_reminder(
    State(state): State<AppState>,
    Extension(employee): Extension<Employee>,
    Json(payload): Json<CreateReminder>,
) -> Result<Json<Reminder>, AppError> {
    payload.validate()?;
    let remind_on = payload
        .remind_on
        .unwrap_or_else(|| today_local(&state.config.time_zone));
    let reminder = Reminder::new(
        employee.emp_id.clone(),
        remind_on,
        payload.subject.trim().to_string(),
        payload.body,
    );
    let created = ReminderRepository::new()
        .create(&state.pool, &reminder)
        .await?;
    Ok(Json(created))
}

/// Reminders for one day, today in the configured zone by default.
pub async fn my_reminders(
    State(state): State<AppState>,
    Extension(employee): Extension<Employee>,
    Query(query): Query<ReminderQuery>,
) -> Result<Json<Vec<Reminder>>, AppError> {
    let date = query
        .date
        .unwrap_or_else(|| today_local(&state.config.time_zone));
    let reminders = ReminderRepository::new()
        .list_for_date(&state.pool, &employee.emp_id, date, query.subject)
        .await?;
    Ok(Json(reminders))
}

/// Everything currently flagged for the caller.
pub async fn my_notifications(
    State(state): State<AppState>,
    Extension(employee): Extension<Employee>,
) -> Result<Json<NotificationFeed>, AppError> {
    let repo = ReminderRepository::new();
    let today = today_local(&state.config.time_zone);
    let (allocation_alerts, training_reminders, reminders) = tokio::try_join!(
        repo.allocation_alerts(&state.pool, &employee.emp_id),
        repo.training_reminders(&state.pool, &employee.emp_id),
        repo.list_for_date(&state.pool, &employee.emp_id, today, None),
    )?;
    Ok(Json(NotificationFeed::new(
        allocation_alerts,
        training_reminders,
        reminders,
    )))
}
