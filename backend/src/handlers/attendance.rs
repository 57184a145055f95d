use axum::{
    extract::{Extension, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{Datelike, Timelike};
use validator::Validate;

use crate::{
    error::AppError,
    models::{
        attendance::{
            analyse_attendance, analysis_window, AttendanceAnalysis, AttendanceAnalysisQuery,
            AttendanceRangeQuery, AttendanceRecord, AttendanceResponse, PunchKind, PunchRequest,
            PunchResponse, TodayAttendance,
        },
        employee::Employee,
    },
    repositories::attendance::{AttendanceRepository, AttendanceRepositoryTrait},
    state::AppState,
    utils::time::now_in_timezone,
};

/// First punch of the local day opens it (201); later punches move punch-out (200).
pub async fn punch(
    State(state): State<AppState>,
    Extension(employee): Extension<Employee>,
    Json(payload): Json<PunchRequest>,
) -> Result<(StatusCode, Json<PunchResponse>), AppError> {
    payload.validate()?;
    let now = now_in_timezone(&state.config.time_zone);
    let at = payload.at.unwrap_or_else(|| now.time());
    let at = at.with_nanosecond(0).unwrap_or(at);
    let note = payload
        .note
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());
    let punch = AttendanceRecord::new(employee.emp_id.clone(), now.date_naive(), at, note);

    let (record, kind) = AttendanceRepository::new()
        .record_punch(&state.pool, &punch)
        .await?
        .ok_or_else(|| AppError::BadRequest("Punch-out cannot be earlier than punch-in".into()))?;

    tracing::info!(
        emp_id = %record.emp_id,
        work_date = %record.work_date,
        kind = ?kind,
        at = %at,
        "attendance punch recorded"
    );
    let status = match kind {
        PunchKind::In => StatusCode::CREATED,
        PunchKind::Out => StatusCode::OK,
    };
    Ok((
        status,
        Json(PunchResponse {
            kind,
            attendance: AttendanceResponse::from(record),
        }),
    ))
}

pub async fn my_attendance(
    State(state): State<AppState>,
    Extension(employee): Extension<Employee>,
    Query(query): Query<AttendanceRangeQuery>,
) -> Result<Json<Vec<AttendanceResponse>>, AppError> {
    list_attendance(&state, &employee.emp_id, &query).await.map(Json)
}

pub async fn my_attendance_today(
    State(state): State<AppState>,
    Extension(employee): Extension<Employee>,
) -> Result<Json<TodayAttendance>, AppError> {
    let today = now_in_timezone(&state.config.time_zone).date_naive();
    let record = AttendanceRepository::new()
        .find_for_day(&state.pool, &employee.emp_id, today)
        .await?;
    Ok(Json(TodayAttendance::new(today, record.as_ref())))
}

/// Hours per day of the current week and per month of `year`.
pub async fn my_attendance_analysis(
    State(state): State<AppState>,
    Extension(employee): Extension<Employee>,
    Query(query): Query<AttendanceAnalysisQuery>,
) -> Result<Json<AttendanceAnalysis>, AppError> {
    let today = now_in_timezone(&state.config.time_zone).date_naive();
    let year = query.year.unwrap_or_else(|| today.year());
    if !(1..=9999).contains(&year) {
        return Err(AppError::BadRequest("year must be between 1 and 9999".into()));
    }
    let (from, to) = analysis_window(today, year);
    let records = AttendanceRepository::new()
        .list_range(&state.pool, &employee.emp_id, Some(from), Some(to))
        .await?;
    Ok(Json(analyse_attendance(&records, today, year)))
}

pub(crate) async fn list_attendance(
    state: &AppState,
    emp_id: &str,
    query: &AttendanceRangeQuery,
) -> Result<Vec<AttendanceResponse>, AppError> {
    query
        .check()
        .map_err(|msg| AppError::BadRequest(msg.into()))?;
    let records = AttendanceRepository::new()
        .list_range(&state.pool, emp_id, query.from, query.to)
        .await?;
    Ok(records.into_iter().map(AttendanceResponse::from).collect())
}
