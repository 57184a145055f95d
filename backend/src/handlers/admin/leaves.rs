use axum::{
    extract::{Extension, Path, Query, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::{
    error::AppError,
    handlers::common::{normalize_filter, parse_id},
    models::{
        employee::Employee,
        leave_request::{LeaveRequest, LeaveStatus},
        workflow::parse_status,
        PaginatedResponse, PaginationQuery, StatusChange,
    },
    repositories::leave_request::{
        LeaveListFilters, LeaveRequestRepository, LeaveRequestRepositoryTrait,
    },
    state::AppState,
    types::LeaveRequestId,
};

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct LeaveListQuery {
    pub status: Option<String>,
    pub emp_id: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl LeaveListQuery {
    fn pagination(&self) -> PaginationQuery {
        PaginationQuery::from_parts(self.limit, self.offset)
    }

    fn filters(&self) -> Result<LeaveListFilters, AppError> {
        Ok(LeaveListFilters {
            status: normalize_filter(self.status.as_deref())
                .map(parse_status::<LeaveStatus>)
                .transpose()?,
            emp_id: normalize_filter(self.emp_id.as_deref()).map(ToString::to_string),
        })
    }
}

pub async fn list_leaves(
    State(state): State<AppState>,
    Query(query): Query<LeaveListQuery>,
) -> Result<Json<PaginatedResponse<LeaveRequest>>, AppError> {
    let filters = query.filters()?;
    let pagination = query.pagination();
    let (limit, offset) = (pagination.limit(), pagination.offset());
    let (items, total) = LeaveRequestRepository::new()
        .list(&state.pool, &filters, limit, offset)
        .await?;
    Ok(Json(PaginatedResponse::new(items, total, limit, offset)))
}

pub async fn update_leave_status(
    State(state): State<AppState>,
    Extension(approver): Extension<Employee>,
    Path(leave_id): Path<String>,
    Json(body): Json<StatusChange>,
) -> Result<Json<LeaveRequest>, AppError> {
    let id: LeaveRequestId = parse_id(&leave_id, "leave request")?;
    let next: LeaveStatus = parse_status(&body.status)?;
    let updated = LeaveRequestRepository::new()
        .update_status(&state.pool, id, next, &approver.emp_id, Utc::now())
        .await?;
    tracing::info!(
        leave_id = %id,
        status = ?updated.status,
        decided_by = %approver.emp_id,
        "leave request decided"
    );
    Ok(Json(updated))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_query_parses_status_filter() {
        let query = LeaveListQuery {
            status: Some("Accepted".into()),
            emp_id: Some(" ".into()),
            ..Default::default()
        };
        let filters = query.filters().unwrap();
        assert_eq!(filters.status, Some(LeaveStatus::Accepted));
        assert_eq!(filters.emp_id, None);
    }

    #[test]
    fn list_query_rejects_unknown_status() {
        let query = LeaveListQuery {
            status: Some("approved".into()),
            ..Default::default()
        };
        assert!(matches!(query.filters(), Err(AppError::BadRequest(_))));
    }
}
