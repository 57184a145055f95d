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
        financial_request::{FinancialRequest, FinancialStatus},
        workflow::parse_status,
        PaginatedResponse, PaginationQuery, StatusChange,
    },
    repositories::financial_request::{
        FinancialRequestRepository, FinancialRequestRepositoryTrait,
    },
    state::AppState,
    types::FinancialRequestId,
};

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct FinancialRequestListQuery {
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

pub async fn list_financial_requests(
    State(state): State<AppState>,
    Query(query): Query<FinancialRequestListQuery>,
) -> Result<Json<PaginatedResponse<FinancialRequest>>, AppError> {
    let status = normalize_filter(query.status.as_deref())
        .map(parse_status::<FinancialStatus>)
        .transpose()?;
    let pagination = PaginationQuery::from_parts(query.limit, query.offset);
    let (limit, offset) = (pagination.limit(), pagination.offset());
    let (items, total) = FinancialRequestRepository::new()
        .list(&state.pool, status, limit, offset)
        .await?;
    Ok(Json(PaginatedResponse::new(items, total, limit, offset)))
}

pub async fn update_financial_request_status(
    State(state): State<AppState>,
    Extension(approver): Extension<Employee>,
    Path(request_id): Path<String>,
    Json(body): Json<StatusChange>,
) -> Result<Json<FinancialRequest>, AppError> {
    let id: FinancialRequestId = parse_id(&request_id, "financial request")?;
    let next: FinancialStatus = parse_status(&body.status)?;
    let updated = FinancialRequestRepository::new()
        .update_status(&state.pool, id, next, &approver.emp_id, Utc::now())
        .await?;
    tracing::info!(
        request_id = %id,
        status = ?updated.status,
        decided_by = %approver.emp_id,
        "financial request decided"
    );
    Ok(Json(updated))
}
