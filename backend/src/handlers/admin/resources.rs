use axum::{
    extract::{Extension, Path, Query, State},
    Json,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::{
    error::AppError,
    handlers::common::parse_id,
    models::{
        employee::Employee,
        resource::{
            AlertPayload, AllocateResource, AllocationStatus, AllocationView, CreateResource,
            Resource, ResourceAllocation, ReturnOutcome, UpdateResourceQuantity,
        },
        workflow::parse_status,
        PaginatedResponse, PaginationQuery,
    },
    repositories::resource::{ResourceRepository, ResourceRepositoryTrait},
    services::allocation::AllocationService,
    state::AppState,
    types::{ResourceAllocationId, ResourceId},
    utils::time::today_local,
};

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct AllocationListQuery {
    /// `not_returned` (default), `returned`, or `all`.
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl AllocationListQuery {
    fn status_filter(&self) -> Result<Option<AllocationStatus>, AppError> {
        match self.status.as_deref().map(str::trim) {
            None | Some("") => Ok(Some(AllocationStatus::NotReturned)),
            Some(value) if value.eq_ignore_ascii_case("all") => Ok(None),
            Some(value) => parse_status(value).map(Some),
        }
    }
}

pub async fn create_resource(
    State(state): State<AppState>,
    Json(payload): Json<CreateResource>,
) -> Result<Json<Resource>, AppError> {
    payload.validate()?;
    let resource = Resource::new(
        payload.name.trim().to_string(),
        payload.kind.trim().to_string(),
        payload.quantity,
    );
    let created = ResourceRepository::new()
        .create(&state.pool, &resource)
        .await?;
    Ok(Json(created))
}

pub async fn update_resource_quantity(
    State(state): State<AppState>,
    Path(resource_id): Path<String>,
    Json(payload): Json<UpdateResourceQuantity>,
) -> Result<Json<Resource>, AppError> {
    payload.validate()?;
    let id: ResourceId = parse_id(&resource_id, "resource")?;
    let updated = AllocationService::new(state.pool.clone())
        .set_total_quantity(id, payload.total_quantity)
        .await?;
    Ok(Json(updated))
}

pub async fn allocate_resource(
    State(state): State<AppState>,
    Extension(approver): Extension<Employee>,
    Path(resource_id): Path<String>,
    Json(payload): Json<AllocateResource>,
) -> Result<Json<ResourceAllocation>, AppError> {
    payload.validate()?;
    payload
        .check_due_on(today_local(&state.config.time_zone))
        .map_err(|msg| AppError::BadRequest(msg.into()))?;
    let id: ResourceId = parse_id(&resource_id, "resource")?;
    let (allocation, _resource) = AllocationService::new(state.pool.clone())
        .allocate(
            id,
            payload.emp_id.trim(),
            payload.quantity,
            payload.due_on,
            &approver.emp_id,
        )
        .await?;
    Ok(Json(allocation))
}

pub async fn list_allocations(
    State(state): State<AppState>,
    Query(query): Query<AllocationListQuery>,
) -> Result<Json<PaginatedResponse<AllocationView>>, AppError> {
    let status = query.status_filter()?;
    let pagination = PaginationQuery::from_parts(query.limit, query.offset);
    let (limit, offset) = (pagination.limit(), pagination.offset());
    let (items, total) = ResourceRepository::new()
        .list_allocations(&state.pool, status, limit, offset)
        .await?;
    Ok(Json(PaginatedResponse::new(items, total, limit, offset)))
}

pub async fn return_allocation(
    State(state): State<AppState>,
    Path(allocation_id): Path<String>,
) -> Result<Json<ReturnOutcome>, AppError> {
    let id: ResourceAllocationId = parse_id(&allocation_id, "allocation")?;
    let outcome = AllocationService::new(state.pool.clone())
        .return_allocation(id)
        .await?;
    Ok(Json(outcome))
}

pub async fn set_allocation_alert(
    State(state): State<AppState>,
    Path(allocation_id): Path<String>,
    Json(payload): Json<AlertPayload>,
) -> Result<Json<ResourceAllocation>, AppError> {
    let id: ResourceAllocationId = parse_id(&allocation_id, "allocation")?;
    let updated = ResourceRepository::new()
        .set_alert(&state.pool, id, payload.alert)
        .await?;
    Ok(Json(updated))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocation_list_defaults_to_outstanding() {
        let query = AllocationListQuery::default();
        assert_eq!(
            query.status_filter().unwrap(),
            Some(AllocationStatus::NotReturned)
        );
        let query = AllocationListQuery {
            status: Some("all".into()),
            ..Default::default()
        };
        assert_eq!(query.status_filter().unwrap(), None);
        let query = AllocationListQuery {
            status: Some("lost".into()),
            ..Default::default()
        };
        assert!(query.status_filter().is_err());
    }
}
