use axum::{
    extract::{Extension, Path, Query, State},
    Json,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::{
    error::AppError,
    handlers::common::{normalize_filter, parse_id},
    models::{
        employee::Employee,
        financial_request::{
            CreateFinancialRequest, FinancialRequest, FinancialRequestType,
            UpdateFinancialRequest,
        },
    },
    repositories::financial_request::{
        FinancialRequestRepository, FinancialRequestRepositoryTrait,
    },
    state::AppState,
    types::FinancialRequestId,
};

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct FinancialRequestQuery {
    /// `loan`, `salary_advance`, or `all`.
    pub request_type: Option<String>,
}

pub(crate) fn parse_request_type(
    raw: Option<&str>,
) -> Result<Option<FinancialRequestType>, AppError> {
    normalize_filter(raw)
        .map(|value| {
            serde_json::from_value::<FinancialRequestType>(serde_json::Value::String(
                value.to_ascii_lowercase(),
            ))
            .map_err(|_| {
                AppError::BadRequest("request_type must be one of: loan, salary_advance".into())
            })
        })
        .transpose()
}

pub async fn create_financial_request(
    State(state): State<AppState>,
    Extension(employee): Extension<Employee>,
    Json(payload): Json<CreateFinancialRequest>,
) -> Result<Json<FinancialRequest>, AppError> {
    payload.validate()?;
    let request = FinancialRequest::new(employee.emp_id.clone(), payload);
    let created = FinancialRequestRepository::new()
        .create(&state.pool, &request)
        .await?;
    tracing::info!(
        request_id = %created.id,
        emp_id = %created.emp_id,
        request_type = created.request_type.db_value(),
        amount = created.amount,
        "financial request submitted"
    );
    Ok(Json(created))
}

pub async fn my_financial_requests(
    State(state): State<AppState>,
    Extension(employee): Extension<Employee>,
    Query(query): Query<FinancialRequestQuery>,
) -> Result<Json<Vec<FinancialRequest>>, AppError> {
    let request_type = parse_request_type(query.request_type.as_deref())?;
    let requests = FinancialRequestRepository::new()
        .find_by_employee(&state.pool, &employee.emp_id, request_type)
        .await?;
    Ok(Json(requests))
}

pub async fn update_financial_request(
    State(state): State<AppState>,
    Extension(employee): Extension<Employee>,
    Path(request_id): Path<String>,
    Json(payload): Json<UpdateFinancialRequest>,
) -> Result<Json<FinancialRequest>, AppError> {
    payload.validate()?;
    let id: FinancialRequestId = parse_id(&request_id, "financial request")?;
    let updated = FinancialRequestRepository::new()
        .update_pending(&state.pool, id, &employee.emp_id, payload)
        .await?;
    Ok(Json(updated))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_type_filter_accepts_known_values_and_all() {
        assert_eq!(parse_request_type(None).unwrap(), None);
        assert_eq!(parse_request_type(Some("all")).unwrap(), None);
        assert_eq!(
            parse_request_type(Some("Loan")).unwrap(),
            Some(FinancialRequestType::Loan)
        );
        assert_eq!(
            parse_request_type(Some("salary_advance")).unwrap(),
            Some(FinancialRequestType::SalaryAdvance)
        );
        assert!(parse_request_type(Some("mortgage")).is_err());
    }
}
