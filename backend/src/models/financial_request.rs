use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::models::workflow::WorkflowStatus;
use crate::types::FinancialRequestId;
use crate::validation::rules::validate_attachment_url;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum FinancialRequestType {
    Loan,
    #[serde(alias = "salary advance", alias = "advance")]
    SalaryAdvance,
}

impl FinancialRequestType {
    pub fn db_value(&self) -> &'static str {
        match self {
            FinancialRequestType::Loan => "loan",
            FinancialRequestType::SalaryAdvance => "salary_advance",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema, Default)]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum FinancialStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl WorkflowStatus for FinancialStatus {
    const ALL: &'static [Self] = &[
        FinancialStatus::Pending,
        FinancialStatus::Approved,
        FinancialStatus::Rejected,
    ];

    fn db_value(&self) -> &'static str {
        match self {
            FinancialStatus::Pending => "pending",
            FinancialStatus::Approved => "approved",
            FinancialStatus::Rejected => "rejected",
        }
    }

    fn allowed_next(&self) -> &'static [Self] {
        match self {
            FinancialStatus::Pending => &[FinancialStatus::Approved, FinancialStatus::Rejected],
            FinancialStatus::Approved | FinancialStatus::Rejected => &[],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct FinancialRequest {
    #[schema(value_type = String)]
    pub id: FinancialRequestId,
    pub emp_id: String,
    pub request_type: FinancialRequestType,
    pub amount: f64,
    pub reason: String,
    pub attachment_url: Option<String>,
    pub status: FinancialStatus,
    pub decided_by: Option<String>,
    pub decided_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FinancialRequest {
    pub fn new(emp_id: String, payload: CreateFinancialRequest) -> Self {
        let now = Utc::now();
        Self {
            id: FinancialRequestId::new(),
            emp_id,
            request_type: payload.request_type,
            amount: payload.amount,
            reason: payload.reason,
            attachment_url: payload.attachment_url,
            status: FinancialStatus::Pending,
            decided_by: None,
            decided_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.status, FinancialStatus::Pending)
    }
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateFinancialRequest {
    pub request_type: FinancialRequestType,
    #[validate(range(exclusive_min = 0.0))]
    pub amount: f64,
    #[validate(length(min = 1, max = 1000))]
    pub reason: String,
    #[validate(custom(function = "validate_attachment_url"))]
    pub attachment_url: Option<String>,
}

/// Owner edit of a request that is still pending. Omitted fields keep their value.
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateFinancialRequest {
    pub request_type: Option<FinancialRequestType>,
    #[validate(range(exclusive_min = 0.0))]
    pub amount: Option<f64>,
    #[validate(length(min = 1, max = 1000))]
    pub reason: Option<String>,
    #[validate(custom(function = "validate_attachment_url"))]
    pub attachment_url: Option<String>,
}

impl UpdateFinancialRequest {
    pub fn apply_to(self, request: &mut FinancialRequest) {
        if let Some(request_type) = self.request_type {
            request.request_type = request_type;
        }
        if let Some(amount) = self.amount {
            request.amount = amount;
        }
        if let Some(reason) = self.reason {
            request.reason = reason;
        }
        if let Some(url) = self.attachment_url {
            request.attachment_url = Some(url);
        }
        request.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FinancialRequest {
        FinancialRequest::new(
            "E-7".into(),
            CreateFinancialRequest {
                request_type: FinancialRequestType::Loan,
                amount: 1500.0,
                reason: "Car repair".into(),
                attachment_url: None,
            },
        )
    }

    #[test]
    fn request_type_accepts_legacy_labels() {
        let t: FinancialRequestType = serde_json::from_str("\"salary advance\"").unwrap();
        assert_eq!(t, FinancialRequestType::SalaryAdvance);
        let t: FinancialRequestType = serde_json::from_str("\"loan\"").unwrap();
        assert_eq!(t, FinancialRequestType::Loan);
    }

    #[test]
    fn create_payload_rejects_non_positive_amount() {
        let payload = CreateFinancialRequest {
            request_type: FinancialRequestType::Loan,
            amount: 0.0,
            reason: "x".into(),
            attachment_url: Some("https://files.example.com/doc.pdf".into()),
        };
        assert!(payload.validate().is_err());
    }

    #[test]
    fn update_keeps_omitted_fields() {
        let mut request = sample();
        UpdateFinancialRequest {
            request_type: None,
            amount: Some(900.0),
            reason: None,
            attachment_url: None,
        }
        .apply_to(&mut request);
        assert_eq!(request.amount, 900.0);
        assert_eq!(request.reason, "Car repair");
        assert_eq!(request.request_type, FinancialRequestType::Loan);
    }

    #[test]
    fn decided_requests_are_terminal() {
        assert!(FinancialStatus::Approved.is_terminal());
        assert!(FinancialStatus::Rejected.is_terminal());
        assert!(FinancialStatus::Pending.can_transition_to(FinancialStatus::Approved));
    }
}
