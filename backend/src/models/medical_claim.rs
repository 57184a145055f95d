use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::workflow::WorkflowStatus;
use crate::types::MedicalClaimId;
use crate::validation::rules::validate_claim_attachments;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema, Default)]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ClaimStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
}

impl WorkflowStatus for ClaimStatus {
    const ALL: &'static [Self] = &[ClaimStatus::Pending, ClaimStatus::Accepted, ClaimStatus::Rejected];

    fn db_value(&self) -> &'static str {
        match self {
            ClaimStatus::Pending => "pending",
            ClaimStatus::Accepted => "accepted",
            ClaimStatus::Rejected => "rejected",
        }
    }

    fn allowed_next(&self) -> &'static [Self] {
        match self {
            ClaimStatus::Pending => &[ClaimStatus::Accepted, ClaimStatus::Rejected],
            ClaimStatus::Accepted | ClaimStatus::Rejected => &[],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct MedicalClaim {
    #[schema(value_type = String)]
    pub id: MedicalClaimId,
    pub emp_id: String,
    pub amount: f64,
    /// Links to uploaded receipts, stored as a JSON array.
    #[schema(value_type = Vec<String>)]
    pub attachments: Json<Vec<String>>,
    pub status: ClaimStatus,
    pub decided_by: Option<String>,
    pub decided_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MedicalClaim {
    pub fn new(emp_id: String, amount: f64, attachments: Vec<String>) -> Self {
        let now = Utc::now();
        Self {
            id: MedicalClaimId::new(),
            emp_id,
            amount,
            attachments: Json(attachments),
            status: ClaimStatus::Pending,
            decided_by: None,
            decided_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateMedicalClaim {
    #[validate(range(exclusive_min = 0.0))]
    pub amount: f64,
    #[validate(custom(function = "validate_claim_attachments"))]
    pub attachments: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateClaimLimit {
    #[validate(range(min = 0.0))]
    pub max_amount: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ClaimLimit {
    pub max_amount: f64,
    pub updated_by: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Cap and accepted spend for one employee.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ClaimSummary {
    pub max_amount: Option<f64>,
    pub total_spent: f64,
    /// `max_amount - total_spent`, floored at zero. Informational only.
    pub remaining: Option<f64>,
}

impl ClaimSummary {
    pub fn new(max_amount: Option<f64>, total_spent: f64) -> Self {
        Self {
            max_amount,
            total_spent,
            remaining: max_amount.map(|max| (max - total_spent).max(0.0)),
        }
    }
}

/// One accepted claim as listed in the organisation-wide overview.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AcceptedClaim {
    #[schema(value_type = String)]
    pub id: MedicalClaimId,
    pub emp_id: String,
    pub employee_name: String,
    pub amount: f64,
    pub created_at: DateTime<Utc>,
    pub decided_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EmployeeClaimSpend {
    pub emp_id: String,
    pub employee_name: String,
    pub total_spent: f64,
    pub accepted_claims: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ClaimOverview {
    pub max_amount: Option<f64>,
    pub total_spent: f64,
    /// Accepted claims, newest first.
    pub claims: Vec<AcceptedClaim>,
    /// Per-employee rollup of `claims`, highest spend first.
    pub employees: Vec<EmployeeClaimSpend>,
}

impl ClaimOverview {
    pub fn new(max_amount: Option<f64>, claims: Vec<AcceptedClaim>) -> Self {
        let mut by_employee: BTreeMap<&str, EmployeeClaimSpend> = BTreeMap::new();
        for claim in &claims {
            let entry = by_employee
                .entry(claim.emp_id.as_str())
                .or_insert_with(|| EmployeeClaimSpend {
                    emp_id: claim.emp_id.clone(),
                    employee_name: claim.employee_name.clone(),
                    total_spent: 0.0,
                    accepted_claims: 0,
                });
            entry.total_spent += claim.amount;
            entry.accepted_claims += 1;
        }
        let mut employees: Vec<EmployeeClaimSpend> = by_employee.into_values().collect();
        employees.sort_by(|a, b| b.total_spent.total_cmp(&a.total_spent));

        Self {
            max_amount,
            total_spent: claims.iter().map(|claim| claim.amount).sum(),
            claims,
            employees,
        }
    }
}
