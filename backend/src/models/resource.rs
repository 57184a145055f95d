//! Allocatable stock (laptops, phones, parking slots, ...) and the
//! allocations handed out against it.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::models::workflow::WorkflowStatus;
use crate::types::{ResourceAllocationId, ResourceId};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Resource {
    #[schema(value_type = String)]
    pub id: ResourceId,
    pub name: String,
    pub kind: String,
    pub total_quantity: i32,
    /// Units not currently handed out. Always within `0..=total_quantity`.
    pub available_quantity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Resource {
    pub fn new(name: String, kind: String, quantity: i32) -> Self {
        let now = Utc::now();
        Self {
            id: ResourceId::new(),
            name,
            kind,
            total_quantity: quantity,
            available_quantity: quantity,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn outstanding(&self) -> i32 {
        self.total_quantity - self.available_quantity
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema, Default)]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AllocationStatus {
    #[default]
    NotReturned,
    Returned,
}

impl WorkflowStatus for AllocationStatus {
    const ALL: &'static [Self] = &[AllocationStatus::NotReturned, AllocationStatus::Returned];

    fn db_value(&self) -> &'static str {
        match self {
            AllocationStatus::NotReturned => "not_returned",
            AllocationStatus::Returned => "returned",
        }
    }

    fn allowed_next(&self) -> &'static [Self] {
        match self {
            AllocationStatus::NotReturned => &[AllocationStatus::Returned],
            AllocationStatus::Returned => &[],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ResourceAllocation {
    #[schema(value_type = String)]
    pub id: ResourceAllocationId,
    #[schema(value_type = String)]
    pub resource_id: ResourceId,
    pub emp_id: String,
    pub quantity: i32,
    pub status: AllocationStatus,
    /// Date the units are expected back.
    pub due_on: NaiveDate,
    /// Reminder flag raised by an approver; surfaced on the employee's next poll.
    pub alert: bool,
    pub allocated_by: Option<String>,
    pub returned_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ResourceAllocation {
    pub fn new(
        resource_id: ResourceId,
        emp_id: String,
        quantity: i32,
        due_on: NaiveDate,
        allocated_by: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ResourceAllocationId::new(),
            resource_id,
            emp_id,
            quantity,
            status: AllocationStatus::NotReturned,
            due_on,
            alert: false,
            allocated_by: Some(allocated_by),
            returned_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Allocation joined with resource and employee names for listings.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AllocationView {
    #[schema(value_type = String)]
    pub id: ResourceAllocationId,
    #[schema(value_type = String)]
    pub resource_id: ResourceId,
    pub resource_name: String,
    pub resource_kind: String,
    pub emp_id: String,
    pub employee_name: String,
    pub quantity: i32,
    pub status: AllocationStatus,
    pub due_on: NaiveDate,
    pub alert: bool,
    pub returned_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateResource {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1, max = 100))]
    pub kind: String,
    #[validate(range(min = 0))]
    pub quantity: i32,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateResourceQuantity {
    /// New total stock level.
    #[validate(range(min = 0))]
    pub total_quantity: i32,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct AllocateResource {
    #[validate(length(min = 1, max = 32))]
    pub emp_id: String,
    #[validate(range(min = 1))]
    pub quantity: i32,
    /// Return date; today or later in the configured time zone.
    pub due_on: NaiveDate,
}

impl AllocateResource {
    pub fn check_due_on(&self, today: NaiveDate) -> Result<(), &'static str> {
        if self.due_on < today {
            return Err("due_on cannot be in the past");
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AlertPayload {
    pub alert: bool,
}

/// Result of handing a returned allocation back to stock.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReturnOutcome {
    pub allocation: ResourceAllocation,
    pub previous_available: i32,
    pub available_quantity: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_resource_starts_fully_available() {
        let resource = Resource::new("Laptop".into(), "hardware".into(), 4);
        assert_eq!(resource.total_quantity, 4);
        assert_eq!(resource.available_quantity, 4);
        assert_eq!(resource.outstanding(), 0);
    }

    #[test]
    fn due_date_may_be_today_but_not_earlier() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        let payload = |due_on| AllocateResource {
            emp_id: "E-1".into(),
            quantity: 1,
            due_on,
        };
        assert!(payload(today).check_due_on(today).is_ok());
        assert!(payload(today.succ_opt().unwrap()).check_due_on(today).is_ok());
        assert!(payload(today.pred_opt().unwrap()).check_due_on(today).is_err());
    }

    #[test]
    fn allocation_status_serde_and_transitions() {
        let status: AllocationStatus = serde_json::from_str("\"not_returned\"").unwrap();
        assert_eq!(status, AllocationStatus::NotReturned);
        assert!(status.can_transition_to(AllocationStatus::Returned));
        assert!(!AllocationStatus::Returned.can_transition_to(AllocationStatus::NotReturned));
        assert!(AllocationStatus::Returned.is_terminal());
    }
}
