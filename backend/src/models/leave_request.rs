use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::BTreeMap;
use utoipa::ToSchema;
use validator::Validate;

use crate::models::workflow::WorkflowStatus;
use crate::types::LeaveRequestId;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct LeaveRequest {
    #[schema(value_type = String)]
    pub id: LeaveRequestId,
    pub emp_id: String,
    pub leave_type: LeaveType,
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    #[schema(value_type = Option<String>, example = "09:00:00")]
    pub time_from: Option<NaiveTime>,
    #[schema(value_type = Option<String>, example = "13:00:00")]
    pub time_to: Option<NaiveTime>,
    pub reason: Option<String>,
    pub status: LeaveStatus,
    pub decided_by: Option<String>,
    pub decided_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum LeaveType {
    Sick,
    #[serde(alias = "vacation")]
    Annual,
    Personal,
    Parental,
    Bereavement,
    Unpaid,
    #[serde(alias = "education")]
    Study,
    FamilyMedical,
}

impl LeaveType {
    pub fn db_value(&self) -> &'static str {
        match self {
            LeaveType::Sick => "sick",
            LeaveType::Annual => "annual",
            LeaveType::Personal => "personal",
            LeaveType::Parental => "parental",
            LeaveType::Bereavement => "bereavement",
            LeaveType::Unpaid => "unpaid",
            LeaveType::Study => "study",
            LeaveType::FamilyMedical => "family_medical",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema, Default)]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum LeaveStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
}

impl WorkflowStatus for LeaveStatus {
    const ALL: &'static [Self] = &[
        LeaveStatus::Pending,
        LeaveStatus::Accepted,
        LeaveStatus::Rejected,
    ];

    fn db_value(&self) -> &'static str {
        match self {
            LeaveStatus::Pending => "pending",
            LeaveStatus::Accepted => "accepted",
            LeaveStatus::Rejected => "rejected",
        }
    }

    fn allowed_next(&self) -> &'static [Self] {
        match self {
            LeaveStatus::Pending => &[LeaveStatus::Accepted, LeaveStatus::Rejected],
            LeaveStatus::Accepted | LeaveStatus::Rejected => &[],
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateLeaveRequest {
    pub leave_type: LeaveType,
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    #[schema(value_type = Option<String>, example = "09:00:00")]
    pub time_from: Option<NaiveTime>,
    #[schema(value_type = Option<String>, example = "13:00:00")]
    pub time_to: Option<NaiveTime>,
    #[validate(length(max = 1000))]
    pub reason: Option<String>,
}

/// Per leave type totals for one employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LeaveTypeSummary {
    pub leave_type: LeaveType,
    pub total_leaves: i64,
    pub total_days: i64,
    pub total_hours: i64,
}

/// Checks the requested window: the end date must not precede the start
/// date, times come in pairs, and on a single day the end time must not
/// precede the start time.
pub fn validate_leave_window(
    date_from: NaiveDate,
    date_to: NaiveDate,
    time_from: Option<NaiveTime>,
    time_to: Option<NaiveTime>,
) -> Result<(), &'static str> {
    if date_to < date_from {
        return Err("date_to must be on or after date_from");
    }
    match (time_from, time_to) {
        (Some(from), Some(to)) if date_from == date_to && to < from => {
            Err("time_to must be on or after time_from for a single-day leave")
        }
        (Some(_), None) | (None, Some(_)) => {
            Err("time_from and time_to must be provided together")
        }
        _ => Ok(()),
    }
}

impl LeaveRequest {
    pub fn new(emp_id: String, payload: CreateLeaveRequest) -> Self {
        let now = Utc::now();
        Self {
            id: LeaveRequestId::new(),
            emp_id,
            leave_type: payload.leave_type,
            date_from: payload.date_from,
            date_to: payload.date_to,
            time_from: payload.time_from,
            time_to: payload.time_to,
            reason: payload.reason,
            status: LeaveStatus::Pending,
            decided_by: None,
            decided_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.status, LeaveStatus::Pending)
    }

    /// Calendar days covered, both ends inclusive.
    pub fn total_days(&self) -> i64 {
        (self.date_to - self.date_from).num_days() + 1
    }

    /// Whole hours between the start and the end of the leave. A missing start
    /// time means the start of the day, a missing end time the end of it.
    pub fn total_hours(&self) -> i64 {
        let start = self
            .date_from
            .and_time(self.time_from.unwrap_or(NaiveTime::MIN));
        let end = match self.time_to {
            Some(time) => self.date_to.and_time(time),
            None => match self.date_to.succ_opt() {
                Some(next_day) => next_day.and_time(NaiveTime::MIN),
                None => self.date_to.and_time(NaiveTime::MIN),
            },
        };
        (end - start).num_hours().max(0)
    }
}

/// Groups leaves by type. Rejected leaves never count against the employee.
pub fn summarize_leaves(leaves: &[LeaveRequest]) -> Vec<LeaveTypeSummary> {
    let mut totals: BTreeMap<LeaveType, LeaveTypeSummary> = BTreeMap::new();
    for leave in leaves
        .iter()
        .filter(|leave| leave.status != LeaveStatus::Rejected)
    {
        let entry = totals
            .entry(leave.leave_type)
            .or_insert_with(|| LeaveTypeSummary {
                leave_type: leave.leave_type,
                total_leaves: 0,
                total_days: 0,
                total_hours: 0,
            });
        entry.total_leaves += 1;
        entry.total_days += leave.total_days();
        entry.total_hours += leave.total_hours();
    }
    totals.into_values().collect()
}
