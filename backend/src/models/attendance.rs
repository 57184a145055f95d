//! Daily punch-in / punch-out records and the worked-hours views built on them.

use chrono::{DateTime, Datelike, Duration, Month, NaiveDate, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::BTreeMap;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::types::AttendanceId;

/// One row per employee and local calendar day.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AttendanceRecord {
    #[schema(value_type = String)]
    pub id: AttendanceId,
    pub emp_id: String,
    pub work_date: NaiveDate,
    #[schema(value_type = String, example = "09:00:00")]
    pub punch_in: NaiveTime,
    #[schema(value_type = Option<String>, example = "17:30:00")]
    pub punch_out: Option<NaiveTime>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AttendanceRecord {
    pub fn new(
        emp_id: String,
        work_date: NaiveDate,
        punch_in: NaiveTime,
        note: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: AttendanceId::new(),
            emp_id,
            work_date,
            punch_in,
            punch_out: None,
            note,
            created_at: now,
            updated_at: now,
        }
    }

    /// Hours between punch-in and punch-out, to two decimals. `None` until
    /// the employee punches out.
    pub fn worked_hours(&self) -> Option<f64> {
        self.punch_out
            .map(|out| round_hours((out - self.punch_in).num_minutes() as f64 / 60.0))
    }
}

fn round_hours(hours: f64) -> f64 {
    (hours.max(0.0) * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AttendanceResponse {
    #[serde(flatten)]
    pub record: AttendanceRecord,
    pub worked_hours: Option<f64>,
}

impl From<AttendanceRecord> for AttendanceResponse {
    fn from(record: AttendanceRecord) -> Self {
        let worked_hours = record.worked_hours();
        Self {
            record,
            worked_hours,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct PunchRequest {
    /// Wall-clock time of the punch. Defaults to now in the configured zone.
    #[schema(value_type = Option<String>, example = "09:00:00")]
    pub at: Option<NaiveTime>,
    #[validate(length(max = 500))]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PunchKind {
    In,
    Out,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PunchResponse {
    pub kind: PunchKind,
    pub attendance: AttendanceResponse,
}

/// Today's punches; both times are null before the first punch.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TodayAttendance {
    pub work_date: NaiveDate,
    #[schema(value_type = Option<String>)]
    pub punch_in: Option<NaiveTime>,
    #[schema(value_type = Option<String>)]
    pub punch_out: Option<NaiveTime>,
    pub worked_hours: Option<f64>,
}

impl TodayAttendance {
    pub fn new(work_date: NaiveDate, record: Option<&AttendanceRecord>) -> Self {
        Self {
            work_date,
            punch_in: record.map(|r| r.punch_in),
            punch_out: record.and_then(|r| r.punch_out),
            worked_hours: record.and_then(AttendanceRecord::worked_hours),
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct AttendanceRangeQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl AttendanceRangeQuery {
    pub fn check(&self) -> Result<(), &'static str> {
        match (self.from, self.to) {
            (Some(from), Some(to)) if from > to => Err("`from` must not be after `to`"),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct AttendanceAnalysisQuery {
    /// Calendar year for the monthly totals. Defaults to the current year.
    pub year: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct WeekdayHours {
    pub weekday: String,
    pub date: NaiveDate,
    pub worked_hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MonthHours {
    pub month: u32,
    pub name: String,
    pub worked_hours: f64,
    pub days_worked: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AttendanceAnalysis {
    /// Monday of the week containing today.
    pub week_start: NaiveDate,
    /// Monday to Sunday, zero for days without a completed record.
    pub week: Vec<WeekdayHours>,
    pub year: i32,
    /// Months of `year` with at least one completed record, in calendar order.
    pub months: Vec<MonthHours>,
}

/// First and last day the analysis for `today` and `year` needs records for.
pub fn analysis_window(today: NaiveDate, year: i32) -> (NaiveDate, NaiveDate) {
    let week_start = monday_of(today);
    let week_end = week_start + Duration::days(6);
    let year_start = NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(week_start);
    let year_end = NaiveDate::from_ymd_opt(year, 12, 31).unwrap_or(week_end);
    (week_start.min(year_start), week_end.max(year_end))
}

fn monday_of(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

pub fn analyse_attendance(
    records: &[AttendanceRecord],
    today: NaiveDate,
    year: i32,
) -> AttendanceAnalysis {
    let week_start = monday_of(today);
    let mut by_date: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    let mut by_month: BTreeMap<u32, (f64, i64)> = BTreeMap::new();
    for record in records {
        let Some(hours) = record.worked_hours() else {
            continue;
        };
        *by_date.entry(record.work_date).or_default() += hours;
        if record.work_date.year() == year {
            let entry = by_month.entry(record.work_date.month()).or_default();
            entry.0 += hours;
            entry.1 += 1;
        }
    }

    let week = (0..7)
        .map(|offset| {
            let date = week_start + Duration::days(offset);
            WeekdayHours {
                weekday: weekday_name(date.weekday()).to_string(),
                date,
                worked_hours: round_hours(by_date.get(&date).copied().unwrap_or(0.0)),
            }
        })
        .collect();

    let months = by_month
        .into_iter()
        .map(|(month, (hours, days))| MonthHours {
            month,
            name: u8::try_from(month)
                .ok()
                .and_then(|m| Month::try_from(m).ok())
                .map(|m| m.name().to_string())
                .unwrap_or_default(),
            worked_hours: round_hours(hours),
            days_worked: days,
        })
        .collect();

    AttendanceAnalysis {
        week_start,
        week,
        year,
        months,
    }
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}
