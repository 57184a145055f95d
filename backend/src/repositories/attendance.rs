//! Punch upserts and date-ranged reads over the `attendance` table.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{FromRow, PgPool};

use crate::error::AppError;
use crate::models::attendance::{AttendanceRecord, PunchKind};

const ATTENDANCE_COLUMNS: &str =
    "id, emp_id, work_date, punch_in, punch_out, note, created_at, updated_at";

#[derive(FromRow)]
struct PunchRow {
    #[sqlx(flatten)]
    record: AttendanceRecord,
    inserted: bool,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AttendanceRepositoryTrait: Send + Sync {
    /// Inserts the day's row on the first punch, otherwise moves `punch_out`
    /// to this punch. `None` when the punch is earlier than the stored punch-in.
    async fn record_punch(
        &self,
        db: &PgPool,
        punch: &AttendanceRecord,
    ) -> Result<Option<(AttendanceRecord, PunchKind)>, AppError>;

    async fn find_for_day(
        &self,
        db: &PgPool,
        emp_id: &str,
        work_date: NaiveDate,
    ) -> Result<Option<AttendanceRecord>, AppError>;

    /// Newest day first. Open bounds are unbounded.
    async fn list_range(
        &self,
        db: &PgPool,
        emp_id: &str,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<AttendanceRecord>, AppError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct AttendanceRepository;

impl AttendanceRepository {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AttendanceRepositoryTrait for AttendanceRepository {
    async fn record_punch(
        &self,
        db: &PgPool,
        punch: &AttendanceRecord,
    ) -> Result<Option<(AttendanceRecord, PunchKind)>, AppError> {
        let query = format!(
            "INSERT INTO attendance ({cols}) VALUES ($1, $2, $3, $4, NULL, $5, $6, $6) \
             ON CONFLICT (emp_id, work_date) DO UPDATE SET \
             punch_out = EXCLUDED.punch_in, \
             note = COALESCE(EXCLUDED.note, attendance.note), \
             updated_at = EXCLUDED.updated_at \
             WHERE attendance.punch_in <= EXCLUDED.punch_in \
             RETURNING {cols}, (xmax = 0) AS inserted",
            cols = ATTENDANCE_COLUMNS
        );
        let row = sqlx::query_as::<_, PunchRow>(&query)
            .bind(punch.id)
            .bind(&punch.emp_id)
            .bind(punch.work_date)
            .bind(punch.punch_in)
            .bind(&punch.note)
            .bind(punch.created_at)
            .fetch_optional(db)
            .await?;
        Ok(row.map(|row| {
            let kind = if row.inserted {
                PunchKind::In
            } else {
                PunchKind::Out
            };
            (row.record, kind)
        }))
    }

    async fn find_for_day(
        &self,
        db: &PgPool,
        emp_id: &str,
        work_date: NaiveDate,
    ) -> Result<Option<AttendanceRecord>, AppError> {
        let query = format!(
            "SELECT {} FROM attendance WHERE emp_id = $1 AND work_date = $2",
            ATTENDANCE_COLUMNS
        );
        let row = sqlx::query_as::<_, AttendanceRecord>(&query)
            .bind(emp_id)
            .bind(work_date)
            .fetch_optional(db)
            .await?;
        Ok(row)
    }

    async fn list_range(
        &self,
        db: &PgPool,
        emp_id: &str,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<AttendanceRecord>, AppError> {
        let query = format!(
            "SELECT {} FROM attendance WHERE emp_id = $1 \
             AND ($2::DATE IS NULL OR work_date >= $2) \
             AND ($3::DATE IS NULL OR work_date <= $3) \
             ORDER BY work_date DESC",
            ATTENDANCE_COLUMNS
        );
        let rows = sqlx::query_as::<_, AttendanceRecord>(&query)
            .bind(emp_id)
            .bind(from)
            .bind(to)
            .fetch_all(db)
            .await?;
        Ok(rows)
    }
}
