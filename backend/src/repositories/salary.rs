//! Payslip repository.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{types::Json, PgPool};

use crate::error::AppError;
use crate::models::salary::{merge_amounts, AmountMap, Salary};
use crate::repositories::transaction::{begin_transaction, commit_transaction};

const SALARY_COLUMNS: &str = "id, emp_id, pay_date, total_days_worked, total_hours_worked, \
     earnings, deductions, created_at, updated_at";

/// Which JSON column an amount update targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountColumn {
    Earnings,
    Deductions,
}

impl AmountColumn {
    fn column(&self) -> &'static str {
        match self {
            AmountColumn::Earnings => "earnings",
            AmountColumn::Deductions => "deductions",
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SalaryRepositoryTrait: Send + Sync {
    async fn create(&self, db: &PgPool, salary: &Salary) -> Result<Salary, AppError>;

    /// Newest pay date first.
    async fn find_by_employee(&self, db: &PgPool, emp_id: &str) -> Result<Vec<Salary>, AppError>;

    /// Merges named amounts into the employee's most recent payslip.
    async fn update_latest_amounts(
        &self,
        db: &PgPool,
        emp_id: &str,
        column: AmountColumn,
        entries: Vec<(String, f64)>,
    ) -> Result<Salary, AppError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SalaryRepository;

impl SalaryRepository {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SalaryRepositoryTrait for SalaryRepository {
    async fn create(&self, db: &PgPool, salary: &Salary) -> Result<Salary, AppError> {
        let query = format!(
            "INSERT INTO salaries ({cols}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {cols}",
            cols = SALARY_COLUMNS
        );
        let row = sqlx::query_as::<_, Salary>(&query)
            .bind(salary.id)
            .bind(&salary.emp_id)
            .bind(salary.pay_date)
            .bind(salary.total_days_worked)
            .bind(salary.total_hours_worked)
            .bind(&salary.earnings)
            .bind(&salary.deductions)
            .bind(salary.created_at)
            .bind(salary.updated_at)
            .fetch_one(db)
            .await?;
        Ok(row)
    }

    async fn find_by_employee(&self, db: &PgPool, emp_id: &str) -> Result<Vec<Salary>, AppError> {
        let query = format!(
            "SELECT {} FROM salaries WHERE emp_id = $1 ORDER BY pay_date DESC, created_at DESC",
            SALARY_COLUMNS
        );
        let rows = sqlx::query_as::<_, Salary>(&query)
            .bind(emp_id)
            .fetch_all(db)
            .await?;
        Ok(rows)
    }

    async fn update_latest_amounts(
        &self,
        db: &PgPool,
        emp_id: &str,
        column: AmountColumn,
        entries: Vec<(String, f64)>,
    ) -> Result<Salary, AppError> {
        let mut tx = begin_transaction(db).await?;
        let select = format!(
            "SELECT {} FROM salaries WHERE emp_id = $1 \
             ORDER BY pay_date DESC, created_at DESC LIMIT 1 FOR UPDATE",
            SALARY_COLUMNS
        );
        let latest = sqlx::query_as::<_, Salary>(&select)
            .bind(emp_id)
            .fetch_optional(tx.as_mut())
            .await?
            .ok_or_else(|| AppError::NotFound("No salary record for employee".into()))?;

        let mut amounts: AmountMap = match column {
            AmountColumn::Earnings => latest.earnings.0,
            AmountColumn::Deductions => latest.deductions.0,
        };
        let borrowed: Vec<(&str, f64)> = entries
            .iter()
            .map(|(name, value)| (name.as_str(), *value))
            .collect();
        merge_amounts(&mut amounts, &borrowed);

        let update = format!(
            "UPDATE salaries SET {} = $1, updated_at = $2 WHERE id = $3 RETURNING {}",
            column.column(),
            SALARY_COLUMNS
        );
        let row = sqlx::query_as::<_, Salary>(&update)
            .bind(Json(amounts))
            .bind(Utc::now())
            .bind(latest.id)
            .fetch_one(tx.as_mut())
            .await?;
        commit_transaction(tx).await?;
        Ok(row)
    }
}
