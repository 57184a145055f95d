//! Employee repository.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::AppError;
use crate::models::employee::Employee;

const EMPLOYEE_COLUMNS: &str = "emp_id, email, password_hash, full_name, role, department, \
     designation, supervisor_id, created_at, updated_at";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmployeeRepositoryTrait: Send + Sync {
    async fn create(&self, db: &PgPool, employee: &Employee) -> Result<Employee, AppError>;

    async fn find_by_emp_id(&self, db: &PgPool, emp_id: &str)
        -> Result<Option<Employee>, AppError>;

    async fn find_by_email(&self, db: &PgPool, email: &str) -> Result<Option<Employee>, AppError>;

    async fn list(&self, db: &PgPool, limit: i64, offset: i64) -> Result<Vec<Employee>, AppError>;

    async fn count(&self, db: &PgPool) -> Result<i64, AppError>;

    /// Employees whose supervisor is `supervisor_id`.
    async fn list_reports(&self, db: &PgPool, supervisor_id: &str)
        -> Result<Vec<Employee>, AppError>;

    async fn exists(&self, db: &PgPool, emp_id: &str) -> Result<bool, AppError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct EmployeeRepository;

impl EmployeeRepository {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EmployeeRepositoryTrait for EmployeeRepository {
    async fn create(&self, db: &PgPool, employee: &Employee) -> Result<Employee, AppError> {
        let query = format!(
            "INSERT INTO employees ({cols}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {cols}",
            cols = EMPLOYEE_COLUMNS
        );
        let row = sqlx::query_as::<_, Employee>(&query)
            .bind(&employee.emp_id)
            .bind(employee.email.to_lowercase())
            .bind(&employee.password_hash)
            .bind(&employee.full_name)
            .bind(employee.role.as_str())
            .bind(&employee.department)
            .bind(&employee.designation)
            .bind(&employee.supervisor_id)
            .bind(employee.created_at)
            .bind(employee.updated_at)
            .fetch_one(db)
            .await?;
        Ok(row)
    }

    async fn find_by_emp_id(
        &self,
        db: &PgPool,
        emp_id: &str,
    ) -> Result<Option<Employee>, AppError> {
        let query = format!("SELECT {} FROM employees WHERE emp_id = $1", EMPLOYEE_COLUMNS);
        let row = sqlx::query_as::<_, Employee>(&query)
            .bind(emp_id)
            .fetch_optional(db)
            .await?;
        Ok(row)
    }

    async fn find_by_email(&self, db: &PgPool, email: &str) -> Result<Option<Employee>, AppError> {
        let query = format!(
            "SELECT {} FROM employees WHERE email = LOWER($1)",
            EMPLOYEE_COLUMNS
        );
        let row = sqlx::query_as::<_, Employee>(&query)
            .bind(email.trim())
            .fetch_optional(db)
            .await?;
        Ok(row)
    }

    async fn list(&self, db: &PgPool, limit: i64, offset: i64) -> Result<Vec<Employee>, AppError> {
        let query = format!(
            "SELECT {} FROM employees ORDER BY emp_id LIMIT $1 OFFSET $2",
            EMPLOYEE_COLUMNS
        );
        let rows = sqlx::query_as::<_, Employee>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(db)
            .await?;
        Ok(rows)
    }

    async fn count(&self, db: &PgPool) -> Result<i64, AppError> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM employees")
            .fetch_one(db)
            .await?;
        Ok(total)
    }

    async fn list_reports(
        &self,
        db: &PgPool,
        supervisor_id: &str,
    ) -> Result<Vec<Employee>, AppError> {
        let query = format!(
            "SELECT {} FROM employees WHERE supervisor_id = $1 ORDER BY full_name",
            EMPLOYEE_COLUMNS
        );
        let rows = sqlx::query_as::<_, Employee>(&query)
            .bind(supervisor_id)
            .fetch_all(db)
            .await?;
        Ok(rows)
    }

    async fn exists(&self, db: &PgPool, emp_id: &str) -> Result<bool, AppError> {
        let found = sqlx::query_scalar::<_, i32>("SELECT 1 FROM employees WHERE emp_id = $1")
            .bind(emp_id)
            .fetch_optional(db)
            .await?
            .is_some();
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_employee_repository_is_send_sync() {
        fn check_send_sync<T: Send + Sync>() {}
        check_send_sync::<MockEmployeeRepositoryTrait>();
        check_send_sync::<EmployeeRepository>();
    }
}
