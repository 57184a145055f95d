//! Seeds the first HR login so approver routes can be reached on a fresh
//! database. Idempotent: an existing employee with the same ID is left alone.

use anyhow::Context;
use std::env;

use hrdesk_backend::{
    config::Config,
    db::connection::create_pool,
    models::employee::{Employee, Role},
    repositories::employee::{EmployeeRepository, EmployeeRepositoryTrait},
    utils::password::hash_password,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "create_admin=info,hrdesk_backend=info".into()),
        )
        .init();

    let config = Config::load()?;
    let pool = create_pool(&config.database_url, config.database_max_connections).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let emp_id = env::var("ADMIN_EMP_ID").unwrap_or_else(|_| "HR-0001".to_string());
    let email = env::var("ADMIN_EMAIL")
        .unwrap_or_else(|_| "hr@example.com".to_string())
        .to_ascii_lowercase();
    let password = env::var("ADMIN_PASSWORD").context("ADMIN_PASSWORD must be set")?;
    let full_name = env::var("ADMIN_NAME").unwrap_or_else(|_| "HR Administrator".to_string());

    let repo = EmployeeRepository::new();
    if repo
        .exists(&pool, &emp_id)
        .await
        .context("looking up the admin account")?
    {
        tracing::info!(emp_id = %emp_id, "admin account already present");
        return Ok(());
    }

    let employee = Employee::new(
        emp_id,
        email,
        hash_password(&password)?,
        full_name,
        Role::Hr,
    );
    let created = repo
        .create(&pool, &employee)
        .await
        .context("creating the admin account")?;
    tracing::info!(emp_id = %created.emp_id, email = %created.email, "admin account created");

    Ok(())
}
