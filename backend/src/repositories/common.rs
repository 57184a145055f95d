//! Shared repository utilities.

use sqlx::{PgConnection, Postgres, QueryBuilder};

use crate::error::AppError;
use crate::models::workflow::{ensure_transition, WorkflowStatus};

/// Appends WHERE or AND to the query builder depending on whether a clause has already been added.
pub fn push_clause(builder: &mut QueryBuilder<'_, Postgres>, has_clause: &mut bool) {
    if *has_clause {
        builder.push(" AND ");
    } else {
        builder.push(" WHERE ");
        *has_clause = true;
    }
}

/// Reads the current status of a row and holds its lock until the
/// surrounding transaction ends.
pub async fn lock_status<S>(
    conn: &mut PgConnection,
    table: &str,
    id: &str,
) -> Result<Option<S>, sqlx::Error>
where
    S: for<'r> sqlx::Decode<'r, Postgres> + sqlx::Type<Postgres> + Send + Unpin,
{
    let query = format!("SELECT status FROM {} WHERE id = $1 FOR UPDATE", table);
    sqlx::query_scalar::<_, S>(&query)
        .bind(id)
        .fetch_optional(conn)
        .await
}

/// Locks the row, then checks `current -> next` against the transition table.
pub async fn lock_and_check_transition<S>(
    conn: &mut PgConnection,
    table: &str,
    id: &str,
    next: S,
    not_found: &str,
) -> Result<S, AppError>
where
    S: WorkflowStatus + for<'r> sqlx::Decode<'r, Postgres> + sqlx::Type<Postgres> + Send + Unpin,
{
    let current: S = lock_status(conn, table, id)
        .await?
        .ok_or_else(|| AppError::NotFound(not_found.to_string()))?;
    ensure_transition(current, next)?;
    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_clause_switches_from_where_to_and() {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("SELECT * FROM t");
        let mut has_clause = false;
        push_clause(&mut builder, &mut has_clause);
        builder.push("a = 1");
        push_clause(&mut builder, &mut has_clause);
        builder.push("b = 2");
        assert_eq!(builder.sql(), "SELECT * FROM t WHERE a = 1 AND b = 2");
    }
}
