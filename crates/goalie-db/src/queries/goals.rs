//! Database query functions for the `goals` table.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::SqlitePool;
use sqlx::sqlite::SqliteExecutor;

use crate::models::Goal;

/// Insert a new goal row. Returns the inserted goal with its assigned id.
///
/// Accepts any executor so callers can insert inside a transaction.
pub async fn insert_goal<'e, E>(
    executor: E,
    title: &str,
    start_date: NaiveDate,
    created_at: DateTime<Utc>,
) -> Result<Goal>
where
    E: SqliteExecutor<'e>,
{
    let goal = sqlx::query_as::<_, Goal>(
        "INSERT INTO goals (title, start_date, created_at) \
         VALUES (?1, ?2, ?3) \
         RETURNING *",
    )
    .bind(title)
    .bind(start_date)
    .bind(created_at)
    .fetch_one(executor)
    .await
    .context("failed to insert goal")?;

    Ok(goal)
}

/// Fetch a goal by its ID.
pub async fn get_goal(pool: &SqlitePool, id: i64) -> Result<Option<Goal>> {
    let goal = sqlx::query_as::<_, Goal>("SELECT * FROM goals WHERE id = ?1")
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("failed to fetch goal")?;

    Ok(goal)
}

/// List all goals, newest first.
pub async fn list_goals(pool: &SqlitePool) -> Result<Vec<Goal>> {
    let goals = sqlx::query_as::<_, Goal>("SELECT * FROM goals ORDER BY created_at DESC, id DESC")
        .fetch_all(pool)
        .await
        .context("failed to list goals")?;

    Ok(goals)
}

/// Delete a goal and, through the foreign-key cascade, all of its tasks.
///
/// Returns `true` if a row was removed.
pub async fn delete_goal(pool: &SqlitePool, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM goals WHERE id = ?1")
        .bind(id)
        .execute(pool)
        .await
        .context("failed to delete goal")?;

    Ok(result.rows_affected() > 0)
}
