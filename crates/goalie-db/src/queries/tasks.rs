//! Database query functions for the `tasks` table.

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use sqlx::sqlite::SqliteExecutor;

use crate::models::{GoalProgress, NewTask, Task};

/// Insert a new task row. Returns the inserted task with server-generated
/// defaults (id, completed).
pub async fn insert_task<'e, E>(executor: E, task: &NewTask<'_>) -> Result<Task>
where
    E: SqliteExecutor<'e>,
{
    let row = sqlx::query_as::<_, Task>(
        "INSERT INTO tasks (goal_id, phase, title, description, due_date, \"order\") \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6) \
         RETURNING *",
    )
    .bind(task.goal_id)
    .bind(task.phase)
    .bind(task.title)
    .bind(task.description)
    .bind(task.due_date)
    .bind(task.order)
    .fetch_one(executor)
    .await
    .with_context(|| format!("failed to insert task {:?}", task.title))?;

    Ok(row)
}

/// Fetch a single task by ID.
pub async fn get_task(pool: &SqlitePool, id: i64) -> Result<Option<Task>> {
    let task = sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE id = ?1")
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("failed to fetch task")?;

    Ok(task)
}

/// List all tasks for a goal, ordered by due date and then by plan order.
pub async fn list_tasks_for_goal(pool: &SqlitePool, goal_id: i64) -> Result<Vec<Task>> {
    let tasks = sqlx::query_as::<_, Task>(
        "SELECT * FROM tasks WHERE goal_id = ?1 ORDER BY due_date, \"order\"",
    )
    .bind(goal_id)
    .fetch_all(pool)
    .await
    .context("failed to list tasks for goal")?;

    Ok(tasks)
}

/// Flip the `completed` flag of a task.
///
/// Returns the new value, or `None` when the task does not exist.
pub async fn toggle_task(pool: &SqlitePool, id: i64) -> Result<Option<bool>> {
    let completed: Option<(bool,)> = sqlx::query_as(
        "UPDATE tasks SET completed = NOT completed WHERE id = ?1 RETURNING completed",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .context("failed to toggle task")?;

    Ok(completed.map(|(c,)| c))
}

/// Count completed and total tasks for a goal.
pub async fn get_goal_progress(pool: &SqlitePool, goal_id: i64) -> Result<GoalProgress> {
    let progress = sqlx::query_as::<_, GoalProgress>(
        "SELECT COALESCE(SUM(CASE WHEN completed THEN 1 ELSE 0 END), 0) AS completed, \
                COUNT(*) AS total \
         FROM tasks WHERE goal_id = ?1",
    )
    .bind(goal_id)
    .fetch_one(pool)
    .await
    .context("failed to compute goal progress")?;

    Ok(progress)
}

/// Count tasks for a goal.
pub async fn count_tasks_for_goal(pool: &SqlitePool, goal_id: i64) -> Result<i64> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tasks WHERE goal_id = ?1")
        .bind(goal_id)
        .fetch_one(pool)
        .await
        .context("failed to count tasks")?;

    Ok(row.0)
}
