//! Operator-mode CLI handlers for goals and tasks.
//!
//! Implements:
//! - `goalie goals list`          -- list all goals with completion
//! - `goalie goals show <id>`     -- show one goal with tasks grouped by phase
//! - `goalie goals delete <id>`   -- delete a goal and its tasks
//! - `goalie toggle <task-id>`    -- flip a task's completed flag
//! - `goalie plan <goal>`         -- generate and validate a plan without storing it

use std::fmt::Write as _;

use anyhow::{Result, bail};
use chrono::NaiveDate;
use sqlx::SqlitePool;

use goalie_core::goal::{GoalDetail, get_goal_detail, list_goal_details};
use goalie_core::model::GenerativeModel;
use goalie_core::plan::{Plan, RelevanceVerdict, assess_relevance, build_plan};
use goalie_db::queries::{goals as goal_queries, tasks as task_queries};

use crate::GoalCommands;

// -----------------------------------------------------------------------
// Public entry points
// -----------------------------------------------------------------------

/// Dispatch a `GoalCommands` variant to the appropriate handler.
pub async fn run_goal_command(command: GoalCommands, pool: &SqlitePool) -> Result<()> {
    match command {
        GoalCommands::List => cmd_list(pool).await,
        GoalCommands::Show { goal_id } => cmd_show(pool, goal_id).await,
        GoalCommands::Delete { goal_id } => cmd_delete(pool, goal_id).await,
    }
}

/// Flip the completed flag on a task and report the new state.
pub async fn run_toggle(pool: &SqlitePool, task_id: i64) -> Result<()> {
    let Some(completed) = task_queries::toggle_task(pool, task_id).await? else {
        bail!("task {task_id} not found");
    };
    let state = if completed { "completed" } else { "not completed" };
    println!("Task {task_id} marked {state}.");
    Ok(())
}

/// Run the generator and validator for a goal and print the result without
/// writing anything to the database.
pub async fn run_plan_dry_run(
    model: &dyn GenerativeModel,
    goal_title: &str,
    start_date: NaiveDate,
) -> Result<()> {
    let plan = build_plan(model, goal_title, start_date).await?;
    let verdict = assess_relevance(model, goal_title, &plan).await;

    println!("{}", serde_json::to_string_pretty(&plan)?);
    println!();
    print!("{}", format_verdict(&plan, verdict));
    Ok(())
}

// -----------------------------------------------------------------------
// goalie goals list / show / delete
// -----------------------------------------------------------------------

async fn cmd_list(pool: &SqlitePool) -> Result<()> {
    let details = list_goal_details(pool).await?;
    if details.is_empty() {
        println!("No goals found. Create one with `POST /api/goals` or preview a plan with `goalie plan`.");
        return Ok(());
    }
    print!("{}", format_goal_list(&details));
    Ok(())
}

async fn cmd_show(pool: &SqlitePool, goal_id: i64) -> Result<()> {
    let Some(detail) = get_goal_detail(pool, goal_id).await? else {
        bail!("goal {goal_id} not found");
    };
    print!("{}", format_goal_detail(&detail));
    Ok(())
}

async fn cmd_delete(pool: &SqlitePool, goal_id: i64) -> Result<()> {
    if goal_queries::delete_goal(pool, goal_id).await? {
        println!("Goal {goal_id} deleted.");
    } else {
        println!("Goal {goal_id} did not exist; nothing deleted.");
    }
    Ok(())
}

// -----------------------------------------------------------------------
// Formatting
// -----------------------------------------------------------------------

fn percent(completion: f64) -> String {
    format!("{:.0}%", completion * 100.0)
}

/// One row per goal: id, completion, task count, start date, title.
pub fn format_goal_list(details: &[GoalDetail]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<6} {:>5} {:>6}  {:<10}  TITLE",
        "ID", "DONE", "TASKS", "START"
    );
    for d in details {
        let _ = writeln!(
            out,
            "{:<6} {:>5} {:>6}  {:<10}  {}",
            d.goal.id,
            percent(d.completion),
            d.task_count(),
            d.goal.start_date.format("%Y-%m-%d"),
            d.goal.title,
        );
    }
    out
}

/// Goal header followed by its tasks grouped under each phase.
pub fn format_goal_detail(detail: &GoalDetail) -> String {
    let mut out = String::new();
    let goal = &detail.goal;
    let _ = writeln!(out, "Goal: {}", goal.title);
    let _ = writeln!(out, "  ID:          {}", goal.id);
    let _ = writeln!(out, "  Start date:  {}", goal.start_date.format("%Y-%m-%d"));
    let _ = writeln!(out, "  Created:     {}", goal.created_at.format("%Y-%m-%d %H:%M:%S UTC"));
    let _ = writeln!(
        out,
        "  Completion:  {} ({} tasks)",
        percent(detail.completion),
        detail.task_count()
    );

    for phase in &detail.phases {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", phase.title);
        for task in &phase.tasks {
            let mark = if task.completed { "x" } else { " " };
            let due = task.due_date.as_deref().unwrap_or("-");
            let _ = writeln!(out, "  [{mark}] {:<10}  {}  (task {})", due, task.title, task.id);
        }
    }
    out
}

fn format_verdict(plan: &Plan, verdict: RelevanceVerdict) -> String {
    let phases = plan.phases.len();
    let tasks = plan.task_count();
    match verdict {
        RelevanceVerdict::Accepted => {
            format!("Plan accepted: {phases} phases, {tasks} tasks.\n")
        }
        RelevanceVerdict::AcceptedOnError => format!(
            "Plan accepted: {phases} phases, {tasks} tasks (relevance check unavailable).\n"
        ),
        RelevanceVerdict::Rejected => {
            "Plan rejected: the model judged it unrelated to the goal.\n".to_string()
        }
        RelevanceVerdict::EmptyPlan => "Plan rejected: it contains no tasks.\n".to_string(),
    }
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------
