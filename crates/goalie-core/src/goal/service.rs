//! Goal service layer.
//!
//! Runs the plan pipeline for a new goal and, when the plan is accepted,
//! stores the goal and its tasks within a single database transaction.
//! Also assembles the read model (goal + completion + tasks grouped by
//! phase) served by the HTTP layer.

use anyhow::{Context, anyhow};
use chrono::{NaiveDate, Utc};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{error, info};

use goalie_db::models::{Goal, NewTask, Task};
use goalie_db::queries::{goals as goal_queries, tasks as task_queries};

use crate::model::GenerativeModel;
use crate::plan::{
    Plan, PlanGenerationError, RelevanceVerdict, assess_relevance, plan_from_response, request_plan,
};

use super::lifecycle::{CreationStage, CreationTracker};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// The generated plan was judged not to address the goal, or had no tasks.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error(
    "The AI could not create a meaningful plan for this goal. \
     Please try a more specific or different goal."
)]
pub struct PlanRejected {
    pub verdict: RelevanceVerdict,
}

/// Why a goal could not be created.
#[derive(Debug, Error)]
pub enum CreateGoalError {
    #[error("goal title must not be empty")]
    EmptyTitle,

    #[error(transparent)]
    Generation(#[from] PlanGenerationError),

    #[error(transparent)]
    Rejected(#[from] PlanRejected),

    #[error("database error: {0:#}")]
    Storage(#[from] anyhow::Error),
}

// ---------------------------------------------------------------------------
// Read model
// ---------------------------------------------------------------------------

/// Tasks sharing a phase title, in display order.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseTasks {
    pub title: String,
    pub tasks: Vec<Task>,
}

/// A goal with its completion ratio and tasks grouped by phase.
///
/// Serializes `phases` as a JSON object keyed by phase title, keeping the
/// phases in order of first appearance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalDetail {
    #[serde(flatten)]
    pub goal: Goal,
    pub completion: f64,
    #[serde(serialize_with = "serialize_phases")]
    pub phases: Vec<PhaseTasks>,
}

impl GoalDetail {
    pub fn task_count(&self) -> usize {
        self.phases.iter().map(|p| p.tasks.len()).sum()
    }
}

fn serialize_phases<S: Serializer>(phases: &[PhaseTasks], serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(phases.len()))?;
    for phase in phases {
        map.serialize_entry(&phase.title, &phase.tasks)?;
    }
    map.end()
}

/// Group tasks by phase title, preserving the order in which each phase is
/// first seen and the order of tasks within it.
pub fn group_by_phase(tasks: Vec<Task>) -> Vec<PhaseTasks> {
    let mut groups: Vec<PhaseTasks> = Vec::new();
    for task in tasks {
        match groups.iter_mut().find(|g| g.title == task.phase) {
            Some(group) => group.tasks.push(task),
            None => groups.push(PhaseTasks {
                title: task.phase.clone(),
                tasks: vec![task],
            }),
        }
    }
    groups
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Create a goal: generate a plan, check its relevance, then persist it.
///
/// The two model calls run one after the other. A rejected plan is
/// discarded without touching the database.
pub async fn create_goal(
    pool: &SqlitePool,
    model: &dyn GenerativeModel,
    title: &str,
    start_date: NaiveDate,
) -> Result<GoalDetail, CreateGoalError> {
    if title.trim().is_empty() {
        return Err(CreateGoalError::EmptyTitle);
    }

    let mut tracker = CreationTracker::start();

    let raw = match request_plan(model, title, start_date).await {
        Ok(raw) => {
            tracker.advance(CreationStage::PlanGenerated);
            raw
        }
        Err(e) => {
            tracker.advance(CreationStage::GenerationFailed);
            return Err(e.into());
        }
    };

    let plan = match plan_from_response(&raw) {
        Ok(plan) => plan,
        Err(e) => {
            tracker.advance(CreationStage::GenerationFailed);
            return Err(e.into());
        }
    };

    let verdict = assess_relevance(model, title, &plan).await;
    if !verdict.is_accepted() {
        tracker.advance(CreationStage::Rejected);
        info!(goal = title, ?verdict, "plan rejected, nothing stored");
        return Err(PlanRejected { verdict }.into());
    }
    tracker.advance(CreationStage::Validated);

    let goal = persist_plan(pool, title, start_date, &plan).await?;
    tracker.advance(CreationStage::Persisted);

    info!(
        goal_id = goal.id,
        tasks = plan.task_count(),
        stage = %tracker.stage(),
        "goal created"
    );

    match get_goal_detail(pool, goal.id).await {
        Ok(Some(detail)) => Ok(detail),
        Ok(None) => {
            error!(goal_id = goal.id, "goal stored but missing on read-back");
            Err(anyhow!("goal {} was stored but could not be found", goal.id).into())
        }
        Err(e) => {
            error!(goal_id = goal.id, error = %format!("{e:#}"), "goal stored but read-back failed");
            Err(e
                .context(format!("goal {} was stored but could not be read back", goal.id))
                .into())
        }
    }
}

/// Store a goal and every task of its plan.
///
/// Tasks receive `order` indices 0..n in phase-then-task order. Runs in one
/// transaction; if any insert fails nothing is written.
pub async fn persist_plan(
    pool: &SqlitePool,
    title: &str,
    start_date: NaiveDate,
    plan: &Plan,
) -> anyhow::Result<Goal> {
    let mut tx = pool.begin().await.context("failed to begin transaction")?;

    let goal = goal_queries::insert_goal(&mut *tx, title, start_date, Utc::now()).await?;

    for (order, (phase, task)) in plan.tasks_in_order().enumerate() {
        let new_task = NewTask {
            goal_id: goal.id,
            phase,
            title: &task.task_title,
            description: task.description.as_deref(),
            due_date: task.due_date.as_deref(),
            order: order as i64,
        };
        task_queries::insert_task(&mut *tx, &new_task).await?;
    }

    tx.commit().await.context("failed to commit transaction")?;

    Ok(goal)
}

/// Fetch a goal with its tasks and completion ratio.
pub async fn get_goal_detail(pool: &SqlitePool, goal_id: i64) -> anyhow::Result<Option<GoalDetail>> {
    let Some(goal) = goal_queries::get_goal(pool, goal_id).await? else {
        return Ok(None);
    };
    Ok(Some(assemble(pool, goal).await?))
}

/// Every goal, newest first, with tasks and completion.
pub async fn list_goal_details(pool: &SqlitePool) -> anyhow::Result<Vec<GoalDetail>> {
    let goals = goal_queries::list_goals(pool).await?;
    let mut details = Vec::with_capacity(goals.len());
    for goal in goals {
        details.push(assemble(pool, goal).await?);
    }
    Ok(details)
}

async fn assemble(pool: &SqlitePool, goal: Goal) -> anyhow::Result<GoalDetail> {
    let tasks = task_queries::list_tasks_for_goal(pool, goal.id).await?;
    let progress = task_queries::get_goal_progress(pool, goal.id).await?;
    Ok(GoalDetail {
        goal,
        completion: progress.completion(),
        phases: group_by_phase(tasks),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: i64, phase: &str, order: i64) -> Task {
        Task {
            id,
            goal_id: 1,
            phase: phase.to_string(),
            title: format!("t{id}"),
            description: None,
            due_date: None,
            completed: false,
            order,
        }
    }

    #[test]
    fn group_by_phase_keeps_first_seen_order() {
        let groups = group_by_phase(vec![
            task(1, "Week 2", 2),
            task(2, "Week 1", 0),
            task(3, "Week 2", 3),
        ]);
        let titles: Vec<&str> = groups.iter().map(|g| g.title.as_str()).collect();
        assert_eq!(titles, vec!["Week 2", "Week 1"]);
        assert_eq!(groups[0].tasks.len(), 2);
        assert_eq!(groups[0].tasks[1].id, 3);
    }

    #[test]
    fn group_by_phase_of_nothing_is_empty() {
        assert!(group_by_phase(vec![]).is_empty());
    }

    #[test]
    fn detail_serializes_phases_as_object_in_order() {
        let detail = GoalDetail {
            goal: Goal {
                id: 1,
                title: "Learn".to_string(),
                start_date: NaiveDate::from_ymd_opt(2025, 1, 6).unwrap(),
                created_at: Utc::now(),
            },
            completion: 0.5,
            phases: group_by_phase(vec![task(1, "Zeta", 0), task(2, "Alpha", 1)]),
        };

        let json = serde_json::to_string(&detail).unwrap();
        let zeta = json.find("\"Zeta\"").unwrap();
        let alpha = json.find("\"Alpha\"").unwrap();
        assert!(zeta < alpha, "phase order must be preserved: {json}");

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["id"], 1);
        assert_eq!(value["title"], "Learn");
        assert_eq!(value["start_date"], "2025-01-06");
        assert_eq!(value["completion"], 0.5);
        assert_eq!(value["phases"]["Zeta"][0]["order"], 0);
    }

    #[test]
    fn rejection_message_guides_the_user() {
        let msg = PlanRejected {
            verdict: RelevanceVerdict::Rejected,
        }
        .to_string();
        assert!(msg.contains("could not create a meaningful plan"));
        assert!(msg.contains("more specific or different goal"));
    }
}
