use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Row structs
// ---------------------------------------------------------------------------

/// A goal -- the user's stated objective.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Goal {
    pub id: i64,
    pub title: String,
    pub start_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// A task generated for a goal.
///
/// `due_date` is kept verbatim from the model output and may not be a
/// well-formed calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: i64,
    pub goal_id: i64,
    pub phase: String,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<String>,
    pub completed: bool,
    pub order: i64,
}

/// Insert payload for a task row.
#[derive(Debug, Clone, Copy)]
pub struct NewTask<'a> {
    pub goal_id: i64,
    pub phase: &'a str,
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub due_date: Option<&'a str>,
    pub order: i64,
}

/// Completed vs. total task counts for a goal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromRow)]
pub struct GoalProgress {
    pub completed: i64,
    pub total: i64,
}

impl GoalProgress {
    /// Fraction of tasks completed, in `[0.0, 1.0]`. A goal with no tasks
    /// reports `0.0`.
    pub fn completion(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
