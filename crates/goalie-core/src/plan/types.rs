//! The plan shape the model is asked to produce.
//!
//! Field names follow the JSON contract given to the model, so these types
//! deserialize the cleaned model output directly.

use serde::{Deserialize, Serialize};

/// Title given to phases the model left unnamed.
pub const UNNAMED_PHASE: &str = "Unnamed Phase";

/// A generated plan: phases in the order the model listed them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub phases: Vec<Phase>,
}

/// A named group of tasks, e.g. one week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    #[serde(default = "unnamed_phase")]
    pub phase_title: String,
    #[serde(default)]
    pub tasks: Vec<PlannedTask>,
}

/// One task as described by the model.
///
/// `due_date` is whatever string the model produced; it is neither parsed
/// nor checked against the goal's duration. A missing or `null`
/// description is kept as `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedTask {
    pub task_title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
}

fn unnamed_phase() -> String {
    UNNAMED_PHASE.to_string()
}

impl Plan {
    /// Every task paired with its phase title, phase-major.
    pub fn tasks_in_order(&self) -> impl Iterator<Item = (&str, &PlannedTask)> {
        self.phases
            .iter()
            .flat_map(|p| p.tasks.iter().map(move |t| (p.phase_title.as_str(), t)))
    }

    pub fn task_count(&self) -> usize {
        self.phases.iter().map(|p| p.tasks.len()).sum()
    }
}
