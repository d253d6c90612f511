//! Goal creation and retrieval on top of the plan pipeline.

pub mod lifecycle;
pub mod service;

pub use lifecycle::{CreationStage, CreationTracker};
pub use service::{
    CreateGoalError, GoalDetail, PhaseTasks, PlanRejected, create_goal, get_goal_detail,
    group_by_phase, list_goal_details, persist_plan,
};
