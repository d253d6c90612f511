//! Relevance validation: a second, independent model call that asks whether
//! the generated plan actually addresses the goal.
//!
//! Only an answer containing "no" rejects. Anything else, including a
//! failed call or an unparseable judgement, accepts.

use tracing::{info, warn};

use crate::model::GenerativeModel;

use super::prompt::build_relevance_prompt;
use super::types::Plan;

/// Outcome of a relevance check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelevanceVerdict {
    /// The model did not object.
    Accepted,
    /// The model call failed; accepted by policy.
    AcceptedOnError,
    /// The model judged the plan unrelated to the goal.
    Rejected,
    /// The plan has no task titles to judge.
    EmptyPlan,
}

impl RelevanceVerdict {
    pub fn is_accepted(self) -> bool {
        matches!(self, Self::Accepted | Self::AcceptedOnError)
    }
}

/// All task titles across all phases, space-separated.
pub fn plan_summary(plan: &Plan) -> String {
    plan.tasks_in_order()
        .map(|(_, task)| task.task_title.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Whether a model answer counts as a "no".
///
/// Substring match, case-insensitive: "No.", "NO", and "Not really" all
/// reject, and so does any answer that merely contains the letters.
pub fn is_negative_judgement(response: &str) -> bool {
    response.to_lowercase().contains("no")
}

/// Judge a plan against its goal.
pub async fn assess_relevance(
    model: &dyn GenerativeModel,
    goal_title: &str,
    plan: &Plan,
) -> RelevanceVerdict {
    let summary = plan_summary(plan);
    if summary.trim().is_empty() {
        warn!(goal = goal_title, "plan has no actionable tasks");
        return RelevanceVerdict::EmptyPlan;
    }

    let prompt = build_relevance_prompt(goal_title, &summary);
    match model.generate(&prompt).await {
        Ok(answer) if is_negative_judgement(&answer) => {
            info!(goal = goal_title, answer = answer.trim(), "plan judged irrelevant to goal");
            RelevanceVerdict::Rejected
        }
        Ok(_) => RelevanceVerdict::Accepted,
        Err(e) => {
            warn!(
                model = model.name(),
                error = %format!("{e:#}"),
                "relevance check failed, accepting plan"
            );
            RelevanceVerdict::AcceptedOnError
        }
    }
}

/// Accept or reject a plan. Never fails.
pub async fn validate_plan(model: &dyn GenerativeModel, goal_title: &str, plan: &Plan) -> bool {
    assess_relevance(model, goal_title, plan).await.is_accepted()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ScriptedModel, ScriptedReply};
    use crate::plan::types::{Phase, PlannedTask};

    fn task(title: &str) -> PlannedTask {
        PlannedTask {
            task_title: title.to_string(),
            description: None,
            due_date: None,
        }
    }

    fn plan_with(titles: &[&str]) -> Plan {
        Plan {
            phases: vec![Phase {
                phase_title: "Week 1".to_string(),
                tasks: titles.iter().map(|t| task(t)).collect(),
            }],
        }
    }

    // -- plan_summary --

    #[test]
    fn summary_joins_titles_with_spaces() {
        assert_eq!(plan_summary(&plan_with(&["A", "B"])), "A B");
    }

    #[test]
    fn summary_spans_phases() {
        let mut plan = plan_with(&["A"]);
        plan.phases.push(Phase {
            phase_title: "Week 2".to_string(),
            tasks: vec![task("B"), task("C")],
        });
        assert_eq!(plan_summary(&plan), "A B C");
    }

    #[test]
    fn summary_of_empty_plan_is_empty() {
        assert_eq!(plan_summary(&Plan { phases: vec![] }), "");
    }

    // -- is_negative_judgement --

    #[test]
    fn negative_detection_is_substring_and_case_insensitive() {
        assert!(is_negative_judgement("No, this is unrelated."));
        assert!(is_negative_judgement("NO"));
        assert!(is_negative_judgement("I do not know"));
        assert!(!is_negative_judgement("Yes, this aligns."));
        assert!(!is_negative_judgement("Maybe, hard to say."));
    }

    // -- assess_relevance / validate_plan --

    async fn verdict_for(reply: ScriptedReply) -> RelevanceVerdict {
        let model = ScriptedModel::new([reply]);
        assess_relevance(&model, "Learn Spanish", &plan_with(&["A", "B"])).await
    }

    #[tokio::test]
    async fn explicit_no_rejects() {
        assert_eq!(
            verdict_for(ScriptedReply::Text("No, this is unrelated.".into())).await,
            RelevanceVerdict::Rejected
        );
    }

    #[tokio::test]
    async fn yes_accepts() {
        assert_eq!(
            verdict_for(ScriptedReply::Text("Yes, this aligns.".into())).await,
            RelevanceVerdict::Accepted
        );
    }

    #[tokio::test]
    async fn hedged_answer_without_no_accepts() {
        assert_eq!(
            verdict_for(ScriptedReply::Text("Maybe, hard to say.".into())).await,
            RelevanceVerdict::Accepted
        );
    }

    #[tokio::test]
    async fn model_failure_accepts() {
        let verdict = verdict_for(ScriptedReply::Fail("connection reset".into())).await;
        assert_eq!(verdict, RelevanceVerdict::AcceptedOnError);
        assert!(verdict.is_accepted());
    }

    #[tokio::test]
    async fn empty_summary_rejects_without_calling_model() {
        let model = ScriptedModel::texts(["Yes"]);
        let plan = plan_with(&["", "  "]);

        assert!(!validate_plan(&model, "Learn Spanish", &plan).await);
        assert!(model.prompts().is_empty());
    }

    #[tokio::test]
    async fn validation_prompt_carries_goal_and_summary() {
        let model = ScriptedModel::texts(["Yes"]);
        assert!(validate_plan(&model, "Learn Spanish", &plan_with(&["A", "B"])).await);

        let prompts = model.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Learn Spanish"));
        assert!(prompts[0].contains("\"A B\""));
    }
}
