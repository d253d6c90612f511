//! Plan generation: one model call, cleanup, and strict parsing.

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{error, info};

use crate::model::GenerativeModel;

use super::prompt::{build_plan_prompt, estimate_duration_weeks};
use super::types::Plan;

/// The model could not produce a usable plan.
///
/// Both variants render the same message; the cause is logged where it
/// happens and never carried to the caller.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlanGenerationError {
    /// The model call itself failed.
    #[error("failed to get a valid plan from the AI service")]
    ModelUnavailable,
    /// The model answered, but not with a plan.
    #[error("failed to get a valid plan from the AI service")]
    Malformed,
}

/// Strip whitespace and Markdown code fences from a model response.
pub fn clean_model_output(raw: &str) -> String {
    raw.trim()
        .replace("```json", "")
        .replace("```", "")
        .trim()
        .to_string()
}

/// Parse a raw model response into a [`Plan`].
///
/// The response must be a JSON object with a `phases` array once fences are
/// removed; anything else is an error. Nothing partial is ever returned.
pub fn parse_plan(raw: &str) -> Result<Plan, serde_json::Error> {
    serde_json::from_str(&clean_model_output(raw))
}

/// Ask the model for a plan and return its raw answer.
///
/// Estimates the duration from the goal text, builds the prompt and calls
/// the model once.
pub async fn request_plan(
    model: &dyn GenerativeModel,
    goal_title: &str,
    start_date: NaiveDate,
) -> Result<String, PlanGenerationError> {
    let weeks = estimate_duration_weeks(goal_title);
    let prompt = build_plan_prompt(goal_title, start_date, weeks);

    info!(model = model.name(), goal = goal_title, weeks, "requesting plan");

    model.generate(&prompt).await.map_err(|e| {
        error!(model = model.name(), error = %format!("{e:#}"), "plan request failed");
        PlanGenerationError::ModelUnavailable
    })
}

/// Turn a raw model answer into a [`Plan`], logging the parse failure.
pub fn plan_from_response(raw: &str) -> Result<Plan, PlanGenerationError> {
    let plan = parse_plan(raw).map_err(|e| {
        error!(
            error = %e,
            response_len = raw.len(),
            "failed to parse plan from model response"
        );
        PlanGenerationError::Malformed
    })?;

    info!(
        phases = plan.phases.len(),
        tasks = plan.task_count(),
        "plan generated"
    );
    Ok(plan)
}

/// Generate a plan for a goal: [`request_plan`] then [`plan_from_response`].
pub async fn build_plan(
    model: &dyn GenerativeModel,
    goal_title: &str,
    start_date: NaiveDate,
) -> Result<Plan, PlanGenerationError> {
    let raw = request_plan(model, goal_title, start_date).await?;
    plan_from_response(&raw)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ScriptedModel, ScriptedReply};

    const PLAN_JSON: &str = r#"{"phases": [{"phase_title": "Week 1", "tasks": [
        {"task_title": "A", "description": "first", "due_date": "2025-01-07"},
        {"task_title": "B", "description": "second", "due_date": "2025-01-09"}
    ]}]}"#;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 6).unwrap()
    }

    // -- clean_model_output / parse_plan --

    #[test]
    fn fenced_output_parses_like_bare_json() {
        let fenced = format!("\n  ```json\n{PLAN_JSON}\n```  \n");
        assert_eq!(parse_plan(&fenced).unwrap(), parse_plan(PLAN_JSON).unwrap());

        let bare_fence = format!("```\n{PLAN_JSON}\n```");
        assert_eq!(parse_plan(&bare_fence).unwrap(), parse_plan(PLAN_JSON).unwrap());
    }

    #[test]
    fn clean_strips_fences_and_whitespace() {
        assert_eq!(clean_model_output("  ```json\n{}\n```\n"), "{}");
    }

    #[test]
    fn empty_response_is_an_error() {
        assert!(parse_plan("").is_err());
        assert!(parse_plan("```json\n```").is_err());
    }

    #[test]
    fn truncated_json_is_an_error() {
        let truncated = &PLAN_JSON[..PLAN_JSON.len() / 2];
        assert!(parse_plan(truncated).is_err());
    }

    #[test]
    fn json_without_phases_object_is_an_error() {
        assert!(parse_plan("[1, 2, 3]").is_err());
        assert!(parse_plan("\"phases\"").is_err());
        assert!(parse_plan(r#"{"steps": []}"#).is_err());
        assert!(parse_plan(r#"{"phases": null}"#).is_err());
    }

    #[test]
    fn prose_around_json_is_an_error() {
        assert!(parse_plan(&format!("Here is your plan:\n{PLAN_JSON}")).is_err());
    }

    // -- build_plan --

    #[tokio::test]
    async fn build_plan_returns_parsed_plan() {
        let model = ScriptedModel::texts([format!("```json\n{PLAN_JSON}\n```")]);
        let plan = build_plan(&model, "Learn Spanish in 3 weeks", date())
            .await
            .unwrap();

        assert_eq!(plan.phases.len(), 1);
        assert_eq!(plan.task_count(), 2);

        let prompts = model.prompts();
        assert_eq!(prompts.len(), 1, "exactly one model call");
        assert!(prompts[0].contains("approximately 3 weeks"));
        assert!(prompts[0].contains("2025-01-06"));
    }

    #[tokio::test]
    async fn build_plan_maps_model_failure() {
        let model = ScriptedModel::new([ScriptedReply::Fail("quota exceeded".into())]);
        let err = build_plan(&model, "Learn Spanish", date()).await.unwrap_err();
        assert_eq!(err, PlanGenerationError::ModelUnavailable);
        assert!(!err.to_string().contains("quota"));
    }

    #[tokio::test]
    async fn request_plan_returns_raw_text() {
        let model = ScriptedModel::texts(["```json\n{}\n```"]);
        let raw = request_plan(&model, "Learn Spanish", date()).await.unwrap();
        assert_eq!(raw, "```json\n{}\n```");
    }

    #[test]
    fn plan_from_response_maps_parse_failure() {
        assert_eq!(
            plan_from_response("not json").unwrap_err(),
            PlanGenerationError::Malformed
        );
        assert_eq!(plan_from_response(PLAN_JSON).unwrap().task_count(), 2);
    }

    #[tokio::test]
    async fn build_plan_maps_parse_failure() {
        let model = ScriptedModel::texts(["I'm sorry, I can't help with that."]);
        let err = build_plan(&model, "Learn Spanish", date()).await.unwrap_err();
        assert_eq!(err, PlanGenerationError::Malformed);
        assert_eq!(err.to_string(), "failed to get a valid plan from the AI service");
    }
}
