//! Duration estimation and prompt construction.
//!
//! Pure logic, no I/O. The due-date arithmetic is left entirely to the
//! model; this module only tells it where to start and roughly how long
//! the plan should run.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

/// Duration assumed when the goal text carries no "in N weeks/months" hint.
pub const DEFAULT_DURATION_WEEKS: u32 = 4;

const WEEKS_PER_MONTH: u32 = 4;

/// Matches "in 3 weeks", "in 2 Months", "within 1 week", ...
static DURATION_HINT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)in (\d+)\s+(week|month)s?").expect("duration regex is valid")
});

/// Estimate how many weeks the goal should take.
///
/// Looks for the first "in N week(s)" or "in N month(s)" phrase; a month
/// counts as four weeks. Anything else, including a zero or absurdly large
/// N, yields [`DEFAULT_DURATION_WEEKS`].
pub fn estimate_duration_weeks(goal_title: &str) -> u32 {
    let Some(caps) = DURATION_HINT.captures(goal_title) else {
        return DEFAULT_DURATION_WEEKS;
    };

    let Ok(n) = caps[1].parse::<u32>() else {
        return DEFAULT_DURATION_WEEKS;
    };

    let weeks = if caps[2].eq_ignore_ascii_case("month") {
        n.checked_mul(WEEKS_PER_MONTH)
    } else {
        Some(n)
    };

    weeks.filter(|w| *w > 0).unwrap_or(DEFAULT_DURATION_WEEKS)
}

/// JSON contract the model must follow.
const PLAN_SCHEMA: &str = r#"{
  "phases": [
    {
      "phase_title": "string",
      "tasks": [
        {
          "task_title": "string",
          "description": "string",
          "due_date": "YYYY-MM-DD"
        }
      ]
    }
  ]
}"#;

/// Build the plan-generation prompt.
pub fn build_plan_prompt(goal_title: &str, start_date: NaiveDate, duration_weeks: u32) -> String {
    let mut prompt = String::with_capacity(1536);

    prompt.push_str("Act as an expert project manager.\n\n");
    prompt.push_str(&format!("The user's goal is: \"{goal_title}\".\n"));
    prompt.push_str(&format!(
        "They want to start on {}.\n",
        start_date.format("%Y-%m-%d")
    ));
    prompt.push_str(&format!(
        "The goal should be completed in approximately {duration_weeks} weeks.\n\n"
    ));

    prompt.push_str(
        "Create a detailed, actionable plan. Break it down into logical phases \
         (for example \"Week 1: Foundations\", \"Week 2: Core Concepts\"). \
         For each phase, list specific tasks. Every task must have:\n",
    );
    prompt.push_str("1. A short, clear `task_title`.\n");
    prompt.push_str("2. A one-sentence `description` explaining its purpose.\n");
    prompt.push_str(
        "3. A `due_date` calculated from the start date and logical progression. \
         Distribute tasks evenly.\n\n",
    );

    prompt.push_str(
        "Return the entire plan as a single, valid JSON object. \
         Do not include any text or markdown before or after the JSON.\n",
    );
    prompt.push_str("The JSON structure must be:\n");
    prompt.push_str(PLAN_SCHEMA);
    prompt.push('\n');

    prompt
}

/// Build the yes/no relevance question for the validator.
pub fn build_relevance_prompt(goal_title: &str, plan_summary: &str) -> String {
    format!(
        "Original goal: \"{goal_title}\"\n\
         Generated plan summary: \"{plan_summary}\"\n\n\
         Is the generated plan a direct and logical breakdown of the original goal?\n\
         Answer ONLY with the word \"Yes\" or \"No\".\n"
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
