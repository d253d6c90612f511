//! Plan pipeline: duration estimation, prompt construction, generation and
//! relevance validation.

pub mod generate;
pub mod prompt;
pub mod types;
pub mod validate;

pub use generate::{
    PlanGenerationError, build_plan, clean_model_output, parse_plan, plan_from_response,
    request_plan,
};
pub use prompt::{DEFAULT_DURATION_WEEKS, build_plan_prompt, build_relevance_prompt, estimate_duration_weeks};
pub use types::{Phase, Plan, PlannedTask};
pub use validate::{RelevanceVerdict, assess_relevance, is_negative_judgement, plan_summary, validate_plan};
