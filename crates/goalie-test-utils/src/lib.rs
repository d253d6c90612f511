//! Shared test utilities for goalie integration tests.
//!
//! Every test gets its own private in-memory SQLite database with all
//! migrations applied, so tests never share state and need no external
//! services.

use chrono::NaiveDate;
use sqlx::SqlitePool;

use goalie_db::config::DbConfig;
use goalie_db::pool;

/// Create a fresh in-memory database with migrations applied.
///
/// The pool holds a single connection for its whole lifetime; dropping or
/// closing the pool discards the database.
pub async fn create_test_db() -> SqlitePool {
    let config = DbConfig::new(DbConfig::MEMORY_URL);
    let test_pool = pool::create_pool(&config)
        .await
        .expect("failed to open in-memory database");

    pool::run_migrations(&test_pool)
        .await
        .expect("migrations should succeed");

    test_pool
}

/// A fixed start date used throughout the test suites.
pub fn start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 6).expect("valid date")
}

/// A well-formed two-phase, four-task plan in the model's JSON format.
pub const TWO_PHASE_PLAN_JSON: &str = r#"{
  "phases": [
    {
      "phase_title": "Week 1: Foundations",
      "tasks": [
        {"task_title": "Learn greetings", "description": "Practice basic greetings.", "due_date": "2025-01-08"},
        {"task_title": "Study numbers", "description": "Memorise numbers one to twenty.", "due_date": "2025-01-10"}
      ]
    },
    {
      "phase_title": "Week 2: Conversation",
      "tasks": [
        {"task_title": "Order food", "description": "Role-play ordering at a cafe.", "due_date": "2025-01-15"},
        {"task_title": "Hold a chat", "description": "Have a five-minute conversation.", "due_date": "2025-01-17"}
      ]
    }
  ]
}"#;
