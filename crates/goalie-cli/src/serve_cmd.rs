use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, patch};
use axum::{Json, Router};
use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::SqlitePool;
use tower_http::cors::CorsLayer;

use goalie_core::goal::{self, CreateGoalError};
use goalie_core::model::GenerativeModel;
use goalie_db::pool::ping;
use goalie_db::queries::{goals as goal_db, tasks as task_db};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.into(),
        }
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.into(),
        }
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::SERVICE_UNAVAILABLE,
            message: msg.into(),
        }
    }

    pub fn internal(err: anyhow::Error) -> Self {
        tracing::error!(error = %format!("{err:#}"), "request failed");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: format!("{err:#}"),
        }
    }
}

impl From<CreateGoalError> for AppError {
    fn from(err: CreateGoalError) -> Self {
        match err {
            CreateGoalError::Generation(e) => Self::unavailable(e.to_string()),
            CreateGoalError::Storage(e) => Self::internal(e),
            rejected => Self::bad_request(rejected.to_string()),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let body = serde_json::json!({ "error": self.message });
        (self.status, Json(body)).into_response()
    }
}

// ---------------------------------------------------------------------------
// State and request types
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub model: Arc<dyn GenerativeModel>,
}

#[derive(Debug, Deserialize)]
pub struct CreateGoalRequest {
    pub title: String,
    pub start_date: NaiveDate,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/goals", get(list_goals).post(create_goal))
        .route("/api/goals/{id}", get(get_goal).delete(delete_goal))
        .route("/api/tasks/{id}/toggle", patch(toggle_task))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub async fn run_serve(state: AppState, bind: &str, port: u16) -> Result<()> {
    let model_name = state.model.name().to_string();
    let app = build_router(state);
    let addr: SocketAddr = format!("{bind}:{port}").parse()?;
    tracing::info!(model = %model_name, "goalie serve listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("goalie serve shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for Ctrl+C");
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn health(State(state): State<AppState>) -> Result<axum::response::Response, AppError> {
    ping(&state.pool).await.map_err(AppError::internal)?;
    Ok(Json(serde_json::json!({ "status": "ok" })).into_response())
}

async fn create_goal(
    State(state): State<AppState>,
    body: Result<Json<CreateGoalRequest>, JsonRejection>,
) -> Result<axum::response::Response, AppError> {
    let Json(req) = body?;
    let detail = goal::create_goal(&state.pool, state.model.as_ref(), &req.title, req.start_date)
        .await?;
    Ok(Json(detail).into_response())
}

async fn list_goals(State(state): State<AppState>) -> Result<axum::response::Response, AppError> {
    let details = goal::list_goal_details(&state.pool)
        .await
        .map_err(AppError::internal)?;
    Ok(Json(details).into_response())
}

async fn get_goal(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<axum::response::Response, AppError> {
    let Path(id) = path?;
    let detail = goal::get_goal_detail(&state.pool, id)
        .await
        .map_err(AppError::internal)?
        .ok_or_else(|| AppError::not_found("Goal not found"))?;
    Ok(Json(detail).into_response())
}

async fn delete_goal(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let Path(id) = path?;
    let deleted = goal_db::delete_goal(&state.pool, id)
        .await
        .map_err(AppError::internal)?;
    if deleted {
        tracing::info!(goal_id = id, "goal deleted");
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn toggle_task(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let Path(id) = path?;
    let completed = task_db::toggle_task(&state.pool, id)
        .await
        .map_err(AppError::internal)?
        .ok_or_else(|| AppError::not_found("Task not found"))?;
    tracing::debug!(task_id = id, completed, "task toggled");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
