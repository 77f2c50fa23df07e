//! System endpoints: liveness and database health.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;
use crate::service::HealthStatus;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    status: HealthStatus,
}

/// `GET /health` — Service liveness.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse),
    )
)]
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: state.health.check(),
    })
}

/// `GET /health/db` — Database reachability.
#[utoipa::path(
    get,
    path = "/health/db",
    tag = "System",
    summary = "Database health check",
    description = "Runs `SELECT 1`. Always answers 200; the body carries `OK` or `FAIL`.",
    responses(
        (status = 200, description = "Database status", body = HealthResponse),
    )
)]
pub async fn db_health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: state.health.check_db().await,
    })
}

/// System routes mounted at the root level (not under /api/v1).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/health/db", get(db_health_handler))
}
