//! REST API layer: route handlers, DTOs, extractors, and router composition.
//!
//! Resource endpoints are mounted under `/api/v1`; health checks sit at
//! the root.

pub mod dto;
pub mod extractors;
pub mod handlers;
pub mod openapi;

use axum::Router;

use crate::app_state::AppState;

/// Builds the complete API router with all REST endpoints.
pub fn build_router(avatar_max_bytes: usize) -> Router<AppState> {
    Router::new()
        .nest("/api/v1", handlers::routes(avatar_max_bytes))
        .merge(handlers::system::routes())
}
