//! REST endpoint handlers organized by resource.

pub mod auth;
pub mod post;
pub mod system;
pub mod user;

use axum::Router;

use crate::app_state::AppState;

/// Composes all resource routes under `/api/v1`.
pub fn routes(avatar_max_bytes: usize) -> Router<AppState> {
    Router::new()
        .merge(auth::routes())
        .merge(user::routes(avatar_max_bytes))
        .merge(post::routes())
}
