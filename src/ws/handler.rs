//! Axum WebSocket upgrade handler.

use axum::extract::State;
use axum::extract::ws::WebSocketUpgrade;
use axum::response::IntoResponse;

use super::connection::run_connection;
use crate::app_state::AppState;

/// `GET /ws/conn` — Upgrade to a notification channel.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    let registry = state.connections.clone();
    let buffer = state.ws_outbound_buffer;

    ws.on_upgrade(move |socket| run_connection(socket, registry, buffer))
}
