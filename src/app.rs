//! Router assembly: REST, WebSocket, docs, and middleware.

use std::time::Duration;

use axum::Router;
use axum::http::header::AUTHORIZATION;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::sensitive_headers::SetSensitiveRequestHeadersLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::app_state::AppState;
use crate::config::AppConfig;
use crate::ws::handler::ws_handler;

/// HTTP-level knobs the router needs.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    /// Body limit on the avatar upload route.
    pub avatar_max_bytes: usize,
    /// Per-request timeout.
    pub request_timeout: Duration,
    /// Allow any origin when `true`; otherwise no CORS headers are sent.
    pub cors_permissive: bool,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            avatar_max_bytes: 10 * 1024 * 1024,
            request_timeout: Duration::from_secs(30),
            cors_permissive: false,
        }
    }
}

impl From<&AppConfig> for HttpSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            avatar_max_bytes: config.avatar_max_bytes,
            request_timeout: Duration::from_secs(config.request_timeout_secs),
            cors_permissive: config.cors_permissive,
        }
    }
}

/// Builds the full application router.
pub fn build_app(state: AppState, settings: &HttpSettings) -> Router {
    let cors = if settings.cors_permissive {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
    };

    let router = Router::new()
        .merge(api::build_router(settings.avatar_max_bytes))
        .route("/ws/conn", get(ws_handler));

    with_docs(router)
        .layer(TimeoutLayer::new(settings.request_timeout))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(SetSensitiveRequestHeadersLayer::new([AUTHORIZATION]))
        .with_state(state)
}

#[cfg(feature = "swagger-ui")]
fn with_docs(router: Router<AppState>) -> Router<AppState> {
    use utoipa::OpenApi;
    use utoipa_swagger_ui::SwaggerUi;

    router.merge(SwaggerUi::new("/api-docs").url("/openapi.json", api::openapi::ApiDoc::openapi()))
}

#[cfg(not(feature = "swagger-ui"))]
fn with_docs(router: Router<AppState>) -> Router<AppState> {
    router
}
