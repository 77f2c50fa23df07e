//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::auth::JwtService;
use crate::service::{AuthService, HealthService, PostService, UserService};
use crate::ws::ConnectionRegistry;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
///
/// Built once by the entry point (or a test) from explicitly constructed
/// collaborators.
#[derive(Debug, Clone)]
pub struct AppState {
    /// User CRUD, avatars, and change broadcasts.
    pub user_service: Arc<UserService>,
    /// Signup and login.
    pub auth_service: Arc<AuthService>,
    /// Post CRUD.
    pub post_service: Arc<PostService>,
    /// Health probes.
    pub health: Arc<HealthService>,
    /// Token verification for the `AuthUser` extractor.
    pub jwt: JwtService,
    /// Registry that WebSocket connections join.
    pub connections: ConnectionRegistry,
    /// Per-connection outbound queue size.
    pub ws_outbound_buffer: usize,
}
