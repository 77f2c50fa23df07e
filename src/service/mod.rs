//! Service layer: business logic orchestration.
//!
//! Services receive their collaborators explicitly at construction.
//! [`UserService`] is the only one that talks to the
//! [`crate::ws::ConnectionRegistry`]: it broadcasts every user change
//! after the write succeeds.

pub mod auth_service;
pub mod health_service;
pub mod post_service;
pub mod user_service;

pub use auth_service::AuthService;
pub use health_service::{HealthService, HealthStatus};
pub use post_service::PostService;
pub use user_service::{AVATAR_CONTENT_TYPES, AvatarUpload, CreateUser, UserService};
