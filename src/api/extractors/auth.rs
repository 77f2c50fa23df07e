//! `AuthUser` extractor: verifies the bearer token and exposes its claims.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use uuid::Uuid;

use crate::app_state::AppState;
use crate::auth::{Claims, Permission, grants_all};
use crate::error::AppError;

/// The authenticated caller.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// Returns the verified claims.
    #[must_use]
    pub const fn claims(&self) -> &Claims {
        &self.0
    }

    /// Returns `true` if the caller's role grants `permission`.
    #[must_use]
    pub fn can(&self, permission: Permission) -> bool {
        grants_all(self.0.role, &[permission])
    }

    /// Returns `true` if the caller is the user identified by `uuid`.
    #[must_use]
    pub fn is(&self, uuid: Uuid) -> bool {
        self.0.sub == uuid
    }

    /// Requires every permission in `required`.
    ///
    /// # Errors
    ///
    /// Returns a 403 [`AppError::Forbidden`] if any is missing.
    pub fn require(&self, required: &[Permission]) -> Result<(), AppError> {
        if grants_all(self.0.role, required) {
            Ok(())
        } else {
            tracing::debug!(user = %self.0.sub, role = %self.0.role, ?required, "permission denied");
            Err(AppError::insufficient_permissions())
        }
    }

    /// Allows `all` for anyone, or `own` when the caller is `target`.
    ///
    /// # Errors
    ///
    /// Returns a 403 [`AppError::Forbidden`] otherwise.
    pub fn require_self_or(
        &self,
        target: Uuid,
        own: Permission,
        all: Permission,
    ) -> Result<(), AppError> {
        if self.is(target) {
            self.require(&[own])
        } else {
            self.require(&[all])
        }
    }
}

impl std::ops::Deref for AuthUser {
    type Target = Claims;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(AppError::unauthorized)?;

        let token = header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(AppError::unauthorized)?;

        state.jwt.verify(token).map(AuthUser)
    }
}
