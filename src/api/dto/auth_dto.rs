//! Signup and login payloads.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::IssuedToken;
use crate::domain::{PublicUser, Role};
use crate::service::CreateUser;

/// Request body for `POST /auth/signup`.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SignupRequest {
    /// Display name.
    #[validate(length(min = 1, max = 255, message = "name must be 1-255 characters"))]
    pub name: String,
    /// Login email.
    #[validate(email(message = "must be a valid email"))]
    pub email: String,
    /// Plaintext password.
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: String,
    /// Defaults to `BASIC`. Other roles need `SIGNUP_ROLE_SELECTION=true`.
    #[serde(default)]
    pub role: Option<Role>,
}

impl From<SignupRequest> for CreateUser {
    fn from(req: SignupRequest) -> Self {
        Self {
            name: req.name,
            email: req.email,
            password: req.password,
            role: req.role.unwrap_or_default(),
        }
    }
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    /// Login email.
    #[validate(email(message = "must be a valid email"))]
    pub email: String,
    /// Plaintext password.
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

/// A signed access token.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    /// Bearer token.
    pub token: String,
    /// Lifetime in seconds.
    pub expires_in: u64,
}

impl From<IssuedToken> for TokenResponse {
    fn from(issued: IssuedToken) -> Self {
        Self {
            token: issued.token,
            expires_in: issued.expires_in,
        }
    }
}

/// Response body for `POST /auth/signup`.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupResponse {
    /// The created account.
    pub user: PublicUser,
    /// Bearer token.
    pub token: String,
    /// Lifetime in seconds.
    pub expires_in: u64,
}
