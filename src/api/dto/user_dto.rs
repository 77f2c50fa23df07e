//! User request and response bodies.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::domain::{Role, User, UserChanges};
use crate::service::CreateUser;

/// Request body for `POST /users`.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    /// Display name.
    #[validate(length(min = 3, max = 255, message = "name must be 3-255 characters"))]
    pub name: String,
    /// Login email.
    #[validate(email(message = "must be a valid email"))]
    pub email: String,
    /// Initial password.
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: String,
    /// Defaults to `BASIC`.
    #[serde(default)]
    pub role: Option<Role>,
}

impl From<CreateUserRequest> for CreateUser {
    fn from(req: CreateUserRequest) -> Self {
        Self {
            name: req.name,
            email: req.email,
            password: req.password,
            role: req.role.unwrap_or_default(),
        }
    }
}

/// Request body for `PATCH /users/{uuid}`. Absent fields are left as is.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    /// New display name.
    #[validate(length(min = 3, max = 70, message = "name must be 3-70 characters"))]
    pub name: Option<String>,
    /// New role; needs `write:all`.
    pub role: Option<Role>,
}

impl From<UpdateUserRequest> for UserChanges {
    fn from(req: UpdateUserRequest) -> Self {
        Self {
            name: req.name,
            role: req.role,
            avatar: None,
        }
    }
}

/// A user's avatar URL.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AvatarResponse {
    /// Owner.
    pub uuid: Uuid,
    /// Public URL, if one was uploaded.
    pub avatar: Option<String>,
}

impl From<&User> for AvatarResponse {
    fn from(user: &User) -> Self {
        Self {
            uuid: user.uuid,
            avatar: user.avatar.clone(),
        }
    }
}
