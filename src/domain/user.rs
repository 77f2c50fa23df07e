//! User aggregate and its public projection.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Role assigned to a user account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// Full access to every resource.
    Admin,
    /// Access to the caller's own resources.
    #[default]
    Basic,
}

impl Role {
    /// Returns the stored/serialized representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Basic => "BASIC",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a stored role string is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(Self::Admin),
            "BASIC" => Ok(Self::Basic),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// A stored user record, including private fields.
///
/// Never serialized directly: anything leaving the process goes through
/// [`PublicUser`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Storage key.
    pub id: i64,
    /// Public identifier used in routes and tokens.
    pub uuid: Uuid,
    /// Display name.
    pub name: String,
    /// Unique login email.
    pub email: String,
    /// Argon2 PHC string.
    pub password_hash: String,
    /// Assigned role.
    pub role: Role,
    /// Public URL of the uploaded avatar, if any.
    pub avatar: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last mutation.
    pub updated_at: DateTime<Utc>,
}

/// Fields required to insert a user. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Argon2 PHC string.
    pub password_hash: String,
    /// Assigned role.
    pub role: Role,
}

/// Partial update of a user; `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    /// New display name.
    pub name: Option<String>,
    /// New role.
    pub role: Option<Role>,
    /// New avatar URL.
    pub avatar: Option<String>,
}

impl UserChanges {
    /// Returns `true` when no field would change.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.role.is_none() && self.avatar.is_none()
    }
}

/// Whitelisted view of a [`User`].
///
/// This is the only user representation that is ever serialized: REST
/// responses and the `userUpdated` notification both use it, so the
/// password hash, avatar and timestamps cannot leak through either.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PublicUser {
    /// Storage key, echoed read-only.
    pub id: i64,
    /// Public identifier.
    pub uuid: Uuid,
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Assigned role.
    pub role: Role,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            uuid: user.uuid,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            uuid: user.uuid,
            name: user.name,
            email: user.email,
            role: user.role,
        }
    }
}
