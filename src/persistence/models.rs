//! Database row models for the `users` and `posts` tables.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Post, Role, User};
use crate::error::AppError;

/// A row from the `users` table. `role` is stored as text.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    /// Auto-increment row ID.
    pub id: i64,
    /// Public identifier.
    pub uuid: Uuid,
    /// Display name.
    pub name: String,
    /// Unique email.
    pub email: String,
    /// Argon2 PHC string.
    pub password: String,
    /// `ADMIN` or `BASIC`.
    pub role: String,
    /// Public avatar URL.
    pub avatar: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = AppError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role: Role = row
            .role
            .parse()
            .map_err(|e| AppError::Persistence(format!("user {}: {e}", row.uuid)))?;
        Ok(Self {
            id: row.id,
            uuid: row.uuid,
            name: row.name,
            email: row.email,
            password_hash: row.password,
            role,
            avatar: row.avatar,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// A row from the `posts` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PostRow {
    /// Auto-increment row ID.
    pub id: i64,
    /// Public identifier.
    pub uuid: Uuid,
    /// Post body.
    pub text: String,
    /// Owning user's row ID.
    pub author_id: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        Self {
            id: row.id,
            uuid: row.uuid,
            text: row.text,
            author_id: row.author_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
