//! PostgreSQL implementation of the repositories.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::models::{PostRow, UserRow};
use super::{PostRepository, UserRepository};
use crate::domain::{NewPost, NewUser, Post, User, UserChanges};
use crate::error::AppError;

const USER_COLUMNS: &str =
    "id, uuid, name, email, password, role, avatar, created_at, updated_at";
const POST_COLUMNS: &str = "id, uuid, text, author_id, created_at, updated_at";

/// Applies the embedded schema migrations.
///
/// # Errors
///
/// Returns [`AppError::Persistence`] if a migration fails.
pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| AppError::Persistence(format!("migration failed: {e}")))
}

/// Users backed by the `users` table.
#[derive(Debug, Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Creates a repository on the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, AppError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "INSERT INTO users (uuid, name, email, password, role) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {USER_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .fetch_one(&self.pool)
        .await?;

        User::try_from(row)
    }

    async fn find_by_uuid(&self, uuid: Uuid) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, UserRow>(&format!("SELECT {USER_COLUMNS} FROM users WHERE uuid = $1"))
            .bind(uuid)
            .fetch_optional(&self.pool)
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?
        .map(User::try_from)
        .transpose()
    }

    async fn list(&self) -> Result<Vec<User>, AppError> {
        sqlx::query_as::<_, UserRow>(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY id ASC"))
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(User::try_from)
            .collect()
    }

    async fn update(&self, uuid: Uuid, changes: UserChanges) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, UserRow>(&format!(
            "UPDATE users SET \
               name = COALESCE($2, name), \
               role = COALESCE($3, role), \
               avatar = COALESCE($4, avatar), \
               updated_at = now() \
             WHERE uuid = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(uuid)
        .bind(changes.name)
        .bind(changes.role.map(|r| r.as_str()))
        .bind(changes.avatar)
        .fetch_optional(&self.pool)
        .await?
        .map(User::try_from)
        .transpose()
    }

    async fn delete(&self, uuid: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM users WHERE uuid = $1")
            .bind(uuid)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Posts backed by the `posts` table.
#[derive(Debug, Clone)]
pub struct PgPostRepository {
    pool: PgPool,
}

impl PgPostRepository {
    /// Creates a repository on the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostRepository for PgPostRepository {
    async fn create(&self, post: NewPost) -> Result<Post, AppError> {
        let row = sqlx::query_as::<_, PostRow>(&format!(
            "INSERT INTO posts (uuid, text, author_id) VALUES ($1, $2, $3) RETURNING {POST_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(&post.text)
        .bind(post.author_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn find_by_uuid(&self, uuid: Uuid) -> Result<Option<Post>, AppError> {
        let row = sqlx::query_as::<_, PostRow>(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE uuid = $1"
        ))
        .bind(uuid)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Post::from))
    }

    async fn list(&self) -> Result<Vec<Post>, AppError> {
        let rows =
            sqlx::query_as::<_, PostRow>(&format!("SELECT {POST_COLUMNS} FROM posts ORDER BY id ASC"))
                .fetch_all(&self.pool)
                .await?;

        Ok(rows.into_iter().map(Post::from).collect())
    }

    async fn list_by_author(&self, author_id: i64) -> Result<Vec<Post>, AppError> {
        let rows = sqlx::query_as::<_, PostRow>(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE author_id = $1 ORDER BY id ASC"
        ))
        .bind(author_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Post::from).collect())
    }

    async fn update(&self, uuid: Uuid, text: Option<String>) -> Result<Option<Post>, AppError> {
        let row = sqlx::query_as::<_, PostRow>(&format!(
            "UPDATE posts SET text = COALESCE($2, text), updated_at = now() \
             WHERE uuid = $1 RETURNING {POST_COLUMNS}"
        ))
        .bind(uuid)
        .bind(text)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Post::from))
    }

    async fn delete(&self, uuid: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM posts WHERE uuid = $1")
            .bind(uuid)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
