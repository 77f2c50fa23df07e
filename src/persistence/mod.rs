//! Persistence layer: repository traits with PostgreSQL and in-memory
//! backends.
//!
//! Services only see `Arc<dyn UserRepository>` / `Arc<dyn PostRepository>`.
//! The PostgreSQL backend is used in production; the in-memory backend
//! serves local development (`PERSISTENCE_ENABLED=false`) and the tests.

pub mod memory;
pub mod models;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{NewPost, NewUser, Post, User, UserChanges};
use crate::error::AppError;

pub use memory::{InMemoryPostRepository, InMemoryUserRepository};
pub use postgres::{PgPostRepository, PgUserRepository};

/// Storage capability for user records.
#[async_trait]
pub trait UserRepository: Send + Sync + std::fmt::Debug {
    /// Inserts a new user and returns the stored record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the email is already registered,
    /// or [`AppError::Persistence`] on backend failure.
    async fn create(&self, user: NewUser) -> Result<User, AppError>;

    /// Looks up a user by public UUID.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on backend failure.
    async fn find_by_uuid(&self, uuid: Uuid) -> Result<Option<User>, AppError>;

    /// Looks up a user by email.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on backend failure.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Returns every user ordered by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on backend failure.
    async fn list(&self) -> Result<Vec<User>, AppError>;

    /// Applies `changes` and returns the updated record, or `None` if no
    /// user has this UUID.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on backend failure.
    async fn update(&self, uuid: Uuid, changes: UserChanges) -> Result<Option<User>, AppError>;

    /// Deletes a user. Returns `false` if nothing was deleted.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on backend failure.
    async fn delete(&self, uuid: Uuid) -> Result<bool, AppError>;
}

/// Storage capability for posts.
#[async_trait]
pub trait PostRepository: Send + Sync + std::fmt::Debug {
    /// Inserts a new post and returns the stored record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on backend failure.
    async fn create(&self, post: NewPost) -> Result<Post, AppError>;

    /// Looks up a post by public UUID.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on backend failure.
    async fn find_by_uuid(&self, uuid: Uuid) -> Result<Option<Post>, AppError>;

    /// Returns every post ordered by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on backend failure.
    async fn list(&self) -> Result<Vec<Post>, AppError>;

    /// Returns the posts written by `author_id`, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on backend failure.
    async fn list_by_author(&self, author_id: i64) -> Result<Vec<Post>, AppError>;

    /// Replaces the text of a post, or returns `None` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on backend failure.
    async fn update(&self, uuid: Uuid, text: Option<String>) -> Result<Option<Post>, AppError>;

    /// Deletes a post. Returns `false` if nothing was deleted.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on backend failure.
    async fn delete(&self, uuid: Uuid) -> Result<bool, AppError>;
}
