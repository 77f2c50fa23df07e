//! Post service: CRUD with per-author ownership.
//!
//! Handlers check the `*:own` permission; this service adds the ownership
//! rule on top. Acting on someone else's post needs the matching `*:all`
//! permission.

use std::sync::Arc;

use uuid::Uuid;

use crate::auth::{Claims, Permission, grants_all};
use crate::domain::{NewPost, Post};
use crate::error::AppError;
use crate::persistence::{PostRepository, UserRepository};

/// Orchestrates post operations on behalf of an authenticated caller.
#[derive(Debug, Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    users: Arc<dyn UserRepository>,
}

impl PostService {
    /// Creates a new `PostService`.
    #[must_use]
    pub fn new(posts: Arc<dyn PostRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { posts, users }
    }

    /// Creates a post authored by `actor`.
    ///
    /// A token outlives its account, so the author is looked up first.
    ///
    /// # Errors
    ///
    /// [`AppError::Unauthorized`] if the caller's account no longer exists;
    /// [`AppError::Persistence`] on backend failure.
    pub async fn create(&self, actor: &Claims, text: String) -> Result<Post, AppError> {
        let Some(author) = self.users.find_by_uuid(actor.sub).await? else {
            tracing::warn!(user = %actor.sub, "post rejected, author no longer exists");
            return Err(AppError::unauthorized());
        };
        let post = self
            .posts
            .create(NewPost {
                text,
                author_id: author.id,
            })
            .await?;
        tracing::info!(post = %post.uuid, author = %actor.sub, "post created");
        Ok(post)
    }

    /// Lists the caller's posts, or every post if they hold `read:all`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on backend failure.
    pub async fn list(&self, actor: &Claims) -> Result<Vec<Post>, AppError> {
        if grants_all(actor.role, &[Permission::ReadAll]) {
            self.posts.list().await
        } else {
            self.posts.list_by_author(actor.id).await
        }
    }

    /// Fetches one post.
    ///
    /// # Errors
    ///
    /// [`AppError::NotFound`] if missing; [`AppError::Forbidden`] if the
    /// caller is not the author and lacks `read:all`.
    pub async fn get(&self, actor: &Claims, uuid: Uuid) -> Result<Post, AppError> {
        let post = self.find(uuid).await?;
        authorize(actor, &post, Permission::ReadAll)?;
        Ok(post)
    }

    /// Replaces a post's text when `text` is present.
    ///
    /// # Errors
    ///
    /// [`AppError::NotFound`] if missing; [`AppError::Forbidden`] if the
    /// caller is not the author and lacks `write:all`.
    pub async fn update(
        &self,
        actor: &Claims,
        uuid: Uuid,
        text: Option<String>,
    ) -> Result<Post, AppError> {
        let post = self.find(uuid).await?;
        authorize(actor, &post, Permission::WriteAll)?;
        let updated = self.posts.update(uuid, text).await?.ok_or_else(not_found)?;
        tracing::info!(post = %uuid, "post updated");
        Ok(updated)
    }

    /// Deletes a post.
    ///
    /// # Errors
    ///
    /// [`AppError::NotFound`] if missing; [`AppError::Forbidden`] if the
    /// caller is not the author and lacks `delete:all`.
    pub async fn delete(&self, actor: &Claims, uuid: Uuid) -> Result<(), AppError> {
        let post = self.find(uuid).await?;
        authorize(actor, &post, Permission::DeleteAll)?;
        if !self.posts.delete(uuid).await? {
            return Err(not_found());
        }
        tracing::info!(post = %uuid, "post deleted");
        Ok(())
    }

    async fn find(&self, uuid: Uuid) -> Result<Post, AppError> {
        self.posts.find_by_uuid(uuid).await?.ok_or_else(not_found)
    }
}

fn authorize(actor: &Claims, post: &Post, override_with: Permission) -> Result<(), AppError> {
    if post.author_id == actor.id || grants_all(actor.role, &[override_with]) {
        Ok(())
    } else {
        Err(AppError::insufficient_permissions())
    }
}

fn not_found() -> AppError {
    AppError::NotFound("Post not found".to_string())
}
