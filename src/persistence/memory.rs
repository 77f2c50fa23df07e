//! In-memory repositories for local development and tests.
//!
//! Each repository keeps its records in a `RwLock<HashMap<Uuid, _>>` and
//! hands out ids from an atomic sequence, mirroring `BIGSERIAL`. Email
//! uniqueness is enforced under the write lock so concurrent signups
//! behave like the database's unique constraint.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{PostRepository, UserRepository};
use crate::domain::{NewPost, NewUser, Post, User, UserChanges};
use crate::error::AppError;

/// Users held in process memory.
#[derive(Debug)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<Uuid, User>>,
    next_id: AtomicI64,
}

impl InMemoryUserRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, AppError> {
        let mut map = self.users.write().await;
        if map.values().any(|u| u.email == user.email) {
            return Err(AppError::Conflict("Resource already exists".to_string()));
        }

        let now = Utc::now();
        let stored = User {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            uuid: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            avatar: None,
            created_at: now,
            updated_at: now,
        };
        map.insert(stored.uuid, stored.clone());
        Ok(stored)
    }

    async fn find_by_uuid(&self, uuid: Uuid) -> Result<Option<User>, AppError> {
        Ok(self.users.read().await.get(&uuid).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let map = self.users.read().await;
        Ok(map.values().find(|u| u.email == email).cloned())
    }

    async fn list(&self) -> Result<Vec<User>, AppError> {
        let map = self.users.read().await;
        let mut users: Vec<User> = map.values().cloned().collect();
        users.sort_by_key(|u| u.id);
        Ok(users)
    }

    async fn update(&self, uuid: Uuid, changes: UserChanges) -> Result<Option<User>, AppError> {
        let mut map = self.users.write().await;
        let Some(user) = map.get_mut(&uuid) else {
            return Ok(None);
        };
        if let Some(name) = changes.name {
            user.name = name;
        }
        if let Some(role) = changes.role {
            user.role = role;
        }
        if let Some(avatar) = changes.avatar {
            user.avatar = Some(avatar);
        }
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }

    async fn delete(&self, uuid: Uuid) -> Result<bool, AppError> {
        Ok(self.users.write().await.remove(&uuid).is_some())
    }
}

/// Posts held in process memory.
///
/// Unlike the database there is no foreign key to `users`; deleting a user
/// leaves its posts in place.
#[derive(Debug)]
pub struct InMemoryPostRepository {
    posts: RwLock<HashMap<Uuid, Post>>,
    next_id: AtomicI64,
}

impl InMemoryPostRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            posts: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    fn sorted(mut posts: Vec<Post>) -> Vec<Post> {
        posts.sort_by_key(|p| p.id);
        posts
    }
}

impl Default for InMemoryPostRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn create(&self, post: NewPost) -> Result<Post, AppError> {
        let now = Utc::now();
        let stored = Post {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            uuid: Uuid::new_v4(),
            text: post.text,
            author_id: post.author_id,
            created_at: now,
            updated_at: now,
        };
        self.posts.write().await.insert(stored.uuid, stored.clone());
        Ok(stored)
    }

    async fn find_by_uuid(&self, uuid: Uuid) -> Result<Option<Post>, AppError> {
        Ok(self.posts.read().await.get(&uuid).cloned())
    }

    async fn list(&self) -> Result<Vec<Post>, AppError> {
        let map = self.posts.read().await;
        Ok(Self::sorted(map.values().cloned().collect()))
    }

    async fn list_by_author(&self, author_id: i64) -> Result<Vec<Post>, AppError> {
        let map = self.posts.read().await;
        Ok(Self::sorted(
            map.values()
                .filter(|p| p.author_id == author_id)
                .cloned()
                .collect(),
        ))
    }

    async fn update(&self, uuid: Uuid, text: Option<String>) -> Result<Option<Post>, AppError> {
        let mut map = self.posts.write().await;
        let Some(post) = map.get_mut(&uuid) else {
            return Ok(None);
        };
        if let Some(text) = text {
            post.text = text;
        }
        post.updated_at = Utc::now();
        Ok(Some(post.clone()))
    }

    async fn delete(&self, uuid: Uuid) -> Result<bool, AppError> {
        Ok(self.posts.write().await.remove(&uuid).is_some())
    }
}
