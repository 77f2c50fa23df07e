//! User service: account CRUD, avatar uploads, and change notifications.

use std::sync::Arc;

use bytes::Bytes;
use uuid::Uuid;

use crate::auth::PasswordHasher;
use crate::domain::{NewUser, Role, User, UserChanges};
use crate::error::AppError;
use crate::persistence::UserRepository;
use crate::storage::{ObjectStorage, avatar_key};
use crate::ws::ConnectionRegistry;

/// MIME types accepted for avatars.
pub const AVATAR_CONTENT_TYPES: &[&str] = &["image/png", "image/jpeg"];

const NO_FILE: &str = "No file provided. Only PNG and JPG images are allowed.";
const BAD_FILE_TYPE: &str = "Invalid file type. Only PNG and JPG images are allowed.";

/// Input for creating an account. `password` is plaintext.
#[derive(Debug, Clone)]
pub struct CreateUser {
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Plaintext password, hashed before storage.
    pub password: String,
    /// Requested role.
    pub role: Role,
}

/// An uploaded avatar file.
#[derive(Debug, Clone)]
pub struct AvatarUpload {
    /// Client-supplied filename.
    pub filename: String,
    /// Declared MIME type.
    pub content_type: String,
    /// File contents.
    pub bytes: Bytes,
}

/// Orchestrates user operations.
///
/// Every successful mutation of a user record that clients can observe
/// (profile update, avatar upload) is broadcast through the
/// [`ConnectionRegistry`] after it is persisted.
#[derive(Debug, Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
    hasher: PasswordHasher,
    connections: ConnectionRegistry,
    storage: Arc<dyn ObjectStorage>,
}

impl UserService {
    /// Creates a new `UserService`.
    #[must_use]
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: PasswordHasher,
        connections: ConnectionRegistry,
        storage: Arc<dyn ObjectStorage>,
    ) -> Self {
        Self {
            users,
            hasher,
            connections,
            storage,
        }
    }

    /// Creates an account with a hashed password.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the email is taken.
    pub async fn create(&self, input: CreateUser) -> Result<User, AppError> {
        if self.users.find_by_email(&input.email).await?.is_some() {
            return Err(AppError::Conflict("User already exists".to_string()));
        }

        let password_hash = self.hasher.hash_async(input.password).await?;
        let user = self
            .users
            .create(NewUser {
                name: input.name,
                email: input.email,
                password_hash,
                role: input.role,
            })
            .await
            .map_err(|e| match e {
                AppError::Conflict(_) => AppError::Conflict("User already exists".to_string()),
                other => other,
            })?;

        tracing::info!(user = %user.uuid, role = %user.role, "user created");
        Ok(user)
    }

    /// Returns every user in id order.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on backend failure.
    pub async fn list(&self) -> Result<Vec<User>, AppError> {
        self.users.list().await
    }

    /// Fetches one user.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no user has this UUID.
    pub async fn get(&self, uuid: Uuid) -> Result<User, AppError> {
        self.users.find_by_uuid(uuid).await?.ok_or_else(not_found)
    }

    /// Looks up an account by email, for login.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on backend failure.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        self.users.find_by_email(email).await
    }

    /// Applies `changes` and broadcasts the updated record.
    ///
    /// Empty changes return the stored record untouched and broadcast nothing.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no user has this UUID.
    pub async fn update(&self, uuid: Uuid, changes: UserChanges) -> Result<User, AppError> {
        if changes.is_empty() {
            return self.get(uuid).await;
        }
        let user = self
            .users
            .update(uuid, changes)
            .await?
            .ok_or_else(not_found)?;

        tracing::info!(user = %user.uuid, "user updated");
        self.connections.emit_user_update(&user);
        Ok(user)
    }

    /// Deletes a user (and, in the database, their posts).
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no user has this UUID.
    pub async fn delete(&self, uuid: Uuid) -> Result<(), AppError> {
        if !self.users.delete(uuid).await? {
            return Err(not_found());
        }
        tracing::info!(user = %uuid, "user deleted");
        Ok(())
    }

    /// Stores `file` as the user's avatar and broadcasts the change.
    ///
    /// # Errors
    ///
    /// - [`AppError::BadRequest`] if no file was sent or it is not PNG/JPEG.
    /// - [`AppError::NotFound`] if the user no longer exists.
    /// - [`AppError::Storage`] if the upload fails.
    pub async fn upload_avatar(
        &self,
        uuid: Uuid,
        file: Option<AvatarUpload>,
    ) -> Result<User, AppError> {
        let file = match file {
            Some(f) if !f.bytes.is_empty() => f,
            _ => return Err(AppError::BadRequest(NO_FILE.to_string())),
        };
        if !AVATAR_CONTENT_TYPES.contains(&file.content_type.as_str()) {
            return Err(AppError::BadRequest(BAD_FILE_TYPE.to_string()));
        }

        let user = self.get(uuid).await?;
        let key = avatar_key(user.uuid, &file.filename);
        let url = self
            .storage
            .put_object(&key, &file.content_type, file.bytes)
            .await?;

        let changes = UserChanges {
            avatar: Some(url),
            ..UserChanges::default()
        };
        self.update(user.uuid, changes).await
    }
}

fn not_found() -> AppError {
    AppError::NotFound("User not found".to_string())
}
