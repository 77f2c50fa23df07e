//! Auth service: signup and login.

use std::sync::Arc;

use tokio::sync::OnceCell;

use crate::auth::{IssuedToken, JwtService, PasswordHasher};
use crate::domain::{Role, User};
use crate::error::AppError;

use super::user_service::{CreateUser, UserService};

/// Verified in place of a real hash when the email is unknown, so both
/// login failures cost one argon2 verification.
const DUMMY_PASSWORD: &str = "userhub-unknown-account";

/// Issues tokens for new and returning users.
#[derive(Debug, Clone)]
pub struct AuthService {
    users: Arc<UserService>,
    hasher: PasswordHasher,
    jwt: JwtService,
    signup_roles: bool,
    dummy_hash: Arc<OnceCell<String>>,
}

impl AuthService {
    /// Creates a new `AuthService`. Signups always get the `BASIC` role
    /// until [`AuthService::with_signup_roles`] enables role selection.
    #[must_use]
    pub fn new(users: Arc<UserService>, hasher: PasswordHasher, jwt: JwtService) -> Self {
        Self {
            users,
            hasher,
            jwt,
            signup_roles: false,
            dummy_hash: Arc::new(OnceCell::new()),
        }
    }

    /// Lets signup requests choose their own role, `ADMIN` included.
    #[must_use]
    pub fn with_signup_roles(mut self, allowed: bool) -> Self {
        self.signup_roles = allowed;
        self
    }

    /// Registers an account and signs the caller in.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Forbidden`] if a non-`BASIC` role is requested
    /// while role selection is disabled, and [`AppError::Conflict`] if the
    /// email is already registered.
    pub async fn signup(&self, input: CreateUser) -> Result<(User, IssuedToken), AppError> {
        if input.role != Role::Basic && !self.signup_roles {
            tracing::warn!(role = %input.role, "signup with elevated role rejected");
            return Err(AppError::insufficient_permissions());
        }
        let user = self.users.create(input).await?;
        let token = self.jwt.issue(&user)?;
        Ok((user, token))
    }

    /// Verifies credentials and issues a token.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the email is unknown or the
    /// password does not match.
    pub async fn login(&self, email: &str, password: String) -> Result<IssuedToken, AppError> {
        let Some(user) = self.users.find_by_email(email).await? else {
            let dummy = self
                .dummy_hash
                .get_or_try_init(|| self.hasher.hash_async(DUMMY_PASSWORD.to_string()))
                .await?;
            let _ = self.hasher.verify_async(password, dummy.clone()).await?;
            tracing::debug!("login for unknown email");
            return Err(AppError::unauthorized());
        };

        if !self
            .hasher
            .verify_async(password, user.password_hash.clone())
            .await?
        {
            tracing::debug!(user = %user.uuid, "login with wrong password");
            return Err(AppError::unauthorized());
        }

        tracing::info!(user = %user.uuid, "user logged in");
        self.jwt.issue(&user)
    }
}
