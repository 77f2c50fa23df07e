//! Signup and login handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};

use crate::api::dto::{LoginRequest, SignupRequest, SignupResponse, TokenResponse};
use crate::api::extractors::ValidatedJson;
use crate::app_state::AppState;
use crate::error::{AppError, ErrorResponse};

/// `POST /auth/signup` — Create an account and sign in.
///
/// # Errors
///
/// Returns [`AppError::Conflict`] if the email is taken.
#[utoipa::path(
    post,
    path = "/api/v1/auth/signup",
    tag = "Auth",
    summary = "Sign up",
    description = "Registers a new account and returns it together with an access token.",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = SignupResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 403, description = "Role selection disabled", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse),
    )
)]
pub async fn signup(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<SignupRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (user, issued) = state.auth_service.signup(req.into()).await?;

    let response = SignupResponse {
        user: user.into(),
        token: issued.token,
        expires_in: issued.expires_in,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// `POST /auth/login` — Exchange credentials for a token.
///
/// # Errors
///
/// Returns [`AppError::Unauthorized`] for unknown emails or wrong passwords.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Auth",
    summary = "Log in",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Access token", body = TokenResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let issued = state.auth_service.login(&req.email, req.password).await?;
    Ok(Json(issued.into()))
}

/// Auth routes, nested under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
}
