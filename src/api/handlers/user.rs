//! User handlers: CRUD plus avatar upload.

use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use uuid::Uuid;

use crate::api::dto::{AvatarResponse, CreateUserRequest, UpdateUserRequest};
use crate::api::extractors::{AuthUser, ValidatedJson};
use crate::app_state::AppState;
use crate::auth::Permission;
use crate::domain::PublicUser;
use crate::error::{AppError, ErrorResponse};
use crate::service::AvatarUpload;

/// `POST /users` — Create a user (admin).
///
/// # Errors
///
/// 403 without `write:all`; 409 if the email is taken.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "Users",
    summary = "Create user",
    request_body = CreateUserRequest,
    security(("bearer" = [])),
    responses(
        (status = 201, description = "User created", body = PublicUser),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Insufficient permissions", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse),
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth.require(&[Permission::WriteAll])?;
    let user = state.user_service.create(req.into()).await?;
    Ok((StatusCode::CREATED, Json(PublicUser::from(user))))
}

/// `GET /users` — List all users (admin).
///
/// # Errors
///
/// 403 without `read:all`.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "Users",
    summary = "List users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "All users in id order", body = Vec<PublicUser>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Insufficient permissions", body = ErrorResponse),
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<PublicUser>>, AppError> {
    auth.require(&[Permission::ReadAll])?;
    let users = state.user_service.list().await?;
    Ok(Json(users.into_iter().map(PublicUser::from).collect()))
}

/// `GET /users/{uuid}` — Fetch one user.
///
/// # Errors
///
/// 403 unless reading self or holding `read:all`; 404 if missing.
#[utoipa::path(
    get,
    path = "/api/v1/users/{uuid}",
    tag = "Users",
    summary = "Get user",
    params(("uuid" = Uuid, Path, description = "User UUID")),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "User", body = PublicUser),
        (status = 403, description = "Insufficient permissions", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(uuid): Path<Uuid>,
) -> Result<Json<PublicUser>, AppError> {
    auth.require_self_or(uuid, Permission::ReadOwn, Permission::ReadAll)?;
    let user = state.user_service.get(uuid).await?;
    Ok(Json(user.into()))
}

/// `PATCH /users/{uuid}` — Update a user and notify subscribers.
///
/// # Errors
///
/// 403 unless updating self or holding `write:all`, or when changing
/// `role` without `write:all`; 404 if missing.
#[utoipa::path(
    patch,
    path = "/api/v1/users/{uuid}",
    tag = "Users",
    summary = "Update user",
    description = "Applies the given fields and broadcasts a `userUpdated` event on `/ws/conn`.",
    params(("uuid" = Uuid, Path, description = "User UUID")),
    request_body = UpdateUserRequest,
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Updated user", body = PublicUser),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 403, description = "Insufficient permissions", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(uuid): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateUserRequest>,
) -> Result<Json<PublicUser>, AppError> {
    auth.require_self_or(uuid, Permission::WriteOwn, Permission::WriteAll)?;
    if req.role.is_some() {
        auth.require(&[Permission::WriteAll])?;
    }
    let user = state.user_service.update(uuid, req.into()).await?;
    Ok(Json(user.into()))
}

/// `DELETE /users/{uuid}` — Delete a user (admin).
///
/// # Errors
///
/// 403 without `delete:all`; 404 if missing.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{uuid}",
    tag = "Users",
    summary = "Delete user",
    params(("uuid" = Uuid, Path, description = "User UUID")),
    security(("bearer" = [])),
    responses(
        (status = 204, description = "User deleted"),
        (status = 403, description = "Insufficient permissions", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(uuid): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    auth.require(&[Permission::DeleteAll])?;
    state.user_service.delete(uuid).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /users/me/avatar` — Upload the caller's avatar.
///
/// # Errors
///
/// 400 if the `file` field is missing, empty, oversized or not PNG/JPEG;
/// 500 if the upload fails.
#[utoipa::path(
    post,
    path = "/api/v1/users/me/avatar",
    tag = "Users",
    summary = "Upload avatar",
    description = "Multipart upload with a single `file` field (PNG or JPEG). Broadcasts a `userUpdated` event.",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Stored avatar URL", body = AvatarResponse),
        (status = 400, description = "Missing or invalid file", body = ErrorResponse),
        (status = 500, description = "File upload failed", body = ErrorResponse),
    )
)]
pub async fn upload_avatar(
    State(state): State<AppState>,
    auth: AuthUser,
    multipart: Multipart,
) -> Result<Json<AvatarResponse>, AppError> {
    let file = read_file_field(multipart).await?;
    let user = state.user_service.upload_avatar(auth.sub, file).await?;
    Ok(Json(AvatarResponse::from(&user)))
}

/// `GET /users/{uuid}/avatar` — Fetch a user's avatar URL.
///
/// # Errors
///
/// 403 unless reading self or holding `read:all`; 404 if missing.
#[utoipa::path(
    get,
    path = "/api/v1/users/{uuid}/avatar",
    tag = "Users",
    summary = "Get avatar",
    params(("uuid" = Uuid, Path, description = "User UUID")),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Avatar URL", body = AvatarResponse),
        (status = 403, description = "Insufficient permissions", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
    )
)]
pub async fn get_avatar(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(uuid): Path<Uuid>,
) -> Result<Json<AvatarResponse>, AppError> {
    auth.require_self_or(uuid, Permission::ReadOwn, Permission::ReadAll)?;
    let user = state.user_service.get(uuid).await?;
    Ok(Json(AvatarResponse::from(&user)))
}

/// Pulls the `file` field out of a multipart body, ignoring other fields.
async fn read_file_field(mut multipart: Multipart) -> Result<Option<AvatarUpload>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or("avatar").to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        return Ok(Some(AvatarUpload {
            filename,
            content_type,
            bytes,
        }));
    }
    Ok(None)
}

/// User routes, nested under `/api/v1`.
///
/// The avatar upload route gets its own body limit.
pub fn routes(avatar_max_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/users", post(create_user).get(list_users))
        .route(
            "/users/{uuid}",
            get(get_user).patch(update_user).delete(delete_user),
        )
        .route(
            "/users/me/avatar",
            post(upload_avatar).layer(DefaultBodyLimit::max(avatar_max_bytes)),
        )
        .route("/users/{uuid}/avatar", get(get_avatar))
}
