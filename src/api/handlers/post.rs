//! Post handlers. Ownership is enforced by [`crate::service::PostService`].

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use uuid::Uuid;

use crate::api::dto::{CreatePostRequest, UpdatePostRequest};
use crate::api::extractors::{AuthUser, ValidatedJson};
use crate::app_state::AppState;
use crate::auth::Permission;
use crate::domain::PublicPost;
use crate::error::{AppError, ErrorResponse};

/// `POST /posts` — Create a post authored by the caller.
///
/// # Errors
///
/// 403 without `write:own`.
#[utoipa::path(
    post,
    path = "/api/v1/posts",
    tag = "Posts",
    summary = "Create post",
    request_body = CreatePostRequest,
    security(("bearer" = [])),
    responses(
        (status = 201, description = "Post created", body = PublicPost),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 403, description = "Insufficient permissions", body = ErrorResponse),
    )
)]
pub async fn create_post(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<CreatePostRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth.require(&[Permission::WriteOwn])?;
    let post = state.post_service.create(auth.claims(), req.text).await?;
    Ok((StatusCode::CREATED, Json(PublicPost::from(post))))
}

/// `GET /posts` — List visible posts.
///
/// # Errors
///
/// 403 without `read:own`.
#[utoipa::path(
    get,
    path = "/api/v1/posts",
    tag = "Posts",
    summary = "List posts",
    description = "Returns the caller's posts, or every post for callers with `read:all`.",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Posts in id order", body = Vec<PublicPost>),
        (status = 403, description = "Insufficient permissions", body = ErrorResponse),
    )
)]
pub async fn list_posts(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<PublicPost>>, AppError> {
    auth.require(&[Permission::ReadOwn])?;
    let posts = state.post_service.list(auth.claims()).await?;
    Ok(Json(posts.into_iter().map(PublicPost::from).collect()))
}

/// `GET /posts/{uuid}` — Fetch one post.
///
/// # Errors
///
/// 403 for non-authors without `read:all`; 404 if missing.
#[utoipa::path(
    get,
    path = "/api/v1/posts/{uuid}",
    tag = "Posts",
    summary = "Get post",
    params(("uuid" = Uuid, Path, description = "Post UUID")),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Post", body = PublicPost),
        (status = 403, description = "Insufficient permissions", body = ErrorResponse),
        (status = 404, description = "Post not found", body = ErrorResponse),
    )
)]
pub async fn get_post(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(uuid): Path<Uuid>,
) -> Result<Json<PublicPost>, AppError> {
    auth.require(&[Permission::ReadOwn])?;
    let post = state.post_service.get(auth.claims(), uuid).await?;
    Ok(Json(post.into()))
}

/// `PATCH /posts/{uuid}` — Edit a post.
///
/// # Errors
///
/// 403 for non-authors without `write:all`; 404 if missing.
#[utoipa::path(
    patch,
    path = "/api/v1/posts/{uuid}",
    tag = "Posts",
    summary = "Update post",
    params(("uuid" = Uuid, Path, description = "Post UUID")),
    request_body = UpdatePostRequest,
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Updated post", body = PublicPost),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 403, description = "Insufficient permissions", body = ErrorResponse),
        (status = 404, description = "Post not found", body = ErrorResponse),
    )
)]
pub async fn update_post(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(uuid): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdatePostRequest>,
) -> Result<Json<PublicPost>, AppError> {
    auth.require(&[Permission::WriteOwn])?;
    let post = state
        .post_service
        .update(auth.claims(), uuid, req.text)
        .await?;
    Ok(Json(post.into()))
}

/// `DELETE /posts/{uuid}` — Delete a post.
///
/// # Errors
///
/// 403 for non-authors without `delete:all`; 404 if missing.
#[utoipa::path(
    delete,
    path = "/api/v1/posts/{uuid}",
    tag = "Posts",
    summary = "Delete post",
    params(("uuid" = Uuid, Path, description = "Post UUID")),
    security(("bearer" = [])),
    responses(
        (status = 204, description = "Post deleted"),
        (status = 403, description = "Insufficient permissions", body = ErrorResponse),
        (status = 404, description = "Post not found", body = ErrorResponse),
    )
)]
pub async fn delete_post(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(uuid): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    auth.require(&[Permission::DeleteOwn])?;
    state.post_service.delete(auth.claims(), uuid).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Post routes, nested under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/posts", get(list_posts).post(create_post))
        .route(
            "/posts/{uuid}",
            get(get_post).patch(update_post).delete(delete_post),
        )
}
