//! OpenAPI document served by Swagger UI at `/api-docs`.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::dto::{
    AvatarResponse, CreatePostRequest, CreateUserRequest, LoginRequest, SignupRequest,
    SignupResponse, TokenResponse, UpdatePostRequest, UpdateUserRequest,
};
use crate::api::handlers::{auth, post, system, user};
use crate::domain::{PublicPost, PublicUser, Role};
use crate::error::{ErrorResponse, FieldError};
use crate::service::HealthStatus;

/// Registers the `bearer` JWT scheme referenced by protected routes.
#[derive(Debug)]
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// The service's OpenAPI description.
#[derive(Debug, OpenApi)]
#[openapi(
    info(title = "userhub", description = "Users, posts, avatars and live user notifications"),
    paths(
        system::health_handler,
        system::db_health_handler,
        auth::signup,
        auth::login,
        user::create_user,
        user::list_users,
        user::get_user,
        user::update_user,
        user::delete_user,
        user::upload_avatar,
        user::get_avatar,
        post::create_post,
        post::list_posts,
        post::get_post,
        post::update_post,
        post::delete_post,
    ),
    components(schemas(
        ErrorResponse,
        FieldError,
        Role,
        PublicUser,
        PublicPost,
        SignupRequest,
        SignupResponse,
        LoginRequest,
        TokenResponse,
        CreateUserRequest,
        UpdateUserRequest,
        AvatarResponse,
        CreatePostRequest,
        UpdatePostRequest,
        HealthStatus,
        system::HealthResponse,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "System", description = "Health checks"),
        (name = "Auth", description = "Signup and login"),
        (name = "Users", description = "User management and avatars"),
        (name = "Posts", description = "Posts owned by users"),
    )
)]
pub struct ApiDoc;
