//! Post request bodies.

use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

/// Request body for `POST /posts`.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreatePostRequest {
    /// Post body.
    #[validate(length(min = 10, max = 255, message = "text must be 10-255 characters"))]
    pub text: String,
}

/// Request body for `PATCH /posts/{uuid}`.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdatePostRequest {
    /// New body.
    #[validate(length(min = 10, max = 255, message = "text must be 10-255 characters"))]
    pub text: Option<String>,
}
