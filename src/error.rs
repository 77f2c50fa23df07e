//! Application error types with HTTP status code mapping.
//!
//! [`AppError`] is the single error type that crosses layer boundaries.
//! Each variant maps to exactly one HTTP status code through
//! [`AppError::status_code`], and every error response shares the
//! [`ErrorResponse`] JSON shape.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "statusCode": 400,
///   "message": "Validation error",
///   "error": "Bad Request",
///   "subErrors": [{ "path": "email", "message": "invalid email" }]
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// Numeric HTTP status code.
    pub status_code: u16,
    /// Human-readable error message.
    pub message: String,
    /// Canonical reason phrase for the status code.
    pub error: String,
    /// Per-field validation failures, present only for validation errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_errors: Option<Vec<FieldError>>,
}

/// A single failing field reported by request validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldError {
    /// Name of the offending field.
    pub path: String,
    /// What was wrong with it.
    pub message: String,
}

/// Server-side error enum with HTTP status code mapping.
///
/// | Variant        | HTTP Status                |
/// |----------------|----------------------------|
/// | `BadRequest`   | 400 Bad Request            |
/// | `Validation`   | 400 Bad Request            |
/// | `Unauthorized` | 401 Unauthorized           |
/// | `Forbidden`    | 403 Forbidden              |
/// | `NotFound`     | 404 Not Found              |
/// | `Conflict`     | 409 Conflict               |
/// | `Storage`      | 500 Internal Server Error  |
/// | `Persistence`  | 500 Internal Server Error  |
/// | `Internal`     | 500 Internal Server Error  |
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed request that is not a field validation failure.
    #[error("{0}")]
    BadRequest(String),

    /// Request body failed schema validation.
    #[error("Validation error")]
    Validation(Vec<FieldError>),

    /// Missing or invalid credentials.
    #[error("{0}")]
    Unauthorized(String),

    /// Authenticated caller lacks the required permissions.
    #[error("{0}")]
    Forbidden(String),

    /// The addressed resource does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The request collides with existing state (e.g. duplicate email).
    #[error("{0}")]
    Conflict(String),

    /// Object storage failure.
    #[error("storage error: {0}")]
    Storage(String),

    /// Persistence layer failure.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Storage(_) | Self::Persistence(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Returns the canonical reason phrase sent in the `error` field.
    #[must_use]
    pub fn reason(&self) -> &'static str {
        self.status_code()
            .canonical_reason()
            .unwrap_or("Internal Server Error")
    }

    /// Shorthand for the 401 returned on any credential failure.
    #[must_use]
    pub fn unauthorized() -> Self {
        Self::Unauthorized("Unauthorized".to_string())
    }

    /// Shorthand for the 403 returned by permission checks.
    #[must_use]
    pub fn insufficient_permissions() -> Self {
        Self::Forbidden("Forbidden: Insufficient permissions".to_string())
    }

    /// Message that is safe to return to the client.
    fn public_message(&self) -> String {
        match self {
            Self::Storage(_) => "File upload failed".to_string(),
            Self::Persistence(_) | Self::Internal(_) => "Internal Server Error".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Self::NotFound("Not found".to_string()),
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                Self::Conflict("Resource already exists".to_string())
            }
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                Self::NotFound("Referenced resource not found".to_string())
            }
            other => Self::Persistence(other.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<FieldError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |err| FieldError {
                    path: field.to_string(),
                    message: err
                        .message
                        .as_ref()
                        .map_or_else(|| err.code.to_string(), ToString::to_string),
                })
            })
            .collect();
        fields.sort_by(|a, b| a.path.cmp(&b.path));
        Self::Validation(fields)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = ErrorResponse {
            status_code: status.as_u16(),
            message: self.public_message(),
            error: self.reason().to_string(),
            sub_errors: match self {
                Self::Validation(fields) => Some(fields),
                _ => None,
            },
        };
        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn every_variant_maps_to_expected_status() {
        let cases = [
            (AppError::BadRequest(String::new()), 400),
            (AppError::Validation(Vec::new()), 400),
            (AppError::unauthorized(), 401),
            (AppError::insufficient_permissions(), 403),
            (AppError::NotFound(String::new()), 404),
            (AppError::Conflict(String::new()), 409),
            (AppError::Storage(String::new()), 500),
            (AppError::Persistence(String::new()), 500),
            (AppError::Internal(String::new()), 500),
        ];
        for (err, code) in cases {
            assert_eq!(err.status_code().as_u16(), code, "{err:?}");
        }
    }

    #[test]
    fn reason_phrase_follows_status() {
        assert_eq!(AppError::NotFound("x".into()).reason(), "Not Found");
        assert_eq!(AppError::Conflict("x".into()).reason(), "Conflict");
        assert_eq!(
            AppError::Internal("x".into()).reason(),
            "Internal Server Error"
        );
    }

    #[test]
    fn server_errors_hide_details() {
        let err = AppError::Persistence("connection refused on 10.0.0.4".into());
        assert_eq!(err.public_message(), "Internal Server Error");
        let err = AppError::Storage("bucket missing".into());
        assert_eq!(err.public_message(), "File upload failed");
    }

    #[test]
    fn row_not_found_becomes_not_found() {
        let err = AppError::from(sqlx::Error::RowNotFound);
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[derive(Debug, Clone, Copy)]
    enum Violation {
        Unique,
        ForeignKey,
        Other,
    }

    #[derive(Debug, thiserror::Error)]
    #[error("constraint violated")]
    struct FakeDbError(Violation);

    impl sqlx::error::DatabaseError for FakeDbError {
        fn message(&self) -> &str {
            "constraint violated"
        }

        fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> sqlx::error::ErrorKind {
            match self.0 {
                Violation::Unique => sqlx::error::ErrorKind::UniqueViolation,
                Violation::ForeignKey => sqlx::error::ErrorKind::ForeignKeyViolation,
                Violation::Other => sqlx::error::ErrorKind::Other,
            }
        }
    }

    fn db_error(violation: Violation) -> sqlx::Error {
        sqlx::Error::Database(Box::new(FakeDbError(violation)))
    }

    #[test]
    fn constraint_violations_map_to_client_errors() {
        let unique = AppError::from(db_error(Violation::Unique));
        assert_eq!(unique.status_code(), StatusCode::CONFLICT);

        let foreign = AppError::from(db_error(Violation::ForeignKey));
        assert_eq!(foreign.status_code(), StatusCode::NOT_FOUND);

        let other = AppError::from(db_error(Violation::Other));
        assert_eq!(other.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn validation_body_carries_sub_errors() {
        let err = AppError::Validation(vec![FieldError {
            path: "email".into(),
            message: "invalid email".into(),
        }]);
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let Ok(bytes) = axum::body::to_bytes(response.into_body(), usize::MAX).await else {
            panic!("body read failed");
        };
        let Ok(json) = serde_json::from_slice::<serde_json::Value>(&bytes) else {
            panic!("body is not json");
        };
        assert_eq!(json["statusCode"], 400);
        assert_eq!(json["error"], "Bad Request");
        assert_eq!(json["subErrors"][0]["path"], "email");
    }
}
