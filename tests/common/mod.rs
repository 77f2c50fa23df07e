//! Shared fixtures: an in-memory application graph and request helpers.

#![allow(dead_code, clippy::panic)]

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use bytes::Bytes;
use serde_json::Value;
use tower::ServiceExt;

use userhub::app::{HttpSettings, build_app};
use userhub::app_state::AppState;
use userhub::auth::{JwtService, PasswordHasher};
use userhub::config::JwtConfig;
use userhub::error::AppError;
use userhub::persistence::{InMemoryPostRepository, InMemoryUserRepository, UserRepository};
use userhub::service::{AuthService, HealthService, PostService, UserService};
use userhub::storage::ObjectStorage;
use userhub::ws::ConnectionRegistry;

/// Object storage double that records every upload.
#[derive(Debug, Default)]
pub struct RecordingStorage {
    uploads: Mutex<Vec<(String, String, usize)>>,
}

impl RecordingStorage {
    /// `(key, content_type, len)` for each upload so far.
    pub fn uploads(&self) -> Vec<(String, String, usize)> {
        self.uploads
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl ObjectStorage for RecordingStorage {
    async fn put_object(
        &self,
        key: &str,
        content_type: &str,
        body: Bytes,
    ) -> Result<String, AppError> {
        self.uploads
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((key.to_string(), content_type.to_string(), body.len()));
        Ok(format!("https://storage.test/avatars/{key}"))
    }
}

/// A fully wired application backed by in-memory collaborators.
pub struct TestApp {
    pub router: Router,
    pub connections: ConnectionRegistry,
    pub storage: Arc<RecordingStorage>,
}

impl TestApp {
    /// Builds the app with signup role selection enabled.
    pub fn new() -> Self {
        Self::with_signup_roles(true)
    }

    pub fn with_signup_roles(signup_roles: bool) -> Self {
        let hasher = PasswordHasher::new();
        let jwt = JwtService::new(&JwtConfig {
            secret: "integration-secret".into(),
            expires_in_secs: 3600,
        });
        let connections = ConnectionRegistry::new();
        let storage = Arc::new(RecordingStorage::default());

        let users: Arc<dyn UserRepository> = Arc::new(InMemoryUserRepository::new());
        let user_service = Arc::new(UserService::new(
            Arc::clone(&users),
            hasher,
            connections.clone(),
            Arc::clone(&storage) as Arc<dyn ObjectStorage>,
        ));
        let auth_service = Arc::new(
            AuthService::new(Arc::clone(&user_service), hasher, jwt.clone())
                .with_signup_roles(signup_roles),
        );
        let state = AppState {
            user_service,
            auth_service,
            post_service: Arc::new(PostService::new(
                Arc::new(InMemoryPostRepository::new()),
                users,
            )),
            health: Arc::new(HealthService::new(None)),
            jwt,
            connections: connections.clone(),
            ws_outbound_buffer: 16,
        };
        let settings = HttpSettings {
            avatar_max_bytes: 64 * 1024,
            ..HttpSettings::default()
        };

        Self {
            router: build_app(state, &settings),
            connections,
            storage,
        }
    }

    /// Sends a request and returns the status plus the JSON body
    /// (`Value::Null` when the body is empty).
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let Ok(response) = self.router.clone().oneshot(request).await else {
            panic!("router failed");
        };
        let status = response.status();
        let Ok(bytes) = axum::body::to_bytes(response.into_body(), usize::MAX).await else {
            panic!("body read failed");
        };
        if bytes.is_empty() {
            return (status, Value::Null);
        }
        let json = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
        (status, json)
    }

    /// Signs up an account and returns `(token, user)`.
    pub async fn signup(&self, name: &str, email: &str, role: &str) -> (String, Value) {
        let body = serde_json::json!({
            "name": name,
            "email": email,
            "password": "password123",
            "role": role,
        });
        let (status, json) = self.send(json_request("POST", "/api/v1/auth/signup", None, &body)).await;
        assert_eq!(status, StatusCode::CREATED, "signup failed: {json}");
        let Some(token) = json["token"].as_str() else {
            panic!("no token in {json}");
        };
        (token.to_string(), json["user"].clone())
    }
}

pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let Ok(request) = builder.body(Body::from(body.to_string())) else {
        panic!("invalid request");
    };
    request
}

pub fn empty_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let Ok(request) = builder.body(Body::empty()) else {
        panic!("invalid request");
    };
    request
}

/// Builds a multipart request with a single part named `field`.
pub fn multipart_request(
    uri: &str,
    token: &str,
    field: &str,
    filename: &str,
    content_type: &str,
    data: &[u8],
) -> Request<Body> {
    let boundary = "userhub-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    let Ok(request) = Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body))
    else {
        panic!("invalid request");
    };
    request
}
