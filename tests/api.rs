//! HTTP integration tests: the full router driven in-process with
//! `tower::ServiceExt::oneshot` over in-memory repositories.

#![allow(clippy::panic, clippy::indexing_slicing)]

mod common;

use axum::http::StatusCode;
use serde_json::json;
use userhub::ws::{ChannelTransport, Connection, Transport};

use common::{TestApp, empty_request, json_request, multipart_request};

#[tokio::test]
async fn health_endpoints_answer_ok() {
    let app = TestApp::new();

    let (status, body) = app.send(empty_request("GET", "/health", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "OK" }));

    let (status, body) = app.send(empty_request("GET", "/health/db", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "OK");
}

#[tokio::test]
async fn signup_returns_public_user_and_token() {
    let app = TestApp::new();
    let (token, user) = app.signup("John", "john@doe.com", "BASIC").await;

    assert!(!token.is_empty());
    assert_eq!(user["name"], "John");
    assert_eq!(user["email"], "john@doe.com");
    assert_eq!(user["role"], "BASIC");
    assert!(user.get("password").is_none());
    assert!(user.get("passwordHash").is_none());
}

#[tokio::test]
async fn duplicate_signup_is_conflict() {
    let app = TestApp::new();
    app.signup("John", "john@doe.com", "BASIC").await;

    let body = json!({ "name": "John", "email": "john@doe.com", "password": "password123" });
    let (status, json) = app
        .send(json_request("POST", "/api/v1/auth/signup", None, &body))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["statusCode"], 409);
    assert_eq!(json["message"], "User already exists");
    assert_eq!(json["error"], "Conflict");
}

#[tokio::test]
async fn invalid_signup_reports_field_errors() {
    let app = TestApp::new();
    let body = json!({ "name": "John", "email": "not-an-email", "password": "short" });
    let (status, json) = app
        .send(json_request("POST", "/api/v1/auth/signup", None, &body))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Validation error");
    let Some(sub_errors) = json["subErrors"].as_array() else {
        panic!("missing subErrors in {json}");
    };
    let paths: Vec<&str> = sub_errors.iter().filter_map(|e| e["path"].as_str()).collect();
    assert_eq!(paths, vec!["email", "password"]);
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let app = TestApp::new();
    let request = {
        let Ok(req) = axum::http::Request::builder()
            .method("POST")
            .uri("/api/v1/auth/login")
            .header("content-type", "application/json")
            .body(axum::body::Body::from("{not json"))
        else {
            panic!("invalid request");
        };
        req
    };
    let (status, json) = app.send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["statusCode"], 400);
}

#[tokio::test]
async fn login_round_trip() {
    let app = TestApp::new();
    app.signup("John", "john@doe.com", "BASIC").await;

    let body = json!({ "email": "john@doe.com", "password": "password123" });
    let (status, json) = app
        .send(json_request("POST", "/api/v1/auth/login", None, &body))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["token"].as_str().is_some_and(|t| !t.is_empty()));
    assert_eq!(json["expiresIn"], 3600);

    let wrong = json!({ "email": "john@doe.com", "password": "wrong-password" });
    let (status, json) = app
        .send(json_request("POST", "/api/v1/auth/login", None, &wrong))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["message"], "Unauthorized");
}

#[tokio::test]
async fn protected_routes_need_a_valid_token() {
    let app = TestApp::new();

    let (status, _) = app.send(empty_request("GET", "/api/v1/users", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .send(empty_request("GET", "/api/v1/users", Some("garbage")))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn listing_users_requires_read_all() {
    let app = TestApp::new();
    let (basic, _) = app.signup("Basic", "basic@doe.com", "BASIC").await;
    let (admin, _) = app.signup("Admin", "admin@doe.com", "ADMIN").await;

    let (status, json) = app
        .send(empty_request("GET", "/api/v1/users", Some(&basic)))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["message"], "Forbidden: Insufficient permissions");

    let (status, json) = app
        .send(empty_request("GET", "/api/v1/users", Some(&admin)))
        .await;
    assert_eq!(status, StatusCode::OK);
    let Some(users) = json.as_array() else {
        panic!("expected array, got {json}");
    };
    assert_eq!(users.len(), 2);
    assert_eq!(users[0]["email"], "basic@doe.com");
    assert!(users.iter().all(|u| u.get("password").is_none()));
}

#[tokio::test]
async fn users_can_read_themselves_but_not_others() {
    let app = TestApp::new();
    let (alice, alice_user) = app.signup("Alice", "alice@doe.com", "BASIC").await;
    let (_, bob_user) = app.signup("Bob", "bob@doe.com", "BASIC").await;

    let own = format!("/api/v1/users/{}", alice_user["uuid"].as_str().unwrap_or_default());
    let (status, json) = app.send(empty_request("GET", &own, Some(&alice))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["name"], "Alice");

    let other = format!("/api/v1/users/{}", bob_user["uuid"].as_str().unwrap_or_default());
    let (status, _) = app.send(empty_request("GET", &other, Some(&alice))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn unknown_user_is_not_found_for_admin() {
    let app = TestApp::new();
    let (admin, _) = app.signup("Admin", "admin@doe.com", "ADMIN").await;
    let uri = format!("/api/v1/users/{}", uuid::Uuid::new_v4());

    let (status, json) = app.send(empty_request("GET", &uri, Some(&admin))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Not Found");
}

#[tokio::test]
async fn admin_creates_and_deletes_users() {
    let app = TestApp::new();
    let (admin, _) = app.signup("Admin", "admin@doe.com", "ADMIN").await;

    let body = json!({ "name": "Carol", "email": "carol@doe.com", "password": "password123" });
    let (status, carol) = app
        .send(json_request("POST", "/api/v1/users", Some(&admin), &body))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(carol["role"], "BASIC");

    let uri = format!("/api/v1/users/{}", carol["uuid"].as_str().unwrap_or_default());
    let (status, _) = app.send(empty_request("DELETE", &uri, Some(&admin))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app.send(empty_request("DELETE", &uri, Some(&admin))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn basic_user_cannot_create_users_or_change_roles() {
    let app = TestApp::new();
    let (basic, me) = app.signup("Basic", "basic@doe.com", "BASIC").await;

    let body = json!({ "name": "Carol", "email": "carol@doe.com", "password": "password123" });
    let (status, _) = app
        .send(json_request("POST", "/api/v1/users", Some(&basic), &body))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let uri = format!("/api/v1/users/{}", me["uuid"].as_str().unwrap_or_default());
    let (status, _) = app
        .send(json_request("PATCH", &uri, Some(&basic), &json!({ "role": "ADMIN" })))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn patch_user_broadcasts_user_updated() {
    let app = TestApp::new();
    let (transport, mut frames) = ChannelTransport::new(8);
    app.connections
        .add_connection(Connection::new(std::sync::Arc::new(transport) as std::sync::Arc<dyn Transport>));

    let (token, me) = app.signup("John", "john@doe.com", "BASIC").await;
    let uuid = me["uuid"].as_str().unwrap_or_default().to_string();
    let uri = format!("/api/v1/users/{uuid}");

    let (status, json) = app
        .send(json_request("PATCH", &uri, Some(&token), &json!({ "name": "Johnny" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["name"], "Johnny");

    let Ok(frame) = frames.try_recv() else {
        panic!("no userUpdated frame");
    };
    let Ok(event) = serde_json::from_str::<serde_json::Value>(&frame) else {
        panic!("frame is not json: {frame}");
    };
    assert_eq!(
        event,
        json!({
            "event": "userUpdated",
            "data": {
                "id": me["id"],
                "uuid": uuid,
                "name": "Johnny",
                "email": "john@doe.com",
                "role": "BASIC",
            }
        })
    );
}

#[tokio::test]
async fn patch_with_invalid_name_is_rejected_without_broadcast() {
    let app = TestApp::new();
    let (transport, mut frames) = ChannelTransport::new(8);
    app.connections
        .add_connection(Connection::new(std::sync::Arc::new(transport) as std::sync::Arc<dyn Transport>));

    let (token, me) = app.signup("John", "john@doe.com", "BASIC").await;
    let uri = format!("/api/v1/users/{}", me["uuid"].as_str().unwrap_or_default());
    let (status, _) = app
        .send(json_request("PATCH", &uri, Some(&token), &json!({ "name": "J" })))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(frames.try_recv().is_err());
}

#[tokio::test]
async fn empty_patch_returns_user_without_broadcast() {
    let app = TestApp::new();
    let (transport, mut frames) = ChannelTransport::new(8);
    app.connections
        .add_connection(Connection::new(std::sync::Arc::new(transport) as std::sync::Arc<dyn Transport>));

    let (token, me) = app.signup("John", "john@doe.com", "BASIC").await;
    let uri = format!("/api/v1/users/{}", me["uuid"].as_str().unwrap_or_default());
    let (status, json) = app
        .send(json_request("PATCH", &uri, Some(&token), &json!({})))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, me);
    assert!(frames.try_recv().is_err());
}

#[tokio::test]
async fn avatar_upload_stores_file_and_exposes_url() {
    let app = TestApp::new();
    let (token, me) = app.signup("John", "john@doe.com", "BASIC").await;
    let uuid = me["uuid"].as_str().unwrap_or_default().to_string();

    let request = multipart_request(
        "/api/v1/users/me/avatar",
        &token,
        "file",
        "face.png",
        "image/png",
        b"\x89PNG\r\n\x1a\nfake",
    );
    let (status, json) = app.send(request).await;
    assert_eq!(status, StatusCode::OK, "{json}");
    assert_eq!(json["uuid"], uuid.as_str());
    let expected_url = format!("https://storage.test/avatars/{uuid}-face.png");
    assert_eq!(json["avatar"], expected_url.as_str());

    let uploads = app.storage.uploads();
    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0].1, "image/png");

    let uri = format!("/api/v1/users/{uuid}/avatar");
    let (status, json) = app.send(empty_request("GET", &uri, Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["avatar"], expected_url.as_str());
}

#[tokio::test]
async fn avatar_rejects_other_file_types() {
    let app = TestApp::new();
    let (token, _) = app.signup("John", "john@doe.com", "BASIC").await;

    let request = multipart_request(
        "/api/v1/users/me/avatar",
        &token,
        "file",
        "anim.gif",
        "image/gif",
        b"GIF89a",
    );
    let (status, json) = app.send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        json["message"],
        "Invalid file type. Only PNG and JPG images are allowed."
    );
    assert!(app.storage.uploads().is_empty());
}

#[tokio::test]
async fn avatar_without_file_field_is_rejected() {
    let app = TestApp::new();
    let (token, _) = app.signup("John", "john@doe.com", "BASIC").await;

    let request = multipart_request(
        "/api/v1/users/me/avatar",
        &token,
        "picture",
        "face.png",
        "image/png",
        b"\x89PNG",
    );
    let (status, json) = app.send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        json["message"],
        "No file provided. Only PNG and JPG images are allowed."
    );
}

#[tokio::test]
async fn oversized_avatar_is_rejected() {
    let app = TestApp::new();
    let (token, _) = app.signup("John", "john@doe.com", "BASIC").await;

    let big = vec![0u8; 128 * 1024];
    let request = multipart_request(
        "/api/v1/users/me/avatar",
        &token,
        "file",
        "big.png",
        "image/png",
        &big,
    );
    let (status, _) = app.send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(app.storage.uploads().is_empty());
}

#[tokio::test]
async fn post_lifecycle_with_ownership() {
    let app = TestApp::new();
    let (alice, _) = app.signup("Alice", "alice@doe.com", "BASIC").await;
    let (bob, _) = app.signup("Bob", "bob@doe.com", "BASIC").await;
    let (admin, _) = app.signup("Admin", "admin@doe.com", "ADMIN").await;

    let (status, post) = app
        .send(json_request(
            "POST",
            "/api/v1/posts",
            Some(&alice),
            &json!({ "text": "Alice's very first post" }),
        ))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(post["authorId"].is_number());
    let uri = format!("/api/v1/posts/{}", post["uuid"].as_str().unwrap_or_default());

    let (status, _) = app.send(empty_request("GET", &uri, Some(&bob))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, list) = app.send(empty_request("GET", "/api/v1/posts", Some(&bob))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list, json!([]));

    let (status, list) = app
        .send(empty_request("GET", "/api/v1/posts", Some(&admin)))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().map(Vec::len), Some(1));

    let (status, updated) = app
        .send(json_request(
            "PATCH",
            &uri,
            Some(&alice),
            &json!({ "text": "Alice edited her post" }),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["text"], "Alice edited her post");

    let (status, _) = app.send(empty_request("DELETE", &uri, Some(&bob))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.send(empty_request("DELETE", &uri, Some(&alice))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app.send(empty_request("GET", &uri, Some(&alice))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn short_post_text_is_rejected() {
    let app = TestApp::new();
    let (token, _) = app.signup("Alice", "alice@doe.com", "BASIC").await;
    let (status, json) = app
        .send(json_request(
            "POST",
            "/api/v1/posts",
            Some(&token),
            &json!({ "text": "short" }),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["subErrors"][0]["path"], "text");
}

#[tokio::test]
async fn deleted_account_token_cannot_create_posts() {
    let app = TestApp::new();
    let (admin, _) = app.signup("Admin", "admin@doe.com", "ADMIN").await;
    let (john, user) = app.signup("John", "john@doe.com", "BASIC").await;

    let uri = format!("/api/v1/users/{}", user["uuid"].as_str().unwrap_or_default());
    let (status, _) = app.send(empty_request("DELETE", &uri, Some(&admin))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app
        .send(json_request(
            "POST",
            "/api/v1/posts",
            Some(&john),
            &json!({ "text": "written after the account is gone" }),
        ))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, list) = app
        .send(empty_request("GET", "/api/v1/posts", Some(&admin)))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn admin_signup_is_refused_unless_enabled() {
    let app = TestApp::with_signup_roles(false);
    let body = json!({
        "name": "Mallory",
        "email": "mallory@doe.com",
        "password": "password123",
        "role": "ADMIN",
    });
    let (status, _) = app
        .send(json_request("POST", "/api/v1/auth/signup", None, &body))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, user) = app.signup("John", "john@doe.com", "BASIC").await;
    assert_eq!(user["role"], "BASIC");
}
