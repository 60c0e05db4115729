//! End-to-end authentication flow tests.
//!
//! Drives the real router over in-memory backends; no database or Redis needed.

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use domain::HashCost;
use skincare_auth::{create_router, AppState, Config, Services};

// =============================================================================
// Test Helpers
// =============================================================================

fn test_app() -> Router {
    let mut config = Config::with_secret("integration-test-secret-at-least-32-chars").unwrap();
    config.hash_cost = HashCost::minimal();

    let services = Services::in_memory(&config).unwrap();
    create_router(AppState::from_services(&services, &config))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Option<String>, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .map(|v| v.to_str().unwrap().to_string());
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, cookie, body)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn with_bearer(method: &str, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

async fn register(app: &Router, name: &str, email: &str, password: &str) -> (StatusCode, Value) {
    let (status, _, body) = send(
        app,
        post_json(
            "/api/auth/register",
            json!({ "name": name, "email": email, "password": password }),
        ),
    )
    .await;
    (status, body)
}

async fn login(app: &Router, email: &str, password: &str) -> (StatusCode, Option<String>, Value) {
    send(
        app,
        post_json(
            "/api/auth/login",
            json!({ "email": email, "password": password }),
        ),
    )
    .await
}

// =============================================================================
// Registration
// =============================================================================

#[tokio::test]
async fn test_register_login_scenario() {
    let app = test_app();

    let (status, body) = register(&app, "Sarah", "Sarah@X.com", "secret1").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["email"], "sarah@x.com");
    assert_eq!(body["name"], "Sarah");
    assert!(body["id"].is_string());
    assert!(body["createdAt"].is_string());
    assert!(body.get("password").is_none());
    assert!(body.get("passwordHash").is_none());

    let (status, cookie, body) = login(&app, "sarah@x.com", "secret1").await;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().unwrap().to_string();
    assert!(!token.is_empty());
    assert!(body["expiresAt"].is_string());

    let cookie = cookie.unwrap();
    assert!(cookie.starts_with(&format!("token={};", token)));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("Path=/"));
    assert!(cookie.contains("SameSite=Lax"));
    assert!(cookie.contains("Max-Age="));

    let (status, _, body) = login(&app, "sarah@x.com", "wrong").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn test_duplicate_email_variants_rejected() {
    let app = test_app();

    let (status, _) = register(&app, "A", "A@B.com", "secret1").await;
    assert_eq!(status, StatusCode::CREATED);

    for variant in [" a@b.com ", "a@B.COM", "A@B.com"] {
        let (status, body) = register(&app, "Other", variant, "secret2").await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "variant {variant:?}");
        assert_eq!(body["code"], "DUPLICATE_EMAIL");
    }
}

#[tokio::test]
async fn test_concurrent_registration_single_winner() {
    let app = test_app();

    let attempts: Vec<_> = (0..6)
        .map(|i| {
            let app = app.clone();
            tokio::spawn(async move {
                register(&app, &format!("User {i}"), "race@x.com", "secret1")
                    .await
                    .0
            })
        })
        .collect();

    let mut created = 0;
    let mut rejected = 0;
    for attempt in attempts {
        match attempt.await.unwrap() {
            StatusCode::CREATED => created += 1,
            StatusCode::BAD_REQUEST => rejected += 1,
            other => panic!("unexpected status {other}"),
        }
    }

    assert_eq!(created, 1);
    assert_eq!(rejected, 5);
}

#[tokio::test]
async fn test_register_validation_messages() {
    let app = test_app();

    let (status, body) = register(&app, "Sarah", "sarah@x.com", "12345").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["message"], "Password must be at least 6 characters long");

    let (status, body) = register(&app, "   ", "sarah@x.com", "secret1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Name is required");

    let (status, body) = register(&app, "Sarah", "not-an-email", "secret1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Please fill a valid email address");
}

#[tokio::test]
async fn test_malformed_body_rejected() {
    let app = test_app();

    let request = Request::post("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, _, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

// =============================================================================
// Login
// =============================================================================

#[tokio::test]
async fn test_unknown_email_and_wrong_password_identical() {
    let app = test_app();
    register(&app, "Sarah", "sarah@x.com", "secret1").await;

    let (status_a, cookie_a, body_a) = login(&app, "sarah@x.com", "wrong").await;
    let (status_b, cookie_b, body_b) = login(&app, "nobody@x.com", "secret1").await;

    assert_eq!(status_a, StatusCode::UNAUTHORIZED);
    assert_eq!(status_a, status_b);
    assert_eq!(body_a, body_b);
    assert!(cookie_a.is_none() && cookie_b.is_none());
}

#[tokio::test]
async fn test_login_accepts_unnormalized_email() {
    let app = test_app();
    register(&app, "Sarah", "sarah@x.com", "secret1").await;

    let (status, _, _) = login(&app, "  SARAH@X.COM ", "secret1").await;
    assert_eq!(status, StatusCode::OK);
}

// =============================================================================
// Sessions
// =============================================================================

#[tokio::test]
async fn test_me_with_bearer_and_cookie() {
    let app = test_app();
    register(&app, "Sarah", "sarah@x.com", "secret1").await;
    let (_, _, body) = login(&app, "sarah@x.com", "secret1").await;
    let token = body["token"].as_str().unwrap();

    let (status, _, me) = send(&app, with_bearer("GET", "/api/auth/me", token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["email"], "sarah@x.com");
    assert_eq!(me["id"], body["id"]);

    let request = Request::get("/api/auth/me")
        .header(header::COOKIE, format!("token={}", token))
        .body(Body::empty())
        .unwrap();
    let (status, _, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_me_requires_token() {
    let app = test_app();

    let (status, _, body) = send(&app, Request::get("/api/auth/me").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");

    let (status, _, body) = send(&app, with_bearer("GET", "/api/auth/me", "garbage")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "INVALID_TOKEN");
}

#[tokio::test]
async fn test_logout_revokes_token_and_is_idempotent() {
    let app = test_app();
    register(&app, "Sarah", "sarah@x.com", "secret1").await;
    let (_, _, body) = login(&app, "sarah@x.com", "secret1").await;
    let token = body["token"].as_str().unwrap();

    let (status, cookie, first) = send(&app, with_bearer("POST", "/api/auth/logout", token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first, json!({ "message": "logged out" }));
    assert!(cookie.unwrap().contains("Max-Age=0"));

    let (status, _, second) = send(&app, with_bearer("POST", "/api/auth/logout", token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first, second);

    let (status, _, body) = send(&app, with_bearer("GET", "/api/auth/me", token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "REVOKED_TOKEN");
}

#[tokio::test]
async fn test_logout_without_or_with_bad_token_succeeds() {
    let app = test_app();

    let (status, _, body) = send(
        &app,
        Request::post("/api/auth/logout").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "logged out");

    let (status, _, _) = send(&app, with_bearer("POST", "/api/auth/logout", "garbage")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_other_sessions_survive_logout() {
    let app = test_app();
    register(&app, "Sarah", "sarah@x.com", "secret1").await;
    let (_, _, first) = login(&app, "sarah@x.com", "secret1").await;
    let (_, _, second) = login(&app, "sarah@x.com", "secret1").await;

    let first = first["token"].as_str().unwrap();
    let second = second["token"].as_str().unwrap();
    send(&app, with_bearer("POST", "/api/auth/logout", first)).await;

    let (status, _, _) = send(&app, with_bearer("GET", "/api/auth/me", second)).await;
    assert_eq!(status, StatusCode::OK);
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_in_memory() {
    let app = test_app();
    let (status, _, body) = send(&app, Request::get("/health").body(Body::empty()).unwrap()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["services"]["database"]["status"], "disabled");
}
