//! `POST /api/auth/login` end to end.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use keystone_core::FixedClock;

use crate::common::{TestHarness, ALICE, PASSWORD};

fn timestamp(body: &serde_json::Value, field: &str) -> DateTime<Utc> {
    body[field]
        .as_str()
        .unwrap_or_else(|| panic!("{field} should be a string"))
        .parse()
        .unwrap()
}

#[tokio::test]
async fn test_login_success_returns_token_and_roles() {
    let harness = TestHarness::new().await;

    let (status, body) = harness.login(ALICE, PASSWORD).await;

    assert_eq!(status, StatusCode::OK);
    let token = body["accessToken"].as_str().unwrap();
    assert!(!token.is_empty());

    let issued_at = timestamp(&body, "issuedAt");
    let expiration = timestamp(&body, "expirationDate");
    assert!(issued_at <= Utc::now());
    assert_eq!(expiration - issued_at, TimeDelta::hours(1));

    assert_eq!(body["roles"], serde_json::json!(["Customer", "Admin"]));
    assert_eq!(
        harness.calls(),
        vec!["find_user_by_email", "password_sign_in", "user_roles"]
    );
}

#[tokio::test]
async fn test_login_email_is_case_insensitive() {
    let harness = TestHarness::new().await;
    let (status, _) = harness.login("ALICE@example.com", PASSWORD).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_repeated_logins_get_distinct_tokens() {
    let harness = TestHarness::new().await;

    let (_, first) = harness.login(ALICE, PASSWORD).await;
    let (_, second) = harness.login(ALICE, PASSWORD).await;

    assert_ne!(first["accessToken"], second["accessToken"]);
}

#[tokio::test]
async fn test_unknown_user_is_unauthorized_without_verification() {
    let harness = TestHarness::new().await;

    let (status, body) = harness.login("nobody@example.com", PASSWORD).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, serde_json::json!({ "message": "User not found." }));
    assert_eq!(harness.calls(), vec!["find_user_by_email"]);
}

#[tokio::test]
async fn test_wrong_password_is_unauthorized() {
    let harness = TestHarness::new().await;

    let (status, body) = harness.login(ALICE, "not the password").await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, serde_json::json!({ "message": "Invalid credentials." }));
    assert_eq!(
        harness.calls(),
        vec!["find_user_by_email", "password_sign_in"]
    );
}

#[tokio::test]
async fn test_injected_clock_sets_timestamps() {
    let instant = Utc.with_ymd_and_hms(2030, 1, 2, 3, 4, 5).unwrap();
    let harness =
        TestHarness::with_login(|login| login.with_clock(Arc::new(FixedClock(instant)))).await;

    let (status, body) = harness.login(ALICE, PASSWORD).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["issuedAt"], "2030-01-02T03:04:05Z");
    assert_eq!(body["expirationDate"], "2030-01-02T04:04:05Z");
}

#[tokio::test]
async fn test_missing_field_is_rejected_before_the_use_case() {
    let harness = TestHarness::new().await;

    let (status, _) = harness
        .post_json("/api/auth/login", serde_json::json!({ "username": ALICE }))
        .await;

    assert!(status.is_client_error());
    assert!(harness.calls().is_empty());
}

#[tokio::test]
async fn test_non_json_body_is_rejected() {
    let harness = TestHarness::new().await;
    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header("content-type", "text/plain")
        .body(Body::from("username=alice"))
        .unwrap();

    let (status, _) = harness.send(request).await;

    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[tokio::test]
async fn test_get_is_method_not_allowed() {
    let harness = TestHarness::new().await;
    let request = Request::builder()
        .method("GET")
        .uri("/api/auth/login")
        .body(Body::empty())
        .unwrap();

    let (status, _) = harness.send(request).await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}
