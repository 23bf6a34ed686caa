//! `POST /api/users` end to end.

use axum::http::StatusCode;
use serde_json::json;

use crate::common::{TestHarness, ALICE, PASSWORD};

fn registration(email: &str, user_name: &str) -> serde_json::Value {
    json!({
        "email": email,
        "userName": user_name,
        "name": "Bob Builder",
        "password": "hunter22",
        "passwordConfirmation": "hunter22",
    })
}

#[tokio::test]
async fn test_create_user_then_login() {
    let harness = TestHarness::new().await;

    let (status, body) = harness
        .post_json("/api/users", registration("bob@example.com", "bob"))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["email"], "bob@example.com");
    assert_eq!(body["userName"], "bob");
    assert!(!body["id"].as_str().unwrap().is_empty());
    assert!(body.get("password").is_none());

    let (status, body) = harness.login("bob@example.com", "hunter22").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["roles"], json!(["Customer"]));
}

#[tokio::test]
async fn test_create_admin_user() {
    let harness = TestHarness::new().await;
    let mut request = registration("carol@example.com", "carol");
    request["role"] = json!("Admin");

    let (status, _) = harness.post_json("/api/users", request).await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = harness.login("carol@example.com", "hunter22").await;
    assert_eq!(body["roles"], json!(["Admin"]));
}

#[tokio::test]
async fn test_invalid_registration_lists_every_problem() {
    let harness = TestHarness::new().await;
    let request = json!({
        "email": "not-an-email",
        "userName": "",
        "name": "Bob",
        "password": "hunter22",
        "passwordConfirmation": "hunter23",
    });

    let (status, body) = harness.post_json("/api/users", request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "- Email is not a valid address\n\
         - User name is required\n\
         - Password confirmation does not match password\n"
    );
    assert!(harness.calls().is_empty());
}

#[tokio::test]
async fn test_duplicate_email_is_bad_request() {
    let harness = TestHarness::new().await;

    let (status, body) = harness
        .post_json("/api/users", registration(ALICE, "someone-else"))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = body["message"].as_str().unwrap();
    assert!(message.starts_with("- "));
    assert!(message.contains(ALICE));
    assert!(message.ends_with('\n'));
    assert_eq!(harness.calls(), vec!["create_user"]);
}

#[tokio::test]
async fn test_short_password_is_bad_request() {
    let harness = TestHarness::new().await;
    let mut request = registration("dave@example.com", "dave");
    request["password"] = json!("abc");
    request["passwordConfirmation"] = json!("abc");

    let (status, body) = harness.post_json("/api/users", request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "- Passwords must be at least 6 characters.\n"
    );
}

#[tokio::test]
async fn test_failed_registration_leaves_existing_login_intact() {
    let harness = TestHarness::new().await;
    harness
        .post_json("/api/users", registration(ALICE, "alice"))
        .await;
    harness.clear_calls();

    let (status, _) = harness.login(ALICE, PASSWORD).await;
    assert_eq!(status, StatusCode::OK);
}
