//! Common test utilities and harness for Keystone API integration tests.

use std::sync::{Arc, Mutex};

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use keystone_api::{create_router, AppState};
use keystone_auth::testing::RecordingGateway;
use keystone_auth::{LoginUseCase, UserRole};
use keystone_auth_memory::{InMemoryIdentityProvider, SeedUser};
use serde_json::Value;
use tower::ServiceExt;

/// Password shared by every seeded account.
pub const PASSWORD: &str = "correct horse battery";

/// Email of the seeded account with two roles.
pub const ALICE: &str = "alice@example.com";

/// Test harness for integration tests.
///
/// Seeds one account and records every call the router makes to the
/// identity provider.
pub struct TestHarness {
    /// Router under test
    pub router: Router,
    /// Identity-provider calls made so far
    pub calls: Arc<Mutex<Vec<&'static str>>>,
}

impl TestHarness {
    /// Creates a harness with the default use cases.
    pub async fn new() -> Self {
        Self::build(|state| state).await
    }

    /// Creates a harness whose login use case is customized by `customize`.
    pub async fn with_login<F>(customize: F) -> Self
    where
        F: FnOnce(LoginUseCase) -> LoginUseCase,
    {
        Self::build(|state| {
            let login = customize(state.login.clone());
            state.with_login(login)
        })
        .await
    }

    async fn build<F>(customize: F) -> Self
    where
        F: FnOnce(AppState) -> AppState,
    {
        let provider = InMemoryIdentityProvider::new();
        provider
            .seed(&SeedUser {
                email: ALICE.to_string(),
                user_name: "alice".to_string(),
                name: "Alice Liddell".to_string(),
                password: PASSWORD.to_string(),
                roles: vec![UserRole::Customer, UserRole::Admin],
            })
            .await
            .expect("seeding should succeed");

        let recording = RecordingGateway::new(provider);
        let calls = recording.call_log();
        let state = customize(AppState::new(Arc::new(recording)));

        Self {
            router: create_router(state),
            calls,
        }
    }

    /// Identity-provider calls made so far, in order.
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    /// Forget recorded calls (e.g. after setup requests).
    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// POST a JSON body and return the status and decoded body.
    pub async fn post_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap();
        self.send(request).await
    }

    /// Send a request and return the status and body (JSON, or null).
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    /// Log in and return status and body.
    pub async fn login(&self, username: &str, password: &str) -> (StatusCode, Value) {
        self.post_json(
            "/api/auth/login",
            serde_json::json!({ "username": username, "password": password }),
        )
        .await
    }
}
