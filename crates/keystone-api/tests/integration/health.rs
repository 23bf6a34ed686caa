use axum::body::Body;
use axum::http::{Request, StatusCode};

use crate::common::TestHarness;

#[tokio::test]
async fn test_health_reports_ok() {
    let harness = TestHarness::new().await;
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let (status, body) = harness.send(request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert!(harness.calls().is_empty());
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let harness = TestHarness::new().await;
    let request = Request::builder()
        .uri("/api/nope")
        .body(Body::empty())
        .unwrap();

    let (status, _) = harness.send(request).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
