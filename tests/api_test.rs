//! Router tests for `/healthz` and `/process`
//!
//! Requests are driven through the axum router directly with
//! `tower::ServiceExt::oneshot`, against an in-memory API.

mod common;

use std::collections::HashSet;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use fluxsave::server::AppState;
use serde_json::Value;
use tower::ServiceExt;

use common::FakeApi;

fn router(api: std::sync::Arc<FakeApi>) -> Router {
    AppState::new(api).build_router()
}

async fn send(router: Router, method: Method, uri: &str) -> (StatusCode, Value) {
    let response = router
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

// ============================================================================
// /healthz
// ============================================================================

#[tokio::test]
async fn test_healthz_reachable_api() {
    let (status, body) = send(router(FakeApi::default().shared()), Method::GET, "/healthz").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let timestamp = body["timestamp"].as_str().expect("timestamp should be a string");
    assert!(
        chrono::DateTime::parse_from_rfc3339(timestamp).is_ok(),
        "timestamp should be RFC3339: {timestamp}"
    );
}

#[tokio::test]
async fn test_healthz_api_error() {
    let api = FakeApi {
        me_error: true,
        ..Default::default()
    };
    let (status, body) = send(router(api.shared()), Method::GET, "/healthz").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "unhealthy");
    assert_eq!(body["message"], "Cannot connect to Miniflux API");
    assert!(body["error"].as_str().unwrap().contains("unauthorized"));
}

#[tokio::test]
async fn test_healthz_timeout() {
    let api = FakeApi {
        me_delay: Some(Duration::from_secs(5)),
        ..Default::default()
    }
    .shared();
    let router = AppState::new(api)
        .with_health_timeout(Duration::from_millis(50))
        .build_router();

    let (status, body) = send(router, Method::GET, "/healthz").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "unhealthy");
    assert_eq!(body["message"], "Health check timeout");
    assert!(body.get("error").is_none());
}

#[tokio::test]
async fn test_healthz_rejects_post() {
    let response = router(FakeApi::default().shared())
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/healthz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert!(response.headers().contains_key(header::ALLOW));
}

// ============================================================================
// /process
// ============================================================================

#[tokio::test]
async fn test_process_counts_save_failure() {
    let api = FakeApi {
        fail_save: HashSet::from([2]),
        ..FakeApi::with_entries(&[1, 2, 3])
    };
    let (status, body) = send(router(api.shared()), Method::POST, "/process").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        serde_json::json!({"processed": 2, "errors": 1, "total": 3})
    );
}

/// A slow pass is never cut short by the server: every fetched entry is
/// saved and marked read, and the counts cover the whole page.
#[tokio::test(start_paused = true)]
async fn test_process_long_pass_runs_to_completion() {
    let ids: Vec<i64> = (1..=20).collect();
    let api = FakeApi {
        save_delay: Some(Duration::from_secs(1)),
        mark_read_delay: Some(Duration::from_millis(500)),
        ..FakeApi::with_entries(&ids)
    }
    .shared();

    let started = tokio::time::Instant::now();
    let (status, body) = send(router(api.clone()), Method::POST, "/process").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        serde_json::json!({"processed": 20, "errors": 0, "total": 20})
    );
    assert_eq!(api.save_calls(), 20);
    assert_eq!(api.mark_read_calls(), 20);
    assert!(started.elapsed() >= Duration::from_secs(30));
}

#[tokio::test(start_paused = true)]
async fn test_process_slow_pass_counts_add_up() {
    let api = FakeApi {
        fail_save: HashSet::from([4, 9]),
        save_delay: Some(Duration::from_secs(2)),
        ..FakeApi::with_entries(&(1..=12).collect::<Vec<_>>())
    }
    .shared();

    let (status, body) = send(router(api.clone()), Method::POST, "/process").await;

    assert_eq!(status, StatusCode::OK);
    let processed = body["processed"].as_u64().unwrap();
    let errors = body["errors"].as_u64().unwrap();
    assert_eq!(body["total"], 12);
    assert_eq!(errors, 2);
    assert_eq!(processed + errors, 12);
    assert_eq!(api.mark_read_calls(), 10);
}

#[tokio::test]
async fn test_process_with_no_entries() {
    let (status, body) = send(router(FakeApi::default().shared()), Method::POST, "/process").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        serde_json::json!({"processed": 0, "errors": 0, "total": 0})
    );
}

#[tokio::test]
async fn test_process_rejects_get() {
    let api = FakeApi::with_entries(&[1]).shared();
    let (status, _) = send(router(api.clone()), Method::GET, "/process").await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(api.entries_calls(), 0, "rejected requests must not process");
}

#[tokio::test]
async fn test_unknown_route() {
    let (status, _) = send(router(FakeApi::default().shared()), Method::GET, "/metrics").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
