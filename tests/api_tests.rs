//! Integration tests for a11yd API endpoints
//!
//! Tests cover:
//! - Health endpoint
//! - POST /check URL validation (missing, non-http, both body encodings)
//! - POST /check success path with grouped results
//! - POST /check audit failure path and permit release

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::Value;
use tower::util::ServiceExt; // for `oneshot` method

use a11yd::audit::{AuditError, AuditOptions, Auditor, Issue};
use a11yd::config::Config;
use a11yd::{build_router, AppState};

/// Stub auditor returning a fixed issue list and counting invocations
struct StubAuditor {
    issues: Vec<Issue>,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl Auditor for StubAuditor {
    async fn run(&self, _url: &str, _options: &AuditOptions) -> Result<Vec<Issue>, AuditError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.issues.clone())
    }
}

/// Stub auditor that always fails, as a page-load timeout would
struct FailingAuditor;

#[async_trait]
impl Auditor for FailingAuditor {
    async fn run(&self, _url: &str, _options: &AuditOptions) -> Result<Vec<Issue>, AuditError> {
        Err(AuditError::Timeout(30_000))
    }
}

fn issue(code: &str, message: &str) -> Issue {
    Issue {
        code: code.to_string(),
        message: message.to_string(),
        issue_type: "error".to_string(),
        selector: "html > body".to_string(),
        context: "<p>...</p>".to_string(),
    }
}

/// Test helper: app with a stub auditor; returns the invocation counter too
fn setup_app(issues: Vec<Issue>) -> (axum::Router, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let auditor = StubAuditor {
        issues,
        calls: calls.clone(),
    };
    let state = AppState::new(Arc::new(auditor), Config::default());
    (build_router(state), calls)
}

/// Test helper: JSON POST request
fn json_request(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Test helper: Extract JSON body from response
async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

// =============================================================================
// Health endpoint
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _) = setup_app(Vec::new());

    let request = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "a11yd");
    assert!(body["version"].is_string());
}

// =============================================================================
// URL validation
// =============================================================================

#[tokio::test]
async fn test_check_rejects_non_http_scheme_without_invoking_auditor() {
    let (app, calls) = setup_app(Vec::new());

    let request = json_request("/check", r#"{"url": "ftp://example.com"}"#);
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"], "Invalid URL");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_check_rejects_missing_url() {
    let (app, calls) = setup_app(Vec::new());

    let request = json_request("/check", "{}");
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"], "Invalid URL");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_check_rejects_unparseable_body() {
    let (app, calls) = setup_app(Vec::new());

    let request = json_request("/check", "not even json");
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

// =============================================================================
// Success path
// =============================================================================

#[tokio::test]
async fn test_check_returns_grouped_result_with_url_echoed() {
    let (app, calls) = setup_app(vec![
        issue(
            "WCAG2AA.Principle1.Guideline1_4.1_4_3.G18",
            "This element has insufficient contrast at this conformance level.",
        ),
        issue("image-alt", "Img element missing an alt attribute"),
        issue("misc.rule", "Nothing the predicates recognize"),
    ]);

    let request = json_request("/check", r#"{"url": "https://example.com/page?q=1"}"#);
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let body = extract_json(response.into_body()).await;
    let result = &body["result"];
    // URL echoed verbatim, not normalized.
    assert_eq!(result["siteName"], "https://example.com/page?q=1");
    assert_eq!(result["contrastIssues"].as_array().unwrap().len(), 1);
    assert_eq!(result["altIssues"].as_array().unwrap().len(), 1);
    assert_eq!(result["otherIssues"].as_array().unwrap().len(), 1);
    assert_eq!(result["elementIssues"].as_array().unwrap().len(), 0);
    assert_eq!(result["navigationIssues"].as_array().unwrap().len(), 0);
    assert_eq!(result["formIssues"].as_array().unwrap().len(), 0);

    // Pass-through fields survive to the wire.
    assert_eq!(result["altIssues"][0]["type"], "error");
    assert_eq!(result["altIssues"][0]["selector"], "html > body");
}

#[tokio::test]
async fn test_check_accepts_form_encoded_body() {
    let (app, _) = setup_app(Vec::new());

    let request = Request::builder()
        .method("POST")
        .uri("/check")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from("url=https%3A%2F%2Fexample.com"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["result"]["siteName"], "https://example.com");
}

// =============================================================================
// Failure path
// =============================================================================

#[tokio::test]
async fn test_check_audit_failure_returns_500_with_detail() {
    let state = AppState::new(Arc::new(FailingAuditor), Config::default());
    let app = build_router(state);

    let request = json_request("/check", r#"{"url": "https://example.com"}"#);
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"], "Error checking the URL.");
    assert!(body["detail"].as_str().unwrap().contains("30000 ms"));
}

#[tokio::test]
async fn test_audit_failure_releases_concurrency_permit() {
    let state = AppState::new(Arc::new(FailingAuditor), Config::default());
    let permits = state.audit_permits.clone();
    let max = permits.available_permits();
    let app = build_router(state);

    for _ in 0..3 {
        let request = json_request("/check", r#"{"url": "https://example.com"}"#);
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    // Every failed audit returned its permit.
    assert_eq!(permits.available_permits(), max);
}
