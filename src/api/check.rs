//! Accessibility check endpoint
//!
//! POST /check with a target URL (JSON or form-encoded body); responds with
//! the audit findings grouped into display categories.

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};

use crate::audit::{classify, AuditError, GroupedResult};
use crate::AppState;

/// Request body for POST /check
#[derive(Debug, Default, Deserialize)]
pub struct CheckRequest {
    #[serde(default)]
    pub url: Option<String>,
}

/// Response envelope for a successful check
#[derive(Debug, Serialize)]
pub struct CheckResponse {
    pub result: GroupedResult,
}

/// Check endpoint errors
#[derive(Debug)]
pub enum CheckError {
    /// URL missing or not an HTTP(S) URL; the auditor is never invoked
    InvalidUrl,
    /// The audit itself failed
    Audit(AuditError),
    /// Server-side invariant broken (semaphore closed)
    Internal(String),
}

impl IntoResponse for CheckError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            CheckError::InvalidUrl => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Invalid URL" }),
            ),
            CheckError::Audit(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "Error checking the URL.", "detail": e.to_string() }),
            ),
            CheckError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": msg }),
            ),
        };

        (status, Json(body)).into_response()
    }
}

/// POST /check
///
/// Validates the URL, runs the audit under a concurrency permit, and returns
/// the grouped findings with the requested URL echoed back verbatim.
pub async fn check_url(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<CheckResponse>, CheckError> {
    let request = decode_request(&headers, &body);
    let url = match request.url {
        Some(url) if is_http_url(&url) => url,
        _ => return Err(CheckError::InvalidUrl),
    };

    // One permit per in-flight browser instance.
    let _permit = state
        .audit_permits
        .acquire()
        .await
        .map_err(|e| CheckError::Internal(e.to_string()))?;

    info!(%url, "running accessibility audit");
    let issues = state
        .auditor
        .run(&url, &state.config.audit)
        .await
        .map_err(|e| {
            error!(%url, "audit failed: {}", e);
            CheckError::Audit(e)
        })?;

    info!(%url, issues = issues.len(), "audit complete");
    Ok(Json(CheckResponse {
        result: classify(url, issues),
    }))
}

/// Prefix check only: no DNS resolution, no scheme allow-list beyond "http".
fn is_http_url(url: &str) -> bool {
    url.starts_with("http")
}

/// Decode the body as form-encoded or JSON depending on Content-Type.
///
/// An unparseable body decodes to an empty request, which then fails URL
/// validation rather than producing a separate error shape.
fn decode_request(headers: &HeaderMap, body: &Bytes) -> CheckRequest {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    if content_type.starts_with("application/x-www-form-urlencoded") {
        serde_urlencoded::from_bytes(body).unwrap_or_default()
    } else {
        serde_json::from_slice(body).unwrap_or_default()
    }
}
