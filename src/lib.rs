//! a11yd library - accessibility audit service
//!
//! Single-endpoint microservice: POST /check runs an automated WCAG audit
//! against a URL in a headless Chromium instance and returns the findings
//! grouped into display categories.

use std::sync::Arc;

use axum::Router;
use tokio::sync::Semaphore;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod audit;
pub mod config;

use audit::Auditor;
use config::Config;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Audit backend (headless browser in production, stub in tests)
    pub auditor: Arc<dyn Auditor>,
    /// Audit options applied to every request
    pub config: Arc<Config>,
    /// Caps the number of simultaneous browser instances
    pub audit_permits: Arc<Semaphore>,
}

impl AppState {
    /// Create new application state
    pub fn new(auditor: Arc<dyn Auditor>, config: Config) -> Self {
        let permits = config.max_audits.max(1);
        Self {
            auditor,
            config: Arc::new(config),
            audit_permits: Arc::new(Semaphore::new(permits)),
        }
    }
}

/// Build application router
///
/// CORS is wide open: the endpoint is meant to be callable from any
/// front-end origin.
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    Router::new()
        .route("/", get(api::serve_index))
        .route("/check", post(api::check_url))
        .merge(api::health_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
