//! a11yd - accessibility audit HTTP service
//!
//! Accepts a target URL on POST /check, audits the page in an isolated
//! headless Chromium instance, and returns the findings grouped into
//! human-meaningful categories.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use a11yd::audit::BrowserAuditor;
use a11yd::config::{Cli, Config};
use a11yd::{build_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Starting a11yd v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    let config = Config::from_cli(cli);
    info!(
        "Audit standard: {}, page timeout: {} ms, max concurrent audits: {}",
        config.audit.standard.as_str(),
        config.audit.timeout_ms,
        config.max_audits
    );

    let addr = format!("{}:{}", config.bind, config.port);
    let state = AppState::new(Arc::new(BrowserAuditor::new()), config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("a11yd listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
