//! Headless browser audit runner
//!
//! Launches one isolated Chromium process per audit, navigates to the target
//! page, evaluates the embedded rule script in-page, and tears the browser
//! down on every exit path. No retries, no partial results.

use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::Page;
use futures::StreamExt;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::audit::{Auditor, Issue};

/// In-page rule script; defines `__a11ydAudit(standard)` returning an array
/// of issue records.
const AUDIT_SCRIPT: &str = include_str!("audit.js");

/// Audit failure
#[derive(Debug, Error)]
pub enum AuditError {
    /// Browser process could not be started
    #[error("failed to launch browser: {0}")]
    Launch(String),

    /// Target page could not be opened or loaded
    #[error("failed to load page: {0}")]
    Navigation(String),

    /// Page did not become ready within the configured timeout
    #[error("page was not ready within {0} ms")]
    Timeout(u64),

    /// Rule script evaluation or result deserialization failed
    #[error("audit script failed: {0}")]
    Script(String),
}

/// WCAG conformance level selecting which rules are evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Standard {
    /// WCAG 2 level AA
    Wcag2aa,
    /// WCAG 2 level AAA
    Wcag2aaa,
}

impl Standard {
    pub fn as_str(&self) -> &'static str {
        match self {
            Standard::Wcag2aa => "WCAG2AA",
            Standard::Wcag2aaa => "WCAG2AAA",
        }
    }
}

/// Options applied to a single audit run
#[derive(Debug, Clone)]
pub struct AuditOptions {
    /// Conformance level to audit against
    pub standard: Standard,
    /// Upper bound in milliseconds on page readiness plus evaluation
    pub timeout_ms: u64,
    /// Fixed settle delay after load, for late-rendering content
    pub wait_ms: u64,
    /// CSS selector that must be present before evaluation starts
    pub wait_for: String,
    /// Keep notice-severity findings
    pub include_notices: bool,
    /// Keep warning-severity findings
    pub include_warnings: bool,
}

impl Default for AuditOptions {
    fn default() -> Self {
        Self {
            standard: Standard::Wcag2aaa,
            timeout_ms: 30_000,
            wait_ms: 5_000,
            wait_for: "body".to_string(),
            include_notices: true,
            include_warnings: true,
        }
    }
}

/// Production [`Auditor`] backed by a headless Chromium instance
#[derive(Debug, Default)]
pub struct BrowserAuditor;

impl BrowserAuditor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Auditor for BrowserAuditor {
    async fn run(&self, url: &str, options: &AuditOptions) -> Result<Vec<Issue>, AuditError> {
        run_audit(url, options).await
    }
}

/// Run one audit in a fresh browser process.
///
/// The browser is shut down before the outcome is inspected, so a failed or
/// timed-out audit releases the process like a successful one. If the caller
/// drops this future mid-flight (client disconnect), `Browser`'s `Drop` kills
/// the child.
pub async fn run_audit(url: &str, options: &AuditOptions) -> Result<Vec<Issue>, AuditError> {
    let config = BrowserConfig::builder()
        .no_sandbox()
        .arg("--disable-setuid-sandbox")
        .build()
        .map_err(AuditError::Launch)?;

    let (browser, mut handler) = Browser::launch(config)
        .await
        .map_err(|e| AuditError::Launch(e.to_string()))?;

    // Drives CDP message dispatch; ends when the browser connection closes.
    let driver = tokio::spawn(async move { while handler.next().await.is_some() {} });

    let deadline = Duration::from_millis(options.timeout_ms);
    let outcome = tokio::time::timeout(deadline, audit_page(&browser, url, options)).await;

    shutdown(browser, driver).await;

    match outcome {
        Ok(result) => result,
        Err(_) => Err(AuditError::Timeout(options.timeout_ms)),
    }
}

async fn audit_page(
    browser: &Browser,
    url: &str,
    options: &AuditOptions,
) -> Result<Vec<Issue>, AuditError> {
    let page = browser
        .new_page(url)
        .await
        .map_err(|e| AuditError::Navigation(e.to_string()))?;
    page.wait_for_navigation()
        .await
        .map_err(|e| AuditError::Navigation(e.to_string()))?;

    wait_for_selector(&page, &options.wait_for).await?;

    if options.wait_ms > 0 {
        tokio::time::sleep(Duration::from_millis(options.wait_ms)).await;
    }

    // The script returns its findings as a JSON string so the wire shape is
    // independent of CDP object serialization.
    let call = format!(
        "(() => {{ {}\nreturn JSON.stringify(__a11ydAudit({})); }})()",
        AUDIT_SCRIPT,
        serde_json::json!(options.standard.as_str()),
    );
    let raw: String = page
        .evaluate(call)
        .await
        .map_err(|e| AuditError::Script(e.to_string()))?
        .into_value()
        .map_err(|e| AuditError::Script(e.to_string()))?;

    let mut issues: Vec<Issue> =
        serde_json::from_str(&raw).map_err(|e| AuditError::Script(e.to_string()))?;

    for issue in &issues {
        if issue.is_blank() {
            debug!(selector = %issue.selector, "audit record carries no code or message");
        }
    }

    apply_severity_filter(&mut issues, options);

    Ok(issues)
}

/// Poll until the readiness selector matches. Bounded by the caller's
/// overall timeout.
async fn wait_for_selector(page: &Page, selector: &str) -> Result<(), AuditError> {
    let probe = format!(
        "document.querySelector({}) !== null",
        serde_json::json!(selector)
    );
    loop {
        let found = page
            .evaluate(probe.clone())
            .await
            .map_err(|e| AuditError::Script(e.to_string()))?
            .into_value::<bool>()
            .unwrap_or(false);
        if found {
            return Ok(());
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
}

/// Drop advisory severities the configuration excludes.
fn apply_severity_filter(issues: &mut Vec<Issue>, options: &AuditOptions) {
    if !options.include_notices {
        issues.retain(|i| i.issue_type != "notice");
    }
    if !options.include_warnings {
        issues.retain(|i| i.issue_type != "warning");
    }
}

async fn shutdown(mut browser: Browser, driver: JoinHandle<()>) {
    if let Err(e) = browser.close().await {
        debug!("browser close: {}", e);
    }
    if let Err(e) = browser.wait().await {
        debug!("browser wait: {}", e);
    }
    driver.abort();
}
