//! Accessibility audit engine
//!
//! One isolated headless browser process per audit, guaranteed teardown on
//! all exit paths, findings classified into display categories.

pub mod classify;
pub mod issue;
pub mod runner;

pub use classify::{classify, GroupedResult};
pub use issue::Issue;
pub use runner::{AuditError, AuditOptions, BrowserAuditor, Standard};

use async_trait::async_trait;

/// Audit backend
///
/// Production uses [`BrowserAuditor`]; tests substitute a stub so the HTTP
/// layer can be exercised without a Chromium install.
#[async_trait]
pub trait Auditor: Send + Sync {
    /// Audit `url` and return the flat issue sequence.
    ///
    /// The URL must already be validated by the caller. Either a full issue
    /// sequence is returned or an error, never partial results.
    async fn run(&self, url: &str, options: &AuditOptions) -> Result<Vec<Issue>, AuditError>;
}
