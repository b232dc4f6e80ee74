//! a11yd startup configuration
//!
//! Resolved once from CLI flags and environment variables, then passed to the
//! server as an explicit configuration object.

use clap::Parser;

use crate::audit::{AuditOptions, Standard};

/// Command-line arguments (every flag also reads an environment variable)
#[derive(Debug, Parser)]
#[command(name = "a11yd", about = "Accessibility audit HTTP service", version)]
pub struct Cli {
    /// Port to listen on
    #[arg(long, env = "A11YD_PORT", default_value_t = 3000)]
    pub port: u16,

    /// Bind address
    #[arg(long, env = "A11YD_BIND", default_value = "0.0.0.0")]
    pub bind: String,

    /// Maximum number of simultaneous browser instances
    #[arg(long, env = "A11YD_MAX_AUDITS", default_value_t = 4)]
    pub max_audits: usize,

    /// WCAG conformance level to audit against
    #[arg(long, value_enum, env = "A11YD_STANDARD", default_value_t = Standard::Wcag2aaa)]
    pub standard: Standard,

    /// Maximum milliseconds to wait for the page under test
    #[arg(long, env = "A11YD_TIMEOUT_MS", default_value_t = 30_000)]
    pub timeout_ms: u64,

    /// Fixed settle delay after page load, in milliseconds
    #[arg(long, env = "A11YD_WAIT_MS", default_value_t = 5_000)]
    pub wait_ms: u64,

    /// CSS selector that must be present before evaluation starts
    #[arg(long, env = "A11YD_WAIT_FOR", default_value = "body")]
    pub wait_for: String,

    /// Exclude notice-severity findings from results
    #[arg(long, env = "A11YD_NO_NOTICES")]
    pub no_notices: bool,

    /// Exclude warning-severity findings from results
    #[arg(long, env = "A11YD_NO_WARNINGS")]
    pub no_warnings: bool,
}

/// Resolved server configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub bind: String,
    pub max_audits: usize,
    pub audit: AuditOptions,
}

impl Config {
    /// Build the server configuration from parsed CLI arguments
    pub fn from_cli(cli: Cli) -> Self {
        Self {
            port: cli.port,
            bind: cli.bind,
            max_audits: cli.max_audits,
            audit: AuditOptions {
                standard: cli.standard,
                timeout_ms: cli.timeout_ms,
                wait_ms: cli.wait_ms,
                wait_for: cli.wait_for,
                include_notices: !cli.no_notices,
                include_warnings: !cli.no_warnings,
            },
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            bind: "0.0.0.0".to_string(),
            max_audits: 4,
            audit: AuditOptions::default(),
        }
    }
}
