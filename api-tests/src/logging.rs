// api-tests/src/logging.rs
// ============================================================================
// Module: Test Logging
// Description: `tracing` subscriber setup for acceptance suite binaries.
// Purpose: Give every suite the same filterable, optionally JSON, log output.
// Dependencies: tracing, tracing-subscriber
// ============================================================================

//! ## Overview
//! Suites call [`init_test_logging`] once per test; only the first call in a
//! process installs a subscriber. Output goes through the libtest writer so
//! logs are captured alongside the owning test.

// ============================================================================
// SECTION: Imports
// ============================================================================

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::ApiTestConfig;
use crate::config::LogFormat;

// ============================================================================
// SECTION: Config
// ============================================================================

/// Logging settings for a suite binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// `EnvFilter` directive string, e.g. `info,dp_api_tests=debug`.
    pub filter: String,
    /// Output format.
    pub format: LogFormat,
}

impl From<&ApiTestConfig> for LoggingConfig {
    fn from(config: &ApiTestConfig) -> Self {
        Self {
            filter: config.log_filter.clone(),
            format: config.log_format,
        }
    }
}

// ============================================================================
// SECTION: Init
// ============================================================================

/// Installs the global subscriber if none is installed yet.
///
/// Returns `true` when this call installed the subscriber and `false` when
/// one was already present.
///
/// # Errors
///
/// Returns an error when the filter directive does not parse.
pub fn init_test_logging(config: &LoggingConfig) -> Result<bool, String> {
    let filter = EnvFilter::try_new(&config.filter)
        .map_err(|err| format!("invalid log filter `{}`: {err}", config.filter))?;
    let layer = fmt::layer().with_test_writer().with_target(true);
    let installed = match config.format {
        LogFormat::Text => tracing_subscriber::registry().with(filter).with(layer).try_init(),
        LogFormat::Json => {
            tracing_subscriber::registry().with(filter).with(layer.json()).try_init()
        }
    };
    Ok(installed.is_ok())
}
