//! Logging for the DMS binaries.
//!
//! Two separate outputs live here:
//!
//! - the **event log** ([`EventLogger`]): coded, line-delimited JSON records
//!   written to the log file given with `-l` (or stdout);
//! - **diagnostic tracing** ([`init_tracing`]): internal `tracing` output on
//!   stderr, filtered with `DMS_LOG` or `RUST_LOG`.

pub mod event;
pub mod logger;

pub use event::{Event, EventCode, Flag, ParseSeverityError, Severity, NAMESPACE, TIER_DIVISOR};
pub use logger::{EventLogger, LogError, LogRecord, SinkKind, LOG_FILE_MODE};

use anyhow::{anyhow, Result};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const DEFAULT_TRACE_FILTER: &str = "dms=warn,dms_logging=warn";

/// Diagnostic tracing configuration.
pub struct TracingConfig<'a> {
    /// Filter directive; falls back to `RUST_LOG`, then the built-in default
    pub filter: Option<&'a str>,
    pub ansi: bool,
}

impl Default for TracingConfig<'_> {
    fn default() -> Self {
        Self {
            filter: None,
            ansi: true,
        }
    }
}

/// Install the global tracing subscriber writing to stderr.
pub fn init_tracing(config: TracingConfig<'_>) -> Result<()> {
    let filter = match config.filter {
        Some(directives) => EnvFilter::try_new(directives)
            .map_err(|e| anyhow!("Invalid trace filter '{}': {}", directives, e))?,
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_TRACE_FILTER)),
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(config.ansi)
                .with_filter(filter),
        )
        .try_init()
        .map_err(|e| anyhow!("Failed to install tracing subscriber: {}", e))?;

    Ok(())
}

/// Get the DMS home directory: `$DMS_HOME`, else `~/.dms`.
pub fn dms_home() -> PathBuf {
    if let Ok(override_path) = std::env::var("DMS_HOME") {
        return PathBuf::from(override_path);
    }
    dirs::home_dir()
        .map(|home| home.join(".dms"))
        .unwrap_or_else(|| PathBuf::from(".dms"))
}

/// Default settings file: `<dms_home>/config.toml`.
pub fn default_config_path() -> PathBuf {
    dms_home().join("config.toml")
}
