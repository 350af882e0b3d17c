//! `dms -f <filing dir> -i <index file> -l <log file> -s <storage dir>`

use anyhow::{Context, Result};
use dms::DmsConfig;
use dms_logging::TracingConfig;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::warn;

fn load_settings() -> Result<DmsConfig> {
    let path = std::env::var_os("DMS_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(dms_logging::default_config_path);
    DmsConfig::load_or_default(&path)
        .with_context(|| format!("Failed to load settings from {}", path.display()))
}

fn load_config() -> DmsConfig {
    let mut config = load_settings().unwrap_or_else(|err| {
        warn!("{:#}; using default settings", err);
        DmsConfig::default()
    });

    let level = std::env::var("DMS_LOG_LEVEL").ok();
    if let Err(err) = config.apply_level_override(level.as_deref()) {
        warn!(
            "Ignoring DMS_LOG_LEVEL: {:#}; keeping min_level {}",
            anyhow::Error::from(err),
            config.min_level
        );
    }
    config
}

fn main() -> ExitCode {
    let trace_filter = std::env::var("DMS_LOG").ok();
    if let Err(err) = dms_logging::init_tracing(TracingConfig {
        filter: trace_filter.as_deref(),
        ..TracingConfig::default()
    }) {
        eprintln!("Warning: {:#}", err);
    }

    let config = load_config();

    // Paths are opaque to the validator; non UTF-8 bytes are replaced, not rejected
    let args: Vec<String> = std::env::args_os()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect();
    let outcome = dms::run(&args, &config);

    ExitCode::from(outcome.exit_status())
}
