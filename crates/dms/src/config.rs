//! Runtime settings for the DMS

use crate::error::ConfigError;
use dms_logging::Severity;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings read from `config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DmsConfig {
    /// Least severe event level written to the event log
    #[serde(default = "default_min_level")]
    pub min_level: Severity,

    /// Stop with a non-zero exit status when a required argument is missing.
    /// When false the program logs the missing argument and keeps going.
    #[serde(default = "default_abort_on_missing_argument")]
    pub abort_on_missing_argument: bool,
}

fn default_min_level() -> Severity {
    Severity::Debug
}

fn default_abort_on_missing_argument() -> bool {
    true
}

impl Default for DmsConfig {
    fn default() -> Self {
        Self {
            min_level: default_min_level(),
            abort_on_missing_argument: default_abort_on_missing_argument(),
        }
    }
}

impl DmsConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: DmsConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Like [`DmsConfig::load`], but a file that does not exist yields the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Apply a level override such as the value of `DMS_LOG_LEVEL`.
    ///
    /// On error the configuration is left unchanged.
    pub fn apply_level_override(&mut self, level: Option<&str>) -> Result<(), ConfigError> {
        if let Some(level) = level.filter(|l| !l.trim().is_empty()) {
            self.min_level = level.parse()?;
        }
        Ok(())
    }
}
