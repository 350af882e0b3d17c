//! Error types for the DMS

use dms_logging::{Event, Flag, LogError, ParseSeverityError};
use std::io;
use thiserror::Error;

/// A required command line value is missing.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentError {
    #[error("Missing command line argument {0}")]
    Missing(Flag),
}

impl ArgumentError {
    pub fn flag(&self) -> Flag {
        match self {
            ArgumentError::Missing(flag) => *flag,
        }
    }

    pub fn event(&self) -> Event {
        Event::MissingArgument(self.flag())
    }
}

/// A resource the program needs could not be acquired.
#[derive(Error, Debug)]
pub enum ResourceError {
    #[error("Cannot open log file '{path}': {source}")]
    LogfileUnavailable {
        path: String,
        #[source]
        source: LogError,
    },
}

impl ResourceError {
    pub fn event(&self) -> Event {
        match self {
            ResourceError::LogfileUnavailable { .. } => Event::LogfileUnavailable,
        }
    }
}

/// Settings file or environment override is invalid.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read settings file")]
    Io(#[from] io::Error),

    #[error("Invalid settings file")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid level override")]
    Level(#[from] ParseSeverityError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_argument_error_maps_to_event_code() {
        let err = ArgumentError::Missing(Flag::Log);
        assert_eq!(err.event().code().0, 100_003);
        assert_eq!(err.to_string(), err.event().message());
    }

    #[test]
    fn test_resource_error_maps_to_event_code() {
        let err = ResourceError::LogfileUnavailable {
            path: "/nope/dms.log".to_string(),
            source: LogError::Io(io::Error::new(io::ErrorKind::NotFound, "not found")),
        };
        assert_eq!(err.event().code().0, 200_001);
        assert!(err.to_string().contains("/nope/dms.log"));
    }

    #[test]
    fn test_config_error_chain_names_cause_once() {
        let cause = "loud".parse::<dms_logging::Severity>().unwrap_err();
        let err = ConfigError::from(cause.clone());
        assert_eq!(err.to_string(), "Invalid level override");
        assert!(err.source().is_some());

        let rendered = format!("{:#}", anyhow::Error::from(err));
        assert_eq!(rendered.matches(&cause.to_string()).count(), 1, "{}", rendered);
    }
}
