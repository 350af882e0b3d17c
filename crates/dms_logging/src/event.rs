//! Event codes, severity tiers and the fixed message table.
//!
//! An event code is a six digit number. Dividing it by [`TIER_DIVISOR`]
//! yields the severity tier (`100001` is tier 1, `700001` is tier 7).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Prefix of every composite record id (`AbcdsDMS-<tier>-<code>`).
pub const NAMESPACE: &str = "AbcdsDMS";

/// `code / TIER_DIVISOR` is the severity tier.
pub const TIER_DIVISOR: u32 = 100_000;

/// Severity of a log record, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
    Fatal,
    Critical,
}

impl Severity {
    /// Map a tier to a severity. Unknown tiers are treated as fatal.
    pub fn from_tier(tier: u32) -> Self {
        match tier {
            1 => Severity::Critical,
            2 => Severity::Fatal,
            3 => Severity::Error,
            4 => Severity::Warning,
            5 | 6 => Severity::Info,
            7 => Severity::Debug,
            _ => Severity::Fatal,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::Fatal => "fatal",
            Severity::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a severity name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown severity '{0}' (expected debug, info, warning, error, fatal or critical)")]
pub struct ParseSeverityError(String);

impl FromStr for Severity {
    type Err = ParseSeverityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(Severity::Debug),
            "info" => Ok(Severity::Info),
            "warn" | "warning" => Ok(Severity::Warning),
            "error" => Ok(Severity::Error),
            "fatal" => Ok(Severity::Fatal),
            "critical" | "panic" => Ok(Severity::Critical),
            _ => Err(ParseSeverityError(s.to_string())),
        }
    }
}

/// A required command line flag.
///
/// Declaration order is the order in which missing flags are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flag {
    /// `-f`: directory holding the files before sorting
    Source,
    /// `-i`: JSON index file of the filing system
    Index,
    /// `-l`: log file of the program
    Log,
    /// `-s`: directory the sorted files are stored in
    Storage,
}

impl Flag {
    pub const ALL: [Flag; 4] = [Flag::Source, Flag::Index, Flag::Log, Flag::Storage];

    pub fn as_str(&self) -> &'static str {
        match self {
            Flag::Source => "-f",
            Flag::Index => "-i",
            Flag::Log => "-l",
            Flag::Storage => "-s",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        Flag::ALL.into_iter().find(|flag| flag.as_str() == token)
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every event the program knows how to describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Event {
    MissingArgument(Flag),
    LogfileUnavailable,
    ServiceStarted,
}

impl Event {
    pub const ALL: [Event; 6] = [
        Event::MissingArgument(Flag::Source),
        Event::MissingArgument(Flag::Index),
        Event::MissingArgument(Flag::Log),
        Event::MissingArgument(Flag::Storage),
        Event::LogfileUnavailable,
        Event::ServiceStarted,
    ];

    pub fn code(&self) -> EventCode {
        EventCode(match self {
            Event::MissingArgument(Flag::Source) => 100_001,
            Event::MissingArgument(Flag::Index) => 100_002,
            Event::MissingArgument(Flag::Log) => 100_003,
            Event::MissingArgument(Flag::Storage) => 100_004,
            Event::LogfileUnavailable => 200_001,
            Event::ServiceStarted => 700_001,
        })
    }

    pub fn message(&self) -> &'static str {
        match self {
            Event::MissingArgument(Flag::Source) => "Missing command line argument -f",
            Event::MissingArgument(Flag::Index) => "Missing command line argument -i",
            Event::MissingArgument(Flag::Log) => "Missing command line argument -l",
            Event::MissingArgument(Flag::Storage) => "Missing command line argument -s",
            Event::LogfileUnavailable => "Error with your logfile, set file to STDOUT",
            Event::ServiceStarted => "Abcdsdms started",
        }
    }

    pub fn from_code(code: EventCode) -> Option<Self> {
        Event::ALL.into_iter().find(|event| event.code() == code)
    }
}

/// Numeric event identifier as it appears on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventCode(pub u32);

impl EventCode {
    pub fn tier(&self) -> u32 {
        self.0 / TIER_DIVISOR
    }

    pub fn severity(&self) -> Severity {
        Severity::from_tier(self.tier())
    }

    /// Message text for this code, or `""` when the code is not in the table.
    pub fn message(&self) -> &'static str {
        Event::from_code(*self).map(|event| event.message()).unwrap_or("")
    }

    /// Composite id, e.g. `AbcdsDMS-2-200001`.
    pub fn id(&self) -> String {
        format!("{}-{}-{}", NAMESPACE, self.tier(), self.0)
    }
}

impl From<Event> for EventCode {
    fn from(event: Event) -> Self {
        event.code()
    }
}

impl From<u32> for EventCode {
    fn from(code: u32) -> Self {
        EventCode(code)
    }
}

impl fmt::Display for EventCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
