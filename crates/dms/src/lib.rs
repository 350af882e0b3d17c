//! Abcds DMS - document management system
//!
//! The DMS files documents from a source directory (`-f`) into a sorted
//! storage directory (`-s`) and keeps a JSON index (`-i`) of what it stored,
//! writing coded events to a log file (`-l`).
//!
//! This crate holds startup: argument validation, runtime settings and the
//! choice of event log sink. Event codes and the JSON logger live in
//! `dms_logging`.

pub mod app;
pub mod args;
pub mod config;
pub mod error;

pub use app::{run, Outcome};
pub use args::{validate, ParsedArguments};
pub use config::DmsConfig;
pub use error::{ArgumentError, ConfigError, ResourceError};
