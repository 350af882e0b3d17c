//! Program startup: validate arguments, open the event log, announce start.

use crate::args::ParsedArguments;
use crate::config::DmsConfig;
use crate::error::{ArgumentError, ResourceError};
use dms_logging::{Event, EventLogger, Severity, SinkKind};
use std::io::{self, Write};
use std::path::Path;
use tracing::{error, info, warn};

/// Correlation id used for every startup record.
pub const TRANSACTION_ID: &str = "0";
/// Source label used for every startup record.
pub const SOURCE_LABEL: &str = "main";

/// Exit status when a required argument is missing.
pub const EXIT_MISSING_ARGUMENT: u8 = 2;

/// How a run ended.
#[derive(Debug)]
pub enum Outcome {
    /// Startup completed; `sink` is where the event log ended up.
    Started { args: ParsedArguments, sink: SinkKind },
    /// A required argument was missing and the configuration says to stop.
    Aborted(ArgumentError),
}

impl Outcome {
    pub fn exit_status(&self) -> u8 {
        match self {
            Outcome::Started { .. } => 0,
            Outcome::Aborted(_) => EXIT_MISSING_ARGUMENT,
        }
    }
}

/// Open the event log at `path` for appending.
pub fn open_event_log(path: &str, min_level: Severity) -> Result<EventLogger, ResourceError> {
    EventLogger::open(Path::new(path))
        .map(|logger| logger.with_min_level(min_level))
        .map_err(|source| ResourceError::LogfileUnavailable {
            path: path.to_string(),
            source,
        })
}

/// Run startup against the process stdout.
pub fn run<S: AsRef<str>>(args: &[S], config: &DmsConfig) -> Outcome {
    let console = EventLogger::stdout().with_min_level(config.min_level);
    run_with_console(args, config, console, &mut io::stdout())
}

/// Run startup with `console` as the pre-log-file sink and `out` for the
/// argument summary line.
///
/// `console` receives events raised before the log file is open and becomes
/// the event log if the file cannot be opened.
pub fn run_with_console<S: AsRef<str>, W: Write>(
    args: &[S],
    config: &DmsConfig,
    console: EventLogger,
    out: &mut W,
) -> Outcome {
    let parsed = ParsedArguments::scan(args);

    if let Err(err) = parsed.check() {
        console.log(err.event(), TRANSACTION_ID, SOURCE_LABEL);
        if config.abort_on_missing_argument {
            error!("{}", err);
            return Outcome::Aborted(err);
        }
        warn!("{}; continuing with incomplete arguments", err);
    }

    let event_log = match open_event_log(&parsed.log_file, config.min_level) {
        Ok(logger) => logger,
        Err(err) => {
            warn!("{}; logging to stdout", err);
            console.log(err.event(), TRANSACTION_ID, SOURCE_LABEL);
            console
        }
    };

    event_log.log(Event::ServiceStarted, TRANSACTION_ID, SOURCE_LABEL);
    info!(sink = ?event_log.sink(), "Service started");

    if let Err(err) = writeln!(
        out,
        "{} {} {} {}",
        parsed.source_dir, parsed.index_file, parsed.storage_dir, parsed.log_file
    ) {
        warn!("Failed to print arguments: {}", err);
    }

    Outcome::Started {
        args: parsed,
        sink: event_log.sink().clone(),
    }
}
