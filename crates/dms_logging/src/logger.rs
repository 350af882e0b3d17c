//! JSON event log.
//!
//! An [`EventLogger`] owns its sink and minimum level for its whole life.
//! Each call to [`EventLogger::log`] writes one JSON object followed by a
//! newline and flushes it, so the log file is always line-delimited JSON.

use crate::event::{EventCode, Severity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;
use tracing::{debug, warn};

/// Permission bits of a freshly created log file.
pub const LOG_FILE_MODE: u32 = 0o644;

/// Errors that can occur while writing the event log.
#[derive(Error, Debug)]
pub enum LogError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to acquire lock")]
    LockError,
}

/// One line of the event log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    pub level: Severity,
    /// Severity tier (`code / 100000`)
    pub prio: u32,
    /// Composite id, `<namespace>-<tier>-<code>`
    pub id: String,
    pub code: EventCode,
    /// Caller supplied correlation id
    pub transaction: String,
    /// Function or module that emitted the record
    pub src: String,
    /// Resolved message, empty for unknown codes
    pub msg: String,
    pub time: DateTime<Utc>,
}

impl LogRecord {
    pub fn new(code: EventCode, transaction: &str, src: &str) -> Self {
        Self {
            level: code.severity(),
            prio: code.tier(),
            id: code.id(),
            code,
            transaction: transaction.to_string(),
            src: src.to_string(),
            msg: code.message().to_string(),
            time: Utc::now(),
        }
    }
}

/// Where an [`EventLogger`] writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkKind {
    File(PathBuf),
    Stdout,
    /// Caller supplied writer
    Writer,
}

/// Leveled JSON logger bound to a single sink.
///
/// The sink is flushed and closed when the logger is dropped.
pub struct EventLogger {
    sink: Mutex<Box<dyn Write + Send>>,
    kind: SinkKind,
    min_level: Severity,
}

impl EventLogger {
    /// Log to standard output.
    pub fn stdout() -> Self {
        Self::with_sink(Box::new(io::stdout()), SinkKind::Stdout)
    }

    /// Open `path` for appending, creating it with mode 0644 if it does not exist.
    pub fn open(path: &Path) -> Result<Self, LogError> {
        let file = open_append(path)?;
        debug!("Opened event log {}", path.display());
        Ok(Self::with_sink(
            Box::new(BufWriter::new(file)),
            SinkKind::File(path.to_path_buf()),
        ))
    }

    /// Log to an arbitrary writer.
    pub fn from_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self::with_sink(Box::new(writer), SinkKind::Writer)
    }

    fn with_sink(sink: Box<dyn Write + Send>, kind: SinkKind) -> Self {
        Self {
            sink: Mutex::new(sink),
            kind,
            min_level: Severity::Debug,
        }
    }

    /// Skip records less severe than `level`.
    pub fn with_min_level(mut self, level: Severity) -> Self {
        self.min_level = level;
        self
    }

    pub fn min_level(&self) -> Severity {
        self.min_level
    }

    pub fn sink(&self) -> &SinkKind {
        &self.kind
    }

    /// Whether a record for `code` passes the level gate.
    pub fn enabled(&self, code: EventCode) -> bool {
        code.severity() >= self.min_level
    }

    /// Write one record for `code`.
    ///
    /// Returns `true` if a record was written. Write failures are reported
    /// through tracing and never reach the caller; use [`EventLogger::try_log`]
    /// to observe them.
    pub fn log(&self, code: impl Into<EventCode>, transaction: &str, src: &str) -> bool {
        let code = code.into();
        match self.try_log(code, transaction, src) {
            Ok(written) => written,
            Err(err) => {
                warn!("Failed to write event {} to {:?}: {}", code.id(), self.kind, err);
                false
            }
        }
    }

    pub fn try_log(
        &self,
        code: impl Into<EventCode>,
        transaction: &str,
        src: &str,
    ) -> Result<bool, LogError> {
        let code = code.into();
        if !self.enabled(code) {
            return Ok(false);
        }

        let record = LogRecord::new(code, transaction, src);
        self.write_record(&record)?;
        Ok(true)
    }

    /// Serialize `record` as a single line and flush it.
    fn write_record(&self, record: &LogRecord) -> Result<(), LogError> {
        let json = serde_json::to_string(record)?;

        let mut sink = self.sink.lock().map_err(|_| LogError::LockError)?;
        writeln!(sink, "{}", json)?;
        sink.flush()?;
        Ok(())
    }

    pub fn flush(&self) -> Result<(), LogError> {
        let mut sink = self.sink.lock().map_err(|_| LogError::LockError)?;
        sink.flush()?;
        Ok(())
    }
}

impl Drop for EventLogger {
    fn drop(&mut self) {
        if let Ok(sink) = self.sink.get_mut() {
            let _ = sink.flush();
        }
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    let mut options = OpenOptions::new();
    options.create(true).append(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(LOG_FILE_MODE);
    }

    options.open(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Event, Flag};
    use std::fs;
    use std::sync::Arc;
    use tempfile::tempdir;

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl SharedBuffer {
        fn lines(&self) -> Vec<String> {
            let bytes = self.0.lock().unwrap().clone();
            String::from_utf8(bytes)
                .unwrap()
                .lines()
                .map(str::to_string)
                .collect()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "disk full"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_one_record_per_call_in_order() {
        let buffer = SharedBuffer::default();
        let logger = EventLogger::from_writer(buffer.clone());

        let calls: [(u32, &str, &str); 3] = [
            (100_002, "tx-1", "main"),
            (200_001, "tx-2", "open_log"),
            (700_001, "tx-3", "main"),
        ];
        for (code, tx, src) in calls {
            assert!(logger.log(code, tx, src));
        }

        let lines = buffer.lines();
        assert_eq!(lines.len(), calls.len());
        for (line, (code, tx, src)) in lines.iter().zip(calls) {
            let record: LogRecord = serde_json::from_str(line).unwrap();
            assert_eq!(record.code, EventCode(code));
            assert_eq!(record.prio, code / 100_000);
            assert_eq!(record.transaction, tx);
            assert_eq!(record.src, src);
            assert_eq!(record.msg, EventCode(code).message());
        }
    }

    #[test]
    fn test_record_shape() {
        let buffer = SharedBuffer::default();
        let logger = EventLogger::from_writer(buffer.clone());
        logger.log(Event::LogfileUnavailable, "0", "main");

        let lines = buffer.lines();
        let value: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
        assert_eq!(value["level"], "fatal");
        assert_eq!(value["prio"], 2);
        assert_eq!(value["id"], "AbcdsDMS-2-200001");
        assert_eq!(value["code"], 200_001);
        assert_eq!(value["transaction"], "0");
        assert_eq!(value["src"], "main");
        assert_eq!(value["msg"], "Error with your logfile, set file to STDOUT");
        assert!(value["time"].as_str().unwrap().ends_with('Z'));
    }

    #[test]
    fn test_unknown_code_logs_empty_message() {
        let buffer = SharedBuffer::default();
        let logger = EventLogger::from_writer(buffer.clone());
        assert!(logger.log(EventCode(400_123), "0", "main"));

        let record: LogRecord = serde_json::from_str(&buffer.lines()[0]).unwrap();
        assert_eq!(record.level, Severity::Warning);
        assert_eq!(record.msg, "");
    }

    #[test]
    fn test_min_level_gates_records() {
        let buffer = SharedBuffer::default();
        let logger = EventLogger::from_writer(buffer.clone()).with_min_level(Severity::Info);

        assert!(!logger.log(Event::ServiceStarted, "0", "main"));
        assert!(logger.log(Event::MissingArgument(Flag::Index), "0", "main"));

        let lines = buffer.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("100002"));
    }

    #[test]
    fn test_write_failure_is_swallowed() {
        let logger = EventLogger::from_writer(FailingWriter);
        assert!(!logger.log(Event::ServiceStarted, "0", "main"));
        assert!(matches!(
            logger.try_log(Event::ServiceStarted, "0", "main"),
            Err(LogError::Io(_))
        ));
    }

    #[test]
    fn test_open_appends_to_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dms.log");
        fs::write(&path, "previous line\n").unwrap();

        {
            let logger = EventLogger::open(&path).unwrap();
            assert_eq!(logger.sink(), &SinkKind::File(path.clone()));
            logger.log(Event::ServiceStarted, "0", "main");
        }
        {
            let logger = EventLogger::open(&path).unwrap();
            logger.log(Event::ServiceStarted, "0", "main");
        }

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "previous line");
        for line in &lines[1..] {
            let record: LogRecord = serde_json::from_str(line).unwrap();
            assert_eq!(record.code, Event::ServiceStarted.code());
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_open_creates_file_with_mode_0644() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let path = dir.path().join("fresh.log");
        let _logger = EventLogger::open(&path).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        // umask may only clear bits
        assert_eq!(mode & !LOG_FILE_MODE, 0);
        assert!(mode & 0o600 == 0o600);
    }

    #[test]
    fn test_open_fails_in_missing_directory() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("dms.log");
        assert!(matches!(EventLogger::open(&path), Err(LogError::Io(_))));
    }
}
