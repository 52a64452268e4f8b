//! Security event log.
//!
//! One append-only text file per logger, named after the local date the
//! logger was initialised on:
//!
//! ```text
//! <logs dir>/security-YYYY-MM-DD.log
//! ```
//!
//! Each line is `<RFC 3339 timestamp> <LEVEL> <message>`. When the file
//! cannot be opened or written, lines go to stderr instead; logging never
//! fails the caller.

use std::error::Error as StdError;
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use chrono::{Local, NaiveDate, SecondsFormat};

/// Prefix of every log file name.
pub const FILE_PREFIX: &str = "security-";
/// Extension of every log file name.
pub const FILE_EXTENSION: &str = "log";

/// Severity of a security event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    /// Normal events, e.g. a successful login or registration.
    Info,
    /// Suspicious but not fatal, e.g. a failed login or weak password.
    Warn,
    /// A breach or an unexpected failure.
    Error,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        })
    }
}

enum Sink {
    File(File),
    Stderr,
}

/// Appends timestamped security events to a daily log file.
///
/// Construct once at startup with [`SecurityLogger::init`] and share it; all
/// methods take `&self`.
pub struct SecurityLogger {
    path: Option<PathBuf>,
    sink: Mutex<Sink>,
}

impl SecurityLogger {
    /// Opens today's log file under `dir`, falling back to stderr.
    ///
    /// Creates `dir` if it does not exist. On failure the cause is printed to
    /// stderr once and the returned logger writes to stderr.
    pub fn init(dir: impl AsRef<Path>) -> Self {
        match Self::try_init(dir) {
            Ok(logger) => logger,
            Err(e) => {
                eprintln!("could not initialise security log: {e}");
                Self::stderr()
            }
        }
    }

    /// Opens today's log file under `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the file
    /// cannot be opened for appending.
    pub fn try_init(dir: impl AsRef<Path>) -> io::Result<Self> {
        Self::try_init_for_date(dir, Local::now().date_naive())
    }

    /// Opens the log file for `date` under `dir`.
    pub fn try_init_for_date(dir: impl AsRef<Path>, date: NaiveDate) -> io::Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        let path = dir.join(file_name(date));
        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        Ok(Self {
            path: Some(path),
            sink: Mutex::new(Sink::File(file)),
        })
    }

    /// A logger that writes to stderr only.
    pub fn stderr() -> Self {
        Self {
            path: None,
            sink: Mutex::new(Sink::Stderr),
        }
    }

    /// Path of the log file, or `None` when writing to stderr.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_fallback(&self) -> bool {
        self.path.is_none()
    }

    pub fn info(&self, message: &str) {
        self.log(Level::Info, message);
    }

    pub fn warn(&self, message: &str) {
        self.log(Level::Warn, message);
    }

    /// Logs at [`Level::Error`] with the cause and its source chain appended.
    pub fn error(&self, message: &str, cause: &dyn StdError) {
        let mut line = format!("{message}: {cause}");
        let mut source = cause.source();
        while let Some(err) = source {
            line.push_str(": ");
            line.push_str(&err.to_string());
            source = err.source();
        }
        self.log(Level::Error, &line);
    }

    pub fn log(&self, level: Level, message: &str) {
        match level {
            Level::Info => tracing::info!(target: "security", "{message}"),
            Level::Warn => tracing::warn!(target: "security", "{message}"),
            Level::Error => tracing::error!(target: "security", "{message}"),
        }

        let line = format_line(level, message);
        self.write_line(&line);
    }

    fn write_line(&self, line: &str) {
        let mut sink = self.sink.lock().unwrap_or_else(PoisonError::into_inner);
        match &mut *sink {
            Sink::File(file) => {
                if let Err(e) = writeln!(file, "{line}").and_then(|()| file.flush()) {
                    eprintln!("security log write failed: {e}");
                    eprintln!("{line}");
                }
            }
            Sink::Stderr => eprintln!("{line}"),
        }
    }
}

impl fmt::Debug for SecurityLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecurityLogger")
            .field("path", &self.path)
            .finish()
    }
}

/// File name used for the log of `date`.
pub fn file_name(date: NaiveDate) -> String {
    format!("{FILE_PREFIX}{}.{FILE_EXTENSION}", date.format("%Y-%m-%d"))
}

fn format_line(level: Level, message: &str) -> String {
    // keep one event per line
    let message = message.replace(['\r', '\n'], " ");
    format!(
        "{} {level} {message}",
        Local::now().to_rfc3339_opts(SecondsFormat::Millis, false)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tempfile::tempdir;

    #[derive(Debug)]
    struct Wrapped {
        inner: io::Error,
    }

    impl fmt::Display for Wrapped {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "insert failed")
        }
    }

    impl StdError for Wrapped {
        fn source(&self) -> Option<&(dyn StdError + 'static)> {
            Some(&self.inner)
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
    }

    fn lines(logger: &SecurityLogger) -> Vec<String> {
        fs::read_to_string(logger.path().unwrap())
            .unwrap()
            .lines()
            .map(String::from)
            .collect()
    }

    #[test]
    fn file_is_named_after_date() {
        assert_eq!(file_name(date()), "security-2026-10-17.log");
    }

    #[test]
    fn init_creates_directory_and_file() {
        let dir = tempdir().unwrap();
        let logs = dir.path().join("a").join("logs");

        let logger = SecurityLogger::try_init_for_date(&logs, date()).unwrap();

        assert!(!logger.is_fallback());
        assert_eq!(
            logger.path().unwrap(),
            logs.join("security-2026-10-17.log").as_path()
        );
        assert!(logs.join("security-2026-10-17.log").exists());
    }

    #[test]
    fn init_uses_todays_date() {
        let dir = tempdir().unwrap();
        let logger = SecurityLogger::init(dir.path());
        let expected = dir.path().join(file_name(Local::now().date_naive()));
        assert_eq!(logger.path(), Some(expected.as_path()));
    }

    #[test]
    fn lines_carry_level_and_message() {
        let dir = tempdir().unwrap();
        let logger = SecurityLogger::try_init_for_date(dir.path(), date()).unwrap();

        logger.info("Login success for 'alice'");
        logger.warn("Weak password attempt by 'bob'");

        let lines = lines(&logger);
        assert_eq!(lines.len(), 2);

        let (ts, rest) = lines[0].split_once(' ').unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(ts).is_ok());
        assert_eq!(rest, "INFO Login success for 'alice'");
        assert!(lines[1].ends_with(" WARN Weak password attempt by 'bob'"));
    }

    #[test]
    fn error_appends_cause_chain() {
        let dir = tempdir().unwrap();
        let logger = SecurityLogger::try_init_for_date(dir.path(), date()).unwrap();

        let cause = Wrapped {
            inner: io::Error::other("disk full"),
        };
        logger.error("DB insert failed", &cause);

        let lines = lines(&logger);
        assert!(lines[0].ends_with(" ERROR DB insert failed: insert failed: disk full"));
    }

    #[test]
    fn multiline_message_stays_on_one_line() {
        let dir = tempdir().unwrap();
        let logger = SecurityLogger::try_init_for_date(dir.path(), date()).unwrap();

        logger.warn("user 'x\nINFO forged'");

        let lines = lines(&logger);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with(" WARN user 'x INFO forged'"));
    }

    #[test]
    fn reopening_appends() {
        let dir = tempdir().unwrap();

        SecurityLogger::try_init_for_date(dir.path(), date())
            .unwrap()
            .info("first");
        let logger = SecurityLogger::try_init_for_date(dir.path(), date()).unwrap();
        logger.info("second");

        let lines = lines(&logger);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("first"));
        assert!(lines[1].ends_with("second"));
    }

    #[test]
    fn unusable_directory_falls_back_to_stderr() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("logs");
        fs::write(&blocker, b"not a directory").unwrap();

        assert!(SecurityLogger::try_init(&blocker).is_err());

        let logger = SecurityLogger::init(&blocker);
        assert!(logger.is_fallback());
        assert_eq!(logger.path(), None);

        // must not panic
        logger.info("still logged");
        logger.error("still logged", &io::Error::other("cause"));
    }

    #[test]
    fn concurrent_writers_keep_lines_whole() {
        let dir = tempdir().unwrap();
        let logger = Arc::new(SecurityLogger::try_init_for_date(dir.path(), date()).unwrap());

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let logger = Arc::clone(&logger);
                std::thread::spawn(move || {
                    for i in 0..25 {
                        logger.info(&format!("thread {t} event {i}"));
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let lines = lines(&logger);
        assert_eq!(lines.len(), 200);
        assert!(lines.iter().all(|l| l.contains(" INFO thread ")));
    }

    #[test]
    fn levels_display_uppercase() {
        assert_eq!(Level::Info.to_string(), "INFO");
        assert_eq!(Level::Warn.to_string(), "WARN");
        assert_eq!(Level::Error.to_string(), "ERROR");
    }
}
