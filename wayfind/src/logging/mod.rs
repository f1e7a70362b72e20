//! Structured logging for wayfind.
//!
//! A thin layer over `tracing-subscriber` that turns a [`LoggingConfig`] into
//! an installed global subscriber. `RUST_LOG`, when set, overrides the
//! configured level.

mod formatters;

pub use formatters::DevelopmentFormatter;

use crate::config::{LogFormat, LogLevel, LoggingConfig};
use std::path::Path;
use std::str::FromStr;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};

/// Error type for logging operations
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    /// IO error occurred
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error parsing log level
    #[error("Invalid log level: {0}")]
    InvalidLogLevel(String),

    /// A global subscriber is already installed
    #[error("a global subscriber is already installed")]
    AlreadyInitialized,

    /// Error in subscriber setup
    #[error("Subscriber error: {0}")]
    SubscriberError(Box<dyn std::error::Error + Send + Sync>),
}

/// Result type for logging operations
pub type Result<T> = std::result::Result<T, LogError>;

/// Keeps the background file writer alive; logs written after this is
/// dropped may be lost.
#[derive(Debug, Default)]
pub struct LoggingGuard {
    _file: Option<WorkerGuard>,
}

/// Initialize the logging system with the given configuration.
///
/// Returns [`LogError::AlreadyInitialized`] when a global subscriber is
/// already installed; nothing is changed in that case.
pub fn init(config: &LoggingConfig) -> Result<LoggingGuard> {
    if tracing::dispatcher::has_been_set() {
        return Err(LogError::AlreadyInitialized);
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.to_string()));
    let (writer, guard) = make_writer(config)?;
    let ansi = config.file.is_none();

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(ansi);

    let installed = match config.format {
        LogFormat::Json => builder
            .json()
            .with_target(true)
            .with_line_number(true)
            .try_init(),
        LogFormat::Compact => builder.compact().with_target(true).try_init(),
        LogFormat::Pretty => builder.pretty().with_line_number(true).try_init(),
        LogFormat::Default => builder
            .event_format(DevelopmentFormatter::new(ansi))
            .try_init(),
    };

    match installed {
        Ok(()) => Ok(LoggingGuard { _file: guard }),
        // another thread installed one between the check and here
        Err(_) if tracing::dispatcher::has_been_set() => Err(LogError::AlreadyInitialized),
        Err(e) => Err(LogError::SubscriberError(e)),
    }
}

/// Route output to stdout, a file, both, or nowhere.
fn make_writer(config: &LoggingConfig) -> Result<(BoxMakeWriter, Option<WorkerGuard>)> {
    match (&config.file, config.stdout) {
        (Some(path), stdout) => {
            let (file, guard) = non_blocking_file(path)?;
            let writer = if stdout {
                BoxMakeWriter::new(std::io::stdout.and(file))
            } else {
                BoxMakeWriter::new(file)
            };
            Ok((writer, Some(guard)))
        }
        (None, true) => Ok((BoxMakeWriter::new(std::io::stdout), None)),
        (None, false) => Ok((BoxMakeWriter::new(std::io::sink), None)),
    }
}

fn non_blocking_file(
    path: &Path,
) -> Result<(tracing_appender::non_blocking::NonBlocking, WorkerGuard)> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    if !dir.exists() {
        std::fs::create_dir_all(dir)?;
    }

    let file_name = path.file_name().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("log path has no file name: {}", path.display()),
        )
    })?;

    let appender = tracing_appender::rolling::never(dir, file_name);
    Ok(tracing_appender::non_blocking(appender))
}

/// Parse a log level string into a LogLevel enum.
pub fn parse_log_level(level: &str) -> Result<LogLevel> {
    LogLevel::from_str(level).map_err(|_| LogError::InvalidLogLevel(level.to_string()))
}

/// Convert a tracing::Level to a LogLevel enum.
pub fn level_to_log_level(level: Level) -> LogLevel {
    match level {
        Level::TRACE => LogLevel::Trace,
        Level::DEBUG => LogLevel::Debug,
        Level::INFO => LogLevel::Info,
        Level::WARN => LogLevel::Warn,
        Level::ERROR => LogLevel::Error,
    }
}
