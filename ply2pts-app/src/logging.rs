//! Logging setup: console output, a persistent error log and a daily rotated trace log.

use crate::errors::AppError;
use std::fs::{self, File};
use std::path::PathBuf;
use tracing::Subscriber;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Number of rotated trace logs kept on disk.
const MAX_LOG_FILES: usize = 7;

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is not set.
    pub level: String,
    /// Directory holding the log files.
    pub log_dir: PathBuf,
    /// File name prefix: `<prefix>.error.log` and `<prefix>.<date>.log`.
    pub file_prefix: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "debug".to_string(),
            log_dir: PathBuf::from("logs"),
            file_prefix: "ply2pts".to_string(),
        }
    }
}

impl LoggingConfig {
    /// Path of the error-only log.
    pub fn error_log_path(&self) -> PathBuf {
        self.log_dir.join(format!("{}.error.log", self.file_prefix))
    }

    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level))
    }

    /// Build the layered subscriber without installing it.
    ///
    /// The returned guard flushes the file writers when dropped.
    pub fn build(&self) -> Result<(impl Subscriber + Send + Sync + use<>, LoggingGuard), AppError> {
        fs::create_dir_all(&self.log_dir)?;

        // Truncated on every run.
        let error_file = File::create(self.error_log_path())?;
        let (error_writer, error_guard) = tracing_appender::non_blocking(error_file);

        let rolling = RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .filename_prefix(&self.file_prefix)
            .filename_suffix("log")
            .max_log_files(MAX_LOG_FILES)
            .build(&self.log_dir)?;
        let (trace_writer, trace_guard) = tracing_appender::non_blocking(rolling);

        let subscriber = tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_filter(self.env_filter()),
            )
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_file(true)
                    .with_line_number(true)
                    .with_writer(error_writer)
                    .with_filter(LevelFilter::ERROR),
            )
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_file(true)
                    .with_line_number(true)
                    .with_writer(trace_writer)
                    .with_filter(self.env_filter()),
            );

        Ok((
            subscriber,
            LoggingGuard {
                _error: error_guard,
                _trace: trace_guard,
            },
        ))
    }

    /// Install the subscriber as the process-wide default.
    pub fn init(&self) -> Result<LoggingGuard, AppError> {
        let (subscriber, guard) = self.build()?;
        subscriber.try_init()?;
        Ok(guard)
    }
}

/// Keeps the background log writers alive. Drop it last to flush pending lines.
pub struct LoggingGuard {
    _error: WorkerGuard,
    _trace: WorkerGuard,
}
