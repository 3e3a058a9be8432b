//! Error types for the converter application.

use ply2pts_data::ConvertError;
use thiserror::Error;

/// Errors that can stop the application.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Conversion error: {0}")]
    Convert(#[from] ConvertError),

    #[error("Log file setup error: {0}")]
    LogFile(#[from] tracing_appender::rolling::InitError),

    #[error("Logging already initialized: {0}")]
    Subscriber(#[from] tracing_subscriber::util::TryInitError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
