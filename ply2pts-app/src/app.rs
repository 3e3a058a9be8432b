//! Application setup and run with builder pattern.

use crate::errors::AppError;
use crate::logging::LoggingConfig;
use ply2pts_data::{ConversionSummary, ConvertOptions, convert_file};
use std::path::PathBuf;
use tracing::info;

/// Builder for configuring and running one conversion.
pub struct AppBuilder {
    source: PathBuf,
    target: PathBuf,
    options: ConvertOptions,
    logging: LoggingConfig,
    install_logging: bool,
}

impl AppBuilder {
    /// Create a new AppBuilder with default settings.
    pub fn new() -> Self {
        Self {
            source: PathBuf::from("data/input.ply"),
            target: PathBuf::from("output/output.pts"),
            options: ConvertOptions::default(),
            logging: LoggingConfig::default(),
            install_logging: true,
        }
    }

    /// Set the PLY file to read.
    pub fn with_source(mut self, path: impl Into<PathBuf>) -> Self {
        self.source = path.into();
        self
    }

    /// Set the PTS file to write.
    pub fn with_target(mut self, path: impl Into<PathBuf>) -> Self {
        self.target = path.into();
        self
    }

    /// Configure the conversion.
    pub fn with_options(mut self, options: ConvertOptions) -> Self {
        self.options = options;
        self
    }

    /// Configure logging.
    pub fn with_logging(mut self, config: LoggingConfig) -> Self {
        self.logging = config;
        self
    }

    /// Skip installing the global subscriber (when the caller already has one).
    #[cfg(test)]
    pub fn without_logging(mut self) -> Self {
        self.install_logging = false;
        self
    }

    /// Run the conversion. Log files are flushed before this returns.
    pub fn run(self) -> Result<ConversionSummary, AppError> {
        let _guard = if self.install_logging {
            Some(self.logging.init()?)
        } else {
            None
        };

        info!(
            source = %self.source.display(),
            target = %self.target.display(),
            "ply2pts {}",
            env!("CARGO_PKG_VERSION")
        );

        let summary = convert_file(&self.source, &self.target, &self.options)?;
        Ok(summary)
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}
