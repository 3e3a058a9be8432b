//! ply2pts
//!
//! Converts an ASCII PLY point cloud into a PTS point list with the fixed
//! column order `x y z intensity r g b`.
//!
//! Logs go to the console, to `<log-dir>/<prefix>.error.log` (errors only)
//! and to a daily rotated `<log-dir>/<prefix>.<date>.log`.

mod app;
mod errors;
mod logging;

use app::AppBuilder;
use clap::Parser;
use logging::LoggingConfig;
use ply2pts_data::{ConvertOptions, DataLoop, MAX_HEADER_LINES};
use std::path::PathBuf;

/// ply2pts - PLY to PTS point cloud converter
#[derive(Parser, Debug)]
#[command(name = "ply2pts")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// PLY file to read
    #[arg(default_value = "data/input.ply")]
    source: PathBuf,

    /// PTS file to write (parent directories are created)
    #[arg(default_value = "output/output.pts")]
    target: PathBuf,

    /// Directory for log files
    #[arg(long, default_value = "logs")]
    log_dir: PathBuf,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "debug")]
    log_level: String,

    /// File name prefix for log files
    #[arg(long, default_value = "ply2pts")]
    log_prefix: String,

    /// Maximum number of header lines scanned for end_header
    #[arg(long, default_value_t = MAX_HEADER_LINES)]
    max_header_lines: usize,

    /// Convert only the first vertex line, like the legacy converter
    #[arg(long)]
    first_vertex_only: bool,
}

impl Args {
    fn options(&self) -> ConvertOptions {
        let data_loop = if self.first_vertex_only {
            DataLoop::FirstVertexOnly
        } else {
            DataLoop::AllVertices
        };
        ConvertOptions::new()
            .with_max_header_lines(self.max_header_lines)
            .with_data_loop(data_loop)
    }

    fn logging(&self) -> LoggingConfig {
        LoggingConfig {
            level: self.log_level.clone(),
            log_dir: self.log_dir.clone(),
            file_prefix: self.log_prefix.clone(),
        }
    }
}

fn main() {
    let args = Args::parse();

    let app = AppBuilder::new()
        .with_source(&args.source)
        .with_target(&args.target)
        .with_options(args.options())
        .with_logging(args.logging());

    if let Err(e) = app.run() {
        eprintln!("Application error: {}", e);
        std::process::exit(1);
    }
}
