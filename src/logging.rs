//! Logging infrastructure for adforge
//!
//! Console logs go to stderr so CSV and JSON written to stdout stay clean.
//! File logging is opt-in and writes rotating files to the app data directory.
//!
//! ## Features
//!
//! - **Env filter**: `RUST_LOG` overrides the default level
//! - **File Rotation**: Daily rotation with 10 files retained
//! - **Error Tracking**: Separate error log holding warnings and errors
//! - **Cross-Platform**: Uses platform-specific app data directories
//!
//! ## Usage
//!
//! ```no_run
//! use adforge::logging::{self, LogOptions};
//!
//! logging::init(LogOptions::default()).expect("Failed to initialize logging");
//! tracing::info!("Export started");
//! ```

use anyhow::{Context as _, Result};
use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    EnvFilter, Layer as _, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _,
};

/// Console and file logging switches, usually set from CLI flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogOptions {
    /// Default to `debug` instead of `info` when `RUST_LOG` is unset
    pub verbose: bool,
    /// Also write rotating log files under [`get_log_dir`]
    pub log_to_file: bool,
}

impl LogOptions {
    fn default_directive(self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}

/// Gets the log directory path based on platform conventions
///
/// Returns:
/// - Windows: `%APPDATA%/adforge/logs`
/// - macOS: `~/Library/Application Support/adforge/logs`
/// - Linux: `~/.local/share/adforge/logs`
pub fn get_log_dir() -> Result<PathBuf> {
    let base_dir = dirs::data_dir().context("Failed to determine data directory")?;
    Ok(base_dir.join("adforge").join("logs"))
}

fn file_appender(log_dir: &std::path::Path, prefix: &str) -> Result<RollingFileAppender> {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .max_log_files(10)
        .filename_prefix(prefix)
        .filename_suffix("log")
        .build(log_dir)
        .with_context(|| format!("Failed to create {prefix} log file appender"))
}

/// Initializes the logging system.
///
/// With `log_to_file`, creates two daily-rotated files:
/// - `adforge.<date>.log`: everything passing the env filter
/// - `error.<date>.log`: warnings and errors only
///
/// # Errors
///
/// Returns error if the log directory cannot be created or a file appender fails
pub fn init(options: LogOptions) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(options.default_directive()))
        .context("Failed to create env filter")?;

    let stderr_layer = fmt::layer()
        .with_target(options.verbose)
        .with_line_number(options.verbose)
        .with_writer(std::io::stderr);

    let (all_logs_layer, error_logs_layer, log_dir) = if options.log_to_file {
        let log_dir = get_log_dir()?;
        std::fs::create_dir_all(&log_dir)
            .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;

        let all_logs_layer = fmt::layer()
            .with_target(true)
            .with_line_number(true)
            .with_file(true)
            .with_ansi(false)
            .with_writer(file_appender(&log_dir, "adforge")?);

        let error_logs_layer = fmt::layer()
            .with_target(true)
            .with_line_number(true)
            .with_file(true)
            .with_ansi(false)
            .with_writer(file_appender(&log_dir, "error")?)
            .with_filter(EnvFilter::new("warn"));

        (Some(all_logs_layer), Some(error_logs_layer), Some(log_dir))
    } else {
        (None, None, None)
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(all_logs_layer)
        .with(error_logs_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    if let Some(log_dir) = log_dir {
        tracing::debug!("Logging initialized, log directory: {}", log_dir.display());
    }

    Ok(())
}

/// Gets the path to the current log file
pub fn get_current_log_path() -> Result<PathBuf> {
    let log_dir = get_log_dir()?;
    let today = chrono::Local::now().format("%Y-%m-%d").to_string();
    Ok(log_dir.join(format!("adforge.{today}.log")))
}

/// Gets the path to the current error log file
pub fn get_current_error_log_path() -> Result<PathBuf> {
    let log_dir = get_log_dir()?;
    let today = chrono::Local::now().format("%Y-%m-%d").to_string();
    Ok(log_dir.join(format!("error.{today}.log")))
}
