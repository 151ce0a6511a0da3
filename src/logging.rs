//! Structured logging setup.

use crate::error::{EtlError, Result};
use std::fs;
use std::path::Path;
use tracing::debug;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global subscriber: console output plus a plain-text log file.
///
/// The file layer writes synchronously and appends to an existing file, so
/// everything logged before [`crate::Pipeline::upload_log`] is on disk when
/// the log is archived. `RUST_LOG` overrides the default level.
pub fn init_logging(log_path: &Path, verbose: bool) -> Result<()> {
    let log_level = if verbose { "debug" } else { "info" };

    let directory = match log_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(directory)?;
    let file_name = log_path.file_name().ok_or_else(|| EtlError::Configuration {
        message: format!("Log path '{}' does not name a file", log_path.display()),
    })?;
    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name.to_string_lossy())
        .build(directory)
        .map_err(|e| EtlError::Configuration {
            message: format!("Failed to open log file '{}': {}", log_path.display(), e),
        })?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("etl_pipeline={}", log_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr),
        )
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_ansi(false)
                .with_writer(file_appender),
        )
        .try_init()
        .map_err(|e| EtlError::Configuration {
            message: format!("Failed to initialise logging: {}", e),
        })?;

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}
