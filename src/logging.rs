//! Tracing initialisation from a [`LogConfig`].
//!
//! Logs go to the configured file, which is truncated on start-up, or to
//! stderr when no file is set. Stdout is reserved for the JSON result. The
//! filter comes from `LogConfig::level` only; `RUST_LOG` is not consulted.

use std::sync::Mutex;

use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{DEFAULT_LOG_LEVEL, LogConfig};
use crate::error::{ConfigError, FilesystemError, Result};

/// Install the global tracing subscriber.
///
/// If a global subscriber is already installed it is left in place.
///
/// # Errors
///
/// Returns `ConfigError::InvalidValue` if `level` is not a valid filter
/// directive, or `FilesystemError` if the log file cannot be created.
pub fn init(config: &LogConfig) -> Result<()> {
    let filter = build_filter(&config.level)?;

    let (file_layer, stderr_layer) = match config.file.as_deref() {
        Some(path) => {
            let file = open_log_file(path)?;
            let layer = fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file));
            (Some(layer), None)
        }
        None => (None, Some(fmt::layer().with_writer(std::io::stderr))),
    };

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init();
    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
    Ok(())
}

/// Parse a filter directive, falling back to the default for blank input.
fn build_filter(level: &str) -> Result<EnvFilter> {
    let directive = match level.trim() {
        "" => DEFAULT_LOG_LEVEL,
        trimmed => trimmed,
    };
    EnvFilter::try_new(directive).map_err(|e| {
        ConfigError::InvalidValue {
            field: String::from("log.level"),
            reason: e.to_string(),
        }
        .into()
    })
}

/// Create or truncate the log file through a `cap_std` directory handle.
fn open_log_file(path: &Utf8Path) -> Result<std::fs::File> {
    let parent = path
        .parent()
        .filter(|p| !p.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let file_name = path.file_name().ok_or_else(|| ConfigError::InvalidValue {
        field: String::from("log.file"),
        reason: format!("'{path}' does not name a file"),
    })?;

    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(|error| {
        FilesystemError::from_io(parent.as_std_path().to_path_buf(), &error)
    })?;
    let file = dir.create(file_name).map_err(|error| {
        FilesystemError::from_io(path.as_std_path().to_path_buf(), &error)
    })?;
    Ok(file.into_std())
}
