//! Diagnostic logging setup for the server binary.

use std::{
    fs::{File, OpenOptions},
    path::Path,
    sync::Mutex,
};

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::ServerError;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `level`. With `log_file` set, output is
/// appended to that file without ANSI colors; otherwise it goes to stdout.
pub fn init_tracing(level: &str, log_file: Option<&Path>) -> Result<(), ServerError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match log_file {
        Some(path) => {
            let file = open_log_file(path)?;
            let layer = fmt::layer().with_ansi(false).with_writer(Mutex::new(file));
            tracing_subscriber::registry().with(layer).with(filter).try_init()
        },
        None => tracing_subscriber::registry().with(fmt::layer()).with(filter).try_init(),
    }
    .map_err(|e| ServerError::Config(format!("failed to install logger: {e}")))
}

/// Open `path` for appending, creating it and any missing parent directories.
pub fn open_log_file(path: &Path) -> Result<File, ServerError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(OpenOptions::new().create(true).append(true).open(path)?)
}
