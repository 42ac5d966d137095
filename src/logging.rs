//! Logging configuration for applications embedding the connector.
//!
//! The library only emits `tracing` events. These helpers install a
//! subscriber that writes either to a log file or to stderr, filtered by
//! `RUST_LOG` (default `info`).

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initializes logging to a file.
///
/// Location: `~/.local/state/cass-connector/cass-connector.log` on Linux (XDG
/// state directory), or the platform-appropriate state/config directory on
/// other systems. Does nothing if a subscriber is already installed.
pub fn init_file_logging() {
    init_file_logging_at(&get_log_path());
}

/// Initializes logging to the given file, appending to earlier runs.
pub fn init_file_logging_at(log_path: &Path) {
    if let Some(parent) = log_path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            eprintln!("Warning: Could not create log directory: {e}");
            return;
        }
    }

    let log_file = match OpenOptions::new().create(true).append(true).open(log_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not open log file: {e}");
            return;
        }
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(log_file)
        .with_ansi(false)
        .try_init();
}

/// Initializes logging to stderr.
///
/// Intended for tests and command-line tools. Does nothing if a subscriber is
/// already installed, so every test may call it.
pub fn init_stderr_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .try_init();
}

/// Returns the path for the log file.
pub fn get_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        return state_dir.join("cass-connector").join("cass-connector.log");
    }

    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("cass-connector").join("cass-connector.log");
    }

    std::env::temp_dir().join("cass-connector.log")
}
