//! Logging infrastructure for gambit.
//!
//! Structured logging via the `tracing` ecosystem: JSON lines to a daily
//! rolling file plus a compact console layer on stderr. The agent itself
//! never prints; everything observable goes through `tracing` so launchers
//! can route it.
//!
//! ## Example
//!
//! ```no_run
//! use gambit_core::logging;
//!
//! let _guard = logging::init_logging(None, false).expect("logging init");
//! tracing::info!("agent starting");
//! ```

use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::error::{AgentError, Result};

/// Guard that must be held to ensure log flushing on shutdown.
pub struct LogGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Initialize the gambit logging system.
///
/// Sets up file logging (JSON lines, daily rolling) and a human-readable
/// console layer on stderr. Returns a [`LogGuard`] that must be held for the
/// application lifetime so pending entries are flushed on shutdown.
///
/// # Arguments
///
/// * `log_dir` - Optional custom log directory. Defaults to `~/.gambit/logs/`
/// * `verbose` - If true, sets the default log level to DEBUG instead of INFO
pub fn init_logging(log_dir: Option<PathBuf>, verbose: bool) -> Result<LogGuard> {
    let log_dir = match log_dir {
        Some(dir) => dir,
        None => default_log_dir()?,
    };

    std::fs::create_dir_all(&log_dir).map_err(|e| AgentError::DirectoryCreation {
        path: log_dir.clone(),
        source: e,
    })?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, "gambit.log");
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let default_level = if verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("gambit={default_level}")));

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .json()
        .with_span_events(FmtSpan::CLOSE)
        .with_current_span(true);

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(true)
        .with_file(verbose)
        .with_line_number(verbose)
        .compact();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .map_err(|e| AgentError::LoggingInit {
            message: e.to_string(),
        })?;

    tracing::debug!(log_dir = %log_dir.display(), verbose, "logging initialized");

    Ok(LogGuard {
        _file_guard: Some(file_guard),
    })
}

/// Get the default gambit log directory (`~/.gambit/logs`).
pub fn default_log_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").map_err(|_| AgentError::LoggingInit {
        message: "HOME environment variable not set".into(),
    })?;

    Ok(PathBuf::from(home).join(".gambit").join("logs"))
}

/// Initialize minimal console-only logging for testing.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_dir() {
        // SAFETY: test context, only test touching HOME
        unsafe { std::env::set_var("HOME", "/tmp/test-home") };
        let dir = default_log_dir().unwrap();
        assert_eq!(dir, PathBuf::from("/tmp/test-home/.gambit/logs"));
    }

    #[test]
    fn test_init_test_logging_is_idempotent() {
        init_test_logging();
        init_test_logging();
    }

    #[test]
    fn test_init_logging_creates_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("logs");
        let guard = init_logging(Some(dir.clone()), true);
        // a second global subscriber may already be installed by another test;
        // only the directory side effect is asserted unconditionally
        assert!(dir.exists());
        drop(guard);
    }
}
