//! Logging setup for appctl.
//!
//! Human-facing output goes to stdout; diagnostics go to stderr and to a
//! daily-rolling file under `~/.app-services/logs/`.

use app_services::StorageConfig;
use std::env;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const LOG_FILE_PREFIX: &str = "appctl.log";

fn debug_enabled() -> bool {
    env::var("APP_SERVICES_DEBUG_LOG")
        .map(|value| matches!(value.as_str(), "1" | "true" | "TRUE" | "yes" | "YES"))
        .unwrap_or(false)
}

fn filter() -> EnvFilter {
    if debug_enabled() {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

/// Installs the global subscriber. Keep the returned guard alive until exit
/// so buffered file output is flushed.
pub fn init() -> Option<WorkerGuard> {
    let logs_dir = StorageConfig::default().logs_dir();
    let file_writer = match fs_err::create_dir_all(&logs_dir) {
        Ok(()) => Some(tracing_appender::non_blocking(
            tracing_appender::rolling::daily(&logs_dir, LOG_FILE_PREFIX),
        )),
        Err(_) => None,
    };

    let stderr_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);

    match file_writer {
        Some((writer, guard)) => {
            let file_layer = fmt::layer().with_writer(writer).with_ansi(false);
            tracing_subscriber::registry()
                .with(filter())
                .with(stderr_layer)
                .with(file_layer)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(filter())
                .with(stderr_layer)
                .init();
            None
        }
    }
}
