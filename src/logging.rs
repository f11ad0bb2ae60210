//! File-based logging module for tunedeck
//!
//! This module sets up tracing-based logging that writes to a file instead of stdout,
//! since the application uses a TUI that occupies the terminal.

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::config::Settings;

const LOG_FILE_PREFIX: &str = "tunedeck";
const DEFAULT_FILTER: &str = "tunedeck=debug,warn";

/// Initialize the logging system.
///
/// Logs are written to `<log_dir>/tunedeck.YYYY-MM-DD.log` with daily rotation.
/// `RUST_LOG` wins over the configured filter, which wins over
/// `tunedeck=debug,warn`.
pub fn init_logging(settings: &Settings) -> anyhow::Result<()> {
    let log_dir = settings.log_dir.as_path();
    if !log_dir.exists() {
        std::fs::create_dir_all(log_dir)?;
    }

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, LOG_FILE_PREFIX);

    // Non-blocking so the render loop never waits on disk
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // The guard must outlive every log call; the process exits right after the TUI
    Box::leak(Box::new(guard));

    let filter = EnvFilter::try_from_default_env().or_else(|_| {
        EnvFilter::try_new(settings.log_filter.as_deref().unwrap_or(DEFAULT_FILTER))
    })?;

    let fmt_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_span_events(FmtSpan::CLOSE);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()?;

    tracing::info!("Logging initialized - logs written to {}/", log_dir.display());

    Ok(())
}

/// Log the outcome of a backend call
#[macro_export]
macro_rules! log_backend_result {
    ($operation:expr, $result:expr) => {
        match &$result {
            Ok(_) => tracing::debug!(operation = $operation, "Backend call succeeded"),
            Err(e) => tracing::warn!(operation = $operation, error = %e, "Backend call failed"),
        }
    };
}
