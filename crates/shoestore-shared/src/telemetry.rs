//! Telemetry setup

use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::LogSettings;
use crate::error::AppError;

/// Installs the global subscriber. Keep the returned guard alive for the process
/// lifetime when a log directory is configured, or buffered lines are lost.
pub fn init_telemetry(settings: &LogSettings) -> Result<Option<WorkerGuard>, AppError> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let stdout_layer = if settings.format == "pretty" {
        fmt::layer().with_target(true).boxed()
    } else {
        fmt::layer().json().with_target(true).boxed()
    };

    let (file_layer, guard) = match settings.directory.as_deref() {
        Some(dir) if !dir.is_empty() => {
            let appender = tracing_appender::rolling::daily(dir, "shoestore.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().json().with_ansi(false).with_writer(writer).boxed();
            (Some(layer), Some(guard))
        }
        _ => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| AppError::TelemetryError(e.to_string()))?;

    info!(
        "Telemetry initialized (format={}, file={})",
        settings.format,
        settings.directory.as_deref().unwrap_or("none")
    );
    Ok(guard)
}
