//! Application error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),

    #[error("Missing required setting: {0}")]
    MissingSetting(&'static str),

    #[error("Telemetry error: {0}")]
    TelemetryError(String),
}
