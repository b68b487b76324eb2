//! Structured logging setup.

use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, LoggingConfig};

const CRATE_TARGET: &str = "position_engine";

/// Error type for logging setup.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    /// The configured level is not a valid filter directive.
    #[error("invalid log level '{level}': {source}")]
    InvalidLevel {
        /// Configured level.
        level: String,
        /// Parser error.
        source: tracing_subscriber::filter::ParseError,
    },
    /// A global subscriber was already installed.
    #[error("failed to initialize tracing subscriber: {0}")]
    Subscriber(String),
}

/// Filter used when `RUST_LOG` is not set: `position_engine=<level>`.
///
/// # Errors
///
/// Returns an error if `level` is not a valid directive level.
pub fn default_filter(level: &str) -> Result<EnvFilter, LoggingError> {
    EnvFilter::try_new(format!("{CRATE_TARGET}={}", level.trim())).map_err(
        |source| LoggingError::InvalidLevel {
            level: level.to_string(),
            source,
        },
    )
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level when it is set.
///
/// # Errors
///
/// Returns an error if the level is invalid or a subscriber is already set.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), LoggingError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => default_filter(&config.level)?,
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let result = match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    };
    result.map_err(|e| LoggingError::Subscriber(e.to_string()))
}
