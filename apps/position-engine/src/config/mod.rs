//! Configuration module for the position engine.
//!
//! Loads YAML with `${VAR}` / `${VAR:-default}` environment interpolation and
//! validates the result before anything starts.
//!
//! # Usage
//!
//! ```rust,ignore
//! use position_engine::config::{Config, load_config};
//!
//! // Load from default path (config.yaml)
//! let config = load_config(None)?;
//!
//! // Load from custom path
//! let config = load_config(Some("deploy/config.yaml"))?;
//!
//! println!("HTTP port: {}", config.server.http_port);
//! ```

mod calculator;
mod observability;
mod server;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use calculator::{CalculatorConfig, CalculatorDefaults};
pub use observability::{LogFormat, LoggingConfig, MetricsConfig, ObservabilityConfig};
pub use server::ServerConfig;

use crate::instruments::{ForexPairTable, PairTable};

/// Default config file path.
pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("Failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("Config validation failed: {0}")]
    ValidationError(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
    /// Calculator configuration.
    #[serde(default)]
    pub calculator: CalculatorConfig,
}

// ============================================
// Configuration Loading
// ============================================

/// Load configuration from a YAML file with environment variable interpolation.
///
/// # Arguments
///
/// * `path` - Optional path to the config file. Defaults to "config.yaml".
///
/// # Errors
///
/// Returns a `ConfigError` if the file cannot be read, parsed, or validated.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let path = path.unwrap_or(DEFAULT_CONFIG_PATH);

    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_string(),
        source: e,
    })?;

    load_config_from_string(&contents)
}

/// Like [`load_config`], but a file that does not exist yields the defaults.
///
/// # Errors
///
/// Returns a `ConfigError` if an existing file cannot be read, parsed, or validated.
pub fn load_config_or_default(path: Option<&str>) -> Result<Config, ConfigError> {
    match load_config(path) {
        Err(ConfigError::ReadError { source, .. })
            if source.kind() == std::io::ErrorKind::NotFound =>
        {
            Ok(Config::default())
        }
        other => other,
    }
}

/// Load configuration from a YAML string (useful for testing).
///
/// # Errors
///
/// Returns a `ConfigError` if the YAML cannot be parsed or validated.
pub fn load_config_from_string(yaml: &str) -> Result<Config, ConfigError> {
    let interpolated = interpolate_env_vars(yaml);
    let config: Config = serde_yaml_bw::from_str(&interpolated)?;
    validate_config(&config)?;
    Ok(config)
}

/// Interpolate environment variables in a string.
///
/// Supports both `${VAR}` and `${VAR:-default}` syntax.
#[allow(clippy::expect_used)] // Regex is compile-time constant; expect() is safe here
fn interpolate_env_vars(input: &str) -> String {
    use std::sync::OnceLock;

    static ENV_VAR_REGEX: OnceLock<regex::Regex> = OnceLock::new();

    let re = ENV_VAR_REGEX.get_or_init(|| {
        regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
            .expect("env var regex is valid")
    });

    re.replace_all(input, |cap: &regex::Captures<'_>| {
        let default_value = cap.get(2).map_or("", |m| m.as_str());
        match std::env::var(&cap[1]) {
            Ok(v) if !v.is_empty() => v,
            _ => default_value.to_string(),
        }
    })
    .into_owned()
}

/// Validate configuration values.
fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.http_port == 0 {
        return Err(ConfigError::ValidationError(
            "server.http_port must be non-zero".to_string(),
        ));
    }

    if config
        .server
        .bind_address
        .parse::<std::net::IpAddr>()
        .is_err()
    {
        return Err(ConfigError::ValidationError(format!(
            "server.bind_address '{}' is not an IP address",
            config.server.bind_address
        )));
    }

    let metrics = &config.observability.metrics;
    if metrics.enabled && metrics.listen_addr.port() == config.server.http_port {
        return Err(ConfigError::ValidationError(
            "metrics listen_addr port and http_port must be different".to_string(),
        ));
    }

    if config.observability.logging.level.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "observability.logging.level must not be empty".to_string(),
        ));
    }

    let defaults = &config.calculator.defaults;
    if !(0.0..=100.0).contains(&defaults.risk_percent) || defaults.risk_percent == 0.0 {
        return Err(ConfigError::ValidationError(
            "calculator.defaults.risk_percent must be in (0, 100]".to_string(),
        ));
    }

    if defaults.leverage.is_nan() || defaults.leverage < 1.0 {
        return Err(ConfigError::ValidationError(
            "calculator.defaults.leverage must be at least 1".to_string(),
        ));
    }

    if defaults.lot_size.is_nan() || defaults.lot_size <= 0.0 {
        return Err(ConfigError::ValidationError(
            "calculator.defaults.lot_size must be positive".to_string(),
        ));
    }

    if ForexPairTable::standard().get(&defaults.forex_pair).is_none() {
        return Err(ConfigError::ValidationError(format!(
            "calculator.defaults.forex_pair '{}' is not a known pair",
            defaults.forex_pair
        )));
    }

    Ok(())
}
