//! Position Engine Binary
//!
//! Serves the position size calculator over HTTP.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin position-engine
//! ```
//!
//! # Environment Variables
//!
//! - `CONFIG_PATH`: YAML config file (default: config.yaml, defaults used if absent)
//! - `RUST_LOG`: Log filter, overrides `observability.logging.level`

use anyhow::Context;
use position_engine::config::{Config, DEFAULT_CONFIG_PATH, load_config_or_default};
use position_engine::instruments::ForexPairTable;
use position_engine::observability::{init_metrics, init_tracing};
use position_engine::server::{self, AppState};
use tokio::signal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path =
        std::env::var("CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let config = load_config_or_default(Some(&config_path))
        .with_context(|| format!("loading configuration from {config_path}"))?;

    init_tracing(&config.observability.logging).context("initializing logging")?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config_path = %config_path,
        "Starting position engine"
    );
    log_config(&config);

    if config.observability.metrics.enabled {
        init_metrics(&config.observability.metrics).context("starting metrics exporter")?;
    }

    let state = AppState::new(ForexPairTable::standard(), config.calculator.clone());
    server::serve(&config.server, state, shutdown_signal()).await?;

    tracing::info!("Position engine stopped");
    Ok(())
}

/// Log the loaded configuration.
fn log_config(config: &Config) {
    tracing::info!(
        http_port = config.server.http_port,
        bind_address = %config.server.bind_address,
        metrics_enabled = config.observability.metrics.enabled,
        risk_percent_policy = ?config.calculator.risk_percent_policy,
        default_asset_class = %config.calculator.defaults.asset_class,
        "Configuration loaded"
    );
}

/// Wait for shutdown signal (SIGTERM or SIGINT).
///
/// # Panics
///
/// Panics if signal handlers cannot be installed. Without them the process
/// cannot respond to termination, so failing at startup is preferable.
#[allow(clippy::expect_used)]
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("signal handler installation is critical for graceful shutdown");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("SIGTERM handler installation is critical for graceful shutdown")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, initiating shutdown");
        }
    }
}
