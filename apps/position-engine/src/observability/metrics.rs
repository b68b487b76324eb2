//! Prometheus metrics for the position engine.
//!
//! Recording is always safe: without an installed recorder the macros are
//! no-ops, so library users and tests pay nothing.
//!
//! # Example
//!
//! ```ignore
//! use position_engine::config::MetricsConfig;
//! use position_engine::observability::{init_metrics, record_calculation};
//!
//! init_metrics(&MetricsConfig::default())?;
//! record_calculation("crypto", true, 0.000_004);
//! ```

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::config::MetricsConfig;

/// Histogram buckets in seconds, 1µs to 100ms. Calculations sit at the low end.
const LATENCY_BUCKETS: &[f64] = &[
    0.000_001, 0.000_005, 0.000_01, 0.000_05, 0.000_1, 0.000_5, 0.001, 0.005, 0.01, 0.05, 0.1,
];

/// Initialize the Prometheus metrics exporter.
///
/// This starts an HTTP server that exposes metrics at `/metrics`.
///
/// # Errors
///
/// Returns an error if the metrics exporter fails to start (e.g., port already in use).
pub fn init_metrics(config: &MetricsConfig) -> Result<(), MetricsError> {
    PrometheusBuilder::new()
        .with_http_listener(config.listen_addr)
        .set_buckets(LATENCY_BUCKETS)
        .map_err(|e| MetricsError::Configuration(e.to_string()))?
        .install()
        .map_err(|e| MetricsError::Installation(e.to_string()))?;

    tracing::info!(
        addr = %config.listen_addr,
        "Prometheus metrics exporter started"
    );

    Ok(())
}

/// Error type for metrics operations.
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    /// Failed to configure metrics exporter.
    #[error("metrics configuration error: {0}")]
    Configuration(String),
    /// Failed to install metrics exporter.
    #[error("metrics installation error: {0}")]
    Installation(String),
}

// ============================================================================
// Calculator Metrics
// ============================================================================

/// Record one position size calculation.
///
/// # Arguments
///
/// * `asset_class` - Asset class label (e.g., "crypto", "forex")
/// * `complete` - Whether all required inputs were present
/// * `duration_seconds` - Time spent in the engine
pub fn record_calculation(asset_class: &str, complete: bool, duration_seconds: f64) {
    counter!(
        "calculations_total",
        "asset_class" => asset_class.to_string(),
        "complete" => complete.to_string()
    )
    .increment(1);

    histogram!(
        "calculation_duration_seconds",
        "asset_class" => asset_class.to_string()
    )
    .record(duration_seconds);
}

// ============================================================================
// HTTP Metrics
// ============================================================================

/// Record an HTTP request.
///
/// # Arguments
///
/// * `route` - Route path (e.g., `"/v1/calculate"`)
/// * `status` - Response status code
/// * `duration_seconds` - Handler duration in seconds
pub fn record_http_request(route: &str, status: u16, duration_seconds: f64) {
    counter!(
        "http_requests_total",
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);

    histogram!(
        "http_request_duration_seconds",
        "route" => route.to_string()
    )
    .record(duration_seconds);
}
